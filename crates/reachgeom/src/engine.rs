//! Narrow read-only interface to the simulation engine's network objects.
//!
//! Engine handles (reaches, nodes, catchments) are only read through the
//! traits below, during the adapter call. Nothing from the engine is retained
//! afterwards; adapters copy plain numbers into `ReachPoint`s or `geo`
//! primitives.
//!
//! The `*Record` types are plain-data implementations of the traits. They
//! (de)serialize with serde and serve as the on-disk reach format of the CLI.

use geo::{Coord, LineString, Point, Polygon};
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::point::ReachPoint;
use crate::reach::ReachGeometry;

/// Computational grid point as exposed by the engine (X, Y, Z, Chainage).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridPointRecord {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub chainage: f64,
}

/// Digitized point as exposed by the engine (X, Y, Z, M); `m` is its chainage.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DigiPointRecord {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub m: f64,
}

impl From<GridPointRecord> for ReachPoint {
    fn from(r: GridPointRecord) -> Self {
        ReachPoint::gridpoint(r.chainage, r.x, r.y, r.z)
    }
}

impl From<DigiPointRecord> for ReachPoint {
    fn from(r: DigiPointRecord) -> Self {
        ReachPoint::digipoint(r.m, r.x, r.y, r.z)
    }
}

/// Engine reach: ordered grid points and digitized points.
pub trait EngineReach {
    fn grid_points(&self) -> impl Iterator<Item = GridPointRecord> + '_;
    fn digi_points(&self) -> impl Iterator<Item = DigiPointRecord> + '_;
}

/// Engine node: planar location.
pub trait EngineNode {
    fn x(&self) -> f64;
    fn y(&self) -> f64;
}

/// Engine catchment: ordered boundary ring and a center point.
pub trait EngineCatchment {
    fn shape(&self) -> impl Iterator<Item = (f64, f64)> + '_;
    fn center_point(&self) -> (f64, f64);
}

/// Plain-data reach.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReachRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub grid_points: Vec<GridPointRecord>,
    #[serde(default)]
    pub digi_points: Vec<DigiPointRecord>,
}

impl EngineReach for ReachRecord {
    fn grid_points(&self) -> impl Iterator<Item = GridPointRecord> + '_ {
        self.grid_points.iter().copied()
    }
    fn digi_points(&self) -> impl Iterator<Item = DigiPointRecord> + '_ {
        self.digi_points.iter().copied()
    }
}

/// Plain-data node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub x: f64,
    pub y: f64,
}

impl EngineNode for NodeRecord {
    fn x(&self) -> f64 {
        self.x
    }
    fn y(&self) -> f64 {
        self.y
    }
}

/// Plain-data catchment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatchmentRecord {
    pub shape: Vec<(f64, f64)>,
    pub center: (f64, f64),
}

impl EngineCatchment for CatchmentRecord {
    fn shape(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.shape.iter().copied()
    }
    fn center_point(&self) -> (f64, f64) {
        self.center
    }
}

impl ReachGeometry {
    /// Merge the grid and digitized points of contiguous engine reaches.
    ///
    /// Reach order is irrelevant: the merged set is re-sorted by chainage, so
    /// the reaches must already share one chainage numbering.
    pub fn from_engine_reaches<R: EngineReach>(reaches: &[R]) -> Result<Self, GeometryError> {
        let mut points = Vec::new();
        for reach in reaches {
            points.extend(reach.grid_points().map(ReachPoint::from));
            points.extend(reach.digi_points().map(ReachPoint::from));
        }
        tracing::debug!(reaches = reaches.len(), raw_points = points.len(), "merging reaches");
        ReachGeometry::new(points)
    }
}

/// Point geometry of an engine node.
pub fn geometry_from_node<N: EngineNode + ?Sized>(node: &N) -> Point<f64> {
    Point::new(node.x(), node.y())
}

/// Polygon geometry of an engine catchment. The ring is closed, never repaired.
pub fn geometry_from_catchment<C: EngineCatchment>(catchment: &C) -> Polygon<f64> {
    let ring: LineString<f64> = catchment
        .shape()
        .map(|(x, y)| Coord { x, y })
        .collect::<Vec<_>>()
        .into();
    Polygon::new(ring, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Area, Centroid};

    fn reach(name: &str, grid: &[(f64, f64, f64)], digi: &[(f64, f64, f64)]) -> ReachRecord {
        ReachRecord {
            name: name.to_string(),
            grid_points: grid
                .iter()
                .map(|&(c, x, y)| GridPointRecord {
                    x,
                    y,
                    z: 0.0,
                    chainage: c,
                })
                .collect(),
            digi_points: digi
                .iter()
                .map(|&(m, x, y)| DigiPointRecord { x, y, z: 1.0, m })
                .collect(),
        }
    }

    #[test]
    fn record_conversion_tags_types() {
        let g: ReachPoint = GridPointRecord {
            x: 1.0,
            y: 2.0,
            z: 3.0,
            chainage: 4.0,
        }
        .into();
        assert!(g.is_gridpoint());
        assert_eq!((g.chainage, g.x, g.y, g.z), (4.0, 1.0, 2.0, 3.0));
        let d: ReachPoint = DigiPointRecord {
            x: 1.0,
            y: 2.0,
            z: 3.0,
            m: 9.0,
        }
        .into();
        assert!(d.is_digipoint());
        assert_eq!(d.chainage, 9.0);
    }

    #[test]
    fn merged_reaches_ignore_input_order() {
        let upstream = reach(
            "up",
            &[(0.0, 0.0, 0.0), (100.0, 100.0, 0.0)],
            &[(0.0, 0.0, 0.0), (50.0, 50.0, 10.0), (100.0, 100.0, 0.0)],
        );
        let downstream = reach(
            "down",
            &[(100.0, 100.0, 0.0), (200.0, 200.0, 0.0)],
            &[(100.0, 100.0, 0.0), (200.0, 200.0, 0.0)],
        );
        let a =
            ReachGeometry::from_engine_reaches(&[upstream.clone(), downstream.clone()]).unwrap();
        let b = ReachGeometry::from_engine_reaches(&[downstream, upstream]).unwrap();
        assert_eq!(a, b);
        // digipoints differ in z from gridpoints, so nothing collapses across types
        assert_eq!(a.gridpoints().len(), 4 - 1);
        assert_eq!(a.digipoints().len(), 5 - 1);
        assert_eq!(a.gridpoints()[0].chainage, 0.0);
        assert_eq!(a.gridpoints().last().unwrap().chainage, 200.0);
        assert_eq!(a.length(), 200.0);
        let line = a.to_line_string().unwrap();
        assert_eq!(line.0.len(), 4);
    }

    #[test]
    fn no_reaches_is_an_error() {
        let empty: [ReachRecord; 0] = [];
        assert_eq!(
            ReachGeometry::from_engine_reaches(&empty),
            Err(GeometryError::NoPoints)
        );
    }

    #[test]
    fn node_point() {
        let n = NodeRecord {
            x: -687934.6000976562,
            y: -1056500.69921875,
        };
        let p = geometry_from_node(&n);
        assert_eq!(p.x(), n.x);
        assert_eq!(p.y(), n.y);
    }

    #[test]
    fn catchment_polygon_closed_and_centered() {
        let c = CatchmentRecord {
            shape: vec![(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (0.0, 2.0)],
            center: (2.0, 1.0),
        };
        let poly = geometry_from_catchment(&c);
        assert!(poly.exterior().is_closed());
        assert_eq!(poly.exterior().0.len(), 5);
        assert!((poly.unsigned_area() - 8.0).abs() < 1e-12);
        let centroid = poly.centroid().unwrap();
        let (cx, cy) = c.center_point();
        assert!((centroid.x() - cx).abs() < 1e-12);
        assert!((centroid.y() - cy).abs() < 1e-12);
    }

    #[test]
    fn catchment_ring_is_not_repaired() {
        // bow-tie stays a bow-tie
        let c = CatchmentRecord {
            shape: vec![(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0), (0.0, 0.0)],
            center: (0.5, 0.5),
        };
        let poly = geometry_from_catchment(&c);
        let xs: Vec<(f64, f64)> = poly.exterior().0.iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(xs, c.shape);
    }

    #[test]
    fn reach_record_json() {
        let json = r#"{
            "name": "river",
            "grid_points": [{"x": 0.0, "y": 0.0, "z": 1.0, "chainage": 0.0}],
            "digi_points": [{"x": 0.0, "y": 0.0, "z": 1.0, "m": 0.0},
                            {"x": 3.0, "y": 4.0, "z": 1.0, "m": 10.0}]
        }"#;
        let r: ReachRecord = serde_json::from_str(json).unwrap();
        let g = ReachGeometry::from_engine_reaches(&[r]).unwrap();
        // grid and digi twin at chainage 0 collapse, gridpoint kept
        assert_eq!(g.points().len(), 2);
        assert!(g.points()[0].is_gridpoint());
        assert_eq!(g.geometric_length(), 5.0);
    }
}
