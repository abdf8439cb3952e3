//! Reach geometry: ordered, deduplicated reach points and chainage mapping.
//!
//! Purpose
//! - Rebuild a 1D curvilinear geometry for a reach from an unordered set of
//!   digitized and gridded points.
//! - Map between chainage (the engine's linear coordinate) and geometric
//!   arc-length distance along the planar polyline, in both directions.
//!
//! Invariants (`ReachGeometry`)
//! - `points` sorted ascending (chainage, then x, y, z) and free of duplicate
//!   `(chainage, x, y, z)` keys. Among type twins the gridpoint is kept.
//! - `table` holds one entry per point; see `table` for the lookup rules.
//! - Immutable after construction; only plain numbers are stored.
//!
//! Code cross-refs: `point::ReachPoint`, `table::ChainageTable`,
//! `engine::{EngineReach, geometry_from_node, geometry_from_catchment}`

pub mod table;

use geo::{Coord, EuclideanLength, LineInterpolatePoint, LineString, Point};

use crate::error::GeometryError;
use crate::point::{ReachPoint, ReachPointType};
pub use table::{ChainageTable, RangePolicy};

/// Geometry of a reach (or a chain of contiguous reaches).
#[derive(Clone, Debug, PartialEq)]
pub struct ReachGeometry {
    points: Vec<ReachPoint>,
    table: ChainageTable,
}

impl ReachGeometry {
    /// Sort, dedup and index `points`. Fails on empty input.
    pub fn new<I>(points: I) -> Result<Self, GeometryError>
    where
        I: IntoIterator<Item = ReachPoint>,
    {
        let mut points: Vec<ReachPoint> = points.into_iter().collect();
        let raw = points.len();
        // Type twins sort gridpoint-first so `dedup` keeps the gridpoint.
        points.sort_by(|a, b| {
            a.cmp(b)
                .then_with(|| kind_rank(a.kind).cmp(&kind_rank(b.kind)))
        });
        points.dedup();
        let table = ChainageTable::from_sorted_points(&points).ok_or(GeometryError::NoPoints)?;
        tracing::debug!(
            points = points.len(),
            dropped = raw - points.len(),
            "reach geometry built"
        );
        Ok(Self { points, table })
    }

    #[inline]
    pub fn points(&self) -> &[ReachPoint] {
        &self.points
    }

    pub fn gridpoints(&self) -> Vec<ReachPoint> {
        self.points
            .iter()
            .copied()
            .filter(ReachPoint::is_gridpoint)
            .collect()
    }

    pub fn digipoints(&self) -> Vec<ReachPoint> {
        self.points
            .iter()
            .copied()
            .filter(ReachPoint::is_digipoint)
            .collect()
    }

    /// Sorted distinct chainages.
    pub fn chainages(&self) -> Vec<f64> {
        let mut out: Vec<f64> = self.points.iter().map(|p| p.chainage).collect();
        out.dedup_by(|a, b| a == b);
        out
    }

    /// Chainage span, last minus first.
    pub fn length(&self) -> f64 {
        let cs = self.table.chainages();
        match (cs.first(), cs.last()) {
            (Some(a), Some(b)) => b - a,
            _ => 0.0,
        }
    }

    /// Planar arc length of the reach polyline.
    #[inline]
    pub fn geometric_length(&self) -> f64 {
        self.table.total_distance()
    }

    #[inline]
    pub fn table(&self) -> &ChainageTable {
        &self.table
    }

    /// Polyline through the distinct consecutive (x, y) locations.
    pub fn to_line_string(&self) -> Result<LineString<f64>, GeometryError> {
        let mut coords: Vec<Coord<f64>> = self
            .points
            .iter()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect();
        coords.dedup();
        if coords.len() < 2 {
            return Err(GeometryError::DegenerateLine {
                vertices: coords.len(),
            });
        }
        Ok(LineString::new(coords))
    }

    /// Chainage → geometric distance, clamped to the table range.
    #[inline]
    pub fn chainage_to_geometric_distance(&self, chainage: f64) -> f64 {
        self.table
            .distance_at(chainage, RangePolicy::Clamp)
            .unwrap_or(f64::NAN)
    }

    /// Geometric distance → chainage, clamped to the table range.
    #[inline]
    pub fn chainage_from_geometric_distance(&self, distance: f64) -> f64 {
        self.table
            .chainage_at(distance, RangePolicy::Clamp)
            .unwrap_or(f64::NAN)
    }

    /// Like `chainage_to_geometric_distance`, but errors strictly outside the table.
    #[inline]
    pub fn checked_chainage_to_geometric_distance(
        &self,
        chainage: f64,
    ) -> Result<f64, GeometryError> {
        self.table.distance_at(chainage, RangePolicy::Strict)
    }

    /// Like `chainage_from_geometric_distance`, but errors strictly outside the table.
    #[inline]
    pub fn checked_chainage_from_geometric_distance(
        &self,
        distance: f64,
    ) -> Result<f64, GeometryError> {
        self.table.chainage_at(distance, RangePolicy::Strict)
    }

    /// Planar location at `chainage` along the polyline.
    pub fn point_at_chainage(
        &self,
        chainage: f64,
        policy: RangePolicy,
    ) -> Result<Point<f64>, GeometryError> {
        let line = self.to_line_string()?;
        let distance = self.table.distance_at(chainage, policy)?;
        if distance.is_nan() {
            return Err(GeometryError::OutOfRange {
                value: chainage,
                min: self.table.chainages()[0],
                max: self.table.chainages()[self.table.len() - 1],
            });
        }
        let fraction = (distance / line.euclidean_length()).clamp(0.0, 1.0);
        line.line_interpolate_point(fraction)
            .ok_or(GeometryError::DegenerateLine {
                vertices: line.0.len(),
            })
    }
}

#[inline]
fn kind_rank(kind: ReachPointType) -> u8 {
    match kind {
        ReachPointType::GridPoint => 0,
        ReachPointType::DigiPoint => 1,
    }
}
