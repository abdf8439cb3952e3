//! Typed points along a reach.
//!
//! - `ReachPointType`: digitized (shape) vs. gridded (computational) point.
//! - `ReachPoint`: chainage + 3D coordinate + type tag.
//!
//! Comparison policy
//! - Equality, ordering and hashing use `(chainage, x, y, z)` only; the type
//!   tag is ignored, so a digipoint and a gridpoint at the same place and
//!   chainage collapse under set dedup.
//! - Floats compare by IEEE total order after mapping `-0.0` to `+0.0` and
//!   every NaN to one canonical NaN. This keeps `Eq`/`Ord`/`Hash` lawful for
//!   NaN input (all NaNs are equal and sort after every number, whatever
//!   their sign bit or payload) while matching plain `==` for ordinary values.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use geo::Point;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Kind of reach point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReachPointType {
    /// Manually digitized point; defines the reach shape.
    #[serde(rename = "digi")]
    DigiPoint,
    /// Computational grid node used by the engine.
    #[serde(rename = "grid")]
    GridPoint,
}

/// Point along a reach. Immutable value.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ReachPoint {
    pub kind: ReachPointType,
    pub chainage: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl ReachPoint {
    #[inline]
    pub fn new(kind: ReachPointType, chainage: f64, x: f64, y: f64, z: f64) -> Self {
        Self {
            kind,
            chainage,
            x,
            y,
            z,
        }
    }
    #[inline]
    pub fn gridpoint(chainage: f64, x: f64, y: f64, z: f64) -> Self {
        Self::new(ReachPointType::GridPoint, chainage, x, y, z)
    }
    #[inline]
    pub fn digipoint(chainage: f64, x: f64, y: f64, z: f64) -> Self {
        Self::new(ReachPointType::DigiPoint, chainage, x, y, z)
    }
    #[inline]
    pub fn is_gridpoint(&self) -> bool {
        self.kind == ReachPointType::GridPoint
    }
    #[inline]
    pub fn is_digipoint(&self) -> bool {
        self.kind == ReachPointType::DigiPoint
    }

    /// Planar location; z and chainage are dropped.
    #[inline]
    pub fn xy(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// Planar point geometry (x, y).
    #[inline]
    pub fn to_point(&self) -> Point<f64> {
        Point::new(self.x, self.y)
    }

    #[inline]
    fn key(&self) -> [f64; 4] {
        [
            canon(self.chainage),
            canon(self.x),
            canon(self.y),
            canon(self.z),
        ]
    }
}

#[inline]
fn canon(v: f64) -> f64 {
    // -0.0 == 0.0 must hold under total ordering too; NaNs collapse to one
    // positive NaN so they sort last.
    if v == 0.0 {
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

impl PartialEq for ReachPoint {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ReachPoint {}

impl PartialOrd for ReachPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ReachPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.key(), other.key());
        a.iter()
            .zip(b.iter())
            .map(|(u, v)| u.total_cmp(v))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl Hash for ReachPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for v in self.key() {
            v.to_bits().hash(state);
        }
    }
}
