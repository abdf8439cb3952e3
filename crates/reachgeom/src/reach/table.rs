//! Cumulative-distance table for chainage ↔ geometric distance lookups.
//!
//! Model
//! - One entry per stored reach point: `(chainage_i, distance_i)` with
//!   `distance_0 = 0` and `distance_i = distance_{i-1} + |xy_i - xy_{i-1}|`.
//! - Points sharing a location contribute a zero-length step, which is the
//!   same folding `ReachGeometry::to_line_string` applies to vertices.
//! - Both columns are non-decreasing, so one `partition_point` locates the
//!   bracketing interval in either direction.
//!
//! Lookup rules (`lookup`)
//! - Exact node hit: stored counterpart of the first matching entry, no arithmetic.
//! - Strictly inside: linear interpolation between bracketing entries.
//! - Outside: per `RangePolicy` (clamp to endpoint, or `OutOfRange`).

use crate::error::GeometryError;
use crate::point::ReachPoint;

/// Behavior for queries outside the table range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RangePolicy {
    /// Return the counterpart of the nearest table endpoint.
    #[default]
    Clamp,
    /// Return `GeometryError::OutOfRange`.
    Strict,
}

/// Parallel chainage/distance columns. Never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainageTable {
    chainages: Vec<f64>,
    distances: Vec<f64>,
}

impl ChainageTable {
    /// Build from chainage-sorted points. `None` for empty input.
    pub fn from_sorted_points(points: &[ReachPoint]) -> Option<Self> {
        let first = points.first()?;
        let mut chainages = Vec::with_capacity(points.len());
        let mut distances = Vec::with_capacity(points.len());
        chainages.push(first.chainage);
        distances.push(0.0);
        let mut acc = 0.0;
        for w in points.windows(2) {
            acc += (w[1].xy() - w[0].xy()).norm();
            chainages.push(w[1].chainage);
            distances.push(acc);
        }
        Some(Self {
            chainages,
            distances,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chainages.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chainages.is_empty()
    }
    #[inline]
    pub fn chainages(&self) -> &[f64] {
        &self.chainages
    }
    #[inline]
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }
    /// Total cumulative distance (last entry).
    #[inline]
    pub fn total_distance(&self) -> f64 {
        self.distances.last().copied().unwrap_or(0.0)
    }

    /// Chainage → cumulative geometric distance.
    pub fn distance_at(&self, chainage: f64, policy: RangePolicy) -> Result<f64, GeometryError> {
        lookup(&self.chainages, &self.distances, chainage, policy)
    }

    /// Cumulative geometric distance → chainage.
    pub fn chainage_at(&self, distance: f64, policy: RangePolicy) -> Result<f64, GeometryError> {
        lookup(&self.distances, &self.chainages, distance, policy)
    }
}

/// Piecewise-linear lookup of `q` in the non-decreasing column `xs`, mapped to `ys`.
fn lookup(xs: &[f64], ys: &[f64], q: f64, policy: RangePolicy) -> Result<f64, GeometryError> {
    debug_assert_eq!(xs.len(), ys.len());
    let (Some(&lo), Some(&hi)) = (xs.first(), xs.last()) else {
        return Err(GeometryError::NoPoints);
    };
    let out_of_range = GeometryError::OutOfRange {
        value: q,
        min: lo,
        max: hi,
    };
    if q.is_nan() {
        return match policy {
            RangePolicy::Clamp => Ok(f64::NAN),
            RangePolicy::Strict => Err(out_of_range),
        };
    }
    // first index with xs[i] >= q
    let i = xs.partition_point(|&x| x < q);
    if i == xs.len() {
        return match policy {
            RangePolicy::Clamp => Ok(ys[ys.len() - 1]),
            RangePolicy::Strict => Err(out_of_range),
        };
    }
    if xs[i] == q {
        return Ok(ys[i]);
    }
    if i == 0 {
        return match policy {
            RangePolicy::Clamp => Ok(ys[0]),
            RangePolicy::Strict => Err(out_of_range),
        };
    }
    // xs[i-1] < q < xs[i]
    let (x0, x1) = (xs[i - 1], xs[i]);
    let (y0, y1) = (ys[i - 1], ys[i]);
    let t = (q - x0) / (x1 - x0);
    Ok(y0 + (y1 - y0) * t)
}
