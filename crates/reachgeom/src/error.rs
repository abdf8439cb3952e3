//! Errors surfaced by reach geometry construction and lookups.

use thiserror::Error;

/// Errors surfaced by `ReachGeometry` and `ChainageTable`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A reach geometry needs at least one point.
    #[error("reach geometry needs at least one point")]
    NoPoints,
    /// Fewer than two distinct (x, y) vertices remain after folding duplicates.
    #[error("polyline is degenerate: {vertices} distinct vertex(es), need at least 2")]
    DegenerateLine { vertices: usize },
    /// Query lies strictly outside the table range (strict policy only).
    #[error("value {value} outside table range [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },
}
