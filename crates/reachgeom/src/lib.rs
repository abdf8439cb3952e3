//! Reach geometry for network simulation results.
//!
//! Rebuilds the planar geometry of river/pipe reaches from the grid points
//! and digitized points a network engine exposes, and maps between chainage
//! and geometric distance along the result.
//!
//! Layout
//! - `point`: `ReachPoint` and its comparison policy.
//! - `reach`: `ReachGeometry` and the chainage/distance table.
//! - `engine`: read-only engine traits, plain-data records, adapters.
//! - `synth`: reproducible synthetic reaches for tests and benches.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API; prefer
//!   `api` or `prelude` re-exports over deep paths.

pub mod api;
pub mod engine;
pub mod error;
pub mod point;
pub mod reach;
pub mod synth;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::GeometryError;
pub use point::{ReachPoint, ReachPointType};
pub use reach::{ChainageTable, RangePolicy, ReachGeometry};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::engine::{
        geometry_from_catchment, geometry_from_node, EngineCatchment, EngineNode, EngineReach,
    };
    pub use crate::{GeometryError, RangePolicy, ReachGeometry, ReachPoint, ReachPointType};
    pub use geo::{LineString, Point, Polygon};
}
