//! Curated internal API (UNSTABLE).
//!
//! A convenience surface for the CLI and the Python bindings. Breaking
//! changes are allowed.

// Points and reaches
pub use crate::point::{ReachPoint, ReachPointType};
pub use crate::reach::{ChainageTable, RangePolicy, ReachGeometry};
pub use crate::GeometryError;
// Engine interop
pub use crate::engine::{
    geometry_from_catchment, geometry_from_node, CatchmentRecord, DigiPointRecord, EngineCatchment,
    EngineNode, EngineReach, GridPointRecord, NodeRecord, ReachRecord,
};
// Synthetic data
pub use crate::synth::{draw_reach, draw_reaches, MeanderCfg, ReplayToken as SynthReplay};
