//! # som-core
//!
//! Foundation crate for the SOM (sufficiency of measures) reduction engine.
//! Defines the identifier types, table records, empirical distributions,
//! errors, config, tracing setup and constants. `som-engine` builds on it.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::SomConfig;
pub use errors::{ReplicateError, SomErrorCode};
pub use types::distribution::EmpiricalDistribution;
pub use types::identifiers::{ActivityId, AreaId, MeasureId, PressureId, StateId};
