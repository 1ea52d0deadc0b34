//! Core data model: identifiers, collections, distributions and table records.

pub mod collections;
pub mod distribution;
pub mod identifiers;
pub mod tables;

pub use distribution::EmpiricalDistribution;
pub use identifiers::{ActivityId, AreaId, MeasureId, PressureId, StateId};
pub use tables::*;
