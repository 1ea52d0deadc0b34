//! Monte-Carlo replicates: input tables, per-replicate sampling, and the driver.

pub mod driver;
pub mod inputs;
pub mod sample;

pub use driver::{ReplicateDriver, ReplicateOutput};
pub use inputs::{InputTables, SurveyBundle};
pub use sample::ReplicateSample;
