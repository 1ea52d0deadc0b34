//! # som-engine
//!
//! Stochastic reduction-propagation engine. Expert estimates become
//! empirical distributions, distributions become sampled link reductions,
//! cases are expanded against the links, and reductions are propagated
//! from activities through pressures into states, area by area.
//!
//! One Monte-Carlo replicate is fully described by [`replicate::ReplicateDriver::run_replicate`];
//! [`replicate::ReplicateDriver::run`] runs many and [`aggregation::aggregate`] rolls them up.

pub mod aggregation;
pub mod cases;
pub mod distribution;
pub mod links;
pub mod propagation;
pub mod replicate;
pub mod scenario;
pub mod survey;

pub use cases::expand_cases;
pub use distribution::{pick, DistributionSynthesizer, ExpertEstimate, PertDistribution};
pub use links::LinkTable;
pub use propagation::{ChangePropagator, PropagationInputs, PropagationOutput};
pub use replicate::{InputTables, ReplicateDriver, ReplicateOutput};
pub use scenario::apply_scenario;
