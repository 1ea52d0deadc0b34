//! Distribution synthesis — expert (low, mode, high, weight) estimates to
//! 101-bucket empirical distributions, and weighted picks from them.
//!
//! Every source of uncertainty in the model flows through this module.
//! All sampling takes an explicit `Rng` so a seeded replicate is reproducible.

pub mod pert;
pub mod sampling;
pub mod synthesis;

pub use pert::PertDistribution;
pub use sampling::{pick, pick_many};
pub use synthesis::{DistributionSynthesizer, ExpertEstimate};
