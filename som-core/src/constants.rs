//! Shared constants for the SOM engine.

/// SOM version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of buckets in an empirical distribution, one per percentage point 0..=100.
pub const DISTRIBUTION_BUCKETS: usize = 101;

/// Tolerance used when checking that a distribution sums to 1.
pub const DISTRIBUTION_SUM_TOLERANCE: f64 = 1e-9;

/// Samples drawn per unit of expert weight when synthesizing a distribution.
pub const DEFAULT_PICKS_PER_EXPERT: u32 = 5000;

/// PERT shape constant. 4 is the unmodified PERT value.
pub const DEFAULT_PERT_GAMMA: f64 = 4.0;

/// Default number of Monte-Carlo replicates.
pub const DEFAULT_SIMULATIONS: u32 = 100;

/// Default number of propagation time steps per replicate.
pub const DEFAULT_TIME_STEPS: u32 = 1;

/// Default tolerance for the "combined reduction never exceeds 1" check.
pub const DEFAULT_REDUCTION_TOLERANCE: f64 = 1e-9;

/// Denominators below this are treated as a fully eliminated budget.
pub const RENORMALIZATION_EPSILON: f64 = 1e-12;

/// Maximum number of pressures a single pressure-survey answer may list.
pub const MAX_PRESSURES_PER_ANSWER: usize = 6;

/// Name of the project-level config file.
pub const PROJECT_CONFIG_FILE: &str = "som.toml";

/// Reserved wildcard id: "all valid ids" in cases, "none / direct" in links.
pub const WILDCARD_ID: u32 = 0;
