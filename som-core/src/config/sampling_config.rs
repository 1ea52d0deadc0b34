//! Distribution synthesis configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PERT_GAMMA, DEFAULT_PICKS_PER_EXPERT};

/// Configuration for turning expert estimates into distributions.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SamplingConfig {
    /// Samples drawn per unit of expert weight. Default: 5000.
    pub picks_per_expert: Option<u32>,
    /// PERT shape constant. Default: 4.0.
    pub pert_gamma: Option<f64>,
}

impl SamplingConfig {
    pub fn effective_picks_per_expert(&self) -> u32 {
        self.picks_per_expert.unwrap_or(DEFAULT_PICKS_PER_EXPERT)
    }

    pub fn effective_pert_gamma(&self) -> f64 {
        self.pert_gamma.unwrap_or(DEFAULT_PERT_GAMMA)
    }
}
