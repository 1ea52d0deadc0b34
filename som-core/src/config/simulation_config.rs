//! Replicate-level simulation configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SIMULATIONS, DEFAULT_TIME_STEPS};
use crate::types::ScenarioKind;

/// Configuration for the replicate driver.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of Monte-Carlo replicates. Default: 100.
    pub simulations: Option<u32>,
    /// Propagation time steps per replicate. Default: 1.
    pub time_steps: Option<u32>,
    /// Base seed. Replicate `i` uses `seed + i`. `None` = fresh entropy per run.
    pub random_seed: Option<u64>,
    /// Run replicates on a rayon pool. Default: true.
    pub use_parallel: Option<bool>,
    /// Worker threads for the pool (0 = rayon default). Default: 0.
    pub threads: Option<usize>,
    /// Activity development scenario to apply before propagation.
    pub scenario: Option<ScenarioKind>,
}

impl SimulationConfig {
    /// Returns the effective replicate count, defaulting to 100.
    pub fn effective_simulations(&self) -> u32 {
        self.simulations.unwrap_or(DEFAULT_SIMULATIONS)
    }

    /// Returns the effective time step count, defaulting to 1.
    pub fn effective_time_steps(&self) -> u32 {
        self.time_steps.unwrap_or(DEFAULT_TIME_STEPS)
    }

    /// Returns whether replicates run in parallel, defaulting to true.
    pub fn effective_use_parallel(&self) -> bool {
        self.use_parallel.unwrap_or(true)
    }

    /// Returns the worker thread count, defaulting to 0 (auto).
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(0)
    }
}
