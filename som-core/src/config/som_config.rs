//! Top-level SOM configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{PropagationConfig, SamplingConfig, SimulationConfig};
use crate::constants::PROJECT_CONFIG_FILE;
use crate::errors::ConfigError;
use crate::types::ScenarioKind;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_overrides`)
/// 2. Environment variables (`SOM_*`)
/// 3. Project config (`som.toml` in the project root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SomConfig {
    pub simulation: SimulationConfig,
    pub sampling: SamplingConfig,
    pub propagation: PropagationConfig,
}

/// Caller-supplied overrides, applied last.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub simulations: Option<u32>,
    pub time_steps: Option<u32>,
    pub random_seed: Option<u64>,
    pub threads: Option<usize>,
    pub scenario: Option<ScenarioKind>,
}

impl SomConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&RunOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 3: project config
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): explicit overrides
        if let Some(o) = overrides {
            Self::apply_overrides(&mut config, o);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &SomConfig) -> Result<(), ConfigError> {
        if config.simulation.simulations == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "simulation.simulations".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if config.simulation.time_steps == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "simulation.time_steps".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if config.sampling.picks_per_expert == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "sampling.picks_per_expert".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if let Some(gamma) = config.sampling.pert_gamma {
            if !(gamma.is_finite() && gamma > 0.0) {
                return Err(ConfigError::ValidationFailed {
                    field: "sampling.pert_gamma".to_string(),
                    message: "must be a positive number".to_string(),
                });
            }
        }
        if let Some(tolerance) = config.propagation.reduction_tolerance {
            if !(tolerance.is_finite() && tolerance >= 0.0) {
                return Err(ConfigError::ValidationFailed {
                    field: "propagation.reduction_tolerance".to_string(),
                    message: "must be a non-negative number".to_string(),
                });
            }
        }
        for class in &config.propagation.equivalence_classes {
            if class.class < 2 {
                return Err(ConfigError::ValidationFailed {
                    field: "propagation.equivalence_classes".to_string(),
                    message: format!("class {} is proportional and cannot be remapped", class.class),
                });
            }
            if !(0.0..=1.0).contains(&class.multiplier) {
                return Err(ConfigError::ValidationFailed {
                    field: "propagation.equivalence_classes".to_string(),
                    message: format!("multiplier for class {} must be between 0.0 and 1.0", class.class),
                });
            }
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    fn merge_toml_file(config: &mut SomConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: SomConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it has a value.
    fn merge(base: &mut SomConfig, other: &SomConfig) {
        // Simulation
        if other.simulation.simulations.is_some() {
            base.simulation.simulations = other.simulation.simulations;
        }
        if other.simulation.time_steps.is_some() {
            base.simulation.time_steps = other.simulation.time_steps;
        }
        if other.simulation.random_seed.is_some() {
            base.simulation.random_seed = other.simulation.random_seed;
        }
        if other.simulation.use_parallel.is_some() {
            base.simulation.use_parallel = other.simulation.use_parallel;
        }
        if other.simulation.threads.is_some() {
            base.simulation.threads = other.simulation.threads;
        }
        if other.simulation.scenario.is_some() {
            base.simulation.scenario = other.simulation.scenario;
        }

        // Sampling
        if other.sampling.picks_per_expert.is_some() {
            base.sampling.picks_per_expert = other.sampling.picks_per_expert;
        }
        if other.sampling.pert_gamma.is_some() {
            base.sampling.pert_gamma = other.sampling.pert_gamma;
        }

        // Propagation
        if other.propagation.case_filter.is_some() {
            base.propagation.case_filter = other.propagation.case_filter;
        }
        if !other.propagation.equivalence_classes.is_empty() {
            base.propagation.equivalence_classes = other.propagation.equivalence_classes.clone();
        }
        if other.propagation.reduction_tolerance.is_some() {
            base.propagation.reduction_tolerance = other.propagation.reduction_tolerance;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `SOM_SIMULATIONS`, `SOM_TIME_STEPS`, `SOM_RANDOM_SEED`, `SOM_THREADS`, `SOM_SCENARIO`.
    fn apply_env_overrides(config: &mut SomConfig) {
        if let Ok(val) = std::env::var("SOM_SIMULATIONS") {
            if let Ok(v) = val.parse::<u32>() {
                config.simulation.simulations = Some(v);
            }
        }
        if let Ok(val) = std::env::var("SOM_TIME_STEPS") {
            if let Ok(v) = val.parse::<u32>() {
                config.simulation.time_steps = Some(v);
            }
        }
        if let Ok(val) = std::env::var("SOM_RANDOM_SEED") {
            if let Ok(v) = val.parse::<u64>() {
                config.simulation.random_seed = Some(v);
            }
        }
        if let Ok(val) = std::env::var("SOM_THREADS") {
            if let Ok(v) = val.parse::<usize>() {
                config.simulation.threads = Some(v);
            }
        }
        if let Ok(val) = std::env::var("SOM_SCENARIO") {
            if let Ok(v) = val.parse::<ScenarioKind>() {
                config.simulation.scenario = Some(v);
            }
        }
    }

    /// Apply explicit overrides (highest priority).
    pub fn apply_overrides(config: &mut SomConfig, overrides: &RunOverrides) {
        if let Some(v) = overrides.simulations {
            config.simulation.simulations = Some(v);
        }
        if let Some(v) = overrides.time_steps {
            config.simulation.time_steps = Some(v);
        }
        if let Some(v) = overrides.random_seed {
            config.simulation.random_seed = Some(v);
        }
        if let Some(v) = overrides.threads {
            config.simulation.threads = Some(v);
        }
        if let Some(v) = overrides.scenario {
            config.simulation.scenario = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
