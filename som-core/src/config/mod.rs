//! Configuration system for SOM.
//! TOML-based, 3-layer resolution: overrides > env > project > defaults.

pub mod propagation_config;
pub mod sampling_config;
pub mod simulation_config;
pub mod som_config;

pub use propagation_config::{CaseFilterMode, EquivalenceClass, PropagationConfig};
pub use sampling_config::SamplingConfig;
pub use simulation_config::SimulationConfig;
pub use som_config::{RunOverrides, SomConfig};
