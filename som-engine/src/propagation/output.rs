//! Propagation results for one replicate.

use serde::Serialize;
use som_core::types::collections::BTreeMap;
use som_core::types::{ActivityContribution, PressureContribution, ThresholdLevel};
use som_core::{PressureId, StateId};

use super::area_table::AreaTable;

/// Levels after one time step.
#[derive(Debug, Clone, Serialize)]
pub struct StepSnapshot {
    pub step: u32,
    pub pressure_levels: AreaTable<PressureId>,
    pub total_pressure_load_levels: AreaTable<StateId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropagationOutput {
    /// Remaining fraction of each pressure per area (1 = unchanged).
    pub pressure_levels: AreaTable<PressureId>,
    /// Remaining fraction of each state's total pressure load per area.
    pub total_pressure_load_levels: AreaTable<StateId>,
    /// `1 − total_pressure_load_levels`.
    pub total_pressure_load_reductions: AreaTable<StateId>,
    /// Sampled reduction targets per level; cells without a threshold stay empty.
    pub thresholds: BTreeMap<ThresholdLevel, AreaTable<StateId>>,
    /// Activity contributions after renormalization.
    pub activity_contributions: Vec<ActivityContribution>,
    /// Pressure contributions after renormalization.
    pub pressure_contributions: Vec<PressureContribution>,
    /// Per-step levels, present only when history recording is on.
    pub history: Vec<StepSnapshot>,
}

impl PropagationOutput {
    pub fn threshold(&self, level: ThresholdLevel) -> Option<&AreaTable<StateId>> {
        self.thresholds.get(&level)
    }
}
