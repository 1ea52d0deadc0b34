//! The time-stepped propagation loop.

use som_core::config::{PropagationConfig, SomConfig};
use som_core::constants::DEFAULT_TIME_STEPS;
use som_core::errors::PropagationError;
use som_core::types::collections::{BTreeMap, FxHashMap, FxHashSet};
use som_core::types::{
    ActivityContribution, AreaId, Case, MeasureId, Overlap, PressureContribution, PressureId,
    StateId, Subpressure, Threshold, ThresholdLevel,
};
use tracing::{debug, trace};

use super::area_table::AreaTable;
use super::contributions::{ActivityContributionTable, PressureContributionTable};
use super::output::{PropagationOutput, StepSnapshot};
use crate::links::LinkTable;

/// Everything one propagation run reads. Nothing here is mutated.
#[derive(Debug, Clone, Copy)]
pub struct PropagationInputs<'a> {
    pub pressures: &'a [PressureId],
    pub states: &'a [StateId],
    pub areas: &'a [AreaId],
    pub links: &'a LinkTable,
    pub cases: &'a [Case],
    pub overlaps: &'a [Overlap],
    pub subpressures: &'a [Subpressure],
    pub activity_contributions: &'a [ActivityContribution],
    pub pressure_contributions: &'a [PressureContribution],
    pub thresholds: &'a [Threshold],
}

/// Cases grouped by area, plus which measures act on each (area, pressure).
struct CaseIndex<'a> {
    by_area: FxHashMap<AreaId, Vec<&'a Case>>,
    active: FxHashMap<(AreaId, PressureId), FxHashSet<MeasureId>>,
}

impl<'a> CaseIndex<'a> {
    fn new(cases: &'a [Case]) -> Self {
        let mut by_area: FxHashMap<AreaId, Vec<&'a Case>> = FxHashMap::default();
        let mut active: FxHashMap<(AreaId, PressureId), FxHashSet<MeasureId>> = FxHashMap::default();
        for case in cases {
            by_area.entry(case.area).or_default().push(case);
            active
                .entry((case.area, case.pressure))
                .or_default()
                .insert(case.measure);
        }
        Self { by_area, active }
    }

    fn in_area(&self, area: AreaId) -> &[&'a Case] {
        self.by_area.get(&area).map(Vec::as_slice).unwrap_or(&[])
    }

    fn is_active(&self, area: AreaId, pressure: PressureId, measure: MeasureId) -> bool {
        self.active
            .get(&(area, pressure))
            .is_some_and(|m| m.contains(&measure))
    }
}

/// Runs the three-pass propagation for a number of time steps.
#[derive(Debug, Clone)]
pub struct ChangePropagator {
    time_steps: u32,
    config: PropagationConfig,
    record_history: bool,
}

impl Default for ChangePropagator {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_STEPS)
    }
}

impl ChangePropagator {
    pub fn new(time_steps: u32) -> Self {
        Self {
            time_steps,
            config: PropagationConfig::default(),
            record_history: false,
        }
    }

    pub fn from_config(config: &SomConfig) -> Self {
        Self {
            time_steps: config.simulation.effective_time_steps(),
            config: config.propagation.clone(),
            record_history: false,
        }
    }

    pub fn with_propagation_config(mut self, config: PropagationConfig) -> Self {
        self.config = config;
        self
    }

    /// Keep a snapshot of the level tables after every step.
    pub fn with_history(mut self, record: bool) -> Self {
        self.record_history = record;
        self
    }

    pub fn time_steps(&self) -> u32 {
        self.time_steps
    }

    pub fn run(&self, inputs: &PropagationInputs<'_>) -> Result<PropagationOutput, PropagationError> {
        if self.time_steps == 0 {
            return Err(PropagationError::NoTimeSteps);
        }

        let mut pressure_levels =
            AreaTable::filled(inputs.pressures.to_vec(), inputs.areas.to_vec(), 1.0);
        let mut load_levels = AreaTable::filled(inputs.states.to_vec(), inputs.areas.to_vec(), 1.0);

        let mut activity_shares = ActivityContributionTable::from_rows(inputs.activity_contributions);
        let mut pressure_shares = PressureContributionTable::from_rows(inputs.pressure_contributions);
        let rescaled = activity_shares.normalize_groups() + pressure_shares.normalize_groups();
        if rescaled > 0 {
            debug!(rescaled, "contribution groups summing above 1 rescaled");
        }

        debug!(
            time_steps = self.time_steps,
            areas = inputs.areas.len(),
            cases = inputs.cases.len(),
            "propagating"
        );
        let index = CaseIndex::new(inputs.cases);
        let mut history = Vec::new();

        for step in 0..self.time_steps {
            self.reduce_pressures(inputs, &index, &mut pressure_levels, &mut activity_shares);
            self.reduce_states_directly(inputs, &index, &mut load_levels);
            self.reduce_states_through_pressures(
                inputs,
                &pressure_levels,
                &mut load_levels,
                &mut pressure_shares,
            )?;
            trace!(step, "propagation step complete");

            if self.record_history {
                history.push(StepSnapshot {
                    step,
                    pressure_levels: pressure_levels.clone(),
                    total_pressure_load_levels: load_levels.clone(),
                });
            }
        }

        let total_pressure_load_reductions = load_levels.map(|level| 1.0 - level);
        let thresholds = threshold_tables(inputs);

        Ok(PropagationOutput {
            pressure_levels,
            total_pressure_load_levels: load_levels,
            total_pressure_load_reductions,
            thresholds,
            activity_contributions: activity_shares.to_rows(),
            pressure_contributions: pressure_shares.to_rows(),
            history,
        })
    }

    /// Effective reduction of one case, or `None` if its link has no effect.
    ///
    /// Overlaps apply when the overlapping measure also has a case acting on
    /// the same pressure in the same area.
    fn case_reduction(&self, case: &Case, inputs: &PropagationInputs<'_>, index: &CaseIndex<'_>) -> Option<f64> {
        let link = inputs.links.get(&case.link_key())?;
        let reduction = link.reduction?;
        let overlap: f64 = inputs
            .overlaps
            .iter()
            .filter(|o| {
                o.applies_to(case.measure, case.pressure, case.activity)
                    && o.overlapping != case.measure
                    && index.is_active(case.area, case.pressure, o.overlapping)
            })
            .map(|o| o.multiplier)
            .product();
        let effective =
            reduction * link.multiplier * case.coverage * case.implementation * overlap;
        Some(effective.clamp(0.0, 1.0))
    }

    /// Pass 1: activity → pressure.
    fn reduce_pressures(
        &self,
        inputs: &PropagationInputs<'_>,
        index: &CaseIndex<'_>,
        levels: &mut AreaTable<PressureId>,
        shares: &mut ActivityContributionTable,
    ) {
        for &area in inputs.areas {
            let cases = index.in_area(area);
            for &pressure in inputs.pressures.iter().filter(|p| !p.is_wildcard()) {
                for case in cases.iter().filter(|c| c.pressure == pressure) {
                    let Some(reduction) = self.case_reduction(case, inputs, index) else {
                        continue;
                    };
                    let group = (pressure, area);
                    let contribution = if case.activity.is_wildcard() {
                        1.0
                    } else {
                        shares.get(group, case.activity).unwrap_or(0.0).clamp(0.0, 1.0)
                    };
                    levels.scale(pressure, area, 1.0 - reduction * contribution);
                    if !case.activity.is_wildcard() {
                        shares.reduce(group, case.activity, reduction);
                    }
                }
            }
        }
    }

    /// Pass 2: measures linked straight to a state.
    fn reduce_states_directly(
        &self,
        inputs: &PropagationInputs<'_>,
        index: &CaseIndex<'_>,
        levels: &mut AreaTable<StateId>,
    ) {
        for &area in inputs.areas {
            let cases = index.in_area(area);
            for &state in inputs.states.iter().filter(|s| !s.is_wildcard()) {
                for case in cases.iter().filter(|c| c.state == state) {
                    if let Some(reduction) = self.case_reduction(case, inputs, index) {
                        levels.scale(state, area, 1.0 - reduction);
                    }
                }
            }
        }
    }

    /// Pass 3: pressure reductions (and subpressure equivalents) → state load.
    fn reduce_states_through_pressures(
        &self,
        inputs: &PropagationInputs<'_>,
        pressure_levels: &AreaTable<PressureId>,
        levels: &mut AreaTable<StateId>,
        shares: &mut PressureContributionTable,
    ) -> Result<(), PropagationError> {
        let tolerance = self.config.effective_reduction_tolerance();
        let reduced = |pressure: PressureId, area: AreaId| {
            1.0 - pressure_levels.value(pressure, area).unwrap_or(1.0)
        };

        for &area in inputs.areas {
            for &state in inputs.states {
                let group = (state, area);
                for pressure in shares.members(group) {
                    let mut reduction = reduced(pressure, area);
                    for sub in inputs.subpressures.iter().filter(|s| {
                        s.state == state
                            && s.state_pressure == pressure
                            && s.reduced_pressure != pressure
                    }) {
                        reduction += reduced(sub.reduced_pressure, area)
                            * self.config.equivalence_multiplier(sub.equivalence);
                    }

                    if reduction > 1.0 + tolerance {
                        return Err(PropagationError::ReductionOverflow {
                            state: state.raw(),
                            pressure: pressure.raw(),
                            area: area.raw(),
                            reduction,
                        });
                    }
                    let reduction = reduction.clamp(0.0, 1.0);

                    let contribution = shares.get(group, pressure).unwrap_or(0.0).clamp(0.0, 1.0);
                    levels.scale(state, area, 1.0 - reduction * contribution);
                    shares.reduce(group, pressure, reduction);
                }
            }
        }
        Ok(())
    }
}

fn threshold_tables(inputs: &PropagationInputs<'_>) -> BTreeMap<ThresholdLevel, AreaTable<StateId>> {
    let mut tables: BTreeMap<ThresholdLevel, AreaTable<StateId>> = ThresholdLevel::ALL
        .iter()
        .map(|&level| (level, AreaTable::new(inputs.states.to_vec(), inputs.areas.to_vec())))
        .collect();
    for threshold in inputs.thresholds {
        for (level, table) in tables.iter_mut() {
            if let Some(value) = threshold.get(*level) {
                table.set(threshold.state, threshold.area, value);
            }
        }
    }
    tables
}
