//! Case expansion: raw case specs with wildcards → concrete cases.
//!
//! A wildcard field (id 0) expands to every value that field takes in the
//! links of the case's measure. Expanded rows are filtered against the link
//! table and deduplicated, keeping the strongest coverage/implementation.

use som_core::config::CaseFilterMode;
use som_core::errors::CaseError;
use som_core::types::collections::{FxHashMap, FxHashSet, SmallVec8};
use som_core::types::{ActivityId, AreaId, Case, CaseSpec, MeasureId, PressureId, StateId};
use tracing::debug;

use crate::links::LinkTable;

/// Case ids must be unique and fractions must lie in [0, 1].
pub fn validate_case_specs(specs: &[CaseSpec]) -> Result<(), CaseError> {
    let mut ids = FxHashSet::default();
    for spec in specs {
        if !ids.insert(spec.id) {
            return Err(CaseError::DuplicateCaseId { id: spec.id });
        }
        for (field, value) in [("coverage", spec.coverage), ("implementation", spec.implementation)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CaseError::FractionOutOfRange {
                    id: spec.id,
                    field,
                    value,
                });
            }
        }
    }
    Ok(())
}

/// Field values present in one measure's links.
#[derive(Debug, Default)]
struct MeasureDomain {
    activities: SmallVec8<ActivityId>,
    pressures: SmallVec8<PressureId>,
    states: SmallVec8<StateId>,
}

impl MeasureDomain {
    fn add(&mut self, activity: ActivityId, pressure: PressureId, state: StateId) {
        push_unique(&mut self.activities, activity);
        push_unique(&mut self.pressures, pressure);
        push_unique(&mut self.states, state);
    }
}

fn push_unique<T: PartialEq>(values: &mut SmallVec8<T>, value: T) {
    if !values.contains(&value) {
        values.push(value);
    }
}

fn candidates<T: Copy + PartialEq + Default>(value: T, domain: &SmallVec8<T>) -> SmallVec8<T> {
    if value == T::default() {
        domain.clone()
    } else {
        let mut one = SmallVec8::new();
        one.push(value);
        one
    }
}

type CaseKey = (MeasureId, ActivityId, PressureId, StateId, AreaId);

/// Expand case specs against the link table.
///
/// Measures without any link are dropped. Output order follows the first
/// occurrence of each concrete (measure, activity, pressure, state, area).
pub fn expand_cases(specs: &[CaseSpec], links: &LinkTable, mode: CaseFilterMode) -> Vec<Case> {
    let mut domains: FxHashMap<MeasureId, MeasureDomain> = FxHashMap::default();
    for link in links {
        domains
            .entry(link.measure)
            .or_default()
            .add(link.activity, link.pressure, link.state);
    }

    let mut cases: Vec<Case> = Vec::new();
    let mut positions: FxHashMap<CaseKey, usize> = FxHashMap::default();
    let mut dropped = 0usize;

    for spec in specs {
        let Some(domain) = domains.get(&spec.measure) else {
            dropped += 1;
            continue;
        };

        for activity in candidates(spec.activity, &domain.activities) {
            for pressure in candidates(spec.pressure, &domain.pressures) {
                for state in candidates(spec.state, &domain.states) {
                    let case = Case {
                        measure: spec.measure,
                        activity,
                        pressure,
                        state,
                        area: spec.area,
                        coverage: spec.coverage,
                        implementation: spec.implementation,
                    };
                    let keep = match mode {
                        CaseFilterMode::Joint => links.contains(&case.link_key()),
                        CaseFilterMode::Independent => {
                            domain.activities.contains(&activity)
                                && domain.pressures.contains(&pressure)
                                && domain.states.contains(&state)
                        }
                    };
                    if keep {
                        insert_strongest(&mut cases, &mut positions, case);
                    }
                }
            }
        }
    }

    if dropped > 0 {
        debug!(dropped, "case specs without links dropped");
    }
    cases
}

fn insert_strongest(cases: &mut Vec<Case>, positions: &mut FxHashMap<CaseKey, usize>, case: Case) {
    let key = (case.measure, case.activity, case.pressure, case.state, case.area);
    match positions.get(&key) {
        Some(&i) => {
            let existing = &mut cases[i];
            let stronger = (case.coverage, case.implementation)
                .partial_cmp(&(existing.coverage, existing.implementation))
                .is_some_and(|o| o.is_gt());
            if stronger {
                existing.coverage = case.coverage;
                existing.implementation = case.implementation;
            }
        }
        None => {
            positions.insert(key, cases.len());
            cases.push(case);
        }
    }
}
