//! Property tests for case expansion and change propagation.

use proptest::prelude::*;
use som_core::config::CaseFilterMode;
use som_core::types::{ActivityContribution, Case, CaseSpec, Link, PressureContribution};
use som_core::{ActivityId, AreaId, MeasureId, PressureId, StateId};
use som_engine::cases::expand_cases;
use som_engine::links::LinkTable;
use som_engine::propagation::{ChangePropagator, PropagationInputs, PropagationOutput};

const PRESSURES: [PressureId; 3] = [PressureId(1), PressureId(2), PressureId(3)];
const STATES: [StateId; 2] = [StateId(1), StateId(2)];
const AREAS: [AreaId; 2] = [AreaId(1), AreaId(2)];

/// (measure, activity, pressure, state, reduction)
type LinkRow = (u32, u32, u32, u32, f64);

fn link_rows() -> impl Strategy<Value = Vec<LinkRow>> {
    prop::collection::vec(
        (1u32..5, 0u32..3, 0u32..4, 0u32..3, 0.0f64..=1.0),
        1..12,
    )
}

/// Links whose activity, pressure and state are all concrete ids.
fn concrete_link_rows() -> impl Strategy<Value = Vec<LinkRow>> {
    prop::collection::vec(
        (1u32..5, 1u32..3, 1u32..4, 1u32..3, 0.0f64..=1.0),
        1..12,
    )
}

fn build_links(rows: &[LinkRow]) -> LinkTable {
    let mut links: Vec<Link> = Vec::new();
    for &(m, a, p, s, r) in rows {
        let link = Link {
            measure: MeasureId(m),
            activity: ActivityId(a),
            pressure: PressureId(p),
            state: StateId(s),
            reduction: Some(r),
            multiplier: 1.0,
        };
        if !links.iter().any(|l| l.key() == link.key()) {
            links.push(link);
        }
    }
    LinkTable::from_links(links).unwrap()
}

fn wildcard_specs(coverage: f64) -> Vec<CaseSpec> {
    let mut specs = Vec::new();
    for m in 1..5 {
        for area in AREAS {
            specs.push(CaseSpec {
                id: specs.len() as u32,
                measure: MeasureId(m),
                activity: ActivityId(0),
                pressure: PressureId(0),
                state: StateId(0),
                area,
                coverage,
                implementation: 1.0,
            });
        }
    }
    specs
}

fn activity_shares(values: &[f64]) -> Vec<ActivityContribution> {
    let mut rows = Vec::new();
    let mut values = values.iter().copied().cycle();
    for area in AREAS {
        for pressure in PRESSURES {
            for a in 1..3 {
                rows.push(ActivityContribution {
                    activity: ActivityId(a),
                    pressure,
                    area,
                    value: values.next().unwrap_or(0.5),
                });
            }
        }
    }
    rows
}

fn pressure_shares(values: &[f64]) -> Vec<PressureContribution> {
    let mut rows = Vec::new();
    let mut values = values.iter().copied().cycle();
    for area in AREAS {
        for state in STATES {
            for pressure in PRESSURES {
                rows.push(PressureContribution {
                    state,
                    pressure,
                    area,
                    value: values.next().unwrap_or(0.3),
                });
            }
        }
    }
    rows
}

fn propagate(
    links: &LinkTable,
    cases: &[Case],
    activity: &[ActivityContribution],
    pressure: &[PressureContribution],
    steps: u32,
) -> PropagationOutput {
    ChangePropagator::new(steps)
        .with_history(true)
        .run(&PropagationInputs {
            pressures: &PRESSURES,
            states: &STATES,
            areas: &AREAS,
            links,
            cases,
            overlaps: &[],
            subpressures: &[],
            activity_contributions: activity,
            pressure_contributions: pressure,
            thresholds: &[],
        })
        .unwrap()
}

// Levels stay in [0, 1] and never rise across time steps.
proptest! {
    #[test]
    fn prop_levels_bounded_and_monotone(
        rows in link_rows(),
        coverage in 0.0f64..=1.0,
        a_values in prop::collection::vec(0.0f64..=1.0, 1..6),
        p_values in prop::collection::vec(0.0f64..=1.0, 1..6),
        steps in 1u32..4,
    ) {
        let links = build_links(&rows);
        let cases = expand_cases(&wildcard_specs(coverage), &links, CaseFilterMode::Joint);
        let out = propagate(&links, &cases, &activity_shares(&a_values), &pressure_shares(&p_values), steps);

        let mut previous: Option<&som_engine::propagation::StepSnapshot> = None;
        for snapshot in &out.history {
            for (id, area, value) in snapshot.pressure_levels.cells() {
                let v = *value.unwrap();
                prop_assert!((-1e-12..=1.0 + 1e-12).contains(&v));
                if let Some(prev) = previous {
                    prop_assert!(v <= prev.pressure_levels.value(id, area).unwrap() + 1e-12);
                }
            }
            for (id, area, value) in snapshot.total_pressure_load_levels.cells() {
                let v = *value.unwrap();
                prop_assert!((-1e-12..=1.0 + 1e-12).contains(&v));
                if let Some(prev) = previous {
                    prop_assert!(v <= prev.total_pressure_load_levels.value(id, area).unwrap() + 1e-12);
                }
            }
            previous = Some(snapshot);
        }
    }
}

// Contribution shares of every group stay within [0, 1] after propagation.
proptest! {
    #[test]
    fn prop_contribution_groups_stay_bounded(
        rows in link_rows(),
        a_values in prop::collection::vec(0.0f64..=1.0, 1..6),
        p_values in prop::collection::vec(0.0f64..=1.0, 1..6),
    ) {
        let links = build_links(&rows);
        let cases = expand_cases(&wildcard_specs(1.0), &links, CaseFilterMode::Joint);
        let out = propagate(&links, &cases, &activity_shares(&a_values), &pressure_shares(&p_values), 2);

        for area in AREAS {
            for pressure in PRESSURES {
                let sum: f64 = out.activity_contributions.iter()
                    .filter(|c| c.area == area && c.pressure == pressure)
                    .map(|c| { assert!(c.value >= 0.0); c.value })
                    .sum();
                prop_assert!(sum <= 1.0 + 1e-9, "activity share sum {}", sum);
            }
            for state in STATES {
                let sum: f64 = out.pressure_contributions.iter()
                    .filter(|c| c.area == area && c.state == state)
                    .map(|c| { assert!(c.value >= 0.0); c.value })
                    .sum();
                prop_assert!(sum <= 1.0 + 1e-9, "pressure share sum {}", sum);
            }
        }
    }
}

// Expanding already-concrete cases reproduces them.
proptest! {
    #[test]
    fn prop_expansion_idempotent_on_concrete_cases(rows in concrete_link_rows(), coverage in 0.0f64..=1.0) {
        let links = build_links(&rows);
        let first = expand_cases(&wildcard_specs(coverage), &links, CaseFilterMode::Joint);
        let respecs: Vec<CaseSpec> = first
            .iter()
            .enumerate()
            .map(|(i, c)| CaseSpec {
                id: i as u32,
                measure: c.measure,
                activity: c.activity,
                pressure: c.pressure,
                state: c.state,
                area: c.area,
                coverage: c.coverage,
                implementation: c.implementation,
            })
            .collect();
        let second = expand_cases(&respecs, &links, CaseFilterMode::Joint);
        prop_assert_eq!(first, second);
    }
}
