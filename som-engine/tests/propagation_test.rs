//! Change propagation through pressures and states.

use som_core::config::{EquivalenceClass, PropagationConfig};
use som_core::errors::PropagationError;
use som_core::types::{
    ActivityContribution, Case, Link, Overlap, PressureContribution, Subpressure, Threshold,
    ThresholdLevel,
};
use som_core::{ActivityId, AreaId, MeasureId, PressureId, StateId};
use som_engine::links::LinkTable;
use som_engine::propagation::{ChangePropagator, PropagationInputs, PropagationOutput};

const AREA: AreaId = AreaId(1);
const P: PressureId = PressureId(1);
const Q: PressureId = PressureId(2);
const S: StateId = StateId(1);

fn link(m: u32, a: u32, p: u32, s: u32, reduction: f64) -> Link {
    Link {
        measure: MeasureId(m),
        activity: ActivityId(a),
        pressure: PressureId(p),
        state: StateId(s),
        reduction: Some(reduction),
        multiplier: 1.0,
    }
}

fn case_of(link: &Link) -> Case {
    Case {
        measure: link.measure,
        activity: link.activity,
        pressure: link.pressure,
        state: link.state,
        area: AREA,
        coverage: 1.0,
        implementation: 1.0,
    }
}

/// A small system description; `run` wires it into `PropagationInputs`.
#[derive(Default)]
struct System {
    links: Vec<Link>,
    cases: Vec<Case>,
    overlaps: Vec<Overlap>,
    subpressures: Vec<Subpressure>,
    activity_contributions: Vec<ActivityContribution>,
    pressure_contributions: Vec<PressureContribution>,
    thresholds: Vec<Threshold>,
}

impl System {
    fn with_links(links: Vec<Link>) -> Self {
        let cases = links.iter().map(case_of).collect();
        Self {
            links,
            cases,
            ..Default::default()
        }
    }

    fn run(&self, propagator: &ChangePropagator) -> Result<PropagationOutput, PropagationError> {
        let table = LinkTable::from_links(self.links.clone()).unwrap();
        propagator.run(&PropagationInputs {
            pressures: &[P, Q],
            states: &[S],
            areas: &[AREA],
            links: &table,
            cases: &self.cases,
            overlaps: &self.overlaps,
            subpressures: &self.subpressures,
            activity_contributions: &self.activity_contributions,
            pressure_contributions: &self.pressure_contributions,
            thresholds: &self.thresholds,
        })
    }
}

fn approx(a: Option<f64>, b: f64) {
    let a = a.expect("cell present");
    assert!((a - b).abs() < 1e-12, "{a} != {b}");
}

#[test]
fn direct_pressure_reduction() {
    let out = System::with_links(vec![link(1, 0, 1, 0, 0.5)])
        .run(&ChangePropagator::new(1))
        .unwrap();
    approx(out.pressure_levels.value(P, AREA), 0.5);
    approx(out.pressure_levels.value(Q, AREA), 1.0);
}

#[test]
fn overlapping_measure_weakens_overlapped() {
    let mut system = System::with_links(vec![link(1, 0, 1, 0, 0.5), link(2, 0, 1, 0, 0.5)]);
    system.overlaps.push(Overlap {
        overlapping: MeasureId(1),
        overlapped: MeasureId(2),
        pressure: P,
        activity: ActivityId(0),
        multiplier: 0.5,
    });
    let out = system.run(&ChangePropagator::new(1)).unwrap();
    approx(out.pressure_levels.value(P, AREA), 0.375);
}

#[test]
fn overlap_needs_the_overlapping_measure_in_the_area() {
    let mut system = System::with_links(vec![link(1, 0, 1, 0, 0.5), link(2, 0, 1, 0, 0.5)]);
    system.cases.retain(|c| c.measure == MeasureId(2));
    system.overlaps.push(Overlap {
        overlapping: MeasureId(1),
        overlapped: MeasureId(2),
        pressure: P,
        activity: ActivityId(0),
        multiplier: 0.5,
    });
    let out = system.run(&ChangePropagator::new(1)).unwrap();
    approx(out.pressure_levels.value(P, AREA), 0.5);
}

#[test]
fn subpressure_reduction_counts_toward_state() {
    let mut system = System::with_links(vec![link(1, 0, 2, 0, 1.0)]);
    system.pressure_contributions.push(PressureContribution {
        state: S,
        pressure: P,
        area: AREA,
        value: 1.0,
    });
    system.subpressures.push(Subpressure {
        state: S,
        state_pressure: P,
        reduced_pressure: Q,
        equivalence: 0.5,
    });
    let out = system.run(&ChangePropagator::new(1)).unwrap();
    approx(out.pressure_levels.value(Q, AREA), 0.0);
    approx(out.total_pressure_load_levels.value(S, AREA), 0.5);
    approx(out.total_pressure_load_reductions.value(S, AREA), 0.5);
}

#[test]
fn subpressure_class_resolves_through_config() {
    let mut system = System::with_links(vec![link(1, 0, 2, 0, 1.0)]);
    system.pressure_contributions.push(PressureContribution {
        state: S,
        pressure: P,
        area: AREA,
        value: 1.0,
    });
    system.subpressures.push(Subpressure {
        state: S,
        state_pressure: P,
        reduced_pressure: Q,
        equivalence: 2.0,
    });
    let propagator = ChangePropagator::new(1).with_propagation_config(PropagationConfig {
        equivalence_classes: vec![EquivalenceClass {
            class: 2,
            multiplier: 0.25,
        }],
        ..Default::default()
    });
    let out = system.run(&propagator).unwrap();
    approx(out.total_pressure_load_levels.value(S, AREA), 0.75);

    // without the class table, class 2 contributes nothing
    let out = system.run(&ChangePropagator::new(1)).unwrap();
    approx(out.total_pressure_load_levels.value(S, AREA), 1.0);
}

#[test]
fn combined_reduction_above_one_fails() {
    let mut system = System::with_links(vec![link(1, 0, 1, 0, 1.0), link(2, 0, 2, 0, 1.0)]);
    system.pressure_contributions.push(PressureContribution {
        state: S,
        pressure: P,
        area: AREA,
        value: 1.0,
    });
    system.subpressures.push(Subpressure {
        state: S,
        state_pressure: P,
        reduced_pressure: Q,
        equivalence: 1.0,
    });
    let err = system.run(&ChangePropagator::new(1)).unwrap_err();
    assert!(matches!(
        err,
        PropagationError::ReductionOverflow { state: 1, pressure: 1, area: 1, .. }
    ));
}

#[test]
fn activity_contribution_weights_reduction_and_renormalizes() {
    let mut system = System::with_links(vec![link(1, 1, 1, 0, 0.5)]);
    system.activity_contributions = vec![
        ActivityContribution {
            activity: ActivityId(1),
            pressure: P,
            area: AREA,
            value: 0.4,
        },
        ActivityContribution {
            activity: ActivityId(2),
            pressure: P,
            area: AREA,
            value: 0.6,
        },
    ];
    let out = system.run(&ChangePropagator::new(1)).unwrap();
    approx(out.pressure_levels.value(P, AREA), 0.8);

    let share = |a: u32| {
        out.activity_contributions
            .iter()
            .find(|c| c.activity == ActivityId(a))
            .map(|c| c.value)
    };
    approx(share(1), 0.25);
    approx(share(2), 0.75);
}

#[test]
fn unlisted_activity_contributes_nothing() {
    let out = System::with_links(vec![link(1, 3, 1, 0, 0.9)])
        .run(&ChangePropagator::new(1))
        .unwrap();
    approx(out.pressure_levels.value(P, AREA), 1.0);
}

#[test]
fn direct_state_reduction() {
    let out = System::with_links(vec![link(1, 0, 0, 1, 0.4)])
        .run(&ChangePropagator::new(1))
        .unwrap();
    approx(out.total_pressure_load_levels.value(S, AREA), 0.6);
    approx(out.pressure_levels.value(P, AREA), 1.0);
}

#[test]
fn coverage_and_implementation_scale_reduction() {
    let mut system = System::with_links(vec![link(1, 0, 1, 0, 0.8)]);
    system.cases[0].coverage = 0.5;
    system.cases[0].implementation = 0.5;
    let out = system.run(&ChangePropagator::new(1)).unwrap();
    approx(out.pressure_levels.value(P, AREA), 0.8);
}

#[test]
fn link_without_reduction_has_no_effect() {
    let mut system = System::with_links(vec![link(1, 0, 1, 0, 0.5)]);
    system.links[0].reduction = None;
    let out = system.run(&ChangePropagator::new(1)).unwrap();
    approx(out.pressure_levels.value(P, AREA), 1.0);
}

#[test]
fn time_steps_compound_and_history_is_monotone() {
    let mut system = System::with_links(vec![link(1, 0, 1, 0, 0.5)]);
    system.pressure_contributions.push(PressureContribution {
        state: S,
        pressure: P,
        area: AREA,
        value: 1.0,
    });
    let out = system
        .run(&ChangePropagator::new(3).with_history(true))
        .unwrap();
    approx(out.pressure_levels.value(P, AREA), 0.125);
    assert_eq!(out.history.len(), 3);

    let mut previous = (1.0, 1.0);
    for snapshot in &out.history {
        let p = snapshot.pressure_levels.value(P, AREA).unwrap();
        let s = snapshot.total_pressure_load_levels.value(S, AREA).unwrap();
        assert!(p <= previous.0 && s <= previous.1);
        previous = (p, s);
    }
}

#[test]
fn zero_time_steps_is_an_error() {
    let err = System::default().run(&ChangePropagator::new(0)).unwrap_err();
    assert_eq!(err, PropagationError::NoTimeSteps);
}

#[test]
fn thresholds_fill_their_tables() {
    let mut system = System::default();
    system.thresholds.push(Threshold {
        state: S,
        area: AREA,
        values: [Some(0.3), None, Some(0.1), None],
    });
    let out = system.run(&ChangePropagator::new(1)).unwrap();
    approx(out.threshold(ThresholdLevel::Ges).unwrap().value(S, AREA), 0.3);
    approx(
        out.threshold(ThresholdLevel::Improvement25).unwrap().value(S, AREA),
        0.1,
    );
    assert_eq!(
        out.threshold(ThresholdLevel::Improvement10).unwrap().value(S, AREA),
        None
    );
}

#[test]
fn overfull_contributions_are_rescaled_first() {
    let mut system = System::with_links(vec![link(1, 1, 1, 0, 1.0)]);
    for a in [1, 2] {
        system.activity_contributions.push(ActivityContribution {
            activity: ActivityId(a),
            pressure: P,
            area: AREA,
            value: 0.8,
        });
    }
    let out = system.run(&ChangePropagator::new(1)).unwrap();
    // shares rescaled to 0.5 each before the reduction
    approx(out.pressure_levels.value(P, AREA), 0.5);
}
