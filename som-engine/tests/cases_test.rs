//! Case validation and wildcard expansion.

use som_core::config::CaseFilterMode;
use som_core::errors::CaseError;
use som_core::types::{CaseSpec, Link};
use som_core::{ActivityId, AreaId, MeasureId, PressureId, StateId};
use som_engine::cases::{expand_cases, validate_case_specs};
use som_engine::links::LinkTable;

fn link(m: u32, a: u32, p: u32, s: u32) -> Link {
    Link {
        measure: MeasureId(m),
        activity: ActivityId(a),
        pressure: PressureId(p),
        state: StateId(s),
        reduction: Some(0.5),
        multiplier: 1.0,
    }
}

fn spec(id: u32, m: u32, a: u32, p: u32, s: u32, area: u32, coverage: f64) -> CaseSpec {
    CaseSpec {
        id,
        measure: MeasureId(m),
        activity: ActivityId(a),
        pressure: PressureId(p),
        state: StateId(s),
        area: AreaId(area),
        coverage,
        implementation: 1.0,
    }
}

fn table() -> LinkTable {
    LinkTable::from_links(vec![
        link(1, 1, 1, 0),
        link(1, 2, 2, 0),
        link(2, 0, 0, 5),
    ])
    .unwrap()
}

#[test]
fn wildcards_expand_to_measure_links() {
    let cases = expand_cases(&[spec(1, 1, 0, 0, 0, 7, 1.0)], &table(), CaseFilterMode::Joint);
    let keys: Vec<(u32, u32)> = cases.iter().map(|c| (c.activity.raw(), c.pressure.raw())).collect();
    assert_eq!(keys, vec![(1, 1), (2, 2)]);
    assert!(cases.iter().all(|c| c.area == AreaId(7)));
}

#[test]
fn independent_filter_admits_cross_combinations() {
    let cases = expand_cases(
        &[spec(1, 1, 0, 0, 0, 7, 1.0)],
        &table(),
        CaseFilterMode::Independent,
    );
    // activities {1,2} x pressures {1,2}
    assert_eq!(cases.len(), 4);
}

#[test]
fn measure_without_links_is_dropped() {
    let cases = expand_cases(&[spec(1, 9, 0, 0, 0, 1, 1.0)], &table(), CaseFilterMode::Joint);
    assert!(cases.is_empty());
}

#[test]
fn literal_fields_outside_links_are_filtered() {
    let cases = expand_cases(&[spec(1, 1, 1, 2, 0, 1, 1.0)], &table(), CaseFilterMode::Joint);
    assert!(cases.is_empty());
}

#[test]
fn duplicates_keep_strongest_coverage() {
    let cases = expand_cases(
        &[spec(1, 2, 0, 0, 0, 3, 0.4), spec(2, 2, 0, 0, 5, 3, 0.9), spec(3, 2, 0, 0, 0, 3, 0.6)],
        &table(),
        CaseFilterMode::Joint,
    );
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].state, StateId(5));
    assert_eq!(cases[0].coverage, 0.9);
}

#[test]
fn concrete_cases_expand_to_themselves() {
    let first = expand_cases(&[spec(1, 1, 0, 0, 0, 1, 0.5)], &table(), CaseFilterMode::Joint);
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
    let second = expand_cases(&respecs, &table(), CaseFilterMode::Joint);
    assert_eq!(first, second);
}

#[test]
fn validation_rejects_duplicate_ids_and_bad_fractions() {
    assert_eq!(
        validate_case_specs(&[spec(1, 1, 0, 0, 0, 1, 1.0), spec(1, 2, 0, 0, 0, 1, 1.0)]),
        Err(CaseError::DuplicateCaseId { id: 1 })
    );
    assert!(matches!(
        validate_case_specs(&[spec(4, 1, 0, 0, 0, 1, 1.5)]),
        Err(CaseError::FractionOutOfRange { id: 4, field: "coverage", .. })
    ));
}
