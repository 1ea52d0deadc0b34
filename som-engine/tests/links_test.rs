//! Link table building and validation.

use rand::rngs::StdRng;
use rand::SeedableRng;
use som_core::errors::{LinkError, SomErrorCode};
use som_core::types::{LinkSource, Overlap};
use som_core::{ActivityId, EmpiricalDistribution, MeasureId, PressureId, StateId};
use som_engine::links::{check_overlaps, check_unique_links, LinkTable};

fn source(m: u32, a: u32, p: u32, s: u32, dist: Option<f64>) -> LinkSource {
    LinkSource {
        measure: MeasureId(m),
        activity: ActivityId(a),
        pressure: PressureId(p),
        state: StateId(s),
        distribution: dist.map(EmpiricalDistribution::point),
    }
}

#[test]
fn build_samples_one_reduction_per_link() {
    let sources = vec![
        source(1, 0, 1, 0, Some(0.3)),
        source(1, 2, 1, 0, Some(0.6)),
        source(2, 0, 0, 4, None),
    ];
    let mut rng = StdRng::seed_from_u64(1);
    let table = LinkTable::build(&sources, &mut rng).unwrap();

    assert_eq!(table.len(), 3);
    assert_eq!(table.get(&sources[0].key()).unwrap().reduction, Some(0.3));
    assert_eq!(table.get(&sources[1].key()).unwrap().reduction, Some(0.6));
    assert_eq!(table.get(&sources[2].key()).unwrap().reduction, None);
    assert!(table.iter().all(|l| l.multiplier == 1.0));
    assert_eq!(table.for_measure(MeasureId(1)).count(), 2);
}

#[test]
fn duplicate_keys_are_rejected() {
    let sources = vec![source(1, 0, 1, 0, Some(0.3)), source(1, 0, 1, 0, Some(0.5))];
    let err = check_unique_links(&sources).unwrap_err();
    assert_eq!(err, LinkError::DuplicateLink { key: sources[0].key() });
    assert_eq!(err.error_code(), "DUPLICATE_LINK");

    let mut rng = StdRng::seed_from_u64(1);
    assert!(LinkTable::build(&sources, &mut rng).is_err());
}

#[test]
fn same_measure_different_state_is_not_a_duplicate() {
    let sources = vec![source(1, 0, 1, 0, None), source(1, 0, 1, 2, None)];
    assert!(check_unique_links(&sources).is_ok());
}

#[test]
fn overlap_multipliers_must_be_fractions() {
    let overlap = |multiplier| Overlap {
        overlapping: MeasureId(1),
        overlapped: MeasureId(2),
        pressure: PressureId(1),
        activity: ActivityId(0),
        multiplier,
    };
    assert!(check_overlaps(&[overlap(0.0), overlap(1.0)]).is_ok());
    assert!(matches!(
        check_overlaps(&[overlap(1.2)]),
        Err(LinkError::InvalidOverlapMultiplier { overlapped: 2, .. })
    ));
}
