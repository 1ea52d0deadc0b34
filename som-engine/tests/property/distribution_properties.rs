//! Property tests for distribution synthesis and picks.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use som_core::EmpiricalDistribution;
use som_engine::distribution::{pick, DistributionSynthesizer, ExpertEstimate};

fn synth() -> DistributionSynthesizer {
    DistributionSynthesizer::new().with_picks_per_expert(200)
}

// Synthesized distributions are normalized and only put mass between the
// lowest and highest expert bound.
proptest! {
    #[test]
    fn prop_synthesized_mass_within_bounds(
        experts in prop::collection::vec((0.0f64..=100.0, 0.0f64..=100.0, 0.0f64..=100.0, 0.1f64..3.0), 1..5),
        seed in 0u64..1000,
    ) {
        let estimates: Vec<ExpertEstimate> = experts
            .iter()
            .map(|&(e, l, u, w)| ExpertEstimate::new(Some(e), Some(l), Some(u), w))
            .collect();
        let mut rng = StdRng::seed_from_u64(seed);
        let dist = synth().synthesize_estimates(&estimates, &mut rng).unwrap().unwrap();

        prop_assert!(dist.is_normalized());

        let lowest = experts.iter().map(|&(e, l, u, _)| e.min(l).min(u)).fold(f64::INFINITY, f64::min);
        let highest = experts.iter().map(|&(e, l, u, _)| e.max(l).max(u)).fold(0.0, f64::max);
        let first = EmpiricalDistribution::bucket_of(lowest / 100.0);
        let last = EmpiricalDistribution::bucket_of(highest / 100.0);
        for (i, w) in dist.weights().iter().enumerate() {
            if i < first || i > last {
                prop_assert_eq!(*w, 0.0);
            }
        }
    }
}

// Picks always land on a bucket that carries mass.
proptest! {
    #[test]
    fn prop_pick_lands_on_weighted_bucket(
        raw in prop::collection::vec(0.0f64..1.0, 101),
        hot in 0usize..101,
        seed in 0u64..1000,
    ) {
        let mut weights = raw;
        weights[hot] += 1.0;
        let dist = EmpiricalDistribution::from_weights(weights).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let value = pick(Some(&dist), &mut rng).unwrap();

        prop_assert!((0.0..=1.0).contains(&value));
        prop_assert!(dist.weights()[EmpiricalDistribution::bucket_of(value)] > 0.0);
    }
}

// Same seed, same synthesized distribution.
proptest! {
    #[test]
    fn prop_synthesis_is_deterministic(low in 0.0f64..50.0, span in 0.0f64..50.0, seed in 0u64..1000) {
        let estimate = ExpertEstimate::new(Some(low + span / 2.0), Some(low), Some(low + span), 1.0);
        let a = synth().synthesize_estimates(&[estimate], &mut StdRng::seed_from_u64(seed)).unwrap();
        let b = synth().synthesize_estimates(&[estimate], &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(a, b);
    }
}
