//! Weighted picks from empirical distributions.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use som_core::EmpiricalDistribution;

/// Draw one value in [0, 1] from `dist`, weighted by bucket probability.
///
/// A missing distribution yields `None`, which downstream treats as "no effect".
pub fn pick<R: Rng + ?Sized>(dist: Option<&EmpiricalDistribution>, rng: &mut R) -> Option<f64> {
    let dist = dist?;
    let index = WeightedIndex::new(dist.weights()).ok()?;
    Some(EmpiricalDistribution::bucket_value(index.sample(rng)))
}

/// Draw `n` values from `dist`, building the weighted index once.
pub fn pick_many<R: Rng + ?Sized>(dist: &EmpiricalDistribution, n: usize, rng: &mut R) -> Vec<f64> {
    match WeightedIndex::new(dist.weights()) {
        Ok(index) => (0..n)
            .map(|_| EmpiricalDistribution::bucket_value(index.sample(rng)))
            .collect(),
        Err(_) => Vec::new(),
    }
}
