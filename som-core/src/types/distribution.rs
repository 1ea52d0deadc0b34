//! Discretized empirical distribution over [0, 1] in whole percentage points.

use serde::{Deserialize, Serialize};

use crate::constants::{DISTRIBUTION_BUCKETS, DISTRIBUTION_SUM_TOLERANCE};
use crate::errors::DistributionError;

/// 101 non-negative weights, one per percentage point 0..=100, summing to 1.
///
/// Bucket `i` holds P(value = i / 100). Construction always normalizes, so
/// every live value satisfies the sum-to-one invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct EmpiricalDistribution {
    weights: Vec<f64>,
}

impl EmpiricalDistribution {
    /// Build from raw bucket weights, normalizing them to sum to 1.
    pub fn from_weights(weights: Vec<f64>) -> Result<Self, DistributionError> {
        if weights.len() != DISTRIBUTION_BUCKETS {
            return Err(DistributionError::WrongBucketCount {
                expected: DISTRIBUTION_BUCKETS,
                actual: weights.len(),
            });
        }
        if let Some((index, &value)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(DistributionError::InvalidWeight { index, value });
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(DistributionError::EmptyDistribution);
        }
        Ok(Self {
            weights: weights.into_iter().map(|w| w / total).collect(),
        })
    }

    /// Histogram a set of picks (fractions in [0, 1]) into percentage buckets.
    ///
    /// Each pick is snapped to the nearest percentage point. Out-of-range
    /// picks are clamped. Returns `None` when there are no finite picks.
    pub fn from_picks(picks: &[f64]) -> Option<Self> {
        let mut counts = vec![0.0; DISTRIBUTION_BUCKETS];
        let mut seen = 0usize;
        for &pick in picks {
            if !pick.is_finite() {
                continue;
            }
            counts[Self::bucket_of(pick)] += 1.0;
            seen += 1;
        }
        if seen == 0 {
            return None;
        }
        let total = seen as f64;
        Some(Self {
            weights: counts.into_iter().map(|c| c / total).collect(),
        })
    }

    /// All mass on the bucket nearest to `value` (a fraction in [0, 1]).
    pub fn point(value: f64) -> Self {
        let mut weights = vec![0.0; DISTRIBUTION_BUCKETS];
        weights[Self::bucket_of(value)] = 1.0;
        Self { weights }
    }

    /// Bucket index for a fraction: rounded to 2 decimals, clamped to 0..=100.
    pub fn bucket_of(value: f64) -> usize {
        let index = (value * 100.0).round();
        index.clamp(0.0, (DISTRIBUTION_BUCKETS - 1) as f64) as usize
    }

    /// The value represented by bucket `index`.
    pub fn bucket_value(index: usize) -> f64 {
        index as f64 / (DISTRIBUTION_BUCKETS - 1) as f64
    }

    /// Bucket weights, index = percentage point.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Sum of all bucket weights (1 up to floating error).
    pub fn total(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// True when the weights sum to 1 within tolerance and none is negative.
    pub fn is_normalized(&self) -> bool {
        (self.total() - 1.0).abs() <= DISTRIBUTION_SUM_TOLERANCE * DISTRIBUTION_BUCKETS as f64
            && self.weights.iter().all(|w| *w >= 0.0)
    }

    /// Expected value of the distribution, as a fraction.
    pub fn mean(&self) -> f64 {
        self.weights
            .iter()
            .enumerate()
            .map(|(i, w)| Self::bucket_value(i) * w)
            .sum()
    }

    /// Index of the heaviest bucket. Ties resolve to the lowest index.
    pub fn mode_bucket(&self) -> usize {
        let mut best = 0;
        for (i, w) in self.weights.iter().enumerate() {
            if *w > self.weights[best] {
                best = i;
            }
        }
        best
    }

    /// Sum of absolute bucket differences against another distribution.
    pub fn l1_distance(&self, other: &EmpiricalDistribution) -> f64 {
        self.weights
            .iter()
            .zip(other.weights.iter())
            .map(|(a, b)| (a - b).abs())
            .sum()
    }
}

impl TryFrom<Vec<f64>> for EmpiricalDistribution {
    type Error = DistributionError;

    fn try_from(weights: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_weights(weights)
    }
}

impl From<EmpiricalDistribution> for Vec<f64> {
    fn from(dist: EmpiricalDistribution) -> Self {
        dist.weights
    }
}
