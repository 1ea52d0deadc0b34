//! Expert estimates → pooled PERT samples → empirical distribution.

use rand::Rng;
use som_core::config::SamplingConfig;
use som_core::constants::{DEFAULT_PERT_GAMMA, DEFAULT_PICKS_PER_EXPERT};
use som_core::errors::DistributionError;
use som_core::EmpiricalDistribution;

use super::pert::PertDistribution;

/// One expert's answer, in percentage points (0..=100).
///
/// Any missing bound excludes the expert. Bounds are sorted before use,
/// so an expert who swapped `lower` and `expected` still contributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpertEstimate {
    pub expected: Option<f64>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub weight: f64,
}

impl ExpertEstimate {
    pub fn new(expected: Option<f64>, lower: Option<f64>, upper: Option<f64>, weight: f64) -> Self {
        Self {
            expected,
            lower,
            upper,
            weight,
        }
    }

    /// Sorted (low, peak, high), or `None` if any bound is missing or NaN.
    pub fn triple(&self) -> Option<(f64, f64, f64)> {
        let present = |v: Option<f64>| v.filter(|x| x.is_finite());
        let mut values = [
            present(self.lower)?,
            present(self.expected)?,
            present(self.upper)?,
        ];
        values.sort_by(f64::total_cmp);
        Some((values[0], values[1], values[2]))
    }
}

/// Builds empirical distributions from weighted expert estimates.
///
/// Each expert contributes `round(weight × picks_per_expert)` PERT samples.
/// The pooled samples are converted from percent to fractions and
/// histogrammed into 101 buckets.
#[derive(Debug, Clone, Copy)]
pub struct DistributionSynthesizer {
    picks_per_expert: u32,
    gamma: f64,
}

impl Default for DistributionSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl DistributionSynthesizer {
    pub fn new() -> Self {
        Self {
            picks_per_expert: DEFAULT_PICKS_PER_EXPERT,
            gamma: DEFAULT_PERT_GAMMA,
        }
    }

    pub fn from_config(config: &SamplingConfig) -> Self {
        Self {
            picks_per_expert: config.effective_picks_per_expert(),
            gamma: config.effective_pert_gamma(),
        }
    }

    pub fn with_picks_per_expert(mut self, picks: u32) -> Self {
        self.picks_per_expert = picks;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn picks_per_expert(&self) -> u32 {
        self.picks_per_expert
    }

    /// Synthesize from parallel columns of expert answers.
    ///
    /// All four slices must have the same length.
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        expecteds: &[Option<f64>],
        lowers: &[Option<f64>],
        uppers: &[Option<f64>],
        weights: &[f64],
        rng: &mut R,
    ) -> Result<Option<EmpiricalDistribution>, DistributionError> {
        let n = expecteds.len();
        if lowers.len() != n || uppers.len() != n || weights.len() != n {
            return Err(DistributionError::MismatchedInputs {
                expecteds: n,
                lowers: lowers.len(),
                uppers: uppers.len(),
                weights: weights.len(),
            });
        }
        let estimates: Vec<ExpertEstimate> = (0..n)
            .map(|i| ExpertEstimate::new(expecteds[i], lowers[i], uppers[i], weights[i]))
            .collect();
        self.synthesize_estimates(&estimates, rng)
    }

    /// Synthesize from a list of expert estimates.
    ///
    /// Returns `Ok(None)` when no expert produced a single sample.
    pub fn synthesize_estimates<R: Rng + ?Sized>(
        &self,
        estimates: &[ExpertEstimate],
        rng: &mut R,
    ) -> Result<Option<EmpiricalDistribution>, DistributionError> {
        let mut picks = Vec::new();
        for estimate in estimates {
            let Some((low, peak, high)) = estimate.triple() else {
                continue;
            };
            let count = self.pick_count(estimate.weight);
            if count == 0 {
                continue;
            }
            let pert = PertDistribution::new(low, peak, high, self.gamma)?;
            picks.extend(pert.sample_n(count, rng).into_iter().map(|v| v / 100.0));
        }
        Ok(EmpiricalDistribution::from_picks(&picks))
    }

    fn pick_count(&self, weight: f64) -> usize {
        if !weight.is_finite() || weight <= 0.0 {
            return 0;
        }
        (weight * self.picks_per_expert as f64).round() as usize
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn triple_is_sorted() {
        let e = ExpertEstimate::new(Some(10.0), Some(30.0), Some(20.0), 1.0);
        assert_eq!(e.triple(), Some((10.0, 20.0, 30.0)));
    }

    #[test]
    fn triple_rejects_missing_and_nan() {
        assert!(ExpertEstimate::new(None, Some(1.0), Some(2.0), 1.0).triple().is_none());
        assert!(ExpertEstimate::new(Some(f64::NAN), Some(1.0), Some(2.0), 1.0)
            .triple()
            .is_none());
    }

    #[test]
    fn zero_weight_expert_is_skipped() {
        let synth = DistributionSynthesizer::new().with_picks_per_expert(100);
        let mut rng = StdRng::seed_from_u64(3);
        let dist = synth
            .synthesize(&[Some(50.0)], &[Some(40.0)], &[Some(60.0)], &[0.0], &mut rng)
            .unwrap();
        assert!(dist.is_none());
    }
}
