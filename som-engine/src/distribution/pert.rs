//! PERT distribution via `statrs` Beta sampling.
//!
//! PERT(low, peak, high; γ) = low + Beta(α, β) × (high − low) with
//! α = 1 + γ(peak − low)/(high − low), β = 1 + γ(high − peak)/(high − low).

use rand::distributions::Distribution;
use rand::Rng;
use som_core::errors::DistributionError;
use statrs::distribution::Beta;

/// A PERT distribution over [low, high] peaking at `peak`.
#[derive(Debug, Clone)]
pub struct PertDistribution {
    low: f64,
    peak: f64,
    high: f64,
    gamma: f64,
    /// `None` for the degenerate low == high case.
    beta: Option<Beta>,
}

impl PertDistribution {
    /// Create a PERT distribution. Requires `low <= peak <= high`, all finite.
    pub fn new(low: f64, peak: f64, high: f64, gamma: f64) -> Result<Self, DistributionError> {
        let invalid = |reason: &str| DistributionError::InvalidPert {
            low,
            peak,
            high,
            reason: reason.to_string(),
        };
        if !(low.is_finite() && peak.is_finite() && high.is_finite()) {
            return Err(invalid("non-finite bound"));
        }
        if !(low <= peak && peak <= high) {
            return Err(invalid("expected low <= peak <= high"));
        }
        if !(gamma.is_finite() && gamma > 0.0) {
            return Err(invalid("gamma must be positive"));
        }

        let range = high - low;
        if range == 0.0 {
            return Ok(Self {
                low,
                peak,
                high,
                gamma,
                beta: None,
            });
        }

        let alpha = 1.0 + gamma * (peak - low) / range;
        let beta = 1.0 + gamma * (high - peak) / range;
        let beta = Beta::new(alpha, beta).map_err(|e| invalid(&e.to_string()))?;

        Ok(Self {
            low,
            peak,
            high,
            gamma,
            beta: Some(beta),
        })
    }

    /// Draw one sample.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match &self.beta {
            Some(beta) => self.low + beta.sample(rng) * (self.high - self.low),
            None => self.peak,
        }
    }

    /// Draw `n` independent samples.
    pub fn sample_n<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        (0..n).map(|_| self.sample(rng)).collect()
    }

    /// Analytical mean: (low + γ·peak + high) / (γ + 2).
    pub fn mean(&self) -> f64 {
        if self.beta.is_none() {
            return self.peak;
        }
        (self.low + self.gamma * self.peak + self.high) / (self.gamma + 2.0)
    }

    pub fn is_degenerate(&self) -> bool {
        self.beta.is_none()
    }
}
