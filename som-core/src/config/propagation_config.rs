//! Case expansion and change propagation configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_REDUCTION_TOLERANCE;

/// How expanded cases are matched against the link table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseFilterMode {
    /// Keep a row only if its exact (measure, activity, pressure, state) is a link.
    #[default]
    Joint,
    /// Keep a row if each of the four fields appears somewhere in the links.
    /// Admits combinations that are not links; kept for comparison runs.
    Independent,
}

/// Multiplier for one subpressure equivalence class (classes >= 2).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquivalenceClass {
    pub class: u32,
    pub multiplier: f64,
}

/// Configuration for case expansion and the propagation loop.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PropagationConfig {
    /// Link membership filter for expanded cases. Default: joint.
    pub case_filter: Option<CaseFilterMode>,
    /// Multipliers for equivalence classes >= 2. Unlisted classes map to 0.
    #[serde(default)]
    pub equivalence_classes: Vec<EquivalenceClass>,
    /// Slack allowed above 1 for combined pressure reductions. Default: 1e-9.
    pub reduction_tolerance: Option<f64>,
}

impl PropagationConfig {
    pub fn effective_case_filter(&self) -> CaseFilterMode {
        self.case_filter.unwrap_or_default()
    }

    pub fn effective_reduction_tolerance(&self) -> f64 {
        self.reduction_tolerance.unwrap_or(DEFAULT_REDUCTION_TOLERANCE)
    }

    /// Resolve a subpressure equivalence value into its multiplier.
    ///
    /// Values <= 1 are proportional and used as-is. Larger values are
    /// classes looked up in `equivalence_classes`, defaulting to 0.
    pub fn equivalence_multiplier(&self, equivalence: f64) -> f64 {
        if !equivalence.is_finite() || equivalence < 0.0 {
            return 0.0;
        }
        if equivalence <= 1.0 {
            return equivalence;
        }
        let class = equivalence.round() as u32;
        self.equivalence_classes
            .iter()
            .find(|c| c.class == class)
            .map(|c| c.multiplier)
            .unwrap_or(0.0)
    }
}
