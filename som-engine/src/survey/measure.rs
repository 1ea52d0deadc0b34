//! Measure effectiveness survey.
//!
//! A block asks every expert for the expected effect (and its uncertainty
//! range) of a set of measures on the same activity/pressure/state
//! combinations. Answers are rescaled so each expert's most effective
//! measure in the block lands on that expert's stated maximum effectiveness.

use rand::Rng;
use serde::{Deserialize, Serialize};
use som_core::errors::SurveyError;
use som_core::types::{ActivityId, LinkSource, MeasureId, PressureId, StateId};
use tracing::debug;

use crate::distribution::{DistributionSynthesizer, ExpertEstimate};

/// One block of the measure effectiveness survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureSurveyBlock {
    pub survey: u32,
    pub block: u32,
    /// Question columns, one measure each.
    pub measures: Vec<MeasureId>,
    /// Empty means the wildcard id 0.
    #[serde(default)]
    pub activities: Vec<ActivityId>,
    #[serde(default)]
    pub pressures: Vec<PressureId>,
    #[serde(default)]
    pub states: Vec<StateId>,
    pub experts: Vec<MeasureExpertAnswers>,
}

/// One expert's answers for a block, aligned with the block's `measures`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureExpertAnswers {
    pub expected: Vec<Option<f64>>,
    pub variance: Vec<Option<f64>>,
    /// The effectiveness the expert assigns to the block's best measure.
    pub max_effectiveness: Option<f64>,
    /// Missing weight counts as 1.
    #[serde(default)]
    pub weight: Option<f64>,
}

/// Effectiveness range `(lower, upper)` around `expected` with width `variance`,
/// shifted to stay inside [0, 100].
pub fn effectiveness_bounds(expected: f64, variance: f64) -> (f64, f64) {
    let half = variance / 2.0;
    let lower = if expected + half > 100.0 {
        100.0 - variance
    } else {
        expected - half
    };
    let upper = if expected - half < 0.0 {
        variance
    } else {
        expected + half
    };
    (lower.max(0.0), upper.min(100.0))
}

/// Turn measure survey blocks into link sources.
///
/// Every measure in a block gets one distribution, shared by every
/// (activity, pressure, state) combination the block lists.
pub fn process_measure_survey<R: Rng + ?Sized>(
    blocks: &[MeasureSurveyBlock],
    synthesizer: &DistributionSynthesizer,
    rng: &mut R,
) -> Result<Vec<LinkSource>, SurveyError> {
    let mut sources = Vec::new();

    for block in blocks {
        let estimates = block_estimates(block)?;

        let activities = or_wildcard(&block.activities);
        let pressures = or_wildcard(&block.pressures);
        let states = or_wildcard(&block.states);

        for (column, measure) in block.measures.iter().enumerate() {
            let distribution = synthesizer.synthesize_estimates(&estimates[column], rng)?;
            if distribution.is_none() {
                debug!(block = block.block, measure = %measure, "no expert answered measure");
            }
            for &activity in &activities {
                for &pressure in &pressures {
                    for &state in &states {
                        sources.push(LinkSource {
                            measure: *measure,
                            activity,
                            pressure,
                            state,
                            distribution: distribution.clone(),
                        });
                    }
                }
            }
        }
    }

    Ok(sources)
}

/// Rescaled per-measure estimates: `result[column][expert]`.
fn block_estimates(block: &MeasureSurveyBlock) -> Result<Vec<Vec<ExpertEstimate>>, SurveyError> {
    let columns = block.measures.len();
    let mut estimates = vec![Vec::with_capacity(block.experts.len()); columns];

    for (expert, answers) in block.experts.iter().enumerate() {
        for len in [answers.expected.len(), answers.variance.len()] {
            if len != columns {
                return Err(SurveyError::BlockShapeMismatch {
                    block: block.block,
                    expert,
                    expected: columns,
                    actual: len,
                });
            }
        }

        let expected = rescale_expected(answers);
        let weight = answers.weight.filter(|w| w.is_finite()).unwrap_or(1.0);

        for (column, slot) in estimates.iter_mut().enumerate() {
            let (lower, upper) = match (expected[column], answers.variance[column]) {
                (Some(e), Some(v)) if v.is_finite() => {
                    let (lo, hi) = effectiveness_bounds(e, v);
                    (Some(lo), Some(hi))
                }
                _ => (None, None),
            };
            slot.push(ExpertEstimate::new(expected[column], lower, upper, weight));
        }
    }

    Ok(estimates)
}

/// Scale an expert's expected values so the block maximum equals their
/// stated maximum effectiveness.
fn rescale_expected(answers: &MeasureExpertAnswers) -> Vec<Option<f64>> {
    let present = |v: &Option<f64>| v.filter(|x| x.is_finite());
    let expected: Vec<Option<f64>> = answers.expected.iter().map(present).collect();

    // An expert with no expected values or no variances gave no usable answer.
    if expected.iter().all(Option::is_none) || answers.variance.iter().all(|v| present(v).is_none()) {
        return vec![None; expected.len()];
    }

    let Some(max_effectiveness) = answers.max_effectiveness.filter(|m| m.is_finite()) else {
        return vec![None; expected.len()];
    };

    let max_expected = expected
        .iter()
        .flatten()
        .fold(f64::NEG_INFINITY, |acc, v| acc.max(*v));

    if max_effectiveness == 0.0 || max_expected == 0.0 {
        return vec![Some(0.0); expected.len()];
    }

    let scale = max_expected / max_effectiveness;
    expected.into_iter().map(|e| e.map(|v| v / scale)).collect()
}

fn or_wildcard<T: Copy + Default>(ids: &[T]) -> Vec<T> {
    if ids.is_empty() {
        vec![T::default()]
    } else {
        ids.to_vec()
    }
}
