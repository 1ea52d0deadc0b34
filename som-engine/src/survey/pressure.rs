//! Pressure significance survey.
//!
//! Each question concerns one state in a set of areas. Experts list up to
//! six pressures with relative significances and estimate the reduction
//! thresholds the state needs. Significances become pressure contribution
//! distributions; thresholds become per-level threshold distributions.

use rand::Rng;
use serde::{Deserialize, Serialize};
use som_core::constants::MAX_PRESSURES_PER_ANSWER;
use som_core::errors::SurveyError;
use som_core::types::collections::BTreeMap;
use som_core::types::{
    AreaId, PressureContributionSource, PressureId, StateId, ThresholdLevel, ThresholdSource,
};

use super::Estimate;
use crate::distribution::{DistributionSynthesizer, ExpertEstimate};

/// One sheet of the pressure survey: questions plus every expert's answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressureSurvey {
    pub survey: u32,
    pub questions: Vec<PressureQuestion>,
    pub experts: Vec<PressureExpertSheet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressureQuestion {
    pub question: u32,
    pub state: StateId,
    pub areas: Vec<AreaId>,
    /// Expert id → weight for this question. Unlisted experts weigh 1.
    #[serde(default)]
    pub weights: BTreeMap<u32, f64>,
}

/// One expert's answers, aligned with the survey's `questions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressureExpertSheet {
    pub expert: u32,
    pub answers: Vec<PressureAnswer>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PressureAnswer {
    pub pressures: Vec<SignificanceEntry>,
    pub thresholds: ThresholdEstimates,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignificanceEntry {
    pub pressure: PressureId,
    pub significance: f64,
}

/// Threshold estimates (percent reduction) per improvement level.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdEstimates {
    pub ges: Estimate,
    pub improvement_10: Estimate,
    pub improvement_25: Estimate,
    pub improvement_50: Estimate,
}

impl ThresholdEstimates {
    pub fn get(&self, level: ThresholdLevel) -> &Estimate {
        match level {
            ThresholdLevel::Ges => &self.ges,
            ThresholdLevel::Improvement10 => &self.improvement_10,
            ThresholdLevel::Improvement25 => &self.improvement_25,
            ThresholdLevel::Improvement50 => &self.improvement_50,
        }
    }
}

/// Tables produced by the pressure survey.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PressureSurveyOutput {
    pub contributions: Vec<PressureContributionSource>,
    pub thresholds: Vec<ThresholdSource>,
}

/// Process pressure survey sheets into contribution and threshold tables.
///
/// Questions without any pressure or without any threshold answer are
/// dropped. Rows are exploded per area of the question.
pub fn process_pressure_survey<R: Rng + ?Sized>(
    surveys: &[PressureSurvey],
    synthesizer: &DistributionSynthesizer,
    rng: &mut R,
) -> Result<PressureSurveyOutput, SurveyError> {
    let mut output = PressureSurveyOutput::default();

    for survey in surveys {
        for sheet in &survey.experts {
            if sheet.answers.len() != survey.questions.len() {
                return Err(SurveyError::InconsistentAnswerCount {
                    survey: survey.survey,
                    expert: sheet.expert,
                    expected: survey.questions.len(),
                    actual: sheet.answers.len(),
                });
            }
        }

        for (index, question) in survey.questions.iter().enumerate() {
            let answers: Vec<(f64, &PressureAnswer)> = survey
                .experts
                .iter()
                .map(|sheet| {
                    let weight = question.weights.get(&sheet.expert).copied().unwrap_or(1.0);
                    (weight, &sheet.answers[index])
                })
                .collect();

            let contributions = question_contributions(question, &answers, synthesizer, rng)?;
            let thresholds = question_thresholds(question, &answers, synthesizer, rng)?;

            if contributions.is_empty() || !thresholds.has_any() {
                continue;
            }

            for &area in &question.areas {
                for (pressure, distribution) in &contributions {
                    output.contributions.push(PressureContributionSource {
                        state: question.state,
                        pressure: *pressure,
                        area,
                        distribution: distribution.clone(),
                    });
                }
                let mut row = thresholds.clone();
                row.area = area;
                output.thresholds.push(row);
            }
        }
    }

    Ok(output)
}

/// Per-pressure contribution distributions for one question, ordered by pressure id.
fn question_contributions<R: Rng + ?Sized>(
    question: &PressureQuestion,
    answers: &[(f64, &PressureAnswer)],
    synthesizer: &DistributionSynthesizer,
    rng: &mut R,
) -> Result<Vec<(PressureId, Option<som_core::EmpiricalDistribution>)>, SurveyError> {
    let mut shares: BTreeMap<PressureId, Vec<f64>> = BTreeMap::new();

    for (weight, answer) in answers {
        if answer.pressures.len() > MAX_PRESSURES_PER_ANSWER {
            return Err(SurveyError::TooManyPressures {
                question: question.question,
                count: answer.pressures.len(),
                max: MAX_PRESSURES_PER_ANSWER,
            });
        }
        let weighted: Vec<(PressureId, f64)> = answer
            .pressures
            .iter()
            .filter(|e| e.significance.is_finite())
            .map(|e| (e.pressure, e.significance * weight))
            .collect();
        let total: f64 = weighted.iter().map(|(_, s)| s).sum();
        if total <= 0.0 {
            continue;
        }
        for (pressure, significance) in weighted {
            shares.entry(pressure).or_default().push(significance / total);
        }
    }

    let mut contributions = Vec::with_capacity(shares.len());
    for (pressure, values) in shares {
        let (low, mean, high) = share_range(&values);
        let estimate = ExpertEstimate::new(Some(mean * 100.0), Some(low * 100.0), Some(high * 100.0), 1.0);
        let distribution = synthesizer.synthesize_estimates(&[estimate], rng)?;
        contributions.push((pressure, distribution));
    }
    Ok(contributions)
}

/// (low, mean, high) of normalized significance shares: mean ± one
/// population standard deviation, kept inside [0, 1].
fn share_range(values: &[f64]) -> (f64, f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let sd = variance.sqrt();

    if mean - sd > 0.0 {
        if mean + sd > 1.0 {
            (1.0 - 2.0 * sd, mean, 1.0)
        } else {
            (mean - sd, mean, mean + sd)
        }
    } else {
        (0.0, mean, 2.0 * sd)
    }
}

fn question_thresholds<R: Rng + ?Sized>(
    question: &PressureQuestion,
    answers: &[(f64, &PressureAnswer)],
    synthesizer: &DistributionSynthesizer,
    rng: &mut R,
) -> Result<ThresholdSource, SurveyError> {
    let mut source = ThresholdSource {
        state: question.state,
        ..ThresholdSource::default()
    };
    for level in ThresholdLevel::ALL {
        let estimates: Vec<ExpertEstimate> = answers
            .iter()
            .map(|(weight, answer)| answer.thresholds.get(level).weighted(*weight))
            .collect();
        source.set(level, synthesizer.synthesize_estimates(&estimates, rng)?);
    }
    Ok(source)
}
