//! Survey ingestion: expert answer sheets → distribution-bearing input tables.
//!
//! Three surveys feed the model:
//! - measure effectiveness blocks → [`LinkSource`](som_core::types::LinkSource) rows
//! - pressure significance questions → pressure contributions and state thresholds
//! - activity contribution estimates → activity contribution rows
//!
//! Ingestion happens once per run, before any replicate starts.

pub mod activity;
pub mod measure;
pub mod pressure;

pub use activity::{activity_contribution_distribution, process_activity_contributions, ActivityContributionRow};
pub use measure::{effectiveness_bounds, process_measure_survey, MeasureExpertAnswers, MeasureSurveyBlock};
pub use pressure::{
    process_pressure_survey, PressureAnswer, PressureExpertSheet, PressureQuestion, PressureSurvey,
    PressureSurveyOutput, SignificanceEntry, ThresholdEstimates,
};

use serde::{Deserialize, Serialize};

use crate::distribution::ExpertEstimate;

/// A (min, most likely, max) estimate in percentage points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Estimate {
    pub min: Option<f64>,
    pub most_likely: Option<f64>,
    pub max: Option<f64>,
}

impl Estimate {
    pub fn new(min: f64, most_likely: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            most_likely: Some(most_likely),
            max: Some(max),
        }
    }

    pub fn weighted(&self, weight: f64) -> ExpertEstimate {
        ExpertEstimate::new(self.most_likely, self.min, self.max, weight)
    }
}
