//! Input tables shared read-only by every replicate.

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use som_core::errors::InputError;
use som_core::types::collections::FxHashSet;
use som_core::types::{
    ActivityContributionSource, AreaId, CaseSpec, DevelopmentScenario, IdTables, LinkSource,
    Overlap, PressureContributionSource, PressureId, StateId, Subpressure, ThresholdSource,
};
use tracing::info;

use crate::cases::validate_case_specs;
use crate::distribution::DistributionSynthesizer;
use crate::links::{check_overlaps, check_unique_links};
use crate::survey::{
    process_activity_contributions, process_measure_survey, process_pressure_survey,
    ActivityContributionRow, MeasureSurveyBlock, PressureSurvey,
};

/// Raw survey answers to ingest into [`InputTables`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyBundle {
    pub measure_blocks: Vec<MeasureSurveyBlock>,
    pub pressure_surveys: Vec<PressureSurvey>,
    pub activity_contributions: Vec<ActivityContributionRow>,
}

/// Every table a replicate samples from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputTables {
    pub ids: IdTables,
    pub links: Vec<LinkSource>,
    pub overlaps: Vec<Overlap>,
    pub subpressures: Vec<Subpressure>,
    pub activity_contributions: Vec<ActivityContributionSource>,
    pub pressure_contributions: Vec<PressureContributionSource>,
    pub development_scenarios: Vec<DevelopmentScenario>,
    pub thresholds: Vec<ThresholdSource>,
    pub cases: Vec<CaseSpec>,
}

impl InputTables {
    pub fn from_json(json: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, InputError> {
        let content = std::fs::read_to_string(path).map_err(|e| InputError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String, InputError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Ingest survey answers, appending their rows to the existing tables.
    pub fn with_surveys<R: Rng + ?Sized>(
        mut self,
        surveys: &SurveyBundle,
        synthesizer: &DistributionSynthesizer,
        rng: &mut R,
    ) -> Result<Self, InputError> {
        let links = process_measure_survey(&surveys.measure_blocks, synthesizer, rng)?;
        let pressure = process_pressure_survey(&surveys.pressure_surveys, synthesizer, rng)?;
        let activity =
            process_activity_contributions(&surveys.activity_contributions, synthesizer, rng)?;

        info!(
            links = links.len(),
            pressure_contributions = pressure.contributions.len(),
            thresholds = pressure.thresholds.len(),
            activity_contributions = activity.len(),
            "surveys ingested"
        );

        self.links.extend(links);
        self.pressure_contributions.extend(pressure.contributions);
        self.thresholds.extend(pressure.thresholds);
        self.activity_contributions.extend(activity);
        Ok(self)
    }

    /// Load-time checks: unique links, valid overlaps, valid case specs.
    pub fn validate(&self) -> Result<(), InputError> {
        check_unique_links(&self.links)?;
        check_overlaps(&self.overlaps)?;
        validate_case_specs(&self.cases)?;
        Ok(())
    }

    /// Declared areas, or every area a case mentions when none are declared.
    pub fn area_ids(&self) -> Vec<AreaId> {
        if !self.ids.areas.is_empty() {
            return self.ids.area_ids();
        }
        distinct(self.cases.iter().map(|c| c.area))
    }

    /// Declared pressures, or every concrete pressure the tables mention.
    pub fn pressure_ids(&self) -> Vec<PressureId> {
        if !self.ids.pressures.is_empty() {
            return self.ids.pressure_ids();
        }
        distinct(
            self.links
                .iter()
                .map(|l| l.pressure)
                .chain(self.activity_contributions.iter().map(|c| c.pressure))
                .chain(self.pressure_contributions.iter().map(|c| c.pressure))
                .filter(|p| !p.is_wildcard()),
        )
    }

    /// Declared states, or every concrete state the tables mention.
    pub fn state_ids(&self) -> Vec<StateId> {
        if !self.ids.states.is_empty() {
            return self.ids.state_ids();
        }
        distinct(
            self.links
                .iter()
                .map(|l| l.state)
                .chain(self.pressure_contributions.iter().map(|c| c.state))
                .chain(self.thresholds.iter().map(|t| t.state))
                .filter(|s| !s.is_wildcard()),
        )
    }
}

fn distinct<T: Copy + Eq + std::hash::Hash>(values: impl Iterator<Item = T>) -> Vec<T> {
    let mut seen = FxHashSet::default();
    values.filter(|v| seen.insert(*v)).collect()
}
