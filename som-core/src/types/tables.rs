//! Table records exchanged between ingestion, link building, case expansion
//! and change propagation.
//!
//! Every table is a plain `Vec` of records. Row identity is positional
//! unless a key type says otherwise.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::distribution::EmpiricalDistribution;
use super::identifiers::{ActivityId, AreaId, MeasureId, PressureId, StateId};

/// An id with its human-readable label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labeled<I> {
    pub id: I,
    pub label: String,
}

/// Identifier tables for the four entity domains plus areas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdTables {
    pub measures: Vec<Labeled<MeasureId>>,
    pub activities: Vec<Labeled<ActivityId>>,
    pub pressures: Vec<Labeled<PressureId>>,
    pub states: Vec<Labeled<StateId>>,
    pub areas: Vec<Labeled<AreaId>>,
}

impl IdTables {
    pub fn pressure_ids(&self) -> Vec<PressureId> {
        self.pressures.iter().map(|p| p.id).collect()
    }

    pub fn state_ids(&self) -> Vec<StateId> {
        self.states.iter().map(|s| s.id).collect()
    }

    pub fn area_ids(&self) -> Vec<AreaId> {
        self.areas.iter().map(|a| a.id).collect()
    }
}

/// Unique key of a link: (measure, activity, pressure, state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinkKey {
    pub measure: MeasureId,
    pub activity: ActivityId,
    pub pressure: PressureId,
    pub state: StateId,
}

impl fmt::Display for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(measure {}, activity {}, pressure {}, state {})",
            self.measure, self.activity, self.pressure, self.state
        )
    }
}

/// Expert-derived measure effect before sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSource {
    pub measure: MeasureId,
    pub activity: ActivityId,
    pub pressure: PressureId,
    pub state: StateId,
    /// Absent when no expert answered for this link.
    pub distribution: Option<EmpiricalDistribution>,
}

impl LinkSource {
    pub fn key(&self) -> LinkKey {
        LinkKey {
            measure: self.measure,
            activity: self.activity,
            pressure: self.pressure,
            state: self.state,
        }
    }
}

/// A link with its reduction sampled for one replicate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub measure: MeasureId,
    pub activity: ActivityId,
    pub pressure: PressureId,
    pub state: StateId,
    /// Sampled reduction in [0, 1]; `None` when the source had no distribution.
    pub reduction: Option<f64>,
    /// Link-level multiplier in [0, 1]. Built links always carry 1; overlap
    /// factors depend on which measures act in an area, so they are applied
    /// per case during propagation and never stored here.
    pub multiplier: f64,
}

impl Link {
    pub fn key(&self) -> LinkKey {
        LinkKey {
            measure: self.measure,
            activity: self.activity,
            pressure: self.pressure,
            state: self.state,
        }
    }
}

/// Measure-measure interaction: `overlapping` weakens `overlapped` on a pressure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Overlap {
    pub overlapping: MeasureId,
    pub overlapped: MeasureId,
    pub pressure: PressureId,
    /// Wildcard 0 = applies to every activity.
    #[serde(default)]
    pub activity: ActivityId,
    pub multiplier: f64,
}

impl Overlap {
    /// Whether this overlap restricts `overlapped` on the given pressure/activity.
    pub fn applies_to(&self, measure: MeasureId, pressure: PressureId, activity: ActivityId) -> bool {
        self.overlapped == measure
            && self.pressure == pressure
            && (self.activity.is_wildcard() || self.activity == activity)
    }
}

/// Reduction in `reduced_pressure` that partially counts toward
/// `state_pressure`'s contribution to `state`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Subpressure {
    pub state: StateId,
    pub state_pressure: PressureId,
    pub reduced_pressure: PressureId,
    /// Equivalence value. Values <= 1 are used as the multiplier directly;
    /// larger values are classes resolved through configuration.
    pub equivalence: f64,
}

/// Activity contribution to a pressure in an area, before sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityContributionSource {
    pub activity: ActivityId,
    pub pressure: PressureId,
    pub area: AreaId,
    pub distribution: Option<EmpiricalDistribution>,
}

/// Sampled fractional contribution of an activity to a pressure in an area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivityContribution {
    pub activity: ActivityId,
    pub pressure: PressureId,
    pub area: AreaId,
    pub value: f64,
}

/// Pressure contribution to a state's total load in an area, before sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressureContributionSource {
    pub state: StateId,
    pub pressure: PressureId,
    pub area: AreaId,
    pub distribution: Option<EmpiricalDistribution>,
}

/// Sampled fractional contribution of a pressure to a state's load in an area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureContribution {
    pub state: StateId,
    pub pressure: PressureId,
    pub area: AreaId,
    pub value: f64,
}

/// A raw case: a measure applied in an area, possibly with wildcards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaseSpec {
    pub id: u32,
    pub measure: MeasureId,
    #[serde(default)]
    pub activity: ActivityId,
    #[serde(default)]
    pub pressure: PressureId,
    #[serde(default)]
    pub state: StateId,
    pub area: AreaId,
    pub coverage: f64,
    pub implementation: f64,
}

/// A concrete case after wildcard expansion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub measure: MeasureId,
    pub activity: ActivityId,
    pub pressure: PressureId,
    pub state: StateId,
    pub area: AreaId,
    pub coverage: f64,
    pub implementation: f64,
}

impl Case {
    pub fn link_key(&self) -> LinkKey {
        LinkKey {
            measure: self.measure,
            activity: self.activity,
            pressure: self.pressure,
            state: self.state,
        }
    }
}

/// The four improvement targets a state can be compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ThresholdLevel {
    /// Reduction required to reach good environmental status.
    #[serde(rename = "PR")]
    Ges,
    #[serde(rename = "10")]
    Improvement10,
    #[serde(rename = "25")]
    Improvement25,
    #[serde(rename = "50")]
    Improvement50,
}

impl ThresholdLevel {
    pub const ALL: [ThresholdLevel; 4] = [
        ThresholdLevel::Ges,
        ThresholdLevel::Improvement10,
        ThresholdLevel::Improvement25,
        ThresholdLevel::Improvement50,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::Ges => 0,
            Self::Improvement10 => 1,
            Self::Improvement25 => 2,
            Self::Improvement50 => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ges => "PR",
            Self::Improvement10 => "10",
            Self::Improvement25 => "25",
            Self::Improvement50 => "50",
        }
    }
}

/// Threshold distributions for one (state, area).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThresholdSource {
    pub state: StateId,
    pub area: AreaId,
    #[serde(default)]
    pub ges: Option<EmpiricalDistribution>,
    #[serde(default)]
    pub improvement_10: Option<EmpiricalDistribution>,
    #[serde(default)]
    pub improvement_25: Option<EmpiricalDistribution>,
    #[serde(default)]
    pub improvement_50: Option<EmpiricalDistribution>,
}

impl ThresholdSource {
    pub fn get(&self, level: ThresholdLevel) -> Option<&EmpiricalDistribution> {
        match level {
            ThresholdLevel::Ges => self.ges.as_ref(),
            ThresholdLevel::Improvement10 => self.improvement_10.as_ref(),
            ThresholdLevel::Improvement25 => self.improvement_25.as_ref(),
            ThresholdLevel::Improvement50 => self.improvement_50.as_ref(),
        }
    }

    pub fn set(&mut self, level: ThresholdLevel, dist: Option<EmpiricalDistribution>) {
        match level {
            ThresholdLevel::Ges => self.ges = dist,
            ThresholdLevel::Improvement10 => self.improvement_10 = dist,
            ThresholdLevel::Improvement25 => self.improvement_25 = dist,
            ThresholdLevel::Improvement50 => self.improvement_50 = dist,
        }
    }

    /// True when at least one level has a distribution.
    pub fn has_any(&self) -> bool {
        ThresholdLevel::ALL.iter().any(|l| self.get(*l).is_some())
    }
}

/// Sampled threshold reductions for one (state, area).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub state: StateId,
    pub area: AreaId,
    pub values: [Option<f64>; 4],
}

impl Threshold {
    pub fn get(&self, level: ThresholdLevel) -> Option<f64> {
        self.values[level.index()]
    }
}

/// Named development scenario columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScenarioKind {
    #[serde(rename = "BAU", alias = "bau")]
    BusinessAsUsual,
    #[serde(rename = "ChangeMin", alias = "change_min")]
    ChangeMin,
    #[serde(rename = "ChangeML", alias = "change_ml")]
    ChangeMostLikely,
    #[serde(rename = "ChangeMax", alias = "change_max")]
    ChangeMax,
}

impl std::str::FromStr for ScenarioKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bau" => Ok(Self::BusinessAsUsual),
            "changemin" | "change_min" => Ok(Self::ChangeMin),
            "changeml" | "change_ml" => Ok(Self::ChangeMostLikely),
            "changemax" | "change_max" => Ok(Self::ChangeMax),
            other => Err(format!("unknown scenario '{other}'")),
        }
    }
}

/// Per-activity development multipliers, one per scenario.
///
/// Values are multipliers (1.0 = no change), converted from percentage
/// changes with [`DevelopmentScenario::from_changes`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DevelopmentScenario {
    pub activity: ActivityId,
    pub bau: f64,
    pub change_min: f64,
    pub change_ml: f64,
    pub change_max: f64,
}

impl DevelopmentScenario {
    /// Build from fractional changes (e.g. 0.1 = +10 %). Missing changes mean no change.
    pub fn from_changes(
        activity: ActivityId,
        bau: Option<f64>,
        change_min: Option<f64>,
        change_ml: Option<f64>,
        change_max: Option<f64>,
    ) -> Self {
        let factor = |c: Option<f64>| 1.0 + c.filter(|v| v.is_finite()).unwrap_or(0.0);
        Self {
            activity,
            bau: factor(bau),
            change_min: factor(change_min),
            change_ml: factor(change_ml),
            change_max: factor(change_max),
        }
    }

    pub fn multiplier(&self, kind: ScenarioKind) -> f64 {
        match kind {
            ScenarioKind::BusinessAsUsual => self.bau,
            ScenarioKind::ChangeMin => self.change_min,
            ScenarioKind::ChangeMostLikely => self.change_ml,
            ScenarioKind::ChangeMax => self.change_max,
        }
    }
}
