//! Per-replicate sampling of every distribution-bearing table.

use rand::Rng;
use som_core::config::SomConfig;
use som_core::errors::ReplicateError;
use som_core::types::{
    ActivityContribution, Case, PressureContribution, Threshold, ThresholdLevel,
};

use super::inputs::InputTables;
use crate::cases::expand_cases;
use crate::distribution::pick;
use crate::links::LinkTable;
use crate::scenario::apply_scenario;

/// Concrete values drawn for one replicate.
///
/// Rows whose source has no distribution are left out, which downstream
/// lookups treat as a zero contribution or an empty threshold.
#[derive(Debug, Clone)]
pub struct ReplicateSample {
    pub links: LinkTable,
    pub cases: Vec<Case>,
    pub activity_contributions: Vec<ActivityContribution>,
    pub pressure_contributions: Vec<PressureContribution>,
    pub thresholds: Vec<Threshold>,
}

impl ReplicateSample {
    pub fn draw<R: Rng + ?Sized>(
        inputs: &InputTables,
        config: &SomConfig,
        rng: &mut R,
    ) -> Result<Self, ReplicateError> {
        let links = LinkTable::build(&inputs.links, rng)?;
        let cases = expand_cases(&inputs.cases, &links, config.propagation.effective_case_filter());

        let mut activity_contributions = Vec::with_capacity(inputs.activity_contributions.len());
        for source in &inputs.activity_contributions {
            if let Some(value) = pick(source.distribution.as_ref(), rng) {
                activity_contributions.push(ActivityContribution {
                    activity: source.activity,
                    pressure: source.pressure,
                    area: source.area,
                    value,
                });
            }
        }
        if let Some(kind) = config.simulation.scenario {
            activity_contributions =
                apply_scenario(activity_contributions, &inputs.development_scenarios, kind);
        }

        let mut pressure_contributions = Vec::with_capacity(inputs.pressure_contributions.len());
        for source in &inputs.pressure_contributions {
            if let Some(value) = pick(source.distribution.as_ref(), rng) {
                pressure_contributions.push(PressureContribution {
                    state: source.state,
                    pressure: source.pressure,
                    area: source.area,
                    value,
                });
            }
        }

        let thresholds = inputs
            .thresholds
            .iter()
            .map(|source| {
                let mut values = [None; 4];
                for level in ThresholdLevel::ALL {
                    values[level.index()] = pick(source.get(level), rng);
                }
                Threshold {
                    state: source.state,
                    area: source.area,
                    values,
                }
            })
            .collect();

        Ok(Self {
            links,
            cases,
            activity_contributions,
            pressure_contributions,
            thresholds,
        })
    }
}
