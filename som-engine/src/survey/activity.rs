//! Activity contribution estimates.

use rand::Rng;
use serde::{Deserialize, Serialize};
use som_core::errors::SurveyError;
use som_core::types::{ActivityContributionSource, ActivityId, AreaId, PressureId};
use som_core::EmpiricalDistribution;

use super::Estimate;
use crate::distribution::{DistributionSynthesizer, ExpertEstimate};

/// Expert estimates of how much the listed activities contribute to the
/// listed pressures in the listed areas. Exploded into one row per combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityContributionRow {
    pub activities: Vec<ActivityId>,
    pub pressures: Vec<PressureId>,
    pub areas: Vec<AreaId>,
    pub estimates: Vec<Estimate>,
}

/// Distribution over an activity's contribution from expert (expected, min, max).
///
/// Missing bounds fall back to the expected value. Every expert weighs 1.
pub fn activity_contribution_distribution<R: Rng + ?Sized>(
    expected: &[Option<f64>],
    minimums: &[Option<f64>],
    maximums: &[Option<f64>],
    synthesizer: &DistributionSynthesizer,
    rng: &mut R,
) -> Result<Option<EmpiricalDistribution>, SurveyError> {
    let n = expected.len();
    let bound = |column: &[Option<f64>], i: usize| {
        column
            .get(i)
            .copied()
            .flatten()
            .filter(|v| v.is_finite())
            .or(expected[i])
    };
    let estimates: Vec<ExpertEstimate> = (0..n)
        .map(|i| ExpertEstimate::new(expected[i], bound(minimums, i), bound(maximums, i), 1.0))
        .collect();
    Ok(synthesizer.synthesize_estimates(&estimates, rng)?)
}

/// Explode contribution rows into per-(activity, pressure, area) sources.
pub fn process_activity_contributions<R: Rng + ?Sized>(
    rows: &[ActivityContributionRow],
    synthesizer: &DistributionSynthesizer,
    rng: &mut R,
) -> Result<Vec<ActivityContributionSource>, SurveyError> {
    let mut sources = Vec::new();
    for row in rows {
        let expected: Vec<Option<f64>> = row.estimates.iter().map(|e| e.most_likely).collect();
        let minimums: Vec<Option<f64>> = row.estimates.iter().map(|e| e.min).collect();
        let maximums: Vec<Option<f64>> = row.estimates.iter().map(|e| e.max).collect();
        let distribution =
            activity_contribution_distribution(&expected, &minimums, &maximums, synthesizer, rng)?;

        for &activity in &row.activities {
            for &pressure in &row.pressures {
                for &area in &row.areas {
                    sources.push(ActivityContributionSource {
                        activity,
                        pressure,
                        area,
                        distribution: distribution.clone(),
                    });
                }
            }
        }
    }
    Ok(sources)
}
