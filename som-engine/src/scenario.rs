//! Development scenarios: scale activity contributions by projected change.

use som_core::types::collections::FxHashMap;
use som_core::types::{ActivityContribution, ActivityId, AreaId, DevelopmentScenario, PressureId, ScenarioKind};

/// Apply a development scenario to sampled activity contributions.
///
/// Each contribution is multiplied by its activity's scenario multiplier
/// (activities without a scenario row keep 1). Every contribution for a
/// (pressure, area) is then scaled by `1 + scenario_total − original_total`,
/// so the pressure's total load reflects the projected change.
pub fn apply_scenario(
    mut contributions: Vec<ActivityContribution>,
    scenarios: &[DevelopmentScenario],
    kind: ScenarioKind,
) -> Vec<ActivityContribution> {
    let mut multipliers: FxHashMap<ActivityId, f64> = FxHashMap::default();
    for s in scenarios {
        multipliers.entry(s.activity).or_insert_with(|| s.multiplier(kind));
    }

    let mut totals: FxHashMap<(PressureId, AreaId), (f64, f64)> = FxHashMap::default();
    for c in &mut contributions {
        let original = c.value;
        c.value *= multipliers.get(&c.activity).copied().unwrap_or(1.0);
        let entry = totals.entry((c.pressure, c.area)).or_insert((0.0, 0.0));
        entry.0 += original;
        entry.1 += c.value;
    }

    for c in &mut contributions {
        if let Some((original, scenario)) = totals.get(&(c.pressure, c.area)) {
            c.value *= 1.0 + scenario - original;
        }
    }

    contributions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contribution(activity: u32, value: f64) -> ActivityContribution {
        ActivityContribution {
            activity: ActivityId(activity),
            pressure: PressureId(1),
            area: AreaId(1),
            value,
        }
    }

    #[test]
    fn unlisted_activity_is_unchanged_when_totals_match() {
        let out = apply_scenario(vec![contribution(1, 0.4)], &[], ScenarioKind::BusinessAsUsual);
        assert_eq!(out[0].value, 0.4);
    }

    #[test]
    fn growth_raises_every_contribution_of_the_pressure() {
        let scenario = DevelopmentScenario::from_changes(ActivityId(1), Some(0.5), None, None, None);
        let out = apply_scenario(
            vec![contribution(1, 0.2), contribution(2, 0.2)],
            &[scenario],
            ScenarioKind::BusinessAsUsual,
        );
        // activity 1: 0.2 * 1.5 = 0.3; totals 0.4 -> 0.5; factor 1.1
        assert!((out[0].value - 0.33).abs() < 1e-12);
        assert!((out[1].value - 0.22).abs() < 1e-12);
    }
}
