//! Live contribution tables with in-group renormalization.
//!
//! A group is what the contributions are shares of: a (pressure, area)
//! for activity contributions, a (state, area) for pressure contributions.
//! When one member of a group is reduced, its share shrinks and every share
//! in the group is rescaled so the group still describes the remaining load.

use std::hash::Hash;

use som_core::constants::RENORMALIZATION_EPSILON;
use som_core::types::collections::{FxHashMap, SmallVec8};
use som_core::types::{
    ActivityContribution, ActivityId, AreaId, PressureContribution, PressureId, StateId,
};

#[derive(Debug, Clone, Copy)]
struct Entry<G, M> {
    group: G,
    member: M,
    value: f64,
}

/// Contribution shares keyed by (group, member).
#[derive(Debug, Clone)]
pub struct ContributionTable<G: Copy + Eq + Hash, M: Copy + Eq + Hash> {
    entries: Vec<Entry<G, M>>,
    groups: FxHashMap<G, SmallVec8<usize>>,
    index: FxHashMap<(G, M), usize>,
}

/// (pressure, area) → activity shares.
pub type ActivityContributionTable = ContributionTable<(PressureId, AreaId), ActivityId>;
/// (state, area) → pressure shares.
pub type PressureContributionTable = ContributionTable<(StateId, AreaId), PressureId>;

impl<G: Copy + Eq + Hash, M: Copy + Eq + Hash> ContributionTable<G, M> {
    pub fn from_entries(entries: impl IntoIterator<Item = (G, M, f64)>) -> Self {
        let mut table = Self {
            entries: Vec::new(),
            groups: FxHashMap::default(),
            index: FxHashMap::default(),
        };
        for (group, member, value) in entries {
            let i = table.entries.len();
            table.entries.push(Entry {
                group,
                member,
                value,
            });
            table.groups.entry(group).or_default().push(i);
            // First row wins for lookups; duplicates still share renormalization.
            table.index.entry((group, member)).or_insert(i);
        }
        table
    }

    pub fn get(&self, group: G, member: M) -> Option<f64> {
        self.index.get(&(group, member)).map(|&i| self.entries[i].value)
    }

    /// Distinct members of a group, in insertion order.
    pub fn members(&self, group: G) -> SmallVec8<M> {
        let mut members = SmallVec8::new();
        for &i in self.groups.get(&group).into_iter().flatten() {
            let member = self.entries[i].member;
            if !members.contains(&member) {
                members.push(member);
            }
        }
        members
    }

    pub fn group_sum(&self, group: G) -> f64 {
        self.groups
            .get(&group)
            .into_iter()
            .flatten()
            .map(|&i| self.entries[i].value)
            .sum()
    }

    /// Rescale every group whose shares sum above 1 so they sum to exactly 1.
    /// Returns the number of groups rescaled.
    pub fn normalize_groups(&mut self) -> usize {
        let mut rescaled = 0;
        for indices in self.groups.values() {
            let total: f64 = indices.iter().map(|&i| self.entries[i].value).sum();
            if total > 1.0 {
                for &i in indices {
                    self.entries[i].value /= total;
                }
                rescaled += 1;
            }
        }
        rescaled
    }

    /// Record that `member`'s load in `group` was reduced by `reduction`.
    ///
    /// The member's share becomes `c(1 − r)` and the whole group is divided
    /// by `1 − r·c`, the fraction of the group's load that remains.
    pub fn reduce(&mut self, group: G, member: M, reduction: f64) {
        let Some(&i) = self.index.get(&(group, member)) else {
            return;
        };
        let share = self.entries[i].value;
        let remaining = 1.0 - reduction * share;
        self.entries[i].value = share * (1.0 - reduction);
        if remaining < RENORMALIZATION_EPSILON {
            return;
        }
        if let Some(indices) = self.groups.get(&group) {
            for &j in indices {
                self.entries[j].value /= remaining;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (G, M, f64)> + '_ {
        self.entries.iter().map(|e| (e.group, e.member, e.value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ActivityContributionTable {
    pub fn from_rows(rows: &[ActivityContribution]) -> Self {
        Self::from_entries(rows.iter().map(|r| ((r.pressure, r.area), r.activity, r.value)))
    }

    pub fn to_rows(&self) -> Vec<ActivityContribution> {
        self.iter()
            .map(|((pressure, area), activity, value)| ActivityContribution {
                activity,
                pressure,
                area,
                value,
            })
            .collect()
    }
}

impl PressureContributionTable {
    pub fn from_rows(rows: &[PressureContribution]) -> Self {
        Self::from_entries(rows.iter().map(|r| ((r.state, r.area), r.pressure, r.value)))
    }

    pub fn to_rows(&self) -> Vec<PressureContribution> {
        self.iter()
            .map(|((state, area), pressure, value)| PressureContribution {
                state,
                pressure,
                area,
                value,
            })
            .collect()
    }
}
