//! Measure-Activity-Pressure-State link table.
//!
//! Sources carry a distribution per link. Building the table checks key
//! uniqueness and picks one reduction per link for the current replicate.

use rand::Rng;
use som_core::errors::LinkError;
use som_core::types::collections::{FxHashMap, FxHashSet};
use som_core::types::{Link, LinkKey, LinkSource, MeasureId, Overlap};

use crate::distribution::pick;

/// Fail on the first duplicated (measure, activity, pressure, state) key.
pub fn check_unique_links(sources: &[LinkSource]) -> Result<(), LinkError> {
    let mut seen = FxHashSet::default();
    for source in sources {
        let key = source.key();
        if !seen.insert(key) {
            return Err(LinkError::DuplicateLink { key });
        }
    }
    Ok(())
}

/// Overlap multipliers must lie in [0, 1].
pub fn check_overlaps(overlaps: &[Overlap]) -> Result<(), LinkError> {
    match overlaps
        .iter()
        .find(|o| !(0.0..=1.0).contains(&o.multiplier))
    {
        Some(o) => Err(LinkError::InvalidOverlapMultiplier {
            overlapped: o.overlapped.raw(),
            multiplier: o.multiplier,
        }),
        None => Ok(()),
    }
}

/// Links with sampled reductions, indexed by key.
#[derive(Debug, Clone, Default)]
pub struct LinkTable {
    links: Vec<Link>,
    index: FxHashMap<LinkKey, usize>,
}

impl LinkTable {
    /// Sample one reduction per source. Static multipliers start at 1.
    pub fn build<R: Rng + ?Sized>(sources: &[LinkSource], rng: &mut R) -> Result<Self, LinkError> {
        check_unique_links(sources)?;
        let links = sources
            .iter()
            .map(|s| Link {
                measure: s.measure,
                activity: s.activity,
                pressure: s.pressure,
                state: s.state,
                reduction: pick(s.distribution.as_ref(), rng),
                multiplier: 1.0,
            })
            .collect();
        Self::from_links(links)
    }

    /// Index already-sampled links.
    pub fn from_links(links: Vec<Link>) -> Result<Self, LinkError> {
        let mut index = FxHashMap::default();
        index.reserve(links.len());
        for (i, link) in links.iter().enumerate() {
            if index.insert(link.key(), i).is_some() {
                return Err(LinkError::DuplicateLink { key: link.key() });
            }
        }
        Ok(Self { links, index })
    }

    pub fn get(&self, key: &LinkKey) -> Option<&Link> {
        self.index.get(key).map(|&i| &self.links[i])
    }

    pub fn contains(&self, key: &LinkKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Link> {
        self.links.iter()
    }

    /// Links of one measure, in table order.
    pub fn for_measure(&self, measure: MeasureId) -> impl Iterator<Item = &Link> + '_ {
        self.links.iter().filter(move |l| l.measure == measure)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn into_links(self) -> Vec<Link> {
        self.links
    }
}

impl<'a> IntoIterator for &'a LinkTable {
    type Item = &'a Link;
    type IntoIter = std::slice::Iter<'a, Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.iter()
    }
}
