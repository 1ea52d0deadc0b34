//! Cross-replicate aggregation: mean and standard deviation per cell.

use std::hash::Hash;

use serde::Serialize;
use som_core::types::collections::BTreeMap;
use som_core::types::ThresholdLevel;
use som_core::{PressureId, StateId};

use crate::propagation::{AreaTable, PropagationOutput};

/// Summary of one cell across replicates. `std_dev` is the population
/// standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellStats {
    pub mean: f64,
    pub std_dev: f64,
    pub count: usize,
}

impl CellStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            mean,
            std_dev: variance.sqrt(),
            count: values.len(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregatedOutput {
    pub replicates: usize,
    pub pressure_levels: AreaTable<PressureId, CellStats>,
    pub total_pressure_load_levels: AreaTable<StateId, CellStats>,
    pub total_pressure_load_reductions: AreaTable<StateId, CellStats>,
    pub thresholds: BTreeMap<ThresholdLevel, AreaTable<StateId, CellStats>>,
}

/// Roll replicate outputs up into per-cell statistics.
///
/// The first output fixes the table shapes. Empty cells are skipped, so a
/// cell's `count` can be lower than the number of replicates.
pub fn aggregate(outputs: &[PropagationOutput]) -> Option<AggregatedOutput> {
    let first = outputs.first()?;

    let thresholds = first
        .thresholds
        .keys()
        .map(|&level| {
            let tables: Vec<&AreaTable<StateId>> =
                outputs.iter().filter_map(|o| o.thresholds.get(&level)).collect();
            (level, aggregate_tables(&tables))
        })
        .collect();

    Some(AggregatedOutput {
        replicates: outputs.len(),
        pressure_levels: aggregate_tables(
            &outputs.iter().map(|o| &o.pressure_levels).collect::<Vec<_>>(),
        ),
        total_pressure_load_levels: aggregate_tables(
            &outputs
                .iter()
                .map(|o| &o.total_pressure_load_levels)
                .collect::<Vec<_>>(),
        ),
        total_pressure_load_reductions: aggregate_tables(
            &outputs
                .iter()
                .map(|o| &o.total_pressure_load_reductions)
                .collect::<Vec<_>>(),
        ),
        thresholds,
    })
}

fn aggregate_tables<I: Copy + Eq + Hash>(tables: &[&AreaTable<I>]) -> AreaTable<I, CellStats> {
    let Some(shape) = tables.first() else {
        return AreaTable::new(Vec::new(), Vec::new());
    };
    let mut result = AreaTable::new(shape.ids().to_vec(), shape.areas().to_vec());
    let mut values = Vec::with_capacity(tables.len());
    for &id in shape.ids() {
        for &area in shape.areas() {
            values.clear();
            values.extend(tables.iter().filter_map(|t| t.value(id, area)));
            if let Some(stats) = CellStats::from_values(&values) {
                result.set(id, area, stats);
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_use_population_deviation() {
        let stats = CellStats::from_values(&[0.2, 0.4]).unwrap();
        assert!((stats.mean - 0.3).abs() < 1e-12);
        assert!((stats.std_dev - 0.1).abs() < 1e-12);
        assert_eq!(stats.count, 2);
    }

    #[test]
    fn no_values_no_stats() {
        assert!(CellStats::from_values(&[]).is_none());
        assert!(aggregate(&[]).is_none());
    }
}
