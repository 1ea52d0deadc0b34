//! Dense entity × area tables.

use std::hash::Hash;

use serde::Serialize;
use som_core::types::collections::FxHashMap;
use som_core::AreaId;

/// One value per (entity, area), stored row-major. Cells may be empty.
#[derive(Debug, Clone, Serialize)]
pub struct AreaTable<I: Copy + Eq + Hash, T = f64> {
    ids: Vec<I>,
    areas: Vec<AreaId>,
    cells: Vec<Option<T>>,
    #[serde(skip)]
    row_index: FxHashMap<I, usize>,
    #[serde(skip)]
    area_index: FxHashMap<AreaId, usize>,
}

impl<I: Copy + Eq + Hash, T> AreaTable<I, T> {
    /// An all-empty table.
    pub fn new(ids: Vec<I>, areas: Vec<AreaId>) -> Self {
        let cells = std::iter::repeat_with(|| None).take(ids.len() * areas.len()).collect();
        let row_index = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let area_index = areas.iter().enumerate().map(|(i, a)| (*a, i)).collect();
        Self {
            ids,
            areas,
            cells,
            row_index,
            area_index,
        }
    }

    /// Every cell set to `value`.
    pub fn filled(ids: Vec<I>, areas: Vec<AreaId>, value: T) -> Self
    where
        T: Clone,
    {
        let mut table = Self::new(ids, areas);
        table.cells.iter_mut().for_each(|c| *c = Some(value.clone()));
        table
    }

    fn offset(&self, id: I, area: AreaId) -> Option<usize> {
        let row = *self.row_index.get(&id)?;
        let col = *self.area_index.get(&area)?;
        Some(row * self.areas.len() + col)
    }

    pub fn get(&self, id: I, area: AreaId) -> Option<&T> {
        self.offset(id, area).and_then(|i| self.cells[i].as_ref())
    }

    /// Store a value. Returns false when (id, area) is not part of the table.
    pub fn set(&mut self, id: I, area: AreaId, value: T) -> bool {
        match self.offset(id, area) {
            Some(i) => {
                self.cells[i] = Some(value);
                true
            }
            None => false,
        }
    }

    pub fn ids(&self) -> &[I] {
        &self.ids
    }

    pub fn areas(&self) -> &[AreaId] {
        &self.areas
    }

    /// One entity's cells, in area order.
    pub fn row(&self, id: I) -> Option<&[Option<T>]> {
        let row = *self.row_index.get(&id)?;
        let width = self.areas.len();
        Some(&self.cells[row * width..(row + 1) * width])
    }

    /// All cells as (id, area, value).
    pub fn cells(&self) -> impl Iterator<Item = (I, AreaId, Option<&T>)> + '_ {
        let width = self.areas.len();
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let (row, col) = (i / width, i % width);
            (self.ids[row], self.areas[col], cell.as_ref())
        })
    }

    /// Same shape, every present cell transformed.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> AreaTable<I, U> {
        AreaTable {
            ids: self.ids.clone(),
            areas: self.areas.clone(),
            cells: self.cells.iter().map(|c| c.as_ref().map(&mut f)).collect(),
            row_index: self.row_index.clone(),
            area_index: self.area_index.clone(),
        }
    }
}

impl<I: Copy + Eq + Hash> AreaTable<I, f64> {
    pub fn value(&self, id: I, area: AreaId) -> Option<f64> {
        self.get(id, area).copied()
    }

    /// Multiply a present cell by `factor`.
    pub fn scale(&mut self, id: I, area: AreaId, factor: f64) {
        if let Some(i) = self.offset(id, area) {
            if let Some(v) = self.cells[i].as_mut() {
                *v *= factor;
            }
        }
    }
}
