//! Persistent per-cell value surface refined by value iteration.

use std::collections::BTreeMap;

use breach_planner_core::{friendly_region, Cell};
use serde::{Deserialize, Serialize};

/// Scalar value attached to every tracked cell.
///
/// The tracked domain is fixed at construction. Queries and adjustments for
/// cells outside it are ignored.
#[derive(Clone, Debug)]
pub struct ValueSurface {
    values: BTreeMap<Cell, f64>,
    scratch: BTreeMap<Cell, f64>,
}

impl Default for ValueSurface {
    fn default() -> Self {
        Self::friendly()
    }
}

impl ValueSurface {
    /// Creates a surface over the provided cells, every value starting at zero.
    #[must_use]
    pub fn new<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = Cell>,
    {
        let values: BTreeMap<Cell, f64> = cells.into_iter().map(|cell| (cell, 0.0)).collect();
        Self {
            scratch: values.clone(),
            values,
        }
    }

    /// Creates a zeroed surface over the friendly half of the arena.
    #[must_use]
    pub fn friendly() -> Self {
        Self::new(friendly_region())
    }

    /// Number of tracked cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Reports whether the surface tracks no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Current value of the cell, if it is tracked.
    #[must_use]
    pub fn value(&self, cell: Cell) -> Option<f64> {
        self.values.get(&cell).copied()
    }

    /// Tracked cells and their values in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, f64)> + '_ {
        self.values.iter().map(|(cell, value)| (*cell, *value))
    }

    /// Adds `delta` to the cell's value. Returns `false` for untracked cells.
    pub fn adjust(&mut self, cell: Cell, delta: f64) -> bool {
        match self.values.get_mut(&cell) {
            Some(value) => {
                *value += delta;
                true
            }
            None => false,
        }
    }

    /// Overwrites the cell's value. Returns `false` for untracked cells.
    pub fn set(&mut self, cell: Cell, value: f64) -> bool {
        match self.values.get_mut(&cell) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Runs one synchronous sweep.
    ///
    /// Every cell becomes `value + discount * max(action values)`, where all
    /// reads observe the surface as it was before the sweep. Actions naming
    /// untracked cells are ignored; a cell with no tracked action keeps its
    /// value.
    pub fn sweep<F>(&mut self, discount: f64, mut actions: F)
    where
        F: FnMut(Cell) -> Vec<Cell>,
    {
        self.scratch.clear();
        for (&cell, &value) in &self.values {
            let best = actions(cell)
                .into_iter()
                .filter_map(|action| self.values.get(&action).copied())
                .max_by(f64::total_cmp);
            let next = match best {
                Some(best) => value + discount * best,
                None => value,
            };
            let _ = self.scratch.insert(cell, next);
        }

        std::mem::swap(&mut self.values, &mut self.scratch);
    }

    /// Tracked cells ordered from lowest to highest value.
    ///
    /// Equal values keep row-major order.
    #[must_use]
    pub fn ranked(&self) -> Vec<(Cell, f64)> {
        let mut ranked: Vec<(Cell, f64)> = self.iter().collect();
        ranked.sort_by(|(_, left), (_, right)| left.total_cmp(right));
        ranked
    }

    /// Captures the current values for persistence.
    #[must_use]
    pub fn snapshot(&self) -> SurfaceSnapshot {
        SurfaceSnapshot {
            entries: self
                .iter()
                .map(|(cell, value)| SurfaceEntry { cell, value })
                .collect(),
        }
    }

    /// Loads values from a snapshot, skipping cells the surface does not
    /// track. Returns the number of values restored.
    pub fn restore(&mut self, snapshot: &SurfaceSnapshot) -> usize {
        snapshot
            .entries
            .iter()
            .filter(|entry| self.set(entry.cell, entry.value))
            .count()
    }
}

/// Serializable copy of a [`ValueSurface`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSnapshot {
    /// Captured values in row-major cell order.
    pub entries: Vec<SurfaceEntry>,
}

/// Single captured cell value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurfaceEntry {
    /// Cell the value belongs to.
    pub cell: Cell,
    /// Captured value.
    pub value: f64,
}
