//! Stationary unit bookkeeping for the reference arena.

use std::collections::BTreeMap;

use breach_planner_core::{Cell, Owner, UnitKind};

/// Snapshot of a stationary unit stored inside the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StationaryUnit {
    /// Player that owns the unit.
    pub owner: Owner,
    /// Kind of unit that was placed.
    pub kind: UnitKind,
    /// Cell occupied by the unit.
    pub cell: Cell,
}

/// Registry that stores stationary units keyed by the cell they occupy.
#[derive(Debug, Default)]
pub(crate) struct UnitRegistry {
    entries: BTreeMap<Cell, StationaryUnit>,
}

impl UnitRegistry {
    /// Creates an empty unit registry.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Stores a unit; returns `false` when the cell is already taken.
    pub(crate) fn insert(&mut self, unit: StationaryUnit) -> bool {
        if self.entries.contains_key(&unit.cell) {
            return false;
        }

        let _ = self.entries.insert(unit.cell, unit);
        true
    }

    /// Removes and returns the unit occupying the cell.
    pub(crate) fn remove(&mut self, cell: Cell) -> Option<StationaryUnit> {
        self.entries.remove(&cell)
    }

    /// Unit occupying the cell, if any.
    pub(crate) fn at(&self, cell: Cell) -> Option<&StationaryUnit> {
        self.entries.get(&cell)
    }

    /// Units in row-major cell order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &StationaryUnit> {
        self.entries.values()
    }
}
