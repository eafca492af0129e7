//! Scripted [`GameState`] used by system tests.

use std::collections::{BTreeMap, BTreeSet};

use crate::{Cell, GameState, Owner, ResourceKind, SpawnError, SpawnIntent, UnitKind};

/// Engine stand-in whose paths, attacker counts and action model are scripted
/// up front.
///
/// Launch cells without a scripted path report an empty path, cells without a
/// scripted action set fall back to the default action model, and unit costs
/// default to `1.0`.
#[derive(Clone, Debug, Default)]
pub struct StubState {
    paths: BTreeMap<Cell, Vec<Cell>>,
    attackers: BTreeMap<(Cell, Owner, UnitKind), usize>,
    occupied: BTreeSet<Cell>,
    actions: BTreeMap<Cell, Vec<Cell>>,
    costs: BTreeMap<UnitKind, f64>,
    bits: f64,
    cores: f64,
    spawned: Vec<SpawnIntent>,
    submitted: u32,
}

impl StubState {
    /// Creates a stub with no paths, attackers or resources.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the route returned for `start`.
    #[must_use]
    pub fn with_path(mut self, start: Cell, path: Vec<Cell>) -> Self {
        let _ = self.paths.insert(start, path);
        self
    }

    /// Scripts the number of `owner`'s `kind` units that reach `cell`.
    #[must_use]
    pub fn with_attackers(mut self, cell: Cell, owner: Owner, kind: UnitKind, count: usize) -> Self {
        let _ = self.attackers.insert((cell, owner, kind), count);
        self
    }

    /// Marks a cell as occupied by a stationary unit.
    #[must_use]
    pub fn with_occupied(mut self, cell: Cell) -> Self {
        let _ = self.occupied.insert(cell);
        self
    }

    /// Scripts the action set of `cell`.
    #[must_use]
    pub fn with_actions(mut self, cell: Cell, actions: Vec<Cell>) -> Self {
        let _ = self.actions.insert(cell, actions);
        self
    }

    /// Overrides the cost of a unit type.
    #[must_use]
    pub fn with_cost(mut self, kind: UnitKind, cost: f64) -> Self {
        let _ = self.costs.insert(kind, cost);
        self
    }

    /// Sets both resource balances.
    #[must_use]
    pub fn with_resources(mut self, bits: f64, cores: f64) -> Self {
        self.bits = bits;
        self.cores = cores;
        self
    }

    /// Deployments accepted so far, in request order.
    #[must_use]
    pub fn spawned(&self) -> &[SpawnIntent] {
        &self.spawned
    }

    /// Number of times the turn was submitted.
    #[must_use]
    pub fn submitted(&self) -> u32 {
        self.submitted
    }

    fn balance_mut(&mut self, kind: ResourceKind) -> &mut f64 {
        match kind {
            ResourceKind::Bits => &mut self.bits,
            ResourceKind::Cores => &mut self.cores,
        }
    }
}

impl GameState for StubState {
    fn path_to_edge(&self, start: Cell) -> Vec<Cell> {
        self.paths.get(&start).cloned().unwrap_or_default()
    }

    fn attackers_of(&self, cell: Cell, owner: Owner, kind: UnitKind) -> usize {
        self.attackers
            .get(&(cell, owner, kind))
            .copied()
            .unwrap_or(0)
    }

    fn is_occupied(&self, cell: Cell) -> bool {
        self.occupied.contains(&cell)
    }

    fn resource(&self, kind: ResourceKind) -> f64 {
        match kind {
            ResourceKind::Bits => self.bits,
            ResourceKind::Cores => self.cores,
        }
    }

    fn cost(&self, kind: UnitKind) -> f64 {
        self.costs.get(&kind).copied().unwrap_or(1.0)
    }

    fn attempt_spawn(&mut self, kind: UnitKind, cell: Cell, count: u32) -> Result<u32, SpawnError> {
        if count == 0 {
            return Err(SpawnError::EmptyRequest);
        }

        if self.occupied.contains(&cell) {
            return Err(SpawnError::Occupied(cell));
        }

        let cost = self.cost(kind);
        let balance = self.balance_mut(kind.resource());
        let available = *balance;
        let affordable = (available / cost).floor().min(f64::from(count)) as u32;
        if affordable == 0 {
            return Err(SpawnError::InsufficientResources {
                kind,
                needed: cost,
                available,
            });
        }

        *balance -= cost * f64::from(affordable);
        if kind.is_stationary() {
            let _ = self.occupied.insert(cell);
        }
        self.spawned.push(SpawnIntent::new(kind, cell, affordable));
        Ok(affordable)
    }

    fn submit_turn(&mut self) {
        self.submitted += 1;
    }

    fn possible_actions(&self, cell: Cell) -> Vec<Cell> {
        match self.actions.get(&cell) {
            Some(actions) => actions.clone(),
            None => cell.neighbors().filter(Cell::in_friendly_half).collect(),
        }
    }
}
