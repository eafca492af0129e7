#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Reference arena implementing the engine capabilities the planner consumes.
//!
//! The arena tracks stationary units, resource balances and launched mobile
//! units for both players. It answers path and attacker queries the way the
//! planner expects from the real engine, but it never resolves combat.

mod navigation;
mod units;

use breach_planner_core::{
    Cell, Command, Edge, Event, GameState, Owner, ResourceKind, SpawnError, SpawnIntent,
    UnitKind, UnitRoster, HALF_ARENA,
};
use log::debug;

use crate::navigation::NavigationField;
use crate::units::UnitRegistry;

pub use crate::units::StationaryUnit;

/// Resource balances held by a single player.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Balance {
    bits: f64,
    cores: f64,
}

impl Balance {
    fn get(&self, kind: ResourceKind) -> f64 {
        match kind {
            ResourceKind::Bits => self.bits,
            ResourceKind::Cores => self.cores,
        }
    }

    fn spend(&mut self, kind: ResourceKind, amount: f64) {
        match kind {
            ResourceKind::Bits => self.bits -= amount,
            ResourceKind::Cores => self.cores -= amount,
        }
    }
}

/// Per-player state that changes every turn.
#[derive(Clone, Debug, Default)]
struct PlayerState {
    balance: Balance,
    launched: Vec<SpawnIntent>,
    turn: u32,
}

impl PlayerState {
    fn record_launch(&mut self, kind: UnitKind, cell: Cell) {
        if let Some(intent) = self
            .launched
            .iter_mut()
            .find(|intent| intent.kind == kind && intent.cell == cell)
        {
            intent.count += 1;
        } else {
            self.launched.push(SpawnIntent::new(kind, cell, 1));
        }
    }
}

/// Represents the authoritative arena state.
#[derive(Debug)]
pub struct World {
    roster: UnitRoster,
    units: UnitRegistry,
    friendly: PlayerState,
    opponent: PlayerState,
}

impl World {
    /// Creates an empty arena using the provided unit statistics.
    #[must_use]
    pub fn new(roster: UnitRoster) -> Self {
        Self {
            roster,
            units: UnitRegistry::new(),
            friendly: PlayerState::default(),
            opponent: PlayerState::default(),
        }
    }

    fn player(&self, owner: Owner) -> &PlayerState {
        match owner {
            Owner::Friendly => &self.friendly,
            Owner::Opponent => &self.opponent,
        }
    }

    fn player_mut(&mut self, owner: Owner) -> &mut PlayerState {
        match owner {
            Owner::Friendly => &mut self.friendly,
            Owner::Opponent => &mut self.opponent,
        }
    }

    fn validate_spawn(&self, owner: Owner, kind: UnitKind, cell: Cell) -> Result<(), SpawnError> {
        if !cell.in_arena() {
            return Err(SpawnError::OutOfBounds(cell));
        }

        if !owner.owns(cell) {
            return Err(SpawnError::ForeignHalf(cell));
        }

        if !kind.is_stationary() && !owner.launch_edges().iter().any(|edge| edge.contains(cell)) {
            return Err(SpawnError::NotOnLaunchEdge(cell));
        }

        if self.units.at(cell).is_some() {
            return Err(SpawnError::Occupied(cell));
        }

        let needed = self.roster.cost(kind);
        let available = self.player(owner).balance.get(kind.resource());
        if needed > available {
            return Err(SpawnError::InsufficientResources {
                kind,
                needed,
                available,
            });
        }

        Ok(())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetResources { owner, bits, cores } => {
            world.player_mut(owner).balance = Balance { bits, cores };
        }
        Command::Spawn { owner, kind, cell } => {
            if let Err(reason) = world.validate_spawn(owner, kind, cell) {
                debug!("rejected {kind:?} for {owner:?} at {cell:?}: {reason}");
                out_events.push(Event::SpawnRejected {
                    owner,
                    kind,
                    cell,
                    reason,
                });
                return;
            }

            let cost = world.roster.cost(kind);
            if kind.is_stationary() {
                let _ = world.units.insert(StationaryUnit { owner, kind, cell });
            }

            let player = world.player_mut(owner);
            player.balance.spend(kind.resource(), cost);
            if !kind.is_stationary() {
                player.record_launch(kind, cell);
            }

            out_events.push(Event::UnitSpawned { owner, kind, cell });
        }
        Command::RemoveUnit { cell } => {
            if let Some(unit) = world.units.remove(cell) {
                out_events.push(Event::UnitRemoved {
                    owner: unit.owner,
                    kind: unit.kind,
                    cell,
                });
            }
        }
        Command::SubmitTurn { owner } => {
            let player = world.player_mut(owner);
            let turn = player.turn;
            player.turn = player.turn.saturating_add(1);
            let launched = std::mem::take(&mut player.launched);
            out_events.push(Event::TurnSubmitted {
                owner,
                turn,
                launched,
            });
        }
    }
}

/// Edge a mobile unit starting at `start` heads for.
///
/// Units aim for the edge diagonally across from the quadrant they start in.
#[must_use]
pub fn target_edge(start: Cell) -> Edge {
    let left = start.x() < HALF_ARENA;
    let bottom = start.y() < HALF_ARENA;
    match (left, bottom) {
        (true, true) => Edge::TopRight,
        (false, true) => Edge::TopLeft,
        (true, false) => Edge::BottomRight,
        (false, false) => Edge::BottomLeft,
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use breach_planner_core::{Cell, Owner, ResourceKind, SpawnIntent, UnitKind, UnitRoster};

    use super::{target_edge, NavigationField, StationaryUnit, World};

    /// Unit statistics the arena was configured with.
    #[must_use]
    pub fn roster(world: &World) -> &UnitRoster {
        &world.roster
    }

    /// Route a mobile unit launched at `start` follows, including `start`.
    ///
    /// Empty when `start` lies outside the arena or under a stationary unit.
    #[must_use]
    pub fn path_to_edge(world: &World, start: Cell) -> Vec<Cell> {
        let mut field = NavigationField::default();
        field.rebuild_with(start, |cell| world.units.at(cell).is_some());

        field
            .destination(target_edge(start))
            .map(|destination| field.route_to(destination))
            .unwrap_or_default()
    }

    /// Number of `owner`'s stationary units of `kind` in reach of `cell`.
    #[must_use]
    pub fn attackers_of(world: &World, cell: Cell, owner: Owner, kind: UnitKind) -> usize {
        let range = world.roster.range(kind);
        if range <= 0.0 {
            return 0;
        }

        let reach = range * range;
        world
            .units
            .iter()
            .filter(|unit| unit.owner == owner && unit.kind == kind)
            .filter(|unit| unit.cell.distance_squared(cell) as f64 <= reach)
            .count()
    }

    /// Reports whether a stationary unit occupies the cell.
    #[must_use]
    pub fn is_occupied(world: &World, cell: Cell) -> bool {
        world.units.at(cell).is_some()
    }

    /// Stationary unit occupying the cell, if any.
    #[must_use]
    pub fn unit_at(world: &World, cell: Cell) -> Option<StationaryUnit> {
        world.units.at(cell).copied()
    }

    /// Every stationary unit in row-major cell order.
    pub fn stationary_units(world: &World) -> impl Iterator<Item = &StationaryUnit> {
        world.units.iter()
    }

    /// Resource balance currently held by `owner`.
    #[must_use]
    pub fn resource(world: &World, owner: Owner, kind: ResourceKind) -> f64 {
        world.player(owner).balance.get(kind)
    }

    /// Mobile units `owner` launched since its last submitted turn.
    #[must_use]
    pub fn launched(world: &World, owner: Owner) -> &[SpawnIntent] {
        &world.player(owner).launched
    }

    /// Number of turns `owner` has submitted.
    #[must_use]
    pub fn turn(world: &World, owner: Owner) -> u32 {
        world.player(owner).turn
    }
}

/// One player's view of the arena for the duration of a turn.
///
/// Every mutation goes through [`apply`]; the resulting events are retained
/// so callers can inspect what the turn did.
#[derive(Debug)]
pub struct PlayerTurn<'w> {
    world: &'w mut World,
    owner: Owner,
    events: Vec<Event>,
}

impl<'w> PlayerTurn<'w> {
    /// Opens a turn for `owner`.
    #[must_use]
    pub fn new(world: &'w mut World, owner: Owner) -> Self {
        Self {
            world,
            owner,
            events: Vec::new(),
        }
    }

    /// Events produced so far this turn.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Closes the view, yielding the events produced this turn.
    #[must_use]
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl GameState for PlayerTurn<'_> {
    fn path_to_edge(&self, start: Cell) -> Vec<Cell> {
        query::path_to_edge(self.world, start)
    }

    fn attackers_of(&self, cell: Cell, owner: Owner, kind: UnitKind) -> usize {
        query::attackers_of(self.world, cell, owner, kind)
    }

    fn is_occupied(&self, cell: Cell) -> bool {
        query::is_occupied(self.world, cell)
    }

    fn resource(&self, kind: ResourceKind) -> f64 {
        query::resource(self.world, self.owner, kind)
    }

    fn cost(&self, kind: UnitKind) -> f64 {
        self.world.roster.cost(kind)
    }

    fn attempt_spawn(&mut self, kind: UnitKind, cell: Cell, count: u32) -> Result<u32, SpawnError> {
        if count == 0 {
            return Err(SpawnError::EmptyRequest);
        }

        let mut spawned = 0;
        for _ in 0..count {
            let before = self.events.len();
            apply(
                self.world,
                Command::Spawn {
                    owner: self.owner,
                    kind,
                    cell,
                },
                &mut self.events,
            );

            match self.events[before..].last() {
                Some(Event::UnitSpawned { .. }) => spawned += 1,
                Some(Event::SpawnRejected { reason, .. }) if spawned == 0 => return Err(*reason),
                _ => break,
            }
        }

        Ok(spawned)
    }

    fn submit_turn(&mut self) {
        apply(
            self.world,
            Command::SubmitTurn { owner: self.owner },
            &mut self.events,
        );
    }
}
