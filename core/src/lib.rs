#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the breach planner.
//!
//! This crate defines the vocabulary that connects the engine collaborator,
//! the reference arena, and the pure planning systems. Systems query the
//! engine through the [`GameState`] trait, express placements as
//! [`SpawnIntent`] values, and observe breaches as [`BreachEvent`] values.
//! The reference arena additionally consumes [`Command`] values and reports
//! [`Event`] values, mirroring how the real engine accepts a turn.

mod arena;
mod config;
#[cfg(feature = "test-support")]
pub mod testing;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use arena::{
    arena_cells, friendly_region, opponent_launch_cells, Cell, Edge, ARENA_SIZE, HALF_ARENA,
};
pub use config::{
    BreachMemory, ConfigError, GameConfig, StrategyConfig, Tuning, UnitInformation, UnitRoster,
    UnitSpec, DEFAULT_BREACH_PENALTY, DEFAULT_DISCOUNT, DEFAULT_SWEEPS,
};

/// Player that owns a unit or a half of the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Owner {
    /// The player this planner acts for; owns the bottom half.
    Friendly,
    /// The opposing player; owns the top half.
    Opponent,
}

impl Owner {
    /// Reports whether the cell lies on this player's half of the arena.
    #[must_use]
    pub const fn owns(self, cell: Cell) -> bool {
        match self {
            Self::Friendly => cell.in_friendly_half(),
            Self::Opponent => cell.in_opponent_half(),
        }
    }

    /// Edges this player launches mobile units from.
    #[must_use]
    pub const fn launch_edges(self) -> [Edge; 2] {
        match self {
            Self::Friendly => Edge::FRIENDLY,
            Self::Opponent => Edge::OPPONENT,
        }
    }
}

/// Unit types available to both players, in engine roster order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Cheap stationary blocker.
    Filter,
    /// Stationary support structure.
    Encryptor,
    /// Stationary attacker.
    Destructor,
    /// Fast mobile attacker.
    Ping,
    /// Long-range mobile attacker.
    Emp,
    /// Mobile interceptor.
    Scrambler,
}

impl UnitKind {
    /// Every unit type in engine roster order.
    pub const ALL: [UnitKind; 6] = [
        UnitKind::Filter,
        UnitKind::Encryptor,
        UnitKind::Destructor,
        UnitKind::Ping,
        UnitKind::Emp,
        UnitKind::Scrambler,
    ];

    /// Position of the unit type in the engine's unit table.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Filter => 0,
            Self::Encryptor => 1,
            Self::Destructor => 2,
            Self::Ping => 3,
            Self::Emp => 4,
            Self::Scrambler => 5,
        }
    }

    /// Reports whether the unit stays where it was placed.
    #[must_use]
    pub const fn is_stationary(self) -> bool {
        matches!(self, Self::Filter | Self::Encryptor | Self::Destructor)
    }

    /// Resource spent to deploy the unit.
    #[must_use]
    pub const fn resource(self) -> ResourceKind {
        if self.is_stationary() {
            ResourceKind::Cores
        } else {
            ResourceKind::Bits
        }
    }
}

/// Resources a player spends on units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Spent on mobile units.
    Bits,
    /// Spent on stationary units.
    Cores,
}

/// Breach reported by the engine's action-frame feed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BreachEvent {
    /// Edge cell the scoring unit reached.
    pub location: Cell,
    /// Owner of the unit that scored.
    pub owner: Owner,
}

impl BreachEvent {
    /// Creates a new breach event.
    #[must_use]
    pub const fn new(location: Cell, owner: Owner) -> Self {
        Self { location, owner }
    }

    /// Reports whether the breach went through the friendly defense.
    #[must_use]
    pub const fn against_friendly(&self) -> bool {
        matches!(self.owner, Owner::Opponent)
    }
}

/// Deployment requested by a planning system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpawnIntent {
    /// Unit type to deploy.
    pub kind: UnitKind,
    /// Cell the units are deployed on.
    pub cell: Cell,
    /// Number of units deployed on the cell.
    pub count: u32,
}

impl SpawnIntent {
    /// Creates a new deployment intent.
    #[must_use]
    pub const fn new(kind: UnitKind, cell: Cell, count: u32) -> Self {
        Self { kind, cell, count }
    }
}

/// Reasons a spawn request may be rejected by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Error, Serialize, Deserialize)]
pub enum SpawnError {
    /// The requested cell lies outside the arena.
    #[error("cell {0:?} is outside the arena")]
    OutOfBounds(Cell),
    /// The requested cell lies on the other player's half.
    #[error("cell {0:?} is not on the spawning player's half")]
    ForeignHalf(Cell),
    /// Mobile units must be deployed on one of the player's launch edges.
    #[error("cell {0:?} is not on a launch edge")]
    NotOnLaunchEdge(Cell),
    /// A stationary unit already occupies the requested cell.
    #[error("cell {0:?} is occupied")]
    Occupied(Cell),
    /// The player cannot afford the unit.
    #[error("{kind:?} costs {needed} but only {available} is available")]
    InsufficientResources {
        /// Unit type that was requested.
        kind: UnitKind,
        /// Cost of one unit.
        needed: f64,
        /// Resource remaining at the time of the request.
        available: f64,
    },
    /// A deployment of zero units was requested.
    #[error("spawn count must be positive")]
    EmptyRequest,
}

/// Capabilities the planner consumes from the game engine for one turn.
///
/// Queries are evaluated against the current map state; `attempt_spawn`
/// mutates it for the remainder of the turn.
pub trait GameState {
    /// Deterministic route a mobile unit launched at `start` would follow to
    /// the opposite edge, including `start`. Empty when `start` is blocked.
    fn path_to_edge(&self, start: Cell) -> Vec<Cell>;

    /// Number of stationary units of `kind` owned by `owner` that can attack
    /// a unit standing on `cell`.
    fn attackers_of(&self, cell: Cell, owner: Owner, kind: UnitKind) -> usize;

    /// Reports whether a stationary unit occupies the cell.
    fn is_occupied(&self, cell: Cell) -> bool;

    /// Amount of the resource currently available to the planner.
    fn resource(&self, kind: ResourceKind) -> f64;

    /// Resource cost of one unit of the provided type.
    fn cost(&self, kind: UnitKind) -> f64;

    /// Deploys up to `count` units, stopping at the first rejection.
    ///
    /// Returns the number of units deployed, or the rejection reason when no
    /// unit could be deployed.
    fn attempt_spawn(&mut self, kind: UnitKind, cell: Cell, count: u32)
        -> Result<u32, SpawnError>;

    /// Finalises the deployments queued this turn.
    fn submit_turn(&mut self);

    /// Cells composing the provided edge.
    fn edge_cells(&self, edge: Edge) -> Vec<Cell> {
        edge.cells()
    }

    /// Cells considered reachable by one defensive decision taken at `cell`.
    ///
    /// Defaults to the friendly-half cells sharing a side with `cell`.
    fn possible_actions(&self, cell: Cell) -> Vec<Cell> {
        cell.neighbors()
            .filter(Cell::in_friendly_half)
            .collect()
    }
}

/// Commands accepted by the reference arena.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Overwrites a player's resource balances.
    SetResources {
        /// Player whose balances are replaced.
        owner: Owner,
        /// New mobile-unit resource balance.
        bits: f64,
        /// New stationary-unit resource balance.
        cores: f64,
    },
    /// Requests deployment of a single unit.
    Spawn {
        /// Player deploying the unit.
        owner: Owner,
        /// Unit type to deploy.
        kind: UnitKind,
        /// Cell the unit is deployed on.
        cell: Cell,
    },
    /// Removes the stationary unit occupying a cell, if any.
    RemoveUnit {
        /// Cell to clear.
        cell: Cell,
    },
    /// Ends the current turn for a player.
    SubmitTurn {
        /// Player submitting the turn.
        owner: Owner,
    },
}

/// Events reported by the reference arena after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a unit was deployed.
    UnitSpawned {
        /// Player that deployed the unit.
        owner: Owner,
        /// Unit type that was deployed.
        kind: UnitKind,
        /// Cell the unit was deployed on.
        cell: Cell,
    },
    /// Reports that a deployment was rejected.
    SpawnRejected {
        /// Player that requested the deployment.
        owner: Owner,
        /// Unit type that was requested.
        kind: UnitKind,
        /// Cell provided in the request.
        cell: Cell,
        /// Specific reason the request failed.
        reason: SpawnError,
    },
    /// Confirms that a stationary unit was removed.
    UnitRemoved {
        /// Player that owned the unit.
        owner: Owner,
        /// Unit type that was removed.
        kind: UnitKind,
        /// Cell that was cleared.
        cell: Cell,
    },
    /// Confirms that a player submitted a turn.
    TurnSubmitted {
        /// Player that submitted the turn.
        owner: Owner,
        /// Turn number that was submitted.
        turn: u32,
        /// Mobile units launched by the player during the turn.
        launched: Vec<SpawnIntent>,
    },
}
