#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Threat map estimator that learns which friendly cells need defending.
//!
//! The estimator owns a [`ValueSurface`] covering the friendly half. Each turn
//! it penalises recorded breach locations, charges simulated opponent routes
//! with the damage friendly defenders deal along them, and propagates the
//! penalties with synchronous value iteration. The most penalised cells are
//! then fortified first.

mod surface;

use std::collections::BTreeSet;

use breach_planner_core::{
    opponent_launch_cells, BreachEvent, Cell, Edge, GameState, Owner, SpawnIntent,
    StrategyConfig, UnitKind,
};
use log::{debug, info};

pub use crate::surface::{SurfaceEntry, SurfaceSnapshot, ValueSurface};

/// Ordered record of friendly cells the opponent scored through.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BreachLog {
    cells: Vec<Cell>,
}

impl BreachLog {
    /// Creates an empty breach log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the location of every breach scored by an opponent unit.
    ///
    /// Breaches scored by friendly units are ignored. Returns the number of
    /// locations recorded.
    pub fn observe(&mut self, events: &[BreachEvent]) -> usize {
        let before = self.cells.len();
        for event in events.iter().filter(|event| event.against_friendly()) {
            info!("scored on at {:?}", event.location);
            self.cells.push(event.location);
        }
        self.cells.len() - before
    }

    /// Recorded locations in observation order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of recorded locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Forgets every recorded location.
    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

/// Persistent estimator of how threatened each friendly cell is.
#[derive(Clone, Debug)]
pub struct ThreatMap {
    surface: ValueSurface,
    launch_cells: Vec<Cell>,
    breach_penalty: f64,
    discount: f64,
    sweeps: usize,
    threat_sources: Vec<(UnitKind, f64)>,
    defender: UnitKind,
}

impl ThreatMap {
    /// Creates an estimator with a zeroed surface over the friendly half.
    #[must_use]
    pub fn new(config: &StrategyConfig) -> Self {
        let tuning = config.tuning();
        let roster = config.roster();
        Self {
            surface: ValueSurface::friendly(),
            launch_cells: opponent_launch_cells(),
            breach_penalty: tuning.breach_penalty,
            discount: tuning.discount,
            sweeps: tuning.sweeps,
            threat_sources: tuning
                .threat_sources
                .iter()
                .map(|kind| (*kind, roster.damage(*kind)))
                .collect(),
            defender: tuning.defender,
        }
    }

    /// Current value surface.
    #[must_use]
    pub fn surface(&self) -> &ValueSurface {
        &self.surface
    }

    /// Loads previously captured values into the surface.
    ///
    /// Returns the number of values restored.
    pub fn restore(&mut self, snapshot: &SurfaceSnapshot) -> usize {
        self.surface.restore(snapshot)
    }

    /// Opponent launch cells whose routes are simulated each turn.
    #[must_use]
    pub fn launch_cells(&self) -> &[Cell] {
        &self.launch_cells
    }

    /// Refreshes the surface from this turn's breaches and the current map.
    ///
    /// Applies breach penalties, charges simulated opponent routes, then runs
    /// the configured number of sweeps.
    pub fn update<G>(&mut self, breaches: &[Cell], state: &G)
    where
        G: GameState + ?Sized,
    {
        let penalised = self.apply_breaches(breaches);
        self.apply_path_damage(state);
        self.iterate(state);
        debug!(
            "threat map updated: {penalised} breach penalties, {} sweeps",
            self.sweeps
        );
    }

    /// Subtracts the breach penalty once per recorded location.
    ///
    /// Locations outside the friendly half are skipped. Returns the number of
    /// penalties applied.
    pub fn apply_breaches(&mut self, breaches: &[Cell]) -> usize {
        let penalty = self.breach_penalty;
        breaches
            .iter()
            .filter(|cell| self.surface.adjust(**cell, -penalty))
            .count()
    }

    /// Charges every simulated opponent route with friendly defender fire.
    ///
    /// Damage accumulates along each route and is never reset between
    /// points, so every friendly point is charged with the total dealt up to
    /// and including itself.
    pub fn apply_path_damage<G>(&mut self, state: &G)
    where
        G: GameState + ?Sized,
    {
        for &launch in &self.launch_cells {
            let mut damage = 0.0;
            for point in state.path_to_edge(launch) {
                for &(kind, per_hit) in &self.threat_sources {
                    damage += state.attackers_of(point, Owner::Friendly, kind) as f64 * per_hit;
                }
                let _ = self.surface.adjust(point, -damage);
            }
        }
    }

    /// Runs the configured number of synchronous sweeps using the engine's
    /// action model.
    pub fn iterate<G>(&mut self, state: &G)
    where
        G: GameState + ?Sized,
    {
        for _ in 0..self.sweeps {
            self.surface
                .sweep(self.discount, |cell| state.possible_actions(cell));
        }
    }

    /// Fortifies the most threatened cells first.
    ///
    /// Cells are visited from lowest to highest value. Friendly launch edge
    /// cells are skipped, rejected placements are skipped, and the walk stops
    /// once the defender is no longer affordable. Returns the placements that
    /// were accepted, in order.
    pub fn choose_defense_placements<G>(&self, state: &mut G) -> Vec<SpawnIntent>
    where
        G: GameState + ?Sized,
    {
        let launch_edge: BTreeSet<Cell> = Edge::FRIENDLY
            .into_iter()
            .flat_map(|edge| state.edge_cells(edge))
            .collect();
        let cost = state.cost(self.defender);
        let resource = self.defender.resource();

        let mut placements = Vec::new();
        for (cell, _) in self.surface.ranked() {
            if state.resource(resource) < cost {
                break;
            }

            if launch_edge.contains(&cell) {
                continue;
            }

            match state.attempt_spawn(self.defender, cell, 1) {
                Ok(_) => placements.push(SpawnIntent::new(self.defender, cell, 1)),
                Err(reason) => debug!("skipped {:?} at {cell:?}: {reason}", self.defender),
            }
        }

        debug!("placed {} defenders", placements.len());
        placements
    }
}
