#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Risk-scoring selector that picks launch cells for offensive waves.
//!
//! Each candidate launch cell is scored by walking the route a mobile unit
//! would follow from it and summing the fire opponent structures could pour
//! onto that route. The least risky cell receives the wave, provided the wave
//! is large enough to outlast the estimated damage.

use breach_planner_core::{Cell, Edge, GameState, Owner, SpawnIntent, StrategyConfig, UnitKind};
use log::debug;
use thiserror::Error;

/// Failures reported by the spawn selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// Every candidate launch cell was occupied, or none was offered.
    #[error("no unoccupied launch cell is available")]
    NoCandidates,
}

/// Picks launch cells for mobile waves by estimated route damage.
#[derive(Clone, Debug)]
pub struct SpawnSelector {
    risk_source: UnitKind,
    damage_per_hit: f64,
}

impl SpawnSelector {
    /// Creates a selector charging routes with the configured opponent
    /// structure's damage.
    #[must_use]
    pub fn new(config: &StrategyConfig) -> Self {
        let risk_source = config.tuning().risk_source;
        Self {
            risk_source,
            damage_per_hit: config.roster().damage(risk_source),
        }
    }

    /// Estimated damage a unit launched at `cell` takes on its way across.
    #[must_use]
    pub fn risk_score<G>(&self, cell: Cell, state: &G) -> f64
    where
        G: GameState + ?Sized,
    {
        state
            .path_to_edge(cell)
            .into_iter()
            .map(|point| {
                state.attackers_of(point, Owner::Opponent, self.risk_source) as f64
                    * self.damage_per_hit
            })
            .sum()
    }

    /// Unoccupied candidate with the lowest risk score.
    ///
    /// Ties resolve to the candidate listed first.
    pub fn least_risky_launch_cell<G>(
        &self,
        candidates: &[Cell],
        state: &G,
    ) -> Result<Cell, SelectorError>
    where
        G: GameState + ?Sized,
    {
        let mut best: Option<(Cell, f64)> = None;
        for &cell in candidates.iter().filter(|cell| !state.is_occupied(**cell)) {
            let risk = self.risk_score(cell, state);
            match best {
                Some((_, lowest)) if risk >= lowest => {}
                _ => best = Some((cell, risk)),
            }
        }

        best.map(|(cell, _)| cell).ok_or(SelectorError::NoCandidates)
    }

    /// Reports whether `count` units launched at `cell` outlast the route's
    /// estimated damage.
    #[must_use]
    pub fn will_rush_survive<G>(&self, cell: Cell, count: u32, state: &G) -> bool
    where
        G: GameState + ?Sized,
    {
        f64::from(count) - self.risk_score(cell, state) > 0.0
    }

    /// Launches as many `kind` units as `budget` affords from the least risky
    /// friendly launch cell, provided the rush survives.
    ///
    /// Returns the accepted deployment, or `None` when the rush would not
    /// survive or the engine rejected it.
    pub fn plan_offensive_wave<G>(
        &self,
        budget: f64,
        kind: UnitKind,
        state: &mut G,
    ) -> Result<Option<SpawnIntent>, SelectorError>
    where
        G: GameState + ?Sized,
    {
        let candidates: Vec<Cell> = Edge::FRIENDLY
            .into_iter()
            .flat_map(|edge| state.edge_cells(edge))
            .collect();
        let cell = self.least_risky_launch_cell(&candidates, state)?;

        let count = (budget / state.cost(kind)).floor().max(0.0) as u32;
        if !self.will_rush_survive(cell, count, state) {
            debug!("holding {count} {kind:?} at {cell:?}: rush would not survive");
            return Ok(None);
        }

        match state.attempt_spawn(kind, cell, count) {
            Ok(spawned) => Ok(Some(SpawnIntent::new(kind, cell, spawned))),
            Err(reason) => {
                debug!("wave of {kind:?} at {cell:?} rejected: {reason}");
                Ok(None)
            }
        }
    }
}
