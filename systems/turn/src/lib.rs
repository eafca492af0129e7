#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn orchestrator that sequences the planning systems.
//!
//! Every turn refreshes the threat map from the recorded breaches, spends
//! stationary resources on defenders, launches offensive waves in priority
//! order and finally submits the turn.

use breach_planner_core::{
    BreachEvent, BreachMemory, GameState, SpawnIntent, StrategyConfig, UnitKind,
};
use breach_planner_system_spawn_selector::SpawnSelector;
use breach_planner_system_threat_map::{BreachLog, SurfaceSnapshot, ThreatMap};
use log::{info, warn};

/// Deployments made during one turn.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TurnReport {
    /// Defenders placed, most threatened cell first.
    pub placements: Vec<SpawnIntent>,
    /// Offensive waves launched, in priority order.
    pub waves: Vec<SpawnIntent>,
}

/// Planner state carried across the whole match.
#[derive(Clone, Debug)]
pub struct Strategy {
    threat_map: ThreatMap,
    breaches: BreachLog,
    selector: SpawnSelector,
    wave_priority: Vec<UnitKind>,
    breach_memory: BreachMemory,
}

impl Strategy {
    /// Creates the planner for a match.
    #[must_use]
    pub fn new(config: &StrategyConfig) -> Self {
        let tuning = config.tuning();
        Self {
            threat_map: ThreatMap::new(config),
            breaches: BreachLog::new(),
            selector: SpawnSelector::new(config),
            wave_priority: tuning.wave_priority.clone(),
            breach_memory: tuning.breach_memory,
        }
    }

    /// Records breaches reported by an action frame.
    ///
    /// Returns the number of breaches scored against the friendly defense.
    pub fn on_action_frame(&mut self, events: &[BreachEvent]) -> usize {
        self.breaches.observe(events)
    }

    /// Plans and submits one turn.
    pub fn on_turn<G>(&mut self, state: &mut G) -> TurnReport
    where
        G: GameState + ?Sized,
    {
        self.threat_map.update(self.breaches.cells(), &*state);
        if self.breach_memory == BreachMemory::PerTurn {
            self.breaches.clear();
        }

        let placements = self.threat_map.choose_defense_placements(state);

        let mut waves = Vec::new();
        for &kind in &self.wave_priority {
            let budget = state.resource(kind.resource());
            match self.selector.plan_offensive_wave(budget, kind, state) {
                Ok(Some(wave)) => waves.push(wave),
                Ok(None) => {}
                Err(error) => warn!("skipping {kind:?} wave: {error}"),
            }
        }

        state.submit_turn();
        info!(
            "turn planned: {} defenders, {} waves",
            placements.len(),
            waves.len()
        );

        TurnReport { placements, waves }
    }

    /// Threat estimator carried across turns.
    #[must_use]
    pub fn threat_map(&self) -> &ThreatMap {
        &self.threat_map
    }

    /// Breaches recorded and not yet forgotten.
    #[must_use]
    pub fn breaches(&self) -> &BreachLog {
        &self.breaches
    }

    /// Seeds the threat map from a previous match.
    ///
    /// Returns the number of values restored.
    pub fn restore(&mut self, snapshot: &SurfaceSnapshot) -> usize {
        self.threat_map.restore(snapshot)
    }
}
