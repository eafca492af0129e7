use std::{fs, path::Path};

use anyhow::{Context, Result};
use breach_planner_core::{BreachEvent, Cell, GameConfig, Tuning, UnitKind};
use serde::Deserialize;

/// Scripted match replayed by the command-line adapter.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Scenario {
    /// Engine configuration object delivered at match start.
    pub config: GameConfig,
    /// Planner parameters; omitted fields keep their defaults.
    #[serde(default)]
    pub tuning: Tuning,
    /// Turns replayed in order.
    pub turns: Vec<ScriptedTurn>,
}

/// State injected into the arena before the planner acts on a turn.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ScriptedTurn {
    /// Friendly mobile-unit resource balance.
    #[serde(default)]
    pub bits: f64,
    /// Friendly stationary-unit resource balance.
    #[serde(default)]
    pub cores: f64,
    /// Structures the opponent builds before the turn.
    #[serde(default)]
    pub opponent: Vec<ScriptedUnit>,
    /// Breaches reported by the previous turn's action frames.
    #[serde(default)]
    pub breaches: Vec<BreachEvent>,
}

/// Opponent structure placed by a scripted turn.
#[derive(Clone, Copy, Debug, Deserialize)]
pub(crate) struct ScriptedUnit {
    /// Unit type of the structure.
    pub kind: UnitKind,
    /// Cell the structure occupies.
    pub cell: Cell,
}

impl Scenario {
    /// Reads a scenario from a JSON file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse scenario {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use breach_planner_core::Owner;

    use super::*;

    #[test]
    fn turn_fields_default_when_omitted() {
        let json = r#"{
            "config": {"unitInformation": []},
            "tuning": {"sweeps": 5},
            "turns": [
                {"cores": 4},
                {"breaches": [{"location": {"x": 10, "y": 3}, "owner": "opponent"}],
                 "opponent": [{"kind": "destructor", "cell": {"x": 13, "y": 17}}]}
            ]
        }"#;

        let scenario: Scenario = serde_json::from_str(json).expect("scenario parses");

        assert_eq!(scenario.tuning.sweeps, 5);
        assert_eq!(scenario.turns.len(), 2);
        assert!(scenario.turns[0].breaches.is_empty());
        assert_eq!(scenario.turns[0].bits, 0.0);
        assert_eq!(
            scenario.turns[1].breaches,
            vec![BreachEvent::new(Cell::new(10, 3), Owner::Opponent)]
        );
        assert_eq!(scenario.turns[1].opponent[0].kind, UnitKind::Destructor);
    }
}
