//! Immutable match configuration shared by every planner component.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::UnitKind;

/// Default penalty subtracted from a cell each time a breach is recorded there.
pub const DEFAULT_BREACH_PENALTY: f64 = 50.0;
/// Default discount factor applied to neighbouring values during a sweep.
pub const DEFAULT_DISCOUNT: f64 = 0.9;
/// Default number of value-iteration sweeps executed per turn.
pub const DEFAULT_SWEEPS: usize = 100;

/// Match configuration object delivered by the engine at game start.
///
/// Only the unit table is consumed; every other field is ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Per-unit statistics in roster order.
    #[serde(rename = "unitInformation")]
    pub unit_information: Vec<UnitInformation>,
}

impl GameConfig {
    /// Parses the engine's JSON configuration object.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Json)
    }
}

/// Statistics of a single unit type as published by the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitInformation {
    /// Short identifier the engine uses for the unit type.
    pub shorthand: String,
    /// Resource cost of one unit.
    #[serde(default)]
    pub cost: f64,
    /// Damage dealt per hit.
    #[serde(default)]
    pub damage: f64,
    /// Attack reach measured in cells.
    #[serde(default)]
    pub range: f64,
}

/// Errors raised while building the match configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration object did not describe the given unit type.
    #[error("unit table has no entry for {kind:?} (expected at index {index})")]
    MissingUnit {
        /// Unit type that could not be resolved.
        kind: UnitKind,
        /// Position the unit was expected at in the unit table.
        index: usize,
    },
    /// A unit type was published with a non-positive cost.
    #[error("unit {kind:?} has invalid cost {cost}")]
    InvalidCost {
        /// Unit type with the invalid cost.
        kind: UnitKind,
        /// Cost found in the configuration.
        cost: f64,
    },
    /// The configuration object was not valid JSON.
    #[error("could not parse game configuration: {0}")]
    Json(#[source] serde_json::Error),
}

/// Resolved statistics for a single unit type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitSpec {
    /// Short identifier the engine uses for the unit type.
    pub shorthand: String,
    /// Resource cost of one unit.
    pub cost: f64,
    /// Damage dealt per hit.
    pub damage: f64,
    /// Attack reach measured in cells.
    pub range: f64,
}

/// Statistics for every unit type, indexed by [`UnitKind`].
#[derive(Clone, Debug, PartialEq)]
pub struct UnitRoster {
    specs: Vec<UnitSpec>,
}

impl UnitRoster {
    /// Resolves the roster from the engine's unit table.
    ///
    /// Entries are matched to unit types by position. Extra entries are
    /// ignored.
    pub fn from_game_config(config: &GameConfig) -> Result<Self, ConfigError> {
        let mut specs = Vec::with_capacity(UnitKind::ALL.len());
        for kind in UnitKind::ALL {
            let index = kind.index();
            let info = config
                .unit_information
                .get(index)
                .ok_or(ConfigError::MissingUnit { kind, index })?;
            if !(info.cost > 0.0) {
                return Err(ConfigError::InvalidCost {
                    kind,
                    cost: info.cost,
                });
            }
            specs.push(UnitSpec {
                shorthand: info.shorthand.clone(),
                cost: info.cost,
                damage: info.damage,
                range: info.range,
            });
        }

        Ok(Self { specs })
    }

    /// Statistics for the provided unit type.
    #[must_use]
    pub fn spec(&self, kind: UnitKind) -> &UnitSpec {
        &self.specs[kind.index()]
    }

    /// Resource cost of one unit of the provided type.
    #[must_use]
    pub fn cost(&self, kind: UnitKind) -> f64 {
        self.spec(kind).cost
    }

    /// Damage dealt per hit by the provided type.
    #[must_use]
    pub fn damage(&self, kind: UnitKind) -> f64 {
        self.spec(kind).damage
    }

    /// Attack reach of the provided type measured in cells.
    #[must_use]
    pub fn range(&self, kind: UnitKind) -> f64 {
        self.spec(kind).range
    }

    /// Engine shorthand of the provided type.
    #[must_use]
    pub fn shorthand(&self, kind: UnitKind) -> &str {
        &self.spec(kind).shorthand
    }
}

/// Controls how long recorded breaches keep contributing penalties.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreachMemory {
    /// Every breach ever recorded is penalised again on each turn.
    #[default]
    Cumulative,
    /// Breaches are penalised once, on the turn after they were observed.
    PerTurn,
}

/// Adjustable planner parameters. Every field has a default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Amount subtracted from a cell for each recorded breach.
    pub breach_penalty: f64,
    /// Discount applied to the best neighbouring value during a sweep.
    pub discount: f64,
    /// Number of sweeps executed per turn.
    pub sweeps: usize,
    /// Lifetime of recorded breaches.
    pub breach_memory: BreachMemory,
    /// Stationary unit placed by the defensive planner.
    pub defender: UnitKind,
    /// Friendly stationary unit types whose fire is charged against
    /// simulated opponent paths.
    pub threat_sources: Vec<UnitKind>,
    /// Opponent stationary unit type whose fire is charged against
    /// simulated friendly paths.
    pub risk_source: UnitKind,
    /// Mobile unit types launched each turn, highest priority first.
    pub wave_priority: Vec<UnitKind>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            breach_penalty: DEFAULT_BREACH_PENALTY,
            discount: DEFAULT_DISCOUNT,
            sweeps: DEFAULT_SWEEPS,
            breach_memory: BreachMemory::Cumulative,
            defender: UnitKind::Destructor,
            threat_sources: vec![UnitKind::Destructor, UnitKind::Encryptor],
            risk_source: UnitKind::Destructor,
            wave_priority: vec![UnitKind::Ping, UnitKind::Emp, UnitKind::Scrambler],
        }
    }
}

/// Complete immutable configuration handed to the planner at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct StrategyConfig {
    roster: UnitRoster,
    tuning: Tuning,
}

impl StrategyConfig {
    /// Combines the resolved unit roster with planner tuning.
    #[must_use]
    pub fn new(roster: UnitRoster, tuning: Tuning) -> Self {
        Self { roster, tuning }
    }

    /// Builds the configuration directly from the engine's JSON object using
    /// default tuning.
    pub fn from_game_json(json: &str) -> Result<Self, ConfigError> {
        let config = GameConfig::from_json(json)?;
        let roster = UnitRoster::from_game_config(&config)?;
        Ok(Self::new(roster, Tuning::default()))
    }

    /// Unit statistics for the match.
    #[must_use]
    pub fn roster(&self) -> &UnitRoster {
        &self.roster
    }

    /// Planner parameters for the match.
    #[must_use]
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "seasonCompatibilityModeP1": 5,
        "unitInformation": [
            {"shorthand": "FF", "cost": 1.0, "display": "Filter"},
            {"shorthand": "EF", "cost": 4.0, "range": 3.0},
            {"shorthand": "DF", "cost": 3.0, "damage": 4.0, "range": 3.0},
            {"shorthand": "PI", "cost": 1.0, "damage": 1.0, "range": 3.0},
            {"shorthand": "EI", "cost": 3.0, "damage": 3.0, "range": 5.0},
            {"shorthand": "SI", "cost": 1.0, "damage": 1.0, "range": 3.0}
        ]
    }"#;

    #[test]
    fn roster_matches_units_by_position() {
        let config = StrategyConfig::from_game_json(CONFIG).expect("config parses");
        let roster = config.roster();
        assert_eq!(roster.shorthand(UnitKind::Destructor), "DF");
        assert_eq!(roster.shorthand(UnitKind::Scrambler), "SI");
        assert!((roster.damage(UnitKind::Destructor) - 4.0).abs() < f64::EPSILON);
        assert!((roster.cost(UnitKind::Emp) - 3.0).abs() < f64::EPSILON);
        assert!(roster.damage(UnitKind::Filter).abs() < f64::EPSILON);
    }

    #[test]
    fn short_unit_table_is_rejected() {
        let json = r#"{"unitInformation": [{"shorthand": "FF", "cost": 1.0}]}"#;
        let error = StrategyConfig::from_game_json(json).expect_err("table is short");
        assert!(matches!(
            error,
            ConfigError::MissingUnit {
                kind: UnitKind::Encryptor,
                index: 1
            }
        ));
    }

    #[test]
    fn zero_cost_unit_is_rejected() {
        let json = CONFIG.replace(r#""cost": 3.0, "damage": 4.0"#, r#""cost": 0.0, "damage": 4.0"#);
        let error = StrategyConfig::from_game_json(&json).expect_err("zero cost");
        assert!(matches!(
            error,
            ConfigError::InvalidCost {
                kind: UnitKind::Destructor,
                ..
            }
        ));
    }

    #[test]
    fn tuning_defaults_fill_missing_fields() {
        let tuning: Tuning = serde_json::from_str(r#"{"sweeps": 3}"#).expect("tuning parses");
        assert_eq!(tuning.sweeps, 3);
        assert!((tuning.discount - DEFAULT_DISCOUNT).abs() < f64::EPSILON);
        assert_eq!(tuning.breach_memory, BreachMemory::Cumulative);
        assert_eq!(
            tuning.wave_priority,
            vec![UnitKind::Ping, UnitKind::Emp, UnitKind::Scrambler]
        );
    }
}
