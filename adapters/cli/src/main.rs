#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays scripted matches through the planner.

mod scenario;
mod surface_transfer;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use breach_planner_core::{Command, Event, Owner, SpawnIntent, StrategyConfig, UnitRoster};
use breach_planner_system_turn::{Strategy, TurnReport};
use breach_planner_world::{self as world, query, PlayerTurn, World};
use clap::Parser;
use log::{info, warn, LevelFilter};

use crate::scenario::{Scenario, ScriptedTurn};

/// Number of most threatened cells printed after each turn.
const THREATENED_SHOWN: usize = 3;

/// Replays a scripted match through the breach planner.
#[derive(Debug, Parser)]
#[command(name = "breach-planner", version)]
struct Args {
    /// Scenario file describing the match configuration and scripted turns.
    #[arg(long)]
    scenario: PathBuf,

    /// Seeds the threat map from a surface transfer string stored in this file.
    #[arg(long, value_name = "FILE")]
    load_surface: Option<PathBuf>,

    /// Writes the final threat map as a surface transfer string to this file.
    #[arg(long, value_name = "FILE")]
    save_surface: Option<PathBuf>,

    /// Logs planner decisions at debug level.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only logs warnings and errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        }
    }
}

/// Entry point for the breach planner command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.level())?;

    let scenario = Scenario::load(&args.scenario)?;
    let roster = UnitRoster::from_game_config(&scenario.config)
        .context("scenario configuration has an unusable unit table")?;
    let config = StrategyConfig::new(roster.clone(), scenario.tuning.clone());
    let mut strategy = Strategy::new(&config);
    let mut arena = World::new(roster);

    if let Some(path) = &args.load_surface {
        let encoded = fs::read_to_string(path)
            .with_context(|| format!("failed to read surface {}", path.display()))?;
        let snapshot = surface_transfer::decode(&encoded)
            .with_context(|| format!("failed to decode surface {}", path.display()))?;
        let restored = strategy.restore(&snapshot);
        info!("restored {restored} threat values from {}", path.display());
    }

    for (index, turn) in scenario.turns.iter().enumerate() {
        prepare_turn(&mut arena, turn);
        let _ = strategy.on_action_frame(&turn.breaches);

        let report = {
            let mut player = PlayerTurn::new(&mut arena, Owner::Friendly);
            strategy.on_turn(&mut player)
        };
        println!("{}", describe_turn(index + 1, &report, &strategy));
    }

    if let Some(path) = &args.save_surface {
        let encoded = surface_transfer::encode(&strategy.threat_map().surface().snapshot())
            .context("failed to encode threat map")?;
        fs::write(path, encoded)
            .with_context(|| format!("failed to write surface {}", path.display()))?;
        info!("saved threat map to {}", path.display());
    }

    Ok(())
}

fn init_logging(level: LevelFilter) -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
        .context("failed to install logger")
}

/// Funds both players and builds the opponent's scripted structures.
fn prepare_turn(arena: &mut World, turn: &ScriptedTurn) {
    let mut events = Vec::new();
    let opponent_cores: f64 = turn
        .opponent
        .iter()
        .map(|unit| query::roster(arena).cost(unit.kind))
        .sum();

    world::apply(
        arena,
        Command::SetResources {
            owner: Owner::Friendly,
            bits: turn.bits,
            cores: turn.cores,
        },
        &mut events,
    );
    world::apply(
        arena,
        Command::SetResources {
            owner: Owner::Opponent,
            bits: 0.0,
            cores: opponent_cores,
        },
        &mut events,
    );
    for unit in &turn.opponent {
        world::apply(
            arena,
            Command::Spawn {
                owner: Owner::Opponent,
                kind: unit.kind,
                cell: unit.cell,
            },
            &mut events,
        );
    }

    for event in &events {
        if let Event::SpawnRejected {
            kind, cell, reason, ..
        } = event
        {
            warn!("scripted opponent {kind:?} at {cell:?} ignored: {reason}");
        }
    }
}

fn describe_turn(number: usize, report: &TurnReport, strategy: &Strategy) -> String {
    let threatened: Vec<String> = strategy
        .threat_map()
        .surface()
        .ranked()
        .into_iter()
        .take(THREATENED_SHOWN)
        .map(|(cell, value)| format!("({},{})={value:.1}", cell.x(), cell.y()))
        .collect();

    format!(
        "turn {number}: defenders [{}] waves [{}] threatened [{}]",
        describe_intents(&report.placements),
        describe_intents(&report.waves),
        threatened.join(" ")
    )
}

fn describe_intents(intents: &[SpawnIntent]) -> String {
    intents
        .iter()
        .map(|intent| {
            format!(
                "{}x{:?}@({},{})",
                intent.count,
                intent.kind,
                intent.cell.x(),
                intent.cell.y()
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}
