#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives the AFK spot engine from scripted or
//! simulated host ticks.

mod config;
mod driver;
mod scenario;
mod simulate;

use std::path::PathBuf;

use afk_spot_core::{AttackRule, Command, SessionState, TopTile};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::Settings,
    driver::{CommandSender, Driver},
    scenario::Scenario,
    simulate::{Simulation, SIMULATED_PLANE, SIMULATED_REGION},
};

#[derive(Parser)]
#[command(
    name = "afk-spot",
    about = "Finds the tiles where attackable entities gather most densely"
)]
struct Cli {
    /// Settings file in TOML format.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Number of top tiles to report.
    #[arg(long, global = true)]
    tiles: Option<usize>,
    /// Delimiter-separated entity names to track.
    #[arg(long, global = true)]
    names: Option<String>,
    /// Rule deciding which action labels count as attack options.
    #[arg(long, global = true, value_enum)]
    rule: Option<RuleArg>,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Replay a scripted scenario file.
    Replay {
        /// Scenario file in TOML format.
        scenario: PathBuf,
    },
    /// Drive a seeded crowd of wandering entities.
    Simulate {
        /// Seed for the crowd's random walk.
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Number of ticks to simulate.
        #[arg(long, default_value_t = 50)]
        ticks: u32,
        /// Number of entities in the crowd.
        #[arg(long, default_value_t = 12)]
        entities: u32,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RuleArg {
    Exact,
    Substring,
}

impl RuleArg {
    fn to_rule(self) -> AttackRule {
        match self {
            Self::Exact => AttackRule::Exact,
            Self::Substring => AttackRule::Substring,
        }
    }
}

/// Entry point for the AFK spot command-line interface.
fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let file_settings = match &cli.config {
        Some(path) => Some(Settings::load(path)?),
        None => None,
    };

    match cli.mode {
        Mode::Replay { ref scenario } => {
            let scenario = Scenario::load(scenario)?;
            let base = file_settings.or_else(|| scenario.settings.clone());
            let settings = resolve_settings(&cli, base)?;
            replay(&settings, &scenario)
        }
        Mode::Simulate {
            seed,
            ticks,
            entities,
        } => {
            let settings = resolve_settings(&cli, file_settings)?;
            simulate(&settings, seed, ticks, entities)
        }
    }
}

fn resolve_settings(cli: &Cli, base: Option<Settings>) -> Result<Settings> {
    let mut settings = base.unwrap_or_default();
    if let Some(tiles) = cli.tiles {
        settings.number_of_tiles = tiles;
    }
    if let Some(names) = &cli.names {
        settings.npc_names.clone_from(names);
    }
    if let Some(rule) = cli.rule {
        settings.attack_rule = rule.to_rule();
    }
    settings.validated().context("invalid command-line settings")
}

fn start(settings: &Settings, session: SessionState) -> Result<(Driver, CommandSender)> {
    let driver = Driver::new();
    let sender = driver.sender();
    for command in settings.commands() {
        sender.send(command)?;
    }
    sender.send(Command::ChangeSession { state: session })?;
    Ok((driver, sender))
}

fn replay(settings: &Settings, scenario: &Scenario) -> Result<()> {
    let (mut driver, sender) = start(settings, scenario.initial_session)?;
    info!(ticks = scenario.ticks.len(), "replaying scenario");

    for script in &scenario.ticks {
        if let Some(state) = script.session() {
            sender.send(Command::ChangeSession { state })?;
        }
        if let Some(raw) = script.npc_names() {
            sender.send(Command::ConfigureNameFilter {
                raw: raw.to_owned(),
            })?;
        }

        if driver.tick(script.plane(), script.region(), script.entities())? {
            println!("tick {}: {}", driver.tick_index(), format_tiles(&driver.visible_tiles()));
        }
    }

    shutdown(driver, &sender)
}

fn simulate(settings: &Settings, seed: u64, ticks: u32, entities: u32) -> Result<()> {
    let (mut driver, sender) = start(settings, SessionState::LoggedIn)?;
    let mut simulation = Simulation::new(seed, entities);
    info!(seed, ticks, entities, "simulating crowd");

    for _ in 0..ticks {
        let view = simulation.next_tick();
        if driver.tick(SIMULATED_PLANE, SIMULATED_REGION, view)? {
            println!("tick {}: {}", driver.tick_index(), format_tiles(&driver.visible_tiles()));
        }
    }

    shutdown(driver, &sender)
}

fn shutdown(mut driver: Driver, sender: &CommandSender) -> Result<()> {
    sender.send(Command::Shutdown)?;
    let _ = driver.pump()?;
    Ok(())
}

fn format_tiles(tiles: &[TopTile]) -> String {
    if tiles.is_empty() {
        return "no occupied tiles".to_owned();
    }

    tiles
        .iter()
        .map(|tile| {
            let color = tile.severity().color();
            format!(
                "({}, {}, {}) x{} {:?} #{:02x}{:02x}{:02x}",
                tile.cell.x(),
                tile.cell.y(),
                tile.cell.plane(),
                tile.occupancy,
                tile.severity(),
                color.red(),
                color.green(),
                color.blue(),
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}
