use std::path::PathBuf;

use anyhow::{Context, Result};
use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use clap::Parser;

use bevy_ballbox::{BallboxPlugin, CollisionStrategy, Overrides, ScenarioConfig, SimulationState};

#[derive(Parser, Debug)]
#[command(about = "Elastic ball collisions in a 2D box")]
struct Args {
    /// Scenario YAML; defaults are used for anything it leaves out.
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Generate this many random bodies instead of any listed in the scenario.
    #[arg(short = 'n', long)]
    bodies: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(short, long)]
    frames: Option<usize>,

    #[arg(long, value_enum)]
    strategy: Option<CollisionStrategy>,

    #[arg(long)]
    record_every: Option<usize>,

    /// Write the recorded trajectory here as JSON.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

// load here to keep main clean
fn load_scenario(args: &Args) -> Result<ScenarioConfig> {
    let mut cfg = match &args.scenario {
        Some(path) => ScenarioConfig::load(path)?,
        None => ScenarioConfig::default(),
    };

    cfg.apply(&Overrides {
        bodies: args.bodies,
        seed: args.seed,
        frames: args.frames,
        strategy: args.strategy,
        record_every: args.record_every,
    })?;

    Ok(cfg)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = load_scenario(&args)?;

    let state = SimulationState::from_bodies(cfg.initial_bodies(), &cfg.world)
        .context("invalid initial conditions")?;

    let mut plugin = BallboxPlugin::new(state, cfg.run);
    if let Some(path) = args.output {
        plugin = plugin.with_output(path);
    }

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };

    App::new()
        .add_plugins(MinimalPlugins)
        .add_plugin(LogPlugin {
            level,
            ..Default::default()
        })
        .add_plugin(plugin)
        .run();

    Ok(())
}
