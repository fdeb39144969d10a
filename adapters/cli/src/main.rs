#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Lifeline Defence session.

mod tower_spec;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{bail, Context};
use clap::Parser;
use lifeline_defence_core::{CellCoord, Command, Event, GamePhase, Tuning};
use lifeline_defence_simulation::Simulation;
use lifeline_defence_system_builder::{Builder, BuilderInput};
use lifeline_defence_world::{self as world, query, World};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tower_spec::{CellSpec, TowerSpec};

/// Runs a Lifeline Defence session without a renderer and prints a summary.
#[derive(Debug, Parser)]
#[command(name = "lifeline-defence", version)]
struct Args {
    /// Seed for the enemy spawner.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Simulated frames per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// Stop after this many simulated seconds.
    #[arg(long, default_value_t = 300)]
    max_seconds: u32,
    /// Stop once this wave starts.
    #[arg(long)]
    until_wave: Option<u32>,
    /// Tower to buy before the first tick, as `<kind>@<column>,<row>`.
    #[arg(long = "tower")]
    towers: Vec<TowerSpec>,
    /// Cell whose tower should be merged with an adjacent partner, as `<column>,<row>`.
    #[arg(long = "merge")]
    merges: Vec<CellSpec>,
    /// TOML file overriding the default tuning.
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Print the effective tuning as TOML and exit.
    #[arg(long)]
    dump_tuning: bool,
}

/// Outcome of a headless session.
#[derive(Debug)]
struct Summary {
    phase: GamePhase,
    elapsed: Duration,
    wave: u32,
    health: u32,
    coins: u32,
    kills: u32,
    leaks: u32,
    towers: usize,
}

/// Entry point for the Lifeline Defence command-line interface.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let tuning = load_tuning(args.tuning.as_ref())?;
    if args.dump_tuning {
        println!("{}", toml::to_string_pretty(&tuning)?);
        return Ok(());
    }

    let summary = run(&args, tuning)?;
    println!("phase:   {:?}", summary.phase);
    println!("time:    {:.1}s", summary.elapsed.as_secs_f32());
    println!("wave:    {}", summary.wave);
    println!("health:  {}", summary.health);
    println!("coins:   {}", summary.coins);
    println!("kills:   {}", summary.kills);
    println!("leaks:   {}", summary.leaks);
    println!("towers:  {}", summary.towers);
    Ok(())
}

fn load_tuning(path: Option<&PathBuf>) -> anyhow::Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid tuning file {}", path.display()))
}

fn run(args: &Args, tuning: Tuning) -> anyhow::Result<Summary> {
    if args.fps == 0 {
        bail!("--fps must be positive");
    }

    let mut world = World::with_tuning(tuning);
    println!("{}", query::welcome_banner(&world));

    let mut events = Vec::new();
    world::apply(&mut world, Command::StartGame, &mut events);

    let mut builder = Builder::from_tuning(query::tuning(&world));
    let mut commands = Vec::new();
    builder.handle(
        &events,
        None,
        BuilderInput::default(),
        &query::tower_view(&world),
        &mut commands,
    );

    for spec in &args.towers {
        world::apply(&mut world, Command::SelectWeapon { kind: spec.kind }, &mut events);
        build(&mut world, &mut builder, spec.cell, BuilderInput::new(true, false));
    }
    for CellSpec(cell) in &args.merges {
        build(&mut world, &mut builder, *cell, BuilderInput::new(false, true));
    }

    let mut simulation = Simulation::for_world(&world, args.seed);
    let dt = Duration::from_secs(1) / args.fps;
    let frames = u64::from(args.max_seconds) * u64::from(args.fps);
    for _ in 0..frames {
        if query::phase(&world) != GamePhase::Playing {
            break;
        }
        if args
            .until_wave
            .is_some_and(|wave| query::wave(&world).wave >= wave)
        {
            break;
        }

        events.clear();
        simulation.tick(&mut world, dt, &mut events);
    }

    let stats = query::session_stats(&world);
    let summary = Summary {
        phase: query::phase(&world),
        elapsed: query::now(&world),
        wave: query::wave(&world).wave,
        health: query::health(&world),
        coins: query::coins(&world),
        kills: stats.kills,
        leaks: stats.leaks,
        towers: query::tower_view(&world).iter().count(),
    };
    info!(
        wave = summary.wave,
        health = summary.health,
        kills = summary.kills,
        "session finished"
    );
    Ok(summary)
}

fn build(
    world: &mut World,
    builder: &mut Builder,
    cell: CellCoord,
    input: BuilderInput,
) {
    let mut events = Vec::new();
    world::apply(world, Command::SelectCell { cell }, &mut events);
    if events.is_empty() {
        warn!(?cell, "cell lies outside the tower grid");
        return;
    }

    let mut commands = Vec::new();
    builder.handle(
        &[],
        query::selection(world),
        input,
        &query::tower_view(world),
        &mut commands,
    );
    if commands.is_empty() {
        warn!(?cell, "nothing to build on the selected cell");
        return;
    }

    events.clear();
    for command in commands {
        world::apply(world, command, &mut events);
    }

    for event in &events {
        match event {
            Event::TowerPlacementRejected { reason, .. } => {
                warn!(?cell, %reason, "tower placement rejected");
            }
            Event::TowerMergeRejected { reason, .. } => {
                warn!(?cell, %reason, "merge rejected");
            }
            Event::TowerPlaced { tower, kind, .. } => {
                info!(tower = tower.get(), kind = kind.tag(), ?cell, "tower placed");
            }
            Event::TowersMerged { merged, level, .. } => {
                info!(tower = merged.get(), level, ?cell, "towers merged");
            }
            _ => {}
        }
    }
}
