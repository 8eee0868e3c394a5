use std::time::Duration;

use anyhow::Context;
use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use tracing::{debug, info, warn};

use realm_core::balance::{run_balance_simulation, BalanceConfig};
use realm_core::engine::{InputIntent, SessionConfig, SessionOutcome, Simulation, SimulationPlugin};
use realm_core::events::GameEvent;
use realm_core::logging::{init_tracing, LogLevel, LoggingPlugin, TracingConfig};

/// Frames left before the runner exits on its own.
#[derive(Resource)]
struct FrameBudget(u64);

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    init_tracing(&tracing_config(&args)?);

    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => SessionConfig::load(&path)
            .with_context(|| format!("failed to load session config from {path}"))?,
        None => SessionConfig::default(),
    };
    if let Some(seed) = parse_arg(&args, "--seed") {
        config.seed = seed;
    }

    if args.iter().any(|a| a == "--balance") {
        let balance = BalanceConfig {
            trials: parse_arg(&args, "--trials").unwrap_or(200) as u32,
            base_seed: config.seed,
            ..BalanceConfig::default()
        };
        let report = run_balance_simulation(&balance);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let frames = parse_arg(&args, "--frames").unwrap_or(1_800);
    info!(seed = config.seed, frames, "starting realm simulation");

    let mut app = App::new();
    app.add_plugins(
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 60.0))),
    )
    .add_plugins(LoggingPlugin)
    .add_plugins(SimulationPlugin { config })
    .insert_resource(FrameBudget(frames))
    .add_systems(PreUpdate, autopilot_system)
    .add_systems(PostUpdate, log_events_system)
    .add_systems(Last, exit_system);

    match app.run() {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => anyhow::bail!("realm simulation exited with code {code}"),
    }
}

/// `--quiet` keeps only boss and session milestones; `--log-level <level>`
/// sets every filter to one level.
fn tracing_config(args: &[String]) -> anyhow::Result<TracingConfig> {
    let mut config = if args.iter().any(|a| a == "--quiet") {
        TracingConfig::quiet()
    } else {
        TracingConfig::default()
    };
    if let Some(name) = parse_str_arg(args, "--log-level") {
        let level = LogLevel::parse(&name).with_context(|| format!("unknown log level {name}"))?;
        let modules: Vec<String> = config.module_filters.iter().map(|(m, _)| m.clone()).collect();
        config.default_level = level;
        for module in modules {
            config = config.with_module(&module, level);
        }
    }
    Ok(config)
}

/// Walk toward the nearest monster and fight it; otherwise go for the next
/// gem, then the boss lair.
fn autopilot_system(sim: Res<Simulation>, mut input: ResMut<InputIntent>) {
    let player = sim.player();
    let nearest = sim
        .monsters()
        .iter()
        .filter(|m| m.is_alive())
        .map(|m| (m.position, m.position.distance(player.position)))
        .filter(|&(_, d)| d < 250.0)
        .min_by(|a, b| a.1.total_cmp(&b.1));

    let target = nearest
        .map(|(pos, _)| pos)
        .or_else(|| {
            sim.world_gems()
                .iter()
                .find(|g| !g.collected)
                .map(|g| g.position)
        })
        .unwrap_or(sim.boss().position);
    input.axis = target - player.position;

    if let Some((_, distance)) = nearest {
        input.swing = distance < 40.0 && !player.is_attacking();
        input.cast = distance < 100.0
            && player
                .active_element
                .is_some_and(|e| player.mana >= e.spec().mana_cost);
    }
    if player.active_element.is_none() {
        input.select = player.elements.unlocked().first().copied();
    }
}

fn log_events_system(mut events: EventReader<GameEvent>) {
    for event in events.read() {
        match event {
            GameEvent::ActionRejected { .. } => debug!(kind = event.label(), ?event, "action rejected"),
            _ => info!(kind = event.label(), ?event, "game event"),
        }
    }
}

fn exit_system(
    sim: Res<Simulation>,
    mut budget: ResMut<FrameBudget>,
    mut exit: EventWriter<AppExit>,
) {
    budget.0 = budget.0.saturating_sub(1);
    if budget.0 == 0 || sim.outcome() != SessionOutcome::Playing {
        info!(outcome = ?sim.outcome(), frames = sim.stats().frames, "stopping runner");
        match serde_json::to_string_pretty(&sim.summary()) {
            Ok(json) => println!("{json}"),
            Err(err) => warn!(%err, "could not encode session summary"),
        }
        exit.send(AppExit::Success);
    }
}

fn parse_arg(args: &[String], flag: &str) -> Option<u64> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|val| val.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
