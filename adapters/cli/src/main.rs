#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Lane Defence headlessly.

mod autoplay;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use lane_defence_core::{Event, RenderSink, UiSink};
use lane_defence_rendering::{format_hud, AsciiRenderer, HudLine};
use lane_defence_simulation::{FrameClock, Session, Simulation, SimulationConfig};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::autoplay::Move;

#[derive(Parser, Debug)]
#[command(name = "lane-defence")]
#[command(about = "Runs a scripted Lane Defence session without a window")]
struct Args {
    /// TOML file overriding the default configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(long, default_value = "6000")]
    ticks: u32,

    /// Simulated milliseconds per frame
    #[arg(long, default_value = "16")]
    frame_ms: u64,

    /// Seed for the wave composition, overriding the configuration
    #[arg(long)]
    seed: Option<u64>,

    /// Print the board every N frames; zero disables drawing
    #[arg(long, default_value = "0")]
    render_every: u32,

    /// Print the final summary as JSON
    #[arg(long)]
    json: bool,
}

/// Totals reported once the run stops.
#[derive(Debug, Default, Serialize)]
struct RunSummary {
    frames: u32,
    wave: u32,
    money: u32,
    lives: i32,
    game_over: bool,
    kills: u32,
    escapes: u32,
    merges: u32,
    towers: Vec<String>,
}

impl RunSummary {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::EnemyKilled { .. } => self.kills += 1,
                Event::EnemyEscaped { .. } => self.escapes += 1,
                Event::TowersMerged { .. } => self.merges += 1,
                _ => {}
            }
        }
    }
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            SimulationConfig::from_toml_str(&source)
                .with_context(|| format!("invalid config file {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.waves.seed = seed;
    }
    Ok(config)
}

fn play<C, R, U>(session: &mut Session<C, R, U>)
where
    C: lane_defence_core::Clock,
    R: RenderSink,
    U: UiSink,
{
    let simulation = session.simulation_mut();
    let Some(next) = autoplay::plan(&simulation.frame(), simulation.hud().money) else {
        return;
    };
    debug!(?next, "scripted move");
    match next {
        Move::Buy(kind) => simulation.buy_tower(kind),
        Move::Drag { tower, to } => {
            let target = simulation.frame().grid.center_of(to);
            simulation.begin_drag(tower);
            simulation.update_drag(target);
            simulation.end_drag(target);
        }
    }
}

fn run(args: &Args) -> Result<RunSummary> {
    let config = load_config(args)?;
    let simulation = Simulation::new(config).context("failed to start simulation")?;
    let mut session = Session::new(
        simulation,
        FrameClock::new(Duration::from_millis(args.frame_ms)),
        AsciiRenderer::new(),
        HudLine::new(),
    );

    let mut summary = RunSummary::default();
    for _ in 0..args.ticks {
        session.clock_mut().next_frame();
        play(&mut session);
        session.step();
        summary.frames += 1;

        let events = session.simulation_mut().drain_events();
        summary.record(&events);

        if args.render_every > 0 && summary.frames % args.render_every == 0 {
            println!("{}", session.render_sink().last_frame());
            if let Some(line) = session.ui_sink().current() {
                println!("{line}");
            }
        }
        if session.simulation().is_game_over() {
            info!(frame = summary.frames, "game over");
            break;
        }
    }

    let simulation = session.simulation();
    let hud = simulation.hud();
    summary.wave = hud.wave;
    summary.money = hud.money;
    summary.lives = hud.lives;
    summary.game_over = hud.game_over;
    summary.towers = simulation
        .frame()
        .towers
        .iter()
        .map(|tower| tower.label())
        .collect();
    info!(status = %format_hud(&hud), "run finished");
    Ok(summary)
}

/// Entry point for the Lane Defence command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let summary = run(&args)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "frames {} | wave {} | money {} | lives {} | kills {} | escapes {} | merges {} | towers [{}]",
            summary.frames,
            summary.wave,
            summary.money,
            summary.lives,
            summary.kills,
            summary.escapes,
            summary.merges,
            summary.towers.join(" ")
        );
    }
    Ok(())
}
