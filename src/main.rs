//! Rex Runner entry point
//!
//! Headless autoplay: runs seeded sessions with the auto-jump advisor at the
//! controls and logs how far each run got.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use rex_runner::consts::MS_PER_FRAME;
use rex_runner::platform::{Clock, Intent, ManualClock, SystemClock};
use rex_runner::{ConfigSetting, Dimensions, GameEvent, RunPhase, Runner, RunnerConfig};

#[derive(Parser, Debug)]
#[command(name = "rex-runner")]
#[command(about = "Headless autoplay for the side-scrolling runner simulation")]
struct Cli {
    /// RNG seed for obstacle and scenery generation
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// JSON config file; missing keys keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override a setting, e.g. `--set GRAVITY=0.8` (repeatable)
    #[arg(long = "set", value_parser = parse_override)]
    overrides: Vec<(ConfigSetting, f64)>,
    /// Surface width (capped at 600)
    #[arg(long, default_value_t = 600.0)]
    width: f32,
    /// Number of runs to play back to back
    #[arg(long, default_value_t = 1)]
    runs: u32,
    /// Simulated time limit per run, in seconds
    #[arg(long, default_value_t = 120.0)]
    max_seconds: f64,
    /// Frame interval in milliseconds
    #[arg(long, default_value_t = MS_PER_FRAME as f64)]
    frame_ms: f64,
    /// Drive the simulation from the wall clock instead of simulated time
    #[arg(long)]
    realtime: bool,
}

fn parse_override(s: &str) -> Result<(ConfigSetting, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let setting = name.trim().parse::<ConfigSetting>().map_err(|e| e.to_string())?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("{name}: {e}"))?;
    Ok((setting, value))
}

#[derive(Debug, Default)]
struct RunSummary {
    score: u32,
    crashed: bool,
    elapsed_ms: f64,
    jumps: u32,
    obstacles: u32,
}

/// Play one run to a crash or the time limit
fn play<C: Clock>(runner: &mut Runner<C>, max_ms: f64, mut wait: impl FnMut(&C)) -> RunSummary {
    if runner.phase() == RunPhase::Waiting {
        runner.handle(Intent::JumpPressed);
    } else {
        runner.restart();
    }

    let start = runner.clock().now();
    let mut summary = RunSummary::default();
    while runner.pending_frame().is_some() && runner.clock().now() - start < max_ms {
        wait(runner.clock());
        runner.run_pending_frame();

        for event in runner.drain_events() {
            match event {
                GameEvent::JumpStarted => summary.jumps += 1,
                GameEvent::ObstacleSpawned { .. } => summary.obstacles += 1,
                GameEvent::Achievement { score } => log::info!("Reached {score}"),
                GameEvent::Crashed { .. } => summary.crashed = true,
                GameEvent::Landed
                | GameEvent::Inverted(_)
                | GameEvent::Restarted { .. }
                | GameEvent::Paused
                | GameEvent::Resumed
                | GameEvent::Reconfigured(_) => log::debug!("{event:?}"),
            }
        }
    }

    summary.score = runner.score();
    summary.elapsed_ms = runner.clock().now() - start;
    summary
}

fn session<C: Clock>(
    cli: &Cli,
    config: RunnerConfig,
    clock: C,
    mut wait: impl FnMut(&C),
) -> Result<()> {
    let mut runner = Runner::new(config, Dimensions::with_width(cli.width), cli.seed, clock)
        .context("invalid configuration")?;
    for &(setting, value) in &cli.overrides {
        runner
            .reconfigure(setting, value)
            .with_context(|| format!("cannot apply {setting}={value}"))?;
    }

    for run in 1..=cli.runs {
        let summary = play(&mut runner, cli.max_seconds * 1000.0, &mut wait);
        log::info!(
            "Run {run}: score {} in {:.1}s ({} jumps, {} obstacles){}",
            summary.score,
            summary.elapsed_ms / 1000.0,
            summary.jumps,
            summary.obstacles,
            if summary.crashed { "" } else { ", time limit" }
        );
    }
    log::info!("High score {} over {} runs", runner.high_score(), runner.play_count());
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            RunnerConfig::from_json(&json).with_context(|| format!("parsing {}", path.display()))?
        }
        None => RunnerConfig::default(),
    };

    let frame_ms = cli.frame_ms.max(1.0);
    if cli.realtime {
        let interval = Duration::from_secs_f64(frame_ms / 1000.0);
        session(&cli, config, SystemClock::new(), |_| std::thread::sleep(interval))
    } else {
        session(&cli, config, ManualClock::new(0.0), |clock| clock.advance(frame_ms))
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts on the web drive `Runner` directly
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_override() {
        assert_eq!(
            parse_override("gravity=0.8").unwrap(),
            (ConfigSetting::Gravity, 0.8)
        );
        assert!(parse_override("GRAVITY").is_err());
        assert!(parse_override("NOPE=1").is_err());
        assert!(parse_override("SPEED=fast").is_err());
    }

    #[test]
    fn test_play_stops_at_time_limit_or_crash() {
        let mut runner = Runner::new(
            RunnerConfig::default(),
            Dimensions::default(),
            3,
            ManualClock::new(0.0),
        )
        .unwrap();
        let summary = play(&mut runner, 5_000.0, |clock| clock.advance(16.0));
        assert!(summary.elapsed_ms <= 5_016.0);
        assert!(summary.jumps >= 1);
        assert_eq!(summary.crashed, runner.phase() == RunPhase::Crashed);
    }
}
