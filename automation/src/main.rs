//! Dungeon automation CLI.
//!
//! Drives the dungeon resolution core against a host snapshot file: inspect
//! the current dungeon once, or watch it on a timer and emit run decisions.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use dungeon_automation::controller::{RunController, RunPolicy};
use dungeon_automation::core::catchable::resolve_for;
use dungeon_automation::core::locator::resolve_current_dungeon;
use dungeon_automation::core::types::CatchableSet;
use dungeon_automation::exit_codes;
use dungeon_automation::host::{Dungeon, RunOrchestrator, RunState};
use dungeon_automation::io::config::{AutomationConfig, load_config, write_config};
use dungeon_automation::io::label::{FileLabel, StdoutLabel};
use dungeon_automation::io::snapshot::load_snapshot;
use dungeon_automation::logging;
use dungeon_automation::looping::{TickerStop, run_controller};
use dungeon_automation::tracker::{CompletionTracker, is_fully_shiny_completed, progress};

const DEFAULT_CONFIG_PATH: &str = "automation.toml";

#[derive(Parser)]
#[command(
    name = "dungeon-automation",
    version,
    about = "Dungeon content resolution and shiny-completion tracking"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the default configuration file.
    Init {
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
    /// Report the current dungeon, its catchable pokemon and shiny progress.
    Inspect {
        /// Host snapshot (JSON).
        #[arg(long)]
        snapshot: PathBuf,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Run the controller on a timer, re-reading the snapshot every tick.
    Watch {
        /// Host snapshot (JSON).
        #[arg(long)]
        snapshot: PathBuf,
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
        /// Write the progress label to this file instead of stdout.
        #[arg(long)]
        label: Option<PathBuf>,
        /// Stop after this many ticks.
        #[arg(long)]
        ticks: Option<u32>,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init { config, force } => cmd_init(&config, force),
        Command::Inspect { snapshot, json } => cmd_inspect(&snapshot, json),
        Command::Watch {
            snapshot,
            config,
            label,
            ticks,
        } => cmd_watch(&snapshot, &config, label.as_deref(), ticks),
    }
}

fn cmd_init(path: &Path, force: bool) -> Result<i32> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    write_config(path, &AutomationConfig::default())
        .with_context(|| format!("write {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(exit_codes::OK)
}

#[derive(Debug, Serialize)]
struct InspectReport {
    dungeon: Option<String>,
    run_active: bool,
    catchable: CatchableSet,
    /// Progress label text for the current town's dungeon.
    progress: Option<String>,
    shiny_completed: bool,
}

fn cmd_inspect(snapshot: &Path, json: bool) -> Result<i32> {
    let host = load_snapshot(snapshot)?;
    let dungeon = resolve_current_dungeon(&host);
    let report = InspectReport {
        dungeon: dungeon.map(|dungeon| dungeon.name().to_string()),
        run_active: host.is_run_active(),
        catchable: resolve_for(dungeon),
        progress: progress(&host).map(|report| report.to_string()),
        shiny_completed: is_fully_shiny_completed(&host),
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize report")?
        );
    } else {
        print_report(&report);
    }

    let code = match (&report.dungeon, report.shiny_completed) {
        (None, _) => exit_codes::NO_DUNGEON,
        (Some(_), true) => exit_codes::SHINY_COMPLETE,
        (Some(_), false) => exit_codes::OK,
    };
    Ok(code)
}

fn print_report(report: &InspectReport) {
    let Some(dungeon) = &report.dungeon else {
        println!("no current dungeon");
        return;
    };
    let context = if report.run_active { "run" } else { "town" };
    println!("dungeon: {} ({})", dungeon, context);
    println!("catchable ({}):", report.catchable.len());
    for name in report.catchable.iter() {
        println!("  {}", name);
    }
    if let Some(progress) = &report.progress {
        println!("shiny progress: {}", progress);
    }
    println!("shiny completed: {}", report.shiny_completed);
}

/// Prints controller decisions; the host applies them.
struct StdoutOrchestrator;

impl RunOrchestrator for StdoutOrchestrator {
    fn restart_run(&mut self, dungeon: &str) {
        println!("restart {}", dungeon);
    }

    fn stop(&mut self, reason: &str) {
        println!("stop: {}", reason);
    }
}

fn cmd_watch(
    snapshot: &Path,
    config_path: &Path,
    label: Option<&Path>,
    ticks: Option<u32>,
) -> Result<i32> {
    let config = load_config(config_path)?;

    let mut tracker = CompletionTracker::new();
    match label {
        Some(path) => tracker.register_label(Box::new(FileLabel::new(path))),
        None => tracker.register_label(Box::new(StdoutLabel::default())),
    }
    let mut controller = RunController::new(RunPolicy::from(&config), tracker);
    let mut orchestrator = StdoutOrchestrator;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;
    let cancel = CancellationToken::new();

    let outcome = runtime.block_on(async {
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_interrupt.cancel();
            }
        });
        run_controller(
            &mut controller,
            &mut orchestrator,
            || load_snapshot(snapshot),
            config.tick_interval(),
            &cancel,
            ticks,
        )
        .await
    });

    let stop = match outcome.ticker.stop {
        TickerStop::Cancelled => "cancelled",
        TickerStop::MaxTicks => "tick limit reached",
        TickerStop::Finished => "controller stopped",
    };
    println!(
        "watch ended after {} ticks ({} restarts): {}",
        outcome.stats.ticks, outcome.stats.restarts, stop
    );
    Ok(exit_codes::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_inspect() {
        let cli = Cli::parse_from(["dungeon-automation", "inspect", "--snapshot", "host.json"]);
        assert!(matches!(
            cli.command,
            Command::Inspect { json: false, .. }
        ));
    }

    #[test]
    fn parse_watch_defaults_config_path() {
        let cli = Cli::parse_from([
            "dungeon-automation",
            "watch",
            "--snapshot",
            "host.json",
            "--ticks",
            "5",
        ]);
        match cli.command {
            Command::Watch { config, ticks, label, .. } => {
                assert_eq!(config, PathBuf::from(DEFAULT_CONFIG_PATH));
                assert_eq!(ticks, Some(5));
                assert!(label.is_none());
            }
            _ => panic!("expected watch"),
        }
    }

    #[test]
    fn parse_init_force() {
        let cli = Cli::parse_from(["dungeon-automation", "init", "--force"]);
        assert!(matches!(cli.command, Command::Init { force: true, .. }));
    }
}
