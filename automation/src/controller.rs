//! Per-tick run decisions for dungeon farming.
//!
//! The controller is glue: it resolves the current dungeon, refreshes the
//! progress label, asks the tracker whether the dungeon is shiny-completed and
//! turns that into a decision for the run orchestrator.

use tracing::{debug, info, instrument};

use crate::core::locator::resolve_current_dungeon;
use crate::host::{Host, RunOrchestrator};
use crate::io::config::AutomationConfig;
use crate::tracker::{CompletionTracker, is_fully_shiny_completed};

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickDecision {
    /// No dungeon to work on, or nothing running.
    Idle,
    /// Run in progress; keep going.
    Continue,
    /// Last run finished; start another one.
    Restart,
    /// Farming should end.
    Stop,
}

/// Running totals across ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerStats {
    pub ticks: u32,
    pub restarts: u32,
}

/// Decision policy knobs taken from [`AutomationConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPolicy {
    pub stop_on_shiny_completion: bool,
    pub restart_runs: bool,
}

impl From<&AutomationConfig> for RunPolicy {
    fn from(config: &AutomationConfig) -> Self {
        Self {
            stop_on_shiny_completion: config.stop_on_shiny_completion,
            restart_runs: config.restart_runs,
        }
    }
}

pub const SHINY_COMPLETED_REASON: &str = "dungeon is shiny-completed";
pub const RESTART_DISABLED_REASON: &str = "run finished and restarts are disabled";

pub struct RunController {
    policy: RunPolicy,
    tracker: CompletionTracker,
    stats: ControllerStats,
}

impl RunController {
    pub fn new(policy: RunPolicy, tracker: CompletionTracker) -> Self {
        Self {
            policy,
            tracker,
            stats: ControllerStats::default(),
        }
    }

    pub fn stats(&self) -> ControllerStats {
        self.stats
    }

    pub fn tracker_mut(&mut self) -> &mut CompletionTracker {
        &mut self.tracker
    }

    /// Run one tick against the host and forward the decision.
    #[instrument(skip_all, fields(tick = self.stats.ticks.saturating_add(1)))]
    pub fn tick<H, O>(&mut self, host: &H, orchestrator: &mut O) -> TickDecision
    where
        H: Host + ?Sized,
        O: RunOrchestrator + ?Sized,
    {
        self.stats.ticks = self.stats.ticks.saturating_add(1);
        self.tracker.refresh_progress_label(host);

        let Some(dungeon) = resolve_current_dungeon(host) else {
            debug!("no current dungeon");
            return TickDecision::Idle;
        };
        let dungeon_name = dungeon.name().to_string();

        let finished = host.run_finished();
        let active = host.is_run_active();
        if !finished && !active {
            return TickDecision::Idle;
        }

        let shiny_done = self.policy.stop_on_shiny_completion && is_fully_shiny_completed(host);
        let decision = match (finished, shiny_done) {
            (_, true) => TickDecision::Stop,
            (true, false) if self.policy.restart_runs => TickDecision::Restart,
            (true, false) => TickDecision::Stop,
            (false, false) => TickDecision::Continue,
        };

        match decision {
            TickDecision::Restart => {
                self.stats.restarts = self.stats.restarts.saturating_add(1);
                info!(dungeon = %dungeon_name, restarts = self.stats.restarts, "restarting run");
                orchestrator.restart_run(&dungeon_name);
            }
            TickDecision::Stop => {
                let reason = if shiny_done {
                    SHINY_COMPLETED_REASON
                } else {
                    RESTART_DISABLED_REASON
                };
                info!(dungeon = %dungeon_name, reason, "stopping dungeon automation");
                orchestrator.stop(reason);
            }
            TickDecision::Continue | TickDecision::Idle => {}
        }
        decision
    }
}
