//! Timer-driven tick loop for `dungeon-automation watch`.
//!
//! Tick callbacks are synchronous; the loop only owns the cadence and the
//! cancellation point. Run it on a current-thread runtime: at most one ticker
//! per controller.

use std::ops::ControlFlow;
use std::time::Duration;

use anyhow::Result;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::controller::{ControllerStats, RunController, TickDecision};
use crate::host::{Host, RunOrchestrator};

/// Reason why `run_ticker` stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerStop {
    /// The cancellation token fired.
    Cancelled,
    /// The configured tick limit was reached.
    MaxTicks,
    /// The tick callback asked to stop.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickerOutcome {
    pub ticks: u32,
    pub stop: TickerStop,
}

/// Call `on_tick` every `period` until cancelled, `max_ticks` is reached, or
/// the callback breaks. The first tick fires immediately.
pub async fn run_ticker<F>(
    period: Duration,
    cancel: &CancellationToken,
    max_ticks: Option<u32>,
    mut on_tick: F,
) -> TickerOutcome
where
    F: FnMut(u32) -> ControlFlow<()>,
{
    let mut timer = interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut ticks = 0u32;
    loop {
        if max_ticks.is_some_and(|max| ticks >= max) {
            return TickerOutcome {
                ticks,
                stop: TickerStop::MaxTicks,
            };
        }
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(ticks, "ticker cancelled");
                return TickerOutcome {
                    ticks,
                    stop: TickerStop::Cancelled,
                };
            }
            _ = timer.tick() => {}
        }
        ticks = ticks.saturating_add(1);
        if on_tick(ticks).is_break() {
            return TickerOutcome {
                ticks,
                stop: TickerStop::Finished,
            };
        }
    }
}

/// Summary of a controller loop invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOutcome {
    pub ticker: TickerOutcome,
    pub stats: ControllerStats,
    pub last_decision: Option<TickDecision>,
}

/// Drive `controller` on the ticker until it decides to stop.
///
/// `load_host` is called on every tick so the controller always sees fresh
/// host state. A tick whose host state cannot be loaded is skipped.
pub async fn run_controller<H, L, O>(
    controller: &mut RunController,
    orchestrator: &mut O,
    mut load_host: L,
    period: Duration,
    cancel: &CancellationToken,
    max_ticks: Option<u32>,
) -> WatchOutcome
where
    H: Host,
    L: FnMut() -> Result<H>,
    O: RunOrchestrator + ?Sized,
{
    let mut last_decision = None;
    let ticker = run_ticker(period, cancel, max_ticks, |_| {
        let host = match load_host() {
            Ok(host) => host,
            Err(err) => {
                warn!(error = %format!("{err:#}"), "host state unavailable, skipping tick");
                return ControlFlow::Continue(());
            }
        };
        let decision = controller.tick(&host, &mut *orchestrator);
        last_decision = Some(decision);
        if decision == TickDecision::Stop {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .await;

    WatchOutcome {
        ticker,
        stats: controller.stats(),
        last_decision,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::RunPolicy;
    use crate::host::StaticDungeon;
    use crate::test_support::{FakeHost, OrchestratorCall, RecordingOrchestrator};
    use crate::tracker::CompletionTracker;
    use anyhow::anyhow;

    const PERIOD: Duration = Duration::from_millis(50);

    fn controller() -> RunController {
        RunController::new(
            RunPolicy {
                stop_on_shiny_completion: true,
                restart_runs: true,
            },
            CompletionTracker::new(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_stops_at_max_ticks() {
        let cancel = CancellationToken::new();
        let mut seen = Vec::new();
        let outcome = run_ticker(PERIOD, &cancel, Some(3), |tick| {
            seen.push(tick);
            ControlFlow::Continue(())
        })
        .await;
        assert_eq!(
            outcome,
            TickerOutcome {
                ticks: 3,
                stop: TickerStop::MaxTicks
            }
        );
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_observes_cancellation_between_ticks() {
        let cancel = CancellationToken::new();
        let outcome = run_ticker(PERIOD, &cancel, None, |tick| {
            if tick == 2 {
                cancel.cancel();
            }
            ControlFlow::Continue(())
        })
        .await;
        assert_eq!(
            outcome,
            TickerOutcome {
                ticks: 2,
                stop: TickerStop::Cancelled
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_never_ticks_when_cancelled_up_front() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome = run_ticker(PERIOD, &cancel, None, |_| ControlFlow::Continue(())).await;
        assert_eq!(outcome.ticks, 0);
        assert_eq!(outcome.stop, TickerStop::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_stops_when_callback_breaks() {
        let cancel = CancellationToken::new();
        let outcome = run_ticker(PERIOD, &cancel, Some(10), |tick| {
            if tick == 4 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .await;
        assert_eq!(outcome.stop, TickerStop::Finished);
        assert_eq!(outcome.ticks, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn controller_loop_stops_once_shiny_completed() {
        let cancel = CancellationToken::new();
        let mut orchestrator = RecordingOrchestrator::default();
        let mut controller = controller();
        let mut loads = 0u32;

        let outcome = run_controller(
            &mut controller,
            &mut orchestrator,
            || {
                loads += 1;
                Ok(FakeHost::default()
                    .running(StaticDungeon::new("Mt. Moon"))
                    .completing(loads >= 3))
            },
            PERIOD,
            &cancel,
            Some(10),
        )
        .await;

        assert_eq!(outcome.ticker.stop, TickerStop::Finished);
        assert_eq!(outcome.ticker.ticks, 3);
        assert_eq!(outcome.last_decision, Some(TickDecision::Stop));
        assert_eq!(outcome.stats.ticks, 3);
        assert_eq!(orchestrator.calls.len(), 1);
        assert!(matches!(orchestrator.calls[0], OrchestratorCall::Stop(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn controller_loop_skips_unloadable_ticks() {
        let cancel = CancellationToken::new();
        let mut orchestrator = RecordingOrchestrator::default();
        let mut controller = controller();

        let outcome = run_controller(
            &mut controller,
            &mut orchestrator,
            || -> Result<FakeHost> { Err(anyhow!("snapshot missing")) },
            PERIOD,
            &cancel,
            Some(2),
        )
        .await;

        assert_eq!(outcome.ticker.stop, TickerStop::MaxTicks);
        assert_eq!(outcome.stats.ticks, 0);
        assert_eq!(outcome.last_decision, None);
    }
}
