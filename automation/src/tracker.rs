//! Shiny-completion tracking for the dungeon relevant right now.

use tracing::{debug, trace};

use crate::core::catchable::resolve_catchable_set;
use crate::core::locator::{resolve_current_dungeon, town_dungeon};
use crate::core::progress::shiny_progress;
use crate::core::types::CompletionReport;
use crate::host::{CompletionOracle, Host, LabelSink, Location, PartyRegistry, RunState};

/// Owns the progress label and answers shiny-completion queries.
#[derive(Default)]
pub struct CompletionTracker {
    label: Option<Box<dyn LabelSink>>,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_label(&mut self, label: Box<dyn LabelSink>) {
        self.label = Some(label);
    }

    pub fn clear_label(&mut self) {
        self.label = None;
    }

    pub fn has_label(&self) -> bool {
        self.label.is_some()
    }

    /// Recompute town-level progress and write it to the label.
    ///
    /// No-op without a registered label. The label is left untouched when the
    /// current town has no dungeon.
    pub fn refresh_progress_label<H: Host + ?Sized>(&mut self, host: &H) {
        let Some(label) = self.label.as_mut() else {
            trace!("no progress label registered");
            return;
        };
        let Some(report) = progress(host) else {
            debug!("no town dungeon, progress label unchanged");
            return;
        };
        label.set_text(&report.to_string());
    }
}

/// Whether the current dungeon is fully caught in shiny form.
///
/// Delegates to the host's completion rule with the shiny flag set. Returns
/// `false` without asking the host when there is no current dungeon.
pub fn is_fully_shiny_completed<H>(host: &H) -> bool
where
    H: RunState + Location + CompletionOracle + ?Sized,
{
    match resolve_current_dungeon(host) {
        Some(dungeon) => host.dungeon_completed(dungeon, true),
        None => false,
    }
}

/// Shiny progress of the current town's dungeon, independent of any run.
pub fn progress<H>(host: &H) -> Option<CompletionReport>
where
    H: Location + PartyRegistry + ?Sized,
{
    let dungeon = town_dungeon(host)?;
    let set = resolve_catchable_set(dungeon);
    let report = shiny_progress(&set, host);
    debug!(dungeon = dungeon.name(), %report, "computed shiny progress");
    Some(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{EncounterRecord, PokemonEncounter};
    use crate::host::StaticDungeon;
    use crate::test_support::{FakeHost, MemoryLabel, shiny_cavern};

    fn two_mon_dungeon() -> StaticDungeon {
        StaticDungeon {
            normal_encounters: vec![
                EncounterRecord::Pokemon(PokemonEncounter::named("CaughtMon")),
                EncounterRecord::Pokemon(PokemonEncounter::named("MissingMon")),
            ],
            ..StaticDungeon::new("Shiny Cavern")
        }
    }

    #[test]
    fn shiny_completion_is_false_without_dungeon() {
        let host = FakeHost::default().completing(true);
        assert!(!is_fully_shiny_completed(&host));
        assert!(host.oracle_calls.borrow().is_empty());
    }

    #[test]
    fn shiny_completion_delegates_once_with_shiny_flag() {
        let host = FakeHost::default()
            .running(StaticDungeon::new("Dungeon Prime"))
            .completing(true);
        assert!(is_fully_shiny_completed(&host));
        assert_eq!(
            *host.oracle_calls.borrow(),
            vec![("Dungeon Prime".to_string(), true)]
        );
    }

    #[test]
    fn shiny_completion_returns_oracle_verdict_unchanged() {
        let host = FakeHost::default()
            .in_dungeon_town(StaticDungeon::new("Viridian Forest"))
            .completing(false);
        assert!(!is_fully_shiny_completed(&host));
        assert_eq!(host.oracle_calls.borrow().len(), 1);
    }

    #[test]
    fn progress_label_reports_shiny_ratio() {
        let host = FakeHost::default()
            .in_dungeon_town(two_mon_dungeon())
            .with_party("CaughtMon", true);
        let label = MemoryLabel::default();
        let mut tracker = CompletionTracker::new();
        tracker.register_label(Box::new(label.clone()));

        tracker.refresh_progress_label(&host);

        assert_eq!(label.text().as_deref(), Some("1/2"));
    }

    #[test]
    fn non_shiny_party_member_does_not_count() {
        let host = FakeHost::default()
            .in_dungeon_town(two_mon_dungeon())
            .with_party("CaughtMon", true)
            .with_party("MissingMon", false);
        assert_eq!(
            progress(&host),
            Some(CompletionReport {
                caught: 1,
                total: 2
            })
        );
    }

    #[test]
    fn progress_follows_town_not_active_run() {
        let host = FakeHost::default()
            .in_dungeon_town(two_mon_dungeon())
            .running(shiny_cavern())
            .with_party("CaughtMon", true);
        let report = progress(&host).expect("report");
        assert_eq!(report.total, 2);
    }

    #[test]
    fn refresh_without_label_is_noop() {
        let host = FakeHost::default().in_dungeon_town(two_mon_dungeon());
        let mut tracker = CompletionTracker::new();
        assert!(!tracker.has_label());
        tracker.refresh_progress_label(&host);
    }

    #[test]
    fn refresh_without_town_dungeon_leaves_label_untouched() {
        let host = FakeHost::default().in_plain_town("Pallet Town");
        let label = MemoryLabel::default();
        let mut tracker = CompletionTracker::new();
        tracker.register_label(Box::new(label.clone()));

        tracker.refresh_progress_label(&host);

        assert_eq!(label.text(), None);
    }

    #[test]
    fn cleared_label_is_no_longer_written() {
        let host = FakeHost::default().in_dungeon_town(two_mon_dungeon());
        let label = MemoryLabel::default();
        let mut tracker = CompletionTracker::new();
        tracker.register_label(Box::new(label.clone()));
        tracker.clear_label();

        tracker.refresh_progress_label(&host);

        assert_eq!(label.text(), None);
    }
}
