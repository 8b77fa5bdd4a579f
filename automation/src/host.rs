//! Read-only views of host game state.
//!
//! The automation never owns game data. Each trait below is one capability the
//! host exposes; callers pass them in explicitly so every resolution function
//! can run against a fake host in tests.

use crate::core::types::{AvailabilityEntry, EncounterRecord};

/// Description of what lives in one dungeon.
pub trait Dungeon {
    fn name(&self) -> &str;

    /// The dungeon's own aggregate availability query.
    ///
    /// Returns `None` when the dungeon does not expose the query at all.
    /// `catchable_only` requests the variant restricted to catchable pokemon.
    fn available_pokemon(&self, catchable_only: bool) -> Option<Vec<AvailabilityEntry>>;

    fn normal_encounters(&self) -> &[EncounterRecord];

    fn bosses(&self) -> &[EncounterRecord];
}

/// Global dungeon run state.
pub trait RunState {
    /// True while the game state is "inside a dungeon".
    fn is_run_active(&self) -> bool;

    fn run_dungeon(&self) -> Option<&dyn Dungeon>;

    /// The host's own per-run completion check has fired for the last run.
    fn run_finished(&self) -> bool;
}

/// A town the player can stand in.
pub trait Town {
    fn name(&self) -> &str;

    /// Dungeon associated with the town.
    ///
    /// Only towns with the dungeon capability return `Some`.
    fn dungeon(&self) -> Option<&dyn Dungeon>;
}

pub trait Location {
    fn current_town(&self) -> Option<&dyn Town>;
}

/// The host's completion rule for a dungeon.
pub trait CompletionOracle {
    /// Whether every catchable pokemon of `dungeon` is caught, shiny when
    /// `shiny` is set.
    fn dungeon_completed(&self, dungeon: &dyn Dungeon, shiny: bool) -> bool;
}

/// Party entry as seen by the automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartyPokemon {
    pub shiny: bool,
}

/// The player's caught-pokemon registry.
pub trait PartyRegistry {
    /// `None` when the pokemon was never caught.
    fn pokemon_by_name(&self, name: &str) -> Option<PartyPokemon>;
}

/// Display element whose text the automation may overwrite.
pub trait LabelSink {
    fn set_text(&mut self, text: &str);
}

/// Everything the tracker and controller read from the host.
pub trait Host: RunState + Location + CompletionOracle + PartyRegistry {}

impl<T: RunState + Location + CompletionOracle + PartyRegistry> Host for T {}

/// Run orchestration collaborator driven by the controller's decisions.
pub trait RunOrchestrator {
    fn restart_run(&mut self, dungeon: &str);

    fn stop(&mut self, reason: &str);
}

/// In-memory dungeon description.
#[derive(Debug, Clone, Default)]
pub struct StaticDungeon {
    pub name: String,
    pub normal_encounters: Vec<EncounterRecord>,
    pub bosses: Vec<EncounterRecord>,
    /// Result of the aggregate availability query, when the dungeon has one.
    pub available: Option<Vec<AvailabilityEntry>>,
}

impl StaticDungeon {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

impl Dungeon for StaticDungeon {
    fn name(&self) -> &str {
        &self.name
    }

    fn available_pokemon(&self, _catchable_only: bool) -> Option<Vec<AvailabilityEntry>> {
        self.available.clone()
    }

    fn normal_encounters(&self) -> &[EncounterRecord] {
        &self.normal_encounters
    }

    fn bosses(&self) -> &[EncounterRecord] {
        &self.bosses
    }
}
