//! Test-only helpers: a scripted host, fixtures and recording collaborators.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};

use crate::core::types::{
    AvailabilityEntry, BossEncounter, EncounterRecord, PokemonEncounter, Requirement,
    RequirementRef, RosterMember, ShadowStatus, TrainerEncounter,
};
use crate::host::{
    CompletionOracle, Dungeon, LabelSink, Location, PartyPokemon, PartyRegistry, RunOrchestrator,
    RunState, StaticDungeon, Town,
};

/// Requirement with a fixed answer that counts how often it was asked.
#[derive(Debug)]
pub struct FixedRequirement {
    pub completed: bool,
    pub checks: Cell<u32>,
}

impl Requirement for FixedRequirement {
    fn is_completed(&self) -> bool {
        self.checks.set(self.checks.get() + 1);
        self.completed
    }
}

pub fn fixed_requirement(completed: bool) -> Rc<FixedRequirement> {
    Rc::new(FixedRequirement {
        completed,
        checks: Cell::new(0),
    })
}

pub fn requirement(completed: bool) -> RequirementRef {
    fixed_requirement(completed)
}

/// Dungeon that records the flag of every availability query.
#[derive(Debug, Default)]
pub struct RecordingDungeon {
    pub inner: StaticDungeon,
    pub queries: RefCell<Vec<bool>>,
}

impl RecordingDungeon {
    pub fn new(inner: StaticDungeon) -> Self {
        Self {
            inner,
            queries: RefCell::new(Vec::new()),
        }
    }
}

impl Dungeon for RecordingDungeon {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn available_pokemon(&self, catchable_only: bool) -> Option<Vec<AvailabilityEntry>> {
        self.queries.borrow_mut().push(catchable_only);
        self.inner.available_pokemon(catchable_only)
    }

    fn normal_encounters(&self) -> &[EncounterRecord] {
        self.inner.normal_encounters()
    }

    fn bosses(&self) -> &[EncounterRecord] {
        self.inner.bosses()
    }
}

#[derive(Debug, Clone)]
pub struct FakeTown {
    pub name: String,
    pub dungeon: Option<StaticDungeon>,
}

impl Town for FakeTown {
    fn name(&self) -> &str {
        &self.name
    }

    fn dungeon(&self) -> Option<&dyn Dungeon> {
        self.dungeon.as_ref().map(|dungeon| dungeon as &dyn Dungeon)
    }
}

/// Scripted host state. Records every completion-oracle call.
#[derive(Debug, Default)]
pub struct FakeHost {
    pub run_active: bool,
    pub run_finished: bool,
    pub run_dungeon: Option<StaticDungeon>,
    pub town: Option<FakeTown>,
    pub party: HashMap<String, PartyPokemon>,
    /// Answer returned by the completion oracle.
    pub completed: bool,
    pub oracle_calls: RefCell<Vec<(String, bool)>>,
}

impl FakeHost {
    /// Put the host inside an active run of `dungeon`.
    pub fn running(mut self, dungeon: StaticDungeon) -> Self {
        self.run_active = true;
        self.run_dungeon = Some(dungeon);
        self
    }

    pub fn in_dungeon_town(mut self, dungeon: StaticDungeon) -> Self {
        self.town = Some(FakeTown {
            name: dungeon.name.clone(),
            dungeon: Some(dungeon),
        });
        self
    }

    pub fn in_plain_town(mut self, name: &str) -> Self {
        self.town = Some(FakeTown {
            name: name.to_string(),
            dungeon: None,
        });
        self
    }

    pub fn with_party(mut self, name: &str, shiny: bool) -> Self {
        self.party.insert(name.to_string(), PartyPokemon { shiny });
        self
    }

    pub fn completing(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

impl RunState for FakeHost {
    fn is_run_active(&self) -> bool {
        self.run_active
    }

    fn run_dungeon(&self) -> Option<&dyn Dungeon> {
        self.run_dungeon
            .as_ref()
            .map(|dungeon| dungeon as &dyn Dungeon)
    }

    fn run_finished(&self) -> bool {
        self.run_finished
    }
}

impl Location for FakeHost {
    fn current_town(&self) -> Option<&dyn Town> {
        self.town.as_ref().map(|town| town as &dyn Town)
    }
}

impl CompletionOracle for FakeHost {
    fn dungeon_completed(&self, dungeon: &dyn Dungeon, shiny: bool) -> bool {
        self.oracle_calls
            .borrow_mut()
            .push((dungeon.name().to_string(), shiny));
        self.completed
    }
}

impl PartyRegistry for FakeHost {
    fn pokemon_by_name(&self, name: &str) -> Option<PartyPokemon> {
        self.party.get(name).copied()
    }
}

/// Label whose text stays readable after it is handed to a tracker.
#[derive(Debug, Clone, Default)]
pub struct MemoryLabel {
    text: Rc<RefCell<Option<String>>>,
}

impl MemoryLabel {
    /// Last text written, `None` if the label was never written.
    pub fn text(&self) -> Option<String> {
        self.text.borrow().clone()
    }
}

impl LabelSink for MemoryLabel {
    fn set_text(&mut self, text: &str) {
        *self.text.borrow_mut() = Some(text.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorCall {
    Restart(String),
    Stop(String),
}

#[derive(Debug, Default)]
pub struct RecordingOrchestrator {
    pub calls: Vec<OrchestratorCall>,
}

impl RunOrchestrator for RecordingOrchestrator {
    fn restart_run(&mut self, dungeon: &str) {
        self.calls.push(OrchestratorCall::Restart(dungeon.to_string()));
    }

    fn stop(&mut self, reason: &str) {
        self.calls.push(OrchestratorCall::Stop(reason.to_string()));
    }
}

/// Dungeon mixing every kind of uncatchable entry with four catchable ones.
///
/// Catchable: `Zubat`, `UnlockedMon`, `BossMon`, `ShadowMon`.
pub fn shiny_cavern() -> StaticDungeon {
    StaticDungeon {
        normal_encounters: vec![
            EncounterRecord::Pokemon(PokemonEncounter::named("Zubat")),
            EncounterRecord::Pokemon(PokemonEncounter {
                hidden: true,
                ..PokemonEncounter::named("HiddenMon")
            }),
            EncounterRecord::Pokemon(PokemonEncounter {
                shadow_trainer_only: true,
                ..PokemonEncounter::named("TrainerOnly")
            }),
            EncounterRecord::Pokemon(PokemonEncounter {
                mimic: true,
                ..PokemonEncounter::named("TrickyMon")
            }),
            EncounterRecord::Pokemon(PokemonEncounter {
                requirement: Some(requirement(false)),
                ..PokemonEncounter::named("LockedMon")
            }),
            EncounterRecord::Pokemon(PokemonEncounter {
                requirement: Some(requirement(true)),
                ..PokemonEncounter::named("UnlockedMon")
            }),
            EncounterRecord::Trainer(TrainerEncounter {
                name: Some("TrainerGuy".to_string()),
                ..TrainerEncounter::default()
            }),
        ],
        bosses: vec![
            EncounterRecord::BossPokemon(BossEncounter::named("BossMon")),
            EncounterRecord::BossPokemon(BossEncounter {
                requirement: Some(requirement(false)),
                ..BossEncounter::named("LockedBoss")
            }),
            EncounterRecord::Trainer(TrainerEncounter {
                name: None,
                team: vec![
                    RosterMember::new("ShadowMon", ShadowStatus::Shadow),
                    RosterMember::new("TrainerMon", ShadowStatus::None),
                ],
                requirement: None,
            }),
        ],
        ..StaticDungeon::new("Shiny Cavern")
    }
}

/// Temporary directory holding a host snapshot file.
pub struct SnapshotDir {
    dir: tempfile::TempDir,
}

impl SnapshotDir {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp dir")?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `name` inside the directory and return its path.
    pub fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }
}
