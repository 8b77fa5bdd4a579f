//! Host state captured as a JSON snapshot.
//!
//! A snapshot stands in for the live game: it implements every host trait so
//! the binary can drive the tracker and controller from a file that is
//! re-read on each tick.
//!
//! Encounter records the adapter cannot interpret are dropped with a warning
//! instead of failing the whole load.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::catchable::resolve_catchable_set;
use crate::core::types::{
    AvailabilityEntry, BossEncounter, EncounterRecord, PokemonEncounter, Requirement,
    RequirementRef, RosterMember, TrainerEncounter,
};
use crate::host::{
    CompletionOracle, Dungeon, Location, PartyPokemon, PartyRegistry, RunState, StaticDungeon,
    Town,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameState {
    #[default]
    Town,
    Dungeon,
}

/// Requirement frozen at snapshot time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RequirementState {
    pub completed: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl Requirement for RequirementState {
    fn is_completed(&self) -> bool {
        self.completed
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SnapshotFile {
    game_state: GameState,
    run: Option<RunFile>,
    town: Option<TownFile>,
    dungeons: BTreeMap<String, DungeonFile>,
    party: BTreeMap<String, PartyFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RunFile {
    dungeon: Option<String>,
    finished: bool,
}

#[derive(Debug, Deserialize)]
struct TownFile {
    name: String,
    #[serde(default)]
    dungeon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DungeonFile {
    normal_encounters: Vec<Value>,
    bosses: Vec<Value>,
    available: Option<Vec<AvailabilityEntry>>,
}

#[derive(Debug, Deserialize)]
struct PartyFile {
    #[serde(default)]
    shiny: bool,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum RecordFile {
    Pokemon {
        name: String,
        #[serde(default)]
        hidden: bool,
        #[serde(default)]
        shadow_trainer_only: bool,
        #[serde(default)]
        mimic: bool,
        #[serde(default)]
        requirement: Option<RequirementState>,
    },
    Boss {
        name: String,
        #[serde(default)]
        requirement: Option<RequirementState>,
    },
    Trainer {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        team: Vec<RosterMember>,
        #[serde(default)]
        requirement: Option<RequirementState>,
    },
}

impl From<RecordFile> for EncounterRecord {
    fn from(record: RecordFile) -> Self {
        match record {
            RecordFile::Pokemon {
                name,
                hidden,
                shadow_trainer_only,
                mimic,
                requirement,
            } => EncounterRecord::Pokemon(PokemonEncounter {
                name,
                hidden,
                shadow_trainer_only,
                mimic,
                requirement: requirement.map(into_ref),
            }),
            RecordFile::Boss { name, requirement } => EncounterRecord::BossPokemon(BossEncounter {
                name,
                requirement: requirement.map(into_ref),
            }),
            RecordFile::Trainer {
                name,
                team,
                requirement,
            } => EncounterRecord::Trainer(TrainerEncounter {
                name,
                team,
                requirement: requirement.map(into_ref),
            }),
        }
    }
}

fn into_ref(state: RequirementState) -> RequirementRef {
    Rc::new(state)
}

#[derive(Debug, Clone)]
pub struct SnapshotTown {
    pub name: String,
    pub dungeon: Option<StaticDungeon>,
}

impl Town for SnapshotTown {
    fn name(&self) -> &str {
        &self.name
    }

    fn dungeon(&self) -> Option<&dyn Dungeon> {
        self.dungeon.as_ref().map(|dungeon| dungeon as &dyn Dungeon)
    }
}

/// Host state loaded from a snapshot file.
#[derive(Debug, Clone, Default)]
pub struct SnapshotHost {
    pub game_state: GameState,
    pub run_dungeon: Option<StaticDungeon>,
    pub run_finished: bool,
    pub town: Option<SnapshotTown>,
    pub party: HashMap<String, PartyPokemon>,
}

impl RunState for SnapshotHost {
    fn is_run_active(&self) -> bool {
        self.game_state == GameState::Dungeon
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

impl Location for SnapshotHost {
    fn current_town(&self) -> Option<&dyn Town> {
        self.town.as_ref().map(|town| town as &dyn Town)
    }
}

impl PartyRegistry for SnapshotHost {
    fn pokemon_by_name(&self, name: &str) -> Option<PartyPokemon> {
        self.party.get(name).copied()
    }
}

impl CompletionOracle for SnapshotHost {
    /// Every catchable pokemon is in the party, and shiny when asked.
    fn dungeon_completed(&self, dungeon: &dyn Dungeon, shiny: bool) -> bool {
        resolve_catchable_set(dungeon).iter().all(|name| {
            self.pokemon_by_name(name)
                .is_some_and(|pokemon| !shiny || pokemon.shiny)
        })
    }
}

/// Load a host snapshot from a JSON file.
pub fn load_snapshot(path: &Path) -> Result<SnapshotHost> {
    debug!(path = %path.display(), "loading host snapshot");
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read snapshot {}", path.display()))?;
    parse_snapshot(&contents).with_context(|| format!("parse snapshot {}", path.display()))
}

/// Parse a host snapshot from JSON text.
pub fn parse_snapshot(contents: &str) -> Result<SnapshotHost> {
    let file: SnapshotFile = serde_json::from_str(contents).context("parse snapshot json")?;

    let dungeons: BTreeMap<String, StaticDungeon> = file
        .dungeons
        .into_iter()
        .map(|(name, dungeon)| {
            let built = build_dungeon(&name, dungeon);
            (name, built)
        })
        .collect();

    let run = file.run.unwrap_or_default();
    let run_dungeon = run
        .dungeon
        .as_deref()
        .and_then(|name| lookup_dungeon(&dungeons, name, "run"));

    let town = file.town.map(|town| {
        let dungeon = town
            .dungeon
            .as_deref()
            .and_then(|name| lookup_dungeon(&dungeons, name, "town"));
        SnapshotTown {
            name: town.name,
            dungeon,
        }
    });

    let party = file
        .party
        .into_iter()
        .map(|(name, entry)| (name, PartyPokemon { shiny: entry.shiny }))
        .collect();

    Ok(SnapshotHost {
        game_state: file.game_state,
        run_dungeon,
        run_finished: run.finished,
        town,
        party,
    })
}

fn lookup_dungeon(
    dungeons: &BTreeMap<String, StaticDungeon>,
    name: &str,
    source: &str,
) -> Option<StaticDungeon> {
    let found = dungeons.get(name).cloned();
    if found.is_none() {
        warn!(dungeon = name, source, "snapshot references unknown dungeon");
    }
    found
}

fn build_dungeon(name: &str, file: DungeonFile) -> StaticDungeon {
    StaticDungeon {
        name: name.to_string(),
        normal_encounters: build_records(name, "normal_encounters", file.normal_encounters),
        bosses: build_records(name, "bosses", file.bosses),
        available: file.available,
    }
}

fn build_records(dungeon: &str, list: &str, raw: Vec<Value>) -> Vec<EncounterRecord> {
    raw.into_iter()
        .enumerate()
        .filter_map(
            |(index, value)| match serde_json::from_value::<RecordFile>(value) {
                Ok(record) => Some(record.into()),
                Err(err) => {
                    warn!(dungeon, list, index, error = %err, "dropping malformed encounter record");
                    None
                }
            },
        )
        .collect()
}
