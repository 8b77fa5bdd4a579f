//! Shared deterministic types for dungeon content resolution.
//!
//! These types describe what a dungeon may contain, independent of where the
//! data comes from. They are rebuilt from host state on every tick and must
//! not be cached across ticks.

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Unlock condition attached to an encounter or boss entry.
pub trait Requirement: fmt::Debug {
    fn is_completed(&self) -> bool;

    /// Human-readable hint shown when the requirement blocks an entry.
    fn description(&self) -> Option<&str> {
        None
    }
}

/// Shared handle to a host-owned requirement.
pub type RequirementRef = Rc<dyn Requirement>;

/// Shadow form of a trainer's roster member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadowStatus {
    /// Ordinary trainer pokemon.
    #[default]
    None,
    /// Shadow form that can be snagged.
    Shadow,
    Purified,
}

/// A pokemon fielded by a trainer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterMember {
    pub name: String,
    #[serde(default)]
    pub shadow: ShadowStatus,
}

impl RosterMember {
    pub fn new(name: &str, shadow: ShadowStatus) -> Self {
        Self {
            name: name.to_string(),
            shadow,
        }
    }
}

/// Plain wild encounter.
#[derive(Debug, Clone, Default)]
pub struct PokemonEncounter {
    pub name: String,
    /// Not shown to the player (decorative entry).
    pub hidden: bool,
    /// Only fielded by shadow trainers; never appears wild.
    pub shadow_trainer_only: bool,
    /// Disguised item encounter.
    pub mimic: bool,
    pub requirement: Option<RequirementRef>,
}

impl PokemonEncounter {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BossEncounter {
    pub name: String,
    pub requirement: Option<RequirementRef>,
}

impl BossEncounter {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            requirement: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TrainerEncounter {
    pub name: Option<String>,
    pub team: Vec<RosterMember>,
    pub requirement: Option<RequirementRef>,
}

/// One entry of a dungeon's encounter or boss list.
#[derive(Debug, Clone)]
pub enum EncounterRecord {
    Pokemon(PokemonEncounter),
    BossPokemon(BossEncounter),
    Trainer(TrainerEncounter),
}

impl EncounterRecord {
    pub fn requirement(&self) -> Option<&RequirementRef> {
        match self {
            EncounterRecord::Pokemon(pokemon) => pokemon.requirement.as_ref(),
            EncounterRecord::BossPokemon(boss) => boss.requirement.as_ref(),
            EncounterRecord::Trainer(trainer) => trainer.requirement.as_ref(),
        }
    }
}

/// Which dungeon list a record was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncounterList {
    Normal,
    Boss,
}

/// Why a record did not yield a catchable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    Trainer,
    Hidden,
    ShadowTrainerOnly,
    Mimic,
    RequirementLocked,
    /// Roster member that is not in shadow form.
    NotShadow,
}

/// Classification of a single record or roster member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict<'a> {
    Catchable(&'a str),
    NotCatchable(Exclusion),
}

/// Terse entry returned by a dungeon's own availability query.
///
/// The query is loosely typed on the host side; every shape it is known to
/// produce gets a variant and anything else lands in `Unrecognized`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AvailabilityEntry {
    Name(String),
    PokemonName {
        #[serde(rename = "pokemonName")]
        pokemon_name: String,
    },
    Nested {
        pokemon: NamedPokemon,
    },
    Unrecognized(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedPokemon {
    pub name: String,
}

impl AvailabilityEntry {
    /// Name carried by the entry, if its shape is recognized.
    pub fn name(&self) -> Option<&str> {
        match self {
            AvailabilityEntry::Name(name) => Some(name),
            AvailabilityEntry::PokemonName { pokemon_name } => Some(pokemon_name),
            AvailabilityEntry::Nested { pokemon } => Some(&pokemon.name),
            AvailabilityEntry::Unrecognized(_) => None,
        }
    }
}

/// Ordered, duplicate-free set of catchable pokemon names.
///
/// Order is first-seen order of the source it was collected from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CatchableSet {
    names: Vec<String>,
}

impl CatchableSet {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|candidate| candidate == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for CatchableSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for name in iter {
            let name = name.as_ref();
            if seen.insert(name.to_string()) {
                names.push(name.to_string());
            }
        }
        Self { names }
    }
}

/// Shiny progress for one dungeon. Recomputed on every refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionReport {
    pub caught: usize,
    pub total: usize,
}

impl CompletionReport {
    pub fn is_complete(&self) -> bool {
        self.caught == self.total
    }
}

impl fmt::Display for CompletionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.caught, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catchable_set_keeps_first_occurrence_order() {
        let set: CatchableSet = ["Zubat", "Geodude", "Zubat", "Onix"].into_iter().collect();
        assert_eq!(set.names(), ["Zubat", "Geodude", "Onix"]);
        assert!(set.contains("Onix"));
        assert!(!set.contains("Paras"));
    }

    #[test]
    fn availability_entries_deserialize_every_known_shape() {
        let raw = r#"["A", {"pokemonName": "B"}, {"pokemon": {"name": "C"}}, null, 7, {"other": 1}]"#;
        let entries: Vec<AvailabilityEntry> = serde_json::from_str(raw).expect("parse");
        let names: Vec<Option<&str>> = entries.iter().map(AvailabilityEntry::name).collect();
        assert_eq!(
            names,
            vec![Some("A"), Some("B"), Some("C"), None, None, None]
        );
    }

    #[test]
    fn completion_report_renders_ratio() {
        let report = CompletionReport {
            caught: 1,
            total: 2,
        };
        assert_eq!(report.to_string(), "1/2");
        assert!(!report.is_complete());
    }
}
