//! Deterministic classification of dungeon encounter records.
//!
//! This is the only place encounter edge cases are decided. Everything
//! downstream trusts these verdicts without re-checking record flags.

use tracing::debug;

use crate::core::types::{
    EncounterList, EncounterRecord, Exclusion, RequirementRef, RosterMember, ShadowStatus, Verdict,
};

/// Classify a single record on its own.
///
/// Rules, in priority order:
/// - trainers are never directly catchable;
/// - plain encounters flagged hidden, shadow-trainer-only or mimic are excluded;
/// - a requirement that does not report itself completed excludes the record;
/// - anything else yields its name.
pub fn classify(record: &EncounterRecord) -> Verdict<'_> {
    match record {
        EncounterRecord::Trainer(_) => Verdict::NotCatchable(Exclusion::Trainer),
        EncounterRecord::Pokemon(pokemon) => {
            if pokemon.hidden {
                Verdict::NotCatchable(Exclusion::Hidden)
            } else if pokemon.shadow_trainer_only {
                Verdict::NotCatchable(Exclusion::ShadowTrainerOnly)
            } else if pokemon.mimic {
                Verdict::NotCatchable(Exclusion::Mimic)
            } else if !requirement_met(pokemon.requirement.as_ref()) {
                Verdict::NotCatchable(Exclusion::RequirementLocked)
            } else {
                Verdict::Catchable(&pokemon.name)
            }
        }
        EncounterRecord::BossPokemon(boss) => {
            if requirement_met(boss.requirement.as_ref()) {
                Verdict::Catchable(&boss.name)
            } else {
                Verdict::NotCatchable(Exclusion::RequirementLocked)
            }
        }
    }
}

/// A trainer's roster member is catchable only in shadow form.
pub fn classify_roster_member(member: &RosterMember) -> Verdict<'_> {
    match member.shadow {
        ShadowStatus::Shadow => Verdict::Catchable(&member.name),
        ShadowStatus::None | ShadowStatus::Purified => Verdict::NotCatchable(Exclusion::NotShadow),
    }
}

/// Every catchable name a record contributes when read from `list`.
///
/// Trainers in the boss list contribute their shadow roster members (once the
/// trainer's own requirement, if any, is completed). Trainers in the normal
/// list contribute nothing.
pub fn catchable_names(record: &EncounterRecord, list: EncounterList) -> Vec<&str> {
    match (record, list) {
        (EncounterRecord::Trainer(trainer), EncounterList::Boss) => {
            if !requirement_met(trainer.requirement.as_ref()) {
                debug!(trainer = ?trainer.name, "skipping locked trainer roster");
                return Vec::new();
            }
            trainer
                .team
                .iter()
                .filter_map(|member| verdict_name(classify_roster_member(member), &member.name))
                .collect()
        }
        _ => {
            let verdict = classify(record);
            verdict_name(verdict, record_label(record)).into_iter().collect()
        }
    }
}

fn requirement_met(requirement: Option<&RequirementRef>) -> bool {
    let Some(requirement) = requirement else {
        return true;
    };
    let completed = requirement.is_completed();
    if !completed {
        debug!(
            requirement = requirement.description().unwrap_or("<unnamed>"),
            "requirement not completed"
        );
    }
    completed
}

fn verdict_name<'a>(verdict: Verdict<'a>, label: &str) -> Option<&'a str> {
    match verdict {
        Verdict::Catchable(name) => Some(name),
        Verdict::NotCatchable(reason) => {
            debug!(record = label, ?reason, "encounter not catchable");
            None
        }
    }
}

fn record_label(record: &EncounterRecord) -> &str {
    match record {
        EncounterRecord::Pokemon(pokemon) => &pokemon.name,
        EncounterRecord::BossPokemon(boss) => &boss.name,
        EncounterRecord::Trainer(trainer) => trainer.name.as_deref().unwrap_or("<trainer>"),
    }
}
