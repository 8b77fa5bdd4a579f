//! Enumeration of the catchable pokemon of a dungeon.

use tracing::debug;

use crate::core::classifier::catchable_names;
use crate::core::types::{CatchableSet, EncounterList};
use crate::host::Dungeon;

/// Catchable pokemon of `dungeon`, in first-seen order.
///
/// When the dungeon exposes its own availability query, that result is used
/// as-is (catchable-only variant) and the raw encounter lists are not
/// consulted. Otherwise normal encounters and then bosses are classified one
/// by one.
pub fn resolve_catchable_set(dungeon: &dyn Dungeon) -> CatchableSet {
    if let Some(entries) = dungeon.available_pokemon(true) {
        let total = entries.len();
        let set: CatchableSet = entries.iter().filter_map(|entry| entry.name()).collect();
        debug!(
            dungeon = dungeon.name(),
            entries = total,
            catchable = set.len(),
            "resolved catchable set from availability query"
        );
        return set;
    }

    let normal = dungeon
        .normal_encounters()
        .iter()
        .flat_map(|record| catchable_names(record, EncounterList::Normal));
    let bosses = dungeon
        .bosses()
        .iter()
        .flat_map(|record| catchable_names(record, EncounterList::Boss));
    let set: CatchableSet = normal.chain(bosses).collect();
    debug!(
        dungeon = dungeon.name(),
        catchable = set.len(),
        "resolved catchable set from encounter lists"
    );
    set
}

/// Like [`resolve_catchable_set`], with an absent dungeon yielding an empty set.
pub fn resolve_for(dungeon: Option<&dyn Dungeon>) -> CatchableSet {
    dungeon.map(resolve_catchable_set).unwrap_or_default()
}
