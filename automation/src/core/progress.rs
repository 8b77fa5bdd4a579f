//! Shiny progress of a catchable set against the player's party.

use crate::core::types::{CatchableSet, CompletionReport};
use crate::host::PartyRegistry;

/// Count how many names of `set` the player owns in shiny form.
///
/// Never-caught pokemon count as missing.
pub fn shiny_progress<R>(set: &CatchableSet, registry: &R) -> CompletionReport
where
    R: PartyRegistry + ?Sized,
{
    let caught = set
        .iter()
        .filter(|name| {
            registry
                .pokemon_by_name(name)
                .is_some_and(|pokemon| pokemon.shiny)
        })
        .count();
    CompletionReport {
        caught,
        total: set.len(),
    }
}
