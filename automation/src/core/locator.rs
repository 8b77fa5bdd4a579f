//! Resolution of the dungeon relevant right now.

use crate::host::{Dungeon, Location, RunState};

/// Dungeon the automation should work on.
///
/// An active run is authoritative and wins over whatever town the player is
/// associated with. Outside a run, the current town's dungeon is used when the
/// town has one. Missing links at any step resolve to `None`.
pub fn resolve_current_dungeon<H>(host: &H) -> Option<&dyn Dungeon>
where
    H: RunState + Location + ?Sized,
{
    if host.is_run_active() {
        if let Some(dungeon) = host.run_dungeon() {
            return Some(dungeon);
        }
    }
    town_dungeon(host)
}

/// Dungeon associated with the player's current town, ignoring any run.
pub fn town_dungeon<H>(host: &H) -> Option<&dyn Dungeon>
where
    H: Location + ?Sized,
{
    host.current_town()?.dungeon()
}
