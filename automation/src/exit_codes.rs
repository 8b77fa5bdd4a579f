//! Stable exit codes for CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to invalid config, snapshot or other errors.
pub const INVALID: i32 = 1;
/// `inspect` found no current dungeon.
pub const NO_DUNGEON: i32 = 2;
/// `inspect` found the current dungeon fully caught in shiny form.
pub const SHINY_COMPLETE: i32 = 3;
