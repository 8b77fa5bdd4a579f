//! Dungeon content resolution and shiny-completion tracking for game
//! automation.
//!
//! The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (dungeon lookup, encounter
//!   classification, catchable sets, shiny progress). No I/O, fully testable
//!   against a fake host.
//! - **[`host`]**: The read-only collaborator traits the game exposes.
//! - **[`io`]**: Side-effecting adapters (config, host snapshots, label sinks).
//!
//! Orchestration modules ([`tracker`], [`controller`], [`looping`]) coordinate
//! core logic with the host to implement the CLI commands.

pub mod controller;
pub mod core;
pub mod exit_codes;
pub mod host;
pub mod io;
pub mod logging;
pub mod looping;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod tracker;
