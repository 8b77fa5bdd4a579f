//! Deterministic, pure logic for dungeon content resolution.
//!
//! Core modules must be free of I/O side effects. They read host state through
//! the traits in [`crate::host`] and never fail: missing context degrades to an
//! empty or negative answer.

pub mod catchable;
pub mod classifier;
pub mod locator;
pub mod progress;
pub mod types;
