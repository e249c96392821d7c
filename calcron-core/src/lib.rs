//! Core types for calcron.
//!
//! This crate provides everything below the network edge:
//! - `event` — provider-neutral calendar event types
//! - `schedule` — conversion of event start times into cron expressions
//! - `crontab` — the user's crontab: location, backup, clear and append
//! - `reconcile` — the clear-then-repopulate cycle over a batch of events
//! - `shell` — the blocking shell-execution primitive the mutator runs on

pub mod crontab;
pub mod error;
pub mod event;
pub mod reconcile;
pub mod schedule;
pub mod shell;

// Re-export the event types at crate root for convenience
pub use error::{CalcronError, CalcronResult};
pub use event::*;
