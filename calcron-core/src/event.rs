//! Provider-neutral event types.
//!
//! Providers convert their API responses into these types, and the
//! reconciler works exclusively with them. Start times are kept as the
//! provider's verbatim strings: the schedule codec needs the UTC offset
//! exactly as the provider stated it, not re-expressed in some common zone.

use serde::{Deserialize, Serialize};

/// A calendar event (provider-neutral)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub summary: String,
    pub start: EventStart,
    pub status: EventStatus,
}

/// When an event starts, as delivered by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventStart {
    /// Timestamp with a UTC-offset suffix (e.g. `2025-02-02T20:30:00+05:30`)
    DateTime(String),
    /// Bare calendar date of an all-day event (e.g. `2025-02-02`). There is
    /// no time of day here, so no trigger time can be derived from it.
    Date(String),
}

impl EventStart {
    pub fn raw(&self) -> &str {
        match self {
            EventStart::DateTime(s) => s,
            EventStart::Date(s) => s,
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, EventStart::Date(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventStatus {
    Confirmed,
    Tentative,
    Cancelled,
}
