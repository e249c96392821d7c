//! Clear-then-repopulate reconciliation of calendar events into the crontab.

use std::path::PathBuf;

use crate::crontab::JobTable;
use crate::error::CalcronResult;
use crate::event::{Event, EventStart};
use crate::schedule::{JobEntry, ScheduleExpression};
use crate::shell::CommandRunner;

/// Batch settings for one reconciliation run. Passed in explicitly; there
/// is no process-wide configuration state.
#[derive(Debug, Clone)]
pub struct ReconcileSettings {
    /// Shell command each trigger runs, written into the table verbatim.
    pub command: String,
    /// Where the pre-run snapshot of the table goes.
    pub backup_path: PathBuf,
    /// Literal marker text separating user entries from managed ones.
    pub marker: String,
    /// Minutes before each event start to fire the trigger.
    pub lead_minutes: u32,
}

/// A job written to the table during a run.
#[derive(Debug, Clone)]
pub struct ScheduledJob {
    pub summary: String,
    pub start: String,
    pub schedule: ScheduleExpression,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default)]
pub struct ReconcileSummary {
    pub scheduled: Vec<ScheduledJob>,
    /// Summaries of all-day events, which carry no time of day to trigger
    /// on and are flagged instead of scheduled.
    pub skipped_all_day: Vec<String>,
}

/// Drives one clear-then-repopulate cycle over a batch of events.
pub struct Reconciler<R> {
    table: JobTable<R>,
    settings: ReconcileSettings,
}

impl<R: CommandRunner> Reconciler<R> {
    pub fn new(table: JobTable<R>, settings: ReconcileSettings) -> Self {
        Reconciler { table, settings }
    }

    /// Replace all managed entries with triggers for `events`, in input
    /// order.
    ///
    /// Fail-fast: a failed clear aborts before any append, and a failed
    /// append or an unparseable timed start aborts the rest of the batch.
    /// Entries appended before the failure stay in the table; the backup
    /// still holds the complete pre-run state.
    pub fn reconcile(&self, events: &[Event]) -> CalcronResult<ReconcileSummary> {
        self.table
            .clear_managed(&self.settings.backup_path, &self.settings.marker)?;

        let mut summary = ReconcileSummary::default();

        for event in events {
            let start = match &event.start {
                EventStart::DateTime(timestamp) => timestamp,
                EventStart::Date(_) => {
                    summary.skipped_all_day.push(event.summary.clone());
                    continue;
                }
            };

            let schedule = ScheduleExpression::from_timestamp(start, self.settings.lead_minutes)?;
            self.table
                .append_entry(&JobEntry::new(schedule, &self.settings.command))?;

            summary.scheduled.push(ScheduledJob {
                summary: event.summary.clone(),
                start: start.clone(),
                schedule,
            });
        }

        Ok(summary)
    }
}
