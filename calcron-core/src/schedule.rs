//! Conversion of event start times into cron schedule expressions.

use std::fmt;

use chrono::{DateTime, Datelike, Duration, Timelike};

use crate::error::{CalcronError, CalcronResult};

/// Accepted start-time layouts: an ISO-8601-like timestamp with a numeric
/// UTC-offset suffix, with either `-` or `/` separating the date fields.
/// Both are attempted in order; the first successful parse wins.
const LAYOUTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%:z", "%Y/%m/%dT%H:%M:%S%:z"];

/// A five-field cron schedule: minute, hour, day-of-month, month, weekday.
/// Weekday 0 is Sunday. There is no seconds field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleExpression {
    pub minute: u32,
    pub hour: u32,
    pub day: u32,
    pub month: u32,
    pub weekday: u32,
}

impl ScheduleExpression {
    /// Compute the schedule that fires `lead_minutes` before `timestamp`.
    ///
    /// The timestamp's own UTC offset is preserved: all five fields are
    /// extracted in the offset the provider stated, so the trigger fires at
    /// the event's wall-clock time rather than the machine's. Subtraction
    /// uses calendar arithmetic and rolls over day, month and year
    /// boundaries (00:02 on Jan 1 minus 5 minutes is 23:57 on Dec 31).
    pub fn from_timestamp(timestamp: &str, lead_minutes: u32) -> CalcronResult<Self> {
        let parsed = LAYOUTS
            .iter()
            .find_map(|layout| DateTime::parse_from_str(timestamp, layout).ok())
            .ok_or_else(|| CalcronError::UnparseableTimestamp(timestamp.to_string()))?;

        let fire_at = parsed - Duration::minutes(i64::from(lead_minutes));

        Ok(ScheduleExpression {
            minute: fire_at.minute(),
            hour: fire_at.hour(),
            day: fire_at.day(),
            month: fire_at.month(),
            weekday: fire_at.weekday().num_days_from_sunday(),
        })
    }
}

impl fmt::Display for ScheduleExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.minute, self.hour, self.day, self.month, self.weekday
        )
    }
}

/// One managed line of the crontab: a schedule followed by the command it
/// runs, written verbatim.
#[derive(Debug, Clone)]
pub struct JobEntry {
    pub schedule: ScheduleExpression,
    pub command: String,
}

impl JobEntry {
    pub fn new(schedule: ScheduleExpression, command: &str) -> Self {
        JobEntry {
            schedule,
            command: command.to_string(),
        }
    }
}

impl fmt::Display for JobEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.schedule, self.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(timestamp: &str, lead_minutes: u32) -> String {
        ScheduleExpression::from_timestamp(timestamp, lead_minutes)
            .expect("Should parse timestamp")
            .to_string()
    }

    #[test]
    fn test_offset_timestamps() {
        // (timestamp, lead minutes, expected five-field expression)
        let cases = [
            ("2025-02-02T20:30:00+05:30", 5, "25 20 2 2 0"),
            ("2025-01-15T10:00:00+00:00", 5, "55 9 15 1 3"),
            ("2025-03-10T14:30:00-08:00", 5, "25 14 10 3 1"),
            ("2025-04-15T09:15:00+05:30", 10, "5 9 15 4 2"),
            ("2025-05-15T10:20:00+05:30", 30, "50 9 15 5 4"),
        ];

        for (timestamp, lead, expected) in cases {
            assert_eq!(
                schedule(timestamp, lead),
                expected,
                "wrong schedule for {}",
                timestamp
            );
        }
    }

    #[test]
    fn test_slash_separated_date() {
        assert_eq!(schedule("2025/07/04T18:00:00+05:30", 5), "55 17 4 7 5");
    }

    #[test]
    fn test_zero_lead_is_identity() {
        // Fri Jun 20, 2025 at noon, no offset applied
        assert_eq!(schedule("2025-06-20T12:00:00+05:30", 0), "0 12 20 6 5");
    }

    #[test]
    fn test_rolls_back_across_day_boundary() {
        assert_eq!(schedule("2025-08-10T00:05:00+05:30", 10), "55 23 9 8 6");
        assert_eq!(schedule("2025-09-01T00:00:00+05:30", 5), "55 23 31 8 0");
    }

    #[test]
    fn test_rolls_back_across_month_boundary() {
        assert_eq!(schedule("2025-02-01T00:03:00+05:30", 5), "58 23 31 1 5");
    }

    #[test]
    fn test_rolls_back_across_year_boundary() {
        // Lands on Tue Dec 31, 2024
        assert_eq!(schedule("2025-01-01T00:02:00+05:30", 5), "57 23 31 12 2");
    }

    #[test]
    fn test_offset_is_never_normalized() {
        // Same wall-clock instant in four different offsets: the fields come
        // from the stated offset, so all four agree on minute and hour.
        for offset in ["+00:00", "+05:30", "-08:00", "+09:00"] {
            let timestamp = format!("2025-06-20T12:00:00{}", offset);
            let expr = ScheduleExpression::from_timestamp(&timestamp, 5)
                .expect("Should parse timestamp");
            assert_eq!((expr.minute, expr.hour), (55, 11), "offset {}", offset);
        }
    }

    #[test]
    fn test_fields_stay_in_cron_ranges() {
        let samples = [
            ("2025-01-01T00:00:00+05:30", 0),
            ("2025-01-01T00:30:00+05:30", 17),
            ("2025-12-31T23:59:00-11:00", 120),
            ("2024-02-29T12:00:00+00:00", 1441),
        ];

        for (timestamp, lead) in samples {
            let expr = ScheduleExpression::from_timestamp(timestamp, lead)
                .expect("Should parse timestamp");
            assert!(expr.minute <= 59);
            assert!(expr.hour <= 23);
            assert!((1..=31).contains(&expr.day));
            assert!((1..=12).contains(&expr.month));
            assert!(expr.weekday <= 6);
        }
    }

    #[test]
    fn test_unparseable_input_is_an_error_not_a_default() {
        // A defaulted zero time would produce a plausible-looking schedule
        // that fires on a fixed nonsense date.
        let bad = [
            "",
            "2025-02-02",              // all-day date, no time of day
            "2025-02-02T20:30:00",     // no offset
            "2025-02-02 20:30:00+05:30",
            "not a timestamp",
        ];

        for input in bad {
            let result = ScheduleExpression::from_timestamp(input, 5);
            assert!(
                matches!(result, Err(CalcronError::UnparseableTimestamp(_))),
                "expected UnparseableTimestamp for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_expression_has_five_fields() {
        let rendered = schedule("2025-03-15T14:30:00+05:30", 5);
        assert_eq!(rendered.split_whitespace().count(), 5);
    }

    #[test]
    fn test_job_entry_renders_schedule_then_command() {
        let expr = ScheduleExpression::from_timestamp("2025-06-20T12:00:00+05:30", 0)
            .expect("Should parse timestamp");
        let entry = JobEntry::new(expr, "notify-send 'meeting soon'");

        assert_eq!(entry.to_string(), "0 12 20 6 5 notify-send 'meeting soon'");
    }
}
