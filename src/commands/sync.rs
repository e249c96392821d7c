use anyhow::Result;
use owo_colors::OwoColorize;

use calcron_core::crontab::{crontab_location, JobTable, Platform};
use calcron_core::reconcile::{ReconcileSettings, Reconciler};
use calcron_core::shell::Shell;

use crate::config::Config;
use crate::google;
use crate::session::Session;

pub async fn run() -> Result<()> {
    let config = Config::load()?;
    let creds = google::load_credentials(&config.credentials_path())?;
    let session = Session::load_valid(&config.token_path(), &creds).await?;

    let events = google::fetch_upcoming_events(
        session.access_token(),
        &config.calendar_id,
        config.max_results,
        config.show_deleted,
    )
    .await?;

    if events.is_empty() {
        println!("No upcoming events found.");
        return Ok(());
    }

    let platform = Platform::detect();
    let table = JobTable::new(crontab_location(platform), Shell);

    let reconciler = Reconciler::new(
        table,
        ReconcileSettings {
            command: config.command.clone(),
            backup_path: config.backup_path(),
            marker: config.marker.clone(),
            lead_minutes: config.lead_minutes as u32,
        },
    );

    let summary = reconciler.reconcile(&events)?;

    for job in &summary.scheduled {
        println!(
            "{} {} {}",
            job.schedule.to_string().cyan(),
            job.summary,
            format!("({})", job.start).dimmed()
        );
    }

    for skipped in &summary.skipped_all_day {
        println!(
            "{} {} {}",
            "skipped".yellow(),
            skipped,
            "(all-day event has no trigger time)".dimmed()
        );
    }

    println!(
        "\nScheduled {} of {} events, backup at {}",
        summary.scheduled.len(),
        events.len(),
        config.backup_path().display()
    );

    Ok(())
}
