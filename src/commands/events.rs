use anyhow::Result;
use owo_colors::OwoColorize;

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
        println!("{}", "No upcoming events found".dimmed());
        return Ok(());
    }

    println!("Upcoming events:");
    for event in &events {
        let when = if event.start.is_all_day() {
            format!("{} all-day", event.start.raw())
        } else {
            event.start.raw().to_string()
        };
        println!("  {} {}", event.summary, format!("({})", when).dimmed());
    }

    Ok(())
}
