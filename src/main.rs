mod commands;
mod config;
mod google;
mod session;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "calcron")]
#[command(about = "Mirror upcoming calendar events into your crontab")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authenticate with Google Calendar and store the OAuth session
    Auth,
    /// List upcoming events without touching the crontab
    Events,
    /// Rewrite the managed crontab section from upcoming events
    Sync,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Auth => commands::auth::run().await,
        Commands::Events => commands::events::run().await,
        Commands::Sync => commands::sync::run().await,
    }
}
