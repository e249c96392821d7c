//! Global configuration at ~/.config/calcron/config.toml

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

fn default_max_results() -> i64 {
    5
}

fn default_lead_minutes() -> i64 {
    5
}

fn default_marker() -> String {
    "# calcron managed entries below this line can be deleted.".to_string()
}

fn default_token_file() -> String {
    "~/.config/calcron/token.toml".to_string()
}

fn default_credentials_file() -> String {
    "~/.config/calcron/credentials.json".to_string()
}

fn default_backup_file() -> String {
    "~/.config/calcron/crontab.bak".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Calendar whose events get mirrored (usually the account's email).
    pub calendar_id: String,

    /// Shell command each trigger runs, written into the crontab verbatim.
    pub command: String,

    /// Maximum number of upcoming events to fetch, clamped to 1..=100.
    #[serde(default = "default_max_results")]
    pub max_results: i64,

    /// Minutes before each event start to fire the trigger.
    #[serde(default = "default_lead_minutes")]
    pub lead_minutes: i64,

    /// Literal marker line separating user crontab entries from managed
    /// ones.
    #[serde(default = "default_marker")]
    pub marker: String,

    #[serde(default = "default_token_file")]
    pub token_file: String,

    #[serde(default = "default_credentials_file")]
    pub credentials_file: String,

    #[serde(default = "default_backup_file")]
    pub backup_file: String,

    /// Include events the organizer has deleted.
    #[serde(default)]
    pub show_deleted: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        let mut config: Config = config::Config::builder()
            .add_source(config::File::from(path.clone()).required(true))
            .build()
            .with_context(|| format!("Failed to read config from {}", path.display()))?
            .try_deserialize()
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("calcron");

        Ok(config_dir.join("config.toml"))
    }

    /// Apply value constraints. A negative lead time is rejected here, so
    /// the schedule codec never sees one.
    fn validate(&mut self) -> Result<()> {
        if self.calendar_id.is_empty() {
            anyhow::bail!("calendar_id is required");
        }
        if self.command.is_empty() {
            anyhow::bail!("command is required");
        }
        if self.lead_minutes < 0 {
            anyhow::bail!(
                "lead_minutes must be non-negative, got {}",
                self.lead_minutes
            );
        }

        self.max_results = self.max_results.clamp(1, 100);
        Ok(())
    }

    pub fn token_path(&self) -> PathBuf {
        expand(&self.token_file)
    }

    pub fn credentials_path(&self) -> PathBuf {
        expand(&self.credentials_file)
    }

    pub fn backup_path(&self) -> PathBuf {
        expand(&self.backup_file)
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}
