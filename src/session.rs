//! Google OAuth session: token persistence and refresh.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::google::GoogleCredentials;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

#[derive(Serialize, Deserialize, Clone)]
pub struct SessionData {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionData {
    pub fn from_tokens(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        SessionData {
            access_token,
            refresh_token,
            expires_at: Utc::now() + Duration::seconds(expires_in),
        }
    }
}

pub struct Session {
    path: PathBuf,
    data: SessionData,
}

impl Session {
    pub fn new(path: PathBuf, data: SessionData) -> Self {
        Session { path, data }
    }

    pub fn access_token(&self) -> &str {
        &self.data.access_token
    }

    /// Load the stored session and refresh it if expired.
    pub async fn load_valid(path: &Path, creds: &GoogleCredentials) -> Result<Self> {
        let mut session = Self::load(path)?;

        if session.is_expired() {
            session.refresh(creds).await?;
            session.save()?;
        }

        Ok(session)
    }

    fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "No OAuth session found at {}. Run `calcron auth` first.",
                path.display()
            );
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read OAuth session from {}", path.display()))?;

        let data: SessionData = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse OAuth session at {}", path.display()))?;

        Ok(Session {
            path: path.to_path_buf(),
            data,
        })
    }

    pub fn save(&self) -> Result<()> {
        let contents =
            toml::to_string_pretty(&self.data).context("Failed to serialize session")?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write session to {}", self.path.display()))?;

        // Set to owner-only (0600) since the file contains OAuth tokens:
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| {
                    format!("Failed to set permissions on {}", self.path.display())
                })?;
        }

        Ok(())
    }

    fn is_expired(&self) -> bool {
        Utc::now() >= self.data.expires_at
    }

    async fn refresh(&mut self, creds: &GoogleCredentials) -> Result<()> {
        #[derive(Deserialize)]
        struct RefreshResponse {
            access_token: String,
            expires_in: i64,
        }

        let client = reqwest::Client::new();

        let response = client
            .post(TOKEN_URL)
            .form(&[
                ("client_id", creds.client_id.as_str()),
                ("client_secret", creds.client_secret.as_str()),
                ("refresh_token", self.data.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .context("Failed to send token refresh request")?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to refresh access token: {}", error_text);
        }

        let refreshed: RefreshResponse = response
            .json()
            .await
            .context("Failed to parse token refresh response")?;

        // Google does not return a new refresh_token on refresh responses,
        // so the stored one stays.
        self.data.access_token = refreshed.access_token;
        self.data.expires_at = Utc::now() + Duration::seconds(refreshed.expires_in);

        Ok(())
    }
}
