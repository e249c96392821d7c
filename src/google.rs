//! Google Calendar access: OAuth consent flow and event listing.
//!
//! Talks to the Calendar REST API directly so event start times arrive as
//! the provider's verbatim strings. The schedule codec needs the UTC offset
//! exactly as Google stated it, so nothing here parses or normalizes a
//! timestamp.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;

use calcron_core::{Event, EventStart, EventStatus};

use crate::session::SessionData;

const REDIRECT_PORT: u16 = 8085;
const REDIRECT_URI: &str = "http://localhost:8085/callback";

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const CALENDAR_URL: &str = "https://www.googleapis.com/calendar/v3/calendars";

const SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

/// OAuth client credentials from a Google-format credentials.json.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleCredentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Deserialize)]
struct CredentialsFile {
    installed: GoogleCredentials,
}

pub fn load_credentials(path: &Path) -> Result<GoogleCredentials> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read client credentials from {}", path.display()))?;

    let file: CredentialsFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse client credentials at {}", path.display()))?;

    Ok(file.installed)
}

/// Run the full OAuth authentication flow
pub async fn authenticate(creds: &GoogleCredentials) -> Result<SessionData> {
    let auth_url = url::Url::parse_with_params(
        AUTH_URL,
        &[
            ("client_id", creds.client_id.as_str()),
            ("redirect_uri", REDIRECT_URI),
            ("response_type", "code"),
            ("scope", SCOPE),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("state", "calcron"),
        ],
    )
    .context("Failed to build consent URL")?;

    println!("\nOpen this URL in your browser to authenticate:\n");
    println!("{}\n", auth_url);

    // Try to open the browser automatically
    if open::that(auth_url.as_str()).is_err() {
        println!("(Could not open browser automatically, please copy the URL above)");
    }

    let (code, _state) = wait_for_callback()?;

    println!("\nReceived authorization code, exchanging for tokens...");

    #[derive(Deserialize)]
    struct TokenResponse {
        access_token: String,
        refresh_token: Option<String>,
        expires_in: i64,
    }

    let client = reqwest::Client::new();

    let response = client
        .post(TOKEN_URL)
        .form(&[
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
            ("code", code.as_str()),
            ("redirect_uri", REDIRECT_URI),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .context("Failed to exchange code for tokens")?;

    if !response.status().is_success() {
        let error_text = response.text().await.unwrap_or_default();
        anyhow::bail!("Token exchange failed: {}", error_text);
    }

    let tokens: TokenResponse = response
        .json()
        .await
        .context("Failed to parse token response")?;

    let refresh_token = tokens
        .refresh_token
        .context("Google granted no refresh token; revoke access and authenticate again")?;

    Ok(SessionData::from_tokens(
        tokens.access_token,
        refresh_token,
        tokens.expires_in,
    ))
}

/// Start a local HTTP server to receive the OAuth callback
/// Returns (code, state)
fn wait_for_callback() -> Result<(String, String)> {
    let listener = TcpListener::bind(format!("127.0.0.1:{}", REDIRECT_PORT))
        .with_context(|| format!("Failed to bind to port {}", REDIRECT_PORT))?;

    println!("Waiting for OAuth callback on port {}...", REDIRECT_PORT);

    let (mut stream, _) = listener.accept().context("Failed to accept connection")?;

    let mut reader = BufReader::new(&stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;

    // Request line looks like: GET /callback?code=xxx&state=yyy HTTP/1.1
    let url_part = request_line
        .split_whitespace()
        .nth(1)
        .context("Invalid request")?;

    let url = url::Url::parse(&format!("http://localhost{}", url_part))?;

    let code = url
        .query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.to_string())
        .context("No code in callback")?;

    let state = url
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.to_string())
        .context("No state in callback")?;

    // Send a response to the browser
    let response = "HTTP/1.1 200 OK\r\n\
        Content-Type: text/html\r\n\
        Connection: close\r\n\
        \r\n\
        <html><body>\
        <h1>Authentication successful!</h1>\
        <p>You can close this window and return to the terminal.</p>\
        </body></html>";

    stream.write_all(response.as_bytes())?;
    stream.flush()?;

    Ok((code, state))
}

/// Raw event payload from the events.list call. Start strings are carried
/// through untouched.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleEvent {
    #[serde(default)]
    id: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    summary: String,
    start: Option<GoogleEventTime>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleEventTime {
    date_time: Option<String>,
    date: Option<String>,
}

#[derive(Deserialize)]
struct GoogleEventList {
    #[serde(default)]
    items: Vec<GoogleEvent>,
}

/// Fetch upcoming events from a calendar, soonest first.
pub async fn fetch_upcoming_events(
    access_token: &str,
    calendar_id: &str,
    max_results: i64,
    show_deleted: bool,
) -> Result<Vec<Event>> {
    let url = format!("{}/{}/events", CALENDAR_URL, calendar_id);
    let time_min = Utc::now().to_rfc3339();

    let client = reqwest::Client::new();

    let response = client
        .get(&url)
        .bearer_auth(access_token)
        .query(&[
            ("singleEvents", "true"),
            ("orderBy", "startTime"),
            ("timeMin", time_min.as_str()),
            ("maxResults", max_results.to_string().as_str()),
            ("showDeleted", if show_deleted { "true" } else { "false" }),
        ])
        .send()
        .await
        .with_context(|| format!("Failed to fetch events for calendar '{}'", calendar_id))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        anyhow::bail!("Calendar API returned {}: {}", status, error_text);
    }

    let list: GoogleEventList = response
        .json()
        .await
        .context("Failed to parse events response")?;

    let mut events = Vec::new();

    for item in list.items {
        if item.status == "cancelled" || item.id.is_empty() {
            continue;
        }

        let start = match item.start {
            Some(GoogleEventTime {
                date_time: Some(dt),
                ..
            }) => EventStart::DateTime(dt),
            Some(GoogleEventTime { date: Some(d), .. }) => EventStart::Date(d),
            _ => continue,
        };

        let status = match item.status.as_str() {
            "tentative" => EventStatus::Tentative,
            _ => EventStatus::Confirmed,
        };

        events.push(Event {
            id: item.id,
            summary: item.summary,
            start,
            status,
        });
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_parse_from_installed_app_json() {
        let raw = r#"{
            "installed": {
                "client_id": "abc.apps.googleusercontent.com",
                "client_secret": "shhh",
                "redirect_uris": ["http://localhost"]
            }
        }"#;

        let file: CredentialsFile = serde_json::from_str(raw).expect("Should parse");
        assert_eq!(file.installed.client_id, "abc.apps.googleusercontent.com");
        assert_eq!(file.installed.client_secret, "shhh");
    }

    #[test]
    fn test_event_payload_keeps_start_strings_verbatim() {
        let raw = r#"{
            "items": [
                {
                    "id": "evt1",
                    "status": "confirmed",
                    "summary": "Standup",
                    "start": { "dateTime": "2025-02-02T20:30:00+05:30" }
                },
                {
                    "id": "evt2",
                    "status": "confirmed",
                    "summary": "Holiday",
                    "start": { "date": "2025-02-03" }
                }
            ]
        }"#;

        let list: GoogleEventList = serde_json::from_str(raw).expect("Should parse");

        assert_eq!(
            list.items[0].start.as_ref().and_then(|s| s.date_time.as_deref()),
            Some("2025-02-02T20:30:00+05:30")
        );
        assert_eq!(
            list.items[1].start.as_ref().and_then(|s| s.date.as_deref()),
            Some("2025-02-03")
        );
    }
}
