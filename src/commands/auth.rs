use anyhow::Result;
use owo_colors::OwoColorize;

use crate::config::Config;
use crate::google;
use crate::session::Session;

pub async fn run() -> Result<()> {
    let config = Config::load()?;
    let creds = google::load_credentials(&config.credentials_path())?;

    let data = google::authenticate(&creds).await?;

    let session = Session::new(config.token_path(), data);
    session.save()?;

    println!(
        "{} Tokens saved to {}",
        "Authentication successful!".green(),
        config.token_path().display()
    );
    Ok(())
}
