use anyhow::{Context, Result};

use crate::config::Config;

/// Open the group's hosted leaderboard site in the default browser.
///
/// # Errors
/// Returns an error when no `app.site_url` is configured or the browser
/// cannot be opened.
pub fn open_site(config: &Config) -> Result<String> {
    let url = config
        .app
        .site_url
        .as_deref()
        .context("No site configured: set app.site_url in the config file")?;
    open_url(url)?;
    Ok(url.to_string())
}

/// Open an arbitrary URL in the user's default browser.
pub fn open_url(url: &str) -> Result<()> {
    webbrowser::open(url).with_context(|| format!("Failed to open browser for URL: {}", url))?;
    Ok(())
}
