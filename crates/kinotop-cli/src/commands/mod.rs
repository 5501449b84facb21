pub mod config;
pub mod export;
pub mod links;
pub mod scrape;
pub mod scrape_ui;

use clap::{ArgAction, Args};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use kinotop_config::{Config, PathManager};
use kinotop_sources::BrowserSession;
use std::path::{Path, PathBuf};

/// Flags shared by every command that drives the browser
#[derive(Args, Debug, Default, Clone)]
pub struct ScrapeOverrides {
    /// Number of listing pages to walk
    #[arg(long, value_name = "N")]
    pub pages: Option<u32>,

    /// Run Chromium without a window (no chance to solve a captcha by hand)
    #[arg(long, action = ArgAction::SetTrue)]
    pub headless: bool,

    /// Skip all pauses between page loads
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_delay: bool,
}

impl ScrapeOverrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(pages) = self.pages {
            config.listing.pages = pages;
        }
        if self.headless {
            config.browser.headless = true;
        }
        if self.no_delay {
            config.pacing.enabled = false;
        }
    }
}

pub fn config_file(path: Option<&Path>) -> PathBuf {
    match path {
        Some(p) => p.to_path_buf(),
        None => PathManager::default().config_file(),
    }
}

/// Load the config file, or defaults when it doesn't exist
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let file = config_file(path);
    tracing::debug!("Loading config from {:?}", file);
    Config::load_or_default(&file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", file.display(), e))
}

pub fn validate_config(config: &Config) -> Result<()> {
    config
        .validate()
        .map_err(|e| eyre!("Configuration validation failed: {}", e))
}

pub async fn open_session(config: &Config) -> Result<BrowserSession> {
    let paths = PathManager::default();
    BrowserSession::launch(
        &config.browser,
        &paths.browser_profile_dir(),
        &paths.chromium_download_dir(),
    )
    .await
    .map_err(|e| eyre!("Failed to start browser: {:#}", e))
}
