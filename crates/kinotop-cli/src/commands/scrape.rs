use super::{load_config, open_session, validate_config, ScrapeOverrides};
use super::scrape_ui::ScrapeUI;
use crate::output::Output;
use browser_debug::DebugConfig;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use kinotop_core::Scraper;
use kinotop_sources::HttpImageFetcher;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub async fn run_scrape(
    config_path: Option<&Path>,
    overrides: ScrapeOverrides,
    out: Option<PathBuf>,
    image_dir: Option<PathBuf>,
    json: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    overrides.apply(&mut config);
    if let Some(out) = out {
        config.export.output = out;
    }
    if let Some(dir) = image_dir {
        config.detail.image_dir = dir;
    }
    if json.is_some() {
        config.export.json_dump = json;
    }
    validate_config(&config)?;

    let debug = config
        .browser_debug
        .clone()
        .unwrap_or_else(DebugConfig::from_env);

    info!(
        pages = config.listing.pages,
        headless = config.browser.headless,
        output = %config.export.output.display(),
        "Starting scrape"
    );
    if !config.browser.headless && config.pacing.enabled {
        output.info(format!(
            "A browser window will open; solve the captcha within {}s if one appears",
            config.pacing.captcha_pause_secs
        ));
    }

    let fetcher = HttpImageFetcher::new(&config.browser.user_agent)
        .map_err(|e| eyre!("Failed to create HTTP client: {:#}", e))?;

    let session = open_session(&config).await?;
    let page = match session.page(&debug) {
        Ok(page) => page,
        Err(e) => {
            let _ = session.shutdown().await;
            return Err(eyre!("Failed to prepare browser tab: {:#}", e));
        }
    };

    let ui = ScrapeUI::new(output.is_quiet());
    let result = Scraper::new(&config).run(&page, &fetcher, &ui).await;
    ui.finish();

    // The browser goes away whether or not the scrape succeeded
    if let Err(e) = session.shutdown().await {
        error!("Browser shutdown failed: {:#}", e);
    }

    let summary = result.map_err(|e| eyre!("Scrape failed: {:#}", e))?;
    output.summary(&summary);
    Ok(())
}
