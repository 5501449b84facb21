use super::{load_config, open_session, validate_config, ScrapeOverrides};
use crate::output::{Output, OutputFormat};
use browser_debug::DebugConfig;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use kinotop_core::Scraper;
use serde_json::json;
use std::path::Path;

pub async fn run_links(config_path: Option<&Path>, overrides: ScrapeOverrides, output: &Output) -> Result<()> {
    let mut config = load_config(config_path)?;
    overrides.apply(&mut config);
    validate_config(&config)?;

    let debug = config
        .browser_debug
        .clone()
        .unwrap_or_else(DebugConfig::from_env);

    let session = open_session(&config).await?;
    let links = match session.page(&debug) {
        Ok(page) => Scraper::new(&config).collect(&page).await,
        Err(e) => Err(e),
    };
    if let Err(e) = session.shutdown().await {
        tracing::error!("Browser shutdown failed: {:#}", e);
    }
    let links = links.map_err(|e| eyre!("{:#}", e))?;

    match output.format() {
        OutputFormat::Human => {
            for (i, link) in links.iter().enumerate() {
                output.println(format!("{:>3}. [page {}] {}", i + 1, link.page, link.url));
            }
            output.success(format!("Collected {} links", links.len()));
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({ "type": "links", "count": links.len(), "links": links }));
        }
    }

    Ok(())
}
