use anyhow::{Context, Result};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use serde_json::json;
use std::path::PathBuf;
use tracing::{info, warn};
use crate::config::{DebugConfig, ScreenshotFormat};

/// Dumps what the browser was looking at when something went wrong
pub struct PageInspector {
    page: Page,
    config: DebugConfig,
    capture_counter: u32,
}

impl PageInspector {
    pub fn new(page: Page, config: DebugConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.output_dir)
            .with_context(|| format!("Failed to create debug output directory: {:?}", config.output_dir))?;

        Ok(Self {
            page,
            config,
            capture_counter: 0,
        })
    }

    /// Capture a screenshot with a label
    pub async fn screenshot(&mut self, label: &str) -> Result<PathBuf> {
        self.capture_counter += 1;
        let path = self.config.output_dir.join(format!(
            "{:03}_{}.{}",
            self.capture_counter,
            sanitize_label(label),
            self.config.screenshot_format.extension()
        ));

        let format = match self.config.screenshot_format {
            ScreenshotFormat::Png => CaptureScreenshotFormat::Png,
            ScreenshotFormat::Jpeg => CaptureScreenshotFormat::Jpeg,
        };
        let params = ScreenshotParams::builder()
            .format(format)
            .full_page(true)
            .build();

        let data = self.page.screenshot(params).await?;
        std::fs::write(&path, data)
            .with_context(|| format!("Failed to write screenshot to {:?}", path))?;
        info!("Screenshot saved: {:?}", path);
        Ok(path)
    }

    /// Save full page HTML next to a small JSON file with the page URL
    pub async fn save_page_html(&mut self, label: &str) -> Result<PathBuf> {
        self.capture_counter += 1;
        let stem = format!("{:03}_{}", self.capture_counter, sanitize_label(label));
        let path = self.config.output_dir.join(format!("{}.html", stem));

        let html = self.page.content().await?;
        std::fs::write(&path, html)
            .with_context(|| format!("Failed to write HTML to {:?}", path))?;

        let url = self.page.url().await?.unwrap_or_default();
        let state_path = self.config.output_dir.join(format!("{}.json", stem));
        std::fs::write(&state_path, serde_json::to_string_pretty(&json!({ "url": url, "label": label }))?)?;

        info!("Page HTML saved: {:?}", path);
        Ok(path)
    }

    /// Capture everything the config asks for. Failures here are logged and swallowed,
    /// the caller is already handling a more important error.
    pub async fn capture_failure(&mut self, label: &str) -> Vec<PathBuf> {
        let mut saved = Vec::new();
        if !self.config.enabled {
            return saved;
        }

        if self.config.capture_screenshots {
            match self.screenshot(label).await {
                Ok(path) => saved.push(path),
                Err(e) => warn!("Failed to capture screenshot: {}", e),
            }
        }

        if self.config.capture_html {
            match self.save_page_html(label).await {
                Ok(path) => saved.push(path),
                Err(e) => warn!("Failed to save page HTML: {}", e),
            }
        }

        saved
    }

    pub fn config(&self) -> &DebugConfig {
        &self.config
    }
}

/// Make a label safe to use as part of a file name
pub fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect()
}
