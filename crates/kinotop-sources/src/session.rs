use crate::page::BrowserPage;
use anyhow::{anyhow, Result};
use browser_debug::{DebugConfig, PageInspector};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use kinotop_config::BrowserOptions;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use which::which;

/// One Chromium instance with a single reusable tab
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: Page,
}

impl BrowserSession {
    /// Launch Chromium, downloading it into `download_dir` when no system install is found
    pub async fn launch(options: &BrowserOptions, profile_dir: &Path, download_dir: &Path) -> Result<Self> {
        let chrome_path = match options.executable.clone().or_else(find_system_chromium) {
            Some(path) => path,
            None => fetch_chromium(download_dir).await?,
        };
        info!("Using Chromium at {:?}", chrome_path);

        std::fs::create_dir_all(profile_dir)?;
        let config = build_browser_config(options, &chrome_path, profile_dir)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| anyhow!("Failed to launch browser: {}", e))?;

        let handler_task = tokio::spawn(async move {
            let mut error_count = 0;
            const MAX_ERRORS: usize = 10;

            while let Some(h) = handler.next().await {
                match h {
                    Ok(_) => error_count = 0,
                    Err(e) => {
                        error_count += 1;
                        warn!("Browser handler error (count: {}/{}): {:?}", error_count, MAX_ERRORS, e);
                        if error_count >= MAX_ERRORS {
                            error!("Browser handler received {} consecutive errors. Browser process may have crashed.", error_count);
                            break;
                        }
                    }
                }
            }
            debug!("Browser handler task ended");
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| anyhow!("Failed to open browser tab: {}", e))?;

        Ok(Self {
            browser,
            handler_task,
            page,
        })
    }

    /// The session's tab as a [`crate::PageDriver`], with failure captures when debugging is enabled
    pub fn page(&self, debug: &DebugConfig) -> Result<BrowserPage> {
        if debug.is_enabled() {
            let inspector = PageInspector::new(self.page.clone(), debug.clone())?;
            Ok(BrowserPage::with_inspector(self.page.clone(), inspector))
        } else {
            Ok(BrowserPage::new(self.page.clone()))
        }
    }

    pub async fn shutdown(mut self) -> Result<()> {
        info!("Shutting down browser instance");
        if let Err(e) = self.page.close().await {
            warn!("Failed to close page: {}", e);
        }
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser: {}", e);
        }
        let _ = tokio::time::timeout(Duration::from_secs(2), self.handler_task).await;
        info!("Browser instance shut down");
        Ok(())
    }
}

fn build_browser_config(options: &BrowserOptions, chrome_path: &Path, profile_dir: &Path) -> Result<BrowserConfig> {
    let (width, height) = options.window_size;
    let mut builder = BrowserConfig::builder()
        .chrome_executable(chrome_path)
        .user_data_dir(profile_dir)
        .window_size(width, height);

    // chromiumoxide defaults to headless; a visible window is needed to solve the captcha by hand
    if !options.headless {
        builder = builder.with_head();
    }

    if cfg!(target_os = "linux") {
        builder = builder
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage");
    }

    builder = builder
        .arg("--disable-extensions")
        .arg("--disable-notifications")
        .arg("--disable-sync")
        .arg("--disable-default-apps")
        .arg("--log-level=3")
        .arg(format!("--user-agent={}", options.user_agent));

    builder
        .build()
        .map_err(|e| anyhow!("Failed to build browser config: {}", e))
}

async fn fetch_chromium(download_dir: &Path) -> Result<PathBuf> {
    info!("No system Chromium found, downloading via BrowserFetcher...");
    tokio::fs::create_dir_all(download_dir).await?;

    let fetcher = BrowserFetcher::new(
        BrowserFetcherOptions::builder()
            .with_path(download_dir)
            .build()
            .map_err(|e| anyhow!("Failed to create BrowserFetcherOptions: {}", e))?,
    );
    let info = fetcher
        .fetch()
        .await
        .map_err(|e| anyhow!("Failed to fetch Chromium: {}", e))?;

    info!("Chromium downloaded to: {:?}", info.executable_path);
    Ok(info.executable_path)
}

/// Look for an installed Chromium or Chrome
fn find_system_chromium() -> Option<PathBuf> {
    let candidates: &[&str] = if cfg!(target_os = "macos") {
        &[
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/opt/homebrew/bin/chromium",
            "/usr/local/bin/chromium",
        ]
    } else {
        &[
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/usr/bin/google-chrome",
            "/usr/local/bin/chromium",
            "/opt/chromium/chromium",
        ]
    };

    candidates
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
        .or_else(|| {
            which("chromium")
                .or_else(|_| which("chromium-browser"))
                .or_else(|_| which("google-chrome"))
                .ok()
        })
}
