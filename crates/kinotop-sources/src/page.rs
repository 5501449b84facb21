use crate::error::ScrapeError;
use async_trait::async_trait;
use browser_debug::PageInspector;
use chromiumoxide::Page;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

/// The handful of DOM lookups the scraper needs from a loaded page.
///
/// Lookups return `Ok(None)` when nothing matches; errors are reserved for a
/// broken browser connection. Callers decide whether absence is fatal.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate and wait for the load to finish
    async fn goto(&self, url: &str) -> Result<(), ScrapeError>;

    /// Rendered text of the first element matching `selector`
    async fn text(&self, selector: &str) -> Result<Option<String>, ScrapeError>;

    /// Attribute of the first element matching `selector`
    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>, ScrapeError>;

    /// For every container matching `container_selector`, in document order,
    /// the `href` of its first `<a>` descendant
    async fn container_links(&self, container_selector: &str) -> Result<Vec<Option<String>>, ScrapeError>;

    /// Save whatever helps explain a failure on the current page
    async fn capture_failure(&self, _label: &str) {}
}

/// [`PageDriver`] backed by a live Chromium tab
pub struct BrowserPage {
    page: Page,
    inspector: Option<Mutex<PageInspector>>,
}

impl BrowserPage {
    pub fn new(page: Page) -> Self {
        Self { page, inspector: None }
    }

    pub fn with_inspector(page: Page, inspector: PageInspector) -> Self {
        Self {
            page,
            inspector: Some(Mutex::new(inspector)),
        }
    }

    pub fn inner(&self) -> &Page {
        &self.page
    }
}

#[async_trait]
impl PageDriver for BrowserPage {
    async fn goto(&self, url: &str) -> Result<(), ScrapeError> {
        debug!("Navigating to {}", url);
        self.page.goto(url).await.map_err(|e| ScrapeError::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    async fn text(&self, selector: &str) -> Result<Option<String>, ScrapeError> {
        let elements = self.page.find_elements(selector).await?;
        match elements.first() {
            Some(element) => Ok(element.inner_text().await?.map(|t| t.trim().to_string())),
            None => Ok(None),
        }
    }

    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>, ScrapeError> {
        let elements = self.page.find_elements(selector).await?;
        match elements.first() {
            Some(element) => Ok(element.attribute(name).await?),
            None => Ok(None),
        }
    }

    async fn container_links(&self, container_selector: &str) -> Result<Vec<Option<String>>, ScrapeError> {
        let containers = self.page.find_elements(container_selector).await?;
        let mut links = Vec::with_capacity(containers.len());
        for container in &containers {
            let anchors = container.find_elements("a").await?;
            let href = match anchors.first() {
                Some(anchor) => anchor.attribute("href").await?,
                None => None,
            };
            links.push(href);
        }
        Ok(links)
    }

    async fn capture_failure(&self, label: &str) {
        if let Some(inspector) = &self.inspector {
            let saved = inspector.lock().await.capture_failure(label).await;
            if saved.is_empty() {
                warn!("Debug capture for '{}' produced no files", label);
            }
        }
    }
}

/// Resolve a possibly relative or protocol-relative href against the page it was read from
pub fn resolve_url(base: &str, href: &str) -> Result<String, ScrapeError> {
    let base_url = Url::parse(base).map_err(|source| ScrapeError::InvalidUrl {
        url: base.to_string(),
        source,
    })?;
    base_url
        .join(href.trim())
        .map(|u| u.to_string())
        .map_err(|source| ScrapeError::InvalidUrl {
            url: href.to_string(),
            source,
        })
}
