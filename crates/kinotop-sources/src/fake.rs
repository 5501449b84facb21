//! In-memory stand-ins for a browser tab and the poster downloader.

use crate::error::ScrapeError;
use crate::page::PageDriver;
use crate::poster::ImageFetcher;
use async_trait::async_trait;
use image::{ImageBuffer, ImageFormat, Rgb};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Canned lookup results for one URL
#[derive(Debug, Default, Clone)]
pub struct FakeDocument {
    texts: HashMap<String, String>,
    attributes: HashMap<(String, String), String>,
    containers: HashMap<String, Vec<Option<String>>>,
}

impl FakeDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, selector: &str, text: &str) -> Self {
        self.texts.insert(selector.to_string(), text.to_string());
        self
    }

    pub fn with_attribute(mut self, selector: &str, name: &str, value: &str) -> Self {
        self.attributes
            .insert((selector.to_string(), name.to_string()), value.to_string());
        self
    }

    pub fn with_containers(mut self, selector: &str, hrefs: &[Option<&str>]) -> Self {
        self.containers.insert(
            selector.to_string(),
            hrefs.iter().map(|h| h.map(str::to_string)).collect(),
        );
        self
    }
}

#[derive(Default)]
pub struct FakePage {
    documents: HashMap<String, FakeDocument>,
    current: Mutex<Option<String>>,
    visited: Mutex<Vec<String>>,
    captures: Mutex<Vec<String>>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, document: FakeDocument) -> Self {
        self.documents.insert(url.to_string(), document);
        self
    }

    /// Every URL passed to `goto`, in order
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }

    /// Labels passed to `capture_failure`
    pub fn captures(&self) -> Vec<String> {
        self.captures.lock().unwrap().clone()
    }

    fn current(&self) -> Result<&FakeDocument, ScrapeError> {
        let current = self.current.lock().unwrap().clone();
        match current {
            Some(url) => self.documents.get(&url).ok_or(ScrapeError::Navigation {
                url,
                reason: "page vanished".to_string(),
            }),
            None => Err(ScrapeError::Navigation {
                url: "about:blank".to_string(),
                reason: "no page loaded".to_string(),
            }),
        }
    }
}

#[async_trait]
impl PageDriver for FakePage {
    async fn goto(&self, url: &str) -> Result<(), ScrapeError> {
        self.visited.lock().unwrap().push(url.to_string());
        if !self.documents.contains_key(url) {
            return Err(ScrapeError::Navigation {
                url: url.to_string(),
                reason: "404 Not Found".to_string(),
            });
        }
        *self.current.lock().unwrap() = Some(url.to_string());
        Ok(())
    }

    async fn text(&self, selector: &str) -> Result<Option<String>, ScrapeError> {
        Ok(self.current()?.texts.get(selector).cloned())
    }

    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>, ScrapeError> {
        Ok(self
            .current()?
            .attributes
            .get(&(selector.to_string(), name.to_string()))
            .cloned())
    }

    async fn container_links(&self, container_selector: &str) -> Result<Vec<Option<String>>, ScrapeError> {
        Ok(self
            .current()?
            .containers
            .get(container_selector)
            .cloned()
            .unwrap_or_default())
    }

    async fn capture_failure(&self, label: &str) {
        self.captures.lock().unwrap().push(label.to_string());
    }
}

/// Writes a small solid PNG instead of downloading anything
#[derive(Default)]
pub struct FakeImageFetcher {
    fetched: Mutex<Vec<(String, PathBuf)>>,
    failing: HashSet<String>,
}

impl FakeImageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make fetches of `url` fail
    pub fn failing_on(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub fn fetched(&self) -> Vec<(String, PathBuf)> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageFetcher for FakeImageFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), ScrapeError> {
        if self.failing.contains(url) {
            return Err(ScrapeError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("poster {} unavailable", url),
            )));
        }
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(20, 30, Rgb([30, 60, 90]));
        img.save_with_format(dest, ImageFormat::Png).map_err(|source| ScrapeError::Image {
            url: url.to_string(),
            source,
        })?;
        self.fetched
            .lock()
            .unwrap()
            .push((url.to_string(), dest.to_path_buf()));
        Ok(())
    }
}
