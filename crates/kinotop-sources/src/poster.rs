use crate::error::ScrapeError;
use async_trait::async_trait;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Local path of the poster for the `index`-th movie (0-based)
pub fn poster_path(image_dir: &Path, index: usize) -> PathBuf {
    image_dir.join(format!("{}.png", index))
}

/// Stores a remote image at a local path
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), ScrapeError>;
}

/// Downloads posters over plain HTTP and re-encodes them as PNG
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new(user_agent: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), ScrapeError> {
        let download_err = |source| ScrapeError::Download {
            url: url.to_string(),
            source,
        };

        let bytes = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(download_err)?
            .bytes()
            .await
            .map_err(download_err)?;
        debug!("Downloaded {} bytes from {}", bytes.len(), url);

        write_png(&bytes, dest).map_err(|source| match source {
            image::ImageError::IoError(e) => ScrapeError::Io(e),
            other => ScrapeError::Image {
                url: url.to_string(),
                source: other,
            },
        })
    }
}

/// Decode any format the `image` crate understands and store it as PNG
pub fn write_png(bytes: &[u8], dest: &Path) -> Result<(), image::ImageError> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let decoded = image::load_from_memory(bytes)?;
    decoded.save_with_format(dest, ImageFormat::Png)
}
