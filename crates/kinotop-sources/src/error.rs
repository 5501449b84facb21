use chromiumoxide::error::CdpError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("browser error: {0}")]
    Browser(#[from] CdpError),

    #[error("failed to load {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("element '{selector}' not found on {url}")]
    MissingElement { selector: String, url: String },

    #[error("listing container #{index} on {url} has no link")]
    MissingLink { url: String, index: usize },

    #[error("could not parse year from '{text}' on {url}")]
    InvalidYear { text: String, url: String },

    #[error("invalid url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to download image {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode image {url}: {source}")]
    Image {
        url: String,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScrapeError {
    pub fn missing(selector: &str, url: &str) -> Self {
        ScrapeError::MissingElement {
            selector: selector.to_string(),
            url: url.to_string(),
        }
    }

    /// Short category used in progress summaries
    pub fn category(&self) -> &'static str {
        match self {
            ScrapeError::Browser(_) | ScrapeError::Navigation { .. } => "navigation",
            ScrapeError::MissingElement { .. } | ScrapeError::MissingLink { .. } => "missing_element",
            ScrapeError::InvalidYear { .. } => "invalid_year",
            ScrapeError::InvalidUrl { .. } => "invalid_url",
            ScrapeError::Download { .. } | ScrapeError::Image { .. } => "image",
            ScrapeError::Io(_) => "io",
        }
    }
}
