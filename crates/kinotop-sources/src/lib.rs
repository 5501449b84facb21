pub mod error;
pub mod page;
pub mod session;
pub mod pacing;
pub mod listing;
pub mod detail;
pub mod poster;
pub mod progress;

#[cfg(any(test, feature = "test-util"))]
pub mod fake;

pub use error::ScrapeError;
pub use page::{BrowserPage, PageDriver, resolve_url};
pub use session::BrowserSession;
pub use pacing::Pacer;
pub use listing::collect_links;
pub use detail::{DetailExtractor, parse_title, parse_year};
pub use poster::{HttpImageFetcher, ImageFetcher, poster_path};
pub use progress::{NoProgress, ProgressObserver, ProgressTracker};
