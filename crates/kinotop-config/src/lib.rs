pub mod config;
pub mod paths;

pub use config::{BrowserOptions, Config, DetailConfig, ExportConfig, ListingConfig, PacingConfig, DEFAULT_USER_AGENT};
pub use paths::{PathManager, container_base_path};
