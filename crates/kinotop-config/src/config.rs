use browser_debug::DebugConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserOptions,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub detail: DetailConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub browser_debug: Option<DebugConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserOptions {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub headless: bool,
    /// Explicit Chromium binary; detected automatically when unset
    #[serde(default)]
    pub executable: Option<PathBuf>,
    #[serde(default = "default_window_size")]
    pub window_size: (u32, u32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Listing URL with a `{page}` placeholder for the 1-based page number
    #[serde(default = "default_listing_url")]
    pub url_template: String,
    #[serde(default = "default_pages")]
    pub pages: u32,
    #[serde(default = "default_container_selector")]
    pub container_selector: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailConfig {
    #[serde(default = "default_poster_selector")]
    pub poster_selector: String,
    #[serde(default = "default_poster_attribute")]
    pub poster_attribute: String,
    #[serde(default = "default_rating_selector")]
    pub rating_selector: String,
    #[serde(default = "default_title_selector")]
    pub title_selector: String,
    #[serde(default = "default_description_selector")]
    pub description_selector: String,
    #[serde(default = "default_year_selector")]
    pub year_selector: String,
    /// Tried only when `year_selector` matches nothing
    #[serde(default = "default_year_fallback_selector")]
    pub year_fallback_selector: String,
    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Pause after the first listing page, leaves time to solve a captcha by hand
    #[serde(default = "default_captcha_pause_secs")]
    pub captcha_pause_secs: u64,
    /// Upper bound (exclusive) of the random whole-second pause between page loads
    #[serde(default = "default_jitter_max_secs")]
    pub jitter_max_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default)]
    pub json_dump: Option<PathBuf>,
    #[serde(default = "default_column_widths")]
    pub column_widths: [f64; 5],
    #[serde(default = "default_row_height")]
    pub row_height: f64,
    #[serde(default = "default_image_width")]
    pub image_width: u32,
    #[serde(default = "default_image_height")]
    pub image_height: u32,
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_window_size() -> (u32, u32) {
    (1280, 900)
}

fn default_listing_url() -> String {
    "https://www.kinopoisk.ru/lists/movies/top250/?page={page}".to_string()
}

fn default_pages() -> u32 {
    5
}

fn default_container_selector() -> String {
    ".styles_root__ti07r".to_string()
}

fn default_poster_selector() -> String {
    ".film-poster".to_string()
}

fn default_poster_attribute() -> String {
    "src".to_string()
}

fn default_rating_selector() -> String {
    ".styles_ratingKpTop__84afd".to_string()
}

fn default_title_selector() -> String {
    "h1".to_string()
}

fn default_description_selector() -> String {
    ".styles_paragraph__wEGPz".to_string()
}

fn default_year_selector() -> String {
    ".styles_linkLight__cha3C".to_string()
}

fn default_year_fallback_selector() -> String {
    ".styles_linkDark__7m929".to_string()
}

fn default_image_dir() -> PathBuf {
    PathBuf::from("img")
}

fn default_captcha_pause_secs() -> u64 {
    10
}

fn default_jitter_max_secs() -> u64 {
    5
}

fn default_output() -> PathBuf {
    PathBuf::from("FilmList1.xlsx")
}

fn default_column_widths() -> [f64; 5] {
    [14.1, 7.0, 16.0, 80.0, 7.0]
}

fn default_row_height() -> f64 {
    112.5
}

fn default_image_width() -> u32 {
    100
}

fn default_image_height() -> u32 {
    150
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            headless: false,
            executable: None,
            window_size: default_window_size(),
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            url_template: default_listing_url(),
            pages: default_pages(),
            container_selector: default_container_selector(),
        }
    }
}

impl ListingConfig {
    pub fn page_url(&self, page: u32) -> String {
        self.url_template.replace("{page}", &page.to_string())
    }
}

impl Default for DetailConfig {
    fn default() -> Self {
        Self {
            poster_selector: default_poster_selector(),
            poster_attribute: default_poster_attribute(),
            rating_selector: default_rating_selector(),
            title_selector: default_title_selector(),
            description_selector: default_description_selector(),
            year_selector: default_year_selector(),
            year_fallback_selector: default_year_fallback_selector(),
            image_dir: default_image_dir(),
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            captcha_pause_secs: default_captcha_pause_secs(),
            jitter_max_secs: default_jitter_max_secs(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            json_dump: None,
            column_widths: default_column_widths(),
            row_height: default_row_height(),
            image_width: default_image_width(),
            image_height: default_image_height(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to built-in defaults
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.listing.url_template.contains("{page}") {
            return Err(anyhow::anyhow!(
                "listing.url_template must contain a {{page}} placeholder: {}",
                self.listing.url_template
            ));
        }

        let selectors = [
            ("listing.container_selector", &self.listing.container_selector),
            ("detail.poster_selector", &self.detail.poster_selector),
            ("detail.poster_attribute", &self.detail.poster_attribute),
            ("detail.rating_selector", &self.detail.rating_selector),
            ("detail.title_selector", &self.detail.title_selector),
            ("detail.description_selector", &self.detail.description_selector),
            ("detail.year_selector", &self.detail.year_selector),
            ("detail.year_fallback_selector", &self.detail.year_fallback_selector),
        ];
        for (name, value) in selectors {
            if value.trim().is_empty() {
                return Err(anyhow::anyhow!("{} cannot be empty", name));
            }
        }

        if self.browser.user_agent.trim().is_empty() {
            return Err(anyhow::anyhow!("browser.user_agent cannot be empty"));
        }

        if self.export.image_width == 0 || self.export.image_height == 0 {
            return Err(anyhow::anyhow!("export.image_width and export.image_height must be positive"));
        }

        if self.export.row_height <= 0.0 || self.export.column_widths.iter().any(|w| *w <= 0.0) {
            return Err(anyhow::anyhow!("export row height and column widths must be positive"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config.listing.pages, 5);
        assert_eq!(config.export.output, PathBuf::from("FilmList1.xlsx"));
        assert_eq!(config.detail.image_dir, PathBuf::from("img"));
        assert_eq!(config.pacing.captcha_pause_secs, 10);
        assert_eq!(config.browser.user_agent, DEFAULT_USER_AGENT);
        assert!(config.browser_debug.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [listing]
            pages = 2

            [pacing]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.listing.pages, 2);
        assert_eq!(config.listing.container_selector, ".styles_root__ti07r");
        assert!(!config.pacing.enabled);
        assert_eq!(config.pacing.jitter_max_secs, 5);
    }

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.listing.pages = 3;
        config.export.output = PathBuf::from("out/top.xlsx");
        config.browser.headless = true;

        config.save_to_file(file.path()).unwrap();
        let loaded = Config::load_from_file(file.path()).unwrap();

        assert_eq!(loaded.listing.pages, 3);
        assert_eq!(loaded.export.output, PathBuf::from("out/top.xlsx"));
        assert!(loaded.browser.headless);
        assert_eq!(loaded.export.column_widths, [14.1, 7.0, 16.0, 80.0, 7.0]);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::load_or_default(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.listing.pages, 5);
    }

    #[test]
    fn test_page_url() {
        let listing = ListingConfig::default();
        assert_eq!(
            listing.page_url(3),
            "https://www.kinopoisk.ru/lists/movies/top250/?page=3"
        );
    }

    #[test]
    fn test_validate_rejects_template_without_placeholder() {
        let mut config = Config::default();
        config.listing.url_template = "https://www.kinopoisk.ru/lists/movies/top250/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_selector() {
        let mut config = Config::default();
        config.detail.year_fallback_selector = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("detail.year_fallback_selector"));
    }

    #[test]
    fn test_validate_rejects_zero_image_size() {
        let mut config = Config::default();
        config.export.image_height = 0;
        assert!(config.validate().is_err());
    }
}
