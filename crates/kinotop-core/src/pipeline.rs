use crate::export::write_workbook;
use crate::sort::sort_by_year_desc;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use kinotop_config::{Config, ExportConfig};
use kinotop_models::{MovieLink, MovieRecord};
use kinotop_sources::{collect_links, DetailExtractor, ImageFetcher, Pacer, PageDriver, ProgressObserver};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct ScrapeSummary {
    pub links: usize,
    pub movies: usize,
    pub output: PathBuf,
    pub json_dump: Option<PathBuf>,
    pub elapsed_secs: f64,
    pub finished_at: DateTime<Utc>,
}

/// Runs the listing → detail → sort → spreadsheet pipeline
pub struct Scraper<'a> {
    config: &'a Config,
    pacer: Pacer,
}

impl<'a> Scraper<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            pacer: Pacer::from_config(&config.pacing),
        }
    }

    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    pub async fn collect(&self, page: &dyn PageDriver) -> Result<Vec<MovieLink>> {
        collect_links(page, &self.config.listing, &self.pacer)
            .await
            .context("Failed to collect movie links")
    }

    pub async fn run(
        &self,
        page: &dyn PageDriver,
        fetcher: &dyn ImageFetcher,
        observer: &dyn ProgressObserver,
    ) -> Result<ScrapeSummary> {
        let start = Instant::now();

        observer.stage("Collecting movie links");
        let links = self.collect(page).await?;
        observer.links_collected(links.len());

        observer.stage("Extracting movie details");
        let extractor = DetailExtractor::new(page, &self.config.detail, fetcher, &self.pacer);
        let mut records = extractor
            .extract_all(&links, observer)
            .await
            .context("Failed to extract movie details")?;

        observer.stage("Writing spreadsheet");
        export_records(&mut records, &self.config.export)?;

        let summary = ScrapeSummary {
            links: links.len(),
            movies: records.len(),
            output: self.config.export.output.clone(),
            json_dump: self.config.export.json_dump.clone(),
            elapsed_secs: start.elapsed().as_secs_f64(),
            finished_at: Utc::now(),
        };
        info!(
            links = summary.links,
            movies = summary.movies,
            output = %summary.output.display(),
            elapsed_secs = summary.elapsed_secs,
            "Scrape finished"
        );
        Ok(summary)
    }
}

/// Sort records newest first, write the workbook and the optional JSON dump.
///
/// Returns the number of spreadsheet rows written, header included.
pub fn export_records(records: &mut [MovieRecord], config: &ExportConfig) -> Result<u32> {
    sort_by_year_desc(records);

    let rows = write_workbook(records, &config.output, config)
        .with_context(|| format!("Failed to write spreadsheet {:?}", config.output))?;

    if let Some(json_path) = &config.json_dump {
        MovieRecord::save_json(records, json_path)
            .with_context(|| format!("Failed to write JSON dump {:?}", json_path))?;
        info!("Saved JSON dump to {:?}", json_path);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinotop_sources::fake::{FakeDocument, FakeImageFetcher, FakePage};
    use kinotop_sources::NoProgress;
    use tempfile::TempDir;

    fn detail(poster: &str, heading: &str, year: &str) -> FakeDocument {
        FakeDocument::new()
            .with_attribute(".film-poster", "src", poster)
            .with_text(".styles_ratingKpTop__84afd", "8.5")
            .with_text("h1", heading)
            .with_text(".styles_paragraph__wEGPz", "...")
            .with_text(".styles_linkLight__cha3C", year)
    }

    fn config(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.listing.pages = 1;
        config.detail.image_dir = dir.join("img");
        config.export.output = dir.join("FilmList1.xlsx");
        config.export.json_dump = Some(dir.join("movies.json"));
        config
    }

    #[tokio::test]
    async fn test_run_end_to_end() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        let page = FakePage::new()
            .with_page(
                &config.listing.page_url(1),
                FakeDocument::new().with_containers(
                    ".styles_root__ti07r",
                    &[Some("/film/326/"), Some("/film/447301/"), Some("/film/435/")],
                ),
            )
            .with_page(
                "https://www.kinopoisk.ru/film/326/",
                detail("/p/326.jpg", "Побег из Шоушенка (1994)", "1994"),
            )
            .with_page(
                "https://www.kinopoisk.ru/film/447301/",
                detail("/p/447301.jpg", "Начало (2010)", "2010"),
            )
            .with_page(
                "https://www.kinopoisk.ru/film/435/",
                detail("/p/435.jpg", "Зеленая миля (1999)", "1999"),
            );
        let fetcher = FakeImageFetcher::new();

        let summary = Scraper::new(&config)
            .with_pacer(Pacer::none())
            .run(&page, &fetcher, &NoProgress)
            .await
            .unwrap();

        assert_eq!(summary.links, 3);
        assert_eq!(summary.movies, 3);
        assert!(config.export.output.exists());

        let dumped = MovieRecord::load_json(dir.path().join("movies.json")).unwrap();
        let titles: Vec<&str> = dumped.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Начало", "Зеленая миля", "Побег из Шоушенка"]);
        // Posters are numbered in extraction order, not sorted order
        assert_eq!(dumped[0].image_path, dir.path().join("img").join("1.png"));
    }

    #[tokio::test]
    async fn test_run_fails_without_writing_output() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        let page = FakePage::new().with_page(
            &config.listing.page_url(1),
            FakeDocument::new().with_containers(".styles_root__ti07r", &[Some("/film/1/")]),
        );
        let fetcher = FakeImageFetcher::new();

        let err = Scraper::new(&config)
            .with_pacer(Pacer::none())
            .run(&page, &fetcher, &NoProgress)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("extract movie details"));
        assert!(!config.export.output.exists());
        assert!(!dir.path().join("movies.json").exists());
    }
}
