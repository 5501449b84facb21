use crate::error::ScrapeError;
use crate::pacing::Pacer;
use crate::page::{resolve_url, PageDriver};
use crate::poster::{poster_path, ImageFetcher};
use crate::progress::{ProgressObserver, ProgressTracker};
use kinotop_config::DetailConfig;
use kinotop_models::{MovieLink, MovieRecord};
use tracing::{debug, info};

/// Visits detail pages and turns each into a [`MovieRecord`]
pub struct DetailExtractor<'a> {
    page: &'a dyn PageDriver,
    config: &'a DetailConfig,
    fetcher: &'a dyn ImageFetcher,
    pacer: &'a Pacer,
}

impl<'a> DetailExtractor<'a> {
    pub fn new(
        page: &'a dyn PageDriver,
        config: &'a DetailConfig,
        fetcher: &'a dyn ImageFetcher,
        pacer: &'a Pacer,
    ) -> Self {
        Self { page, config, fetcher, pacer }
    }

    /// Extract every link in order. The first failure stops the run.
    pub async fn extract_all(
        &self,
        links: &[MovieLink],
        observer: &dyn ProgressObserver,
    ) -> Result<Vec<MovieRecord>, ScrapeError> {
        let mut tracker = ProgressTracker::new(links.len(), ProgressTracker::interval_for(links.len()));
        let mut records = Vec::with_capacity(links.len());

        for (index, link) in links.iter().enumerate() {
            let record = match self.extract_movie(link, index).await {
                Ok(record) => record,
                Err(e) => {
                    tracker.record_failed_with_error(e.category());
                    tracker.log_summary("Detail extraction");
                    self.page.capture_failure(&format!("detail_{}", index)).await;
                    return Err(e);
                }
            };

            info!(
                index,
                title = %record.title,
                rating = %record.rating,
                year = record.year,
                image = %record.image_path.display(),
                "Extracted movie"
            );
            tracker.record_extracted();
            tracker.log_progress(index + 1);
            observer.movie_extracted(index + 1, links.len(), &record);
            records.push(record);

            self.pacer.after_detail_page().await;
        }

        tracker.log_summary("Detail extraction");
        Ok(records)
    }

    /// Extract one movie; `index` names the poster file
    pub async fn extract_movie(&self, link: &MovieLink, index: usize) -> Result<MovieRecord, ScrapeError> {
        let url = link.url.as_str();
        self.page.goto(url).await?;

        let src = self
            .page
            .attribute(&self.config.poster_selector, &self.config.poster_attribute)
            .await?
            .ok_or_else(|| ScrapeError::missing(&self.config.poster_selector, url))?;
        let poster_url = resolve_url(url, &src)?;
        let image_path = poster_path(&self.config.image_dir, index);
        self.fetcher.fetch(&poster_url, &image_path).await?;
        debug!("Poster {} saved to {:?}", poster_url, image_path);

        let rating = self.required_text(&self.config.rating_selector, url).await?;
        let title = parse_title(&self.required_text(&self.config.title_selector, url).await?);
        let description = self.required_text(&self.config.description_selector, url).await?;

        let year_text = match self.page.text(&self.config.year_selector).await? {
            Some(text) => text,
            None => {
                debug!(
                    "'{}' not found on {}, trying '{}'",
                    self.config.year_selector, url, self.config.year_fallback_selector
                );
                self.required_text(&self.config.year_fallback_selector, url).await?
            }
        };
        let year = parse_year(&year_text, url)?;

        Ok(MovieRecord::new(image_path, rating, title, description, year))
    }

    async fn required_text(&self, selector: &str, url: &str) -> Result<String, ScrapeError> {
        self.page
            .text(selector)
            .await?
            .ok_or_else(|| ScrapeError::missing(selector, url))
    }
}

/// The heading reads "Title (year)"; keep what precedes the first parenthesis
pub fn parse_title(heading: &str) -> String {
    heading.split('(').next().unwrap_or_default().trim().to_string()
}

pub fn parse_year(text: &str, url: &str) -> Result<i32, ScrapeError> {
    text.trim().parse::<i32>().map_err(|_| ScrapeError::InvalidYear {
        text: text.to_string(),
        url: url.to_string(),
    })
}

#[cfg(test)]
mod tests;
