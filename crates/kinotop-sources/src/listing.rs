use crate::error::ScrapeError;
use crate::pacing::Pacer;
use crate::page::{resolve_url, PageDriver};
use kinotop_config::ListingConfig;
use kinotop_models::MovieLink;
use tracing::{debug, info, warn};

/// Walk `config.pages` listing pages and return one detail link per movie container.
///
/// Links keep page order, then document order within a page.
pub async fn collect_links(
    page: &dyn PageDriver,
    config: &ListingConfig,
    pacer: &Pacer,
) -> Result<Vec<MovieLink>, ScrapeError> {
    let mut links = Vec::new();

    for page_no in 1..=config.pages {
        let url = config.page_url(page_no);
        match collect_page(page, config, pacer, page_no, &url).await {
            Ok(page_links) => {
                info!("Listing page {}/{}: {} links", page_no, config.pages, page_links.len());
                links.extend(page_links);
            }
            Err(e) => {
                page.capture_failure(&format!("listing_page_{}", page_no)).await;
                return Err(e);
            }
        }
    }

    info!("Collected {} movie links from {} listing pages", links.len(), config.pages);
    Ok(links)
}

async fn collect_page(
    page: &dyn PageDriver,
    config: &ListingConfig,
    pacer: &Pacer,
    page_no: u32,
    url: &str,
) -> Result<Vec<MovieLink>, ScrapeError> {
    page.goto(url).await?;
    // The first page usually lands on a captcha, the pause is there for a human to solve it
    pacer.after_listing_page(page_no).await;

    let hrefs = page.container_links(&config.container_selector).await?;
    if hrefs.is_empty() {
        warn!(
            "No '{}' containers on {}; the page layout changed or a captcha is still showing",
            config.container_selector, url
        );
    }

    let mut page_links = Vec::with_capacity(hrefs.len());
    for (index, href) in hrefs.into_iter().enumerate() {
        let href = href.ok_or_else(|| ScrapeError::MissingLink {
            url: url.to_string(),
            index,
        })?;
        let absolute = resolve_url(url, &href)?;
        debug!("Container {} -> {}", index, absolute);
        page_links.push(MovieLink::new(absolute, page_no));
    }
    Ok(page_links)
}
