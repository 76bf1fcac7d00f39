//! Pagination walker: collects book IDs across a range of listing pages

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{extract_book_ids, extract_page_count};
use crate::crawler::retry::RetryPolicy;
use crate::site::listing_page_url;
use crate::CrawlError;
use url::Url;

/// Book IDs gathered from a genre plus bookkeeping about the walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// IDs in page order, then thumbnail order; duplicates are kept
    pub ids: Vec<String>,

    /// Page count reported by the genre's pagination control
    pub total_pages: u32,

    /// Pages actually requested
    pub pages_walked: u32,

    /// Pages that failed to fetch or parse and contributed nothing
    pub pages_failed: usize,
}

/// Walks listing pages `start_page..=min(end_page, total_pages)` of a genre
///
/// The genre URL is fetched once up front to learn the page count; failing
/// that is fatal since the range cannot be bounded. After that every page is
/// isolated: a page that fails to fetch or parse is logged and skipped.
pub async fn discover_book_ids(
    fetcher: &Fetcher,
    retry: &RetryPolicy,
    genre_url: &Url,
    start_page: u32,
    end_page: u32,
) -> Result<Discovery, CrawlError> {
    let first_page = retry
        .run("genre", || fetcher.get(genre_url, &[]))
        .await?;
    let total_pages = extract_page_count(&first_page.text())?;

    let last_page = end_page.min(total_pages);
    tracing::info!(
        genre = %genre_url,
        total_pages,
        "Walking pages {}..={}",
        start_page,
        last_page
    );

    let mut discovery = Discovery {
        total_pages,
        ..Default::default()
    };

    if start_page > last_page {
        tracing::warn!(
            "Start page {} is past the last page {}, nothing to walk",
            start_page,
            total_pages
        );
        return Ok(discovery);
    }

    for page in start_page..=last_page {
        let page_url = listing_page_url(genre_url, page);
        discovery.pages_walked += 1;

        match fetch_page_ids(fetcher, retry, &page_url, page).await {
            Ok(ids) => {
                tracing::debug!(page, count = ids.len(), "Collected book IDs");
                discovery.ids.extend(ids);
            }
            Err(e) => {
                tracing::warn!(page, url = %page_url, "Skipping listing page: {}", e);
                discovery.pages_failed += 1;
            }
        }
    }

    tracing::info!(
        ids = discovery.ids.len(),
        pages_failed = discovery.pages_failed,
        "Discovery finished"
    );

    Ok(discovery)
}

async fn fetch_page_ids(
    fetcher: &Fetcher,
    retry: &RetryPolicy,
    page_url: &Url,
    page: u32,
) -> Result<Vec<String>, CrawlError> {
    let label = format!("page {}", page);
    let response = retry.run(&label, || fetcher.get(page_url, &[])).await?;
    extract_book_ids(&response.text())
}

// Network behaviour is covered by tests/integration/crawl_tests.rs
