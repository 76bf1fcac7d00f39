//! Book fetch-and-parse pipeline
//!
//! Every book takes two requests: the text endpoint and the detail page. The
//! site answers an unknown ID with a redirect instead of a 404, so a
//! redirected response on either request means the book does not exist.
//! Status errors are checked first and are never reinterpreted as missing
//! books.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{extract_book_detail, BookDetail};
use crate::crawler::retry::RetryPolicy;
use crate::output::{sanitize_filename, ArtifactWriter, BookRecord};
use crate::site::{book_page_url, resolve_image_url, text_endpoint_url, TEXT_ID_PARAM};
use crate::CrawlError;
use url::Url;

/// Raw material for one book
#[derive(Debug, Clone)]
pub struct FetchedBook {
    /// Detail page HTML
    pub detail_html: String,

    /// Text body exactly as served
    pub text: Vec<u8>,

    /// Detail page URL, used to resolve the cover reference
    pub page_url: Url,
}

/// Per-book result, one variant per recovery policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookOutcome {
    /// Harvested successfully
    Fetched(BookRecord),

    /// The site redirected the request away: no such book
    NotFound { id: String },

    /// Connection failures or timeouts outlasted the retry policy
    Transient { id: String, error: String },

    /// An HTTP error status
    Status { id: String, status: u16 },

    /// Anything else: malformed page, IO, invalid URL...
    Failed { id: String, error: String },
}

impl BookOutcome {
    pub fn id(&self) -> &str {
        match self {
            Self::Fetched(record) => &record.id,
            Self::NotFound { id }
            | Self::Transient { id, .. }
            | Self::Status { id, .. }
            | Self::Failed { id, .. } => id,
        }
    }
}

/// Maps a pipeline error onto the per-book outcome
pub fn classify_book_error(id: &str, error: CrawlError) -> BookOutcome {
    match error {
        CrawlError::BookNotFound { id } => BookOutcome::NotFound { id },
        CrawlError::HttpStatus { status, .. } => BookOutcome::Status {
            id: id.to_string(),
            status,
        },
        e @ CrawlError::TransientNetwork { .. } => BookOutcome::Transient {
            id: id.to_string(),
            error: e.to_string(),
        },
        e => BookOutcome::Failed {
            id: id.to_string(),
            error: e.to_string(),
        },
    }
}

/// Fetches the text body and the detail page of one book
pub async fn fetch_book(
    fetcher: &Fetcher,
    base_url: &Url,
    book_id: &str,
) -> Result<FetchedBook, CrawlError> {
    let text_url = text_endpoint_url(base_url)?;
    let query = [(TEXT_ID_PARAM, book_id)];
    let text = fetcher.get(&text_url, &query).await?;
    if text.redirected {
        return Err(CrawlError::BookNotFound {
            id: book_id.to_string(),
        });
    }

    let page_url = book_page_url(base_url, book_id)?;
    let detail = fetcher.get(&page_url, &[]).await?;
    if detail.redirected {
        return Err(CrawlError::BookNotFound {
            id: book_id.to_string(),
        });
    }

    Ok(FetchedBook {
        detail_html: detail.text(),
        text: text.body,
        page_url,
    })
}

/// Everything a worker needs to harvest books independently
#[derive(Debug, Clone)]
pub struct BookPipeline {
    pub fetcher: Fetcher,
    pub writer: ArtifactWriter,
    pub retry: RetryPolicy,
    pub base_url: Url,
    pub download_text: bool,
    pub download_images: bool,
}

impl BookPipeline {
    /// Harvests one book, retrying transient failures, and classifies the result
    pub async fn process(&self, book_id: &str) -> BookOutcome {
        let label = format!("b{}", book_id);
        match self.retry.run(&label, || self.harvest(book_id)).await {
            Ok(record) => BookOutcome::Fetched(record),
            Err(e) => classify_book_error(book_id, e),
        }
    }

    /// Fetches, parses and saves one book
    ///
    /// All network requests finish before anything is written, and a text
    /// file is removed again if saving the cover fails, so a book that fails
    /// half-way leaves no files behind.
    pub async fn harvest(&self, book_id: &str) -> Result<BookRecord, CrawlError> {
        let fetched = fetch_book(&self.fetcher, &self.base_url, book_id).await?;
        let detail = extract_book_detail(&fetched.detail_html)?;
        if detail.id != book_id {
            tracing::debug!(
                requested = book_id,
                canonical = %detail.id,
                "Detail page reports a different book id"
            );
        }

        let cover_url = resolve_image_url(&fetched.page_url, &detail.image_ref)?;
        let cover = if self.download_images {
            Some(self.fetcher.get(&cover_url, &[]).await?.body)
        } else {
            None
        };

        let title = sanitize_filename(&detail.title);

        let text_path = if self.download_text {
            self.writer.write_text(&title, &fetched.text).await?
        } else {
            String::new()
        };

        let (cover_image_url, image_path) = match cover {
            Some(bytes) => {
                let written = self
                    .writer
                    .write_image(&fetched.page_url, &detail.image_ref, &detail.id, &bytes)
                    .await;
                match written {
                    Ok(path) => (cover_url.to_string(), path),
                    Err(e) => {
                        self.discard_text(&text_path).await;
                        return Err(e);
                    }
                }
            }
            None => (String::new(), String::new()),
        };

        Ok(build_record(detail, title, cover_image_url, image_path, text_path))
    }

    async fn discard_text(&self, text_path: &str) {
        if text_path.is_empty() {
            return;
        }
        if let Err(e) = self.writer.remove(text_path).await {
            tracing::warn!(path = text_path, "Failed to remove partial book text: {}", e);
        }
    }
}

/// Assembles the final record; empty paths mean the download was disabled
pub fn build_record(
    detail: BookDetail,
    title: String,
    cover_image_url: String,
    image_path: String,
    text_path: String,
) -> BookRecord {
    BookRecord {
        id: detail.id,
        title,
        author: detail.author,
        comments: detail.comments,
        cover_image_url,
        genre: detail.genre,
        image_path,
        text_path,
    }
}
