//! HTML extraction for listing and detail pages
//!
//! This module turns fetched HTML into structured data:
//! - the total page count of a genre (from the pagination control)
//! - book IDs on a listing page (from thumbnail links)
//! - book metadata on a detail page (title, author, genre, cover, comments, ID)
//!
//! Every entry point fails with [`CrawlError::MalformedPage`] when the markup
//! anchors it relies on are missing, so a site redesign surfaces as an error
//! rather than as empty records.

use crate::site::book_id_from_href;
use crate::CrawlError;
use scraper::{ElementRef, Html, Selector};

const PAGINATION_LINK: &str = "a.npage";
const THUMBNAIL: &str = "div.bookimage";
const THUMBNAIL_LINK: &str = "a[href]";
const TITLE_BLOCK: &str = "td.ow_px_td div h1";
const GENRE_LINK: &str = "span.d_book a";
const COVER_IMAGE: &str = "div.bookimage img[src]";
const COMMENT: &str = ".texts span";
const BOOK_ID_FIELD: &str = r#".r_comm input[name="bookid"]"#;

/// Separator between title and author in the title block
const TITLE_SEPARATOR: &str = "::";

/// Metadata extracted from one book detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDetail {
    /// Canonical ID from the hidden comment form field
    pub id: String,

    /// Title as rendered (not yet sanitized for the filesystem)
    pub title: String,

    pub author: String,

    /// Genre label; empty if the page has none
    pub genre: String,

    /// Cover image reference exactly as it appears in `src`
    pub image_ref: String,

    /// Reader comments in page order
    pub comments: Vec<String>,
}

/// Returns the highest page number in the pagination control
///
/// The catalogue never states its size, so the last pagination link is the
/// only way to learn how many listing pages a genre has.
///
/// # Example
///
/// ```
/// use tululu_ripple::crawler::extract_page_count;
///
/// let html = r#"<p class="center"><a class="npage" href="/l55/2">2</a>
///     <a class="npage" href="/l55/187">187</a></p>"#;
/// assert_eq!(extract_page_count(html).unwrap(), 187);
/// ```
pub fn extract_page_count(html: &str) -> Result<u32, CrawlError> {
    let document = Html::parse_document(html);
    let link_selector = selector(PAGINATION_LINK)?;

    document
        .select(&link_selector)
        .filter_map(|link| element_text(&link).parse::<u32>().ok())
        .max()
        .ok_or_else(|| CrawlError::MalformedPage("no numbered pagination links".to_string()))
}

/// Returns the book IDs of every thumbnail on a listing page, in page order
pub fn extract_book_ids(html: &str) -> Result<Vec<String>, CrawlError> {
    let document = Html::parse_document(html);
    let thumbnail_selector = selector(THUMBNAIL)?;
    let link_selector = selector(THUMBNAIL_LINK)?;

    let mut thumbnails = document.select(&thumbnail_selector).peekable();
    if thumbnails.peek().is_none() {
        return Err(CrawlError::MalformedPage(
            "no book thumbnails on listing page".to_string(),
        ));
    }

    let mut ids = Vec::new();
    for thumbnail in thumbnails {
        let id = thumbnail
            .select(&link_selector)
            .filter_map(|link| link.value().attr("href"))
            .find_map(book_id_from_href);

        match id {
            Some(id) => ids.push(id),
            None => tracing::debug!("Skipping thumbnail without a book link"),
        }
    }

    Ok(ids)
}

/// Extracts title, author, genre, cover, comments and ID from a detail page
///
/// The title block reads `"<Title> :: <Author>"`; both halves are trimmed and
/// non-breaking spaces are folded into plain spaces. A block without the
/// separator yields an empty author.
pub fn extract_book_detail(html: &str) -> Result<BookDetail, CrawlError> {
    let document = Html::parse_document(html);

    let title_block = document
        .select(&selector(TITLE_BLOCK)?)
        .next()
        .map(|h1| element_text(&h1))
        .ok_or_else(|| CrawlError::MalformedPage("title block not found".to_string()))?;
    let (title, author) = split_title_block(&title_block);
    if title.is_empty() {
        return Err(CrawlError::MalformedPage("title block is empty".to_string()));
    }

    let image_ref = document
        .select(&selector(COVER_IMAGE)?)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(|src| src.trim().to_string())
        .filter(|src| !src.is_empty())
        .ok_or_else(|| CrawlError::MalformedPage("cover image not found".to_string()))?;

    let id = document
        .select(&selector(BOOK_ID_FIELD)?)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| CrawlError::MalformedPage("book id field not found".to_string()))?;

    let genre = document
        .select(&selector(GENRE_LINK)?)
        .next()
        .map(|link| {
            let label = element_text(&link);
            if label.is_empty() {
                link.value().attr("title").map(clean_text).unwrap_or_default()
            } else {
                label
            }
        })
        .unwrap_or_default();

    let comments = document
        .select(&selector(COMMENT)?)
        .map(|span| element_text(&span))
        .collect();

    Ok(BookDetail {
        id,
        title,
        author,
        genre,
        image_ref,
        comments,
    })
}

/// Splits `"Title :: Author"` into trimmed halves
fn split_title_block(block: &str) -> (String, String) {
    match block.split_once(TITLE_SEPARATOR) {
        Some((title, author)) => (clean_text(title), clean_text(author)),
        None => (clean_text(block), String::new()),
    }
}

/// Folds non-breaking spaces into spaces and trims the result
fn clean_text(text: &str) -> String {
    text.replace('\u{a0}', " ").trim().to_string()
}

fn element_text(element: &ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<String>())
}

fn selector(css: &str) -> Result<Selector, CrawlError> {
    Selector::parse(css)
        .map_err(|e| CrawlError::MalformedPage(format!("invalid selector '{}': {}", css, e)))
}
