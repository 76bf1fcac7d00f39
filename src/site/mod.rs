//! URL scheme of the tululu.org library
//!
//! The site addresses everything through a handful of fixed patterns:
//! - genre listings: `<genre>/`, `<genre>/2`, `<genre>/3`, ...
//! - book detail pages: `<base>/b<ID>/`
//! - book texts: `<base>/txt.php?id=<ID>`
//!
//! This module builds those URLs and recovers book IDs from listing links.

use url::Url;

/// Name of the text download endpoint, relative to the site root
pub const TEXT_ENDPOINT: &str = "txt.php";

/// Query parameter carrying the book ID on the text endpoint
pub const TEXT_ID_PARAM: &str = "id";

/// Makes sure a directory-like URL ends with `/`
///
/// `Url::join` replaces the last path segment unless the base ends with a
/// slash, so every base the crawler joins onto goes through here first.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use tululu_ripple::site::ensure_trailing_slash;
///
/// let url = ensure_trailing_slash(Url::parse("https://tululu.org/l55").unwrap());
/// assert_eq!(url.as_str(), "https://tululu.org/l55/");
/// ```
pub fn ensure_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Builds the URL of one listing page by pushing the page number as a path
/// segment onto the genre URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use tululu_ripple::site::listing_page_url;
///
/// let genre = Url::parse("https://tululu.org/l55/").unwrap();
/// assert_eq!(listing_page_url(&genre, 3).as_str(), "https://tululu.org/l55/3");
/// ```
pub fn listing_page_url(genre_url: &Url, page: u32) -> Url {
    let mut url = genre_url.clone();
    url.set_query(None);
    url.set_fragment(None);
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(&page.to_string());
    }
    url
}

/// URL of the text endpoint; the book ID travels as a query parameter
pub fn text_endpoint_url(base_url: &Url) -> Result<Url, url::ParseError> {
    base_url.join(TEXT_ENDPOINT)
}

/// Canonical detail page of a book: `<base>/b<ID>/`
pub fn book_page_url(base_url: &Url, book_id: &str) -> Result<Url, url::ParseError> {
    base_url.join(&format!("b{}/", book_id))
}

/// Resolves a cover image reference against the detail page it came from
///
/// Handles absolute, protocol-relative (`//host/x.jpg`), absolute-path
/// (`/shots/1.jpg`) and path-relative (`1.jpg`) references.
pub fn resolve_image_url(page_url: &Url, image_ref: &str) -> Result<Url, url::ParseError> {
    page_url.join(image_ref.trim())
}

/// Extracts the numeric book ID from a listing link such as `/b239/`
///
/// Returns None if the link contains no `/b<digits>` segment.
///
/// # Examples
///
/// ```
/// use tululu_ripple::site::book_id_from_href;
///
/// assert_eq!(book_id_from_href("/b239/"), Some("239".to_string()));
/// assert_eq!(book_id_from_href("https://tululu.org/b5/"), Some("5".to_string()));
/// assert_eq!(book_id_from_href("/about/"), None);
/// ```
pub fn book_id_from_href(href: &str) -> Option<String> {
    for (index, _) in href.match_indices("/b") {
        let rest = &href[index + 2..];
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            continue;
        }

        let after = &rest[digits.len()..];
        if after.is_empty() || after.starts_with('/') || after.starts_with('?') {
            return Some(digits);
        }
    }
    None
}
