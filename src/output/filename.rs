//! Filesystem-safe names for downloaded artifacts

use url::Url;

/// Characters rejected by at least one common filesystem
const INVALID_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Longest file name, in bytes, that ext4, btrfs and most others accept
pub const MAX_FILENAME_BYTES: usize = 255;

/// Strips characters that cannot appear in a file name
///
/// Removes path separators, reserved punctuation and control characters,
/// then trims surrounding whitespace and trailing dots. Letters in any script
/// are kept as-is. The result is cut at a character boundary to at most
/// [`MAX_FILENAME_BYTES`] bytes. A name that ends up empty becomes `_`.
///
/// # Examples
///
/// ```
/// use tululu_ripple::output::sanitize_filename;
///
/// assert_eq!(sanitize_filename("Who? What: Where/When"), "Who What WhereWhen");
/// assert_eq!(sanitize_filename("Алиби"), "Алиби");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let stripped: String = name
        .chars()
        .filter(|c| !INVALID_CHARS.contains(c) && !c.is_control())
        .collect();

    let cleaned = tidy(truncate_bytes(stripped.trim(), MAX_FILENAME_BYTES));
    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Joins a sanitized stem and an extension, shortening the stem so the whole
/// name stays within [`MAX_FILENAME_BYTES`]
///
/// # Examples
///
/// ```
/// use tululu_ripple::output::{filename_with_extension, MAX_FILENAME_BYTES};
///
/// assert_eq!(filename_with_extension("Алиби", "txt"), "Алиби.txt");
///
/// let long = "Сборник рассказов ".repeat(10);
/// let name = filename_with_extension(&long, "txt");
/// assert!(name.len() <= MAX_FILENAME_BYTES);
/// assert!(name.ends_with(".txt"));
/// ```
pub fn filename_with_extension(stem: &str, extension: &str) -> String {
    let budget = MAX_FILENAME_BYTES.saturating_sub(extension.len() + 1);
    let stem = tidy(truncate_bytes(stem, budget));
    let stem = if stem.is_empty() { "_" } else { stem };
    format!("{}.{}", stem, extension)
}

/// Longest prefix of `s` that is at most `max_bytes` long and ends on a
/// character boundary
fn truncate_bytes(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

fn tidy(name: &str) -> &str {
    name.trim().trim_end_matches('.').trim_end()
}

/// Returns the sanitized last path segment of `url`, if it has one
pub fn filename_from_url(url: &Url) -> Option<String> {
    let last = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let decoded = urlencoding::decode(last)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| last.to_string());
    let name = sanitize_filename(&decoded);
    (name != "_").then_some(name)
}
