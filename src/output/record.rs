use serde::{Deserialize, Serialize};

/// Metadata of one harvested book, as written to `descriptions.json`
///
/// `img_path` and `book_path` are relative to the destination directory and
/// are empty exactly when the matching download was disabled; `book_image`
/// is blanked together with `img_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: String,

    /// Title, already sanitized for use as a file name
    pub title: String,

    pub author: String,

    pub comments: Vec<String>,

    /// Absolute cover image URL
    #[serde(rename = "book_image")]
    pub cover_image_url: String,

    /// Link text of the genre link, e.g. `Научная фантастика`
    ///
    /// Older dumps of this collection stored the link's `title` tooltip
    /// instead (`Научная фантастика - перейти к книгам этого жанра`); the
    /// tooltip is only used here when the link has no text.
    pub genre: String,

    #[serde(rename = "img_path")]
    pub image_path: String,

    #[serde(rename = "book_path")]
    pub text_path: String,
}
