//! Writing downloaded book texts and cover images to the destination tree
//!
//! Layout under the destination directory:
//! - `books/<sanitized title>.txt`
//! - `images/<file name from the cover URL>`
//!
//! Directories are created on demand (safe to repeat, safe to race) and files
//! are overwritten on re-runs, so harvesting the same book twice leaves
//! identical bytes behind.

use crate::output::filename::{filename_from_url, filename_with_extension, sanitize_filename};
use crate::site::resolve_image_url;
use crate::Result;
use std::path::{Path, PathBuf};
use url::Url;

pub const BOOKS_DIR: &str = "books";
pub const IMAGES_DIR: &str = "images";

/// Relative path of a book's text file
pub fn text_relative_path(title: &str) -> String {
    format!(
        "{}/{}",
        BOOKS_DIR,
        filename_with_extension(&sanitize_filename(title), "txt")
    )
}

/// Relative path of a cover image, named after the last segment of its URL
///
/// Falls back to `cover-<id>` when the URL has no usable file name.
pub fn image_relative_path(image_url: &Url, book_id: &str) -> String {
    let name = filename_from_url(image_url).unwrap_or_else(|| format!("cover-{}", book_id));
    format!("{}/{}", IMAGES_DIR, name)
}

/// Writes artifacts below one destination directory
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dest_dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            dest_dir: dest_dir.into(),
        }
    }

    pub fn dest_dir(&self) -> &Path {
        &self.dest_dir
    }

    /// Creates the destination directory itself
    pub async fn prepare(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dest_dir).await?;
        Ok(())
    }

    /// Saves a book text and returns its path relative to the destination
    pub async fn write_text(&self, title: &str, bytes: &[u8]) -> Result<String> {
        let relative = text_relative_path(title);
        self.write(&relative, bytes).await?;
        tracing::info!(path = %relative, "Saved book text");
        Ok(relative)
    }

    /// Saves a cover image and returns its path relative to the destination
    ///
    /// `image_ref` is resolved against `page_url`, the detail page it was
    /// found on, to pick the file name.
    pub async fn write_image(
        &self,
        page_url: &Url,
        image_ref: &str,
        book_id: &str,
        bytes: &[u8],
    ) -> Result<String> {
        let image_url = resolve_image_url(page_url, image_ref)?;
        let relative = image_relative_path(&image_url, book_id);
        self.write(&relative, bytes).await?;
        tracing::info!(path = %relative, "Saved cover image");
        Ok(relative)
    }

    /// Deletes an artifact written earlier in the same book; a missing file
    /// is not an error
    pub async fn remove(&self, relative: &str) -> Result<()> {
        match tokio::fs::remove_file(self.dest_dir.join(relative)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, relative: &str, bytes: &[u8]) -> Result<()> {
        let path = self.dest_dir.join(relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        Ok(())
    }
}
