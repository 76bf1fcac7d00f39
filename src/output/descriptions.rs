//! `descriptions.json` emission

use crate::output::record::BookRecord;
use crate::Result;
use std::path::{Path, PathBuf};

pub const DESCRIPTIONS_FILE: &str = "descriptions.json";

/// Writes the record collection as a JSON array under `dest_dir`
///
/// Records keep their order; non-ASCII text is written literally. Nothing is
/// written for an empty collection and `Ok(None)` is returned.
pub async fn write_descriptions(dest_dir: &Path, records: &[BookRecord]) -> Result<Option<PathBuf>> {
    if records.is_empty() {
        tracing::info!("No books harvested, skipping {}", DESCRIPTIONS_FILE);
        return Ok(None);
    }

    let json = serde_json::to_vec(records)?;
    tokio::fs::create_dir_all(dest_dir).await?;
    let path = dest_dir.join(DESCRIPTIONS_FILE);
    tokio::fs::write(&path, json).await?;

    tracing::info!(path = %path.display(), records = records.len(), "Wrote book descriptions");
    Ok(Some(path))
}
