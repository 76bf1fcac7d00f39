//! Output module for harvested data
//!
//! This module handles:
//! - Book records and their JSON shape
//! - Saving book texts and cover images under the destination directory
//! - Writing the `descriptions.json` collection
//! - Run statistics

mod artifacts;
mod descriptions;
pub mod filename;
mod record;
pub mod stats;

pub use artifacts::{
    image_relative_path, text_relative_path, ArtifactWriter, BOOKS_DIR, IMAGES_DIR,
};
pub use descriptions::{write_descriptions, DESCRIPTIONS_FILE};
pub use filename::{
    filename_from_url, filename_with_extension, sanitize_filename, MAX_FILENAME_BYTES,
};
pub use record::BookRecord;
pub use stats::{print_summary, RunResult};
