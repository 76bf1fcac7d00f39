//! Tululu-Ripple: a genre harvester for the tululu.org library
//!
//! This crate walks the paginated catalogue of one genre, fetches every listed
//! book (text body, detail page, cover image) and records the metadata as a
//! `descriptions.json` collection next to the downloaded artifacts.

pub mod config;
pub mod crawler;
pub mod output;
pub mod site;
pub mod state;

use thiserror::Error;

/// Main error type for Tululu-Ripple operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Book {id} does not exist")]
    BookNotFound { id: String },

    #[error("Network unavailable for {url}: {message}")]
    TransientNetwork { url: String, message: String },

    #[error("Malformed page: {0}")]
    MalformedPage(String),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Invalid run transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::RunPhase,
        to: state::RunPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Worker task failed: {0}")]
    Task(String),
}

impl CrawlError {
    /// Returns true for connection failures and timeouts, which are worth
    /// waiting out and retrying
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientNetwork { .. })
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Tululu-Ripple operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, CrawlRequest};
pub use crawler::{run_crawl, BookOutcome, Coordinator};
pub use output::{BookRecord, RunResult};
pub use state::RunPhase;
