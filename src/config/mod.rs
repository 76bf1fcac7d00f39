//! Configuration module for Tululu-Ripple
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and derives the immutable [`CrawlRequest`] a run works from.
//!
//! # Example
//!
//! ```no_run
//! use tululu_ripple::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("tululu.toml")).unwrap();
//! let request = config.crawl_request().unwrap();
//! println!("Walking pages {}..={}", request.start_page, request.end_page);
//! ```

mod parser;
mod request;
mod types;
mod validation;

pub use request::CrawlRequest;
pub use types::{Config, CrawlerConfig, OutputConfig, RetryConfig, UserAgentConfig};
pub use validation::validate;

pub use parser::{load_config, parse_config};
