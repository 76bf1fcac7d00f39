//! Crawler module for catalogue walking and book harvesting
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with redirect detection
//! - Fixed-backoff retry for transient network failures
//! - HTML extraction for listing and detail pages
//! - Pagination walking
//! - The per-book fetch-and-parse pipeline
//! - Overall run coordination

mod book;
mod coordinator;
mod fetcher;
mod parser;
mod retry;
mod walker;

pub use book::{build_record, classify_book_error, fetch_book, BookOutcome, BookPipeline, FetchedBook};
pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, FetchedResponse, Fetcher};
pub use parser::{extract_book_detail, extract_book_ids, extract_page_count, BookDetail};
pub use retry::{RetryDecision, RetryPolicy};
pub use walker::{discover_book_ids, Discovery};
