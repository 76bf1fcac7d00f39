//! Run result and statistics
//!
//! The counters are for observability only; correctness lives in `records`.

use crate::output::record::BookRecord;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Outcome of one run: harvested records in discovery order plus counters
#[derive(Debug, Clone, Default)]
pub struct RunResult {
    /// Harvested books, in the order their IDs were discovered
    pub records: Vec<BookRecord>,

    /// Total listing pages the genre reports
    pub total_pages: u32,

    /// Book IDs collected from the walked listing pages
    pub ids_discovered: usize,

    /// Listing pages that failed during the walk
    pub pages_failed: usize,

    /// Books whose ID redirected away (no such book)
    pub books_not_found: usize,

    /// Books abandoned after connection failures or timeouts
    pub books_unreachable: usize,

    /// Books that failed with an HTTP error status
    pub books_http_error: usize,

    /// Books that failed for any other reason (malformed page, IO, ...)
    pub books_failed: usize,

    /// When the run started; `None` until a coordinator has run
    pub started_at: Option<DateTime<Utc>>,

    /// Wall-clock time of the run
    pub elapsed: Duration,
}

impl RunResult {
    /// Books that were discovered but not harvested
    pub fn books_skipped(&self) -> usize {
        self.books_not_found + self.books_unreachable + self.books_http_error + self.books_failed
    }

    /// Share of discovered IDs that produced a record, in percent
    pub fn success_rate(&self) -> f64 {
        if self.ids_discovered == 0 {
            0.0
        } else {
            (self.records.len() as f64 / self.ids_discovered as f64) * 100.0
        }
    }
}

/// Prints a run summary to stdout in a formatted manner
pub fn print_summary(result: &RunResult) {
    println!("=== Harvest Summary ===\n");

    if let Some(started_at) = result.started_at {
        println!("Started: {}", started_at.to_rfc3339());
        println!();
    }

    println!("Discovery:");
    println!("  Pages in genre: {}", result.total_pages);
    println!("  Pages failed: {}", result.pages_failed);
    println!("  Book IDs found: {}", result.ids_discovered);
    println!();

    println!("Books:");
    println!("  Harvested: {}", result.records.len());
    println!("  Not found: {}", result.books_not_found);
    println!("  Unreachable: {}", result.books_unreachable);
    println!("  HTTP errors: {}", result.books_http_error);
    println!("  Other failures: {}", result.books_failed);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} books) in {:.1}s",
        result.success_rate(),
        result.records.len(),
        result.ids_discovered,
        result.elapsed.as_secs_f64()
    );
}
