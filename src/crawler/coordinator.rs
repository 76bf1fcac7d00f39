//! Crawler coordinator - run orchestration
//!
//! This module sequences one harvest:
//! - Preparing the destination directory
//! - Discovering book IDs across the requested listing pages
//! - Fetching, parsing and saving each book with per-book error isolation
//! - Emitting `descriptions.json`
//!
//! Only three failures abort a run: an unusable destination directory, a
//! genre whose page count cannot be discovered, and a failed metadata write.

use crate::config::{Config, CrawlRequest};
use crate::crawler::book::{BookOutcome, BookPipeline};
use crate::crawler::fetcher::{build_http_client, Fetcher};
use crate::crawler::retry::RetryPolicy;
use crate::crawler::walker::discover_book_ids;
use crate::output::{write_descriptions, ArtifactWriter, RunResult};
use crate::state::RunPhase;
use crate::CrawlError;
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// Main crawler coordinator structure
pub struct Coordinator {
    request: CrawlRequest,
    fetcher: Fetcher,
    retry: RetryPolicy,
    max_concurrent_books: usize,
    phase: RunPhase,
}

impl Coordinator {
    /// Creates a coordinator from a validated configuration
    pub fn new(config: &Config) -> Result<Self, CrawlError> {
        let request = config.crawl_request()?;
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.crawler.request_timeout_secs),
        )
        .map_err(|e| CrawlError::Http {
            url: request.base_url.to_string(),
            source: e,
        })?;

        Ok(Self::with_fetcher(
            request,
            Fetcher::new(client),
            RetryPolicy::from(&config.retry),
            config.crawler.max_concurrent_books as usize,
        ))
    }

    /// Creates a coordinator around an existing fetcher
    pub fn with_fetcher(
        request: CrawlRequest,
        fetcher: Fetcher,
        retry: RetryPolicy,
        max_concurrent_books: usize,
    ) -> Self {
        Self {
            request,
            fetcher,
            retry,
            max_concurrent_books: max_concurrent_books.max(1),
            phase: RunPhase::Discovering,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Runs the harvest to completion
    ///
    /// Per-book failures are counted in the returned [`RunResult`]; only
    /// run-level failures come back as `Err`.
    pub async fn run(&mut self) -> Result<RunResult, CrawlError> {
        if self.phase != RunPhase::Discovering {
            return Err(CrawlError::InvalidTransition {
                from: self.phase,
                to: RunPhase::Discovering,
            });
        }

        let start_time = Instant::now();
        let mut result = RunResult {
            started_at: Some(Utc::now()),
            ..Default::default()
        };

        let writer = ArtifactWriter::new(&self.request.dest_dir);
        writer.prepare().await?;

        tracing::info!(
            genre = %self.request.genre_url,
            dest = %self.request.dest_dir.display(),
            "Starting harvest"
        );

        let discovery = discover_book_ids(
            &self.fetcher,
            &self.retry,
            &self.request.genre_url,
            self.request.start_page,
            self.request.end_page,
        )
        .await?;

        result.total_pages = discovery.total_pages;
        result.pages_failed = discovery.pages_failed;
        result.ids_discovered = discovery.ids.len();

        if discovery.ids.is_empty() {
            tracing::warn!("No book IDs discovered");
            self.transition(RunPhase::Emitting)?;
        } else {
            self.transition(RunPhase::FetchingBooks)?;
            let pipeline = BookPipeline {
                fetcher: self.fetcher.clone(),
                writer,
                retry: self.retry.clone(),
                base_url: self.request.base_url.clone(),
                download_text: self.request.download_text,
                download_images: self.request.download_images,
            };
            let outcomes = self.fetch_books(pipeline, discovery.ids).await;
            for outcome in outcomes {
                tally(&mut result, outcome);
            }

            // artifacts were written as each book finished
            self.transition(RunPhase::Persisting)?;
            self.transition(RunPhase::Emitting)?;
        }

        write_descriptions(&self.request.dest_dir, &result.records).await?;
        self.transition(RunPhase::Done)?;

        result.elapsed = start_time.elapsed();
        tracing::info!(
            harvested = result.records.len(),
            skipped = result.books_skipped(),
            "Harvest completed in {:?}",
            result.elapsed
        );

        Ok(result)
    }

    /// Processes every ID and returns outcomes in discovery order
    ///
    /// With one worker the books are handled strictly one after another.
    /// Otherwise each book runs in its own task, gated by a semaphore, and
    /// the handles are awaited in discovery order; a failed or panicked task
    /// only affects its own book.
    async fn fetch_books(&self, pipeline: BookPipeline, ids: Vec<String>) -> Vec<BookOutcome> {
        let total = ids.len();
        let mut outcomes = Vec::with_capacity(total);

        if self.max_concurrent_books == 1 {
            for (index, id) in ids.iter().enumerate() {
                tracing::debug!("Book {}/{}: {}", index + 1, total, id);
                outcomes.push(pipeline.process(id).await);
            }
            return outcomes;
        }

        let pipeline = Arc::new(pipeline);
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_books));
        let mut handles = Vec::with_capacity(total);

        for id in ids {
            let pipeline = Arc::clone(&pipeline);
            let semaphore = Arc::clone(&semaphore);
            let task_id = id.clone();
            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        return BookOutcome::Failed {
                            id: task_id,
                            error: e.to_string(),
                        }
                    }
                };
                pipeline.process(&task_id).await
            });
            handles.push((id, handle));
        }

        for (id, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => BookOutcome::Failed {
                    id,
                    error: CrawlError::Task(e.to_string()).to_string(),
                },
            };
            outcomes.push(outcome);
        }

        outcomes
    }

    fn transition(&mut self, next: RunPhase) -> Result<(), CrawlError> {
        if !self.phase.can_transition_to(next) {
            return Err(CrawlError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!("Run phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }
}

/// Logs one book outcome and folds it into the run result
fn tally(result: &mut RunResult, outcome: BookOutcome) {
    match outcome {
        BookOutcome::Fetched(record) => {
            tracing::info!(id = %record.id, title = %record.title, "Harvested book");
            result.records.push(record);
        }
        BookOutcome::NotFound { id } => {
            tracing::warn!("Book with ID {} does not exist", id);
            result.books_not_found += 1;
        }
        BookOutcome::Transient { id, error } => {
            tracing::error!("Giving up on book {}: {}", id, error);
            result.books_unreachable += 1;
        }
        BookOutcome::Status { id, status } => {
            tracing::error!("Book {} failed with HTTP {}", id, status);
            result.books_http_error += 1;
        }
        BookOutcome::Failed { id, error } => {
            tracing::error!("Book {} failed: {}", id, error);
            result.books_failed += 1;
        }
    }
}

/// Runs a complete harvest from configuration
///
/// # Example
///
/// ```no_run
/// use tululu_ripple::config::load_config;
/// use tululu_ripple::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("tululu.toml"))?;
/// let result = run_crawl(&config).await?;
/// println!("{} books harvested", result.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<RunResult, CrawlError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
