//! Tululu-Ripple main entry point
//!
//! This is the command-line interface for the tululu.org genre harvester.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tululu_ripple::config::{load_config, validate, Config};
use tululu_ripple::crawler::run_crawl;
use tululu_ripple::output::print_summary;
use tracing_subscriber::EnvFilter;

/// Tululu-Ripple: harvest one genre of the tululu.org library
///
/// Walks the genre's listing pages, downloads each book's text and cover and
/// writes their metadata to descriptions.json in the destination folder.
#[derive(Parser, Debug)]
#[command(name = "tululu-ripple")]
#[command(version)]
#[command(about = "Harvest books from one tululu.org genre", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Genre listing URL, e.g. https://tululu.org/l55/
    #[arg(long)]
    genre: Option<String>,

    /// First listing page to walk
    #[arg(long)]
    start_page: Option<u32>,

    /// Last listing page to walk (inclusive)
    #[arg(long)]
    end_page: Option<u32>,

    /// Folder for books/, images/ and descriptions.json
    #[arg(long)]
    dest_folder: Option<String>,

    /// Do not save book texts
    #[arg(long)]
    skip_txt: bool,

    /// Do not download cover images
    #[arg(long)]
    skip_imgs: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the configuration and show what would be harvested
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Command-line flags take precedence over the configuration file
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(genre) = &self.genre {
            config.crawler.genre_url = genre.clone();
        }
        if let Some(start) = self.start_page {
            config.crawler.start_page = start;
        }
        if let Some(end) = self.end_page {
            config.crawler.end_page = end;
        }
        if let Some(dest) = &self.dest_folder {
            config.output.dest_folder = dest.clone();
        }
        if self.skip_txt {
            config.output.skip_text = true;
        }
        if self.skip_imgs {
            config.output.skip_images = true;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path).with_context(|| format!("failed to load {}", path.display()))?
        }
        None => Config::default(),
    };

    cli.apply_overrides(&mut config);
    validate(&config).context("invalid configuration")?;

    if cli.dry_run {
        return handle_dry_run(&config);
    }

    let result = run_crawl(&config).await.context("harvest failed")?;
    if !cli.quiet {
        print_summary(&result);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("tululu_ripple=info,warn"),
            1 => EnvFilter::new("tululu_ripple=debug,info"),
            2 => EnvFilter::new("tululu_ripple=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the resolved request
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let request = config.crawl_request()?;

    println!("=== Tululu-Ripple Dry Run ===\n");

    println!("Catalogue:");
    println!("  Site: {}", request.base_url);
    println!("  Genre: {}", request.genre_url);
    println!(
        "  Pages: {}..={} (clamped to the genre's page count)",
        request.start_page, request.end_page
    );

    println!("\nFetching:");
    println!(
        "  Concurrent books: {}",
        config.crawler.max_concurrent_books
    );
    println!("  Timeout: {}s", config.crawler.request_timeout_secs);
    println!(
        "  Retries: {} attempts, {}ms backoff",
        config.retry.max_attempts, config.retry.backoff_ms
    );
    println!("  User agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Destination: {}", request.dest_dir.display());
    println!("  Texts: {}", if request.download_text { "yes" } else { "skipped" });
    println!(
        "  Covers: {}",
        if request.download_images { "yes" } else { "skipped" }
    );

    println!("\n✓ Configuration is valid");

    Ok(())
}
