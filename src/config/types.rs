use serde::Deserialize;

/// Main configuration structure for Tululu-Ripple
///
/// Every section is optional in the TOML file; missing keys fall back to the
/// defaults below, so `Config::default()` is a complete, valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub retry: RetryConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawl target and pacing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Site root used to build `txt.php` and `b<ID>/` URLs
    pub base_url: String,

    /// Genre listing page to paginate
    pub genre_url: String,

    /// First listing page to walk (1-indexed)
    pub start_page: u32,

    /// Last listing page to walk (inclusive, clamped to the site's page count)
    pub end_page: u32,

    /// Number of books fetched concurrently
    pub max_concurrent_books: u32,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://tululu.org/".to_string(),
            genre_url: "https://tululu.org/l55/".to_string(),
            start_page: 1,
            end_page: 2,
            max_concurrent_books: 1,
            request_timeout_secs: 30,
        }
    }
}

/// Retry behaviour for connection failures and timeouts
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RetryConfig {
    /// Attempts per item, including the first one
    pub max_attempts: u32,

    /// Fixed wait after each transient failure (milliseconds)
    pub backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_ms: 5000,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    pub crawler_name: String,
    pub crawler_version: String,
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "tululu-ripple".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/tululu-ripple".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

/// Destination and download toggles
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Destination directory for `books/`, `images/` and `descriptions.json`
    pub dest_folder: String,

    /// Do not save book texts
    pub skip_text: bool,

    /// Do not download cover images
    pub skip_images: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dest_folder: "General".to_string(),
            skip_text: false,
            skip_images: false,
        }
    }
}
