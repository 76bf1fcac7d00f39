use crate::config::types::Config;
use crate::site::ensure_trailing_slash;
use crate::ConfigError;
use std::path::PathBuf;
use url::Url;

/// Immutable input of one crawl run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    /// Site root, always ending in `/`
    pub base_url: Url,

    /// Genre listing URL, always ending in `/`
    pub genre_url: Url,

    /// First page of the range (1-indexed)
    pub start_page: u32,

    /// Last page of the range (inclusive)
    pub end_page: u32,

    /// Destination directory for all artifacts
    pub dest_dir: PathBuf,

    pub download_text: bool,
    pub download_images: bool,
}

impl Config {
    /// Derives the run request from a validated configuration
    pub fn crawl_request(&self) -> Result<CrawlRequest, ConfigError> {
        let base_url = parse_dir_url("base_url", &self.crawler.base_url)?;
        let genre_url = parse_dir_url("genre_url", &self.crawler.genre_url)?;

        Ok(CrawlRequest {
            base_url,
            genre_url,
            start_page: self.crawler.start_page,
            end_page: self.crawler.end_page,
            dest_dir: PathBuf::from(&self.output.dest_folder),
            download_text: !self.output.skip_text,
            download_images: !self.output.skip_images,
        })
    }
}

fn parse_dir_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;
    Ok(ensure_trailing_slash(url))
}
