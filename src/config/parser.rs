//! Reading TOML configuration files

use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Reads, parses and validates the configuration file at `path`
///
/// Every key is optional; a missing section falls back to its defaults.
///
/// ```no_run
/// use std::path::Path;
/// use tululu_ripple::config::load_config;
///
/// let config = load_config(Path::new("tululu.toml")).unwrap();
/// println!("Genre: {}", config.crawler.genre_url);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}
