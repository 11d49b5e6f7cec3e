use crate::config::types::CrawlConfig;
use crate::config::validation::validate;
use crate::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// On-disk configuration shape: a single `[crawler]` table.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    crawler: CrawlConfig,
}

/// Loads, parses and validates a TOML configuration file
///
/// Missing keys fall back to their defaults, so a minimal file only has to
/// name the options it changes.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use kumo::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Worker width: {}", config.max_concurrent_threads);
/// ```
pub fn load_config(path: &Path) -> Result<CrawlConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let file: ConfigFile = toml::from_str(&content)?;
    validate(&file.crawler)?;
    Ok(file.crawler)
}
