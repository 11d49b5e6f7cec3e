use crate::config::types::CrawlConfig;
use crate::ConfigError;

/// Validates a crawl configuration
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_threads < 1 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-threads must be >= 1, got {}",
            config.max_concurrent_threads
        )));
    }

    if config.max_concurrent_threads > 100 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-threads must be <= 100, got {}",
            config.max_concurrent_threads
        )));
    }

    if config.user_agent_string.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}
