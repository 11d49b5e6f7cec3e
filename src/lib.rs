//! Kumo: an event-driven concurrent web crawl engine
//!
//! This crate implements a configurable crawler core: given a seed URL it
//! fetches HTML pages, extracts hyperlinks, and schedules the new links for
//! further fetching, subject to admission and continuation rules. Lifecycle
//! events are emitted so an embedding program can observe progress and
//! collect data.

pub mod config;
pub mod crawler;
pub mod page;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for kumo operations
#[derive(Debug, Error)]
pub enum KumoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed URL '{seed}': {message}")]
    InvalidSeed { seed: String, message: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Worker pool is shut down")]
    PoolShutDown,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for kumo operations
pub type Result<T> = std::result::Result<T, KumoError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::CrawlConfig;
pub use crawler::{
    CrawlDecider, CrawlDecision, CrawlEngine, CrawlEvent, CrawlResult, DecisionMaker,
    FifoScheduler, PageScheduler,
};
pub use page::{CrawledPage, PageToCrawl, ResponseSnapshot};
pub use state::{AdmissionOutcome, CrawlContext};
