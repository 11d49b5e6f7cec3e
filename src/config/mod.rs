//! Configuration module
//!
//! Loads, parses and validates TOML crawl configuration.
//!
//! # Example
//!
//! ```no_run
//! use kumo::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Page cap: {}", config.max_pages_to_crawl);
//! ```

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::CrawlConfig;
pub use validation::validate;
