//! Spinneret: a concurrent secret-hunting web crawler
//!
//! Starting from a set of seed URLs, this crate fetches pages with a pool of
//! asynchronous workers, extracts outbound links and credential-shaped
//! strings (JWTs, email addresses), and expands the link graph up to a
//! configurable depth. Discovered secrets are deduplicated in memory and can
//! be exported as one CSV file per hostname. Hostname allow/deny globs bound
//! the crawl, and SIGINT/SIGTERM shut it down gracefully.

pub mod config;
pub mod crawler;
pub mod filter;
pub mod output;
pub mod store;
pub mod url;

use thiserror::Error;

/// Main error type for Spinneret operations
#[derive(Debug, Error)]
pub enum SpinneretError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed URL '{url}': {source}")]
    Seed {
        url: String,
        source: ::url::ParseError,
    },

    #[error("No seed URLs provided")]
    NoSeeds,

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Secret export error: {0}")]
    Export(#[from] csv::Error),

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

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

/// Result type alias for Spinneret operations
pub type Result<T> = std::result::Result<T, SpinneretError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, Crawler};
pub use store::{Secret, SecretStore};
