//! Configuration module for Spinneret
//!
//! This module handles loading, merging, and validating crawler settings.
//! Settings resolve in three layers: built-in defaults, an optional TOML
//! config file, and explicit command-line flags on top.
//!
//! # Example
//!
//! ```no_run
//! use spinneret::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("spinneret.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, ConfigFile, DEFAULT_DEPTH, DEFAULT_WORKERS};

// Re-export parser functions
pub use parser::{load_config, load_overlay};

// Re-export validation
pub use validation::validate;
