//! URL handling for Spinneret
//!
//! This module provides hostname extraction and shell-style glob matching.
//! Both are building blocks for the domain filter chain and the same-site
//! restriction.

mod domain;
mod matcher;

// Re-export main functions
pub use domain::extract_hostname;
pub use matcher::matches_glob;
