use crate::config::types::{Config, ConfigFile};
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads a configuration overlay from a TOML file
///
/// The overlay carries only the fields the file explicitly sets; callers
/// merge it over the defaults (and under the command-line flags) with
/// [`Config::merge_file`].
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(ConfigFile)` - Successfully parsed overlay
/// * `Err(ConfigError)` - Failed to read or parse the file
pub fn load_overlay(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let overlay: ConfigFile = toml::from_str(&content)?;
    Ok(overlay)
}

/// Loads a complete configuration from a TOML file
///
/// Merges the file over the built-in defaults and validates the result.
/// This is the entry point for embedding callers that do not layer
/// command-line flags on top.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use spinneret::config::load_config;
///
/// let config = load_config(Path::new("spinneret.toml")).unwrap();
/// println!("Max depth: {}", config.depth);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let overlay = load_overlay(path)?;

    let mut config = Config::default();
    config.merge_file(overlay);

    validate(&config)?;

    Ok(config)
}
