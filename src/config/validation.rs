use crate::config::types::Config;
use crate::ConfigError;
use std::path::Path;

/// Upper bound on the worker count.
const MAX_WORKERS: usize = 256;

/// Validates resolved settings before a run starts
///
/// # Arguments
///
/// * `config` - The configuration to validate
///
/// # Returns
///
/// * `Ok(())` - Configuration is valid
/// * `Err(ConfigError)` - A setting is out of range or a pattern is malformed
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_workers(config.workers)?;
    validate_patterns(&config.allowed_domains)?;
    validate_patterns(&config.disallowed_domains)?;
    if let Some(output) = &config.output {
        validate_output(output)?;
    }
    Ok(())
}

/// Checks the output directory is usable before the crawl starts
///
/// The directory itself is created on demand at export time, so the
/// path only has to be creatable: it (or the nearest existing ancestor)
/// must be a directory. Catching this up front avoids running a whole
/// crawl whose results cannot be written.
fn validate_output(output: &Path) -> Result<(), ConfigError> {
    if output.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    for ancestor in output.ancestors() {
        if ancestor.exists() {
            if ancestor.is_dir() {
                return Ok(());
            }
            return Err(ConfigError::Validation(format!(
                "output path '{}' is not usable: '{}' is not a directory",
                output.display(),
                ancestor.display()
            )));
        }
    }

    Ok(())
}

fn validate_workers(workers: usize) -> Result<(), ConfigError> {
    if workers < 1 {
        return Err(ConfigError::Validation(
            "workers must be at least 1".to_string(),
        ));
    }
    if workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be at most {}, got {}",
            MAX_WORKERS, workers
        )));
    }
    Ok(())
}

fn validate_patterns(patterns: &[String]) -> Result<(), ConfigError> {
    for pattern in patterns {
        validate_domain_pattern(pattern)?;
    }
    Ok(())
}

/// Validates a single hostname glob pattern
///
/// Patterns may contain alphanumerics, dots, hyphens, and the wildcards
/// `*` and `?`. Anything else (including whitespace) is rejected before
/// the crawl starts rather than silently matching nothing.
fn validate_domain_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "pattern cannot be empty".to_string(),
        ));
    }

    for c in pattern.chars() {
        let valid = c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '*' | '?');
        if !valid {
            return Err(ConfigError::InvalidPattern(format!(
                "pattern '{}' contains invalid character '{}'",
                pattern, c
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_patterns(allowed: &[&str], disallowed: &[&str]) -> Config {
        Config {
            allowed_domains: allowed.iter().map(|s| s.to_string()).collect(),
            disallowed_domains: disallowed.iter().map(|s| s.to_string()).collect(),
            ..Config::default()
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = Config {
            workers: 0,
            ..Config::default()
        };
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_excessive_workers_rejected() {
        let config = Config {
            workers: MAX_WORKERS + 1,
            ..Config::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_valid_patterns_accepted() {
        let config = config_with_patterns(
            &["example.com", "*.example.com", "api-?.example.com"],
            &["evil.example.com", "*"],
        );
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let config = config_with_patterns(&[""], &[]);
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern(_)));
    }

    #[test]
    fn test_pattern_with_whitespace_rejected() {
        let config = config_with_patterns(&[], &["bad domain.com"]);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_pattern_with_scheme_rejected() {
        // Patterns match hostnames, not URLs
        let config = config_with_patterns(&["https://example.com"], &[]);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_existing_output_directory_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            output: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_creatable_output_directory_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            output: Some(dir.path().join("nested").join("out")),
            ..Config::default()
        };
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_output_under_regular_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("occupied");
        std::fs::write(&file, "not a directory").unwrap();

        let config = Config {
            output: Some(file.join("out")),
            ..Config::default()
        };
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
