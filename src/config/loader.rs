//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::FailoverConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a configuration from TOML text without validating it.
///
/// Callers that layer command-line overrides on top validate afterwards.
pub fn parse_config(content: &str) -> Result<FailoverConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Read a configuration file without validating it.
pub fn read_config(path: &Path) -> Result<FailoverConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<FailoverConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = parse_config(
            r#"
            [backends]
            major = "10.0.0.1:443"
            minor = "10.0.0.2:443"

            [thresholds]
            down_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.backends.major, "10.0.0.1:443");
        assert_eq!(config.thresholds.down_ms, 250);
        assert_eq!(config.thresholds.up_ms, 100);
        assert_eq!(config.health_check.window_size, 5);
        assert!(config.health_check.major_target.is_none());
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = parse_config("[health_check]\nping_interval_ms = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_rejects_invalid_file() {
        let path = std::env::temp_dir().join(format!("rtt-failover-{}.toml", std::process::id()));
        fs::write(&path, "[thresholds]\nup_ms = 300\ndown_ms = 200\n").unwrap();

        let err = load_config(&path).unwrap_err();
        let _ = fs::remove_file(&path);

        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 1),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/rtt-failover.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
