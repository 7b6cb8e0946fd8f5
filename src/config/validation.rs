//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, window non-empty)
//! - Check the hysteresis band and dwell bounds are ordered
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FailoverConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::FailoverConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyAddress { field: &'static str },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("up threshold ({up_ms} ms) must be below down threshold ({down_ms} ms)")]
    ThresholdOrder { up_ms: u64, down_ms: u64 },

    #[error("minimum dwell ({min_secs} s) exceeds maximum dwell ({max_secs} s)")]
    DwellOrder { min_secs: u64, max_secs: u64 },
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &FailoverConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let addresses = [
        ("listener.bind_address", Some(config.listener.bind_address.as_str())),
        ("backends.major", Some(config.backends.major.as_str())),
        ("backends.minor", Some(config.backends.minor.as_str())),
        ("health_check.major_target", config.health_check.major_target.as_deref()),
        ("health_check.minor_target", config.health_check.minor_target.as_deref()),
    ];
    for (field, value) in addresses {
        if value.is_some_and(|v| v.trim().is_empty()) {
            errors.push(ValidationError::EmptyAddress { field });
        }
    }

    if config.listener.max_connections == 0 {
        errors.push(ValidationError::Zero { field: "listener.max_connections" });
    }
    if config.health_check.ping_interval_ms == 0 {
        errors.push(ValidationError::Zero { field: "health_check.ping_interval_ms" });
    }
    if config.health_check.window_size == 0 {
        errors.push(ValidationError::Zero { field: "health_check.window_size" });
    }

    let thresholds = config.thresholds;
    if thresholds.up_ms >= thresholds.down_ms {
        errors.push(ValidationError::ThresholdOrder {
            up_ms: thresholds.up_ms,
            down_ms: thresholds.down_ms,
        });
    }

    let dwell = config.dwell;
    if dwell.min_secs > dwell.max_secs {
        errors.push(ValidationError::DwellOrder {
            min_secs: dwell.min_secs,
            max_secs: dwell.max_secs,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&FailoverConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = FailoverConfig::default();
        config.backends.minor = " ".into();
        config.health_check.window_size = 0;
        config.thresholds.up_ms = 120;
        config.dwell.min_secs = 700;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::EmptyAddress { field: "backends.minor" }));
        assert!(errors.contains(&ValidationError::Zero { field: "health_check.window_size" }));
        assert!(errors.contains(&ValidationError::ThresholdOrder { up_ms: 120, down_ms: 120 }));
        assert!(errors.contains(&ValidationError::DwellOrder { min_secs: 700, max_secs: 600 }));
    }

    #[test]
    fn empty_optional_target_rejected() {
        let mut config = FailoverConfig::default();
        config.health_check.minor_target = Some(String::new());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::EmptyAddress { field: "health_check.minor_target" }]
        );
    }
}
