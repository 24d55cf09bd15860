//! Configuration validation utilities and rules

use crate::{
    models::Config,
    error::Result,
};
use std::time::Duration;

/// Configuration validator that reports settings which are legal but questionable
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration and collect warnings
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Vec::new();
        warnings.extend(Self::validate_endpoint(&config.region_endpoint));
        warnings.extend(Self::validate_attempt_policy(config));
        warnings.extend(Self::validate_listen_address(config));
        Ok(warnings)
    }

    fn validate_endpoint(template: &str) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if template.starts_with("http://") {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Region endpoint '{}' uses HTTP instead of HTTPS", template),
            ));
        }

        if template != crate::defaults::DEFAULT_REGION_ENDPOINT {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Using custom region endpoint '{}'", template),
            ));
        }

        warnings
    }

    fn validate_attempt_policy(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.attempts == 1 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                "Only one attempt per region; a single slow handshake will skew results".to_string(),
            ));
        }

        if config.attempt_pause_ms == 0 && config.attempts > 1 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                "No pause between attempts; back-to-back requests may congest the path".to_string(),
            ));
        }

        // Worst case for one region: every attempt times out
        let worst_case = config.region_timeout() * config.attempts
            + config.attempt_pause() * config.attempts.saturating_sub(1);
        if worst_case > Duration::from_secs(60) {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "A region that never answers keeps the stream open for up to {}s",
                    worst_case.as_secs()
                ),
            ));
        }

        warnings
    }

    fn validate_listen_address(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.port < 1024 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Port {} is privileged on most systems", config.port),
            ));
        }

        if let Ok(addr) = config.listen_addr() {
            if addr.ip().is_loopback() {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    "Bound to loopback; remote clients cannot connect".to_string(),
                ));
            }
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

/// Validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self) -> String {
        format!("[{}] {}", self.level.as_str(), self.message)
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_warnings() {
        let warnings = validate_config(&Config::default()).unwrap();
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let config = Config {
            attempts: 0,
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_http_endpoint_warning() {
        let config = Config {
            region_endpoint: "http://{code}.probe.internal/".to_string(),
            ..Default::default()
        };
        let warnings = validate_config(&config).unwrap();
        assert!(warnings
            .iter()
            .any(|w| w.level == ValidationLevel::Warning && w.message.contains("HTTP instead of HTTPS")));
    }

    #[test]
    fn test_single_attempt_warning() {
        let config = Config {
            attempts: 1,
            ..Default::default()
        };
        let warnings = validate_config(&config).unwrap();
        assert!(warnings.iter().any(|w| w.message.contains("Only one attempt")));
    }

    #[test]
    fn test_long_worst_case_warning() {
        let config = Config {
            attempts: 5,
            region_timeout_seconds: 30,
            ..Default::default()
        };
        let warnings = validate_config(&config).unwrap();
        assert!(warnings.iter().any(|w| w.message.contains("keeps the stream open")));
    }

    #[test]
    fn test_loopback_warning() {
        let config = Config {
            bind_address: "127.0.0.1".to_string(),
            ..Default::default()
        };
        let warnings = validate_config(&config).unwrap();
        assert!(warnings.iter().any(|w| w.format().starts_with("[INFO] Bound to loopback")));
    }
}
