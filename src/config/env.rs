//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use crate::models::config::{parse_regions, validate_endpoint_template};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load `.env` from the current directory if it exists
    ///
    /// Returns whether a file was loaded. Variables already set in the
    /// process environment are not overridden.
    pub fn load_env_file() -> Result<bool> {
        Self::load_env_file_from(Path::new(".env"))
    }

    /// Load a specific env file if it exists
    pub fn load_env_file_from(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }

        dotenv::from_path(path)
            .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;
        Ok(true)
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# Region Ping Configuration
#
# Values here are defaults; command-line arguments override them.

# Listening port
# PORT=8080

# Bind address
# BIND_ADDRESS=0.0.0.0

# Sequential attempts per region (1-10), best one wins
# PROBE_ATTEMPTS=3

# Pause between attempts in milliseconds
# ATTEMPT_PAUSE_MS=100

# Timeout of one region attempt in seconds (1-300)
# REGION_TIMEOUT_SECONDS=10

# Timeout of the client reference ping in seconds (1-30)
# CLIENT_PING_TIMEOUT_SECONDS=2

# Region endpoint template, {code} is replaced by the region code
# REGION_ENDPOINT=https://s3.{code}.amazonaws.com/

# Replace the built-in region list (code=Name separated by ;)
# REGIONS="us-east-1=US East (N. Virginia);eu-west-1=Europe (Ireland)"

# Log output: compact or json
# RUST_LOG_FORMAT=compact
"#.to_string()
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        std::fs::write(path, Self::create_example_env_content())
            .map_err(|e| AppError::config(format!("Failed to write example .env file: {}", e)))
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "PORT" => {
                let port: u16 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid PORT value '{}': {}", value, e)))?;
                if port == 0 {
                    return Err(AppError::config("PORT must be between 1 and 65535"));
                }
            }
            "BIND_ADDRESS" => {
                value.parse::<std::net::IpAddr>()
                    .map_err(|e| AppError::config(format!("Invalid BIND_ADDRESS value '{}': {}", value, e)))?;
            }
            "PROBE_ATTEMPTS" => {
                let attempts: u32 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid PROBE_ATTEMPTS value '{}': {}", value, e)))?;
                if attempts == 0 || attempts > 10 {
                    return Err(AppError::config(format!("PROBE_ATTEMPTS must be between 1 and 10, got: {}", attempts)));
                }
            }
            "ATTEMPT_PAUSE_MS" => {
                let pause: u64 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid ATTEMPT_PAUSE_MS value '{}': {}", value, e)))?;
                if pause > 10_000 {
                    return Err(AppError::config(format!("ATTEMPT_PAUSE_MS cannot exceed 10000, got: {}", pause)));
                }
            }
            "REGION_TIMEOUT_SECONDS" => {
                let timeout: u64 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid REGION_TIMEOUT_SECONDS value '{}': {}", value, e)))?;
                if timeout == 0 || timeout > 300 {
                    return Err(AppError::config(format!("REGION_TIMEOUT_SECONDS must be between 1 and 300, got: {}", timeout)));
                }
            }
            "CLIENT_PING_TIMEOUT_SECONDS" => {
                let timeout: u64 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid CLIENT_PING_TIMEOUT_SECONDS value '{}': {}", value, e)))?;
                if timeout == 0 || timeout > 30 {
                    return Err(AppError::config(format!("CLIENT_PING_TIMEOUT_SECONDS must be between 1 and 30, got: {}", timeout)));
                }
            }
            "REGION_ENDPOINT" => validate_endpoint_template(value)?,
            "REGIONS" => {
                parse_regions(value)?;
            }
            "RUST_LOG_FORMAT" => {
                value.parse::<crate::logging::LogFormat>()?;
            }
            _ => {
                // Unknown environment variable, ignore
            }
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("PORT", "Listening port", "8080"),
            ("BIND_ADDRESS", "Bind address", "0.0.0.0"),
            ("PROBE_ATTEMPTS", "Sequential attempts per region (1-10)", "3"),
            ("ATTEMPT_PAUSE_MS", "Pause between attempts in milliseconds", "100"),
            ("REGION_TIMEOUT_SECONDS", "Timeout of one region attempt (1-300)", "10"),
            ("CLIENT_PING_TIMEOUT_SECONDS", "Timeout of the client ping (1-30)", "2"),
            ("REGION_ENDPOINT", "Endpoint template with {code} placeholder", "https://s3.{code}.amazonaws.com/"),
            ("REGIONS", "Region list override, code=Name separated by ;", "us-east-1=US East;eu-west-1=EU West"),
            ("RUST_LOG_FORMAT", "Log output format (compact, json)", "json"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<28} {}\n", var, description));
            help.push_str(&format!("  {:<28} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Vec<String> {
        Self::get_supported_env_vars()
            .into_iter()
            .filter_map(|(var_name, _, _)| {
                let value = std::env::var(var_name).ok()?;
                Self::validate_env_var(var_name, &value)
                    .err()
                    .map(|e| format!("Warning: {}", e))
            })
            .collect()
    }
}
