//! Configuration data model and validation

use crate::types::{AppError, Result, Target};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Placeholder replaced by the region code in the endpoint template
pub const REGION_CODE_PLACEHOLDER: &str = "{code}";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// TCP port the HTTP server listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Sequential probe attempts per region
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    /// Pause between consecutive attempts, in milliseconds
    #[serde(default = "default_attempt_pause_ms")]
    pub attempt_pause_ms: u64,

    /// Timeout of a single region probe attempt
    #[serde(default = "default_region_timeout_secs")]
    pub region_timeout_seconds: u64,

    /// Timeout of the client reference ping
    #[serde(default = "default_client_ping_timeout_secs")]
    pub client_ping_timeout_seconds: u64,

    /// Region endpoint URL template containing `{code}`
    #[serde(default = "default_region_endpoint")]
    pub region_endpoint: String,

    /// Region list override; empty means the built-in list
    #[serde(default)]
    pub regions: Vec<Target>,

    /// Enable verbose logging
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug logging
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            attempts: default_attempts(),
            attempt_pause_ms: default_attempt_pause_ms(),
            region_timeout_seconds: default_region_timeout_secs(),
            client_ping_timeout_seconds: default_client_ping_timeout_secs(),
            region_endpoint: default_region_endpoint(),
            regions: Vec::new(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempt_pause(&self) -> Duration {
        Duration::from_millis(self.attempt_pause_ms)
    }

    pub fn region_timeout(&self) -> Duration {
        Duration::from_secs(self.region_timeout_seconds)
    }

    pub fn client_ping_timeout(&self) -> Duration {
        Duration::from_secs(self.client_ping_timeout_seconds)
    }

    /// Socket address the server binds to
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.bind_address.parse().map_err(|e| {
            AppError::config(format!("Invalid bind address '{}': {}", self.bind_address, e))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(AppError::config("Port must be greater than 0"));
        }

        self.listen_addr()?;

        if self.attempts == 0 {
            return Err(AppError::config("Probe attempts must be greater than 0"));
        }

        if self.attempts > 10 {
            return Err(AppError::config("Probe attempts cannot exceed 10"));
        }

        if self.attempt_pause_ms > 10_000 {
            return Err(AppError::config("Attempt pause cannot exceed 10000ms"));
        }

        if self.region_timeout_seconds == 0 || self.region_timeout_seconds > 300 {
            return Err(AppError::config("Region timeout must be between 1 and 300 seconds"));
        }

        if self.client_ping_timeout_seconds == 0 || self.client_ping_timeout_seconds > 30 {
            return Err(AppError::config("Client ping timeout must be between 1 and 30 seconds"));
        }

        validate_endpoint_template(&self.region_endpoint)?;

        for target in &self.regions {
            if target.code.trim().is_empty() || target.name.trim().is_empty() {
                return Err(AppError::config(format!("Region entry '{}' needs both a code and a name", target)));
            }
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        self.merge_from_vars(|key| std::env::var(key).ok())
    }

    /// Merge settings from a variable lookup, used by `merge_from_env`
    pub fn merge_from_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.port = port.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid PORT value '{}': {}", port, e)))?;
        }

        if let Some(bind) = lookup("BIND_ADDRESS") {
            self.bind_address = bind.trim().to_string();
        }

        if let Some(attempts) = lookup("PROBE_ATTEMPTS") {
            self.attempts = attempts.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid PROBE_ATTEMPTS value '{}': {}", attempts, e)))?;
        }

        if let Some(pause) = lookup("ATTEMPT_PAUSE_MS") {
            self.attempt_pause_ms = pause.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ATTEMPT_PAUSE_MS value '{}': {}", pause, e)))?;
        }

        if let Some(timeout) = lookup("REGION_TIMEOUT_SECONDS") {
            self.region_timeout_seconds = timeout.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid REGION_TIMEOUT_SECONDS value '{}': {}", timeout, e)))?;
        }

        if let Some(timeout) = lookup("CLIENT_PING_TIMEOUT_SECONDS") {
            self.client_ping_timeout_seconds = timeout.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid CLIENT_PING_TIMEOUT_SECONDS value '{}': {}", timeout, e)))?;
        }

        if let Some(endpoint) = lookup("REGION_ENDPOINT") {
            self.region_endpoint = endpoint.trim().to_string();
        }

        if let Some(regions) = lookup("REGIONS") {
            self.regions = parse_regions(&regions)?;
        }

        Ok(())
    }
}

/// Parse a region list of the form `code=Name;code=Name`
pub fn parse_regions(value: &str) -> Result<Vec<Target>> {
    value
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (code, name) = entry.split_once('=').ok_or_else(|| {
                AppError::config(format!("Invalid region entry '{}', expected code=Name", entry))
            })?;
            let (code, name) = (code.trim(), name.trim());
            if code.is_empty() || name.is_empty() {
                return Err(AppError::config(format!("Invalid region entry '{}', expected code=Name", entry)));
            }
            Ok(Target::new(name, code))
        })
        .collect()
}

/// Check that an endpoint template is a URL once the code is substituted
pub fn validate_endpoint_template(template: &str) -> Result<()> {
    if !template.contains(REGION_CODE_PLACEHOLDER) {
        return Err(AppError::config(format!(
            "Region endpoint '{}' must contain the {} placeholder",
            template, REGION_CODE_PLACEHOLDER
        )));
    }

    let sample = template.replace(REGION_CODE_PLACEHOLDER, "us-east-1");
    let parsed = url::Url::parse(&sample)
        .map_err(|e| AppError::config(format!("Invalid region endpoint '{}': {}", template, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(AppError::config(format!("Unsupported region endpoint scheme: {}", scheme))),
    }
}

// Default value functions for serde
fn default_port() -> u16 {
    crate::defaults::DEFAULT_PORT
}

fn default_bind_address() -> String {
    crate::defaults::DEFAULT_BIND_ADDRESS.to_string()
}

fn default_attempts() -> u32 {
    crate::defaults::DEFAULT_ATTEMPTS
}

fn default_attempt_pause_ms() -> u64 {
    crate::defaults::DEFAULT_ATTEMPT_PAUSE.as_millis() as u64
}

fn default_region_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_REGION_TIMEOUT.as_secs()
}

fn default_client_ping_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_CLIENT_PING_TIMEOUT.as_secs()
}

fn default_region_endpoint() -> String {
    crate::defaults::DEFAULT_REGION_ENDPOINT.to_string()
}
