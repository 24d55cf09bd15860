//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    error::{AppError, Result},
    models::{config::parse_regions, Config},
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration from the process environment
    pub fn parse(&self) -> Result<Config> {
        self.parse_with(|key| std::env::var(key).ok())
    }

    /// Parse with an explicit variable lookup instead of the process environment
    pub fn parse_with<F>(&self, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.cli.validate().map_err(AppError::validation)?;

        let mut config = Config::default();
        config.merge_from_vars(lookup)?;
        self.apply_cli_overrides(&mut config)?;
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) -> Result<()> {
        if let Some(port) = self.cli.port {
            config.port = port;
        }

        if let Some(ref bind) = self.cli.bind_address {
            config.bind_address = bind.clone();
        }

        if let Some(attempts) = self.cli.attempts {
            config.attempts = attempts;
        }

        if let Some(pause) = self.cli.pause_ms {
            config.attempt_pause_ms = pause;
        }

        if let Some(timeout) = self.cli.timeout {
            config.region_timeout_seconds = timeout;
        }

        if let Some(timeout) = self.cli.client_timeout {
            config.client_ping_timeout_seconds = timeout;
        }

        if let Some(ref endpoint) = self.cli.region_endpoint {
            config.region_endpoint = endpoint.clone();
        }

        if let Some(ref regions) = self.cli.regions {
            config.regions = parse_regions(regions)?;
        }

        // CLI-only flags
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        Ok(())
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Configuration summary for startup logs
pub fn display_config_summary(config: &Config) -> String {
    let regions = if config.regions.is_empty() {
        "built-in AWS list".to_string()
    } else {
        format!("{} configured", config.regions.len())
    };

    [
        format!("Listen: {}:{}", config.bind_address, config.port),
        format!("Attempts: {} (pause {}ms)", config.attempts, config.attempt_pause_ms),
        format!("Region timeout: {}s", config.region_timeout_seconds),
        format!("Client ping timeout: {}s", config.client_ping_timeout_seconds),
        format!("Region endpoint: {}", config.region_endpoint),
        format!("Regions: {}", regions),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Target;
    use clap::Parser;
    use std::collections::HashMap;

    fn parse(args: &[&str], vars: &[(&str, &str)]) -> Result<Config> {
        let mut argv = vec!["region-ping"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConfigParser::new(cli).parse_with(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[], &[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.attempts, 3);
        assert!(config.regions.is_empty());
    }

    #[test]
    fn test_env_overrides_defaults() {
        let config = parse(&[], &[("PORT", "3000"), ("PROBE_ATTEMPTS", "4")]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.attempts, 4);
    }

    #[test]
    fn test_cli_overrides_env() {
        let config = parse(&["--port", "4000"], &[("PORT", "3000")]).unwrap();
        assert_eq!(config.port, 4000);
    }

    #[test]
    fn test_cli_regions() {
        let config = parse(&["--regions", "eu-west-1=EU West"], &[("REGIONS", "us-east-1=US East")]).unwrap();
        assert_eq!(config.regions, vec![Target::new("EU West", "eu-west-1")]);
    }

    #[test]
    fn test_invalid_final_config_rejected() {
        assert!(parse(&["--attempts", "0"], &[]).is_err());
        assert!(parse(&[], &[("REGION_TIMEOUT_SECONDS", "0")]).is_err());
    }

    #[test]
    fn test_cli_validation_error_is_validation() {
        let result = parse(&["--port", "0"], &[]);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_summary_mentions_listen_address() {
        let summary = display_config_summary(&Config::default());
        assert!(summary.contains("Listen: 0.0.0.0:8080"));
        assert!(summary.contains("built-in AWS list"));
    }
}
