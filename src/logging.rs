//! Structured logging setup
//!
//! Log output goes through `tracing`. `RUST_LOG` takes precedence over the
//! level derived from the `--verbose`/`--debug` flags, and
//! `RUST_LOG_FORMAT=json` switches to JSON lines for log aggregators.

use crate::error::{AppError, Result};
use crate::models::Config;
use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Compact single-line human-readable format
    #[default]
    Compact,
    /// JSON format for structured logging
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "compact" | "console" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(AppError::parse(format!("Invalid log format: {}", other))),
        }
    }
}

/// Default level when `RUST_LOG` is not set
pub fn default_level(config: &Config) -> LevelFilter {
    if config.debug {
        LevelFilter::TRACE
    } else if config.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    }
}

/// Install the global subscriber
pub fn init(config: &Config, format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level(config).into())
        .from_env_lossy();

    let log_layer = match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_filter(env_filter)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(log_layer)
        .try_init()
        .map_err(|e| AppError::internal(format!("Failed to initialise logging: {}", e)))
}
