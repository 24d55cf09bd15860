//! Command-line interface

use crate::logging::LogFormat;
use clap::Parser;

/// Region Ping - streams round-trip latency from this server to cloud regions
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "region-ping")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Listening port (overrides PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Bind address (overrides BIND_ADDRESS)
    #[arg(long = "bind", value_name = "ADDRESS")]
    pub bind_address: Option<String>,

    /// Sequential probe attempts per region
    #[arg(short, long)]
    pub attempts: Option<u32>,

    /// Pause between attempts in milliseconds
    #[arg(long, value_name = "MS")]
    pub pause_ms: Option<u64>,

    /// Timeout of one region attempt in seconds
    #[arg(short, long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Timeout of the client reference ping in seconds
    #[arg(long, value_name = "SECONDS")]
    pub client_timeout: Option<u64>,

    /// Region endpoint template containing {code}
    #[arg(long, value_name = "URL")]
    pub region_endpoint: Option<String>,

    /// Region list override: code=Name entries separated by ';'
    #[arg(long, value_name = "LIST")]
    pub regions: Option<String>,

    /// Log output format
    #[arg(long, value_enum, env = "RUST_LOG_FORMAT", default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Print the configured regions and exit
    #[arg(long)]
    pub list_regions: bool,

    /// Print supported environment variables and exit
    #[arg(long)]
    pub env_help: bool,

    /// Write an example .env file to the current directory and exit
    #[arg(long)]
    pub create_env: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.port == Some(0) {
            return Err("--port must be between 1 and 65535".to_string());
        }

        if let Some(ref endpoint) = self.region_endpoint {
            if !endpoint.contains(crate::models::config::REGION_CODE_PLACEHOLDER) {
                return Err(format!("--region-endpoint '{}' must contain {{code}}", endpoint));
            }
        }

        Ok(())
    }
}
