//! Region Ping
//!
//! An HTTP service that measures round-trip latency from the server to a
//! list of cloud regions and streams one result per region to the browser
//! as Server-Sent Events, in the order the measurements complete.

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod models;
pub mod probe;
pub mod regions;
pub mod server;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use executor::{ExecutionConfig, FanOutCoordinator, MeasurementStream};
pub use models::{Config, Measurement, PingRecord};
pub use probe::{HttpRegionProbe, IcmpClientProbe, RoundTripProbe};
pub use regions::{StaticRegions, TargetProvider};
pub use server::StreamingResponder;
pub use types::Target;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_PORT: u16 = 8080;
    pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
    pub const DEFAULT_ATTEMPTS: u32 = 3;
    pub const DEFAULT_ATTEMPT_PAUSE: Duration = Duration::from_millis(100);
    pub const DEFAULT_REGION_TIMEOUT: Duration = Duration::from_secs(10);
    pub const DEFAULT_CLIENT_PING_TIMEOUT: Duration = Duration::from_secs(2);
    pub const DEFAULT_REGION_ENDPOINT: &str = "https://s3.{code}.amazonaws.com/";
}
