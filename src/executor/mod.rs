//! Probe execution engine
//!
//! This module contains the concurrent probing components:
//! - Region prober running sequential best-of-N attempts for one target
//! - Fan-out coordinator running one prober per target concurrently
//! - Completion barrier closing the shared result channel exactly once

pub mod fanout;
pub mod prober;

pub use fanout::{CompletionBarrier, FanOutCoordinator, MeasurementStream};
pub use prober::RegionProber;

use crate::models::Config;
use std::time::Duration;

/// Per-target attempt policy
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionConfig {
    /// Number of sequential attempts per target
    pub attempts: u32,
    /// Pause between consecutive attempts
    pub attempt_pause: Duration,
    /// Timeout applied to each attempt on its own
    pub attempt_timeout: Duration,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            attempts: crate::defaults::DEFAULT_ATTEMPTS,
            attempt_pause: crate::defaults::DEFAULT_ATTEMPT_PAUSE,
            attempt_timeout: crate::defaults::DEFAULT_REGION_TIMEOUT,
        }
    }
}

impl From<&Config> for ExecutionConfig {
    fn from(config: &Config) -> Self {
        Self {
            attempts: config.attempts,
            attempt_pause: config.attempt_pause(),
            attempt_timeout: config.region_timeout(),
        }
    }
}
