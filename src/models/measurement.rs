//! Per-region measurement and the record streamed to clients

use crate::types::Target;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Best-of-N result for one target
///
/// Exactly one is produced per target per request. `latency` is the minimum
/// of the successful attempts; when none succeeded it is `None` and `error`
/// carries the failure of the last attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub target: Target,
    pub latency: Option<Duration>,
    pub error: Option<String>,
}

impl Measurement {
    /// Create a measurement for a target with at least one successful attempt
    pub fn success(target: Target, latency: Duration) -> Self {
        Self {
            target,
            latency: Some(latency),
            error: None,
        }
    }

    /// Create a measurement for a target whose attempts all failed
    pub fn failed(target: Target, error: impl Into<String>) -> Self {
        Self {
            target,
            latency: None,
            error: Some(error.into()),
        }
    }

    /// Check if this measurement has a usable latency
    pub fn is_successful(&self) -> bool {
        self.latency.is_some()
    }

    /// Latency in milliseconds, `0.0` when unset
    pub fn latency_ms(&self) -> f64 {
        self.latency.map(whole_millis).unwrap_or(0.0)
    }

    /// Build the wire record, attaching the request's client reference ping
    pub fn to_record(&self, client_ping: Duration) -> PingRecord {
        PingRecord {
            region: self.target.name.clone(),
            code: self.target.code.clone(),
            latency: self.latency_ms(),
            client_ping: whole_millis(client_ping),
            error: self.error.clone(),
        }
    }
}

/// One streamed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingRecord {
    pub region: String,
    pub code: String,
    /// Milliseconds, `0` if the region could not be reached
    pub latency: f64,
    /// Milliseconds, `0` if the client could not be pinged
    pub client_ping: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PingRecord {
    /// Encode as one Server-Sent Events frame
    pub fn to_event(&self) -> serde_json::Result<String> {
        let data = serde_json::to_string(self)?;
        Ok(format!("data: {}\n\n", data))
    }
}

/// Truncate to whole milliseconds
fn whole_millis(duration: Duration) -> f64 {
    duration.as_millis() as f64
}
