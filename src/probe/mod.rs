//! Round-trip probe primitives
//!
//! Two probes share one contract: attempt a single round trip to a named
//! target and report the elapsed time or the failure.
//! - [`HttpRegionProbe`]: HEAD request to a per-region endpoint
//! - [`IcmpClientProbe`]: ICMP echo to the requesting client's address

pub mod client;
pub mod region;

pub use client::{client_reference_ping, IcmpClientProbe};
pub use region::HttpRegionProbe;

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// A single timed round trip
#[async_trait]
pub trait RoundTripProbe: Send + Sync {
    /// Perform one round trip to `target` and return the elapsed time
    ///
    /// `target` is a region code for region probes and an IP address for
    /// client probes.
    async fn round_trip(&self, target: &str) -> Result<Duration>;
}
