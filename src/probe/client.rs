//! ICMP echo probe for the client reference ping

use super::RoundTripProbe;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::{net::IpAddr, time::Duration};
use surge_ping::{Client, Config as PingConfig, PingIdentifier, PingSequence, ICMP};
use tracing::{debug, warn};

const ECHO_PAYLOAD: &[u8] = b"PING";

/// Sends one ICMP echo request to a client address
///
/// Uses unprivileged datagram ICMP sockets where the platform allows it.
pub struct IcmpClientProbe {
    timeout: Duration,
    identifier: u16,
}

impl IcmpClientProbe {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            identifier: (std::process::id() & 0xffff) as u16,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for IcmpClientProbe {
    fn default() -> Self {
        Self::new(crate::defaults::DEFAULT_CLIENT_PING_TIMEOUT)
    }
}

#[async_trait]
impl RoundTripProbe for IcmpClientProbe {
    async fn round_trip(&self, address: &str) -> Result<Duration> {
        let ip = parse_client_ip(address)?;

        let kind = if ip.is_ipv4() { ICMP::V4 } else { ICMP::V6 };
        let client = Client::new(&PingConfig::builder().kind(kind).build())
            .map_err(|e| AppError::network(format!("Error creating ICMP socket: {}", e)))?;

        let mut pinger = client.pinger(ip, PingIdentifier(self.identifier)).await;
        pinger.timeout(self.timeout);

        let (_reply, rtt) = pinger.ping(PingSequence(1), ECHO_PAYLOAD).await?;
        Ok(rtt)
    }
}

/// Parse an address as reported by a proxy header or a socket peer
fn parse_client_ip(address: &str) -> Result<IpAddr> {
    let trimmed = address.trim().trim_start_matches('[').trim_end_matches(']');
    if trimmed.is_empty() {
        return Err(AppError::validation("Client address is empty"));
    }
    trimmed
        .parse()
        .map_err(|e| AppError::parse(format!("Invalid client address '{}': {}", address, e)))
}

/// Best-effort latency to the client
///
/// Failures never surface: an absent or unparseable address, a socket error
/// or a timeout all yield `Duration::ZERO`.
pub async fn client_reference_ping(probe: &dyn RoundTripProbe, address: Option<&str>) -> Duration {
    let Some(address) = address.filter(|a| !a.trim().is_empty()) else {
        warn!("No client address available, client ping defaults to 0");
        return Duration::ZERO;
    };

    match probe.round_trip(address).await {
        Ok(rtt) => {
            debug!(client = address, rtt_ms = rtt.as_millis() as u64, "client ping completed");
            rtt
        }
        Err(e) => {
            warn!(client = address, category = e.category(), error = %e, "client ping failed, defaulting to 0");
            Duration::ZERO
        }
    }
}
