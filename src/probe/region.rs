//! HTTP HEAD probe against per-region endpoints

use super::RoundTripProbe;
use crate::{
    error::{AppError, Result},
    models::{config::{validate_endpoint_template, REGION_CODE_PLACEHOLDER}, Config},
};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, Url};
use std::time::{Duration, Instant};
use tracing::trace;
use uuid::Uuid;

/// Query parameter carrying the per-call cache-busting token
const CACHE_BUST_PARAM: &str = "ping";

/// Times a HEAD request to the endpoint of one region
///
/// Any HTTP response counts as a completed round trip, whatever its status.
/// Only transport failures (connect, DNS, timeout) are reported as errors.
pub struct HttpRegionProbe {
    client: Client,
    endpoint_template: String,
    timeout: Duration,
}

impl HttpRegionProbe {
    /// Create a probe for an endpoint template containing `{code}`
    pub fn new(endpoint_template: impl Into<String>, timeout: Duration) -> Result<Self> {
        let endpoint_template = endpoint_template.into();
        validate_endpoint_template(&endpoint_template)?;

        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .user_agent(concat!("region-ping/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint_template,
            timeout,
        })
    }

    /// Create a probe from the service configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.region_endpoint.clone(), config.region_timeout())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build the endpoint URL for a region code with a fresh cache-busting token
    pub fn endpoint_for(&self, code: &str) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint_template.replace(REGION_CODE_PLACEHOLDER, code))
            .map_err(|e| AppError::parse(format!("Invalid endpoint for region '{}': {}", code, e)))?;

        url.query_pairs_mut()
            .append_pair(CACHE_BUST_PARAM, &Uuid::new_v4().simple().to_string());

        Ok(url)
    }
}

#[async_trait]
impl RoundTripProbe for HttpRegionProbe {
    async fn round_trip(&self, code: &str) -> Result<Duration> {
        let url = self.endpoint_for(code)?;

        let start = Instant::now();
        let response = self.client.head(url).send().await?;
        let elapsed = start.elapsed();

        trace!(
            region = code,
            status = response.status().as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "region round trip completed"
        );

        Ok(elapsed)
    }
}
