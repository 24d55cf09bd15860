//! Streaming responder: one client ping, one fan-out, one SSE event per region

use crate::{
    error::{AppError, Result},
    executor::{ExecutionConfig, FanOutCoordinator, MeasurementStream},
    models::PingRecord,
    probe::{client_reference_ping, RoundTripProbe},
    regions::TargetProvider,
    types::Target,
};
use actix_web::{http::Version, web::Bytes};
use futures::{ready, Stream};
use std::{
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Duration,
};
use tokio::time::timeout;
use tracing::{debug, info, warn, Span};

/// Turns one record into a complete event frame
pub type EventEncoder = fn(&PingRecord) -> serde_json::Result<String>;

/// Runs a full ping cycle for one request
///
/// All collaborators are injected at construction: the target list, the
/// probe used against regions and the probe used against the client.
pub struct StreamingResponder {
    targets: Arc<dyn TargetProvider>,
    client_probe: Arc<dyn RoundTripProbe>,
    client_ping_timeout: Duration,
    coordinator: FanOutCoordinator,
}

impl StreamingResponder {
    pub fn new(
        targets: Arc<dyn TargetProvider>,
        region_probe: Arc<dyn RoundTripProbe>,
        client_probe: Arc<dyn RoundTripProbe>,
        config: ExecutionConfig,
    ) -> Self {
        Self {
            targets,
            client_probe,
            client_ping_timeout: crate::defaults::DEFAULT_CLIENT_PING_TIMEOUT,
            coordinator: FanOutCoordinator::new(region_probe, config),
        }
    }

    /// Upper bound on the client reference ping, whatever the client probe does
    pub fn with_client_ping_timeout(mut self, client_ping_timeout: Duration) -> Self {
        self.client_ping_timeout = client_ping_timeout;
        self
    }

    pub fn client_ping_timeout(&self) -> Duration {
        self.client_ping_timeout
    }

    /// Fail unless the connection can carry an incrementally flushed body
    pub fn ensure_streaming_supported(version: Version) -> Result<()> {
        if version < Version::HTTP_11 {
            return Err(AppError::streaming_unsupported(format!(
                "{:?} connections cannot receive incremental results",
                version
            )));
        }
        Ok(())
    }

    /// Current target list
    pub fn targets(&self) -> Vec<Target> {
        self.targets.targets()
    }

    /// Take the client reference ping, then launch every region prober
    ///
    /// The returned stream yields one encoded event per region in
    /// completion order and ends once every region has reported.
    pub async fn start(&self, client_address: Option<&str>, span: Span) -> PingEventStream {
        let ping = client_reference_ping(self.client_probe.as_ref(), client_address);
        let client_ping = match timeout(self.client_ping_timeout, ping).await {
            Ok(rtt) => rtt,
            Err(_) => {
                warn!(
                    timeout_ms = self.client_ping_timeout.as_millis() as u64,
                    "client ping timed out, defaulting to 0"
                );
                Duration::ZERO
            }
        };
        info!(client_ping_ms = client_ping.as_millis() as u64, "client ping measured");

        let targets = self.targets.targets();
        info!(regions = targets.len(), "starting region probes");

        PingEventStream::new(self.coordinator.launch(targets), client_ping, span)
    }
}

/// Encodes measurements as Server-Sent Events frames
///
/// Each poll yields at most one frame, so the HTTP layer writes and flushes
/// every event on its own. Records that fail to encode are skipped.
pub struct PingEventStream {
    measurements: MeasurementStream,
    client_ping: Duration,
    encode: EventEncoder,
    sent: usize,
    finished: bool,
    span: Span,
}

impl PingEventStream {
    pub fn new(measurements: MeasurementStream, client_ping: Duration, span: Span) -> Self {
        Self {
            measurements,
            client_ping,
            encode: PingRecord::to_event,
            sent: 0,
            finished: false,
            span,
        }
    }

    /// Replace the frame encoder
    pub fn with_encoder(mut self, encode: EventEncoder) -> Self {
        self.encode = encode;
        self
    }

    /// The client reference ping attached to every event
    pub fn client_ping(&self) -> Duration {
        self.client_ping
    }

    /// Events handed to the HTTP layer so far
    pub fn sent(&self) -> usize {
        self.sent
    }
}

impl Stream for PingEventStream {
    type Item = Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let _entered = this.span.enter();

        loop {
            let Some(measurement) = ready!(Pin::new(&mut this.measurements).poll_next(cx)) else {
                this.finished = true;
                info!(sent = this.sent, "finished streaming all results");
                return Poll::Ready(None);
            };

            match (this.encode)(&measurement.to_record(this.client_ping)) {
                Ok(event) => {
                    this.sent += 1;
                    debug!(region = %measurement.target.code, "sent result");
                    return Poll::Ready(Some(Ok(Bytes::from(event))));
                }
                Err(e) => {
                    let error = AppError::from(e);
                    warn!(region = %measurement.target.code, error = %error, "dropping measurement that failed to encode");
                }
            }
        }
    }
}

impl Drop for PingEventStream {
    fn drop(&mut self) {
        if !self.finished {
            let _entered = self.span.enter();
            info!(
                sent = self.sent,
                pending = self.measurements.in_flight(),
                "client disconnected before all results were sent"
            );
        }
    }
}
