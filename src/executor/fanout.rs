//! Fan-out of region probers and fan-in of their measurements
//!
//! Every target gets its own task. Measurements are pushed onto one bounded
//! channel sized to the number of targets, so a prober never waits on the
//! consumer to make room. A [`CompletionBarrier`] counts prober completions
//! and closes the channel once the last one has reported.

use super::{ExecutionConfig, RegionProber};
use crate::{
    models::Measurement,
    probe::RoundTripProbe,
    types::Target,
};
use futures::Stream;
use std::{
    pin::Pin,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, PoisonError,
    },
    task::{Context, Poll},
};
use tokio::{sync::mpsc, task::JoinSet};
use tracing::{debug, trace};

/// Join barrier that closes the completion channel exactly once
///
/// Holds the only long-lived sender. Each participant delivers through a
/// short-lived clone and then arrives; the final arrival drops the held
/// sender, which ends the receiving stream. Deliveries after closure are
/// rejected.
pub struct CompletionBarrier {
    remaining: AtomicUsize,
    sender: Mutex<Option<mpsc::Sender<Measurement>>>,
}

impl CompletionBarrier {
    pub fn new(participants: usize, sender: mpsc::Sender<Measurement>) -> Self {
        let barrier = Self {
            remaining: AtomicUsize::new(participants),
            sender: Mutex::new(Some(sender)),
        };
        if participants == 0 {
            barrier.close();
        }
        barrier
    }

    /// Deliver a measurement and arrive at the barrier
    ///
    /// Returns `false` when the measurement could not be delivered because
    /// the consumer is gone or the barrier already closed.
    pub async fn complete(&self, measurement: Measurement) -> bool {
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner).clone();

        let delivered = match sender {
            Some(sender) => sender.send(measurement).await.is_ok(),
            None => false,
        };

        self.arrive();
        delivered
    }

    /// Participants that have not arrived yet
    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.lock().unwrap_or_else(PoisonError::into_inner).is_none()
    }

    fn arrive(&self) {
        let previous = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));

        if previous == Ok(1) {
            self.close();
        }
    }

    fn close(&self) {
        if self.sender.lock().unwrap_or_else(PoisonError::into_inner).take().is_some() {
            debug!("all probers finished, closing completion channel");
        }
    }
}

/// Launches one [`RegionProber`] per target
#[derive(Clone)]
pub struct FanOutCoordinator {
    prober: RegionProber,
}

impl FanOutCoordinator {
    pub fn new(probe: Arc<dyn RoundTripProbe>, config: ExecutionConfig) -> Self {
        Self {
            prober: RegionProber::new(probe, config),
        }
    }

    /// Start probing every target concurrently
    ///
    /// Must be called from within a tokio runtime. Measurements arrive on the
    /// returned stream in completion order, not in target order.
    pub fn launch(&self, targets: Vec<Target>) -> MeasurementStream {
        let expected = targets.len();
        let (sender, receiver) = mpsc::channel(expected.max(1));
        let barrier = Arc::new(CompletionBarrier::new(expected, sender));

        let mut tasks = JoinSet::new();
        for target in targets {
            let prober = self.prober.clone();
            let barrier = Arc::clone(&barrier);

            tasks.spawn(async move {
                let code = target.code.clone();
                let measurement = prober.measure(target).await;
                if !barrier.complete(measurement).await {
                    debug!(region = %code, "consumer gone, measurement dropped");
                }
            });
        }

        debug!(probers = expected, "fan-out launched");

        MeasurementStream {
            receiver,
            barrier,
            tasks,
            expected,
        }
    }
}

/// Receiving end of a fan-out
///
/// Dropping the stream aborts every prober that is still running.
pub struct MeasurementStream {
    receiver: mpsc::Receiver<Measurement>,
    barrier: Arc<CompletionBarrier>,
    tasks: JoinSet<()>,
    expected: usize,
}

impl MeasurementStream {
    /// Next completed measurement, `None` once every prober has reported
    pub async fn recv(&mut self) -> Option<Measurement> {
        self.receiver.recv().await
    }

    /// Number of targets launched
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Probers that have not delivered yet
    pub fn in_flight(&self) -> usize {
        self.barrier.remaining()
    }
}

impl Stream for MeasurementStream {
    type Item = Measurement;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl Drop for MeasurementStream {
    fn drop(&mut self) {
        let in_flight = self.barrier.remaining();
        if in_flight > 0 {
            debug!(in_flight, "measurement stream dropped early, aborting probers");
        } else {
            trace!(tasks = self.tasks.len(), "measurement stream finished");
        }
    }
}
