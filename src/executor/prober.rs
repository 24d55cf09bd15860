//! Best-of-N prober for a single target

use super::ExecutionConfig;
use crate::{
    error::AppError,
    models::Measurement,
    probe::RoundTripProbe,
    types::Target,
};
use std::{sync::Arc, time::Duration};
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

/// Runs sequential attempts against one target and keeps the fastest
///
/// Attempts never overlap: attempt N+1 starts only once attempt N has
/// returned or hit its own timeout.
#[derive(Clone)]
pub struct RegionProber {
    probe: Arc<dyn RoundTripProbe>,
    config: ExecutionConfig,
}

impl RegionProber {
    pub fn new(probe: Arc<dyn RoundTripProbe>, config: ExecutionConfig) -> Self {
        Self { probe, config }
    }

    /// Measure one target
    ///
    /// Yields the minimum successful duration, or the error of the last
    /// attempt when every attempt failed.
    pub async fn measure(&self, target: Target) -> Measurement {
        debug!(region = %target.code, attempts = self.config.attempts, "starting region probe");

        let mut best: Option<Duration> = None;
        let mut last_error: Option<AppError> = None;

        for attempt in 1..=self.config.attempts {
            match timeout(self.config.attempt_timeout, self.probe.round_trip(&target.code)).await {
                Ok(Ok(rtt)) => {
                    best = Some(best.map_or(rtt, |current| current.min(rtt)));
                }
                Ok(Err(e)) => {
                    debug!(region = %target.code, attempt, category = e.category(), error = %e, "probe attempt failed");
                    last_error = Some(e);
                }
                Err(_) => {
                    debug!(region = %target.code, attempt, "probe attempt timed out");
                    last_error = Some(AppError::timeout(format!(
                        "attempt {} timed out after {}ms",
                        attempt,
                        self.config.attempt_timeout.as_millis()
                    )));
                }
            }

            if attempt < self.config.attempts && !self.config.attempt_pause.is_zero() {
                sleep(self.config.attempt_pause).await;
            }
        }

        match best {
            Some(latency) => {
                info!(region = %target.code, latency_ms = latency.as_millis() as u64, "region probed");
                Measurement::success(target, latency)
            }
            None => {
                let (category, error) = last_error
                    .map(|e| (e.category(), e.to_string()))
                    .unwrap_or_else(|| ("INTERNAL", "no probe attempts were made".to_string()));
                warn!(region = %target.code, category, error = %error, "all probe attempts failed");
                Measurement::failed(target, error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };
    use std::time::Instant;

    /// Replays a fixed sequence of attempt outcomes
    struct ScriptedProbe {
        script: Mutex<VecDeque<Result<Duration>>>,
        calls: AtomicUsize,
    }

    impl ScriptedProbe {
        fn new(script: Vec<Result<Duration>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl RoundTripProbe for ScriptedProbe {
        async fn round_trip(&self, _target: &str) -> Result<Duration> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AppError::internal("script exhausted")))
        }
    }

    /// Sleeps for a while and records how many calls overlap
    struct SlowProbe {
        delay: Duration,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    #[async_trait]
    impl RoundTripProbe for SlowProbe {
        async fn round_trip(&self, _target: &str) -> Result<Duration> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(self.delay)
        }
    }

    fn fast_config() -> ExecutionConfig {
        ExecutionConfig {
            attempts: 3,
            attempt_pause: Duration::ZERO,
            attempt_timeout: Duration::from_secs(1),
        }
    }

    fn target() -> Target {
        Target::new("US East", "us-east-1")
    }

    #[tokio::test]
    async fn test_minimum_of_successful_attempts() {
        let probe = ScriptedProbe::new(vec![
            Err(AppError::network("connection reset")),
            Ok(Duration::from_millis(30)),
            Ok(Duration::from_millis(40)),
        ]);
        let prober = RegionProber::new(probe.clone(), fast_config());

        let measurement = prober.measure(target()).await;

        assert_eq!(measurement.latency, Some(Duration::from_millis(30)));
        assert!(measurement.error.is_none());
        assert_eq!(probe.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_all_failures_report_last_error() {
        let probe = ScriptedProbe::new(vec![
            Err(AppError::network("err1")),
            Err(AppError::network("err2")),
            Err(AppError::network("err3")),
        ]);
        let prober = RegionProber::new(probe, fast_config());

        let measurement = prober.measure(target()).await;

        assert_eq!(measurement.latency, None);
        assert_eq!(measurement.error, Some(AppError::network("err3").to_string()));
        assert_eq!(measurement.latency_ms(), 0.0);
    }

    #[tokio::test]
    async fn test_zero_duration_success_is_kept() {
        let probe = ScriptedProbe::new(vec![
            Ok(Duration::ZERO),
            Err(AppError::network("late failure")),
            Ok(Duration::from_millis(5)),
        ]);
        let prober = RegionProber::new(probe, fast_config());

        let measurement = prober.measure(target()).await;

        assert_eq!(measurement.latency, Some(Duration::ZERO));
        assert!(measurement.error.is_none());
    }

    #[tokio::test]
    async fn test_hung_attempt_times_out_and_others_still_run() {
        let probe = Arc::new(SlowProbe {
            delay: Duration::from_secs(5),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        });
        let config = ExecutionConfig {
            attempts: 2,
            attempt_pause: Duration::ZERO,
            attempt_timeout: Duration::from_millis(50),
        };
        let prober = RegionProber::new(probe, config);

        let start = Instant::now();
        let measurement = prober.measure(target()).await;

        assert!(start.elapsed() < Duration::from_secs(2));
        assert_eq!(measurement.latency, None);
        assert!(measurement.error.unwrap().starts_with("Timeout error: attempt 2"));
    }

    #[tokio::test]
    async fn test_attempts_are_sequential() {
        let probe = Arc::new(SlowProbe {
            delay: Duration::from_millis(20),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        });
        let prober = RegionProber::new(probe.clone(), fast_config());

        prober.measure(target()).await;

        assert_eq!(probe.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_pause_between_attempts_only() {
        let probe = ScriptedProbe::new(vec![
            Ok(Duration::from_millis(1)),
            Ok(Duration::from_millis(1)),
            Ok(Duration::from_millis(1)),
        ]);
        let config = ExecutionConfig {
            attempt_pause: Duration::from_millis(40),
            ..fast_config()
        };
        let prober = RegionProber::new(probe, config);

        let start = Instant::now();
        prober.measure(target()).await;
        let elapsed = start.elapsed();

        // Two pauses for three attempts
        assert!(elapsed >= Duration::from_millis(80));
        assert!(elapsed < Duration::from_millis(600));
    }
}
