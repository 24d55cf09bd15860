//! Performance benchmarks for region-ping
//!
//! Probes answer instantly so the numbers reflect the coordination and
//! encoding overhead of a ping cycle rather than network time.

use async_trait::async_trait;
use clap::Parser;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use region_ping::{
    cli::Cli,
    config::ConfigParser,
    error::Result,
    regions::StaticRegions,
    ExecutionConfig, FanOutCoordinator, Measurement, RoundTripProbe, StreamingResponder, Target,
};
use futures::StreamExt;
use std::{hint::black_box, sync::Arc, time::Duration};

struct InstantProbe;

#[async_trait]
impl RoundTripProbe for InstantProbe {
    async fn round_trip(&self, _target: &str) -> Result<Duration> {
        Ok(Duration::from_millis(1))
    }
}

fn single_attempt() -> ExecutionConfig {
    ExecutionConfig {
        attempts: 1,
        attempt_pause: Duration::ZERO,
        attempt_timeout: Duration::from_secs(1),
    }
}

fn targets(count: usize) -> Vec<Target> {
    (0..count)
        .map(|i| Target::new(format!("Region {}", i), format!("region-{}", i)))
        .collect()
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
}

/// Benchmark launching and draining a fan-out
fn bench_fanout(c: &mut Criterion) {
    let rt = runtime();
    let coordinator = FanOutCoordinator::new(Arc::new(InstantProbe), single_attempt());

    let mut group = c.benchmark_group("fanout");
    for count in [1, 10, 29, 100] {
        group.bench_with_input(BenchmarkId::new("launch_and_drain", count), &count, |b, &count| {
            b.iter(|| {
                rt.block_on(async {
                    let mut stream = coordinator.launch(targets(count));
                    let mut received = 0;
                    while stream.recv().await.is_some() {
                        received += 1;
                    }
                    black_box(received)
                })
            });
        });
    }
    group.finish();
}

/// Benchmark a full responder cycle including event encoding
fn bench_ping_cycle(c: &mut Criterion) {
    let rt = runtime();
    let responder = StreamingResponder::new(
        Arc::new(StaticRegions::aws()),
        Arc::new(InstantProbe),
        Arc::new(InstantProbe),
        single_attempt(),
    );

    c.bench_function("ping_cycle_aws_regions", |b| {
        b.iter(|| {
            rt.block_on(async {
                let events = responder.start(Some("192.0.2.1"), tracing::Span::none()).await;
                let bytes: usize = events
                    .map(|frame| frame.map(|f| f.len()).unwrap_or(0))
                    .fold(0, |acc, len| async move { acc + len })
                    .await;
                black_box(bytes)
            })
        });
    });
}

/// Benchmark encoding single records
fn bench_event_encoding(c: &mut Criterion) {
    let success = Measurement::success(Target::new("US East (N. Virginia)", "us-east-1"), Duration::from_millis(42));
    let failure = Measurement::failed(
        Target::new("Europe (Ireland)", "eu-west-1"),
        "error sending request: connection refused",
    );
    let client_ping = Duration::from_millis(7);

    let mut group = c.benchmark_group("event_encoding");
    group.bench_function("success", |b| {
        b.iter(|| black_box(success.to_record(client_ping).to_event()))
    });
    group.bench_function("failure", |b| {
        b.iter(|| black_box(failure.to_record(client_ping).to_event()))
    });
    group.finish();
}

/// Benchmark configuration parsing
fn bench_config_parsing(c: &mut Criterion) {
    let args = [
        "region-ping",
        "--attempts", "5",
        "--regions", "us-east-1=US East;eu-west-1=EU West;ap-south-1=Mumbai",
    ];

    c.bench_function("config_parsing", |b| {
        b.iter(|| {
            let cli = Cli::try_parse_from(args).unwrap();
            black_box(ConfigParser::new(cli).parse_with(|_| None))
        })
    });
}

criterion_group!(
    benches,
    bench_fanout,
    bench_ping_cycle,
    bench_event_encoding,
    bench_config_parsing
);
criterion_main!(benches);
