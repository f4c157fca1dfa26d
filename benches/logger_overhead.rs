//! Benchmarks for measuring the per-call cost of the logger.
//!
//! Records are written to `io::sink` so only formatting and dispatch are
//! measured, not terminal throughput.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use logging_conf::{
    BoxMakeWriter, Config, Environment, Field, Format, Log, Logger, Severity, StdoutBackend,
};
use std::hint::black_box;

fn sink_logger(environment: Environment, threshold: Severity) -> Logger {
    let identity = Config::default()
        .with_name("bench")
        .with_environment(environment)
        .app
        .identity();
    StdoutBackend::new(&identity, threshold, Format::for_environment(environment))
        .with_writer(BoxMakeWriter::new(std::io::sink))
        .build()
}

/// Benchmark: a record below the threshold (should be nearly free)
fn bench_filtered(c: &mut Criterion) {
    let logger = sink_logger(Environment::Production, Severity::Warn);
    c.bench_function("filtered_debug", |b| {
        b.iter(|| logger.debug(black_box("not written"), &[]))
    });
}

/// Benchmark: console vs JSON encoding
fn bench_encodings(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoding");
    for environment in [Environment::Development, Environment::Production] {
        let logger = sink_logger(environment, Severity::Info);
        group.bench_with_input(
            BenchmarkId::from_parameter(environment),
            &logger,
            |b, logger| b.iter(|| logger.info(black_box("request served"), &[])),
        );
    }
    group.finish();
}

/// Benchmark: context fields from `with` plus per-call fields
fn bench_fields(c: &mut Criterion) {
    let logger = sink_logger(Environment::Production, Severity::Info)
        .with([Field::new("request_id", "r-1"), Field::new("tenant", "acme")]);
    c.bench_function("json_with_fields", |b| {
        b.iter(|| {
            logger.info(
                black_box("request served"),
                &[Field::new("status", 200u16), Field::new("bytes", 512u64)],
            )
        })
    });
}

/// Benchmark: error records pay for the stack trace capture
fn bench_error(c: &mut Criterion) {
    let logger = sink_logger(Environment::Production, Severity::Info);
    c.bench_function("json_error_with_stacktrace", |b| {
        b.iter(|| logger.error(black_box("upstream failed"), &[]))
    });
}

criterion_group!(
    benches,
    bench_filtered,
    bench_encodings,
    bench_fields,
    bench_error
);
criterion_main!(benches);
