//! Criterion benchmarks for rust_event_logger

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rust_event_logger::args;
use rust_event_logger::core::formatter;
use rust_event_logger::prelude::*;
use std::time::Duration;

// ============================================================================
// Formatting Benchmarks
// ============================================================================

fn bench_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting");
    group.throughput(Throughput::Elements(1));

    let plain_args = args!["alice", 42, 3.5];
    group.bench_function("placeholders", |b| {
        b.iter(|| {
            black_box(formatter::format(
                black_box("user {} logged in {} times, ratio {}"),
                &plain_args,
            ))
        });
    });

    let tag_args = args!["alice"];
    group.bench_function("color_tags", |b| {
        b.iter(|| {
            black_box(formatter::format(
                black_box("@bold user @green{}@reset connected"),
                &tag_args,
            ))
        });
    });

    let throwable_args = vec![Argument::from(Throwable::with_frames(
        "connection reset",
        vec!["net::client::read".to_string(), "net::client::poll".to_string()],
    ))];
    group.bench_function("throwable", |b| {
        b.iter(|| black_box(formatter::format(black_box("request failed: {}"), &throwable_args)));
    });

    group.finish();
}

// ============================================================================
// Logging Performance Benchmarks
// ============================================================================

fn bench_inline_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("inline_logging");
    group.throughput(Throughput::Elements(1));

    let context = LoggingContext::builder()
        .global_level(Level::Trace)
        .build()
        .unwrap();
    let logger = context.logger("bench");

    group.bench_function("no_listeners", |b| {
        b.iter(|| black_box(logger.info(black_box("Info message {}"), args!(1))));
    });

    let listener = ListenerBuilder::new("sink")
        .on(EventKind::Any, |event| {
            black_box(event.formatted());
        })
        .build()
        .unwrap();
    context.add_listener(listener).unwrap();

    group.bench_function("one_listener", |b| {
        b.iter(|| black_box(logger.info(black_box("Info message {}"), args!(1))));
    });

    let memory = MemoryAppender::new();
    context.add_appender(memory.clone());
    group.bench_function("listener_and_memory_appender", |b| {
        b.iter(|| {
            black_box(logger.info(black_box("Info message {}"), args!(1)));
            if memory.len() > 10_000 {
                memory.clear();
            }
        });
    });

    group.finish();
}

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let context = LoggingContext::builder()
        .global_level(Level::Error)
        .build()
        .unwrap();
    let logger = context.logger("bench");

    group.bench_function("is_enabled", |b| {
        b.iter(|| black_box(logger.is_enabled(black_box(Level::Debug))));
    });

    // Still fires an event; only console output is suppressed
    group.bench_function("filtered_call", |b| {
        b.iter(|| black_box(logger.debug(black_box("Filtered {}"), args!(1))));
    });

    group.finish();
}

fn bench_batched_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("batched_logging");
    group.throughput(Throughput::Elements(1));

    let context = LoggingContext::new().unwrap();
    let logger = context.logger("bench");

    group.bench_function("submit", |b| {
        b.iter(|| black_box(logger.log_async(Level::Info, black_box("Async {}"), args!(1))));
    });

    group.bench_function("sync_mode", |b| {
        b.iter(|| black_box(logger.log_sync(Level::Info, black_box("Sync {}"), args!(1))));
    });

    group.finish();
    context.shutdown(Duration::from_secs(10));
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_formatting,
    bench_inline_logging,
    bench_level_filtering,
    bench_batched_logging
);

criterion_main!(benches);
