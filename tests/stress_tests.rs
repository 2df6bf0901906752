//! Stress tests for concurrent logging
//!
//! These tests verify:
//! - Every event reaches listeners under concurrent inline logging
//! - Batched delivery keeps per-logger order under load
//! - Registration and logging can interleave across threads
//! - Shutdown drains queued batched events

use parking_lot::Mutex;
use rust_event_logger::args;
use rust_event_logger::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const THREADS: usize = 8;
const PER_THREAD: usize = 500;

#[test]
fn test_concurrent_inline_logging_delivers_everything() {
    let memory = MemoryAppender::new();
    let context = LoggingContext::builder()
        .appender(memory.clone())
        .build()
        .unwrap();
    let count = Arc::new(AtomicUsize::new(0));
    let count_clone = Arc::clone(&count);
    let listener = ListenerBuilder::new("counter")
        .on(EventKind::Any, move |_| {
            count_clone.fetch_add(1, Ordering::Relaxed);
        })
        .build()
        .unwrap();
    context.add_listener(listener).unwrap();

    thread::scope(|scope| {
        for t in 0..THREADS {
            let logger = context.logger(&format!("worker-{}", t));
            scope.spawn(move || {
                for i in 0..PER_THREAD {
                    logger.info("message {}", args!(i));
                }
            });
        }
    });

    assert_eq!(count.load(Ordering::Relaxed), THREADS * PER_THREAD);
    assert_eq!(memory.len(), THREADS * PER_THREAD);
    assert_eq!(context.metrics().events_fired() as usize, THREADS * PER_THREAD);
}

#[test]
fn test_batched_order_per_logger_under_load() {
    let context = LoggingContext::builder()
        .scheduler(SchedulerConfig {
            workers: 4,
            ..SchedulerConfig::default()
        })
        .build()
        .unwrap();

    let seen: Arc<Mutex<HashMap<String, Vec<usize>>>> = Arc::new(Mutex::new(HashMap::new()));
    let seen_clone = Arc::clone(&seen);
    let listener = ListenerBuilder::new("recorder")
        .on(EventKind::Any, move |event| {
            let index = match event.arguments().first() {
                Some(arg) => arg.render().parse::<usize>().unwrap_or(usize::MAX),
                None => usize::MAX,
            };
            seen_clone
                .lock()
                .entry(event.logger_name().to_string())
                .or_default()
                .push(index);
        })
        .build()
        .unwrap();
    context.add_listener(listener).unwrap();

    thread::scope(|scope| {
        for t in 0..THREADS {
            let logger = context.logger(&format!("async-{}", t));
            scope.spawn(move || {
                for i in 0..PER_THREAD {
                    logger.log_async(Level::Info, "{}", args!(i));
                }
            });
        }
    });

    assert!(context.flush(Duration::from_secs(30)));

    let seen = seen.lock();
    assert_eq!(seen.len(), THREADS);
    for (name, indices) in seen.iter() {
        assert_eq!(
            indices,
            &(0..PER_THREAD).collect::<Vec<_>>(),
            "out-of-order delivery for {}",
            name
        );
    }
    assert!(context.metrics().batches_drained() >= 1);
}

#[test]
fn test_registration_interleaves_with_logging() {
    let context = Arc::new(LoggingContext::new().unwrap());
    let logger = context.logger("app");

    thread::scope(|scope| {
        let logging = logger.clone();
        scope.spawn(move || {
            for i in 0..PER_THREAD {
                logging.debug("tick {}", args!(i));
            }
        });

        let registering = logger.clone();
        scope.spawn(move || {
            for i in 0..50 {
                let listener = ListenerBuilder::new(format!("l{}", i))
                    .on(EventKind::Debug, |_| {})
                    .build()
                    .unwrap();
                registering.add_listener(Arc::clone(&listener) as Arc<dyn Listener>).unwrap();
                if i % 2 == 0 {
                    assert!(registering.remove_listener(&listener));
                }
            }
        });
    });

    assert_eq!(logger.listener_count(), 25);
    assert_eq!(context.metrics().listener_failures(), 0);
}

#[test]
fn test_shutdown_drains_queued_events() {
    let context = LoggingContext::new().unwrap();
    let delivered = Arc::new(AtomicUsize::new(0));
    let delivered_clone = Arc::clone(&delivered);
    let listener = ListenerBuilder::new("slow")
        .on(EventKind::Any, move |_| {
            thread::sleep(Duration::from_micros(200));
            delivered_clone.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap();
    context.add_listener(listener).unwrap();

    let logger = context.logger("app");
    for i in 0..200 {
        logger.log_async(Level::Info, "queued {}", args!(i));
    }

    assert!(context.shutdown(Duration::from_secs(30)));
    assert_eq!(delivered.load(Ordering::SeqCst), 200);
}
