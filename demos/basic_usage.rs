//! Basic event logger usage example
//!
//! Demonstrates console output, listeners, markers, delivery modes and the
//! panic hook.
//!
//! Run with: cargo run --example basic_usage

use rust_event_logger::prelude::*;
use rust_event_logger::{args, error, info, warn};
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust Event Logger - Basic Usage Example ===\n");

    let context = LoggingContext::builder()
        .global_level(Level::Info)
        .appender(ConsoleAppender::new())
        .forced_marker("AUDIT")
        .build()?;

    let logger = context.logger("demo");

    println!("1. Logging at different levels:");
    logger.trace("This is a trace message (hidden)", args!());
    logger.debug("This is a debug message (hidden)", args!());
    info!(logger, "Server started on port {}", 8080);
    warn!(logger, "Disk usage at @yellow{}%@reset", 91);
    error!(logger, "Request {} failed with status {}", "GET /", 503);

    println!("\n2. Listeners see every event, even filtered ones:");
    let warnings = ListenerBuilder::new("warning-counter")
        .on(EventKind::Warn, |event| {
            println!("   listener got warning: {}", event.formatted());
        })
        .on(EventKind::Debug, |event| {
            println!("   listener got debug: {}", event.formatted());
        })
        .build()?;
    context.add_listener(warnings)?;
    logger.debug("cache miss for key {}", args!("user:42"));
    warn!(logger, "retrying in {}ms", 250);

    println!("\n3. Forced markers bypass the threshold:");
    let audit = context.marker("AUDIT");
    logger.set_level(Level::Error);
    logger.log_marked(Level::Debug, &audit, "user {} changed role", args!("alice"));
    logger.use_global_level();

    println!("\n4. Exceptions are promoted automatically:");
    let failure = Throwable::new("connection refused").with_cause("timed out after 3 attempts");
    logger.warn("could not reach upstream: {}", vec![Argument::from(failure)]);

    println!("\n5. Batched delivery:");
    for i in 0..3 {
        logger.log_async(Level::Info, "background job {} done", args!(i));
    }
    context.flush(Duration::from_secs(2));

    println!("\n6. Uncaught panics are logged:");
    PanicHook::install(context.logger("panic"));
    let worker = thread::Builder::new()
        .name("demo-worker".to_string())
        .spawn(|| panic!("worker gave up"))
        .map_err(|source| LoggerError::WorkerSpawn {
            name: "demo-worker".to_string(),
            source,
        })?;
    let _ = worker.join();
    let _ = std::panic::take_hook();

    println!("\n7. Metrics:");
    println!("   events fired: {}", context.metrics().events_fired());
    println!("   console lines: {}", context.metrics().console_lines());

    context.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
