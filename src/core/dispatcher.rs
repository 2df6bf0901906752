//! Event dispatch: listener delivery and console output
//!
//! The dispatcher is shared by every logger of one context. It owns the
//! listener registry, the batch scheduler, the appenders, the global level
//! and the global forced-marker set.

use super::appender::{Appender, ConsoleRecord};
use super::argument::{Argument, Throwable};
use super::error::{panic_message, LoggerError, Result};
use super::event::LogEvent;
use super::level::Level;
use super::marker::{ForcedMarkers, Marker};
use super::metrics::LoggerMetrics;
use super::registry::ListenerRegistry;
use super::scheduler::{BatchScheduler, SchedulerConfig};
use parking_lot::{ReentrantMutex, RwLock};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

/// Logger name used for failures raised by the pipeline itself
pub const INTERNAL_LOGGER: &str = "rust_event_logger";

thread_local! {
    static WRITING_CONSOLE: Cell<bool> = const { Cell::new(false) };
}

/// `true` while the current thread holds the appender lock
pub(crate) fn is_writing_console() -> bool {
    WRITING_CONSOLE.with(Cell::get)
}

/// How a fired event reaches its listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeliveryMode {
    /// On the calling thread before the log call returns
    #[default]
    Inline,
    /// On the calling thread, serialized per logger
    Synchronous,
    /// Queued for the background batch scheduler
    Batched,
}

pub struct Dispatcher {
    registry: ListenerRegistry,
    scheduler: BatchScheduler,
    appenders: RwLock<Vec<Box<dyn Appender>>>,
    global_level: RwLock<Level>,
    forced_markers: ForcedMarkers,
    metrics: Arc<LoggerMetrics>,
}

impl Dispatcher {
    pub fn new(config: SchedulerConfig) -> Result<Self> {
        let metrics = Arc::new(LoggerMetrics::new());
        let scheduler = BatchScheduler::new(config, Arc::clone(&metrics))?;

        Ok(Self {
            registry: ListenerRegistry::new(),
            scheduler,
            appenders: RwLock::new(Vec::new()),
            global_level: RwLock::new(Level::default()),
            forced_markers: ForcedMarkers::new(),
            metrics,
        })
    }

    pub fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    pub fn scheduler(&self) -> &BatchScheduler {
        &self.scheduler
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn add_appender(&self, appender: Box<dyn Appender>) {
        self.appenders.write().push(appender);
    }

    pub fn appender_count(&self) -> usize {
        self.appenders.read().len()
    }

    pub fn global_level(&self) -> Level {
        *self.global_level.read()
    }

    pub fn set_global_level(&self, level: Level) {
        *self.global_level.write() = level;
    }

    pub fn add_forced_marker(&self, marker: &Marker) -> bool {
        self.forced_markers.insert(marker)
    }

    pub fn remove_forced_marker(&self, marker: &Marker) -> bool {
        self.forced_markers.remove(marker)
    }

    /// `true` if any of `markers` is forced globally
    pub fn is_forced(&self, markers: &[Marker]) -> bool {
        self.forced_markers.any(markers)
    }

    /// Route a freshly fired event according to `mode`
    ///
    /// `printable` is the level/marker decision taken at fire time.
    /// `sync_lock` is the owning logger's lock for synchronous delivery.
    pub(crate) fn deliver(
        self: &Arc<Self>,
        event: Arc<LogEvent>,
        printable: bool,
        mode: DeliveryMode,
        sync_lock: &ReentrantMutex<()>,
    ) {
        match mode {
            DeliveryMode::Inline => self.dispatch_now(&event, printable),
            DeliveryMode::Synchronous => {
                let _guard = sync_lock.lock();
                self.dispatch_now(&event, printable);
            }
            DeliveryMode::Batched => {
                let dispatcher = Arc::clone(self);
                let queued = Arc::clone(&event);
                let submitted = self.scheduler.submit(event.logger_key(), move || {
                    dispatcher.dispatch_now(&queued, printable)
                });
                if let Err(e) = submitted {
                    eprintln!(
                        "[LOGGER WARNING] {}; delivering event {} inline",
                        e,
                        event.id()
                    );
                    self.dispatch_now(&event, printable);
                }
            }
        }
    }

    /// Invoke matching listeners, write the console line if `printable`,
    /// then report listener failures
    pub(crate) fn dispatch_now(&self, event: &LogEvent, printable: bool) {
        self.metrics.record_fired();

        let mut failures = Vec::new();
        for handler in self.registry.handlers_for(event) {
            match handler.invoke(event) {
                Ok(()) => {
                    self.metrics.record_listener_invocation();
                }
                Err(e) => {
                    self.metrics.record_listener_failure();
                    failures.push(e);
                }
            }
        }

        if printable {
            self.write_console(&ConsoleRecord::from_event(event));
        } else {
            self.metrics.record_filtered();
        }

        for failure in &failures {
            self.report_failure(event, failure);
        }
    }

    /// Re-emit a listener failure as an internal exception event
    fn report_failure(&self, event: &LogEvent, error: &LoggerError) {
        if event.is_internal() {
            eprintln!(
                "[LOGGER ERROR] Listener failed while handling internal event {}: {}",
                event.id(),
                error
            );
            return;
        }

        let report = LogEvent::internal(
            INTERNAL_LOGGER,
            "Listener failure on event {} from logger '{}': {}",
            vec![
                Argument::from(event.id()),
                Argument::from(event.logger_name()),
                Argument::from(Throwable::with_frames(error.to_string(), Vec::new())),
            ],
        );
        report.mark_fired();

        let printable = report.level().is_loggable(self.global_level());
        self.dispatch_now(&report, printable);
    }

    fn write_console(&self, record: &ConsoleRecord) {
        let mut appenders = self.appenders.write();
        WRITING_CONSOLE.with(|w| w.set(true));

        // Per-appender panic isolation
        for appender in appenders.iter_mut() {
            let result = catch_unwind(AssertUnwindSafe(|| appender.append(record)));
            match result {
                Ok(Ok(())) => {
                    self.metrics.record_console_line();
                }
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Appender '{}' failed: {}", appender.name(), e);
                    self.metrics.record_appender_failure();
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Appender '{}' panicked: {}. \
                         Other appenders continue to function.",
                        appender.name(),
                        panic_message(panic_info.as_ref())
                    );
                    self.metrics.record_appender_failure();
                }
            }
        }
        WRITING_CONSOLE.with(|w| w.set(false));
    }

    /// Flush every appender
    pub fn flush_appenders(&self) -> Result<()> {
        let mut first_error = None;
        for appender in self.appenders.write().iter_mut() {
            if let Err(e) = appender.flush() {
                eprintln!("[LOGGER ERROR] Appender '{}' flush failed: {}", appender.name(), e);
                self.metrics.record_appender_failure();
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Wait for batched deliveries, then flush the appenders
    pub fn flush(&self, timeout: Duration) -> bool {
        let drained = self.scheduler.flush(timeout);
        self.flush_appenders().is_ok() && drained
    }

    /// Drain and stop the scheduler, then flush the appenders
    pub fn shutdown(&self, timeout: Duration) -> bool {
        let stopped = self.scheduler.shutdown(timeout);
        if let Err(e) = self.flush_appenders() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
            return false;
        }
        stopped
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("listeners", &self.registry.len())
            .field("appenders", &self.appender_count())
            .field("global_level", &self.global_level())
            .field("scheduler", &self.scheduler)
            .finish()
    }
}
