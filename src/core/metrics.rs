//! Logger metrics for observability
//!
//! Counters for events fired, listener deliveries and failures, console
//! output and batch draining.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for pipeline observability
///
/// # Example
///
/// ```
/// use rust_event_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_fired();
/// metrics.record_listener_failure();
///
/// assert_eq!(metrics.events_fired(), 1);
/// assert_eq!(metrics.listener_failures(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Events delivered to the pipeline
    events_fired: AtomicU64,

    /// `fire()` calls ignored because the event had already fired
    duplicate_fires: AtomicU64,

    /// Successful listener handler invocations
    listener_invocations: AtomicU64,

    /// Listener handlers that returned an error or panicked
    listener_failures: AtomicU64,

    /// Lines handed to appenders
    console_lines: AtomicU64,

    /// Events that did not pass the level filter
    filtered: AtomicU64,

    /// Appender writes that failed
    appender_failures: AtomicU64,

    /// Non-empty batches drained by the scheduler
    batches_drained: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            events_fired: AtomicU64::new(0),
            duplicate_fires: AtomicU64::new(0),
            listener_invocations: AtomicU64::new(0),
            listener_failures: AtomicU64::new(0),
            console_lines: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            appender_failures: AtomicU64::new(0),
            batches_drained: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn events_fired(&self) -> u64 {
        self.events_fired.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn duplicate_fires(&self) -> u64 {
        self.duplicate_fires.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn listener_invocations(&self) -> u64 {
        self.listener_invocations.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn listener_failures(&self) -> u64 {
        self.listener_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn console_lines(&self) -> u64 {
        self.console_lines.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn appender_failures(&self) -> u64 {
        self.appender_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn batches_drained(&self) -> u64 {
        self.batches_drained.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_fired(&self) -> u64 {
        self.events_fired.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_duplicate_fire(&self) -> u64 {
        self.duplicate_fires.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_listener_invocation(&self) -> u64 {
        self.listener_invocations.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_listener_failure(&self) -> u64 {
        self.listener_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_console_line(&self) -> u64 {
        self.console_lines.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_appender_failure(&self) -> u64 {
        self.appender_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_batch(&self) -> u64 {
        self.batches_drained.fetch_add(1, Ordering::Relaxed)
    }

    /// Listener failure rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if no listener was invoked.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.listener_failures() as f64;
        let total = self.listener_invocations() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.events_fired.store(0, Ordering::Relaxed);
        self.duplicate_fires.store(0, Ordering::Relaxed);
        self.listener_invocations.store(0, Ordering::Relaxed);
        self.listener_failures.store(0, Ordering::Relaxed);
        self.console_lines.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.appender_failures.store(0, Ordering::Relaxed);
        self.batches_drained.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            events_fired: AtomicU64::new(self.events_fired()),
            duplicate_fires: AtomicU64::new(self.duplicate_fires()),
            listener_invocations: AtomicU64::new(self.listener_invocations()),
            listener_failures: AtomicU64::new(self.listener_failures()),
            console_lines: AtomicU64::new(self.console_lines()),
            filtered: AtomicU64::new(self.filtered()),
            appender_failures: AtomicU64::new(self.appender_failures()),
            batches_drained: AtomicU64::new(self.batches_drained()),
        }
    }
}
