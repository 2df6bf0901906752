//! Logging context: the explicit owner of loggers, markers and dispatch state
//!
//! Several contexts can coexist in one process; nothing here is global.

use super::appender::Appender;
use super::dispatcher::Dispatcher;
use super::error::Result;
use super::level::Level;
use super::listener::Listener;
use super::logger::Logger;
use super::marker::{Marker, MarkerFactory};
use super::metrics::LoggerMetrics;
use super::scheduler::{SchedulerConfig, DEFAULT_SHUTDOWN_TIMEOUT};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub struct LoggingContext {
    dispatcher: Arc<Dispatcher>,
    loggers: RwLock<HashMap<String, Logger>>,
    markers: MarkerFactory,
}

impl LoggingContext {
    /// Context with default scheduler settings and no appenders
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    #[must_use]
    pub fn builder() -> ContextBuilder {
        ContextBuilder::new()
    }

    /// Return the logger for `name`, creating it on first request
    pub fn logger(&self, name: &str) -> Logger {
        if let Some(logger) = self.loggers.read().get(name) {
            return logger.clone();
        }
        self.loggers
            .write()
            .entry(name.to_string())
            .or_insert_with(|| Logger::new(name, Arc::clone(&self.dispatcher)))
            .clone()
    }

    pub fn has_logger(&self, name: &str) -> bool {
        self.loggers.read().contains_key(name)
    }

    pub fn logger_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Forget a logger and unregister every listener it owns
    ///
    /// Returns the number of listeners removed. Existing handles keep
    /// working; the next `logger(name)` call creates a fresh logger.
    pub fn remove_logger(&self, name: &str) -> usize {
        self.loggers.write().remove(name);
        self.dispatcher.registry().unregister_owner(name)
    }

    /// Interned marker for `name`
    pub fn marker(&self, name: &str) -> Marker {
        self.markers.get(name)
    }

    pub fn markers(&self) -> &MarkerFactory {
        &self.markers
    }

    /// Register a listener that receives events of every logger
    pub fn add_listener(&self, listener: Arc<dyn Listener>) -> Result<bool> {
        self.dispatcher.registry().register(listener, None)
    }

    pub fn remove_listener<L: Listener + ?Sized>(&self, listener: &Arc<L>) -> bool {
        self.dispatcher.registry().unregister(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.dispatcher.registry().len()
    }

    pub fn global_level(&self) -> Level {
        self.dispatcher.global_level()
    }

    /// Threshold for every logger that has no level of its own
    pub fn set_global_level(&self, level: Level) {
        self.dispatcher.set_global_level(level);
    }

    pub fn add_forced_marker(&self, marker: &Marker) -> bool {
        self.dispatcher.add_forced_marker(marker)
    }

    pub fn remove_forced_marker(&self, marker: &Marker) -> bool {
        self.dispatcher.remove_forced_marker(marker)
    }

    pub fn add_appender<A: Appender + 'static>(&self, appender: A) {
        self.dispatcher.add_appender(Box::new(appender));
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        self.dispatcher.metrics()
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Wait for queued batched deliveries and flush the appenders
    ///
    /// Returns `false` if the queue did not drain within `timeout`.
    pub fn flush(&self, timeout: Duration) -> bool {
        self.dispatcher.flush(timeout)
    }

    /// Drain pending deliveries and stop the batch scheduler
    ///
    /// Later batched calls fall back to inline delivery.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rust_event_logger::{LoggingContext, DEFAULT_SHUTDOWN_TIMEOUT};
    ///
    /// let context = LoggingContext::new().unwrap();
    /// context.logger("app").log_async(rust_event_logger::Level::Info, "bye", vec![]);
    ///
    /// if !context.shutdown(DEFAULT_SHUTDOWN_TIMEOUT) {
    ///     eprintln!("Warning: logging shutdown timed out");
    /// }
    /// ```
    pub fn shutdown(&self, timeout: Duration) -> bool {
        self.dispatcher.shutdown(timeout)
    }
}

/// Dropping the context stops the batch scheduler and unregisters every
/// listener. Listeners that capture a `Logger` would otherwise keep the
/// dispatcher alive forever. Logger handles that outlive the context still
/// log, inline and without listeners.
impl Drop for LoggingContext {
    fn drop(&mut self) {
        if !self.dispatcher.shutdown(DEFAULT_SHUTDOWN_TIMEOUT) {
            eprintln!(
                "[LOGGER WARNING] Logging context dropped with {} undelivered events",
                self.dispatcher.scheduler().pending()
            );
        }
        self.dispatcher.registry().clear();
    }
}

impl fmt::Debug for LoggingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingContext")
            .field("loggers", &self.loggers.read().len())
            .field("markers", &self.markers.len())
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}

/// Builder for [`LoggingContext`]
///
/// # Example
/// ```
/// use rust_event_logger::prelude::*;
///
/// let context = LoggingContext::builder()
///     .global_level(Level::Debug)
///     .appender(MemoryAppender::new())
///     .forced_marker("AUDIT")
///     .scheduler(SchedulerConfig::default())
///     .build()
///     .unwrap();
///
/// assert_eq!(context.global_level(), Level::Debug);
/// ```
pub struct ContextBuilder {
    global_level: Level,
    appenders: Vec<Box<dyn Appender>>,
    forced_markers: Vec<String>,
    scheduler: SchedulerConfig,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self {
            global_level: Level::default(),
            appenders: Vec::new(),
            forced_markers: Vec::new(),
            scheduler: SchedulerConfig::default(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn global_level(mut self, level: Level) -> Self {
        self.global_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    /// Force a marker globally; the marker is interned in the new context
    #[must_use = "builder methods return a new value"]
    pub fn forced_marker(mut self, name: impl Into<String>) -> Self {
        self.forced_markers.push(name.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn scheduler(mut self, config: SchedulerConfig) -> Self {
        self.scheduler = config;
        self
    }

    /// Fails if the scheduler configuration is invalid or its threads
    /// cannot be spawned
    pub fn build(self) -> Result<LoggingContext> {
        let dispatcher = Arc::new(Dispatcher::new(self.scheduler)?);
        dispatcher.set_global_level(self.global_level);
        for appender in self.appenders {
            dispatcher.add_appender(appender);
        }

        let context = LoggingContext {
            dispatcher,
            loggers: RwLock::new(HashMap::new()),
            markers: MarkerFactory::new(),
        };
        for name in &self.forced_markers {
            let marker = context.marker(name);
            context.add_forced_marker(&marker);
        }
        Ok(context)
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::MemoryAppender;
    use crate::core::argument::Argument;
    use crate::core::error::LoggerError;
    use crate::core::listener::{EventKind, ListenerBuilder};

    #[test]
    fn test_logger_is_memoized() {
        let context = LoggingContext::new().unwrap();
        let a = context.logger("app");
        let b = context.logger("app");
        assert_eq!(a, b);
        assert_ne!(a, context.logger("other"));
        assert_eq!(context.logger_names(), vec!["app".to_string(), "other".to_string()]);
    }

    #[test]
    fn test_builder_configures_dispatcher() {
        let memory = MemoryAppender::new();
        let context = LoggingContext::builder()
            .global_level(Level::Warn)
            .appender(memory.clone())
            .forced_marker("AUDIT")
            .build()
            .unwrap();

        let logger = context.logger("app");
        logger.info("not shown", vec![]);
        logger.log_marked(Level::Debug, &context.marker("AUDIT"), "forced", vec![]);
        logger.warn("shown", vec![]);

        assert_eq!(
            memory.lines(),
            vec![
                "[DEBUG] [AUDIT] [app] forced".to_string(),
                "[WARN] [app] shown".to_string()
            ]
        );
        assert!(context.markers().exists("AUDIT"));
    }

    #[test]
    fn test_builder_rejects_bad_scheduler() {
        let result = LoggingContext::builder()
            .scheduler(SchedulerConfig {
                workers: 0,
                ..SchedulerConfig::default()
            })
            .build();
        assert!(matches!(
            result,
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_remove_logger_unregisters_owned_listeners() {
        let context = LoggingContext::new().unwrap();
        let a = context.logger("a");
        let b = context.logger("b");
        let listener = || {
            ListenerBuilder::new("l")
                .on(EventKind::Any, |_| {})
                .build()
                .unwrap()
        };
        a.add_listener(listener()).unwrap();
        a.add_listener(listener()).unwrap();
        b.add_listener(listener()).unwrap();
        context.add_listener(listener()).unwrap();

        assert_eq!(context.remove_logger("a"), 2);
        assert_eq!(context.listener_count(), 2);
        assert!(!context.has_logger("a"));
        assert!(context.has_logger("b"));
    }

    #[test]
    fn test_contexts_are_independent() {
        let first = LoggingContext::new().unwrap();
        let second = LoggingContext::new().unwrap();
        first.set_global_level(Level::Error);
        assert_eq!(second.global_level(), Level::Info);
        assert!(!first.logger("app").is_warn_enabled());
        assert!(second.logger("app").is_warn_enabled());
    }

    #[test]
    fn test_shutdown_falls_back_to_inline() {
        let memory = MemoryAppender::new();
        let context = LoggingContext::builder()
            .appender(memory.clone())
            .build()
            .unwrap();
        assert!(context.shutdown(Duration::from_secs(5)));

        context.logger("app").log_async(Level::Info, "after shutdown", vec![]);
        assert_eq!(memory.lines(), vec!["[INFO] [app] after shutdown".to_string()]);
    }

    #[test]
    fn test_drop_releases_dispatcher_held_by_listener() {
        let mut released = Vec::new();
        for _ in 0..3 {
            let context = LoggingContext::new().unwrap();
            let audit = context.logger("audit");
            let forward = ListenerBuilder::new("forward")
                .on(EventKind::Error, move |event| {
                    audit.info("{}", vec![Argument::from(event.formatted())]);
                })
                .build()
                .unwrap();
            context.add_listener(forward).unwrap();
            context.logger("app").log_async(Level::Error, "disk full", vec![]);

            released.push(Arc::downgrade(context.dispatcher()));
        }

        for dispatcher in released {
            assert!(dispatcher.upgrade().is_none());
        }
    }

    #[test]
    fn test_handles_outliving_context_log_inline() {
        let memory = MemoryAppender::new();
        let context = LoggingContext::builder()
            .appender(memory.clone())
            .build()
            .unwrap();
        let logger = context.logger("app");
        drop(context);

        logger.log_async(Level::Info, "still here", vec![]);
        assert_eq!(memory.lines(), vec!["[INFO] [app] still here".to_string()]);
    }
}
