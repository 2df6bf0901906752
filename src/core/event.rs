//! Log events: one immutable record per log call

use super::argument::{Argument, Throwable};
use super::dispatcher::DeliveryMode;
use super::formatter;
use super::level::Level;
use super::logger::{Logger, LoggerCore};
use super::marker::Marker;
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

static NEXT_EVENT_ID: AtomicU64 = AtomicU64::new(1);

// Thread-local cache for the thread name to avoid repeated allocations
thread_local! {
    static THREAD_NAME_CACHE: RefCell<Option<Option<String>>> = const { RefCell::new(None) };
}

/// Get cached thread name, computing and caching it on first access
fn get_thread_name() -> Option<String> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| std::thread::current().name().map(String::from))
            .clone()
    })
}

/// The record of one log invocation
///
/// Everything is fixed at construction except the fired flag, which moves
/// from `false` to `true` exactly once. Events are shared with listeners as
/// `Arc<LogEvent>`; the owning logger is held weakly.
#[derive(Debug)]
pub struct LogEvent {
    id: u64,
    logger: Weak<LoggerCore>,
    logger_name: Arc<str>,
    level: Level,
    requested_level: Level,
    markers: Vec<Marker>,
    throwable: Option<Throwable>,
    message: String,
    formatted: String,
    decorated: String,
    arguments: Vec<Argument>,
    timestamp: DateTime<Utc>,
    thread_name: Option<String>,
    internal: bool,
    fired: AtomicBool,
}

impl LogEvent {
    pub(crate) fn new(
        logger: Weak<LoggerCore>,
        logger_name: Arc<str>,
        requested_level: Level,
        markers: Vec<Marker>,
        message: &str,
        arguments: Vec<Argument>,
    ) -> Self {
        let rendered = formatter::format(message, &arguments);
        let throwable = arguments.iter().find_map(Argument::as_throwable).cloned();

        Self {
            id: NEXT_EVENT_ID.fetch_add(1, Ordering::Relaxed),
            logger,
            logger_name,
            level: rendered.effective_level(requested_level),
            requested_level,
            markers,
            throwable,
            message: message.to_string(),
            formatted: rendered.plain,
            decorated: rendered.colored,
            arguments,
            timestamp: Utc::now(),
            thread_name: get_thread_name(),
            internal: false,
            fired: AtomicBool::new(false),
        }
    }

    /// An event that belongs to no logger. Firing it only marks it fired.
    pub fn detached(
        logger_name: &str,
        level: Level,
        message: &str,
        arguments: Vec<Argument>,
    ) -> Self {
        Self::new(
            Weak::new(),
            Arc::from(logger_name),
            level,
            Vec::new(),
            message,
            arguments,
        )
    }

    /// Event raised by the pipeline itself; failures while handling it are
    /// not reported again.
    pub(crate) fn internal(logger_name: &str, message: &str, arguments: Vec<Argument>) -> Self {
        let mut event = Self::detached(logger_name, Level::Exception, message, arguments);
        event.internal = true;
        event
    }

    #[must_use]
    pub fn with_markers(mut self, markers: Vec<Marker>) -> Self {
        self.markers = markers;
        self
    }

    /// Process-unique, monotonically increasing id
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Effective level (exception level when a throwable was passed)
    pub fn level(&self) -> Level {
        self.level
    }

    /// Level named by the method that produced the event
    pub fn requested_level(&self) -> Level {
        self.requested_level
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn has_marker(&self, name: &str) -> bool {
        self.markers.iter().any(|m| m.name() == name)
    }

    pub fn throwable(&self) -> Option<&Throwable> {
        self.throwable.as_ref()
    }

    /// Raw template as passed by the caller
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Substituted message without color codes
    pub fn formatted(&self) -> &str {
        &self.formatted
    }

    /// Substituted message with color codes
    pub fn decorated(&self) -> &str {
        &self.decorated
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn thread_name(&self) -> Option<&str> {
        self.thread_name.as_deref()
    }

    pub fn logger_name(&self) -> &str {
        &self.logger_name
    }

    pub(crate) fn logger_key(&self) -> Arc<str> {
        Arc::clone(&self.logger_name)
    }

    /// The owning logger, if it is still alive
    pub fn logger(&self) -> Option<Logger> {
        self.logger.upgrade().map(Logger::from_core)
    }

    pub fn is_internal(&self) -> bool {
        self.internal
    }

    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// Flip the fired flag; `true` only for the first caller
    pub(crate) fn mark_fired(&self) -> bool {
        !self.fired.swap(true, Ordering::AcqRel)
    }

    /// Deliver inline on the calling thread
    pub fn fire(self: &Arc<Self>) -> bool {
        self.fire_with(DeliveryMode::Inline)
    }

    /// Deliver on the calling thread, serialized with other synchronous calls
    /// on the same logger
    pub fn fire_sync(self: &Arc<Self>) -> bool {
        self.fire_with(DeliveryMode::Synchronous)
    }

    /// Hand the event to the batch scheduler
    pub fn fire_async(self: &Arc<Self>) -> bool {
        self.fire_with(DeliveryMode::Batched)
    }

    /// Fire at most once. Returns `false` if the event was already fired or
    /// its logger is gone.
    pub fn fire_with(self: &Arc<Self>, mode: DeliveryMode) -> bool {
        let core = self.logger.upgrade();
        if !self.mark_fired() {
            if let Some(core) = core {
                core.dispatcher().metrics().record_duplicate_fire();
            }
            return false;
        }

        match core {
            Some(core) => {
                core.deliver(Arc::clone(self), mode);
                true
            }
            None => false,
        }
    }
}
