//! Named logger facade
//!
//! A [`Logger`] holds its own level threshold and forced-marker set, and
//! fires one [`LogEvent`] per call through the context's dispatcher.

use super::argument::{Argument, Throwable};
use super::dispatcher::{DeliveryMode, Dispatcher};
use super::error::Result;
use super::event::LogEvent;
use super::level::Level;
use super::listener::Listener;
use super::marker::{ForcedMarkers, Marker};
use parking_lot::{ReentrantMutex, RwLock};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub(crate) struct LoggerCore {
    name: Arc<str>,
    level: RwLock<Level>,
    /// Follow the dispatcher's global level until `set_level` is called
    use_global: AtomicBool,
    forced_markers: ForcedMarkers,
    sync_lock: ReentrantMutex<()>,
    dispatcher: Arc<Dispatcher>,
}

impl LoggerCore {
    pub(crate) fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    fn effective_level(&self) -> Level {
        if self.use_global.load(Ordering::Relaxed) {
            self.dispatcher.global_level()
        } else {
            *self.level.read()
        }
    }

    fn is_enabled_for(&self, level: Level, markers: &[Marker]) -> bool {
        if self.forced_markers.any(markers) || self.dispatcher.is_forced(markers) {
            return true;
        }
        level.is_loggable(self.effective_level())
    }

    /// Hand a freshly fired event to the dispatcher
    pub(crate) fn deliver(&self, event: Arc<LogEvent>, mode: DeliveryMode) {
        let printable = self.is_enabled_for(event.level(), event.markers());
        self.dispatcher.deliver(event, printable, mode, &self.sync_lock);
    }
}

/// Cheap, cloneable handle to a named logger
///
/// Every logging call builds and fires exactly one event and returns it.
/// Listeners see the event regardless of level; the console line is written
/// only if the level passes the threshold or a forced marker is attached.
#[derive(Clone)]
pub struct Logger {
    core: Arc<LoggerCore>,
}

impl Logger {
    pub(crate) fn new(name: &str, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            core: Arc::new(LoggerCore {
                name: Arc::from(name),
                level: RwLock::new(Level::default()),
                use_global: AtomicBool::new(true),
                forced_markers: ForcedMarkers::new(),
                sync_lock: ReentrantMutex::new(()),
                dispatcher,
            }),
        }
    }

    pub(crate) fn from_core(core: Arc<LoggerCore>) -> Self {
        Self { core }
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    /// Threshold currently applied to this logger
    pub fn level(&self) -> Level {
        self.core.effective_level()
    }

    /// Set an own threshold; the global level no longer applies
    pub fn set_level(&self, level: Level) {
        *self.core.level.write() = level;
        self.core.use_global.store(false, Ordering::Relaxed);
    }

    /// Follow the global level again
    pub fn use_global_level(&self) {
        self.core.use_global.store(true, Ordering::Relaxed);
    }

    pub fn follows_global_level(&self) -> bool {
        self.core.use_global.load(Ordering::Relaxed)
    }

    pub fn add_forced_marker(&self, marker: &Marker) -> bool {
        self.core.forced_markers.insert(marker)
    }

    pub fn remove_forced_marker(&self, marker: &Marker) -> bool {
        self.core.forced_markers.remove(marker)
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        self.core.is_enabled_for(level, &[])
    }

    /// Level check honoring forced markers: any forced marker enables the call
    pub fn is_enabled_for(&self, level: Level, markers: &[Marker]) -> bool {
        self.core.is_enabled_for(level, markers)
    }

    pub fn is_trace_enabled(&self) -> bool {
        self.is_enabled(Level::Trace)
    }

    pub fn is_debug_enabled(&self) -> bool {
        self.is_enabled(Level::Debug)
    }

    pub fn is_info_enabled(&self) -> bool {
        self.is_enabled(Level::Info)
    }

    pub fn is_warn_enabled(&self) -> bool {
        self.is_enabled(Level::Warn)
    }

    pub fn is_error_enabled(&self) -> bool {
        self.is_enabled(Level::Error)
    }

    /// Build an event without firing it
    pub fn event(
        &self,
        level: Level,
        markers: &[Marker],
        template: &str,
        args: Vec<Argument>,
    ) -> Arc<LogEvent> {
        Arc::new(LogEvent::new(
            Arc::downgrade(&self.core),
            Arc::clone(&self.core.name),
            level,
            markers.to_vec(),
            template,
            args,
        ))
    }

    /// Build and fire an event with an explicit delivery mode
    pub fn log_with(
        &self,
        level: Level,
        markers: &[Marker],
        template: &str,
        args: Vec<Argument>,
        mode: DeliveryMode,
    ) -> Arc<LogEvent> {
        let event = self.event(level, markers, template, args);
        event.fire_with(mode);
        event
    }

    pub fn log(&self, level: Level, template: &str, args: Vec<Argument>) -> Arc<LogEvent> {
        self.log_with(level, &[], template, args, DeliveryMode::Inline)
    }

    pub fn log_marked(
        &self,
        level: Level,
        marker: &Marker,
        template: &str,
        args: Vec<Argument>,
    ) -> Arc<LogEvent> {
        self.log_with(
            level,
            std::slice::from_ref(marker),
            template,
            args,
            DeliveryMode::Inline,
        )
    }

    /// Log `error` with its cause chain; the event is exception level
    #[track_caller]
    pub fn log_throwable(
        &self,
        level: Level,
        template: &str,
        error: &(dyn std::error::Error + 'static),
    ) -> Arc<LogEvent> {
        let throwable = Throwable::from_error(error);
        self.log(level, template, vec![Argument::from(throwable)])
    }

    /// Deliver on the calling thread, serialized with other synchronous calls
    /// on this logger
    pub fn log_sync(&self, level: Level, template: &str, args: Vec<Argument>) -> Arc<LogEvent> {
        self.log_with(level, &[], template, args, DeliveryMode::Synchronous)
    }

    /// Queue delivery on the batch scheduler; returns without waiting
    pub fn log_async(&self, level: Level, template: &str, args: Vec<Argument>) -> Arc<LogEvent> {
        self.log_with(level, &[], template, args, DeliveryMode::Batched)
    }

    pub fn trace(&self, template: &str, args: Vec<Argument>) -> Arc<LogEvent> {
        self.log(Level::Trace, template, args)
    }

    pub fn debug(&self, template: &str, args: Vec<Argument>) -> Arc<LogEvent> {
        self.log(Level::Debug, template, args)
    }

    pub fn info(&self, template: &str, args: Vec<Argument>) -> Arc<LogEvent> {
        self.log(Level::Info, template, args)
    }

    pub fn warn(&self, template: &str, args: Vec<Argument>) -> Arc<LogEvent> {
        self.log(Level::Warn, template, args)
    }

    pub fn error(&self, template: &str, args: Vec<Argument>) -> Arc<LogEvent> {
        self.log(Level::Error, template, args)
    }

    pub fn exception(&self, template: &str, args: Vec<Argument>) -> Arc<LogEvent> {
        self.log(Level::Exception, template, args)
    }

    /// Register a listener scoped to this logger's events
    ///
    /// Returns `Ok(false)` if the instance is already registered.
    pub fn add_listener(&self, listener: Arc<dyn Listener>) -> Result<bool> {
        self.core
            .dispatcher
            .registry()
            .register(listener, Some(Arc::clone(&self.core.name)))
    }

    pub fn remove_listener<L: Listener + ?Sized>(&self, listener: &Arc<L>) -> bool {
        self.core.dispatcher.registry().unregister(listener)
    }

    /// Remove every listener registered through this logger
    pub fn clear_listeners(&self) -> usize {
        self.core.dispatcher.registry().unregister_owner(&self.core.name)
    }

    pub fn listener_count(&self) -> usize {
        self.core.dispatcher.registry().owned_by(&self.core.name)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.core.name)
            .field("level", &self.level())
            .field("follows_global_level", &self.follows_global_level())
            .field("forced_markers", &self.core.forced_markers.len())
            .finish()
    }
}

impl fmt::Debug for LoggerCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerCore")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Logger {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.core, &other.core)
    }
}

impl Eq for Logger {}
