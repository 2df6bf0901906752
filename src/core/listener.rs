//! Event listeners
//!
//! A listener declares the event kinds it consumes and receives matching
//! events. Implement [`Listener`] directly, or assemble one from closures with
//! [`ListenerBuilder`]:
//!
//! ```
//! use rust_event_logger::{EventKind, ListenerBuilder};
//!
//! let listener = ListenerBuilder::new("audit")
//!     .on(EventKind::Warn, |event| println!("warn: {}", event.formatted()))
//!     .on(EventKind::Exception, |event| println!("exception: {}", event.formatted()))
//!     .build()
//!     .expect("two handlers declared");
//! ```

use super::error::{panic_message, LoggerError, Result};
use super::event::LogEvent;
use super::level::Level;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Outcome of a single handler invocation
pub type HandlerResult = std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;

type Handler = Box<dyn Fn(&LogEvent) -> HandlerResult + Send + Sync>;

/// Event kinds a listener can declare interest in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Every event regardless of level
    Any,
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Exception,
}

impl EventKind {
    pub fn of(level: Level) -> Self {
        match level {
            Level::Trace => EventKind::Trace,
            Level::Debug => EventKind::Debug,
            Level::Info => EventKind::Info,
            Level::Warn => EventKind::Warn,
            Level::Error => EventKind::Error,
            Level::Exception => EventKind::Exception,
        }
    }

    pub fn accepts(&self, event: &LogEvent) -> bool {
        self.accepts_level(event.level())
    }

    pub fn accepts_level(&self, level: Level) -> bool {
        match self {
            EventKind::Any => true,
            kind => *kind == EventKind::of(level),
        }
    }
}

impl From<Level> for EventKind {
    fn from(level: Level) -> Self {
        EventKind::of(level)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Any => write!(f, "ANY"),
            kind => {
                let level = Level::ALL
                    .into_iter()
                    .find(|l| EventKind::of(*l) == *kind)
                    .unwrap_or_default();
                write!(f, "{}", level)
            }
        }
    }
}

/// A consumer of log events
pub trait Listener: Send + Sync + 'static {
    /// Name used in diagnostics
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Event kinds this listener handles; must not be empty
    fn interests(&self) -> Vec<EventKind>;

    /// Called once per matching event
    fn on_event(&self, event: &LogEvent) -> HandlerResult;
}

/// A listener assembled from closures, one per event kind
pub struct FnListener {
    name: String,
    handlers: Vec<(EventKind, Handler)>,
}

impl Listener for FnListener {
    fn name(&self) -> &str {
        &self.name
    }

    fn interests(&self) -> Vec<EventKind> {
        let mut kinds: Vec<EventKind> = Vec::with_capacity(self.handlers.len());
        for (kind, _) in &self.handlers {
            if !kinds.contains(kind) {
                kinds.push(*kind);
            }
        }
        kinds
    }

    /// Runs every handler whose kind matches; the first error is returned
    /// after all matching handlers ran.
    fn on_event(&self, event: &LogEvent) -> HandlerResult {
        let mut first_error = None;
        for (kind, handler) in &self.handlers {
            if !kind.accepts(event) {
                continue;
            }
            if let Err(e) = handler(event) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for FnListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnListener")
            .field("name", &self.name)
            .field("interests", &self.interests())
            .finish()
    }
}

/// Builder for [`FnListener`]
pub struct ListenerBuilder {
    name: String,
    handlers: Vec<(EventKind, Handler)>,
}

impl ListenerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: Vec::new(),
        }
    }

    /// Add an infallible handler for `kind`
    #[must_use = "builder methods return a new value"]
    pub fn on<F>(self, kind: impl Into<EventKind>, handler: F) -> Self
    where
        F: Fn(&LogEvent) + Send + Sync + 'static,
    {
        self.try_on(kind, move |event| {
            handler(event);
            Ok(())
        })
    }

    /// Add a fallible handler for `kind`
    #[must_use = "builder methods return a new value"]
    pub fn try_on<F>(mut self, kind: impl Into<EventKind>, handler: F) -> Self
    where
        F: Fn(&LogEvent) -> HandlerResult + Send + Sync + 'static,
    {
        self.handlers.push((kind.into(), Box::new(handler)));
        self
    }

    /// Fails if no handler was declared or the name is empty
    pub fn build(self) -> Result<Arc<FnListener>> {
        if self.name.trim().is_empty() {
            return Err(LoggerError::config("Listener", "listener name must not be empty"));
        }
        if self.handlers.is_empty() {
            return Err(LoggerError::no_handlers(self.name));
        }
        Ok(Arc::new(FnListener {
            name: self.name,
            handlers: self.handlers,
        }))
    }
}

/// A listener bound to its owner and validated interests
pub struct RegisteredListener {
    listener: Arc<dyn Listener>,
    owner: Option<Arc<str>>,
    kinds: Vec<EventKind>,
}

impl RegisteredListener {
    /// Validate `listener` and bind it to `owner` (`None` = every logger)
    pub fn new(listener: Arc<dyn Listener>, owner: Option<Arc<str>>) -> Result<Self> {
        let mut kinds: Vec<EventKind> = Vec::new();
        for kind in listener.interests() {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        if kinds.is_empty() {
            return Err(LoggerError::no_handlers(listener.name()));
        }

        Ok(Self {
            listener,
            owner,
            kinds,
        })
    }

    pub fn name(&self) -> &str {
        self.listener.name()
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn kinds(&self) -> &[EventKind] {
        &self.kinds
    }

    pub fn listener(&self) -> &Arc<dyn Listener> {
        &self.listener
    }

    /// Identity comparison against a listener instance
    pub fn is<L: Listener + ?Sized>(&self, listener: &Arc<L>) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.listener) as *const (),
            Arc::as_ptr(listener) as *const (),
        )
    }

    pub fn is_owned_by(&self, owner: &str) -> bool {
        self.owner.as_deref() == Some(owner)
    }

    /// Owner scope and declared kind both match
    pub fn accepts(&self, event: &LogEvent) -> bool {
        let owner_matches = match self.owner.as_deref() {
            Some(owner) => owner == event.logger_name(),
            None => true,
        };
        owner_matches && self.kinds.iter().any(|k| k.accepts(event))
    }

    /// Invoke the listener, converting errors and panics into `HandlerFailed`.
    /// Events the listener did not declare are skipped silently.
    pub fn invoke(&self, event: &LogEvent) -> Result<()> {
        if !self.kinds.iter().any(|k| k.accepts(event)) {
            return Ok(());
        }

        match catch_unwind(AssertUnwindSafe(|| self.listener.on_event(event))) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(LoggerError::handler(self.name(), e.to_string())),
            Err(panic_info) => Err(LoggerError::handler(
                self.name(),
                format!("panicked: {}", panic_message(panic_info.as_ref())),
            )),
        }
    }
}

impl fmt::Debug for RegisteredListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredListener")
            .field("name", &self.name())
            .field("owner", &self.owner)
            .field("kinds", &self.kinds)
            .finish()
    }
}
