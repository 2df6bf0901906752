//! Core pipeline types: levels, formatting, events, listeners and dispatch

pub mod appender;
pub mod argument;
pub mod color;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod formatter;
pub mod level;
pub mod listener;
pub mod logger;
pub mod marker;
pub mod metrics;
pub mod registry;
pub mod scheduler;

pub use appender::{Appender, ConsoleRecord};
pub use argument::{Argument, Throwable};
pub use color::ColorTag;
pub use context::{ContextBuilder, LoggingContext};
pub use dispatcher::{DeliveryMode, Dispatcher, INTERNAL_LOGGER};
pub use error::{LoggerError, Result};
pub use event::LogEvent;
pub use formatter::Formatted;
pub use level::Level;
pub use listener::{
    EventKind, FnListener, HandlerResult, Listener, ListenerBuilder, RegisteredListener,
};
pub use logger::Logger;
pub use marker::{ForcedMarkers, Marker, MarkerFactory};
pub use metrics::LoggerMetrics;
pub use registry::ListenerRegistry;
pub use scheduler::{BatchScheduler, SchedulerConfig, DEFAULT_SHUTDOWN_TIMEOUT};
