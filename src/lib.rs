//! # Rust Event Logger
//!
//! A logging facade that fires a typed event for every log call, so
//! listeners can observe, redirect or suppress logs independently of the
//! console output.
//!
//! ## Features
//!
//! - **Placeholder formatting**: `{}` (and printf-style `%s`/`%d`/`%f`) filled
//!   left to right from heterogeneous arguments
//! - **Color markup**: `@red`, `@bold`, `@reset` tags expanded to ANSI codes or
//!   stripped for plain output
//! - **Filtering**: per-logger and global thresholds, forced markers that
//!   bypass them
//! - **Listeners**: closures or trait objects registered per event kind
//! - **Delivery modes**: inline, synchronous per logger, or batched on a
//!   background worker pool
//!
//! ## Example
//!
//! ```
//! use rust_event_logger::prelude::*;
//! use rust_event_logger::info;
//!
//! let memory = MemoryAppender::new();
//! let context = LoggingContext::builder()
//!     .global_level(Level::Debug)
//!     .appender(memory.clone())
//!     .build()
//!     .unwrap();
//!
//! let warnings = ListenerBuilder::new("warnings")
//!     .on(EventKind::Warn, |event| eprintln!("saw: {}", event.formatted()))
//!     .build()
//!     .unwrap();
//! context.add_listener(warnings).unwrap();
//!
//! let logger = context.logger("app");
//! info!(logger, "Value: {}", 42);
//!
//! assert_eq!(memory.lines(), vec!["[INFO] [app] Value: 42".to_string()]);
//! ```

pub mod appenders;
#[cfg(feature = "log-bridge")]
pub mod bridge;
pub mod core;
pub mod macros;
pub mod panic_hook;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::appenders::ConsoleAppender;
    pub use crate::appenders::MemoryAppender;
    pub use crate::core::{
        Appender, Argument, ConsoleRecord, DeliveryMode, EventKind, Level, Listener,
        ListenerBuilder, LogEvent, Logger, LoggerError, LoggerMetrics, LoggingContext, Marker,
        Result, SchedulerConfig, Throwable, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::panic_hook::PanicHook;
}

#[cfg(feature = "console")]
pub use appenders::ConsoleAppender;
pub use appenders::MemoryAppender;
#[cfg(feature = "log-bridge")]
pub use bridge::LogBridge;
pub use core::{
    Appender, Argument, BatchScheduler, ColorTag, ConsoleRecord, ContextBuilder, DeliveryMode,
    Dispatcher, EventKind, FnListener, HandlerResult, Level, Listener, ListenerBuilder,
    ListenerRegistry, LogEvent, Logger, LoggerError, LoggerMetrics, LoggingContext, Marker,
    MarkerFactory, RegisteredListener, Result, SchedulerConfig, Throwable,
    DEFAULT_SHUTDOWN_TIMEOUT, INTERNAL_LOGGER,
};
pub use panic_hook::PanicHook;
