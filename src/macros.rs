//! Logging macros
//!
//! Each macro takes a logger, an optional `marker: <expr>,` prefix, a
//! template and any number of arguments. Arguments go through
//! [`Argument::from`](crate::Argument), so strings, numbers, options,
//! collections, maps and throwables can be mixed freely. Every macro
//! evaluates to the fired `Arc<LogEvent>`.
//!
//! # Examples
//!
//! ```
//! use rust_event_logger::prelude::*;
//! use rust_event_logger::{info, warn};
//!
//! let context = LoggingContext::new().unwrap();
//! let logger = context.logger("server");
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // Placeholders are filled left to right
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // Marker-scoped call
//! let audit = context.marker("AUDIT");
//! warn!(logger, marker: audit, "User {} changed role to {}", 42, "admin");
//! ```

/// Convert a list of values into `Vec<Argument>`
///
/// # Examples
///
/// ```
/// use rust_event_logger::{args, Argument};
///
/// let values = args!("a", 1, None::<i32>);
/// assert_eq!(values.len(), 3);
/// assert_eq!(values[2], Argument::Null);
/// assert!(args!().is_empty());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Argument>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Argument::from($arg)),+]
    };
}

/// Log at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_event_logger::prelude::*;
/// # let context = LoggingContext::new().unwrap();
/// # let logger = context.logger("app");
/// use rust_event_logger::log;
/// log!(logger, Level::Info, "Simple message");
/// log!(logger, Level::Error, "Error code: {}", 500);
/// log!(logger, Level::Debug, marker: context.marker("DB"), "Query took {} ms", 12);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, marker: $marker:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $logger.log_marked($level, &$marker, $template, $crate::args!($($arg),*))
    };
    ($logger:expr, $level:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $logger.log($level, $template, $crate::args!($($arg),*))
    };
}

/// Log a trace-level message.
///
/// # Examples
///
/// ```
/// # use rust_event_logger::prelude::*;
/// # let context = LoggingContext::new().unwrap();
/// # let logger = context.logger("app");
/// # logger.set_level(Level::Trace);
/// use rust_event_logger::trace;
/// trace!(logger, "Entering function: calculate()");
/// trace!(logger, "Variable value: {}", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, marker: $marker:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Trace, marker: $marker, $($rest)+)
    };
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Trace, $($rest)+)
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_event_logger::prelude::*;
/// # let context = LoggingContext::new().unwrap();
/// # let logger = context.logger("app");
/// use rust_event_logger::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, marker: $marker:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, marker: $marker, $($rest)+)
    };
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($rest)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_event_logger::prelude::*;
/// # let context = LoggingContext::new().unwrap();
/// # let logger = context.logger("app");
/// use rust_event_logger::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, marker: $marker:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, marker: $marker, $($rest)+)
    };
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($rest)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_event_logger::prelude::*;
/// # let context = LoggingContext::new().unwrap();
/// # let logger = context.logger("app");
/// use rust_event_logger::warn;
/// warn!(logger, "Low disk space");
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, marker: $marker:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, marker: $marker, $($rest)+)
    };
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, $($rest)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_event_logger::prelude::*;
/// # let context = LoggingContext::new().unwrap();
/// # let logger = context.logger("app");
/// use rust_event_logger::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, marker: $marker:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, marker: $marker, $($rest)+)
    };
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($rest)+)
    };
}

/// Log an exception-level message.
///
/// Any throwable argument already promotes a call to this level; this macro
/// is for exception reports that carry no throwable value.
///
/// # Examples
///
/// ```
/// # use rust_event_logger::prelude::*;
/// # let context = LoggingContext::new().unwrap();
/// # let logger = context.logger("app");
/// use rust_event_logger::exception;
/// exception!(logger, "Unrecoverable state");
/// exception!(logger, "Worker {} crashed", 3);
/// ```
#[macro_export]
macro_rules! exception {
    ($logger:expr, marker: $marker:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Exception, marker: $marker, $($rest)+)
    };
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Exception, $($rest)+)
    };
}
