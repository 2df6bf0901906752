//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// A listener declared no event handlers
    #[error("Listener '{listener}' declares no event handlers")]
    NoHandlers { listener: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// A listener handler returned an error
    #[error("Listener '{listener}' failed: {message}")]
    HandlerFailed { listener: String, message: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Appender error with appender name
    #[error("Appender '{appender}' failed: {message}")]
    AppenderError { appender: String, message: String },

    /// Batch scheduler already stopped
    #[error("Batch scheduler already stopped")]
    SchedulerStopped,

    /// Worker thread could not be spawned
    #[error("Failed to spawn worker thread '{name}': {source}")]
    WorkerSpawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl LoggerError {
    /// Create a missing-handlers error for a listener
    pub fn no_handlers(listener: impl Into<String>) -> Self {
        LoggerError::NoHandlers {
            listener: listener.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a handler failure error
    pub fn handler(listener: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::HandlerFailed {
            listener: listener.into(),
            message: message.into(),
        }
    }

    /// Create an appender error
    pub fn appender(appender: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::AppenderError {
            appender: appender.into(),
            message: message.into(),
        }
    }

    /// Whether this error was raised while registering a listener
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            LoggerError::NoHandlers { .. } | LoggerError::InvalidConfiguration { .. }
        )
    }
}

/// Extract a readable message from a `catch_unwind` payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
