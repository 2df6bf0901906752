//! Bridge from the `log` crate facade
//!
//! Records emitted through `log::info!` and friends are routed to the logger
//! named by the record target. Every record becomes an event, so the `log`
//! max level stays at `Trace` and filtering happens in the pipeline.

use crate::core::{Argument, Level, LoggerError, LoggingContext, Result, DEFAULT_SHUTDOWN_TIMEOUT};
use std::sync::Arc;

pub fn from_log_level(level: log::Level) -> Level {
    match level {
        log::Level::Trace => Level::Trace,
        log::Level::Debug => Level::Debug,
        log::Level::Info => Level::Info,
        log::Level::Warn => Level::Warn,
        log::Level::Error => Level::Error,
    }
}

pub struct LogBridge {
    context: Arc<LoggingContext>,
}

impl LogBridge {
    pub fn new(context: Arc<LoggingContext>) -> Self {
        Self { context }
    }

    /// Register a bridge as the process-wide `log` logger
    ///
    /// Fails if another `log` logger is already installed.
    pub fn install(context: Arc<LoggingContext>) -> Result<()> {
        log::set_boxed_logger(Box::new(Self::new(context)))
            .map_err(|e| LoggerError::config("LogBridge", e.to_string()))?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(())
    }

    pub fn context(&self) -> &Arc<LoggingContext> {
        &self.context
    }
}

impl log::Log for LogBridge {
    /// Listeners observe every level, so no record is ever skipped
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let logger = self.context.logger(record.target());
        // Pre-formatted by `log`; passed as an argument so braces and color
        // tags in the text stay literal
        logger.log(
            from_log_level(record.level()),
            "{}",
            vec![Argument::from(record.args().to_string())],
        );
    }

    fn flush(&self) {
        if !self.context.flush(DEFAULT_SHUTDOWN_TIMEOUT) {
            eprintln!("[LOGGER WARNING] log bridge flush timed out");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::MemoryAppender;
    use log::Log;

    #[test]
    fn test_level_mapping() {
        assert_eq!(from_log_level(log::Level::Warn), Level::Warn);
        assert_eq!(from_log_level(log::Level::Trace), Level::Trace);
    }

    #[test]
    fn test_records_route_to_target_logger() {
        let memory = MemoryAppender::new();
        let context = Arc::new(
            LoggingContext::builder()
                .appender(memory.clone())
                .build()
                .unwrap(),
        );
        let bridge = LogBridge::new(Arc::clone(&context));

        bridge.log(
            &log::Record::builder()
                .args(format_args!("listening on {} @red", 8080))
                .level(log::Level::Info)
                .target("net::server")
                .build(),
        );
        bridge.log(
            &log::Record::builder()
                .args(format_args!("hidden"))
                .level(log::Level::Debug)
                .target("net::server")
                .build(),
        );

        assert_eq!(
            memory.lines(),
            vec!["[INFO] [net::server] listening on 8080 @red".to_string()]
        );
        assert!(context.has_logger("net::server"));
        assert!(bridge.enabled(
            &log::Metadata::builder()
                .level(log::Level::Debug)
                .target("net::server")
                .build()
        ));
    }

    // The only test in this crate that installs a global `log` logger
    #[test]
    fn test_installed_bridge_passes_every_level_to_listeners() {
        let memory = MemoryAppender::new();
        let context = Arc::new(
            LoggingContext::builder()
                .global_level(Level::Info)
                .appender(memory.clone())
                .build()
                .unwrap(),
        );
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let listener = crate::core::ListenerBuilder::new("recorder")
            .on(crate::core::EventKind::Any, move |event| {
                seen_clone.lock().push(event.formatted().to_string());
            })
            .build()
            .unwrap();
        context.add_listener(listener).unwrap();

        LogBridge::install(Arc::clone(&context)).unwrap();
        assert_eq!(log::max_level(), log::LevelFilter::Trace);

        log::debug!(target: "svc", "debug record");
        log::info!(target: "svc", "info record");
        assert_eq!(*seen.lock(), vec!["debug record", "info record"]);
        assert_eq!(memory.lines(), vec!["[INFO] [svc] info record".to_string()]);

        context.set_global_level(Level::Trace);
        log::trace!(target: "svc", "trace record");
        assert_eq!(memory.len(), 2);
        assert!(LogBridge::install(context).is_err());
    }
}
