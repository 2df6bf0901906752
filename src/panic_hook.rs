//! Uncaught panic capture
//!
//! Routes panics through a logger as exception-level events, then hands the
//! panic to the previously installed hook.

use crate::core::dispatcher::is_writing_console;
use crate::core::error::panic_message;
use crate::core::{Argument, Logger, Throwable};
use std::cell::Cell;
use std::thread;

thread_local! {
    static IN_HOOK: Cell<bool> = const { Cell::new(false) };
}

pub struct PanicHook {}

impl PanicHook {
    /// Install a process-wide panic hook that logs through `logger`
    ///
    /// The event carries the panic message and its source location as a
    /// throwable, so it is always exception level. A panic raised while the
    /// hook itself is logging, or while an appender is writing on the same
    /// thread, is only passed on to the previous hook.
    pub fn install(logger: Logger) {
        let previous = std::panic::take_hook();

        std::panic::set_hook(Box::new(move |info| {
            let reentrant = IN_HOOK.with(|flag| flag.replace(true));

            if !reentrant && !is_writing_console() {
                let message = panic_message(info.payload());
                let frames = info
                    .location()
                    .map(|l| vec![format!("{}:{}:{}", l.file(), l.line(), l.column())])
                    .unwrap_or_default();

                let current = thread::current();
                logger.exception(
                    "Uncaught panic in thread '{}': {}",
                    vec![
                        Argument::from(current.name().unwrap_or("<unnamed>")),
                        Argument::from(Throwable::with_frames(message, frames)),
                    ],
                );
            }

            if !reentrant {
                IN_HOOK.with(|flag| flag.set(false));
            }

            previous(info);
        }));
    }
}
