//! Process-wide logger registry for the scene bridge
//!
//! Canvases are single-threaded and own their state, so the logger is the
//! only global. It starts as a [`DefaultLogger`] and can be swapped by hosts
//! (editors, test harnesses) at any time.

use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

/// Global logger (initialized lazily with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger::default())))
}

/// Entry point for bridge-wide services (currently logging only).
///
/// # Example
///
/// ```no_run
/// use scene_bridge::scenebridge::{Bridge, log::{Logger, LogEntry}};
///
/// struct ConsolePanel;
/// impl Logger for ConsolePanel {
///     fn log(&self, entry: &LogEntry) {
///         // Forward to an editor panel...
///     }
/// }
///
/// Bridge::set_logger(ConsolePanel);
/// ```
pub struct Bridge;

impl Bridge {
    /// Replace the active logger
    pub fn set_logger<L: Logger + 'static>(logger_impl: L) {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(logger_impl);
        }
    }

    /// Restore the default console logger
    pub fn reset_logger() {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(DefaultLogger::default());
        }
    }

    /// Log a message without location information
    ///
    /// Used by `bridge_trace!` .. `bridge_warn!`.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: None,
            line: None,
        });
    }

    /// Log a message with file:line information
    ///
    /// Used by `bridge_error!` and `bridge_err!`.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: Some(file),
            line: Some(line),
        });
    }

    fn dispatch(entry: LogEntry) {
        // A poisoned lock means a logger panicked; drop the message rather
        // than propagate the panic into scene code.
        if let Ok(lock) = logger().read() {
            lock.log(&entry);
        }
    }
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
