//! Process-wide logger access.
//!
//! Code that cannot thread a `&Logger` through its call graph can reach one
//! logger per process here. The host either installs a configured logger up
//! front with [`install_global`], or lets the first [`global`] call build a
//! default one. Statics are never dropped, so the host calls
//! [`shutdown_global`] before exiting to drain what is still queued.
//!
//! # Thread Safety
//!
//! All functions here can be called from any thread. Installation and
//! shutdown take a write lock; lookups take a read lock and clone the `Arc`.

use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::RwLock;

use crate::error::{LoggerError, Result};
use crate::logger::Logger;

lazy_static! {
    /// The installed logger, if any.
    static ref GLOBAL_LOGGER: RwLock<Option<Arc<Logger>>> = RwLock::new(None);
}

/// Installs `logger` as the process-wide logger.
///
/// Fails with [`LoggerError::AlreadyInstalled`] if one is already present,
/// including one created lazily by [`global`].
///
/// # Examples
///
/// ```
/// # use sink_logger::{install_global, shutdown_global, Logger, LogLevel, SinkKind};
/// let logger = Logger::new().unwrap();
/// logger.register_sink(SinkKind::Console, LogLevel::Info, None).unwrap();
/// install_global(logger).unwrap();
///
/// // ... later, before exit
/// shutdown_global().unwrap();
/// ```
pub fn install_global(logger: Logger) -> Result<Arc<Logger>> {
    let mut slot = GLOBAL_LOGGER.write();
    if slot.is_some() {
        return Err(LoggerError::AlreadyInstalled);
    }
    let logger = Arc::new(logger);
    *slot = Some(Arc::clone(&logger));
    Ok(logger)
}

/// Returns the process-wide logger, creating a default one (no sinks,
/// unbounded queue) on first use.
pub fn global() -> Result<Arc<Logger>> {
    // Fast path: already installed
    if let Some(logger) = GLOBAL_LOGGER.read().as_ref() {
        return Ok(Arc::clone(logger));
    }

    // Slow path: recheck under the write lock, another thread may have won
    let mut slot = GLOBAL_LOGGER.write();
    if let Some(logger) = slot.as_ref() {
        return Ok(Arc::clone(logger));
    }
    let logger = Arc::new(Logger::new()?);
    *slot = Some(Arc::clone(&logger));
    Ok(logger)
}

/// Returns the installed logger without creating one.
pub fn try_global() -> Option<Arc<Logger>> {
    GLOBAL_LOGGER.read().as_ref().map(Arc::clone)
}

/// Removes the process-wide logger and shuts it down, draining its queue.
///
/// Handles obtained earlier stay valid; logging through them after this call
/// drops the records. Does nothing if no logger is installed.
pub fn shutdown_global() -> Result<()> {
    let logger = GLOBAL_LOGGER.write().take();
    match logger {
        Some(logger) => logger.shutdown(),
        None => Ok(()),
    }
}
