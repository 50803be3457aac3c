use std::sync::Arc;

use log::{Log, Metadata, Record};

use crate::error::Result;
use crate::log_level::LogLevel;
use crate::logger::Logger;

/// Routes records from the `log` crate macros into a [`Logger`].
///
/// Lets libraries that log through `log::info!` and friends share the same
/// sinks as the application. `Warn` maps to [`LogLevel::Warning`] and `Trace`
/// folds into [`LogLevel::Debug`]. The call site comes from the record's file
/// and line, falling back to its target and line 0.
///
/// ```no_run
/// # use std::sync::Arc;
/// # use sink_logger::{LogBridge, Logger, LogLevel, SinkKind};
/// let logger = Arc::new(Logger::new().unwrap());
/// logger.register_sink(SinkKind::Console, LogLevel::Debug, None).unwrap();
/// LogBridge::new(Arc::clone(&logger), LogLevel::Info).install().unwrap();
///
/// log::info!("routed through the pipeline");
/// log::debug!("filtered out by the bridge");
/// ```
pub struct LogBridge {
    logger: Arc<Logger>,
    max_level: LogLevel,
}

impl LogBridge {
    /// `max_level` is the least severe level forwarded.
    pub fn new(logger: Arc<Logger>, max_level: LogLevel) -> Self {
        Self { logger, max_level }
    }

    /// Registers this bridge as the `log` crate's logger. Can succeed only
    /// once per process.
    pub fn install(self) -> Result<()> {
        let filter = self.max_level.to_level_filter();
        log::set_boxed_logger(Box::new(self)).map(|()| log::set_max_level(filter))?;
        Ok(())
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.max_level.admits(LogLevel::from(metadata.level()))
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let file = record.file().unwrap_or_else(|| record.target());
        let line = record.line().unwrap_or(0);
        self.logger
            .submit(LogLevel::from(record.level()), file, line, *record.args());
    }

    fn flush(&self) {
        Logger::flush(&self.logger);
    }
}
