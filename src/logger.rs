use std::fmt;
use std::path::Path;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::log_level::LogLevel;
use crate::log_record::LogStream;
use crate::pipeline::{Pipeline, PipelineStats};
use crate::sink::{ConsoleSink, FileSink, Sink, SinkKind};

/// Outcome of [`Logger::register_sink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkRegistration {
    /// The sink was created and will receive records from now on.
    Registered,
    /// Nothing was registered: a file sink was requested without a path.
    Skipped,
}

/// Entry point for application code: hands out log streams and owns the
/// [`Pipeline`] they feed.
///
/// A `Logger` is constructed explicitly and shared by reference (or through
/// [`install_global`](crate::install_global)). Dropping it, or calling
/// [`shutdown`](Logger::shutdown), drains pending records and stops the worker.
///
/// Register sinks during setup, before steady-state logging starts. Doing it
/// later is safe but records dispatched before the call are not replayed.
///
/// # Examples
///
/// ```
/// # use sink_logger::{Logger, LogLevel, SinkKind, log_warning};
/// let logger = Logger::new().unwrap();
/// logger.register_sink(SinkKind::Console, LogLevel::Warning, None).unwrap();
///
/// logger.error(file!(), line!()).append("disk ").append("failure");
/// log_warning!(logger, "{} retries left", 2);
///
/// logger.shutdown().unwrap();
/// ```
#[derive(Debug)]
pub struct Logger {
    pipeline: Pipeline,
}

impl Logger {
    /// A logger with an unbounded queue and no sinks.
    pub fn new() -> Result<Self> {
        Self::with_config(PipelineConfig::default())
    }

    /// A logger whose pipeline uses `config`.
    ///
    /// # Errors
    ///
    /// [`LoggerError::Config`](crate::LoggerError::Config) if the configuration
    /// is rejected, [`LoggerError::SpawnWorker`](crate::LoggerError::SpawnWorker)
    /// if the worker thread cannot be started.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sink_logger::{Logger, OverflowPolicy, PipelineConfig};
    /// let config = PipelineConfig::default().bounded(1024, OverflowPolicy::DropOldest);
    /// let logger = Logger::with_config(config).unwrap();
    /// assert_eq!(logger.pipeline().config().queue_capacity, Some(1024));
    /// ```
    pub fn with_config(config: PipelineConfig) -> Result<Self> {
        Ok(Self {
            pipeline: Pipeline::new(config)?,
        })
    }

    /// Starts a record at `file:line`. Text appended to the returned stream
    /// becomes the body; the record is queued when the stream is dropped.
    pub fn log(&self, level: LogLevel, file: &str, line: u32) -> LogStream<'_> {
        self.pipeline.log(level, file, line)
    }

    /// Shorthand for [`log`](Logger::log) at each level. The `log_*!` macros
    /// fill in `file` and `line` for you.
    pub fn error(&self, file: &str, line: u32) -> LogStream<'_> {
        self.log(LogLevel::Error, file, line)
    }

    pub fn warning(&self, file: &str, line: u32) -> LogStream<'_> {
        self.log(LogLevel::Warning, file, line)
    }

    pub fn info(&self, file: &str, line: u32) -> LogStream<'_> {
        self.log(LogLevel::Info, file, line)
    }

    pub fn debug(&self, file: &str, line: u32) -> LogStream<'_> {
        self.log(LogLevel::Debug, file, line)
    }

    /// Queues a complete record built from `args`. Used by the logging macros.
    pub fn submit(&self, level: LogLevel, file: &str, line: u32, args: fmt::Arguments<'_>) {
        self.pipeline.submit(level, file, line, args);
    }

    /// Creates and registers one of the built-in sinks.
    ///
    /// For [`SinkKind::File`] the path is opened (truncated) right away; an
    /// open failure is returned here and nothing is registered. A file sink
    /// requested without a path registers nothing and returns
    /// [`SinkRegistration::Skipped`]. The path is ignored for
    /// [`SinkKind::Console`].
    pub fn register_sink(
        &self,
        kind: SinkKind,
        minimum_level: LogLevel,
        path: Option<&Path>,
    ) -> Result<SinkRegistration> {
        match (kind, path) {
            (SinkKind::Console, _) => {
                self.pipeline.add_sink(minimum_level, ConsoleSink::new());
            }
            (SinkKind::File, Some(path)) => {
                let sink = FileSink::create(path)?;
                self.pipeline.add_sink(minimum_level, sink);
            }
            (SinkKind::File, None) => {
                tracing::warn!(%minimum_level, "file sink requested without a path, nothing registered");
                return Ok(SinkRegistration::Skipped);
            }
        }
        Ok(SinkRegistration::Registered)
    }

    /// Registers a caller-provided sink.
    pub fn add_sink(&self, minimum_level: LogLevel, sink: impl Sink + 'static) {
        self.pipeline.add_sink(minimum_level, sink);
    }

    /// Waits until everything logged so far has reached the sinks.
    pub fn flush(&self) {
        self.pipeline.flush();
    }

    /// Drains pending records and stops the worker. Idempotent.
    pub fn shutdown(&self) -> Result<()> {
        self.pipeline.shutdown()
    }

    /// Counters since the logger was created.
    pub fn stats(&self) -> PipelineStats {
        self.pipeline.stats()
    }

    /// The underlying pipeline, for configuration and sink inspection.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}
