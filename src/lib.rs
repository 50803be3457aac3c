//! # Sink Logger
//!
//! An in-process asynchronous logging pipeline. Application threads build
//! leveled log records; a single background worker drains them and writes
//! each one to every registered sink whose threshold admits it.
//!
//! * **Non-blocking callers**: producers only take a short queue lock, never
//!   wait on console or file I/O
//! * **Complete records only**: a record is queued once its text is finished,
//!   so the worker never sees a half-written body
//! * **Per-sink thresholds**: each sink has its own minimum severity
//! * **Graceful shutdown**: everything queued before shutdown reaches the sinks
//!
//! ## Main Components
//!
//! * `Logger`: facade handing out log streams and registering sinks
//! * `Pipeline`: the queue, worker thread, and sink fan-out
//! * `Sink`: output capability, with `ConsoleSink` and `FileSink` built in
//! * `LogRecord` / `LogStream`: a log event and its scoped builder
//! * `global`: optional process-wide logger
//! * `LogBridge`: feeds the `log` crate macros into a `Logger`
//!
//! Every line has the form `[<Level>] <file>:<line> <message>`.
//!
//! ## Quick Start
//!
//! ```
//! use sink_logger::{log_info, Logger, LogLevel, SinkKind};
//!
//! let logger = Logger::new().unwrap();
//! logger.register_sink(SinkKind::Console, LogLevel::Debug, None).unwrap();
//!
//! // Stream-style: queued at the end of the statement
//! logger.warning(file!(), line!()).append("Count: ").append(3);
//!
//! // Macro-style: call site captured automatically
//! log_info!(logger, "Temperature: {} C", 25.5);
//!
//! // Drain and stop the worker
//! logger.shutdown().unwrap();
//! ```
//!
//! The queue is unbounded by default; see [`PipelineConfig`] for bounded
//! queues and their [`OverflowPolicy`].

pub mod bridge;
pub mod config;
pub mod error;
pub mod global;
pub mod log_level;
pub mod log_record;
pub mod logger;
mod macros;
pub mod pipeline;
pub mod sink;

pub use bridge::LogBridge;
pub use config::{OverflowPolicy, PipelineConfig};
pub use error::{LoggerError, Result};
pub use global::{global, install_global, shutdown_global, try_global};
pub use log_level::LogLevel;
pub use log_record::{LogRecord, LogStream};
pub use logger::{Logger, SinkRegistration};
pub use pipeline::{Pipeline, PipelineStats};
pub use sink::{ConsoleSink, FileSink, Sink, SinkKind};
