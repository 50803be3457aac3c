use std::io;
use std::path::PathBuf;

/// Errors surfaced to callers of the logging pipeline.
///
/// Everything here is reported synchronously on the calling thread. Failures
/// that happen on the worker (a sink failing to write) never show up as a
/// `LoggerError`; they are counted and reported through `tracing`.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// A file sink's target could not be opened for writing.
    #[error("failed to open log file {}: {source}", .path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The background worker thread could not be started.
    #[error("failed to spawn logging worker: {0}")]
    SpawnWorker(#[source] io::Error),

    /// The worker thread panicked and could not be joined cleanly.
    #[error("logging worker panicked")]
    WorkerPanicked,

    /// The pipeline configuration is invalid.
    #[error("invalid pipeline configuration: {0}")]
    Config(String),

    /// Text or a raw tag that names no known severity.
    #[error("unknown log level: {0}")]
    UnknownLevel(String),

    /// A process-wide logger has already been installed.
    #[error("a global logger is already installed")]
    AlreadyInstalled,

    /// The `log` facade already has a logger registered.
    #[error("failed to install log bridge: {0}")]
    Bridge(#[from] log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, LoggerError>;
