/// Logs a formatted message at `level`, capturing the call site.
///
/// The body is formatted on the calling thread and the finished record is
/// queued in one step.
///
/// # Arguments
///
/// * `logger` - Anything with a `submit(level, file, line, args)` method:
///   a [`Logger`](crate::Logger), a [`Pipeline`](crate::Pipeline), or a
///   reference / `Arc` to one
/// * `level` - The [`LogLevel`](crate::LogLevel) of the record
/// * `fmt, args...` - A format string and its arguments, as for `format!`
///
/// # Examples
///
/// ```
/// # use sink_logger::{Logger, LogLevel, log_at};
/// let logger = Logger::new().unwrap();
/// log_at!(logger, LogLevel::Info, "listening on port {}", 8080);
/// # logger.shutdown().unwrap();
/// ```
#[macro_export]
macro_rules! log_at {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.submit($level, file!(), line!(), format_args!($($arg)+))
    };
}

/// Logs at [`LogLevel::Error`](crate::LogLevel::Error).
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Logs at [`LogLevel::Warning`](crate::LogLevel::Warning).
#[macro_export]
macro_rules! log_warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Logs at [`LogLevel::Info`](crate::LogLevel::Info).
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Logs at [`LogLevel::Debug`](crate::LogLevel::Debug).
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}
