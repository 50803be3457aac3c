use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use sink_logger::{
    log_debug, log_error, log_info, log_warning, Logger, LogLevel, LoggerError, SinkKind,
};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// Demo: logs a few rounds of counters at every level.
///
/// Usage: `sink_logger [ROUNDS] [CONSOLE_LEVEL] [FILE]`
///
/// Lines go to stdout (and to FILE when given, at every level). The pipeline's
/// own diagnostics go to stderr, filtered by `RUST_LOG`.
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_timer(UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), LoggerError> {
    let mut args = env::args().skip(1);
    let rounds = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(5);
    let console_level = match args.next() {
        Some(s) => s.parse::<LogLevel>()?,
        None => LogLevel::Debug,
    };
    let file = args.next().map(PathBuf::from);

    let logger = Logger::new()?;
    logger.register_sink(SinkKind::Console, console_level, None)?;
    if let Some(path) = file.as_deref() {
        logger.register_sink(SinkKind::File, LogLevel::Debug, Some(path))?;
    }

    let mut count = [0u64; 4];
    for _ in 0..rounds {
        log_debug!(logger, "Count: {}", count[0]);
        count[0] += 1;
        log_info!(logger, "Count: {}", count[1]);
        count[1] += 1;
        log_warning!(logger, "Count: {}", count[2]);
        count[2] += 1;
        log_error!(logger, "Count: {}", count[3]);
        count[3] += 1;
    }

    logger.shutdown()?;

    let stats = logger.stats();
    tracing::info!(
        dispatched = stats.dispatched,
        dropped = stats.dropped,
        sink_failures = stats.sink_failures,
        "done"
    );
    Ok(())
}
