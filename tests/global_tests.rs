use parking_lot::Mutex;
use sink_logger::{
    global, install_global, log_info, shutdown_global, try_global, Logger, LoggerError, LogLevel,
    Sink,
};
use std::io;
use std::sync::Arc;

struct CollectingSink(Arc<Mutex<Vec<String>>>);

impl Sink for CollectingSink {
    fn print(&mut self, line: &str) -> io::Result<()> {
        self.0.lock().push(line.to_string());
        Ok(())
    }
}

// The process-wide slot is shared by every test in this binary, so the whole
// lifecycle runs as one sequence.
#[test]
fn test_global_lifecycle() {
    assert!(try_global().is_none(), "Nothing installed yet");

    // Explicit installation
    let lines = Arc::new(Mutex::new(Vec::new()));
    let logger = Logger::new().unwrap();
    logger.add_sink(LogLevel::Debug, CollectingSink(lines.clone()));
    let installed = install_global(logger).unwrap();

    let fetched = global().unwrap();
    assert!(Arc::ptr_eq(&installed, &fetched), "Lookups return the installed logger");

    let again = install_global(Logger::new().unwrap());
    assert!(matches!(again, Err(LoggerError::AlreadyInstalled)));

    log_info!(global().unwrap(), "from anywhere {}", 1);
    shutdown_global().unwrap();

    assert_eq!(lines.lock().len(), 1, "Shutdown drains the global queue");
    assert!(lines.lock()[0].ends_with("from anywhere 1"));
    assert!(try_global().is_none());

    // Old handles stay usable but drop their records
    fetched.info(file!(), line!()).append("after shutdown");
    assert_eq!(fetched.stats().dropped, 1);

    // Lazy creation on first access
    let lazy = global().unwrap();
    assert!(lazy.pipeline().is_running());
    assert_eq!(lazy.pipeline().sink_count(), 0);
    assert!(Arc::ptr_eq(&lazy, &global().unwrap()));
    assert!(matches!(
        install_global(Logger::new().unwrap()),
        Err(LoggerError::AlreadyInstalled)
    ));

    shutdown_global().unwrap();
    assert!(!lazy.pipeline().is_running());

    // Shutting down with nothing installed is fine
    shutdown_global().unwrap();
}
