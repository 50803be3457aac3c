use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};

use crate::config::{OverflowPolicy, PipelineConfig};
use crate::error::{LoggerError, Result};
use crate::log_level::LogLevel;
use crate::log_record::{LogRecord, LogStream};
use crate::sink::{FilteredSink, Sink};

/// The queue, its single consumer thread, and the registered sinks.
///
/// Any number of threads submit finished [`LogRecord`]s; one background
/// worker pops them in FIFO order, formats each once, and hands the line to
/// every sink whose threshold admits the record.
///
/// # Locking
///
/// The queue lock is held only to push or pop a record. Formatting and sink
/// I/O happen outside it, so a slow sink never blocks producers. Sinks sit
/// behind a separate lock shared by the worker and sink registration.
///
/// # Lifecycle
///
/// The worker starts in [`Pipeline::new`]. [`Pipeline::shutdown`] (also run on
/// drop) stops accepting records, lets the worker drain everything already
/// queued, flushes the sinks, and joins the thread.
///
/// # Examples
///
/// ```
/// # use sink_logger::{ConsoleSink, LogLevel, Pipeline, PipelineConfig};
/// let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
/// pipeline.add_sink(LogLevel::Info, ConsoleSink::new());
///
/// pipeline.log(LogLevel::Info, file!(), line!()).append("ready");
/// pipeline.shutdown().unwrap();
/// ```
pub struct Pipeline {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
    config: PipelineConfig,
}

/// Counters describing what a pipeline has done so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineStats {
    /// Records accepted into the queue.
    pub enqueued: u64,
    /// Records the worker has fanned out to the sinks.
    pub dispatched: u64,
    /// Records discarded by an overflow policy or submitted after shutdown.
    pub dropped: u64,
    /// Individual sink writes that returned an error or panicked.
    pub sink_failures: u64,
    /// Records currently waiting in the queue.
    pub pending: usize,
}

struct Shared {
    state: Mutex<QueueState>,
    // Signalled on push and on stop
    available: Condvar,
    // Signalled on pop, for producers blocked on a full bounded queue
    space: Condvar,
    // Signalled whenever the worker goes idle or exits
    drained: Condvar,
    sinks: Mutex<Vec<FilteredSink>>,
    counters: Counters,
}

struct QueueState {
    queue: VecDeque<LogRecord>,
    running: bool,
    in_flight: bool,
    worker_exited: bool,
}

#[derive(Default)]
struct Counters {
    enqueued: AtomicU64,
    dispatched: AtomicU64,
    dropped: AtomicU64,
    sink_failures: AtomicU64,
}

impl Pipeline {
    /// Validates `config` and starts the worker thread.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;

        let shared = Arc::new(Shared {
            state: Mutex::new(QueueState {
                queue: VecDeque::new(),
                running: true,
                in_flight: false,
                worker_exited: false,
            }),
            available: Condvar::new(),
            space: Condvar::new(),
            drained: Condvar::new(),
            sinks: Mutex::new(Vec::new()),
            counters: Counters::default(),
        });

        let worker_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || worker_shared.run())
            .map_err(LoggerError::SpawnWorker)?;

        tracing::debug!(thread = %config.thread_name, "logging worker started");

        Ok(Self {
            shared,
            worker: Mutex::new(Some(handle)),
            config,
        })
    }

    /// Starts a record at the given call site. The record is queued when the
    /// returned stream is submitted or dropped.
    pub fn log(&self, level: LogLevel, file: &str, line: u32) -> LogStream<'_> {
        LogStream::new(self, LogRecord::new(level, file, line))
    }

    /// Builds a complete record from `args` and queues it.
    pub fn submit(&self, level: LogLevel, file: &str, line: u32, args: fmt::Arguments<'_>) {
        let body = match args.as_str() {
            Some(s) => s.to_string(),
            None => args.to_string(),
        };
        self.enqueue(LogRecord::with_body(level, file, line, body));
    }

    /// Registers a sink that receives every record at least as severe as
    /// `minimum_level`. Sinks are called in registration order.
    pub fn add_sink(&self, minimum_level: LogLevel, sink: impl Sink + 'static) {
        self.add_boxed_sink(minimum_level, Box::new(sink));
    }

    /// Same as [`add_sink`](Pipeline::add_sink) for an already boxed sink.
    pub fn add_boxed_sink(&self, minimum_level: LogLevel, sink: Box<dyn Sink>) {
        tracing::debug!(sink = sink.name(), %minimum_level, "sink registered");
        self.shared
            .sinks
            .lock()
            .push(FilteredSink::new(minimum_level, sink));
    }

    /// Number of registered sinks.
    pub fn sink_count(&self) -> usize {
        self.shared.sinks.lock().len()
    }

    /// Appends a finished record to the back of the queue and wakes the worker.
    ///
    /// With an unbounded queue this never waits. With a bounded queue the
    /// configured [`OverflowPolicy`] decides what happens when it is full.
    pub fn enqueue(&self, record: LogRecord) {
        let counters = &self.shared.counters;
        let mut state = self.shared.state.lock();

        if !state.running {
            drop(state);
            counters.dropped.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(level = %record.level(), "record submitted after shutdown dropped");
            return;
        }

        if let Some(capacity) = self.config.queue_capacity {
            if state.queue.len() >= capacity {
                match self.config.overflow {
                    OverflowPolicy::Block => {
                        while state.running && state.queue.len() >= capacity {
                            self.shared.space.wait(&mut state);
                        }
                        if !state.running {
                            drop(state);
                            counters.dropped.fetch_add(1, Ordering::Relaxed);
                            return;
                        }
                    }
                    OverflowPolicy::DropOldest => {
                        state.queue.pop_front();
                        counters.dropped.fetch_add(1, Ordering::Relaxed);
                    }
                    OverflowPolicy::DropNewest => {
                        drop(state);
                        counters.dropped.fetch_add(1, Ordering::Relaxed);
                        return;
                    }
                }
            }
        }

        state.queue.push_back(record);
        counters.enqueued.fetch_add(1, Ordering::Relaxed);
        drop(state);
        self.shared.available.notify_one();
    }

    /// Blocks until every record queued before this call has been handed to
    /// the sinks, or the worker has exited.
    pub fn flush(&self) {
        let mut state = self.shared.state.lock();
        while !state.worker_exited && (!state.queue.is_empty() || state.in_flight) {
            self.shared.drained.wait(&mut state);
        }
    }

    /// Stops the pipeline after draining the queue.
    ///
    /// Records queued before the call are all dispatched; records submitted
    /// afterwards are dropped. Calling this more than once is harmless.
    pub fn shutdown(&self) -> Result<()> {
        {
            let mut state = self.shared.state.lock();
            state.running = false;
        }
        self.shared.available.notify_all();
        self.shared.space.notify_all();

        let handle = self.worker.lock().take();
        match handle {
            Some(handle) => {
                handle.join().map_err(|_| LoggerError::WorkerPanicked)?;
                tracing::debug!(thread = %self.config.thread_name, "logging worker stopped");
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// `false` once [`shutdown`](Pipeline::shutdown) has been requested or the
    /// worker has exited.
    pub fn is_running(&self) -> bool {
        self.shared.state.lock().running
    }

    /// Snapshot of the pipeline counters.
    ///
    /// The counters are read independently, so while producers are active the
    /// fields may not add up exactly. After `shutdown` they are final.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sink_logger::{Pipeline, PipelineConfig, LogLevel};
    /// let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    /// pipeline.log(LogLevel::Info, "main.rs", 1).append("no sinks yet");
    /// pipeline.shutdown().unwrap();
    ///
    /// let stats = pipeline.stats();
    /// assert_eq!(stats.enqueued, 1);
    /// assert_eq!(stats.dispatched, 1);
    /// assert_eq!(stats.pending, 0);
    /// ```
    pub fn stats(&self) -> PipelineStats {
        let pending = self.shared.state.lock().queue.len();
        let counters = &self.shared.counters;
        PipelineStats {
            enqueued: counters.enqueued.load(Ordering::Relaxed),
            dispatched: counters.dispatched.load(Ordering::Relaxed),
            dropped: counters.dropped.load(Ordering::Relaxed),
            sink_failures: counters.sink_failures.load(Ordering::Relaxed),
            pending,
        }
    }

    /// The configuration the pipeline was started with.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            tracing::error!(error = %err, "logging pipeline did not shut down cleanly");
        }
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl Shared {
    /// Worker loop: pop, dispatch, repeat. Keeps going after the run flag is
    /// cleared until the queue is empty.
    fn run(&self) {
        let _exit = ExitSignal(self);

        while let Some(record) = self.next_record() {
            self.space.notify_one();
            self.dispatch(&record);
            self.state.lock().in_flight = false;
        }

        self.flush_sinks();
    }

    /// Waits for the next record. Returns `None` once stopped and drained.
    fn next_record(&self) -> Option<LogRecord> {
        let mut state = self.state.lock();
        loop {
            if let Some(record) = state.queue.pop_front() {
                state.in_flight = true;
                return Some(record);
            }
            if !state.running {
                return None;
            }
            self.drained.notify_all();
            self.available.wait(&mut state);
        }
    }

    /// Formats the record once and writes it to every admitting sink. A sink
    /// that errors or panics is reported and skipped; the others still run.
    fn dispatch(&self, record: &LogRecord) {
        let line = record.format_line();
        let mut sinks = self.sinks.lock();

        for (index, entry) in sinks.iter_mut().enumerate() {
            if !entry.accepts(record.level()) {
                continue;
            }
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| entry.sink_mut().print(&line)));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    self.counters.sink_failures.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(sink = entry.name(), index, error = %err, "sink write failed");
                }
                Err(_) => {
                    self.counters.sink_failures.fetch_add(1, Ordering::Relaxed);
                    tracing::error!(sink = entry.name(), index, "sink panicked while writing");
                }
            }
        }

        self.counters.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    fn flush_sinks(&self) {
        let mut sinks = self.sinks.lock();
        for entry in sinks.iter_mut() {
            match panic::catch_unwind(AssertUnwindSafe(|| entry.sink_mut().flush())) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    tracing::warn!(sink = entry.name(), error = %err, "sink flush failed");
                }
                Err(_) => {
                    tracing::error!(sink = entry.name(), "sink panicked while flushing");
                }
            }
        }
    }
}

/// Marks the worker as gone, even if it unwinds, so `flush` callers and
/// producers blocked on a full queue are released.
struct ExitSignal<'a>(&'a Shared);

impl Drop for ExitSignal<'_> {
    fn drop(&mut self) {
        {
            let mut state = self.0.state.lock();
            state.running = false;
            state.in_flight = false;
            state.worker_exited = true;
        }
        self.0.drained.notify_all();
        self.0.space.notify_all();
    }
}
