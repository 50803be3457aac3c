use parking_lot::Mutex;
use sink_logger::{LogLevel, OverflowPolicy, Pipeline, PipelineConfig, Sink};
use std::collections::HashMap;
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

struct CollectingSink {
    lines: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
}

impl CollectingSink {
    fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = Self {
            lines: lines.clone(),
            delay: None,
        };
        (sink, lines)
    }

    fn slow(delay: Duration) -> (Self, Arc<Mutex<Vec<String>>>) {
        let (mut sink, lines) = Self::new();
        sink.delay = Some(delay);
        (sink, lines)
    }
}

impl Sink for CollectingSink {
    fn print(&mut self, line: &str) -> io::Result<()> {
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        self.lines.lock().push(line.to_string());
        Ok(())
    }
}

struct FailingSink;

impl Sink for FailingSink {
    fn print(&mut self, _line: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Other, "disk full"))
    }
}

struct PanickingSink;

impl Sink for PanickingSink {
    fn print(&mut self, _line: &str) -> io::Result<()> {
        panic!("sink exploded");
    }
}

/// Blocks inside its first `print` until the test releases it, so the worker
/// can be parked while the queue fills up.
struct GateSink {
    entered: Sender<()>,
    release: Receiver<()>,
    gated: bool,
    lines: Arc<Mutex<Vec<String>>>,
}

impl GateSink {
    fn new() -> (Self, Receiver<()>, Sender<()>, Arc<Mutex<Vec<String>>>) {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = Self {
            entered: entered_tx,
            release: release_rx,
            gated: true,
            lines: lines.clone(),
        };
        (sink, entered_rx, release_tx, lines)
    }
}

impl Sink for GateSink {
    fn print(&mut self, line: &str) -> io::Result<()> {
        if self.gated {
            self.gated = false;
            let _ = self.entered.send(());
            let _ = self.release.recv();
        }
        self.lines.lock().push(line.to_string());
        Ok(())
    }
}

fn new_pipeline() -> Pipeline {
    Pipeline::new(PipelineConfig::default()).unwrap()
}

#[test]
fn test_fifo_order_single_producer() {
    let pipeline = new_pipeline();
    let (sink, lines) = CollectingSink::new();
    pipeline.add_sink(LogLevel::Debug, sink);

    for i in 0..100u32 {
        let level = LogLevel::ALL[i as usize % 4];
        pipeline.submit(level, "src/app.rs", i, format_args!("message {}", i));
    }
    pipeline.shutdown().unwrap();

    let expected: Vec<String> = (0..100u32)
        .map(|i| format!("[{}] src/app.rs:{} message {}", LogLevel::ALL[i as usize % 4], i, i))
        .collect();
    assert_eq!(*lines.lock(), expected, "Lines should arrive in submission order");
}

#[test]
fn test_level_filtering() {
    let pipeline = new_pipeline();
    let (sink, lines) = CollectingSink::new();
    pipeline.add_sink(LogLevel::Warning, sink);

    for i in 0..10 {
        for level in LogLevel::ALL {
            pipeline.log(level, "filter.rs", i).append("payload");
        }
    }
    pipeline.shutdown().unwrap();

    let lines = lines.lock();
    assert_eq!(lines.len(), 20, "Only Error and Warning records should pass");
    for line in lines.iter() {
        assert!(
            line.starts_with("[Error]") || line.starts_with("[Warning]"),
            "Unexpected line: {}",
            line
        );
    }
    assert_eq!(lines.iter().filter(|l| l.starts_with("[Error]")).count(), 10);
}

#[test]
fn test_fan_out_to_every_admitting_sink() {
    let pipeline = new_pipeline();
    let (first, first_lines) = CollectingSink::new();
    let (second, second_lines) = CollectingSink::new();
    let (strict, strict_lines) = CollectingSink::new();
    pipeline.add_sink(LogLevel::Info, first);
    pipeline.add_sink(LogLevel::Debug, second);
    pipeline.add_sink(LogLevel::Error, strict);

    pipeline.log(LogLevel::Info, "fan.rs", 9).append("hello");
    pipeline.shutdown().unwrap();

    assert_eq!(*first_lines.lock(), vec!["[Info] fan.rs:9 hello".to_string()]);
    assert_eq!(*second_lines.lock(), vec!["[Info] fan.rs:9 hello".to_string()]);
    assert!(strict_lines.lock().is_empty(), "Error-only sink should not see Info");
}

#[test]
fn test_shutdown_drains_queue() {
    let pipeline = new_pipeline();
    let (sink, lines) = CollectingSink::slow(Duration::from_millis(1));
    pipeline.add_sink(LogLevel::Debug, sink);

    const K: usize = 200;
    for i in 0..K {
        pipeline.submit(LogLevel::Info, "drain.rs", 1, format_args!("{}", i));
    }
    pipeline.shutdown().unwrap();

    let lines = lines.lock();
    assert_eq!(lines.len(), K, "Every record queued before shutdown must be written");
    assert_eq!(lines[K - 1], format!("[Info] drain.rs:1 {}", K - 1));

    let stats = pipeline.stats();
    assert_eq!(stats.enqueued, K as u64);
    assert_eq!(stats.dispatched, K as u64);
    assert_eq!(stats.pending, 0);
}

#[test]
fn test_drop_drains_queue() {
    let (sink, lines) = CollectingSink::slow(Duration::from_micros(200));

    const K: usize = 500;
    {
        let pipeline = new_pipeline();
        pipeline.add_sink(LogLevel::Debug, sink);
        for i in 0..K {
            pipeline.submit(LogLevel::Debug, "scope.rs", 7, format_args!("{}", i));
        }
    }

    let lines = lines.lock();
    assert_eq!(lines.len(), K, "Dropping the pipeline must drain the queue");
    assert_eq!(lines[0], "[Debug] scope.rs:7 0");
    assert_eq!(lines[K - 1], format!("[Debug] scope.rs:7 {}", K - 1));
}

#[test]
fn test_concurrent_producers() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 50;

    let pipeline = Arc::new(new_pipeline());
    let (sink, lines) = CollectingSink::new();
    pipeline.add_sink(LogLevel::Debug, sink);

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let pipeline = pipeline.clone();
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    pipeline
                        .log(LogLevel::Info, "worker.rs", t as u32)
                        .append("thread-")
                        .append(t)
                        .append("-msg-")
                        .append(i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    pipeline.shutdown().unwrap();

    let lines = lines.lock();
    assert_eq!(lines.len(), THREADS * PER_THREAD);

    // Every message intact, and each producer's own records stay in order
    let mut next_expected: HashMap<usize, usize> = HashMap::new();
    for line in lines.iter() {
        let body = line
            .strip_prefix("[Info] worker.rs:")
            .and_then(|rest| rest.split_once(' '))
            .map(|(_, body)| body)
            .unwrap_or_else(|| panic!("Mangled line: {}", line));
        let rest = body.strip_prefix("thread-").unwrap();
        let (t, i) = rest.split_once("-msg-").unwrap();
        let (t, i): (usize, usize) = (t.parse().unwrap(), i.parse().unwrap());

        let expected = next_expected.entry(t).or_insert(0);
        assert_eq!(i, *expected, "Records from thread {} out of order", t);
        *expected += 1;
    }
    assert_eq!(next_expected.len(), THREADS);
    assert!(next_expected.values().all(|&n| n == PER_THREAD));
}

#[test]
fn test_idle_worker_writes_nothing() {
    let pipeline = new_pipeline();
    let (sink, lines) = CollectingSink::new();
    pipeline.add_sink(LogLevel::Debug, sink);

    thread::sleep(Duration::from_millis(50));
    pipeline.flush();

    assert!(lines.lock().is_empty(), "No records, no output");
    assert_eq!(pipeline.stats().dispatched, 0);
    pipeline.shutdown().unwrap();
    assert!(lines.lock().is_empty());
}

#[test]
fn test_failing_sink_does_not_stop_others() {
    let pipeline = new_pipeline();
    let (sink, lines) = CollectingSink::new();
    pipeline.add_sink(LogLevel::Debug, FailingSink);
    pipeline.add_sink(LogLevel::Debug, sink);

    for i in 0..5 {
        pipeline.submit(LogLevel::Error, "io.rs", i, format_args!("attempt {}", i));
    }
    pipeline.flush();

    assert_eq!(lines.lock().len(), 5, "Healthy sink should receive every line");
    assert_eq!(pipeline.stats().sink_failures, 5);
    assert!(pipeline.is_running(), "Worker should survive sink errors");

    pipeline.submit(LogLevel::Error, "io.rs", 99, format_args!("after failures"));
    pipeline.shutdown().unwrap();
    assert_eq!(lines.lock().last().unwrap(), "[Error] io.rs:99 after failures");
}

#[test]
fn test_panicking_sink_is_isolated() {
    let pipeline = new_pipeline();
    let (sink, lines) = CollectingSink::new();
    pipeline.add_sink(LogLevel::Debug, PanickingSink);
    pipeline.add_sink(LogLevel::Debug, sink);

    pipeline.log(LogLevel::Warning, "boom.rs", 1).append("first");
    pipeline.log(LogLevel::Warning, "boom.rs", 2).append("second");
    pipeline.shutdown().unwrap();

    assert_eq!(
        *lines.lock(),
        vec![
            "[Warning] boom.rs:1 first".to_string(),
            "[Warning] boom.rs:2 second".to_string(),
        ]
    );
    assert_eq!(pipeline.stats().sink_failures, 2);
}

#[test]
fn test_flush_waits_for_dispatch() {
    let pipeline = new_pipeline();
    let (sink, lines) = CollectingSink::slow(Duration::from_millis(1));
    pipeline.add_sink(LogLevel::Debug, sink);

    for i in 0..50 {
        pipeline.submit(LogLevel::Debug, "flush.rs", i, format_args!("n={}", i));
    }
    pipeline.flush();

    assert_eq!(lines.lock().len(), 50, "Flush should return only after all lines are written");
    assert!(pipeline.is_running());
}

#[test]
fn test_empty_body_is_dispatched() {
    let pipeline = new_pipeline();
    let (sink, lines) = CollectingSink::new();
    pipeline.add_sink(LogLevel::Debug, sink);

    pipeline.log(LogLevel::Info, "a.rs", 3).submit();
    pipeline.shutdown().unwrap();

    assert_eq!(*lines.lock(), vec!["[Info] a.rs:3 ".to_string()]);
}

#[test]
fn test_records_after_shutdown_are_dropped() {
    let pipeline = new_pipeline();
    let (sink, lines) = CollectingSink::new();
    pipeline.add_sink(LogLevel::Debug, sink);

    pipeline.shutdown().unwrap();
    pipeline.log(LogLevel::Error, "late.rs", 1).append("too late");

    assert!(lines.lock().is_empty());
    assert_eq!(pipeline.stats().dropped, 1);
    assert!(!pipeline.is_running());

    // Second shutdown is a no-op
    pipeline.shutdown().unwrap();
}

#[test]
fn test_drop_oldest_when_full() {
    let config = PipelineConfig::default().bounded(2, OverflowPolicy::DropOldest);
    let pipeline = Pipeline::new(config).unwrap();
    let (sink, entered, release, lines) = GateSink::new();
    pipeline.add_sink(LogLevel::Debug, sink);

    pipeline.log(LogLevel::Info, "q.rs", 0).append("first");
    entered.recv().unwrap();

    for (i, body) in ["a", "b", "c", "d"].iter().enumerate() {
        pipeline.log(LogLevel::Info, "q.rs", i as u32 + 1).append(body);
    }
    assert_eq!(pipeline.stats().pending, 2);

    release.send(()).unwrap();
    pipeline.shutdown().unwrap();

    assert_eq!(
        *lines.lock(),
        vec![
            "[Info] q.rs:0 first".to_string(),
            "[Info] q.rs:3 c".to_string(),
            "[Info] q.rs:4 d".to_string(),
        ]
    );
    assert_eq!(pipeline.stats().dropped, 2);
}

#[test]
fn test_drop_newest_when_full() {
    let config = PipelineConfig::default().bounded(2, OverflowPolicy::DropNewest);
    let pipeline = Pipeline::new(config).unwrap();
    let (sink, entered, release, lines) = GateSink::new();
    pipeline.add_sink(LogLevel::Debug, sink);

    pipeline.log(LogLevel::Info, "q.rs", 0).append("first");
    entered.recv().unwrap();

    for (i, body) in ["a", "b", "c", "d"].iter().enumerate() {
        pipeline.log(LogLevel::Info, "q.rs", i as u32 + 1).append(body);
    }

    release.send(()).unwrap();
    pipeline.shutdown().unwrap();

    assert_eq!(
        *lines.lock(),
        vec![
            "[Info] q.rs:0 first".to_string(),
            "[Info] q.rs:1 a".to_string(),
            "[Info] q.rs:2 b".to_string(),
        ]
    );
    assert_eq!(pipeline.stats().dropped, 2);
}

#[test]
fn test_block_waits_for_room() {
    let config = PipelineConfig::default().bounded(1, OverflowPolicy::Block);
    let pipeline = Arc::new(Pipeline::new(config).unwrap());
    let (sink, entered, release, lines) = GateSink::new();
    pipeline.add_sink(LogLevel::Debug, sink);

    pipeline.log(LogLevel::Info, "q.rs", 0).append("first");
    entered.recv().unwrap();

    let (done_tx, done_rx) = mpsc::channel();
    let producer = {
        let pipeline = pipeline.clone();
        thread::spawn(move || {
            pipeline.log(LogLevel::Info, "q.rs", 1).append("a");
            pipeline.log(LogLevel::Info, "q.rs", 2).append("b");
            done_tx.send(()).unwrap();
        })
    };

    // Second record cannot fit while the worker is parked
    assert!(done_rx.recv_timeout(Duration::from_millis(100)).is_err());

    release.send(()).unwrap();
    producer.join().unwrap();
    pipeline.shutdown().unwrap();

    assert_eq!(
        *lines.lock(),
        vec![
            "[Info] q.rs:0 first".to_string(),
            "[Info] q.rs:1 a".to_string(),
            "[Info] q.rs:2 b".to_string(),
        ]
    );
    assert_eq!(pipeline.stats().dropped, 0);
}

#[test]
fn test_worker_thread_name() {
    struct ThreadNameSink(Arc<Mutex<Option<String>>>);

    impl Sink for ThreadNameSink {
        fn print(&mut self, _line: &str) -> io::Result<()> {
            *self.0.lock() = thread::current().name().map(str::to_string);
            Ok(())
        }
    }

    let name = Arc::new(Mutex::new(None));
    let pipeline = Pipeline::new(PipelineConfig::default().thread_name("audit-log")).unwrap();
    pipeline.add_sink(LogLevel::Debug, ThreadNameSink(name.clone()));

    pipeline.log(LogLevel::Debug, "t.rs", 1).append("x");
    pipeline.shutdown().unwrap();

    assert_eq!(name.lock().as_deref(), Some("audit-log"));
}

#[test]
fn test_invalid_config_rejected() {
    let config = PipelineConfig::default().bounded(0, OverflowPolicy::DropOldest);
    assert!(Pipeline::new(config).is_err());
}
