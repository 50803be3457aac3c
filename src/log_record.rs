use std::fmt::{self, Write as _};

use crate::log_level::LogLevel;
use crate::pipeline::Pipeline;

/// One log event: severity, call site, and message text.
///
/// Level and source location are fixed at construction. The body can only be
/// extended through a [`LogStream`] before the record is handed to the queue;
/// once queued, the record is immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    level: LogLevel,
    file: String,
    line: u32,
    body: String,
}

impl LogRecord {
    /// Creates a record with an empty body.
    pub fn new(level: LogLevel, file: impl Into<String>, line: u32) -> Self {
        Self {
            level,
            file: file.into(),
            line,
            body: String::new(),
        }
    }

    /// Creates a record with its complete body.
    pub fn with_body(
        level: LogLevel,
        file: impl Into<String>,
        line: u32,
        body: impl Into<String>,
    ) -> Self {
        Self {
            level,
            file: file.into(),
            line,
            body: body.into(),
        }
    }

    /// Severity the record was created with.
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Source file of the call site.
    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Message text; empty when nothing was appended.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Renders the record as `[<Level>] <file>:<line> <body>`, without a
    /// trailing newline. Sinks add the line terminator.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sink_logger::{LogLevel, LogRecord};
    /// let record = LogRecord::with_body(LogLevel::Warning, "main.rs", 42, "disk almost full");
    /// assert_eq!(record.format_line(), "[Warning] main.rs:42 disk almost full");
    /// ```
    pub fn format_line(&self) -> String {
        let mut line = String::with_capacity(
            self.level.name().len() + self.file.len() + self.body.len() + 16,
        );
        // Writing into a String cannot fail
        let _ = write!(
            line,
            "[{}] {}:{} {}",
            self.level, self.file, self.line, self.body
        );
        line
    }

    pub(crate) fn body_mut(&mut self) -> &mut String {
        &mut self.body
    }
}

/// Scoped builder for a record that is being written.
///
/// Returned by [`Pipeline::log`](crate::Pipeline::log) and the
/// [`Logger`](crate::Logger) level helpers. Text is accumulated on the
/// producer's thread; the finished record is enqueued exactly once, when the
/// stream is [`submit`](LogStream::submit)ted or dropped. The worker never
/// sees a record whose body is still being written.
///
/// # Examples
///
/// ```
/// # use sink_logger::{Logger, LogLevel};
/// use std::fmt::Write;
///
/// let logger = Logger::new().unwrap();
///
/// // Chained appends, enqueued at the end of the statement
/// logger.info(file!(), line!()).append("Count: ").append(3);
///
/// // Or with write!, enqueued when `stream` goes out of scope
/// let mut stream = logger.log(LogLevel::Debug, file!(), line!());
/// write!(stream, "{} of {}", 1, 2).unwrap();
/// stream.submit();
/// # logger.shutdown().unwrap();
/// ```
pub struct LogStream<'a> {
    pipeline: &'a Pipeline,
    record: Option<LogRecord>,
}

impl<'a> LogStream<'a> {
    pub(crate) fn new(pipeline: &'a Pipeline, record: LogRecord) -> Self {
        Self {
            pipeline,
            record: Some(record),
        }
    }

    /// Appends the `Display` output of `value` to the body.
    pub fn append<T: fmt::Display>(mut self, value: T) -> Self {
        let _ = write!(self, "{value}");
        self
    }

    /// The text written so far.
    pub fn body(&self) -> &str {
        self.record.as_ref().map_or("", LogRecord::body)
    }

    /// Finishes the record and hands it to the pipeline now rather than at drop.
    pub fn submit(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if let Some(record) = self.record.take() {
            self.pipeline.enqueue(record);
        }
    }
}

impl fmt::Write for LogStream<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        match self.record.as_mut() {
            Some(record) => {
                record.body_mut().push_str(s);
                Ok(())
            }
            None => Err(fmt::Error),
        }
    }
}

impl Drop for LogStream<'_> {
    fn drop(&mut self) {
        self.finish();
    }
}

impl fmt::Debug for LogStream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogStream")
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}
