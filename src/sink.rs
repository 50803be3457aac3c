use std::fs::File;
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{LoggerError, Result};
use crate::log_level::LogLevel;

/// Destination for formatted log lines.
///
/// The pipeline formats each record once and calls `print` on every sink
/// whose threshold admits the record, so implementations never see lines they
/// are not meant to emit and never do their own level filtering. All calls
/// come from the single worker thread.
///
/// An `Err` or a panic from `print` stays local to that sink: the line still
/// reaches the remaining sinks and the worker keeps running.
///
/// # Usage
///
/// ```
/// # use sink_logger::Sink;
/// # use std::io;
/// // Keeps lines in memory, e.g. for a status panel
/// struct MemorySink(Vec<String>);
///
/// impl Sink for MemorySink {
///     fn print(&mut self, line: &str) -> io::Result<()> {
///         self.0.push(line.to_string());
///         Ok(())
///     }
/// }
/// ```
pub trait Sink: Send {
    /// Writes one formatted line. The implementation adds the line terminator.
    fn print(&mut self, line: &str) -> io::Result<()>;

    /// Pushes buffered output to the underlying device. Called when the
    /// pipeline shuts down.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Label used in diagnostics about this sink.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// The built-in sink variants selectable at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    Console,
    File,
}

/// Writes each line plus a newline to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for ConsoleSink {
    fn print(&mut self, line: &str) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        out.write_all(line.as_bytes())?;
        out.write_all(b"\n")
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }

    fn name(&self) -> &str {
        "console"
    }
}

/// Writes each line plus a newline to a file opened at construction.
///
/// The file is created or truncated. Output is flushed at every newline, so a
/// line is on disk once `print` returns.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    label: String,
    out: LineWriter<File>,
}

impl FileSink {
    /// Opens `path` for writing, truncating existing content.
    ///
    /// Fails immediately if the path cannot be opened, so a misconfigured sink
    /// is reported to whoever registers it rather than on first write.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|source| LoggerError::OpenFile {
            path: path.clone(),
            source,
        })?;
        let label = format!("file:{}", path.display());
        Ok(Self {
            path,
            label,
            out: LineWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn print(&mut self, line: &str) -> io::Result<()> {
        self.out.write_all(line.as_bytes())?;
        self.out.write_all(b"\n")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn name(&self) -> &str {
        &self.label
    }
}

/// A registered sink together with its minimum level.
pub(crate) struct FilteredSink {
    minimum_level: LogLevel,
    sink: Box<dyn Sink>,
}

impl FilteredSink {
    pub(crate) fn new(minimum_level: LogLevel, sink: Box<dyn Sink>) -> Self {
        Self {
            minimum_level,
            sink,
        }
    }

    #[inline]
    pub(crate) fn accepts(&self, level: LogLevel) -> bool {
        self.minimum_level.admits(level)
    }

    pub(crate) fn sink_mut(&mut self) -> &mut dyn Sink {
        self.sink.as_mut()
    }

    pub(crate) fn name(&self) -> &str {
        self.sink.name()
    }
}
