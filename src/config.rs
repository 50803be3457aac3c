use crate::error::{LoggerError, Result};

/// Default name of the worker thread.
pub const DEFAULT_THREAD_NAME: &str = "sink-logger";

/// What a producer does when a bounded queue is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Wait until the worker makes room. The only policy that never loses records.
    #[default]
    Block,
    /// Evict the oldest pending record to make room for the new one.
    DropOldest,
    /// Discard the record being submitted.
    DropNewest,
}

/// Settings for a [`Pipeline`](crate::Pipeline).
///
/// The default is an unbounded queue: producers never wait, and a producer
/// that outpaces the sinks grows memory without limit.
///
/// ```
/// # use sink_logger::{OverflowPolicy, PipelineConfig};
/// let config = PipelineConfig::default()
///     .bounded(10_000, OverflowPolicy::DropOldest)
///     .thread_name("audit-log");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Maximum number of pending records; `None` for no limit.
    pub queue_capacity: Option<usize>,
    /// Applied when a bounded queue is full. Ignored when unbounded.
    pub overflow: OverflowPolicy,
    /// Name given to the worker thread.
    pub thread_name: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            queue_capacity: None,
            overflow: OverflowPolicy::default(),
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Caps the number of pending records and sets what happens beyond the cap.
    pub fn bounded(mut self, capacity: usize, overflow: OverflowPolicy) -> Self {
        self.queue_capacity = Some(capacity);
        self.overflow = overflow;
        self
    }

    /// Removes any cap on the number of pending records.
    pub fn unbounded(mut self) -> Self {
        self.queue_capacity = None;
        self
    }

    /// Names the worker thread, as shown by debuggers and panic messages.
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Checks the settings before a pipeline is started with them.
    ///
    /// # Errors
    ///
    /// [`LoggerError::Config`] for a zero capacity or a thread name containing
    /// a NUL byte.
    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == Some(0) {
            return Err(LoggerError::Config(
                "queue capacity must be at least 1".to_string(),
            ));
        }
        if self.thread_name.contains('\0') {
            return Err(LoggerError::Config(
                "thread name must not contain NUL bytes".to_string(),
            ));
        }
        Ok(())
    }
}
