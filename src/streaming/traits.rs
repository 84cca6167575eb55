//! Streaming seams: the message iterator trait and reader settings.

use crate::ParsedMessage;
use crate::error::Result;

/// A message stream that can report how far through its input it is.
///
/// Usable as `Box<dyn MessageIterator>`.
///
/// ```no_run
/// # fn main() -> chatprep::Result<()> {
/// use chatprep::streaming::{MessageIterator, WhatsAppStreamingParser};
///
/// let mut messages = WhatsAppStreamingParser::new().stream("chat.txt")?;
/// let mut count = 0;
/// for message in messages.by_ref() {
///     message?;
///     count += 1;
/// }
/// eprintln!("{count} messages, {} lines", messages.lines_read());
/// # Ok(())
/// # }
/// ```
pub trait MessageIterator: Iterator<Item = Result<ParsedMessage>> + Send {
    /// Percentage of the input consumed, or `None` when the size is unknown
    /// or zero.
    fn progress(&self) -> Option<f64> {
        let total = self.total_bytes()?;
        if total == 0 {
            return None;
        }
        Some((self.bytes_processed() as f64 / total as f64 * 100.0).min(100.0))
    }

    /// Bytes consumed, line terminators included.
    fn bytes_processed(&self) -> u64;

    /// Input size, when the source has one.
    fn total_bytes(&self) -> Option<u64> {
        None
    }

    /// Raw lines consumed, including preamble and continuation lines.
    fn lines_read(&self) -> usize;
}

/// Reader settings for [`WhatsAppStreamingParser`](super::WhatsAppStreamingParser).
///
/// ```
/// use chatprep::streaming::StreamingConfig;
///
/// let config = StreamingConfig::new().with_buffer_size(16 * 1024);
/// assert_eq!(config.buffer_size, 16 * 1024);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StreamingConfig {
    /// Capacity of the `BufReader` wrapped around the file. Default 64 KiB.
    pub buffer_size: usize,

    /// Log an `info!` progress event every this many messages; zero turns it off.
    pub progress_interval: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            buffer_size: 64 * 1024, // 64KB
            progress_interval: 10_000,
        }
    }
}

impl StreamingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the buffer size. Zero is raised to one byte.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Sets the progress logging interval.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }
}
