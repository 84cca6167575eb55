//! Filter-then-sessionize pipeline and its statistics.

use super::filter::FilterConfig;
use super::models::Session;
use super::session::SessionBuilder;
use crate::ParsedMessage;
use crate::config::SessionConfig;
use crate::error::Result;

/// Counters collected while turning an export into sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingStats {
    /// Raw lines read from the export.
    pub lines: usize,
    /// Messages after reassembly.
    pub messages: usize,
    /// Messages that passed the filter.
    pub kept: usize,
    /// Messages the filter rejected.
    pub dropped: usize,
    /// Sessions produced.
    pub sessions: usize,
}

impl ProcessingStats {
    /// Percentage of messages removed by the filter.
    pub fn drop_ratio(&self) -> f64 {
        if self.messages == 0 {
            return 0.0;
        }
        self.dropped as f64 / self.messages as f64 * 100.0
    }
}

/// Sessions built from one export together with their statistics.
#[derive(Debug, Clone)]
pub struct ProcessedExport {
    pub sessions: Vec<Session>,
    pub stats: ProcessingStats,
}

/// Streaming pipeline: filter each message and feed survivors to a
/// [`SessionBuilder`].
///
/// ```
/// use chatprep::core::{FilterConfig, SessionPipeline};
/// use chatprep::config::SessionConfig;
/// use chatprep::parsing::reassemble_str;
///
/// let messages = reassemble_str(
///     "1/1/20, 1:00 PM - Alice: Hello\n1/1/20, 1:01 PM - Bob: <Media omitted>",
/// )?;
///
/// let mut pipeline = SessionPipeline::new(FilterConfig::default(), &SessionConfig::default())?;
/// for msg in messages {
///     pipeline.push(msg);
/// }
/// let out = pipeline.finish(2);
/// assert_eq!(out.stats.kept, 1);
/// assert_eq!(out.stats.dropped, 1);
/// # Ok::<(), chatprep::ChatprepError>(())
/// ```
#[derive(Debug)]
pub struct SessionPipeline {
    filter: FilterConfig,
    builder: SessionBuilder,
    sessions: Vec<Session>,
    stats: ProcessingStats,
}

impl SessionPipeline {
    /// # Errors
    ///
    /// Fails when the configured gap is out of range.
    pub fn new(filter: FilterConfig, config: &SessionConfig) -> Result<Self> {
        Ok(Self {
            filter,
            builder: SessionBuilder::new(config.gap()?),
            sessions: Vec::new(),
            stats: ProcessingStats::default(),
        })
    }

    /// Processes one reassembled message.
    pub fn push(&mut self, msg: ParsedMessage) {
        self.stats.messages += 1;
        if !self.filter.accepts(&msg) {
            self.stats.dropped += 1;
            return;
        }
        self.stats.kept += 1;
        if let Some(session) = self.builder.push(msg) {
            self.sessions.push(session);
        }
    }

    /// Drains a fallible message source, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `messages`.
    pub fn extend<I>(&mut self, messages: I) -> Result<()>
    where
        I: IntoIterator<Item = Result<ParsedMessage>>,
    {
        for msg in messages {
            self.push(msg?);
        }
        Ok(())
    }

    /// Closes the last session. `lines` is the raw line count for the stats.
    pub fn finish(mut self, lines: usize) -> ProcessedExport {
        self.sessions.extend(self.builder.finish());
        self.stats.lines = lines;
        self.stats.sessions = self.sessions.len();
        tracing::debug!(
            messages = self.stats.messages,
            dropped = self.stats.dropped,
            sessions = self.stats.sessions,
            "sessions built"
        );
        ProcessedExport {
            sessions: self.sessions,
            stats: self.stats,
        }
    }
}

/// Runs the whole pipeline over already reassembled messages.
///
/// # Errors
///
/// Fails when the configured gap is out of range.
pub fn process_messages(
    messages: Vec<ParsedMessage>,
    filter: &FilterConfig,
    config: &SessionConfig,
) -> Result<ProcessedExport> {
    let mut pipeline = SessionPipeline::new(filter.clone(), config)?;
    for msg in messages {
        pipeline.push(msg);
    }
    Ok(pipeline.finish(0))
}
