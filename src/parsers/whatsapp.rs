//! `WhatsApp` TXT export parser.
//!
//! Supported header shapes, all with a 12-hour clock:
//! - US short year: `7/2/20, 6:33 PM - Gilfoyle: Message`
//! - Day first: `25/12/20, 9:15 AM - Dinesh: Message`
//! - Four-digit year: `7/2/2020, 6:33 PM - Gilfoyle: Message`
//! - Newer exports with U+202F before `PM`
//!
//! Ambiguous dates such as `01/02/20` are read month-first; see
//! [`DateFormat::chain`](crate::parsing::DateFormat::chain).

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::ParsedMessage;
use crate::config::{SessionConfig, WhatsAppConfig};
use crate::core::{FilterConfig, ProcessedExport, SessionPipeline};
use crate::error::{ChatprepError, Result};
use crate::parsing::Reassemble;

#[cfg(feature = "streaming")]
use crate::streaming::{MessageIterator, StreamingConfig, WhatsAppStreamingParser};

/// Parser for WhatsApp TXT exports.
///
/// # Example
///
/// ```rust,no_run
/// use chatprep::parsers::WhatsAppParser;
///
/// let parser = WhatsAppParser::new();
/// let messages = parser.parse("whatsapp_chat.txt")?;
/// # Ok::<(), chatprep::ChatprepError>(())
/// ```
#[derive(Debug, Default)]
pub struct WhatsAppParser {
    config: WhatsAppConfig,
}

impl WhatsAppParser {
    /// Creates a new parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: WhatsAppConfig) -> Self {
        Self { config }
    }

    /// Creates a parser optimized for streaming large files.
    pub fn with_streaming() -> Self {
        Self {
            config: WhatsAppConfig::streaming(),
        }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &WhatsAppConfig {
        &self.config
    }

    pub fn name(&self) -> &'static str {
        "WhatsApp"
    }

    /// Parses an export file into messages.
    ///
    /// # Errors
    ///
    /// [`ChatprepError::MissingInput`] if the file does not exist,
    /// [`ChatprepError::DateParse`] on the first unparseable header.
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<Vec<ParsedMessage>> {
        let content = read_export(path.as_ref())?;
        self.parse_str(&content)
    }

    /// Parses export content from a string.
    pub fn parse_str(&self, content: &str) -> Result<Vec<ParsedMessage>> {
        Reassemble::new(content.lines()).collect()
    }

    /// Parses, filters and sessionizes export content.
    pub fn process_str(
        &self,
        content: &str,
        filter: &FilterConfig,
        sessions: &SessionConfig,
    ) -> Result<ProcessedExport> {
        let mut source = Reassemble::new(content.lines());
        let mut pipeline = SessionPipeline::new(filter.clone(), sessions)?;
        pipeline.extend(source.by_ref())?;

        let reassembler = source.reassembler();
        if reassembler.orphan_lines() > 0 {
            tracing::debug!(
                lines = reassembler.orphan_lines(),
                "dropped lines before the first message header"
            );
        }
        Ok(pipeline.finish(reassembler.lines_seen()))
    }

    /// Parses, filters and sessionizes an export file.
    ///
    /// Reads line by line when the parser is configured for streaming,
    /// otherwise loads the whole file first. Both produce the same result.
    pub fn process(
        &self,
        path: impl AsRef<Path>,
        filter: &FilterConfig,
        sessions: &SessionConfig,
    ) -> Result<ProcessedExport> {
        let path = path.as_ref();
        if self.config.streaming {
            return self.process_streamed(path, filter, sessions);
        }

        let content = read_export(path)?;
        self.process_str(&content, filter, sessions)
    }

    #[cfg(feature = "streaming")]
    fn process_streamed(
        &self,
        path: &Path,
        filter: &FilterConfig,
        sessions: &SessionConfig,
    ) -> Result<ProcessedExport> {
        let mut iter = self.stream(path)?;
        let mut pipeline = SessionPipeline::new(filter.clone(), sessions)?;
        pipeline.extend(iter.by_ref())?;
        Ok(pipeline.finish(iter.lines_read()))
    }

    #[cfg(not(feature = "streaming"))]
    fn process_streamed(
        &self,
        path: &Path,
        filter: &FilterConfig,
        sessions: &SessionConfig,
    ) -> Result<ProcessedExport> {
        let content = read_export(path)?;
        self.process_str(&content, filter, sessions)
    }

    /// Opens the export as a lazy message stream.
    #[cfg(feature = "streaming")]
    pub fn stream(&self, path: impl AsRef<Path>) -> Result<Box<dyn MessageIterator>> {
        let streaming_config = StreamingConfig::new().with_buffer_size(self.config.buffer_size);
        let iterator = WhatsAppStreamingParser::with_config(streaming_config).stream(path)?;
        Ok(Box::new(iterator))
    }
}

fn read_export(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ChatprepError::missing_input(path),
        _ => ChatprepError::Io(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CHAT: &str = "\
1/1/20, 1:00 PM - Alice: Hello
1/1/20, 1:05 PM - Bob: Hi
1/1/20, 6:00 PM - Alice: Later";

    fn temp_export(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parser_name() {
        assert_eq!(WhatsAppParser::new().name(), "WhatsApp");
    }

    #[test]
    fn test_parse_str() {
        let messages = WhatsAppParser::new().parse_str(CHAT).unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].text, "Later");
    }

    #[test]
    fn test_process_str_three_message_example() {
        let out = WhatsAppParser::new()
            .process_str(CHAT, &FilterConfig::default(), &SessionConfig::default())
            .unwrap();
        assert_eq!(out.sessions.len(), 2);
        assert_eq!(out.sessions[0].exchanges.len(), 2);
        assert_eq!(out.sessions[0].session_start, "01/01/20, 01:00 PM");
        assert_eq!(out.sessions[0].session_end, "01/01/20, 01:05 PM");
        assert_eq!(out.sessions[1].session_start, "01/01/20, 06:00 PM");
        assert_eq!(out.stats.lines, 3);
    }

    #[test]
    fn test_parse_missing_file() {
        let err = WhatsAppParser::new().parse("/no/such/export.txt").unwrap_err();
        assert!(err.is_missing_input());
    }

    #[test]
    fn test_process_file() {
        let file = temp_export(CHAT);
        let out = WhatsAppParser::new()
            .process(file.path(), &FilterConfig::default(), &SessionConfig::default())
            .unwrap();
        assert_eq!(out.stats.sessions, 2);
    }

    #[cfg(feature = "streaming")]
    #[test]
    fn test_streaming_and_in_memory_agree() {
        let file = temp_export(&format!("{CHAT}\ncontinued\n1/2/20, 9:00 AM - Bob: <Media omitted>\n"));
        let filter = FilterConfig::default();
        let sessions = SessionConfig::default();

        let loaded = WhatsAppParser::new()
            .process(file.path(), &filter, &sessions)
            .unwrap();
        let streamed = WhatsAppParser::with_streaming()
            .process(file.path(), &filter, &sessions)
            .unwrap();

        assert_eq!(loaded.sessions, streamed.sessions);
        assert_eq!(loaded.stats, streamed.stats);
    }
}
