//! Streaming parser for WhatsApp TXT exports.
//!
//! Reads the export line by line through a [`BufReader`] and feeds each line
//! to the same [`LineReassembler`] the in-memory parser uses, so both paths
//! produce identical messages.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use crate::ParsedMessage;
use crate::error::{ChatprepError, Result};
use crate::parsing::LineReassembler;

use super::{MessageIterator, StreamingConfig};

/// Streaming parser for WhatsApp TXT exports.
#[derive(Debug, Default)]
pub struct WhatsAppStreamingParser {
    config: StreamingConfig,
}

impl WhatsAppStreamingParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StreamingConfig) -> Self {
        Self { config }
    }

    pub fn name(&self) -> &'static str {
        "WhatsApp (Streaming)"
    }

    pub fn config(&self) -> &StreamingConfig {
        &self.config
    }

    /// Opens an export file.
    ///
    /// # Errors
    ///
    /// Returns [`ChatprepError::MissingInput`] if the file does not exist and
    /// [`ChatprepError::Io`] for other open failures.
    pub fn stream(
        &self,
        file_path: impl AsRef<Path>,
    ) -> Result<WhatsAppMessageIterator<BufReader<File>>> {
        let path = file_path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ChatprepError::missing_input(path),
            _ => ChatprepError::Io(e),
        })?;
        let file_size = file.metadata()?.len();

        let reader = BufReader::with_capacity(self.config.buffer_size.max(1), file);
        Ok(WhatsAppMessageIterator::new(
            reader,
            Some(file_size),
            self.config,
        ))
    }

    /// Streams from any buffered reader, e.g. stdin or an in-memory cursor.
    pub fn stream_reader<R: BufRead + Send>(
        &self,
        reader: R,
        total_bytes: Option<u64>,
    ) -> WhatsAppMessageIterator<R> {
        WhatsAppMessageIterator::new(reader, total_bytes, self.config)
    }
}

/// Iterator over WhatsApp messages.
///
/// Yields at most one error (I/O failure or unparseable datetime), after
/// which it is exhausted.
#[derive(Debug)]
pub struct WhatsAppMessageIterator<R: BufRead> {
    reader: R,
    total_bytes: Option<u64>,
    bytes_read: u64,
    config: StreamingConfig,
    line_buffer: String,
    reassembler: LineReassembler,
    emitted: usize,
    finished: bool,
}

impl<R: BufRead + Send> WhatsAppMessageIterator<R> {
    fn new(reader: R, total_bytes: Option<u64>, config: StreamingConfig) -> Self {
        Self {
            reader,
            total_bytes,
            bytes_read: 0,
            config,
            line_buffer: String::with_capacity(4096),
            reassembler: LineReassembler::new(),
            emitted: 0,
            finished: false,
        }
    }

    /// Reads the next line without its terminator.
    fn read_line(&mut self) -> std::io::Result<bool> {
        self.line_buffer.clear();
        let bytes = self.reader.read_line(&mut self.line_buffer)?;
        if bytes == 0 {
            return Ok(false);
        }
        self.bytes_read += bytes as u64;

        if self.line_buffer.ends_with('\n') {
            self.line_buffer.pop();
            if self.line_buffer.ends_with('\r') {
                self.line_buffer.pop();
            }
        }
        Ok(true)
    }

    fn emit(&mut self, msg: ParsedMessage) -> Option<Result<ParsedMessage>> {
        self.emitted += 1;
        let interval = self.config.progress_interval;
        if interval > 0 && self.emitted % interval == 0 {
            tracing::info!(
                messages = self.emitted,
                bytes = self.bytes_read,
                progress = ?self.progress(),
                "streaming progress"
            );
        }
        Some(Ok(msg))
    }

    /// Number of leading lines dropped because no header preceded them.
    pub fn orphan_lines(&self) -> usize {
        self.reassembler.orphan_lines()
    }
}

impl<R: BufRead + Send> MessageIterator for WhatsAppMessageIterator<R> {
    fn bytes_processed(&self) -> u64 {
        self.bytes_read
    }

    fn total_bytes(&self) -> Option<u64> {
        self.total_bytes
    }

    fn lines_read(&self) -> usize {
        self.reassembler.lines_seen()
    }
}

impl<R: BufRead + Send> Iterator for WhatsAppMessageIterator<R> {
    type Item = Result<ParsedMessage>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            match self.read_line() {
                Ok(true) => {}
                Ok(false) => {
                    self.finished = true;
                    let last = self.reassembler.finish()?;
                    return self.emit(last);
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
            }

            match self.reassembler.push_line(&self.line_buffer) {
                Ok(Some(msg)) => return self.emit(msg),
                Ok(None) => {}
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
