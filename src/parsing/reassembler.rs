//! Multi-line message reassembly.
//!
//! [`LineReassembler`] is the state machine shared by the in-memory parser and
//! the streaming parser: feed it lines one at a time, collect completed
//! messages as they fall out, then call [`finish`](LineReassembler::finish)
//! for the last one. [`Reassemble`] wraps it as an iterator adapter.

use crate::ParsedMessage;
use crate::error::{ChatprepError, Result};

use super::whatsapp::{parse_header_line, parse_whatsapp_timestamp, strip_invisible};

/// Message currently being accumulated.
#[derive(Debug)]
struct PendingMessage {
    message: ParsedMessage,
}

impl PendingMessage {
    fn push_continuation(&mut self, line: &str) {
        self.message.text.push('\n');
        self.message.text.push_str(line);
    }

    fn complete(mut self) -> ParsedMessage {
        let trimmed = self.message.text.trim();
        if trimmed.len() != self.message.text.len() {
            self.message.text = trimmed.to_string();
        }
        self.message
    }
}

/// Line-at-a-time reassembler.
///
/// A header line completes the buffered message (if any) and starts a new one;
/// any other line is appended to the buffered message with a `\n` separator.
/// Lines seen before the first header have nothing to attach to and are
/// dropped.
///
/// # Example
///
/// ```
/// use chatprep::parsing::LineReassembler;
///
/// let mut r = LineReassembler::new();
/// assert!(r.push_line("1/1/20, 1:00 PM - Alice: first").unwrap().is_none());
/// assert!(r.push_line("second line").unwrap().is_none());
/// let done = r.push_line("1/1/20, 1:05 PM - Bob: hi").unwrap().unwrap();
/// assert_eq!(done.text, "first\nsecond line");
/// assert_eq!(r.finish().unwrap().author, "Bob");
/// # Ok::<(), chatprep::ChatprepError>(())
/// ```
#[derive(Debug, Default)]
pub struct LineReassembler {
    pending: Option<PendingMessage>,
    lines_seen: usize,
    orphan_lines: usize,
}

impl LineReassembler {
    /// Creates an empty reassembler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one line (without its terminator).
    ///
    /// Returns the previously buffered message when `line` is a header.
    ///
    /// # Errors
    ///
    /// Returns [`ChatprepError::DateParse`] when a header's datetime matches
    /// none of the known layouts.
    pub fn push_line(&mut self, line: &str) -> Result<Option<ParsedMessage>> {
        self.lines_seen += 1;
        let line = strip_invisible(line);

        let Some(header) = parse_header_line(&line) else {
            match self.pending.as_mut() {
                Some(pending) => pending.push_continuation(&line),
                None => self.orphan_lines += 1,
            }
            return Ok(None);
        };

        let (timestamp, _) = parse_whatsapp_timestamp(&header)
            .ok_or_else(|| ChatprepError::date_parse(header.datetime, self.lines_seen))?;

        let next = PendingMessage {
            message: ParsedMessage::new(timestamp, header.author, header.message),
        };

        Ok(self.pending.replace(next).map(PendingMessage::complete))
    }

    /// Flushes the buffered message at end of input.
    pub fn finish(&mut self) -> Option<ParsedMessage> {
        self.pending.take().map(PendingMessage::complete)
    }

    /// Number of lines fed so far.
    pub fn lines_seen(&self) -> usize {
        self.lines_seen
    }

    /// Number of leading lines dropped because no header preceded them.
    pub fn orphan_lines(&self) -> usize {
        self.orphan_lines
    }
}

/// Iterator adapter turning lines into [`ParsedMessage`]s.
///
/// Lazy and single-pass. After the first error the iterator is exhausted.
pub struct Reassemble<I> {
    lines: I,
    inner: LineReassembler,
    done: bool,
}

impl<I> Reassemble<I> {
    /// Wraps a line iterator.
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            inner: LineReassembler::new(),
            done: false,
        }
    }

    /// Returns the underlying state machine, e.g. to read line counters.
    pub fn reassembler(&self) -> &LineReassembler {
        &self.inner
    }
}

impl<I, S> Iterator for Reassemble<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Result<ParsedMessage>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        for line in self.lines.by_ref() {
            match self.inner.push_line(line.as_ref()) {
                Ok(Some(msg)) => return Some(Ok(msg)),
                Ok(None) => {}
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }

        self.done = true;
        self.inner.finish().map(Ok)
    }
}

/// Reassembles every message in `content`.
///
/// # Errors
///
/// Fails on the first unparseable header datetime.
pub fn reassemble_str(content: &str) -> Result<Vec<ParsedMessage>> {
    Reassemble::new(content.lines()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_messages() {
        let msgs = reassemble_str(
            "1/1/20, 1:00 PM - Alice: Hello\n1/1/20, 1:05 PM - Bob: Hi there",
        )
        .unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].author, "Alice");
        assert_eq!(msgs[0].text, "Hello");
        assert_eq!(msgs[1].author, "Bob");
    }

    #[test]
    fn test_continuation_joined_with_newline() {
        let msgs = reassemble_str(
            "1/1/20, 1:00 PM - Alice: Line 1\nLine 2\nLine 3\n1/1/20, 1:05 PM - Bob: Reply",
        )
        .unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].text, "Line 1\nLine 2\nLine 3");
        assert_eq!(msgs[1].text, "Reply");
    }

    #[test]
    fn test_blank_continuation_preserved_inside_trimmed_outside() {
        let msgs =
            reassemble_str("1/1/20, 1:00 PM - Alice: para one\n\npara two\n\n").unwrap();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].text, "para one\n\npara two");
    }

    #[test]
    fn test_orphan_lines_dropped() {
        let mut r = LineReassembler::new();
        assert!(r.push_line("exported chat header").unwrap().is_none());
        assert!(r.push_line("another orphan").unwrap().is_none());
        assert!(r.push_line("1/1/20, 1:00 PM - Alice: hi").unwrap().is_none());
        let msg = r.finish().unwrap();
        assert_eq!(msg.text, "hi");
        assert_eq!(r.orphan_lines(), 2);
        assert_eq!(r.lines_seen(), 3);
    }

    #[test]
    fn test_invisible_marks_stripped() {
        let msgs = reassemble_str(
            "1/1/20, 1:00\u{202F}PM - Alice: \u{200E}<Media omitted>\n\u{200E}tail",
        )
        .unwrap();
        assert_eq!(msgs[0].text, "<Media omitted>\ntail");
    }

    #[test]
    fn test_date_parse_error_reports_line() {
        let err = reassemble_str("1/1/20, 1:00 PM - Alice: ok\n13/13/20, 1:00 PM - Bob: bad")
            .unwrap_err();
        match err {
            ChatprepError::DateParse { raw, line } => {
                assert_eq!(raw, "13/13/20, 1:00 PM");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_three_digit_year_is_a_date_error() {
        let err = reassemble_str("1/1/20, 1:00 PM - A: fine\n1/1/202, 1:00 PM - A: x").unwrap_err();
        match err {
            ChatprepError::DateParse { raw, line } => {
                assert_eq!(raw, "1/1/202, 1:00 PM");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let lines = [
            "13/13/20, 1:00 PM - Bob: bad",
            "1/1/20, 1:00 PM - Alice: ok",
        ];
        let mut iter = Reassemble::new(lines.iter());
        assert!(iter.next().unwrap().is_err());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_empty_input() {
        assert!(reassemble_str("").unwrap().is_empty());
        assert!(reassemble_str("no headers at all\nnone").unwrap().is_empty());
    }

    #[test]
    fn test_empty_message_body() {
        let msgs = reassemble_str("1/1/20, 1:00 PM - Alice:").unwrap();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].text, "");
    }
}
