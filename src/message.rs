//! Reassembled chat message.
//!
//! This module provides [`ParsedMessage`], one logical message from a chat
//! export after its header line and continuation lines have been merged.
//!
//! # Examples
//!
//! ```
//! use chatprep::ParsedMessage;
//! use chrono::NaiveDate;
//!
//! let ts = NaiveDate::from_ymd_opt(2020, 7, 2)
//!     .unwrap()
//!     .and_hms_opt(18, 33, 0)
//!     .unwrap();
//! let msg = ParsedMessage::new(ts, "Gilfoyle", "Is this a good brand?");
//!
//! assert_eq!(msg.author(), "Gilfoyle");
//! assert!(!msg.is_multiline());
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One message reassembled from a chat export.
///
/// Exports carry wall-clock times without a zone, so the timestamp is a
/// [`NaiveDateTime`]. Values are created once by the reassembler and never
/// mutated afterwards.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `timestamp` | `NaiveDateTime` | When the message was sent |
/// | `author` | `String` | Author as written in the header line, trimmed |
/// | `text` | `String` | Body, continuation lines joined with `\n`, trimmed |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMessage {
    /// When the message was sent.
    pub timestamp: NaiveDateTime,

    /// Author as written in the export.
    pub author: String,

    /// Message body.
    ///
    /// Empty only when the original message was empty.
    pub text: String,
}

impl ParsedMessage {
    /// Creates a new message.
    pub fn new(timestamp: NaiveDateTime, author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            author: author.into(),
            text: text.into(),
        }
    }

    /// Returns the timestamp.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Returns the author.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the message body.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` if the body spans several lines.
    pub fn is_multiline(&self) -> bool {
        self.text.contains('\n')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(13, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_accessors() {
        let msg = ParsedMessage::new(ts(), "Alice", "Hello");
        assert_eq!(msg.timestamp(), ts());
        assert_eq!(msg.author(), "Alice");
        assert_eq!(msg.text(), "Hello");
    }

    #[test]
    fn test_is_multiline() {
        assert!(ParsedMessage::new(ts(), "Alice", "one\ntwo").is_multiline());
        assert!(!ParsedMessage::new(ts(), "Alice", "one two").is_multiline());
    }

    #[test]
    fn test_serde_roundtrip_keeps_unicode() {
        let msg = ParsedMessage::new(ts(), "Иван", "Привет 🎉");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("Привет"));
        let parsed: ParsedMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, msg);
    }
}
