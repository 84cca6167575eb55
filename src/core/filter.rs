//! Drop noise messages before session building.
//!
//! This module provides [`FilterConfig`] for defining which message bodies are
//! noise and [`apply_filters`] for filtering message collections.
//!
//! # Rules
//!
//! | Rule | Default | Description |
//! |------|---------|-------------|
//! | Denylist | [`DEFAULT_DENYLIST`] | Trimmed text equals an entry (case-sensitive) |
//! | URL only | on | Trimmed text is a single `http(s)://` URL |
//!
//! Matching is exact: a placeholder or link embedded in longer text is kept.
//!
//! # Examples
//!
//! ```
//! use chatprep::core::filter::{FilterConfig, apply_filters};
//! use chatprep::ParsedMessage;
//! use chrono::NaiveDate;
//!
//! let ts = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap().and_hms_opt(13, 0, 0).unwrap();
//! let messages = vec![
//!     ParsedMessage::new(ts, "Alice", "<Media omitted>"),
//!     ParsedMessage::new(ts, "Bob", "https://example.com/x"),
//!     ParsedMessage::new(ts, "Alice", "see https://example.com/x"),
//! ];
//!
//! let kept = apply_filters(messages, &FilterConfig::default());
//! assert_eq!(kept.len(), 1);
//! assert_eq!(kept[0].author, "Alice");
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ParsedMessage;

/// System placeholders WhatsApp writes instead of real content.
pub const DEFAULT_DENYLIST: [&str; 4] = [
    "You deleted this message",
    "<Media omitted>",
    "This message was deleted",
    "Missed voice call",
];

static URL_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://\S+$").expect("URL pattern is valid"));

/// Returns `true` if `text` (already trimmed) is one bare web link.
pub fn is_url_only(text: &str) -> bool {
    URL_ONLY.is_match(text)
}

/// Configuration for dropping noise messages.
///
/// # Examples
///
/// ```
/// use chatprep::core::filter::FilterConfig;
///
/// let config = FilterConfig::new()
///     .with_denied("Waiting for this message")
///     .with_url_only(false);
///
/// assert!(!config.keep("Waiting for this message"));
/// assert!(config.keep("https://example.com"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Exact bodies to drop.
    pub denylist: Vec<String>,

    /// Drop bodies that are a single URL.
    pub drop_url_only: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            denylist: DEFAULT_DENYLIST.iter().map(ToString::to_string).collect(),
            drop_url_only: true,
        }
    }
}

impl FilterConfig {
    /// Creates the default filter (placeholder denylist plus URL-only rule).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a filter that keeps everything.
    pub fn none() -> Self {
        Self {
            denylist: Vec::new(),
            drop_url_only: false,
        }
    }

    /// Adds an exact body to drop.
    #[must_use]
    pub fn with_denied(mut self, text: impl Into<String>) -> Self {
        self.denylist.push(text.into());
        self
    }

    /// Enables or disables the URL-only rule.
    #[must_use]
    pub fn with_url_only(mut self, enabled: bool) -> Self {
        self.drop_url_only = enabled;
        self
    }

    /// Returns `true` if any rule is active.
    pub fn is_active(&self) -> bool {
        self.drop_url_only || !self.denylist.is_empty()
    }

    /// Decides whether a message body survives filtering.
    pub fn keep(&self, text: &str) -> bool {
        let text = text.trim();
        if self.denylist.iter().any(|denied| denied == text) {
            return false;
        }
        !(self.drop_url_only && is_url_only(text))
    }

    /// Decides whether a message survives filtering.
    pub fn accepts(&self, msg: &ParsedMessage) -> bool {
        self.keep(&msg.text)
    }
}

/// Filters a collection of messages based on the provided configuration.
///
/// Order is preserved. If no rules are active, returns the input unchanged.
pub fn apply_filters(messages: Vec<ParsedMessage>, config: &FilterConfig) -> Vec<ParsedMessage> {
    if !config.is_active() {
        return messages;
    }

    messages.into_iter().filter(|m| config.accepts(m)).collect()
}
