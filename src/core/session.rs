//! Split a message stream into sessions at inactivity gaps.
//!
//! [`SessionBuilder`] is a single-pass state machine: it holds the open
//! session and closes it when the next message arrives at least `gap` after
//! the previous one.
//!
//! # Example
//!
//! ```
//! use chatprep::core::session::build_sessions;
//! use chatprep::ParsedMessage;
//! use chrono::{NaiveDate, TimeDelta};
//!
//! let day = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
//! let messages = vec![
//!     ParsedMessage::new(day.and_hms_opt(13, 0, 0).unwrap(), "Alice", "Hello"),
//!     ParsedMessage::new(day.and_hms_opt(13, 5, 0).unwrap(), "Bob", "Hi"),
//!     ParsedMessage::new(day.and_hms_opt(18, 0, 0).unwrap(), "Alice", "Later"),
//! ];
//!
//! let sessions = build_sessions(messages, TimeDelta::hours(4));
//! assert_eq!(sessions.len(), 2);
//! assert_eq!(sessions[0].session_end, "01/01/20, 01:05 PM");
//! assert_eq!(sessions[1].exchanges[0].message, "Later");
//! ```

use chrono::{NaiveDateTime, TimeDelta};

use super::models::{Exchange, Session};
use crate::ParsedMessage;

/// Incremental session splitter.
#[derive(Debug)]
pub struct SessionBuilder {
    gap: TimeDelta,
    exchanges: Vec<Exchange>,
    start: Option<NaiveDateTime>,
    previous: Option<NaiveDateTime>,
}

impl SessionBuilder {
    /// Creates a builder that splits at gaps of `gap` or more.
    pub fn new(gap: TimeDelta) -> Self {
        Self {
            gap,
            exchanges: Vec::new(),
            start: None,
            previous: None,
        }
    }

    /// Returns the gap threshold.
    pub fn gap(&self) -> TimeDelta {
        self.gap
    }

    /// Adds a message, returning the session it closed, if any.
    pub fn push(&mut self, msg: ParsedMessage) -> Option<Session> {
        let ts = msg.timestamp;
        let mut closed = None;

        match self.previous {
            Some(prev) if ts - prev >= self.gap => {
                closed = self.close(prev);
                self.start = Some(ts);
            }
            _ => {
                self.start.get_or_insert(ts);
            }
        }

        self.exchanges.push(Exchange::from_message(msg));
        self.previous = Some(ts);
        closed
    }

    /// Closes the open session at end of input.
    pub fn finish(mut self) -> Option<Session> {
        let prev = self.previous?;
        self.close(prev)
    }

    fn close(&mut self, end: NaiveDateTime) -> Option<Session> {
        if self.exchanges.is_empty() {
            return None;
        }
        let start = self.start.take().unwrap_or(end);
        Some(Session::new(start, end, std::mem::take(&mut self.exchanges)))
    }
}

/// Groups `messages` into sessions.
///
/// Empty input gives an empty list.
pub fn build_sessions<I>(messages: I, gap: TimeDelta) -> Vec<Session>
where
    I: IntoIterator<Item = ParsedMessage>,
{
    let mut builder = SessionBuilder::new(gap);
    let mut sessions: Vec<Session> = messages
        .into_iter()
        .filter_map(|m| builder.push(m))
        .collect();
    sessions.extend(builder.finish());
    sessions
}
