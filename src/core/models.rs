//! Output data models: exchanges and sessions.
//!
//! [`Exchange`] is the serialized form of one kept [`ParsedMessage`];
//! [`Session`] groups exchanges separated by less than the inactivity gap.
//! Both keep the original [`NaiveDateTime`] next to the rendered string so
//! invariants can be checked without re-parsing.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::ParsedMessage;

/// Layout of every timestamp written to output.
///
/// Two-digit month, day, year and 12-hour clock, zero padded:
/// `07/02/20, 06:33 PM`. Applied regardless of the layout found in the
/// input.
pub const OUTPUT_TIME_FORMAT: &str = "%m/%d/%y, %I:%M %p";

/// Renders a timestamp with [`OUTPUT_TIME_FORMAT`].
///
/// ```
/// use chatprep::core::models::format_timestamp;
/// use chrono::NaiveDate;
///
/// let ts = NaiveDate::from_ymd_opt(2020, 7, 2).unwrap().and_hms_opt(18, 33, 0).unwrap();
/// assert_eq!(format_timestamp(ts), "07/02/20, 06:33 PM");
/// ```
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(OUTPUT_TIME_FORMAT).to_string()
}

/// One kept message in output form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    /// Rendered send time.
    pub time: String,
    /// Message author.
    pub author: String,
    /// Message body.
    pub message: String,

    #[serde(skip)]
    timestamp: Option<NaiveDateTime>,
}

impl Exchange {
    /// Converts a message into its output form.
    pub fn from_message(msg: ParsedMessage) -> Self {
        Self {
            time: format_timestamp(msg.timestamp),
            author: msg.author,
            message: msg.text,
            timestamp: Some(msg.timestamp),
        }
    }

    /// Original timestamp, when this exchange was built in-process.
    ///
    /// `None` for exchanges read back from JSON.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamp
    }
}

impl From<ParsedMessage> for Exchange {
    fn from(msg: ParsedMessage) -> Self {
        Self::from_message(msg)
    }
}

/// A run of exchanges with no inactivity gap at or above the threshold.
///
/// Always holds at least one exchange. Field order matches the JSON object
/// written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Rendered time of the first exchange.
    pub session_start: String,
    /// Rendered time of the last exchange.
    pub session_end: String,
    /// Exchanges in input order.
    pub exchanges: Vec<Exchange>,

    #[serde(skip)]
    bounds: Option<(NaiveDateTime, NaiveDateTime)>,
}

impl Session {
    pub(crate) fn new(start: NaiveDateTime, end: NaiveDateTime, exchanges: Vec<Exchange>) -> Self {
        Self {
            session_start: format_timestamp(start),
            session_end: format_timestamp(end),
            exchanges,
            bounds: Some((start, end)),
        }
    }

    /// Start and end timestamps, when built in-process.
    pub fn bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.bounds
    }

    /// Number of exchanges.
    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    /// Always `false` for sessions produced by the builder.
    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }
}
