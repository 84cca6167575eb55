//! WhatsApp header-line grammar and timestamp parsing.
//!
//! A WhatsApp TXT export starts every message with a header line:
//!
//! ```text
//! 7/2/20, 6:33 PM - Gilfoyle: Dinesh, is this a good brand?
//! ```
//!
//! Lines that do not match the header grammar are continuations of the
//! previous message. Matching is done by a small hand-written scanner rather
//! than a regex so that every accepted shape is spelled out below.
//!
//! # Grammar
//!
//! ```text
//! header   := datetime WS* "-" author ":" WS* message
//! datetime := date "," WS* time WS* meridiem
//! date     := DIGIT{1,2} "/" DIGIT{1,2} "/" DIGIT{2,4}   year: 2 or 4 digits
//! time     := DIGIT{1,2} ":" DIGIT{2}
//! meridiem := [AaPp] [Mm]
//! author   := (any char except ":"){1,}     trimmed after matching
//! message  := rest of line                  leading whitespace dropped
//! ```
//!
//! `DIGIT` is ASCII `0-9`, `WS` is Unicode whitespace. The author ends at the
//! first colon, so message bodies may contain colons and dashes freely, and an
//! author may contain digits, spaces, `+` or `-` (phone numbers). A line whose
//! author field would be empty is not a header.

use std::borrow::Cow;

use chrono::NaiveDateTime;

/// Invisible marks that WhatsApp sprinkles into exports.
///
/// U+202F (narrow no-break space) appears between the time and AM/PM on newer
/// exports; U+200E (left-to-right mark) appears around media placeholders.
pub const INVISIBLE_MARKS: [char; 2] = ['\u{202F}', '\u{200E}'];

/// Removes [`INVISIBLE_MARKS`] from a line, borrowing when there are none.
pub fn strip_invisible(line: &str) -> Cow<'_, str> {
    if line.contains(&INVISIBLE_MARKS[..]) {
        Cow::Owned(line.replace(&INVISIBLE_MARKS[..], ""))
    } else {
        Cow::Borrowed(line)
    }
}

/// The fields of a matched header line, borrowed from the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLine<'a> {
    /// The full datetime span as written, e.g. `7/2/20, 6:33 PM`.
    pub datetime: &'a str,
    /// Date part, e.g. `7/2/20`.
    pub date: &'a str,
    /// Time part without meridiem, e.g. `6:33`.
    pub time: &'a str,
    /// `true` for PM.
    pub pm: bool,
    /// Author, trimmed.
    pub author: &'a str,
    /// Message remainder with leading whitespace removed.
    pub message: &'a str,
}

impl HeaderLine<'_> {
    /// Returns the datetime in the single shape the format chain expects:
    /// `M/D/Y, H:MM AM|PM`.
    pub fn canonical_datetime(&self) -> String {
        let meridiem = if self.pm { "PM" } else { "AM" };
        format!("{}, {} {}", self.date, self.time, meridiem)
    }
}

/// Byte cursor over a single line.
struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// Consumes a run of ASCII digits whose length is within `min..=max`.
    fn digits(&mut self, min: usize, max: usize) -> Option<&'a str> {
        let rest = self.rest();
        let len = rest.bytes().take_while(u8::is_ascii_digit).count();
        if len < min || len > max {
            return None;
        }
        self.pos += len;
        Some(&rest[..len])
    }

    fn eat(&mut self, expected: char) -> Option<()> {
        if self.rest().starts_with(expected) {
            self.pos += expected.len_utf8();
            Some(())
        } else {
            None
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn meridiem(&mut self) -> Option<bool> {
        let bytes = self.rest().as_bytes();
        if bytes.len() < 2 || !bytes[1].eq_ignore_ascii_case(&b'm') {
            return None;
        }
        let pm = match bytes[0].to_ascii_lowercase() {
            b'a' => false,
            b'p' => true,
            _ => return None,
        };
        self.pos += 2;
        Some(pm)
    }
}

/// Matches a (marker-stripped) line against the header grammar.
///
/// Returns `None` for continuation lines.
///
/// # Example
///
/// ```
/// use chatprep::parsing::whatsapp::parse_header_line;
///
/// let header = parse_header_line("7/2/20, 6:33 PM - Gilfoyle: Is this good?").unwrap();
/// assert_eq!(header.author, "Gilfoyle");
/// assert_eq!(header.message, "Is this good?");
/// assert!(parse_header_line("just a continuation - with: colon").is_none());
/// ```
pub fn parse_header_line(line: &str) -> Option<HeaderLine<'_>> {
    let mut sc = Scanner::new(line);

    let date_start = sc.pos;
    sc.digits(1, 2)?;
    sc.eat('/')?;
    sc.digits(1, 2)?;
    sc.eat('/')?;
    sc.digits(2, 4)?;
    let date = &line[date_start..sc.pos];

    sc.eat(',')?;
    sc.skip_whitespace();

    let time_start = sc.pos;
    sc.digits(1, 2)?;
    sc.eat(':')?;
    sc.digits(2, 2)?;
    let time = &line[time_start..sc.pos];

    sc.skip_whitespace();
    let pm = sc.meridiem()?;
    let datetime = &line[date_start..sc.pos];

    sc.skip_whitespace();
    sc.eat('-')?;

    let rest = sc.rest();
    let colon = rest.find(':')?;
    let author_raw = &rest[..colon];
    if author_raw.is_empty() {
        return None;
    }

    let message = rest[colon + 1..].trim_start();

    Some(HeaderLine {
        datetime,
        date,
        time,
        pm,
        author: author_raw.trim(),
        message,
    })
}

/// Candidate datetime layouts, tried in [`DateFormat::chain`] order.
///
/// Resolution is by order, not by content: `01/02/20` is always read as
/// January 2nd because the month-first layout is tried first. Day-first
/// layouts only win when month-first cannot parse (e.g. `25/12/20`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `M/D/YY, H:MM AM` (US default)
    MonthFirstShortYear,
    /// `D/M/YY, H:MM AM`
    DayFirstShortYear,
    /// `M/D/YYYY, H:MM AM`
    MonthFirstLongYear,
    /// `D/M/YYYY, H:MM AM`
    DayFirstLongYear,
}

impl DateFormat {
    /// Returns the chrono format string for this layout.
    pub fn chrono_format(self) -> &'static str {
        match self {
            DateFormat::MonthFirstShortYear => "%m/%d/%y, %I:%M %p",
            DateFormat::DayFirstShortYear => "%d/%m/%y, %I:%M %p",
            DateFormat::MonthFirstLongYear => "%m/%d/%Y, %I:%M %p",
            DateFormat::DayFirstLongYear => "%d/%m/%Y, %I:%M %p",
        }
    }

    /// Returns every layout in the order they are tried.
    pub fn chain() -> &'static [DateFormat] {
        &[
            DateFormat::MonthFirstShortYear,
            DateFormat::DayFirstShortYear,
            DateFormat::MonthFirstLongYear,
            DateFormat::DayFirstLongYear,
        ]
    }

    /// Number of year digits this layout accepts.
    pub fn year_digits(self) -> usize {
        match self {
            DateFormat::MonthFirstShortYear | DateFormat::DayFirstShortYear => 2,
            DateFormat::MonthFirstLongYear | DateFormat::DayFirstLongYear => 4,
        }
    }

    /// Parses a canonical datetime string with this layout.
    ///
    /// The year must have exactly [`year_digits`](Self::year_digits) digits;
    /// chrono's `%Y` alone would read `202` as the year 202.
    pub fn parse(self, canonical: &str) -> Option<NaiveDateTime> {
        let date = canonical.split(',').next()?;
        let year = date.rsplit('/').next()?;
        if year.len() != self.year_digits() {
            return None;
        }
        NaiveDateTime::parse_from_str(canonical, self.chrono_format()).ok()
    }
}

/// Parses the timestamp of a header line with the first layout that accepts it.
///
/// Returns `None` when no layout in the chain matches.
pub fn parse_whatsapp_timestamp(header: &HeaderLine<'_>) -> Option<(NaiveDateTime, DateFormat)> {
    let canonical = header.canonical_datetime();
    DateFormat::chain()
        .iter()
        .find_map(|format| format.parse(&canonical).map(|ts| (ts, *format)))
}
