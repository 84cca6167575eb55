//! Integration tests for chatprep.
//!
//! These tests run real export files through the public API: parsing,
//! filtering, session building and the JSON writer.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::{TempDir, tempdir};

use chatprep::config::{SessionConfig, WhatsAppConfig};
use chatprep::core::{FilterConfig, Session, to_json, write_json};
use chatprep::parsers::WhatsAppParser;
use chatprep::prelude::*;

// ============================================================================
// Fixtures
// ============================================================================

mod fixtures {
    use super::*;

    pub const THREE_MESSAGES: &str = "\
1/1/20, 1:00 PM - Alice: Hello
1/1/20, 1:05 PM - Bob: Hi
1/1/20, 6:00 PM - Alice: Later";

    pub const FAMILY_CHAT: &str = "\
Messages and calls are end-to-end encrypted.
7/2/20, 6:33 PM - Gilfoyle: Dinesh, is this a good brand?
7/2/20, 6:34 PM - Dinesh: <Media omitted>
7/2/20, 6:35 PM - Dinesh: It's fine.
Honestly it's fine.

Stop asking.
7/2/20, 6:40 PM - Gilfoyle: https://example.com/brand
7/2/20, 6:41 PM - Gilfoyle: see https://example.com/brand
7/3/20, 9:15 AM - Dinesh: morning";

    pub fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }
}

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, 0)
        .unwrap()
}

fn process(path: &Path) -> ProcessedExport {
    WhatsAppParser::new()
        .process(path, &FilterConfig::default(), &SessionConfig::default())
        .unwrap()
}

fn authors(session: &Session) -> Vec<&str> {
    session.exchanges.iter().map(|e| e.author.as_str()).collect()
}

// ============================================================================
// Session building
// ============================================================================

#[test]
fn test_three_message_example_gives_two_sessions() {
    let dir = tempdir().unwrap();
    let path = fixtures::write(&dir, "chat.txt", fixtures::THREE_MESSAGES);

    let export = process(&path);
    assert_eq!(export.sessions.len(), 2);

    let first = &export.sessions[0];
    assert_eq!(authors(first), vec!["Alice", "Bob"]);
    assert_eq!(first.session_start, "01/01/20, 01:00 PM");
    assert_eq!(first.session_end, "01/01/20, 01:05 PM");

    let second = &export.sessions[1];
    assert_eq!(second.exchanges.len(), 1);
    assert_eq!(second.session_start, "01/01/20, 06:00 PM");
    assert_eq!(second.session_end, second.session_start);
}

#[test]
fn test_family_chat_end_to_end() {
    let dir = tempdir().unwrap();
    let path = fixtures::write(&dir, "family.txt", fixtures::FAMILY_CHAT);

    let export = process(&path);
    let stats = export.stats;

    assert_eq!(stats.lines, 10);
    assert_eq!(stats.messages, 6);
    assert_eq!(stats.dropped, 2);
    assert_eq!(stats.kept, 4);
    assert_eq!(stats.sessions, 2);

    let first = &export.sessions[0];
    let texts: Vec<&str> = first.exchanges.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "Dinesh, is this a good brand?",
            "It's fine.\nHonestly it's fine.\n\nStop asking.",
            "see https://example.com/brand",
        ]
    );
    assert_eq!(export.sessions[1].exchanges[0].message, "morning");
}

#[test]
fn test_keep_all_disables_filter() {
    let dir = tempdir().unwrap();
    let path = fixtures::write(&dir, "family.txt", fixtures::FAMILY_CHAT);

    let export = WhatsAppParser::new()
        .process(&path, &FilterConfig::none(), &SessionConfig::default())
        .unwrap();
    assert_eq!(export.stats.dropped, 0);
    assert_eq!(export.stats.kept, 6);
    assert!(
        export.sessions[0]
            .exchanges
            .iter()
            .any(|e| e.message == "<Media omitted>")
    );
}

#[test]
fn test_custom_gap() {
    let dir = tempdir().unwrap();
    let path = fixtures::write(&dir, "chat.txt", fixtures::THREE_MESSAGES);

    let parser = WhatsAppParser::new();
    let wide = parser
        .process(&path, &FilterConfig::default(), &SessionConfig::new().with_gap_hours(6))
        .unwrap();
    assert_eq!(wide.sessions.len(), 1);

    let narrow = parser
        .process(&path, &FilterConfig::default(), &SessionConfig::new().with_gap_minutes(5))
        .unwrap();
    assert_eq!(narrow.sessions.len(), 3);
}

#[test]
fn test_concatenated_exchanges_reproduce_filtered_stream() {
    let parser = WhatsAppParser::new();
    let filter = FilterConfig::default();

    let messages = parser.parse_str(fixtures::FAMILY_CHAT).unwrap();
    let filtered = apply_filters(messages, &filter);

    let export = parser
        .process_str(fixtures::FAMILY_CHAT, &filter, &SessionConfig::default())
        .unwrap();
    let flattened: Vec<(&str, &str)> = export
        .sessions
        .iter()
        .flat_map(|s| s.exchanges.iter())
        .map(|e| (e.author.as_str(), e.message.as_str()))
        .collect();
    let expected: Vec<(&str, &str)> = filtered
        .iter()
        .map(|m| (m.author.as_str(), m.text.as_str()))
        .collect();
    assert_eq!(flattened, expected);
}

// ============================================================================
// Timestamps
// ============================================================================

#[test]
fn test_datetime_chain() {
    let parser = WhatsAppParser::new();
    let content = "\
01/02/20, 9:00 AM - A: month first wins when both parse
25/12/20, 9:00 AM - A: day first
3/4/2021, 11:59 PM - A: long year
31/12/2021, 12:00 AM - A: long year day first";

    let messages = parser.parse_str(content).unwrap();
    let stamps: Vec<NaiveDateTime> = messages.iter().map(|m| m.timestamp).collect();
    assert_eq!(
        stamps,
        vec![
            at(2020, 1, 2, 9, 0),
            at(2020, 12, 25, 9, 0),
            at(2021, 3, 4, 23, 59),
            at(2021, 12, 31, 0, 0),
        ]
    );
}

#[test]
fn test_narrow_no_break_space_before_meridiem() {
    let parser = WhatsAppParser::new();
    let messages = parser
        .parse_str("7/2/20, 6:33\u{202F}PM - Gilfoyle: Is this good?")
        .unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].timestamp, at(2020, 7, 2, 18, 33));
}

#[test]
fn test_bad_datetime_aborts_run() {
    let dir = tempdir().unwrap();
    let path = fixtures::write(
        &dir,
        "bad.txt",
        "1/1/20, 1:00 PM - Alice: fine\n13/13/20, 1:00 PM - Bob: broken",
    );

    let err = WhatsAppParser::new()
        .process(&path, &FilterConfig::default(), &SessionConfig::default())
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
fn test_missing_input() {
    let err = WhatsAppParser::new()
        .parse("/definitely/not/here/chat.txt")
        .unwrap_err();
    assert!(err.is_missing_input());
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn test_written_json_shape() {
    let dir = tempdir().unwrap();
    let input = fixtures::write(&dir, "chat.txt", fixtures::THREE_MESSAGES);
    let output = dir.path().join("chat_sessions.json");

    let export = process(&input);
    write_json(&export.sessions, &output).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let sessions = value.as_array().unwrap();
    assert_eq!(sessions.len(), 2);

    let first = sessions[0].as_object().unwrap();
    let keys: Vec<&String> = first.keys().collect();
    assert_eq!(keys.len(), 3);
    assert!(first.contains_key("session_start"));
    assert!(first.contains_key("session_end"));

    let exchange = first["exchanges"][0].as_object().unwrap();
    assert_eq!(exchange["time"], "01/01/20, 01:00 PM");
    assert_eq!(exchange["author"], "Alice");
    assert_eq!(exchange["message"], "Hello");
    assert_eq!(exchange.len(), 3);
}

#[test]
fn test_output_keeps_non_ascii_verbatim() {
    let parser = WhatsAppParser::new();
    let export = parser
        .process_str(
            "1/1/20, 1:00 PM - Иван: Привет 👋",
            &FilterConfig::default(),
            &SessionConfig::default(),
        )
        .unwrap();
    let json = to_json(&export.sessions).unwrap();
    assert!(json.contains("Привет 👋"));
    assert!(json.contains("\"author\": \"Иван\""));
}

#[test]
fn test_rerun_is_byte_identical() {
    let dir = tempdir().unwrap();
    let input = fixtures::write(&dir, "family.txt", fixtures::FAMILY_CHAT);
    let a = dir.path().join("a.json");
    let b = dir.path().join("b.json");

    write_json(&process(&input).sessions, &a).unwrap();
    write_json(&process(&input).sessions, &b).unwrap();
    assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
}

// ============================================================================
// Streaming vs in-memory
// ============================================================================

#[test]
fn test_streaming_config_matches_in_memory() {
    let dir = tempdir().unwrap();
    let path = fixtures::write(&dir, "family.txt", fixtures::FAMILY_CHAT);

    let filter = FilterConfig::default();
    let config = SessionConfig::default();
    let in_memory = WhatsAppParser::new().process(&path, &filter, &config).unwrap();
    let streamed = WhatsAppParser::with_config(WhatsAppConfig::streaming())
        .process(&path, &filter, &config)
        .unwrap();

    assert_eq!(in_memory.sessions, streamed.sessions);
    assert_eq!(in_memory.stats, streamed.stats);
}
