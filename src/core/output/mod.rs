//! Output format writers.
//!
//! This module provides writers for the two formats the tools emit:
//! - [`write_json`] / [`to_json`] - indented JSON document (sessions, survey results)
//! - [`write_jsonl`] / [`to_jsonl`] / [`JsonlWriter`] - JSON Lines (training examples)
//!
//! # Choosing a Format
//!
//! | Format | Use Case | Written |
//! |--------|----------|---------|
//! | JSON | Session lists, survey tables | Atomically, after the value is complete |
//! | JSONL | Training examples | Record by record as they are produced |
//!
//! Non-ASCII text is written verbatim in both formats.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> chatprep::Result<()> {
//! use chatprep::core::output::{write_json, write_jsonl};
//! use serde_json::json;
//!
//! write_json(&json!([{"session_start": "01/01/20, 01:00 PM"}]), "chat_sessions.json")?;
//! write_jsonl(&[json!({"label": 2})], "chat_hellaswag.jsonl")?;
//! # Ok(())
//! # }
//! ```

mod json_writer;
mod jsonl_writer;

pub use json_writer::{to_json, write_atomic, write_json};
pub use jsonl_writer::{JsonlWriter, to_jsonl, write_jsonl};
