//! Core processing logic for chatprep.
//!
//! This module contains:
//! - [`models`] - Output structures (`Exchange`, `Session`)
//! - [`filter`] - Noise message filtering
//! - [`session`] - Gap-based session splitting
//! - [`processor`] - Filter + sessionize pipeline and statistics
//! - [`output`] - Format writers (JSON, JSONL)
//!
//! # Quick Start
//!
//! ```rust
//! use chatprep::config::SessionConfig;
//! use chatprep::core::{FilterConfig, process_messages, to_json};
//! use chatprep::parsing::reassemble_str;
//!
//! # fn main() -> chatprep::Result<()> {
//! let messages = reassemble_str("7/2/20, 6:33 PM - Gilfoyle: Is this a good brand?")?;
//! let out = process_messages(messages, &FilterConfig::default(), &SessionConfig::default())?;
//! let json = to_json(&out.sessions)?;
//! assert!(json.contains("07/02/20, 06:33 PM"));
//! # Ok(())
//! # }
//! ```

pub mod filter;
pub mod models;
pub mod output;
pub mod processor;
pub mod session;

// Re-export main types for convenience
pub use filter::{FilterConfig, apply_filters};
pub use models::{Exchange, OUTPUT_TIME_FORMAT, Session, format_timestamp};
pub use output::{JsonlWriter, to_json, to_jsonl, write_atomic, write_json, write_jsonl};
pub use processor::{ProcessedExport, ProcessingStats, SessionPipeline, process_messages};
pub use session::{SessionBuilder, build_sessions};
