//! # Chatprep
//!
//! A Rust library for turning WhatsApp chat exports into conversation
//! sessions and LLM fine-tuning data.
//!
//! ## Overview
//!
//! Chatprep has three tools:
//! - **Sessions**: parse a `.txt` export, drop noise messages, and split the
//!   stream into sessions separated by an inactivity gap
//! - **HellaSwag**: turn context/reply pairs into multiple-choice training
//!   examples with alternatives from an OpenAI-compatible chat API
//! - **Survey**: ask a text-generation model a multiple-choice survey many
//!   times and tabulate the answers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatprep::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let parser = WhatsAppParser::new();
//!     let export = parser.process(
//!         "chat.txt",
//!         &FilterConfig::default(),
//!         &SessionConfig::default(),
//!     )?;
//!
//!     write_json(&export.sessions, "chat_sessions.json")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Streaming for Large Files
//!
//! ```rust,no_run
//! use chatprep::streaming::{MessageIterator, WhatsAppStreamingParser};
//!
//! let parser = WhatsAppStreamingParser::new();
//! let mut messages = parser.stream("huge_chat.txt")?;
//! for msg in messages.by_ref() {
//!     let msg = msg?;
//!     println!("{}: {}", msg.author, msg.text);
//! }
//! println!("{} lines read", messages.lines_read());
//! # Ok::<(), chatprep::ChatprepError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`parsing`]: header grammar, datetime chain, line reassembly
//! - [`parsers`]: [`WhatsAppParser`](parsers::WhatsAppParser)
//! - [`streaming`]: line-by-line parsing with progress reporting
//! - [`core`]: sessions, filtering, the processing pipeline, writers
//! - [`config`]: configuration types
//! - [`generator`]: HellaSwag example generator
//! - [`survey`]: survey runner
//! - [`cli`]: CLI types
//! - [`error`]: unified error type ([`ChatprepError`], [`Result`])
//! - [`prelude`]: convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
#[cfg(feature = "generator")]
pub mod generator;
pub mod message;
pub mod parsers;
pub mod parsing;
#[cfg(feature = "streaming")]
pub mod streaming;
#[cfg(feature = "survey")]
pub mod survey;

// Re-export the main types at the crate root for convenience
pub use error::{ChatprepError, Result};
pub use message::ParsedMessage;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatprep::prelude::*;
/// ```
pub mod prelude {
    pub use crate::ParsedMessage;

    pub use crate::error::{ChatprepError, Result};

    pub use crate::config::{SessionConfig, WhatsAppConfig};

    pub use crate::core::filter::{FilterConfig, apply_filters};
    pub use crate::core::models::{Exchange, Session};
    pub use crate::core::processor::{ProcessedExport, ProcessingStats, process_messages};
    pub use crate::core::session::build_sessions;
    pub use crate::core::output::{to_json, to_jsonl, write_json, write_jsonl};

    pub use crate::parsers::WhatsAppParser;

    #[cfg(feature = "streaming")]
    pub use crate::streaming::{MessageIterator, WhatsAppStreamingParser};

    #[cfg(feature = "generator")]
    pub use crate::config::GeneratorConfig;
    #[cfg(feature = "generator")]
    pub use crate::generator::{CompletionClient, HellaSwagGenerator};

    #[cfg(feature = "survey")]
    pub use crate::config::SurveyConfig;
    #[cfg(feature = "survey")]
    pub use crate::survey::{Survey, SurveyRunner, TextGenerator};
}
