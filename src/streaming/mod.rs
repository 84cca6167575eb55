//! Streaming parser for memory-efficient processing of large chat exports.
//!
//! This module provides a streaming alternative to
//! [`WhatsAppParser`](crate::parsers::WhatsAppParser), designed for exports
//! where loading everything into memory is impractical.
//!
//! # Architecture
//!
//! - [`WhatsAppStreamingParser`] opens a file or wraps a reader
//! - [`MessageIterator`] is the iterator it returns, with progress reporting
//!
//! # Example
//!
//! ```rust,no_run
//! use chatprep::streaming::WhatsAppStreamingParser;
//!
//! let parser = WhatsAppStreamingParser::new();
//!
//! // Process messages one at a time, never loading all into memory
//! for result in parser.stream("large_chat.txt").unwrap() {
//!     match result {
//!         Ok(message) => println!("{}: {}", message.author, message.text),
//!         Err(e) => {
//!             eprintln!("Stopped: {}", e);
//!             break;
//!         }
//!     }
//! }
//! ```
//!
//! Unlike lenient record-based formats, a WhatsApp stream stops at the first
//! error: a datetime that cannot be parsed aborts the run.

mod traits;
mod whatsapp;

pub use traits::{MessageIterator, StreamingConfig};
pub use whatsapp::{WhatsAppMessageIterator, WhatsAppStreamingParser};
