//! Chat export parsers.
//!
//! - [`WhatsAppParser`] - Parses WhatsApp TXT exports into
//!   [`ParsedMessage`](crate::ParsedMessage)s, or straight into sessions
//!
//! # Example
//!
//! ```rust
//! use chatprep::parsers::WhatsAppParser;
//!
//! let parser = WhatsAppParser::new();
//! let messages = parser.parse_str("7/2/20, 6:33 PM - Gilfoyle: Hi")?;
//! assert_eq!(messages[0].author, "Gilfoyle");
//! # Ok::<(), chatprep::ChatprepError>(())
//! ```

mod whatsapp;

pub use whatsapp::WhatsAppParser;
