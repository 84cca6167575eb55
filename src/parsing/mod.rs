//! Shared parsing utilities.
//!
//! This module contains the header grammar, timestamp chain, and reassembly
//! state machine used by both the standard and streaming WhatsApp parsers.

pub mod reassembler;
pub mod whatsapp;

pub use reassembler::{LineReassembler, Reassemble, reassemble_str};
pub use whatsapp::{
    DateFormat, HeaderLine, INVISIBLE_MARKS, parse_header_line, parse_whatsapp_timestamp,
    strip_invisible,
};
