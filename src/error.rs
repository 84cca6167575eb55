//! Unified error types for chatprep.
//!
//! This module provides a single [`ChatprepError`] enum that covers all error
//! cases in the library, from export parsing to the API-backed dataset tools.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **Application users** get clear, actionable error messages
//! - **Developers** get source error chains for debugging

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatprep operations.
///
/// # Example
///
/// ```rust
/// use chatprep::error::Result;
/// use chatprep::core::models::Session;
///
/// fn my_function() -> Result<Vec<Session>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatprepError>;

/// The error type for all chatprep operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatprepError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - Permission denied
    /// - Disk is full (when writing output)
    /// - The input stream fails mid-read
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing/serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A header line carried a datetime that none of the known formats accept.
    ///
    /// This aborts the whole run: dropping or misdating the message would
    /// corrupt session boundaries.
    #[error("Unrecognised datetime '{raw}' on line {line}")]
    DateParse {
        /// The datetime text as it appeared in the export
        raw: String,
        /// 1-based line number in the input
        line: usize,
    },

    /// The designated input file does not exist.
    #[error("Input file not found: {}", path.display())]
    MissingInput {
        /// The path that was looked up
        path: PathBuf,
    },

    /// The output file is already present and overwriting was not requested.
    #[error("Output {} already exists. Use --overwrite to replace.", path.display())]
    OutputExists {
        /// The output path that would have been clobbered
        path: PathBuf,
    },

    /// A record in a line-oriented input did not have the expected shape.
    #[error("Invalid record on line {line}: {message}")]
    InvalidRecord {
        /// 1-based line number
        line: usize,
        /// What was wrong with it
        message: String,
    },

    /// HTTP transport or status error while talking to a model endpoint.
    #[cfg(any(feature = "generator", feature = "survey"))]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A model endpoint answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}: {body}")]
    HttpStatus {
        /// The URL that was called
        endpoint: String,
        /// The HTTP status code
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// The model answered, but not in the shape we asked for.
    #[error("Invalid model response: {0}")]
    InvalidResponse(String),

    /// All retry attempts for a single request failed.
    #[error("Gave up after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Display form of the last error seen
        last_error: String,
    },

    /// A required credential was not found in the environment.
    #[error("{variable} not found. Set it in the environment.")]
    MissingCredential {
        /// Name of the environment variable
        variable: &'static str,
    },

    /// The survey definition is unusable.
    #[error("Invalid survey: {0}")]
    InvalidSurvey(String),

    /// A configuration value is outside the range it can take.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatprepError {
    /// Creates a datetime parse error.
    pub fn date_parse(raw: impl Into<String>, line: usize) -> Self {
        ChatprepError::DateParse {
            raw: raw.into(),
            line,
        }
    }

    /// Creates a missing input error.
    pub fn missing_input(path: impl Into<PathBuf>) -> Self {
        ChatprepError::MissingInput { path: path.into() }
    }

    /// Creates an output-exists error.
    pub fn output_exists(path: impl Into<PathBuf>) -> Self {
        ChatprepError::OutputExists { path: path.into() }
    }

    /// Creates an invalid record error.
    pub fn invalid_record(line: usize, message: impl Into<String>) -> Self {
        ChatprepError::InvalidRecord {
            line,
            message: message.into(),
        }
    }

    /// Creates an HTTP status error, keeping at most 500 characters of `body`.
    pub fn http_status(endpoint: impl Into<String>, status: u16, body: &str) -> Self {
        const BODY_LIMIT: usize = 500;
        let body = match body.char_indices().nth(BODY_LIMIT) {
            Some((idx, _)) => format!("{}…", &body[..idx]),
            None => body.to_string(),
        };
        ChatprepError::HttpStatus {
            endpoint: endpoint.into(),
            status,
            body,
        }
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        ChatprepError::InvalidResponse(message.into())
    }

    /// Creates an invalid survey error.
    pub fn invalid_survey(message: impl Into<String>) -> Self {
        ChatprepError::InvalidSurvey(message.into())
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        ChatprepError::InvalidConfig(message.into())
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatprepError::Io(_))
    }

    /// Returns `true` if this is a datetime parse error.
    pub fn is_date_parse(&self) -> bool {
        matches!(self, ChatprepError::DateParse { .. })
    }

    /// Returns `true` if the input file was missing.
    pub fn is_missing_input(&self) -> bool {
        matches!(self, ChatprepError::MissingInput { .. })
    }

    /// Returns `true` if the output file already existed.
    pub fn is_output_exists(&self) -> bool {
        matches!(self, ChatprepError::OutputExists { .. })
    }

    /// Returns `true` if retrying the failed request may succeed.
    ///
    /// Client-side problems (bad credentials, missing files) are not retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            #[cfg(any(feature = "generator", feature = "survey"))]
            ChatprepError::Http(_) => true,
            ChatprepError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            ChatprepError::InvalidResponse(_) | ChatprepError::Json(_) => true,
            _ => false,
        }
    }
}
