//! Configuration types for the parser and the dataset tools.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! - [`WhatsAppConfig`] - export reading (streaming, buffer size)
//! - [`SessionConfig`] - session splitting
//! - [`RetryConfig`] - randomized exponential backoff for API calls
//! - [`GeneratorConfig`] - HellaSwag example generation
//! - [`SurveyConfig`] - multiple-choice survey runs
//!
//! Message filtering is configured with [`FilterConfig`](crate::core::filter::FilterConfig).
//!
//! # Example
//!
//! ```rust
//! use chatprep::config::{SessionConfig, WhatsAppConfig};
//!
//! let parser = WhatsAppConfig::new().with_streaming(true);
//! let sessions = SessionConfig::new().with_gap_hours(6);
//! assert_eq!(sessions.gap().unwrap().num_hours(), 6);
//! ```

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::{ChatprepError, Result};

/// Configuration for WhatsApp export reading.
///
/// # Example
///
/// ```rust
/// use chatprep::config::WhatsAppConfig;
///
/// let config = WhatsAppConfig::streaming().with_buffer_size(1024 * 1024);
/// assert!(config.streaming);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsAppConfig {
    /// Read the export line by line instead of loading it (default: false)
    pub streaming: bool,

    /// Buffer size for streaming (default: 64KB)
    pub buffer_size: usize,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            streaming: false,
            buffer_size: 64 * 1024, // 64KB
        }
    }
}

impl WhatsAppConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a streaming-optimized configuration.
    pub fn streaming() -> Self {
        Self {
            streaming: true,
            buffer_size: 256 * 1024, // 256KB for streaming
        }
    }

    /// Enables or disables streaming mode.
    #[must_use]
    pub fn with_streaming(mut self, enabled: bool) -> Self {
        self.streaming = enabled;
        self
    }

    /// Sets the buffer size for streaming. Zero is raised to one byte.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }
}

/// Default inactivity gap between sessions, in minutes.
pub const DEFAULT_GAP_MINUTES: i64 = 4 * 60;

/// Largest accepted gap, in minutes (about 1900 years).
pub const MAX_GAP_MINUTES: i64 = 1_000_000_000;

/// Configuration for splitting messages into sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Inactivity gap that starts a new session, in minutes (default: 240)
    pub gap_minutes: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            gap_minutes: DEFAULT_GAP_MINUTES,
        }
    }
}

impl SessionConfig {
    /// Creates a new configuration with the default four-hour gap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the gap threshold in whole hours.
    #[must_use]
    pub fn with_gap_hours(mut self, hours: i64) -> Self {
        self.gap_minutes = hours.saturating_mul(60);
        self
    }

    /// Sets the gap threshold in minutes.
    #[must_use]
    pub fn with_gap_minutes(mut self, minutes: i64) -> Self {
        self.gap_minutes = minutes;
        self
    }

    /// Returns the gap threshold.
    ///
    /// # Errors
    ///
    /// [`ChatprepError::InvalidConfig`] unless the gap is between one minute
    /// and [`MAX_GAP_MINUTES`].
    pub fn gap(&self) -> Result<TimeDelta> {
        if !(1..=MAX_GAP_MINUTES).contains(&self.gap_minutes) {
            return Err(ChatprepError::invalid_config(format!(
                "session gap must be between 1 and {MAX_GAP_MINUTES} minutes, got {}",
                self.gap_minutes
            )));
        }
        TimeDelta::try_minutes(self.gap_minutes).ok_or_else(|| {
            ChatprepError::invalid_config(format!(
                "session gap of {} minutes is out of range",
                self.gap_minutes
            ))
        })
    }
}

/// Randomized exponential backoff settings.
///
/// Attempt `n` (0-based) waits a uniform random time in
/// `[min_backoff_ms, min(max_backoff_ms, min_backoff_ms * 2^n)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts including the first (default: 6)
    pub max_attempts: u32,

    /// Lower bound of every wait (default: 1s)
    pub min_backoff_ms: u64,

    /// Upper bound of every wait (default: 60s)
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            min_backoff_ms: 1_000,
            max_backoff_ms: 60_000,
        }
    }
}

impl RetryConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the attempt ceiling. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Sets the backoff window.
    #[must_use]
    pub fn with_backoff_ms(mut self, min: u64, max: u64) -> Self {
        self.min_backoff_ms = min;
        self.max_backoff_ms = max.max(min);
        self
    }

    /// Disables sleeping between attempts (tests, local mocks).
    #[must_use]
    pub fn without_backoff(self) -> Self {
        self.with_backoff_ms(0, 0)
    }
}

/// Default OpenAI-compatible API root.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model for the generator.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Configuration for HellaSwag example generation.
///
/// # Example
///
/// ```rust
/// use chatprep::config::GeneratorConfig;
///
/// let config = GeneratorConfig::new()
///     .with_api_key("sk-test")
///     .with_seed(7)
///     .with_overwrite(true);
/// assert_eq!(config.seed, 7);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Chat model name (default: `gpt-3.5-turbo`)
    pub model: String,

    /// API root, without trailing slash (default: OpenAI)
    pub base_url: String,

    /// Bearer token
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Sampling temperature (default: 0.9)
    pub temperature: f64,

    /// Completion length cap (default: 120)
    pub max_tokens: u32,

    /// Retry behaviour for each record
    pub retry: RetryConfig,

    /// Seed for shuffling endings (default: 42)
    pub seed: u64,

    /// Pause between records in milliseconds (default: 200)
    pub pacing_ms: u64,

    /// Replace an existing output file (default: false)
    pub overwrite: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_OPENAI_MODEL.to_string(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            api_key: None,
            temperature: 0.9,
            max_tokens: 120,
            retry: RetryConfig::default(),
            seed: 42,
            pacing_ms: 200,
            overwrite: false,
        }
    }
}

impl GeneratorConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a configuration from `OPENAI_API_KEY`, `OPENAI_MODEL` and
    /// `OPENAI_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatprepError::MissingCredential`] when no API key is set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or(ChatprepError::MissingCredential {
                variable: "OPENAI_API_KEY",
            })?;

        let mut config = Self::default().with_api_key(api_key);
        if let Some(model) = lookup("OPENAI_MODEL").filter(|m| !m.trim().is_empty()) {
            config.model = model;
        }
        if let Some(url) = lookup("OPENAI_BASE_URL").filter(|u| !u.trim().is_empty()) {
            config = config.with_base_url(url);
        }
        Ok(config)
    }

    /// Sets the model name.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the API root.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the retry behaviour.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the shuffle seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the pause between records.
    #[must_use]
    pub fn with_pacing_ms(mut self, ms: u64) -> Self {
        self.pacing_ms = ms;
        self
    }

    /// Sets whether an existing output may be replaced.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// Configuration for survey runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    /// Model name sent to the endpoint and used to name the results file
    /// (default: `distilgpt2`)
    pub model: String,

    /// OpenAI-compatible API root of the text-generation server
    /// (default: `http://localhost:8000/v1`)
    pub endpoint: String,

    /// Optional bearer token
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Rounds; every question is asked once per round (default: 100)
    pub samples: usize,

    /// Sampling temperature (default: 0.7)
    pub temperature: f64,

    /// Tokens to generate per answer (default: 1)
    pub max_new_tokens: u32,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            model: "distilgpt2".to_string(),
            endpoint: "http://localhost:8000/v1".to_string(),
            api_key: None,
            samples: 100,
            temperature: 0.7,
            max_new_tokens: 1,
        }
    }
}

impl SurveyConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model name.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the API root.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the number of rounds.
    #[must_use]
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the tokens generated per answer.
    #[must_use]
    pub fn with_max_new_tokens(mut self, tokens: u32) -> Self {
        self.max_new_tokens = tokens;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_whatsapp_config_default() {
        let config = WhatsAppConfig::default();
        assert!(!config.streaming);
        assert_eq!(config.buffer_size, 64 * 1024);
    }

    #[test]
    fn test_whatsapp_config_streaming() {
        let config = WhatsAppConfig::streaming();
        assert!(config.streaming);
        assert_eq!(config.buffer_size, 256 * 1024);
    }

    #[test]
    fn test_session_config_gap() {
        assert_eq!(SessionConfig::default().gap().unwrap(), TimeDelta::hours(4));
        assert_eq!(
            SessionConfig::new().with_gap_minutes(90).gap().unwrap(),
            TimeDelta::minutes(90)
        );
        assert_eq!(SessionConfig::new().with_gap_hours(1).gap_minutes, 60);
    }

    #[test]
    fn test_session_config_gap_out_of_range() {
        for minutes in [0, -5, MAX_GAP_MINUTES + 1, i64::MAX, i64::MIN] {
            let err = SessionConfig::new().with_gap_minutes(minutes).gap().unwrap_err();
            assert!(matches!(err, ChatprepError::InvalidConfig(_)), "{minutes}: {err}");
        }
        assert!(SessionConfig::new().with_gap_hours(i64::MAX).gap().is_err());
        assert_eq!(
            SessionConfig::new().with_gap_minutes(MAX_GAP_MINUTES).gap().unwrap(),
            TimeDelta::minutes(MAX_GAP_MINUTES)
        );
    }

    #[test]
    fn test_retry_config_builder() {
        let retry = RetryConfig::new().with_max_attempts(0).with_backoff_ms(500, 100);
        assert_eq!(retry.max_attempts, 1);
        assert_eq!(retry.min_backoff_ms, 500);
        assert_eq!(retry.max_backoff_ms, 500);

        let none = RetryConfig::new().without_backoff();
        assert_eq!((none.min_backoff_ms, none.max_backoff_ms), (0, 0));
    }

    #[test]
    fn test_generator_from_lookup_requires_key() {
        let err = GeneratorConfig::from_lookup(|_| None).unwrap_err();
        assert!(matches!(
            err,
            ChatprepError::MissingCredential {
                variable: "OPENAI_API_KEY"
            }
        ));

        let blank = GeneratorConfig::from_lookup(|k| (k == "OPENAI_API_KEY").then(|| " ".into()));
        assert!(blank.is_err());
    }

    #[test]
    fn test_generator_from_lookup_overrides() {
        let vars: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
            ("OPENAI_BASE_URL", "http://localhost:1234/v1/"),
        ]
        .into_iter()
        .collect();

        let config = GeneratorConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.base_url, "http://localhost:1234/v1");
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_generator_from_lookup_defaults() {
        let config =
            GeneratorConfig::from_lookup(|k| (k == "OPENAI_API_KEY").then(|| "sk".into())).unwrap();
        assert_eq!(config.model, DEFAULT_OPENAI_MODEL);
        assert_eq!(config.base_url, DEFAULT_OPENAI_BASE_URL);
    }

    #[test]
    fn test_api_key_not_serialized() {
        let config = GeneratorConfig::new().with_api_key("secret");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_survey_config_builder() {
        let config = SurveyConfig::new()
            .with_model("gpt2")
            .with_endpoint("http://127.0.0.1:8080/v1/")
            .with_samples(10)
            .with_temperature(1.0)
            .with_max_new_tokens(3);
        assert_eq!(config.model, "gpt2");
        assert_eq!(config.endpoint, "http://127.0.0.1:8080/v1");
        assert_eq!(config.samples, 10);
        assert_eq!(config.max_new_tokens, 3);
    }
}
