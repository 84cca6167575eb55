//! HellaSwag-style training examples from context/reply pairs.
//!
//! Each input line is a [`TrainingSnippet`]. For every snippet a chat model
//! is asked for four plausible alternative replies; the original reply is
//! mixed in among them and the position of the original becomes the label.
//!
//! ```text
//! {"context": "...", "output": "sure, 7pm?"}
//!     -> {"context": "...", "ending0": "...", ..., "ending4": "...", "label": 3}
//! ```
//!
//! Shuffling uses a seeded RNG, so a rerun over the same input with the same
//! model answers produces the same file.
//!
//! # Example
//!
//! ```rust
//! use chatprep::generator::{CompletionClient, HellaSwagGenerator};
//! use chatprep::config::GeneratorConfig;
//! use chatprep::core::JsonlWriter;
//!
//! struct Canned;
//! impl CompletionClient for Canned {
//!     fn complete(&self, _system: &str, _user: &str) -> chatprep::Result<String> {
//!         Ok(r#"["a", "b", "c", "d"]"#.to_string())
//!     }
//! }
//!
//! let generator = HellaSwagGenerator::new(Canned, GeneratorConfig::new().with_pacing_ms(0));
//! let input = r#"{"context": "Dinner?", "output": "Sure"}"#;
//! let mut out = JsonlWriter::new(Vec::new());
//! let stats = generator.generate(input.as_bytes(), &mut out)?;
//! assert_eq!(stats.written, 1);
//! # Ok::<(), chatprep::ChatprepError>(())
//! ```

mod client;
mod retry;

pub use client::{CompletionClient, OpenAiClient};
pub use retry::{backoff_delay, retry_with_backoff};

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::GeneratorConfig;
use crate::core::JsonlWriter;
use crate::error::{ChatprepError, Result};

/// System prompt asking for four alternative replies.
pub const SYSTEM_PROMPT: &str = "You are generating alternative chat replies. You will be given a chat context \
and the original reply. Produce FOUR different, brief (≤15 words) replies a person \
could plausibly say in that context. Do not repeat the original reply. \
Return ONLY a JSON array of four strings with no additional text.";

/// Characters of a malformed line echoed into the warning.
const MALFORMED_PREVIEW: usize = 120;

/// One conversational context and the reply that followed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSnippet {
    pub context: String,
    pub output: String,
}

/// One multiple-choice example with five candidate endings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HellaSwagEntry {
    pub context: String,
    pub ending0: String,
    pub ending1: String,
    pub ending2: String,
    pub ending3: String,
    pub ending4: String,
    /// Index of the original reply among the endings.
    pub label: usize,
}

impl HellaSwagEntry {
    pub fn from_endings(context: impl Into<String>, endings: [String; 5], label: usize) -> Self {
        let [ending0, ending1, ending2, ending3, ending4] = endings;
        Self {
            context: context.into(),
            ending0,
            ending1,
            ending2,
            ending3,
            ending4,
            label,
        }
    }

    /// Endings in label order.
    pub fn endings(&self) -> [&str; 5] {
        [
            &self.ending0,
            &self.ending1,
            &self.ending2,
            &self.ending3,
            &self.ending4,
        ]
    }
}

/// Counters for one generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Non-blank input lines.
    pub read: usize,
    /// Entries written.
    pub written: usize,
    /// Lines that were not a valid snippet.
    pub skipped_malformed: usize,
    /// Snippets whose alternatives could not be obtained.
    pub skipped_failed: usize,
}

/// User message for one snippet.
pub fn user_prompt(context: &str, original: &str) -> String {
    format!("Chat context:\n{context}\n\nOriginal reply:\n{original}\n")
}

/// Parses a model reply that must be a JSON array of exactly four items.
///
/// Items are trimmed; non-string items are kept in their JSON form.
///
/// # Errors
///
/// [`ChatprepError::InvalidResponse`] for anything else.
pub fn parse_alternatives(raw: &str) -> Result<[String; 4]> {
    let value: serde_json::Value = serde_json::from_str(raw.trim())
        .map_err(|e| ChatprepError::invalid_response(format!("{e}; raw output: {raw}")))?;

    let serde_json::Value::Array(items) = value else {
        return Err(ChatprepError::invalid_response(
            "expected a JSON array of four strings",
        ));
    };

    let items: Vec<String> = items
        .into_iter()
        .map(|item| match item {
            serde_json::Value::String(s) => s.trim().to_string(),
            other => other.to_string(),
        })
        .collect();

    <[String; 4]>::try_from(items).map_err(|items| {
        ChatprepError::invalid_response(format!(
            "expected a JSON array of four strings, got {} items",
            items.len()
        ))
    })
}

/// Shuffles the original reply in among the alternatives.
pub fn create_entry<R: Rng + ?Sized>(
    context: &str,
    original: &str,
    alternatives: [String; 4],
    rng: &mut R,
) -> HellaSwagEntry {
    let [a, b, c, d] = alternatives;
    let mut endings = [a, b, c, d, original.to_string()];
    endings.shuffle(rng);
    let label = endings
        .iter()
        .position(|e| e == original)
        .unwrap_or(endings.len() - 1);
    HellaSwagEntry::from_endings(context, endings, label)
}

/// `<output_dir>/<input stem>_hellaswag.jsonl`
pub fn default_output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "output".into(), |s| s.to_string_lossy());
    output_dir.join(format!("{stem}_hellaswag.jsonl"))
}

/// Drives a [`CompletionClient`] over a snippet file.
pub struct HellaSwagGenerator<C> {
    client: C,
    config: GeneratorConfig,
}

impl<C: CompletionClient> HellaSwagGenerator<C> {
    pub fn new(client: C, config: GeneratorConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Asks the model for four alternatives, retrying transient failures.
    pub fn alternatives(&self, context: &str, original: &str) -> Result<[String; 4]> {
        let prompt = user_prompt(context, original);
        retry_with_backoff(&self.config.retry, "alternatives", |_| {
            let raw = self.client.complete(SYSTEM_PROMPT, &prompt)?;
            parse_alternatives(&raw).inspect_err(|e| {
                tracing::warn!(error = %e, "model reply was not four alternatives");
            })
        })
    }

    /// Reads snippets from `input` and writes one entry per usable line.
    ///
    /// Malformed lines and snippets whose alternatives could not be obtained
    /// are logged and skipped; only I/O failures on the output abort the run.
    pub fn generate<R, W>(&self, input: R, out: &mut JsonlWriter<W>) -> Result<GenerationStats>
    where
        R: BufRead,
        W: Write,
    {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut stats = GenerationStats::default();
        let pacing = Duration::from_millis(self.config.pacing_ms);

        for (idx, line) in input.lines().enumerate() {
            let line_num = idx + 1;
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            stats.read += 1;

            let snippet: TrainingSnippet = match serde_json::from_str(&line) {
                Ok(snippet) => snippet,
                Err(e) => {
                    let preview: String = line.chars().take(MALFORMED_PREVIEW).collect();
                    tracing::warn!(
                        line = line_num,
                        error = %e,
                        raw = %preview,
                        "skipping line: not a training snippet"
                    );
                    stats.skipped_malformed += 1;
                    continue;
                }
            };
            let context = snippet.context.trim();
            let original = snippet.output.trim();

            let alternatives = match self.alternatives(context, original) {
                Ok(alts) => alts,
                Err(e) => {
                    tracing::error!(line = line_num, error = %e, "failed to generate alternatives");
                    stats.skipped_failed += 1;
                    continue;
                }
            };

            let entry = create_entry(context, original, alternatives, &mut rng);
            out.write_record(&entry)?;
            stats.written += 1;

            if !pacing.is_zero() {
                std::thread::sleep(pacing);
            }
        }

        Ok(stats)
    }

    /// Converts `input` into `output`.
    ///
    /// # Errors
    ///
    /// [`ChatprepError::MissingInput`] if `input` does not exist and
    /// [`ChatprepError::OutputExists`] if `output` exists and overwriting is
    /// off. Both checks happen before anything is written.
    pub fn process_file(&self, input: &Path, output: &Path) -> Result<GenerationStats> {
        if !input.is_file() {
            return Err(ChatprepError::missing_input(input));
        }
        if output.exists() && !self.config.overwrite {
            return Err(ChatprepError::output_exists(output));
        }
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        tracing::info!(input = %input.display(), output = %output.display(), "generating examples");
        let reader = BufReader::new(File::open(input)?);
        let mut writer = JsonlWriter::create(output)?;
        let stats = self.generate(reader, &mut writer)?;
        tracing::info!(written = stats.written, "finished generating examples");
        Ok(stats)
    }
}
