//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - top-level arguments and the global verbosity flag
//! - [`Command`] - one subcommand per tool
//! - [`SessionsArgs`], [`HellaswagArgs`], [`SurveyArgs`] - per-tool options,
//!   each able to build the matching library config
//!
//! ```rust
//! use chatprep::cli::{Args, Command};
//! use clap::Parser;
//!
//! let args = Args::parse_from(["chatprep", "wa", "chat.txt", "--gap-minutes", "90"]);
//! let Command::Sessions(sessions) = args.command else { unreachable!() };
//! assert_eq!(sessions.session_config().gap_minutes, 90);
//! ```

use std::path::{Path, PathBuf};

use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};

#[cfg(feature = "generator")]
use crate::config::GeneratorConfig;
#[cfg(feature = "survey")]
use crate::config::SurveyConfig;
use crate::config::{SessionConfig, WhatsAppConfig};
use crate::core::FilterConfig;

/// Build fine-tuning data from WhatsApp chat exports.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatprep")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatprep sessions data/raw/chat.txt
    chatprep wa chat.txt -o sessions.json --gap-minutes 120 --streaming
    chatprep hellaswag pairs.jsonl --overwrite
    chatprep survey questions.json --model distilgpt2 --samples 50")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// The available tools.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Split a WhatsApp export into conversation sessions
    #[command(visible_alias = "wa", alias = "parse")]
    Sessions(SessionsArgs),

    /// Turn context/reply pairs into HellaSwag-style examples
    #[cfg(feature = "generator")]
    #[command(visible_alias = "hs")]
    Hellaswag(HellaswagArgs),

    /// Ask a model a multiple-choice survey and tabulate the answers
    #[cfg(feature = "survey")]
    #[command(visible_alias = "sv")]
    Survey(SurveyArgs),
}

/// Default directory for session files.
pub const DEFAULT_SESSIONS_DIR: &str = "data/processed";

/// Default directory for HellaSwag files.
pub const DEFAULT_HELLASWAG_DIR: &str = "data/hellaswag_format";

#[derive(ClapArgs, Debug, Clone)]
pub struct SessionsArgs {
    /// Path to the WhatsApp .txt export
    pub input: PathBuf,

    /// Output file (default: <output-dir>/<input stem>_sessions.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory used when --output is not given
    #[arg(long, default_value = DEFAULT_SESSIONS_DIR)]
    pub output_dir: PathBuf,

    /// Inactivity gap that starts a new session, in minutes
    #[arg(
        long,
        value_name = "MINUTES",
        default_value_t = crate::config::DEFAULT_GAP_MINUTES,
        value_parser = clap::value_parser!(i64).range(1..=crate::config::MAX_GAP_MINUTES)
    )]
    pub gap_minutes: i64,

    /// Read the export line by line instead of loading it whole
    #[arg(long)]
    pub streaming: bool,

    /// Keep media placeholders and URL-only messages
    #[arg(long)]
    pub keep_all: bool,
}

impl SessionsArgs {
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => self
                .output_dir
                .join(format!("{}_sessions.json", file_stem(&self.input))),
        }
    }

    pub fn filter_config(&self) -> FilterConfig {
        if self.keep_all {
            FilterConfig::none()
        } else {
            FilterConfig::default()
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new().with_gap_minutes(self.gap_minutes)
    }

    pub fn parser_config(&self) -> WhatsAppConfig {
        if self.streaming {
            WhatsAppConfig::streaming()
        } else {
            WhatsAppConfig::new()
        }
    }
}

#[cfg(feature = "generator")]
#[derive(ClapArgs, Debug, Clone)]
pub struct HellaswagArgs {
    /// JSON Lines file of {"context", "output"} records
    pub input: PathBuf,

    /// Output file (default: <output-dir>/<input stem>_hellaswag.jsonl)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory used when --output is not given
    #[arg(long, default_value = DEFAULT_HELLASWAG_DIR)]
    pub output_dir: PathBuf,

    /// Overwrite the output file if present
    #[arg(long)]
    pub overwrite: bool,

    /// Chat model (overrides OPENAI_MODEL)
    #[arg(long)]
    pub model: Option<String>,

    /// Shuffle seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Delay between records, in milliseconds
    #[arg(long, value_name = "MS")]
    pub pacing_ms: Option<u64>,

    /// Attempts per record before it is skipped
    #[arg(long)]
    pub max_attempts: Option<u32>,
}

#[cfg(feature = "generator")]
impl HellaswagArgs {
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => crate::generator::default_output_path(&self.input, &self.output_dir),
        }
    }

    /// Applies the flags on top of `base` (usually [`GeneratorConfig::from_env`]).
    pub fn apply(&self, base: GeneratorConfig) -> GeneratorConfig {
        let mut config = base.with_overwrite(self.overwrite);
        if let Some(model) = &self.model {
            config = config.with_model(model.clone());
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(ms) = self.pacing_ms {
            config = config.with_pacing_ms(ms);
        }
        if let Some(attempts) = self.max_attempts {
            let retry = config.retry.with_max_attempts(attempts);
            config = config.with_retry(retry);
        }
        config
    }
}

#[cfg(feature = "survey")]
#[derive(ClapArgs, Debug, Clone)]
pub struct SurveyArgs {
    /// Survey definition (JSON)
    pub survey: PathBuf,

    /// Model name sent to the endpoint and used in the results file name
    #[arg(long)]
    pub model: Option<String>,

    /// Base URL of an OpenAI-compatible completions server
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Rounds per question
    #[arg(long)]
    pub samples: Option<usize>,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Output file (default: <output-dir>/<model>_survey_results.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory used when --output is not given
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}

#[cfg(feature = "survey")]
impl SurveyArgs {
    pub fn survey_config(&self) -> SurveyConfig {
        let mut config = SurveyConfig::new();
        if let Some(model) = &self.model {
            config = config.with_model(model.clone());
        }
        if let Some(endpoint) = &self.endpoint {
            config = config.with_endpoint(endpoint.clone());
        }
        if let Some(samples) = self.samples {
            config = config.with_samples(samples);
        }
        if let Some(temperature) = self.temperature {
            config = config.with_temperature(temperature);
        }
        config
    }

    pub fn output_path(&self, model: &str) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => crate::survey::results_path(model, &self.output_dir),
        }
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "chat".to_string())
}
