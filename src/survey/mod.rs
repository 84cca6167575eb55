//! Multiple-choice survey runner.
//!
//! Asks a text-generation model every question of a [`Survey`] many times and
//! tabulates how often each choice comes back.
//!
//! # Survey file
//!
//! ```json
//! {
//!   "preamble": "Answer honestly.",
//!   "questions": [
//!     {"question": "Favourite season?", "choices": ["Spring", "Summer", "Autumn", "Winter"]}
//!   ]
//! }
//! ```
//!
//! # Results file
//!
//! Question text to answer to percentage, in survey order. Answers appear in
//! choice order, followed by [`NO_ANSWER`] when some rounds produced nothing
//! usable.
//!
//! ```json
//! {
//!   "Favourite season?": {"Summer": 61.0, "Winter": 35.0, "<no_answer>": 4.0}
//! }
//! ```

mod generator;

pub use generator::{HttpTextGenerator, TextGenerator};

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::config::SurveyConfig;
use crate::error::{ChatprepError, Result};

/// Tally key for rounds where no choice could be read from the output.
pub const NO_ANSWER: &str = "<no_answer>";

/// Choice labels `A` to `Z`.
pub const MAX_CHOICES: usize = 26;

/// A set of questions sharing one preamble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Survey {
    #[serde(default)]
    pub preamble: String,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub choices: Vec<String>,
}

impl Survey {
    /// Reads and validates a survey file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ChatprepError::missing_input(path),
            _ => ChatprepError::Io(e),
        })?;
        Self::from_json(&content)
    }

    /// Parses and validates a survey document.
    pub fn from_json(content: &str) -> Result<Self> {
        let survey: Survey = serde_json::from_str(content)?;
        survey.validate()?;
        Ok(survey)
    }

    /// Checks that every question has 1 to 26 choices and a unique text.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for q in &self.questions {
            if q.choices.is_empty() || q.choices.len() > MAX_CHOICES {
                return Err(ChatprepError::invalid_survey(format!(
                    "question '{}' has {} choices, expected 1 to {MAX_CHOICES}",
                    q.question,
                    q.choices.len()
                )));
            }
            if !seen.insert(q.question.as_str()) {
                return Err(ChatprepError::invalid_survey(format!(
                    "question '{}' appears more than once",
                    q.question
                )));
            }
        }
        Ok(())
    }
}

/// Letter for the choice at `index` (`0` is `A`).
pub fn choice_label(index: usize) -> char {
    debug_assert!(index < MAX_CHOICES);
    char::from(b'A' + index as u8)
}

/// Prompt for one question.
pub fn build_prompt(preamble: &str, question: &Question) -> String {
    let choices = question
        .choices
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {c}", choice_label(i)))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "{preamble}\n\nQuestion: {}\nChoices:\n{choices}\n\nRespond with the letter of your choice.",
        question.question
    )
}

/// Maps generated text to a choice index.
///
/// A leading valid letter wins; otherwise the first choice whose text occurs
/// anywhere in the output (case-insensitive).
pub fn interpret_answer(question: &Question, output: &str) -> Option<usize> {
    let output = output.trim().to_uppercase();

    if let Some(first) = output.chars().next() {
        if let Some(idx) = (0..question.choices.len()).position(|i| choice_label(i) == first) {
            return Some(idx);
        }
    }

    let haystack = output.to_lowercase();
    question
        .choices
        .iter()
        .position(|c| haystack.contains(&c.to_lowercase()))
}

/// Answer counts for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionTally {
    pub question: String,
    choices: Vec<String>,
    counts: Vec<usize>,
    no_answer: usize,
}

impl QuestionTally {
    fn new(question: &Question) -> Self {
        Self {
            question: question.question.clone(),
            choices: question.choices.clone(),
            counts: vec![0; question.choices.len()],
            no_answer: 0,
        }
    }

    fn record(&mut self, answer: Option<usize>) {
        match answer {
            Some(idx) => self.counts[idx] += 1,
            None => self.no_answer += 1,
        }
    }

    /// Rounds recorded.
    pub fn total(&self) -> usize {
        self.counts.iter().sum::<usize>() + self.no_answer
    }

    /// Non-zero counts in choice order, then [`NO_ANSWER`].
    pub fn counts(&self) -> Vec<(&str, usize)> {
        let mut out: Vec<(&str, usize)> = self
            .choices
            .iter()
            .zip(&self.counts)
            .filter(|&(_, &n)| n > 0)
            .map(|(c, &n)| (c.as_str(), n))
            .collect();
        if self.no_answer > 0 {
            out.push((NO_ANSWER, self.no_answer));
        }
        out
    }

    /// Same as [`counts`](Self::counts), as percentages rounded to 2 decimals.
    pub fn percentages(&self) -> Vec<(&str, f64)> {
        let total = self.total();
        if total == 0 {
            return Vec::new();
        }
        self.counts()
            .into_iter()
            .map(|(label, n)| (label, round2(n as f64 / total as f64 * 100.0)))
            .collect()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Tallies for a whole survey, serialized as the percentage table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyResults {
    pub model: String,
    pub rounds: usize,
    pub questions: Vec<QuestionTally>,
}

struct PercentTable<'a>(&'a QuestionTally);

impl Serialize for PercentTable<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let rows = self.0.percentages();
        let mut map = serializer.serialize_map(Some(rows.len()))?;
        for (label, pct) in rows {
            map.serialize_entry(label, &pct)?;
        }
        map.end()
    }
}

impl Serialize for SurveyResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.questions.len()))?;
        for tally in &self.questions {
            map.serialize_entry(&tally.question, &PercentTable(tally))?;
        }
        map.end()
    }
}

static UNSAFE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9.+-]+").expect("pattern is valid"));
static UNDERSCORES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+").expect("pattern is valid"));

/// Makes a model name safe to use as a file name prefix.
///
/// ```
/// use chatprep::survey::sanitize_model_name;
///
/// assert_eq!(sanitize_model_name("meta-llama/Llama-3.1-8B"), "meta-llama_Llama-3.1-8B");
/// assert_eq!(sanitize_model_name("__a  b__"), "a_b");
/// ```
pub fn sanitize_model_name(model: &str) -> String {
    let replaced = UNSAFE_RUN.replace_all(model, "_");
    let collapsed = UNDERSCORES.replace_all(&replaced, "_");
    collapsed.trim_matches('_').to_string()
}

/// `<dir>/<sanitized model>_survey_results.json`
pub fn results_path(model: &str, dir: &Path) -> PathBuf {
    dir.join(format!("{}_survey_results.json", sanitize_model_name(model)))
}

/// Asks every question `samples` times.
pub struct SurveyRunner<G> {
    generator: G,
    config: SurveyConfig,
}

impl<G: TextGenerator> SurveyRunner<G> {
    pub fn new(generator: G, config: SurveyConfig) -> Self {
        Self { generator, config }
    }

    /// Answers one question once. Generation failures count as no answer.
    pub fn ask(&self, preamble: &str, question: &Question) -> Option<usize> {
        let prompt = build_prompt(preamble, question);
        match self.generator.generate(&prompt) {
            Ok(output) => interpret_answer(question, &output),
            Err(e) => {
                tracing::warn!(question = %question.question, error = %e, "generation failed");
                None
            }
        }
    }

    /// Runs all rounds.
    ///
    /// # Errors
    ///
    /// [`ChatprepError::InvalidSurvey`] if the survey fails validation.
    pub fn run(&self, survey: &Survey) -> Result<SurveyResults> {
        survey.validate()?;

        let mut tallies: Vec<QuestionTally> = survey.questions.iter().map(QuestionTally::new).collect();
        for round in 0..self.config.samples {
            for (question, tally) in survey.questions.iter().zip(tallies.iter_mut()) {
                tally.record(self.ask(&survey.preamble, question));
            }
            tracing::debug!(round = round + 1, of = self.config.samples, "survey round done");
        }

        Ok(SurveyResults {
            model: self.config.model.clone(),
            rounds: self.config.samples,
            questions: tallies,
        })
    }
}
