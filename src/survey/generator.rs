//! Text-generation backends for the survey runner.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::SurveyConfig;
use crate::error::{ChatprepError, Result};

/// Continues a prompt with sampled text.
pub trait TextGenerator {
    /// Returns only the generated continuation, without the prompt.
    fn generate(&self, prompt: &str) -> Result<String>;
}

impl<G: TextGenerator + ?Sized> TextGenerator for &G {
    fn generate(&self, prompt: &str) -> Result<String> {
        (**self).generate(prompt)
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    text: String,
}

/// Client for an OpenAI-compatible `/completions` endpoint, such as a local
/// llama.cpp or vLLM server.
pub struct HttpTextGenerator {
    http: reqwest::blocking::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl HttpTextGenerator {
    pub fn new(config: &SurveyConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            http,
            endpoint: format!("{}/completions", config.endpoint),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_new_tokens,
            temperature: config.temperature,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl TextGenerator for HttpTextGenerator {
    fn generate(&self, prompt: &str) -> Result<String> {
        let request = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let mut builder = self.http.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder.send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ChatprepError::http_status(&self.endpoint, status.as_u16(), &body));
        }

        let parsed: CompletionResponse = response.json()?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or_else(|| ChatprepError::invalid_response("completion has no choices"))
    }
}
