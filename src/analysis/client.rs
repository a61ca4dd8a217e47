use std::env;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::analysis::prompt;
use crate::analysis::types::{
    AnalysisReport, AnalysisRequest, AudioPayload, RawAnalysis, RawTranscription,
};
use crate::config::Config;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("API key not configured (set the {0} environment variable)")]
    MissingApiKey(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("service returned no text candidates")]
    EmptyResponse,
    #[error("malformed service payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Audio-to-reference-text capability (external).
pub trait Transcriber {
    fn transcribe(&self, audio: &AudioPayload) -> Result<String, AnalysisError>;
}

/// Mistake categorization capability (external).
pub trait MistakeAnalyzer {
    fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport, AnalysisError>;
}

/// Blocking client for a generateContent-style structured-output endpoint.
/// One request is in flight at a time; the session state machine admits no
/// more than that.
pub struct GenAiClient {
    http: reqwest::blocking::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GenAiClient {
    pub fn from_config(config: &Config) -> Result<Self, AnalysisError> {
        let api_key = env::var(&config.api_key_env)
            .map_err(|_| AnalysisError::MissingApiKey(config.api_key_env.clone()))?;
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model: config.api_model.clone(),
            api_key,
        })
    }

    /// POSTs the given content parts and returns the first text part of the
    /// first candidate.
    fn generate(&self, parts: serde_json::Value) -> Result<String, AnalysisError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = json!({
            "contents": [{ "parts": parts }],
            "generationConfig": { "responseMimeType": "application/json" },
        });

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        let envelope: GenerateResponse = response.json()?;
        envelope
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .next()
            .ok_or(AnalysisError::EmptyResponse)
    }
}

impl Transcriber for GenAiClient {
    fn transcribe(&self, audio: &AudioPayload) -> Result<String, AnalysisError> {
        let parts = json!([
            { "text": prompt::TRANSCRIBE_PROMPT },
            { "inlineData": {
                "mimeType": audio.mime_type,
                "data": BASE64_STANDARD.encode(&audio.bytes),
            }},
        ]);
        let text = self.generate(parts)?;
        let raw: RawTranscription = serde_json::from_str(strip_code_fence(&text))?;
        Ok(raw.transcription)
    }
}

impl MistakeAnalyzer for GenAiClient {
    fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport, AnalysisError> {
        let parts = json!([{ "text": prompt::compare_prompt(request) }]);
        let text = self.generate(parts)?;
        let raw: RawAnalysis = serde_json::from_str(strip_code_fence(&text))?;
        Ok(raw.into())
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

/// Models sometimes wrap JSON output in a markdown code fence even when asked
/// for a JSON MIME type. Unwrap it before parsing.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
