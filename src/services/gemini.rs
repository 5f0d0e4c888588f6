// src/services/gemini.rs
//
// Thin client for the Gemini `generateContent` REST endpoint.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::history::Turn;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// The generative-AI backend for the relay. Constructed once at startup and
/// injected through the shared state; a missing credential is an explicit
/// variant rather than a nullable client checked per request.
#[derive(Clone, Debug)]
pub enum Provider {
    Unconfigured,
    Gemini(GeminiClient),
}

impl Provider {
    pub fn from_config(config: &crate::config::Config) -> Result<Self, reqwest::Error> {
        match &config.google_api_key {
            Some(key) => Ok(Self::Gemini(GeminiClient::new(
                key.clone(),
                config.model.clone(),
                config.request_timeout,
            )?)),
            None => Ok(Self::Unconfigured),
        }
    }
}

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("request to Gemini failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("No response text received from the model")]
    EmptyResponse,
}

#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            model,
        })
    }

    /// Point the client at a different endpoint. Used by tests to talk to a
    /// local stand-in server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Submit `message` against a session seeded with `history`, returning the
    /// first candidate's text.
    pub async fn generate(&self, history: &[Turn], message: &str) -> Result<String, GeminiError> {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|t| Content {
                role: t.role.as_str(),
                parts: vec![TextPart { text: t.text.clone() }],
            })
            .collect();
        contents.push(Content {
            role: "user",
            parts: vec![TextPart { text: message.to_string() }],
        });

        let url = format!(
            "{}/v1/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self
            .http
            .post(&url)
            .json(&GenerateRequest {
                contents,
                generation_config: GenerationConfig::default(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .map(|b| b.error.message)
                .unwrap_or_default();
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response.json().await?;
        let text = body
            .candidates
            .into_iter()
            .flatten()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .flatten()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GeminiError::EmptyResponse);
        }
        tracing::debug!(model = %self.model, chars = text.len(), "generated reply");
        Ok(text)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<TextPart>,
}

#[derive(Serialize)]
struct TextPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.9,
            top_p: 1.0,
            top_k: 40,
            max_output_tokens: 2048,
        }
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ApiErrorDetail {
    message: String,
}
