// src/services/relay.rs
//
// Client-side transport for the chat completion relay. `ChatSession` is
// generic over this trait so tests can script responses without a server.

use thiserror::Error;

use crate::message::{ChatReply, ChatRequest, WireEntry};

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },
}

#[allow(async_fn_in_trait)]
pub trait CompletionRelay {
    /// Submit a message plus the wire-form history of the conversation and
    /// return the generated reply text.
    async fn complete(&self, message: &str, history: &[WireEntry]) -> Result<String, RelayError>;
}

/// Production transport: speaks `POST /api/chat` against a running backend.
#[derive(Clone, Debug)]
pub struct HttpRelay {
    http: reqwest::Client,
    base_url: String,
}

impl HttpRelay {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[derive(serde::Deserialize, Default)]
#[serde(default)]
struct WireError {
    error: String,
}

impl CompletionRelay for HttpRelay {
    async fn complete(&self, message: &str, history: &[WireEntry]) -> Result<String, RelayError> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            message: message.to_string(),
            history: history.to_vec(),
        };

        let response = self.http.post(&url).json(&request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<WireError>()
                .await
                .map(|e| e.error)
                .unwrap_or_default();
            return Err(RelayError::Api {
                status: status.as_u16(),
                message: if message.is_empty() {
                    "Failed to send message".to_string()
                } else {
                    message
                },
            });
        }

        let reply: ChatReply = response.json().await?;
        Ok(reply.text)
    }
}
