// src/config.rs
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Process configuration, read once at startup.
///
/// A missing `GOOGLE_AI_API_KEY` does not prevent the server from starting;
/// the chat endpoint degrades to a fixed "not configured" error instead.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub google_api_key: Option<String>,
    pub model: String,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let google_api_key = std::env::var("GOOGLE_AI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        if google_api_key.is_none() {
            tracing::warn!("GOOGLE_AI_API_KEY is not set; chat requests will fail");
        }

        let model = std::env::var("GEMINI_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let timeout_secs = std::env::var("CHAT_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            google_api_key,
            model,
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }
}

/// Whether error responses may carry raw diagnostics in a `details` field.
pub fn is_development() -> bool {
    matches!(std::env::var("APP_ENV"), Ok(v) if v == "development")
}
