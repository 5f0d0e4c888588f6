// src/error.rs
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::config;
use crate::services::gemini::GeminiError;

/// Failure taxonomy for the HTTP surface. Every variant maps to a structured
/// `{error, details?}` body; nothing escapes a handler unconverted.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Chat service is not configured properly")]
    NotConfigured,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("The requested AI model is not available. Please try again later.")]
    ModelUnavailable { details: Option<String> },

    #[error("Invalid or missing API key")]
    InvalidApiKey { details: Option<String> },

    #[error("{message}")]
    Provider {
        message: String,
        details: Option<String>,
    },
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    /// Classify a provider failure the way the error contract requires:
    /// unreachable/timed-out or "model not found" means the service is
    /// unavailable, credential rejections map to 401, everything else is a
    /// plain provider error carrying the provider's own message.
    pub fn from_provider(err: GeminiError) -> Self {
        let details = Some(err.to_string());
        match &err {
            GeminiError::Http(e) if e.is_timeout() || e.is_connect() => {
                Self::ModelUnavailable { details }
            }
            GeminiError::Api { status, message } => {
                if *status == 401 || *status == 403 || message.contains("API key") {
                    Self::InvalidApiKey { details }
                } else if *status == 404 || message.contains("model not found") {
                    Self::ModelUnavailable { details }
                } else {
                    Self::Provider {
                        message: if message.is_empty() {
                            "Failed to generate response".to_string()
                        } else {
                            message.clone()
                        },
                        details,
                    }
                }
            }
            GeminiError::EmptyResponse => Self::Provider {
                message: "No response text received from the model".to_string(),
                details,
            },
            _ => Self::Provider {
                message: "Failed to generate response".to_string(),
                details,
            },
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ModelUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::InvalidApiKey { .. } => StatusCode::UNAUTHORIZED,
            Self::Provider { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<&str> {
        match self {
            Self::ModelUnavailable { details }
            | Self::InvalidApiKey { details }
            | Self::Provider { details, .. } => details.as_deref(),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%status, error = %self, "chat request failed");
        }
        // Raw diagnostics are only exposed in development builds of the env.
        let details = if config::is_development() {
            self.details().map(str::to_string)
        } else {
            None
        };
        let body = ErrorBody {
            error: self.to_string(),
            details,
        };
        (status, Json(body)).into_response()
    }
}
