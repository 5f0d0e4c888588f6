// src/routes/chat.rs
use axum::{Json, extract::State};
use serde_json::Value;

use crate::{
    error::AppError,
    message::ChatReply,
    services::{gemini::Provider, history},
    state::SharedState,
};

/// `POST /api/chat` — the completion relay. Stateless: every call is an
/// independent request against the configured provider.
///
/// The body is taken as a raw JSON value rather than a typed struct because
/// callers have shipped `history` in several shapes over time; validation and
/// normalization happen explicitly so a shape mismatch yields the documented
/// 400 instead of an extractor rejection.
pub async fn chat_handler(
    State(state): State<SharedState>,
    Json(body): Json<Value>,
) -> Result<Json<ChatReply>, AppError> {
    let client = match &state.provider {
        Provider::Gemini(client) => client,
        Provider::Unconfigured => return Err(AppError::NotConfigured),
    };

    let message = match body.get("message") {
        Some(Value::String(s)) if !s.is_empty() => s.as_str(),
        _ => {
            return Err(AppError::BadRequest(
                "Message is required and must be a string".to_string(),
            ));
        }
    };

    let raw_history = body
        .get("history")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let turns = history::normalize(raw_history);

    tracing::debug!(history_len = turns.len(), "forwarding chat message");

    let text = client
        .generate(&turns, message)
        .await
        .map_err(AppError::from_provider)?;

    Ok(Json(ChatReply { text }))
}
