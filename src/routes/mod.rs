// src/routes/mod.rs
pub mod catalog;
pub mod chat;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::SharedState;
use catalog::{get_conversation, get_conversations, get_stats, get_users};
use chat::chat_handler;

pub fn create_router() -> Router<SharedState> {
    let api = Router::new()
        .route("/chat", post(chat_handler))
        .route("/users", get(get_users))
        .route("/conversations", get(get_conversations))
        .route("/conversations/{id}", get(get_conversation))
        .route("/stats", get(get_stats));

    Router::new()
        .nest("/api", api)
        .route("/health", get(|| async { "OK" }))
        .fallback_service(ServeDir::new("public"))
        .layer(TraceLayer::new_for_http())
}
