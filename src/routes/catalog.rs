// src/routes/catalog.rs
use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    error::AppError,
    services::catalog::{Conversation, DashboardStats, User},
    state::SharedState,
};

pub async fn get_users(State(state): State<SharedState>) -> Json<Vec<User>> {
    Json(state.catalog.users().to_vec())
}

pub async fn get_conversations(State(state): State<SharedState>) -> Json<Vec<Conversation>> {
    Json(state.catalog.conversations().to_vec())
}

pub async fn get_conversation(
    State(state): State<SharedState>,
    Path(id): Path<u32>,
) -> Result<Json<Conversation>, AppError> {
    state
        .catalog
        .conversation(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Conversation {id} not found")))
}

pub async fn get_stats(State(state): State<SharedState>) -> Json<DashboardStats> {
    Json(state.catalog.stats().clone())
}
