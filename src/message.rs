// src/message.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One utterance in a conversation log.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: u64,
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(id: u64, sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id,
            sender,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
    System,
}

/// Reduced form of a prior message as sent to the relay. System messages
/// never appear here; they are filtered out before transmission.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WireEntry {
    pub role: WireRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WireRole {
    User,
    Assistant,
}

/// Request body for `POST /api/chat` as produced by the typed client.
/// The server side deliberately accepts a looser shape (see `services::history`).
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<WireEntry>,
}

/// Success body for `POST /api/chat`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub text: String,
}
