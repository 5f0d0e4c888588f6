// src/services/session.rs
//
// Client-held state for one active conversation: the ordered message log plus
// loading/error flags, and the orchestration of a single send.

use uuid::Uuid;

use super::relay::CompletionRelay;
use crate::message::{Message, Sender, WireEntry, WireRole};

const GREETING: &str = "How can I help you today?";
const NO_REPLY_FALLBACK: &str =
    "I'm sorry, I couldn't generate a response. Please try again later.";
const CONNECTION_FALLBACK: &str =
    "I'm having trouble connecting to the AI service. Please try again in a moment.";

pub struct ChatSession<R> {
    id: Uuid,
    relay: R,
    messages: Vec<Message>,
    next_id: u64,
    is_loading: bool,
    error: Option<String>,
}

impl<R: CompletionRelay> ChatSession<R> {
    pub fn new(relay: R) -> Self {
        Self {
            id: Uuid::new_v4(),
            relay,
            messages: Vec::new(),
            next_id: 1,
            is_loading: false,
            error: None,
        }
    }

    /// Seed a session from an existing conversation. If the seeded log does
    /// not open on a user turn, a synthetic system greeting is prepended so
    /// the displayed conversation never starts with the assistant speaking.
    pub fn with_history(relay: R, initial: Vec<Message>) -> Self {
        let mut session = Self::new(relay);
        session.next_id = initial.iter().map(|m| m.id + 1).max().unwrap_or(1);
        if !initial.is_empty() && initial[0].sender != Sender::User {
            // The greeting sits in front of the seed, so its id sits below
            // the seed's smallest id.
            let greeting_id = initial
                .iter()
                .map(|m| m.id)
                .min()
                .unwrap_or(1)
                .saturating_sub(1);
            session
                .messages
                .push(Message::new(greeting_id, Sender::System, GREETING));
        }
        session.messages.extend(initial);
        session
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Send a user message and wait for the assistant's reply.
    ///
    /// The user message is appended before any network activity, so it stays
    /// visible regardless of the outcome. Exactly one user and one assistant
    /// entry are appended per effective call; failures surface through
    /// `error()` and a fallback assistant bubble, never as an `Err`.
    pub async fn send_message(&mut self, content: &str) {
        let content = content.trim();
        if content.is_empty() {
            return;
        }
        if self.is_loading {
            // Single-flight guard. Plain `&mut` callers cannot overlap sends;
            // this branch is for wrappers with interior mutability (RefCell,
            // Mutex) that re-enter while a send is suspended at the relay.
            tracing::warn!(session = %self.id, "send ignored: a message is already in flight");
            return;
        }

        let history = self.wire_history();
        self.push(Sender::User, content);
        self.is_loading = true;
        self.error = None;

        let outcome = self.relay.complete(content, &history).await;
        match outcome {
            Ok(text) => {
                let reply = if text.trim().is_empty() {
                    NO_REPLY_FALLBACK.to_string()
                } else {
                    text
                };
                self.push(Sender::Assistant, reply);
            }
            Err(err) => {
                tracing::warn!(session = %self.id, %err, "send failed");
                self.push(Sender::Assistant, CONNECTION_FALLBACK);
                self.error = Some(err.to_string());
            }
        }
        self.is_loading = false;
    }

    /// Empty the log. Deliberately does not re-seed a greeting; callers that
    /// want one re-populate after clearing.
    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }

    /// Unconditional overwrite, used when switching conversations.
    pub fn set_messages(&mut self, replacement: Vec<Message>) {
        let replaced_max = replacement.iter().map(|m| m.id + 1).max().unwrap_or(0);
        self.next_id = self.next_id.max(replaced_max);
        self.messages = replacement;
    }

    fn push(&mut self, sender: Sender, content: impl Into<String>) {
        let msg = Message::new(self.next_id, sender, content);
        self.next_id += 1;
        self.messages.push(msg);
    }

    /// Wire-form history of everything said so far, excluding system turns.
    fn wire_history(&self) -> Vec<WireEntry> {
        self.messages
            .iter()
            .filter(|m| m.sender != Sender::System)
            .map(|m| WireEntry {
                role: match m.sender {
                    Sender::User => WireRole::User,
                    _ => WireRole::Assistant,
                },
                content: m.content.clone(),
                timestamp: m.timestamp,
            })
            .collect()
    }
}
