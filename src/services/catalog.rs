// src/services/catalog.rs
//
// In-memory mock data behind the dashboard's read-only listing endpoints.
// There is no persistence; the seed below stands in for a real backend.

use serde::Serialize;

use crate::message::{Message, Sender};

#[derive(Clone, Debug, Serialize)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub status: UserStatus,
    pub plan: String,
    pub last_active: String,
    pub conversations: u32,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

#[derive(Clone, Debug, Serialize)]
pub struct Conversation {
    pub id: u32,
    pub user: String,
    pub user_id: u32,
    pub avatar: String,
    pub last_message: String,
    pub time: String,
    pub status: ConversationStatus,
    pub unread: bool,
    pub messages: Vec<TranscriptEntry>,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    Active,
    Waiting,
    Resolved,
}

/// One line of a stored transcript. `customer` maps onto the session's user
/// role, `agent` onto the assistant role.
#[derive(Clone, Debug, Serialize)]
pub struct TranscriptEntry {
    pub id: u32,
    pub sender: TranscriptSender,
    pub content: String,
    pub time: String,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptSender {
    Customer,
    Agent,
}

#[derive(Clone, Debug, Serialize)]
pub struct DashboardStats {
    pub active_users: StatEntry,
    pub conversations: StatEntry,
    pub response_time: StatEntry,
    pub activity: StatEntry,
}

#[derive(Clone, Debug, Serialize)]
pub struct StatEntry {
    pub value: String,
    pub change: f32,
}

#[derive(Clone, Debug)]
pub struct Catalog {
    users: Vec<User>,
    conversations: Vec<Conversation>,
    stats: DashboardStats,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seed()
    }
}

impl Catalog {
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn conversation(&self, id: u32) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    /// Convert a stored transcript into session messages, ready to seed a
    /// `ChatSession` when the operator opens the conversation.
    pub fn seed_messages(conversation: &Conversation) -> Vec<Message> {
        conversation
            .messages
            .iter()
            .map(|entry| {
                let sender = match entry.sender {
                    TranscriptSender::Customer => Sender::User,
                    TranscriptSender::Agent => Sender::Assistant,
                };
                Message::new(u64::from(entry.id), sender, entry.content.clone())
            })
            .collect()
    }

    pub fn seed() -> Self {
        let users = vec![
            User {
                id: 1,
                name: "Sarah Johnson".into(),
                email: "sarah.johnson@example.com".into(),
                status: UserStatus::Active,
                plan: "Premium".into(),
                last_active: "5 minutes ago".into(),
                conversations: 12,
            },
            User {
                id: 2,
                name: "Michael Brown".into(),
                email: "michael.brown@example.com".into(),
                status: UserStatus::Active,
                plan: "Premium".into(),
                last_active: "15 minutes ago".into(),
                conversations: 8,
            },
            User {
                id: 3,
                name: "Emily Davis".into(),
                email: "emily.davis@example.com".into(),
                status: UserStatus::Inactive,
                plan: "Basic".into(),
                last_active: "3 days ago".into(),
                conversations: 5,
            },
            User {
                id: 4,
                name: "David Wilson".into(),
                email: "david.wilson@example.com".into(),
                status: UserStatus::Active,
                plan: "Basic".into(),
                last_active: "1 hour ago".into(),
                conversations: 3,
            },
        ];

        let conversations = vec![
            Conversation {
                id: 1,
                user: "Sarah Johnson".into(),
                user_id: 1,
                avatar: "SJ".into(),
                last_message: "I need help with my account settings".into(),
                time: "5m ago".into(),
                status: ConversationStatus::Active,
                unread: true,
                messages: vec![
                    TranscriptEntry {
                        id: 1,
                        sender: TranscriptSender::Customer,
                        content: "Hi there! I need help with my account settings.".into(),
                        time: "10:05 AM".into(),
                    },
                    TranscriptEntry {
                        id: 2,
                        sender: TranscriptSender::Agent,
                        content: "Hello Sarah! What settings are you trying to adjust?".into(),
                        time: "10:07 AM".into(),
                    },
                    TranscriptEntry {
                        id: 3,
                        sender: TranscriptSender::Customer,
                        content: "I can't find my notification preferences.".into(),
                        time: "10:08 AM".into(),
                    },
                ],
            },
            Conversation {
                id: 2,
                user: "Michael Brown".into(),
                user_id: 2,
                avatar: "MB".into(),
                last_message: "How do I upgrade my plan?".into(),
                time: "15m ago".into(),
                status: ConversationStatus::Active,
                unread: true,
                messages: vec![
                    TranscriptEntry {
                        id: 1,
                        sender: TranscriptSender::Agent,
                        content: "Hi Michael! We offer Basic, Premium and Enterprise tiers.".into(),
                        time: "10:32 AM".into(),
                    },
                    TranscriptEntry {
                        id: 2,
                        sender: TranscriptSender::Customer,
                        content: "I need more users and better analytics.".into(),
                        time: "10:35 AM".into(),
                    },
                ],
            },
            Conversation {
                id: 3,
                user: "Emily Davis".into(),
                user_id: 3,
                avatar: "ED".into(),
                last_message: "The dashboard isn't loading correctly".into(),
                time: "1h ago".into(),
                status: ConversationStatus::Resolved,
                unread: false,
                messages: vec![TranscriptEntry {
                    id: 1,
                    sender: TranscriptSender::Customer,
                    content: "The charts aren't displaying in Safari.".into(),
                    time: "9:15 AM".into(),
                }],
            },
        ];

        let stats = DashboardStats {
            active_users: StatEntry {
                value: "2453".into(),
                change: 12.5,
            },
            conversations: StatEntry {
                value: "1235".into(),
                change: 5.2,
            },
            response_time: StatEntry {
                value: "3.2m".into(),
                change: -10.8,
            },
            activity: StatEntry {
                value: "85%".into(),
                change: 2.3,
            },
        };

        Self {
            users,
            conversations,
            stats,
        }
    }
}
