// src/services/history.rs
//
// Tolerant decoding of chat history sent to the relay. Callers have shipped
// history in more than one shape over time: `{role, content}`,
// `{sender, parts: [{text}]}` and `{sender, parts: "..."}` all occur. Shape
// variance must never fail a request; only an entry with neither a role nor a
// sender is dropped.

use serde::Deserialize;
use serde_json::Value;

/// One normalized conversation turn, ready for the provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Model,
}

impl TurnRole {
    pub fn as_str(self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Model => "model",
        }
    }
}

/// Raw history entry as found on the wire, all fields optional.
#[derive(Debug, Deserialize)]
struct RawEntry {
    role: Option<String>,
    sender: Option<String>,
    content: Option<Value>,
    parts: Option<Parts>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Parts {
    Text(String),
    Structured(Vec<Part>),
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Normalize a raw `history` array. Entries that fail to decode or that lack
/// any role/sender marker are dropped; everything else is kept, even with
/// empty content.
pub fn normalize(history: &[Value]) -> Vec<Turn> {
    history
        .iter()
        .filter_map(|v| serde_json::from_value::<RawEntry>(v.clone()).ok())
        .filter_map(normalize_entry)
        .collect()
}

fn normalize_entry(raw: RawEntry) -> Option<Turn> {
    if raw.role.is_none() && raw.sender.is_none() {
        return None;
    }

    let is_model = raw.role.as_deref() == Some("model")
        || raw.sender.as_deref() == Some("assistant");
    let role = if is_model { TurnRole::Model } else { TurnRole::User };

    // Content precedence: `content` string, then first structured part,
    // then raw string `parts`.
    let text = match raw.content {
        Some(Value::String(s)) => s,
        _ => match raw.parts {
            Some(Parts::Structured(parts)) => parts
                .into_iter()
                .next()
                .and_then(|p| p.text)
                .unwrap_or_default(),
            Some(Parts::Text(s)) => s,
            None => String::new(),
        },
    };

    Some(Turn { role, text })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn one(v: Value) -> Option<Turn> {
        normalize(std::slice::from_ref(&v)).into_iter().next()
    }

    #[test]
    fn content_string_shape() {
        let turn = one(json!({"role": "user", "content": "hello"})).unwrap();
        assert_eq!(turn.role, TurnRole::User);
        assert_eq!(turn.text, "hello");
    }

    #[test]
    fn structured_parts_shape() {
        let turn = one(json!({"sender": "assistant", "parts": [{"text": "hi"}]})).unwrap();
        assert_eq!(turn.role, TurnRole::Model);
        assert_eq!(turn.text, "hi");
    }

    #[test]
    fn raw_string_parts_shape() {
        let turn = one(json!({"role": "user", "parts": "plain"})).unwrap();
        assert_eq!(turn.role, TurnRole::User);
        assert_eq!(turn.text, "plain");
    }

    #[test]
    fn content_wins_over_parts() {
        let turn = one(json!({
            "role": "user",
            "content": "primary",
            "parts": [{"text": "ignored"}]
        }))
        .unwrap();
        assert_eq!(turn.text, "primary");
    }

    #[test]
    fn missing_role_and_sender_drops_entry() {
        assert!(one(json!({"content": "orphan"})).is_none());
    }

    #[test]
    fn role_mapping() {
        assert_eq!(one(json!({"role": "model", "content": "x"})).unwrap().role, TurnRole::Model);
        assert_eq!(
            one(json!({"sender": "assistant", "content": "x"})).unwrap().role,
            TurnRole::Model
        );
        // Anything that is not model/assistant is a user turn.
        assert_eq!(one(json!({"role": "system", "content": "x"})).unwrap().role, TurnRole::User);
        assert_eq!(one(json!({"sender": "customer", "content": "x"})).unwrap().role, TurnRole::User);
    }

    #[test]
    fn mixed_batch_keeps_order_and_drops_invalid() {
        let turns = normalize(&[
            json!({"role": "user", "content": "a"}),
            json!({"content": "no marker"}),
            json!({"sender": "assistant", "parts": [{"text": "b"}]}),
            json!(42),
        ]);
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].text, "a");
        assert_eq!(turns[1].text, "b");
    }
}
