use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::message::Message;

// Rendered as `min-max`, so both participants get the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConversationId {
    low: i64,
    high: i64,
}

pub type Conversations = BTreeMap<ConversationId, Vec<Message>>;

impl ConversationId {
    pub fn between(a: i64, b: i64) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    pub fn participants(&self) -> (i64, i64) {
        (self.low, self.high)
    }

    pub fn includes(&self, id: i64) -> bool {
        self.low == id || self.high == id
    }

    pub fn other_participant(&self, me: i64) -> Option<i64> {
        if self.low == me {
            Some(self.high)
        } else if self.high == me {
            Some(self.low)
        } else {
            None
        }
    }
}

pub fn conversation_id(a: i64, b: i64) -> String {
    ConversationId::between(a, b).to_string()
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

impl FromStr for ConversationId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .split_once('-')
            .ok_or_else(|| format!("invalid conversation id: {}", s))?;
        let a = a
            .parse::<i64>()
            .map_err(|e| format!("invalid conversation id {}: {}", s, e))?;
        let b = b
            .parse::<i64>()
            .map_err(|e| format!("invalid conversation id {}: {}", s, e))?;
        Ok(Self::between(a, b))
    }
}

impl TryFrom<String> for ConversationId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ConversationId> for String {
    fn from(id: ConversationId) -> Self {
        id.to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationPreview {
    pub conversation_id: ConversationId,
    pub profile_id: i64,
    pub name: String,
    pub image_url: String,
    pub last_message: Option<Message>,
    pub unread_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_conversation_id_symmetric() {
        assert_eq!(conversation_id(2, 1001), conversation_id(1001, 2));
        assert_eq!(conversation_id(1001, 2), "2-1001");
        assert_eq!(ConversationId::between(9, 10).to_string(), "9-10");
    }

    #[test]
    fn test_parse_and_other_participant() {
        let id: ConversationId = "1001-1700000000000".parse().unwrap();
        assert_eq!(id.participants(), (1001, 1_700_000_000_000));
        assert_eq!(id.other_participant(1001), Some(1_700_000_000_000));
        assert_eq!(id.other_participant(5), None);
        assert!("garbage".parse::<ConversationId>().is_err());
        assert!("1-x".parse::<ConversationId>().is_err());
    }

    #[test]
    fn test_conversations_round_trip_preserves_order() {
        let now = Utc::now();
        let mut first = Message::from_user(1, "first".to_string());
        first.timestamp = now - Duration::seconds(5);
        let mut second = Message::from_matched(1001, "second".to_string());
        second.timestamp = now;

        let mut conversations = Conversations::new();
        conversations.insert(ConversationId::between(1, 1001), vec![first, second]);

        let json = serde_json::to_string(&conversations).unwrap();
        assert!(json.contains("\"1-1001\""));

        let back: Conversations = serde_json::from_str(&json).unwrap();
        let messages = &back[&ConversationId::between(1001, 1)];
        assert_eq!(messages[0].text.as_deref(), Some("first"));
        assert_eq!(messages[1].text.as_deref(), Some("second"));
        assert!(messages[0].timestamp < messages[1].timestamp);
        assert_eq!(back, conversations);
    }
}
