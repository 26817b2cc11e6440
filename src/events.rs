use serde::Serialize;
use tokio::sync::broadcast;

use crate::models::conversation::ConversationId;
use crate::models::message::Sender;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    Matched {
        user_id: i64,
        profile_id: i64,
        matched_at: String,
    },
    MessageAppended {
        conversation_id: ConversationId,
        message_id: i64,
        sender: Sender,
    },
    ReplyTyping {
        conversation_id: ConversationId,
    },
    ReplyDelivered {
        conversation_id: ConversationId,
        message_id: i64,
    },
    ReplyCancelled {
        conversation_id: ConversationId,
    },
}

#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ChatEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(256);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: ChatEvent) {
        // no subscribers is fine
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
