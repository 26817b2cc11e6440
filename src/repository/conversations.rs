use async_trait::async_trait;
use std::sync::Arc;

use super::{load_json, save_json};
use crate::models::conversation::Conversations;
use crate::storage::KeyValueStore;
use crate::utils::error::StorageResult;

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    async fn load_all(&self) -> Conversations;

    async fn save_all(&self, conversations: &Conversations) -> StorageResult<()>;

    async fn clear(&self) -> StorageResult<()>;
}

pub struct KvConversationRepository {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl KvConversationRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }
}

#[async_trait]
impl ConversationRepository for KvConversationRepository {
    async fn load_all(&self) -> Conversations {
        load_json(self.store.as_ref(), &self.key)
            .await
            .unwrap_or_default()
    }

    async fn save_all(&self, conversations: &Conversations) -> StorageResult<()> {
        save_json(self.store.as_ref(), &self.key, conversations).await
    }

    async fn clear(&self) -> StorageResult<()> {
        self.store.remove(&self.key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::conversation::ConversationId;
    use crate::models::message::Message;
    use crate::storage::memory::MemoryStore;

    #[tokio::test]
    async fn test_round_trip_through_store() {
        let store = Arc::new(MemoryStore::new());
        let repo = KvConversationRepository::new(store, "test-conversations");
        assert!(repo.load_all().await.is_empty());

        let id = ConversationId::between(1001, 3);
        let mut conversations = Conversations::new();
        conversations.insert(
            id,
            vec![
                Message::from_user(3, "hi".to_string()),
                Message::from_matched(1001, "hello!".to_string()),
            ],
        );
        repo.save_all(&conversations).await.unwrap();

        let loaded = repo.load_all().await;
        assert_eq!(loaded, conversations);
        assert!(loaded[&id][0].timestamp <= loaded[&id][1].timestamp);
    }

    #[tokio::test]
    async fn test_malformed_key_loads_empty() {
        let store = Arc::new(MemoryStore::new());
        store
            .set("test-conversations", r#"{"not-an-id":[]}"#)
            .await
            .unwrap();
        let repo = KvConversationRepository::new(store, "test-conversations");
        assert!(repo.load_all().await.is_empty());
    }
}
