use async_trait::async_trait;
use std::sync::Arc;

use super::{load_json, save_json};
use crate::models::user_profile::UserProfile;
use crate::storage::KeyValueStore;
use crate::utils::error::StorageResult;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn load_current(&self) -> Option<UserProfile>;

    async fn save_current(&self, profile: &UserProfile) -> StorageResult<()>;

    async fn clear_current(&self) -> StorageResult<()>;
}

pub struct KvSessionRepository {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl KvSessionRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }
}

#[async_trait]
impl SessionRepository for KvSessionRepository {
    async fn load_current(&self) -> Option<UserProfile> {
        // a stored JSON `null` means signed out
        load_json::<Option<UserProfile>>(self.store.as_ref(), &self.key)
            .await
            .flatten()
    }

    async fn save_current(&self, profile: &UserProfile) -> StorageResult<()> {
        save_json(self.store.as_ref(), &self.key, profile).await
    }

    async fn clear_current(&self) -> StorageResult<()> {
        self.store.remove(&self.key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::seed::seed_profiles;
    use crate::storage::memory::MemoryStore;

    #[tokio::test]
    async fn test_current_user_lifecycle() {
        let store = Arc::new(MemoryStore::new());
        let repo = KvSessionRepository::new(store.clone(), "test-current-user");
        assert!(repo.load_current().await.is_none());

        let user = seed_profiles().remove(0);
        repo.save_current(&user).await.unwrap();
        assert_eq!(repo.load_current().await, Some(user));

        repo.clear_current().await.unwrap();
        assert!(repo.load_current().await.is_none());

        store.set("test-current-user", "null").await.unwrap();
        assert!(repo.load_current().await.is_none());
    }
}
