use async_trait::async_trait;
use std::sync::Arc;

use super::{load_json, save_json};
use crate::models::user_profile::UserProfile;
use crate::storage::KeyValueStore;
use crate::utils::error::StorageResult;

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn load_all(&self) -> Vec<UserProfile>;

    async fn save_all(&self, profiles: &[UserProfile]) -> StorageResult<()>;

    async fn clear(&self) -> StorageResult<()>;

    async fn find_by_id(&self, id: i64) -> Option<UserProfile> {
        self.load_all().await.into_iter().find(|p| p.id == id)
    }

    async fn find_by_email(&self, email: &str) -> Option<UserProfile> {
        self.load_all().await.into_iter().find(|p| p.email == email)
    }
}

pub struct KvProfileRepository {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl KvProfileRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }
}

#[async_trait]
impl ProfileRepository for KvProfileRepository {
    async fn load_all(&self) -> Vec<UserProfile> {
        load_json(self.store.as_ref(), &self.key)
            .await
            .unwrap_or_default()
    }

    async fn save_all(&self, profiles: &[UserProfile]) -> StorageResult<()> {
        save_json(self.store.as_ref(), &self.key, profiles).await
    }

    async fn clear(&self) -> StorageResult<()> {
        self.store.remove(&self.key).await
    }
}

pub fn replace_records(profiles: Vec<UserProfile>, updated: &[&UserProfile]) -> Vec<UserProfile> {
    profiles
        .into_iter()
        .map(|p| match updated.iter().find(|u| u.id == p.id) {
            Some(u) => (*u).clone(),
            None => p,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::seed::seed_profiles;
    use crate::storage::memory::MemoryStore;
    use crate::utils::error::StorageError;

    fn repo_with(store: Arc<MemoryStore>) -> KvProfileRepository {
        KvProfileRepository::new(store, "test-all-users")
    }

    #[tokio::test]
    async fn test_load_all_empty_when_missing() {
        let repo = repo_with(Arc::new(MemoryStore::new()));
        assert!(repo.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_all_empty_when_corrupt() {
        let store = Arc::new(MemoryStore::new());
        store.set("test-all-users", "{not json").await.unwrap();
        let repo = repo_with(store);
        assert!(repo.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let repo = repo_with(Arc::new(MemoryStore::new()));
        repo.save_all(&seed_profiles()).await.unwrap();

        let all = repo.load_all().await;
        assert_eq!(all.len(), 10);
        assert_eq!(all[0].id, 1001);
        assert_eq!(repo.find_by_id(1004).await.unwrap().name, "Emma");
        assert_eq!(
            repo.find_by_email("chloe@example.com").await.unwrap().id,
            1002
        );
        assert!(repo.find_by_id(42).await.is_none());
    }

    #[tokio::test]
    async fn test_quota_failure_leaves_previous_snapshot() {
        let store = Arc::new(MemoryStore::with_capacity(64));
        let repo = repo_with(store);
        repo.save_all(&[]).await.unwrap();

        let err = repo.save_all(&seed_profiles()).await.unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert!(repo.load_all().await.is_empty());
    }

    #[test]
    fn test_replace_records_keeps_order() {
        let profiles = seed_profiles();
        let mut changed = profiles[2].clone();
        changed.view_count = 9999;

        let result = replace_records(profiles.clone(), &[&changed]);
        assert_eq!(result.len(), profiles.len());
        assert_eq!(result[2].view_count, 9999);
        assert_eq!(result[3], profiles[3]);
    }
}
