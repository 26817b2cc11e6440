pub mod memory;

use async_trait::async_trait;

use crate::utils::error::StorageResult;

pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    async fn remove(&self, key: &str) -> StorageResult<()>;
}

#[derive(Debug, Clone)]
pub struct StorageKeys {
    prefix: String,
}

impl StorageKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn all_users(&self) -> String {
        format!("{}-all-users", self.prefix)
    }

    pub fn current_user(&self) -> String {
        format!("{}-current-user", self.prefix)
    }

    pub fn conversations(&self) -> String {
        format!("{}-conversations", self.prefix)
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new("swipematch")
    }
}
