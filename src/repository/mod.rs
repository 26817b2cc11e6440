pub mod conversations;
pub mod profiles;
pub mod session;

pub use conversations::{ConversationRepository, KvConversationRepository};
pub use profiles::{KvProfileRepository, ProfileRepository};
pub use session::{KvSessionRepository, SessionRepository};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::storage::KeyValueStore;
use crate::utils::error::{StorageError, StorageResult};

async fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            let err = StorageError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            };
            tracing::warn!("{}; treating as empty", err);
            None
        }
    }
}

async fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw).await
}
