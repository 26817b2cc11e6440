use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::database;
use crate::database::kv::SqliteStore;
use crate::events::EventBus;
use crate::repository::{
    ConversationRepository, KvConversationRepository, KvProfileRepository, KvSessionRepository,
    ProfileRepository, SessionRepository,
};
use crate::services::seed::ensure_seeded;
use crate::storage::memory::MemoryStore;
use crate::storage::{KeyValueStore, StorageKeys};
use crate::tasks::replies::{CannedReplies, ReplyGenerator, ReplyScheduler};

pub struct AppState {
    pub config: AppConfig,
    pub profiles: Arc<dyn ProfileRepository>,
    pub session: Arc<dyn SessionRepository>,
    pub conversations: Arc<dyn ConversationRepository>,
    pub events: EventBus,
    pub replies: ReplyScheduler,
    pub write_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn with_store(
        config: AppConfig,
        store: Arc<dyn KeyValueStore>,
        generator: Arc<dyn ReplyGenerator>,
    ) -> Self {
        let keys = StorageKeys::new(config.storage_key_prefix.clone());
        let profiles: Arc<dyn ProfileRepository> =
            Arc::new(KvProfileRepository::new(store.clone(), keys.all_users()));
        let session: Arc<dyn SessionRepository> =
            Arc::new(KvSessionRepository::new(store.clone(), keys.current_user()));
        let conversations: Arc<dyn ConversationRepository> =
            Arc::new(KvConversationRepository::new(store, keys.conversations()));

        let events = EventBus::new();
        let write_lock = Arc::new(Mutex::new(()));
        let replies = ReplyScheduler::new(
            generator,
            conversations.clone(),
            write_lock.clone(),
            events.clone(),
            config.reply_delay_min,
            config.reply_delay_max,
        );

        Self {
            config,
            profiles,
            session,
            conversations,
            events,
            replies,
            write_lock,
        }
    }

    pub fn in_memory(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::with_capacity(config.storage_quota_bytes));
        Self::with_store(config, store, Arc::new(CannedReplies))
    }

    pub async fn initialize(config: AppConfig) -> anyhow::Result<Arc<Self>> {
        let store: Arc<dyn KeyValueStore> = match &config.database_url {
            Some(url) => {
                let pool = database::create_pool(url).await?;
                tracing::info!("Database connected and migrations applied");
                Arc::new(SqliteStore::new(pool, config.storage_quota_bytes))
            }
            None => {
                tracing::info!("Using in-memory storage");
                Arc::new(MemoryStore::with_capacity(config.storage_quota_bytes))
            }
        };

        let state = Self::with_store(config, store, Arc::new(CannedReplies));
        ensure_seeded(state.profiles.as_ref()).await?;

        Ok(Arc::new(state))
    }
}
