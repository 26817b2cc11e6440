use async_trait::async_trait;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::events::{ChatEvent, EventBus};
use crate::models::conversation::ConversationId;
use crate::models::message::Message;
use crate::models::user_profile::UserProfile;
use crate::repository::ConversationRepository;

pub const FALLBACK_REPLY: &str = "Sorry, I got distracted for a second! What were you saying?";

const CANNED_REPLIES: &[&str] = &[
    "Haha, I love that! Tell me more.",
    "That's so interesting, I was just thinking about that.",
    "Okay you have my attention now.",
    "Same here! What else do you like to do for fun?",
    "Wait, really? That's amazing.",
];

#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    async fn generate(
        &self,
        responder: &UserProfile,
        history: &[Message],
        latest: &str,
    ) -> anyhow::Result<String>;
}

#[derive(Debug, Clone, Default)]
pub struct CannedReplies;

#[async_trait]
impl ReplyGenerator for CannedReplies {
    async fn generate(
        &self,
        _responder: &UserProfile,
        _history: &[Message],
        _latest: &str,
    ) -> anyhow::Result<String> {
        let line = CANNED_REPLIES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(FALLBACK_REPLY);
        Ok(line.to_string())
    }
}

pub struct ReplyRequest {
    pub conversation_id: ConversationId,
    pub responder: UserProfile,
    pub history: Vec<Message>,
    pub latest: String,
}

struct PendingReply {
    generation: u64,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

type PendingMap = Arc<Mutex<HashMap<ConversationId, PendingReply>>>;

#[derive(Clone)]
pub struct ReplyScheduler {
    pending: PendingMap,
    next_generation: Arc<AtomicU64>,
    generator: Arc<dyn ReplyGenerator>,
    conversations: Arc<dyn ConversationRepository>,
    write_lock: Arc<Mutex<()>>,
    events: EventBus,
    delay_min: Duration,
    delay_max: Duration,
}

impl ReplyScheduler {
    pub fn new(
        generator: Arc<dyn ReplyGenerator>,
        conversations: Arc<dyn ConversationRepository>,
        write_lock: Arc<Mutex<()>>,
        events: EventBus,
        delay_min: Duration,
        delay_max: Duration,
    ) -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_generation: Arc::new(AtomicU64::new(0)),
            generator,
            conversations,
            write_lock,
            events,
            delay_min,
            delay_max: delay_max.max(delay_min),
        }
    }

    fn pick_delay(&self) -> Duration {
        let min = self.delay_min.as_millis() as u64;
        let max = self.delay_max.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }

    // Replaces any reply still pending in the same conversation.
    pub async fn schedule(&self, request: ReplyRequest) {
        let conversation_id = request.conversation_id;
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        let delay = self.pick_delay();

        let mut pending = self.pending.lock().await;
        if let Some(previous) = pending.remove(&conversation_id) {
            tracing::debug!("Replacing pending reply in {}", conversation_id);
            previous.token.cancel();
        }

        self.events.publish(ChatEvent::ReplyTyping { conversation_id });

        let task = ReplyTask {
            generation,
            token: token.clone(),
            delay,
            request,
            generator: self.generator.clone(),
            conversations: self.conversations.clone(),
            write_lock: self.write_lock.clone(),
            events: self.events.clone(),
            pending: self.pending.clone(),
        };
        let handle = tokio::spawn(task.run());

        pending.insert(
            conversation_id,
            PendingReply {
                generation,
                token,
                handle,
            },
        );
    }

    pub async fn cancel(&self, conversation_id: ConversationId) -> bool {
        let removed = self.pending.lock().await.remove(&conversation_id);
        match removed {
            Some(reply) => {
                reply.token.cancel();
                tracing::debug!("Cancelled pending reply in {}", conversation_id);
                true
            }
            None => false,
        }
    }

    pub async fn cancel_all(&self) {
        let drained: Vec<_> = self.pending.lock().await.drain().collect();
        for (conversation_id, reply) in drained {
            reply.token.cancel();
            tracing::debug!("Cancelled pending reply in {}", conversation_id);
        }
    }

    pub async fn is_pending(&self, conversation_id: ConversationId) -> bool {
        self.pending
            .lock()
            .await
            .get(&conversation_id)
            .is_some_and(|reply| !reply.handle.is_finished())
    }

    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }
}

struct ReplyTask {
    generation: u64,
    token: CancellationToken,
    delay: Duration,
    request: ReplyRequest,
    generator: Arc<dyn ReplyGenerator>,
    conversations: Arc<dyn ConversationRepository>,
    write_lock: Arc<Mutex<()>>,
    events: EventBus,
    pending: PendingMap,
}

impl ReplyTask {
    async fn run(self) {
        let conversation_id = self.request.conversation_id;

        tokio::select! {
            _ = self.token.cancelled() => {
                self.events.publish(ChatEvent::ReplyCancelled { conversation_id });
                return;
            }
            _ = tokio::time::sleep(self.delay) => {}
        }

        let generated = tokio::select! {
            _ = self.token.cancelled() => {
                self.events.publish(ChatEvent::ReplyCancelled { conversation_id });
                return;
            }
            result = self.generator.generate(
                &self.request.responder,
                &self.request.history,
                &self.request.latest,
            ) => result,
        };

        let text = match generated {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => FALLBACK_REPLY.to_string(),
            Err(e) => {
                tracing::warn!("Reply generation failed in {}: {}", conversation_id, e);
                FALLBACK_REPLY.to_string()
            }
        };

        self.deliver(text).await;
        self.release().await;
    }

    async fn deliver(&self, text: String) {
        let conversation_id = self.request.conversation_id;
        let _guard = self.write_lock.lock().await;

        if self.token.is_cancelled() {
            self.events.publish(ChatEvent::ReplyCancelled { conversation_id });
            return;
        }

        let message = Message::from_matched(self.request.responder.id, text);
        let message_id = message.id;

        let mut conversations = self.conversations.load_all().await;
        conversations.entry(conversation_id).or_default().push(message);

        match self.conversations.save_all(&conversations).await {
            Ok(()) => {
                tracing::info!("Delivered reply {} in {}", message_id, conversation_id);
                self.events.publish(ChatEvent::ReplyDelivered {
                    conversation_id,
                    message_id,
                });
            }
            Err(e) => {
                tracing::error!("Failed to store reply in {}: {}", conversation_id, e);
            }
        }
    }

    async fn release(&self) {
        let mut pending = self.pending.lock().await;
        let is_current = pending
            .get(&self.request.conversation_id)
            .is_some_and(|reply| reply.generation == self.generation);
        if is_current {
            pending.remove(&self.request.conversation_id);
        }
    }
}
