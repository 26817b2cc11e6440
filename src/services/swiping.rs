use std::sync::Arc;
use tokio::sync::Mutex;

use crate::events::ChatEvent;
use crate::models::conversation::ConversationId;
use crate::models::swipe::{SwipeSession, SwipeState};
use crate::models::user_profile::UserProfile;
use crate::services::accounts::{current_user, persist_current};
use crate::services::chat;
use crate::services::match_engine::{
    LikeOutcome, compute_swipe_queue, derive_match_list, evaluate_block, evaluate_like,
    evaluate_pass,
};
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

pub struct SwipeController {
    state: Arc<AppState>,
    session: Mutex<SwipeSession>,
}

impl SwipeController {
    pub async fn open(state: Arc<AppState>) -> AppResult<Self> {
        let queue = load_queue(&state).await?;
        tracing::debug!("Swipe queue opened with {} candidates", queue.len());

        Ok(Self {
            state,
            session: Mutex::new(SwipeSession::new(queue)),
        })
    }

    pub async fn refresh(&self) -> AppResult<()> {
        let queue = load_queue(&self.state).await?;
        *self.session.lock().await = SwipeSession::new(queue);
        Ok(())
    }

    pub async fn current_candidate(&self) -> Option<UserProfile> {
        self.session.lock().await.current_candidate().cloned()
    }

    pub async fn swipe_state(&self) -> SwipeState {
        self.session.lock().await.state().clone()
    }

    pub async fn is_exhausted(&self) -> bool {
        self.session.lock().await.is_exhausted()
    }

    pub async fn remaining(&self) -> usize {
        let session = self.session.lock().await;
        session.queue().len().saturating_sub(session.index())
    }

    pub async fn like(&self) -> AppResult<Option<LikeOutcome>> {
        let outcome = {
            let mut session = self.session.lock().await;
            if !session.is_browsing() {
                return Ok(None);
            }
            let Some(candidate) = session.current_candidate().cloned() else {
                return Ok(None);
            };

            let Some(outcome) = self.store_like(&candidate).await? else {
                session.advance();
                return Ok(None);
            };

            session.record_like(outcome.is_match, outcome.target.clone());
            outcome
        };

        if outcome.is_match {
            self.state.events.publish(ChatEvent::Matched {
                user_id: outcome.current_user.id,
                profile_id: outcome.target.id,
                matched_at: outcome
                    .current_user
                    .match_timestamp(outcome.target.id)
                    .to_string(),
            });

            tokio::time::sleep(self.state.config.match_presentation).await;
            self.session.lock().await.finish_presentation();
        }

        Ok(Some(outcome))
    }

    pub async fn like_with_opening_line(
        &self,
        opening_line: &str,
    ) -> AppResult<Option<(LikeOutcome, ConversationId)>> {
        let outcome = {
            let mut session = self.session.lock().await;
            if !session.is_browsing() {
                return Ok(None);
            }
            let Some(candidate) = session.current_candidate().cloned() else {
                return Ok(None);
            };

            let outcome = self.store_like(&candidate).await?;
            session.advance();
            match outcome {
                Some(outcome) => outcome,
                None => return Ok(None),
            }
        };

        let conversation_id =
            chat::open_conversation(&self.state, outcome.target.id, Some(opening_line)).await?;

        Ok(Some((outcome, conversation_id)))
    }

    pub async fn pass(&self) -> AppResult<Option<UserProfile>> {
        let mut session = self.session.lock().await;
        if !session.is_browsing() {
            return Ok(None);
        }
        let Some(candidate) = session.current_candidate().cloned() else {
            return Ok(None);
        };

        let _guard = self.state.write_lock.lock().await;
        let current = current_user(&self.state).await?;
        let all = self.state.profiles.load_all().await;

        let Some(target) = all.iter().find(|p| p.id == candidate.id) else {
            tracing::warn!("Skipping stale candidate {}", candidate.id);
            session.advance();
            return Ok(None);
        };

        let updated = evaluate_pass(&current, target);
        let all = crate::repository::profiles::replace_records(all, &[&updated]);
        persist_current(&self.state, &all, &updated).await?;

        session.record_pass();
        Ok(Some(updated))
    }

    pub async fn dismiss_match(&self) -> Option<UserProfile> {
        self.session.lock().await.dismiss_match()
    }

    pub async fn start_conversation(
        &self,
        opening_line: Option<&str>,
    ) -> AppResult<Option<ConversationId>> {
        let Some(matched) = self.session.lock().await.accept_match() else {
            return Ok(None);
        };

        let conversation_id = chat::open_conversation(&self.state, matched.id, opening_line).await?;
        Ok(Some(conversation_id))
    }

    pub async fn block(&self, target_id: i64) -> AppResult<UserProfile> {
        let updated = block(&self.state, target_id).await?;
        self.refresh().await?;
        Ok(updated)
    }

    async fn store_like(&self, candidate: &UserProfile) -> AppResult<Option<LikeOutcome>> {
        let _guard = self.state.write_lock.lock().await;
        let current = current_user(&self.state).await?;
        let all = self.state.profiles.load_all().await;

        let Some(target) = all.iter().find(|p| p.id == candidate.id) else {
            let err = AppError::ProfileNotFound(candidate.id);
            tracing::warn!("Skipping stale candidate: {}", err);
            return Ok(None);
        };

        let outcome = evaluate_like(&current, target, &all);
        persist_current(&self.state, &outcome.profiles, &outcome.current_user).await?;

        Ok(Some(outcome))
    }
}

pub async fn block(state: &AppState, target_id: i64) -> AppResult<UserProfile> {
    let updated = {
        let _guard = state.write_lock.lock().await;
        let current = current_user(state).await?;
        let all = state.profiles.load_all().await;

        let target = all
            .iter()
            .find(|p| p.id == target_id)
            .ok_or(AppError::ProfileNotFound(target_id))?;

        let updated = evaluate_block(&current, target);
        let all = crate::repository::profiles::replace_records(all, &[&updated]);
        persist_current(state, &all, &updated).await?;
        updated
    };

    state
        .replies
        .cancel(ConversationId::between(updated.id, target_id))
        .await;

    Ok(updated)
}

pub async fn match_list(state: &AppState) -> AppResult<Vec<UserProfile>> {
    let current = current_user(state).await?;
    let all = state.profiles.load_all().await;
    Ok(derive_match_list(&current, &all))
}

async fn load_queue(state: &AppState) -> AppResult<Vec<UserProfile>> {
    let current = current_user(state).await?;
    let all = state.profiles.load_all().await;
    Ok(compute_swipe_queue(&current, &all))
}
