use crate::events::ChatEvent;
use crate::models::conversation::{ConversationId, ConversationPreview};
use crate::models::message::{Message, Sender};
use crate::models::user_profile::UserProfile;
use crate::services::accounts::current_user;
use crate::services::match_engine::{derive_match_list, is_seed_profile};
use crate::state::AppState;
use crate::tasks::replies::ReplyRequest;
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Clone, Default)]
pub struct OutgoingMessage {
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub ephemeral: bool,
}

impl OutgoingMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn photo(image_url: impl Into<String>, ephemeral: bool) -> Self {
        Self {
            text: None,
            image_url: Some(image_url.into()),
            ephemeral,
        }
    }
}

pub async fn open_conversation(
    state: &AppState,
    with_id: i64,
    opening_line: Option<&str>,
) -> AppResult<ConversationId> {
    let me = current_user(state).await?;
    let partner = find_profile(state, with_id).await?;
    let conversation_id = ConversationId::between(me.id, partner.id);

    let line = opening_line.map(str::trim).filter(|line| !line.is_empty());
    match line {
        Some(line) => {
            let message = Message::from_user(me.id, line.to_string());
            let history = append_message(state, conversation_id, message).await?;
            schedule_reply(state, conversation_id, partner, history).await;
        }
        None => {
            let _guard = state.write_lock.lock().await;
            let mut conversations = state.conversations.load_all().await;
            if !conversations.contains_key(&conversation_id) {
                conversations.insert(conversation_id, Vec::new());
                state.conversations.save_all(&conversations).await?;
            }
        }
    }

    tracing::debug!("Conversation {} opened", conversation_id);
    Ok(conversation_id)
}

pub async fn send_message(
    state: &AppState,
    with_id: i64,
    outgoing: OutgoingMessage,
) -> AppResult<Message> {
    let text = outgoing
        .text
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());

    let me = current_user(state).await?;
    let message = match (outgoing.image_url, text) {
        (Some(image_url), text) => {
            Message::photo_from_user(me.id, text, image_url, outgoing.ephemeral)
        }
        (None, Some(text)) => Message::from_user(me.id, text),
        (None, None) => {
            return Err(AppError::Validation("Message cannot be empty".to_string()));
        }
    };

    let partner = find_profile(state, with_id).await?;
    let conversation_id = ConversationId::between(me.id, partner.id);
    let sent = message.clone();

    let history = append_message(state, conversation_id, message).await?;

    let wants_reply = sent.text.is_some() && !sent.is_ephemeral();
    if wants_reply {
        schedule_reply(state, conversation_id, partner, history).await;
    }

    Ok(sent)
}

pub async fn mark_read(state: &AppState, with_id: i64) -> AppResult<usize> {
    let me = current_user(state).await?;
    let conversation_id = ConversationId::between(me.id, with_id);

    let _guard = state.write_lock.lock().await;
    let mut conversations = state.conversations.load_all().await;
    let Some(messages) = conversations.get_mut(&conversation_id) else {
        return Ok(0);
    };

    let changed = mark_matched_read(messages);
    if changed > 0 {
        state.conversations.save_all(&conversations).await?;
    }

    Ok(changed)
}

pub async fn mark_ephemeral_viewed(
    state: &AppState,
    with_id: i64,
    message_id: i64,
) -> AppResult<bool> {
    let me = current_user(state).await?;
    let conversation_id = ConversationId::between(me.id, with_id);

    let _guard = state.write_lock.lock().await;
    let mut conversations = state.conversations.load_all().await;
    let message = conversations
        .get_mut(&conversation_id)
        .and_then(|messages| messages.iter_mut().find(|m| m.id == message_id));

    match message {
        Some(message) if message.is_ephemeral() => {
            message.viewed = Some(true);
            state.conversations.save_all(&conversations).await?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

pub async fn messages(state: &AppState, with_id: i64) -> AppResult<Vec<Message>> {
    let me = current_user(state).await?;
    let conversation_id = ConversationId::between(me.id, with_id);

    Ok(state
        .conversations
        .load_all()
        .await
        .remove(&conversation_id)
        .unwrap_or_default())
}

pub async fn conversation_previews(state: &AppState) -> AppResult<Vec<ConversationPreview>> {
    let me = current_user(state).await?;
    let all = state.profiles.load_all().await;
    let conversations = state.conversations.load_all().await;

    let previews = derive_match_list(&me, &all)
        .into_iter()
        .map(|profile| {
            let conversation_id = ConversationId::between(me.id, profile.id);
            let history = conversations
                .get(&conversation_id)
                .map(Vec::as_slice)
                .unwrap_or_default();

            ConversationPreview {
                conversation_id,
                profile_id: profile.id,
                name: profile.name,
                image_url: profile.image_url,
                last_message: history.last().cloned(),
                unread_count: history
                    .iter()
                    .filter(|m| m.sender == Sender::Matched && !m.is_read())
                    .count(),
            }
        })
        .collect();

    Ok(previews)
}

pub async fn close_conversation(state: &AppState, with_id: i64) -> AppResult<bool> {
    let me = current_user(state).await?;
    Ok(state
        .replies
        .cancel(ConversationId::between(me.id, with_id))
        .await)
}

async fn find_profile(state: &AppState, id: i64) -> AppResult<UserProfile> {
    state
        .profiles
        .find_by_id(id)
        .await
        .ok_or(AppError::ProfileNotFound(id))
}

async fn append_message(
    state: &AppState,
    conversation_id: ConversationId,
    message: Message,
) -> AppResult<Vec<Message>> {
    let message_id = message.id;
    let sender = message.sender;

    let history = {
        let _guard = state.write_lock.lock().await;
        let mut conversations = state.conversations.load_all().await;
        let history = conversations.entry(conversation_id).or_default();
        history.push(message);
        mark_matched_read(history);
        let history = history.clone();

        state.conversations.save_all(&conversations).await?;
        history
    };

    state.events.publish(ChatEvent::MessageAppended {
        conversation_id,
        message_id,
        sender,
    });

    Ok(history)
}

async fn schedule_reply(
    state: &AppState,
    conversation_id: ConversationId,
    partner: UserProfile,
    history: Vec<Message>,
) {
    if !is_seed_profile(partner.id) {
        return;
    }

    let latest = history
        .last()
        .and_then(|m| m.text.clone())
        .unwrap_or_default();

    state
        .replies
        .schedule(ReplyRequest {
            conversation_id,
            responder: partner,
            history,
            latest,
        })
        .await;
}

fn mark_matched_read(messages: &mut [Message]) -> usize {
    let mut changed = 0;
    for message in messages
        .iter_mut()
        .filter(|m| m.sender == Sender::Matched && !m.is_read())
    {
        message.read = Some(true);
        changed += 1;
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::models::user_profile::NewProfile;
    use crate::services::accounts::signup;
    use crate::services::seed::ensure_seeded;
    use std::time::Duration;

    async fn signed_in(config: AppConfig) -> (AppState, UserProfile) {
        let state = AppState::in_memory(config);
        ensure_seeded(state.profiles.as_ref()).await.unwrap();
        let me = signup(
            &state,
            NewProfile {
                email: "noor@example.com".to_string(),
                name: "Noor".to_string(),
                age: 31,
                bio: "Climber and part-time astronomer.".to_string(),
                interests: vec!["Hiking".to_string()],
                image_url: "img".to_string(),
            },
        )
        .await
        .unwrap();
        (state, me)
    }

    fn slow_replies() -> AppConfig {
        let mut config = AppConfig::immediate();
        config.reply_delay_min = Duration::from_secs(1);
        config.reply_delay_max = Duration::from_secs(3);
        config
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let (state, _) = signed_in(AppConfig::immediate()).await;
        let err = send_message(&state, 1001, OutgoingMessage::text("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(state.conversations.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_partner_rejected() {
        let (state, _) = signed_in(AppConfig::immediate()).await;
        let err = send_message(&state, 999_999, OutgoingMessage::text("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ProfileNotFound(999_999)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_seed_reply_arrives_unread() {
        let (state, me) = signed_in(slow_replies()).await;
        let mut events = state.events.subscribe();

        let sent = send_message(&state, 1002, OutgoingMessage::text("Hey Chloe!"))
            .await
            .unwrap();
        assert_eq!(sent.sender_id, Some(me.id));
        assert!(sent.is_read());

        tokio::time::sleep(Duration::from_secs(4)).await;
        let history = messages(&state, 1002).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].sender, Sender::Matched);

        let mut delivered = false;
        while let Ok(event) = events.try_recv() {
            delivered |= matches!(event, ChatEvent::ReplyDelivered { .. });
        }
        assert!(delivered);

        assert_eq!(mark_read(&state, 1002).await.unwrap(), 1);
        assert_eq!(mark_read(&state, 1002).await.unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_reply_for_photos() {
        let (state, _) = signed_in(slow_replies()).await;

        send_message(&state, 1003, OutgoingMessage::photo("blob:a", true))
            .await
            .unwrap();
        send_message(&state, 1003, OutgoingMessage::photo("blob:b", false))
            .await
            .unwrap();
        assert_eq!(state.replies.pending_count().await, 0);

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(messages(&state, 1003).await.unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_captioned_photo_gets_reply() {
        let (state, _) = signed_in(slow_replies()).await;

        let mut captioned = OutgoingMessage::photo("blob:beach", false);
        captioned.text = Some("Guess where I am".to_string());
        send_message(&state, 1003, captioned).await.unwrap();

        let mut secret = OutgoingMessage::photo("blob:secret", true);
        secret.text = Some("Only once".to_string());
        send_message(&state, 1004, secret).await.unwrap();

        assert_eq!(state.replies.pending_count().await, 1);

        tokio::time::sleep(Duration::from_secs(4)).await;
        let history = messages(&state, 1003).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].sender, Sender::Matched);
        assert_eq!(messages(&state, 1004).await.unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_conversation_suppresses_reply() {
        let (state, _) = signed_in(slow_replies()).await;

        send_message(&state, 1004, OutgoingMessage::text("Hello"))
            .await
            .unwrap();
        assert!(close_conversation(&state, 1004).await.unwrap());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(messages(&state, 1004).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ephemeral_photo_viewed_once() {
        let (state, _) = signed_in(AppConfig::immediate()).await;
        let photo = send_message(&state, 1005, OutgoingMessage::photo("blob:x", true))
            .await
            .unwrap();
        let text = send_message(&state, 1005, OutgoingMessage::photo("blob:y", false))
            .await
            .unwrap();

        assert!(mark_ephemeral_viewed(&state, 1005, photo.id).await.unwrap());
        assert!(!mark_ephemeral_viewed(&state, 1005, text.id).await.unwrap());
        assert!(!mark_ephemeral_viewed(&state, 1005, 42).await.unwrap());

        let history = messages(&state, 1005).await.unwrap();
        assert!(history[0].is_hidden());
        assert!(!history[1].is_hidden());
    }

    #[tokio::test]
    async fn test_open_without_line_creates_empty_conversation() {
        let (state, me) = signed_in(AppConfig::immediate()).await;
        let id = open_conversation(&state, 1006, Some("   ")).await.unwrap();

        assert_eq!(id, ConversationId::between(me.id, 1006));
        assert!(state.conversations.load_all().await[&id].is_empty());
        assert_eq!(state.replies.pending_count().await, 0);
    }

    #[tokio::test]
    async fn test_previews_follow_match_list() {
        let (state, me) = signed_in(AppConfig::immediate()).await;

        let mut all = state.profiles.load_all().await;
        for profile in all.iter_mut() {
            if profile.id == me.id {
                profile.add_match(1001, "2024-01-01T00:00:00.000Z");
                profile.add_match(1002, "2024-02-01T00:00:00.000Z");
            }
        }
        state.profiles.save_all(&all).await.unwrap();

        let mut conversations = state.conversations.load_all().await;
        conversations.insert(
            ConversationId::between(me.id, 1001),
            vec![
                Message::from_matched(1001, "one".to_string()),
                Message::from_matched(1001, "two".to_string()),
            ],
        );
        state.conversations.save_all(&conversations).await.unwrap();

        let previews = conversation_previews(&state).await.unwrap();
        assert_eq!(previews.len(), 2);
        assert_eq!(previews[0].profile_id, 1002);
        assert!(previews[0].last_message.is_none());
        assert_eq!(previews[1].unread_count, 2);
        assert_eq!(
            previews[1].last_message.as_ref().and_then(|m| m.text.as_deref()),
            Some("two")
        );
    }
}
