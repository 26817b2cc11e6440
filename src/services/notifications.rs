use std::collections::HashMap;

use crate::models::conversation::{ConversationId, Conversations};
use crate::models::message::Sender;
use crate::models::user_profile::UserProfile;
use crate::utils::helpers::preview;

const BODY_PREVIEW_CHARS: usize = 60;
const PHOTO_BODY: &str = "📷 Sent a photo";

#[derive(Debug, Clone, PartialEq)]
pub struct NewMessageNotice {
    pub conversation_id: ConversationId,
    pub profile_id: i64,
    pub title: String,
    pub body: String,
    pub icon: String,
}

#[derive(Debug, Default)]
pub struct MessageWatcher {
    last_seen: HashMap<ConversationId, usize>,
}

impl MessageWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(
        &mut self,
        conversations: &Conversations,
        current_user: &UserProfile,
        profiles: &[UserProfile],
        open_chat: Option<ConversationId>,
    ) -> Vec<NewMessageNotice> {
        let mut notices = Vec::new();

        for (conversation_id, messages) in conversations {
            let Some(partner_id) = conversation_id.other_participant(current_user.id) else {
                continue;
            };

            let previous = self
                .last_seen
                .insert(*conversation_id, messages.len())
                .unwrap_or(0);
            if messages.len() <= previous || open_chat == Some(*conversation_id) {
                continue;
            }

            let Some(last) = messages.last() else {
                continue;
            };
            if last.sender != Sender::Matched {
                continue;
            }

            let Some(partner) = profiles.iter().find(|p| p.id == partner_id) else {
                continue;
            };

            let text = last.text.as_deref().filter(|text| !text.is_empty());
            let body = match (text, &last.image_url) {
                (Some(text), _) => preview(text, BODY_PREVIEW_CHARS),
                (None, Some(_)) => PHOTO_BODY.to_string(),
                (None, None) => String::new(),
            };

            notices.push(NewMessageNotice {
                conversation_id: *conversation_id,
                profile_id: partner.id,
                title: format!("{} sent you a message", partner.name),
                body,
                icon: partner.image_url.clone(),
            });
        }

        notices
    }

    pub fn reset(&mut self) {
        self.last_seen.clear();
    }
}
