use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::helpers::next_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Matched,
    System,
}

impl Sender {
    pub fn as_str(&self) -> &str {
        match self {
            Sender::User => "user",
            Sender::Matched => "matched",
            Sender::System => "system",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub sender: Sender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<i64>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ephemeral: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewed: Option<bool>,
}

impl Message {
    pub fn from_user(sender_id: i64, text: String) -> Self {
        Self {
            id: next_id(),
            text: Some(text),
            image_url: None,
            sender: Sender::User,
            sender_id: Some(sender_id),
            timestamp: Utc::now(),
            read: Some(true),
            ephemeral: None,
            viewed: None,
        }
    }

    pub fn photo_from_user(
        sender_id: i64,
        text: Option<String>,
        image_url: String,
        ephemeral: bool,
    ) -> Self {
        Self {
            id: next_id(),
            text,
            image_url: Some(image_url),
            sender: Sender::User,
            sender_id: Some(sender_id),
            timestamp: Utc::now(),
            read: Some(true),
            ephemeral: Some(ephemeral),
            viewed: Some(false),
        }
    }

    pub fn from_matched(sender_id: i64, text: String) -> Self {
        Self {
            id: next_id(),
            text: Some(text),
            image_url: None,
            sender: Sender::Matched,
            sender_id: Some(sender_id),
            timestamp: Utc::now(),
            read: Some(false),
            ephemeral: None,
            viewed: None,
        }
    }

    pub fn system(text: String) -> Self {
        Self {
            id: next_id(),
            text: Some(text),
            image_url: None,
            sender: Sender::System,
            sender_id: None,
            timestamp: Utc::now(),
            read: Some(true),
            ephemeral: None,
            viewed: None,
        }
    }

    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral.unwrap_or(false)
    }

    pub fn is_read(&self) -> bool {
        self.read.unwrap_or(false)
    }

    pub fn is_hidden(&self) -> bool {
        self.is_ephemeral() && self.viewed.unwrap_or(false)
    }
}
