pub mod conversation;
pub mod message;
pub mod swipe;
pub mod user_profile;
