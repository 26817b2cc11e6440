pub mod accounts;
pub mod chat;
pub mod match_engine;
pub mod notifications;
pub mod photos;
pub mod seed;
pub mod swiping;
