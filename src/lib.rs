pub mod config;
pub mod database;
pub mod events;
pub mod models;
pub mod repository;
pub mod services;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod utils;

pub use config::AppConfig;
pub use state::AppState;
pub use utils::error::{AppError, AppResult, StorageError};
