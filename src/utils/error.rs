use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage quota exceeded: {requested} bytes requested, capacity is {capacity} bytes")]
    QuotaExceeded { requested: usize, capacity: usize },

    #[error("Corrupt data under key {key}: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(i64),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No user is signed in")]
    NotSignedIn,

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorNotice {
    pub error: String,
    pub message: String,
}

impl AppError {
    pub fn to_notice(&self) -> ErrorNotice {
        let (error_type, message) = match self {
            AppError::Storage(StorageError::QuotaExceeded { requested, capacity }) => {
                tracing::error!(
                    "Storage quota exceeded: {} bytes requested, capacity {}",
                    requested,
                    capacity
                );
                (
                    "quota_exceeded",
                    "Storage limit reached. Please try uploading a smaller image or clear your data."
                        .to_string(),
                )
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {}", e);
                ("storage_error", self.to_string())
            }
            AppError::DuplicateEmail(email) => {
                tracing::debug!("Duplicate email on signup: {}", email);
                (
                    "duplicate_email",
                    "This email address is already registered. Try signing in instead.".to_string(),
                )
            }
            AppError::ProfileNotFound(id) => {
                tracing::debug!("Profile not found: {}", id);
                ("profile_not_found", self.to_string())
            }
            AppError::NotFound(msg) => {
                tracing::debug!("Not found: {}", msg);
                ("not_found", msg.clone())
            }
            AppError::Validation(msg) => ("validation_error", msg.clone()),
            AppError::NotSignedIn => ("not_signed_in", "Please sign in first.".to_string()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("internal_error", msg.clone())
            }
        };

        ErrorNotice {
            error: error_type.to_string(),
            message,
        }
    }

    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, AppError::Storage(StorageError::QuotaExceeded { .. }))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Storage(StorageError::Serialization(err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
pub type StorageResult<T> = Result<T, StorageError>;
