use crate::sms_client::DeliveryError;
use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// In-memory store errors
    #[error("Store error: {0}")]
    Store(StoreError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// SMS gateway errors
    #[error("SMS delivery error: {0}")]
    Sms(#[from] DeliveryError),

    /// External service errors
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Message(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Check if error is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// Get HTTP status code for the error
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::NotFound(_) => 404,
            AppError::Validation(_) => 400,
            AppError::Sms(DeliveryError::InvalidRecipient(_))
            | AppError::Sms(DeliveryError::EmptyMessage) => 400,
            AppError::Sms(_) | AppError::ExternalService(_) => 502,
            _ => 500,
        }
    }
}

/// Store-specific error types
#[derive(Error, Debug)]
pub enum StoreError {
    /// A lock was poisoned by a panicking writer
    #[error("Store lock poisoned during {0}")]
    LockPoisoned(&'static str),

    /// Invalid input (e.g. non-positive price)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Duplicate record (e.g. username already taken)
    #[error("Duplicate record: {0}")]
    Duplicate(String),
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidInput(msg) => AppError::Validation(msg),
            StoreError::Duplicate(msg) => AppError::Validation(format!("Duplicate: {}", msg)),
            StoreError::LockPoisoned(op) => {
                AppError::Message(format!("Store lock poisoned during {}", op))
            }
        }
    }
}

/// Convenience function to convert Option<T> to Result<T, AppError>
pub fn option_to_result<T>(opt: Option<T>, error_msg: &str) -> AppResult<T> {
    opt.ok_or_else(|| AppError::NotFound(error_msg.to_string()))
}
