//! Common error types and handling for the CMS resource layer

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type raised by brokers, the CMS facade and entity validation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Resource locked: {0}")]
    Locked(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the stable error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Unexpected(_) => "UNEXPECTED_ERROR",
            Error::Serialization(_) => "SERIALIZATION_ERROR",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Conflict(_) => "CONFLICT",
            Error::Locked(_) => "RESOURCE_LOCKED",
            Error::AccessDenied(_) => "ACCESS_DENIED",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the caller could succeed by retrying after someone else acts
    /// (e.g. the lock holder releases the resource)
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Locked(_))
    }
}
