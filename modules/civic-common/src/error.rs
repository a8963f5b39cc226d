use thiserror::Error;

/// Result type alias for complaint kernel operations.
pub type Result<T> = std::result::Result<T, CivicError>;

#[derive(Debug, Error)]
pub enum CivicError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    DuplicateVote(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Dependency unavailable: {0}")]
    Dependency(String),
}
