use thiserror::Error;

#[derive(Error, Debug)]
pub enum MusterError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Transient failure: {0}")]
    Transient(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Already in desired state: {0}")]
    Conflict(String),

    #[error("Authentication required: {0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type MusterResult<T> = Result<T, MusterError>;
