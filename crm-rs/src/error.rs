use outreach_ai::GenerationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrmError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Generation unavailable: {0}")]
    GenerationUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl From<GenerationError> for CrmError {
    fn from(error: GenerationError) -> Self {
        match error {
            GenerationError::InvalidRequest(msg) => CrmError::Validation(msg),
            GenerationError::Unavailable(msg) => CrmError::GenerationUnavailable(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, CrmError>;
