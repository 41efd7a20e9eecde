use thiserror::Error;

/// Failures of a generation request
///
/// Malformed provider output is not an error: it degrades to the raw-text
/// fallback in [`crate::generation::normalize_output`].
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Invalid generation request: {0}")]
    InvalidRequest(String),

    #[error("Generation unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, GenerationError>;
