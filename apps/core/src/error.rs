use std::io;
use thiserror::Error;

/// Application-wide error type, consolidating all possible errors into a single enum.
#[derive(Debug, Error)]
pub enum AppError {
    /// The completion service could not be reached or answered with a non-success status.
    #[error("Completion unavailable: {0}")]
    CompletionUnavailable(String),

    /// The completion service answered, but not with something we can use
    /// (invalid JSON, empty content, exam guide schema violations).
    #[error("Malformed completion: {0}")]
    MalformedCompletion(String),

    /// The completion service rejected the request with HTTP 429.
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Represents errors from operations that did not complete in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// The completion actor is gone (its channel closed or it dropped the responder).
    #[error("Actor error: {0}")]
    Actor(String),

    /// Represents configuration-related errors (e.g., missing environment variables,
    /// a suggestion table that cannot produce three suggestions).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents data validation errors (e.g., an empty exam subject).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A session id that the conversation store does not know about.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl AppError {
    /// Returns `true` for every way the completion collaborator can fail.
    pub fn is_completion_failure(&self) -> bool {
        matches!(
            self,
            AppError::CompletionUnavailable(_)
                | AppError::MalformedCompletion(_)
                | AppError::RateLimited
                | AppError::Timeout(_)
                | AppError::Actor(_)
        )
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedCompletion(format!("JSON error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Config(format!("Validation errors: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(format!("HTTP request timed out: {}", err))
        } else if err.is_decode() {
            AppError::MalformedCompletion(format!("HTTP body could not be decoded: {}", err))
        } else {
            AppError::CompletionUnavailable(format!("HTTP error: {}", err))
        }
    }
}

/// Failure of the exam guide pipeline, surfaced to the caller as-is.
#[derive(Debug, Error)]
#[error("Exam guide generation failed: {source}")]
pub struct GenerationError {
    #[from]
    source: AppError,
}

impl GenerationError {
    /// The underlying reason the guide could not be produced.
    pub fn kind(&self) -> &AppError {
        &self.source
    }
}
