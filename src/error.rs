//! Error taxonomy for the FAQ generation pipeline.
//!
//! Every failure mode a caller can act on has its own variant, so the HTTP
//! layer maps errors to status codes by matching rather than by inspecting
//! message strings. `InvalidInput` is the only client error; everything
//! else surfaces as a server-side failure.

use thiserror::Error;

/// Errors produced by the generation pipeline and its collaborators.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The caller supplied missing or malformed required fields.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Transport or protocol failure against a hosted API.
    #[error("assistant API error: {0}")]
    Api(String),

    /// The remote job reached a failed (or otherwise dead) terminal state.
    #[error("assistant job failed: {0}")]
    JobFailed(String),

    /// The job never reached a terminal state within the poll budget.
    #[error("assistant job did not finish after {attempts} status checks")]
    Timeout { attempts: u32 },

    /// The job completed but the conversation holds no assistant message.
    #[error("no response from assistant")]
    NoAssistantResponse,

    /// The assistant's reply did not decode to the expected shape.
    #[error("malformed assistant response: {0}")]
    MalformedResponse(String),

    /// The store rejected the write (foreign key, connectivity, ...).
    #[error("persistence error: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl From<reqwest::Error> for GenerateError {
    fn from(e: reqwest::Error) -> Self {
        GenerateError::Api(e.to_string())
    }
}
