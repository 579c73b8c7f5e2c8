//! Client directory error type.

use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("client not found: {0}")]
    NotFound(Uuid),

    /// Backend failure reported by a `ClientRepository` implementation.
    /// The in-memory store never raises it.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Convenience alias.
pub type ClientResult<T> = Result<T, ClientError>;
