use thiserror::Error;

use crate::store::StoreError;

/// Outcome of a chat operation that did not succeed.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Missing or malformed input, detected before anything is written.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("name {0:?} is already taken")]
    Conflict(String),

    /// The sender of a message is not a registered participant.
    #[error("sender is not a registered participant")]
    UnknownSender,

    #[error("participant {0:?} not found")]
    NotFound(String),

    #[error("store failure")]
    Store(#[from] StoreError),
}

pub type ChatResult<T> = Result<T, ChatError>;
