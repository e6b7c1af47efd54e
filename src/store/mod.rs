//! Document store behind the participant registry and the message log.
//!
//! Two collections are kept: participants (unique by name) and messages
//! (append-only, read back in insertion order). Every operation touches a
//! single document, so no multi-document atomicity is assumed anywhere.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::db::{Message, Participant};

#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique-name constraint rejected an insert.
    #[error("a participant named {0:?} already exists")]
    DuplicateName(String),

    #[error("sqlite: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// A stored row could not be turned back into a document.
    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[error("store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
    /// Fails with [`StoreError::DuplicateName`] if the name is taken.
    async fn insert_participant(&self, participant: &Participant) -> StoreResult<()>;

    async fn find_participant(&self, name: &str) -> StoreResult<Option<Participant>>;

    async fn list_participants(&self) -> StoreResult<Vec<Participant>>;

    /// Sets `last_status`. Returns false when no such participant exists.
    async fn touch_participant(&self, name: &str, last_status: i64) -> StoreResult<bool>;

    /// Deletes the participant only if its `last_status` is still older
    /// than `cutoff`. Returns whether a document was removed.
    async fn delete_participant_if_idle(&self, name: &str, cutoff: i64) -> StoreResult<bool>;

    async fn insert_message(&self, message: &Message) -> StoreResult<()>;

    /// All messages, oldest first.
    async fn list_messages(&self) -> StoreResult<Vec<Message>>;
}

pub type DynStore = Arc<dyn Store>;

/// Opens the store named by a `DATABASE_URL`-style string. `memory` gives
/// a fresh [`MemoryStore`]; anything else is handed to sqlx.
pub async fn connect(url: &str) -> StoreResult<DynStore> {
    if url == "memory" {
        tracing::info!("using in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = SqliteStore::connect(url).await?;
    tracing::info!("connected to {url}");
    Ok(Arc::new(store))
}
