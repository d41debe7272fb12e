//! Shared game documents.
//!
//! A store only has to offer create-if-absent, read, and a conditional write
//! that succeeds when the document still matches what was read. Retrying on
//! conflict is the caller's job (see [`crate::tx`]).

pub mod memory;
pub mod redis;

use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;

use crate::{code::GameCode, game::types::GameState};

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// A document as read, together with the exact bytes it was read as.
///
/// The raw form is the precondition for [`GameStore::commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub raw: String,
    pub state: GameState,
}

impl Snapshot {
    pub fn decode(raw: String) -> Result<Self> {
        let state = serde_json::from_str(&raw)?;
        Ok(Snapshot { raw, state })
    }

    pub fn encode(state: &GameState) -> Result<Self> {
        Ok(Snapshot {
            raw: serde_json::to_string(state)?,
            state: state.clone(),
        })
    }
}

/// Outcome of a conditional write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStatus {
    Committed,
    /// Someone else wrote first; nothing was written.
    Conflict,
    /// The document no longer exists.
    Missing,
}

#[async_trait]
pub trait GameStore: Send + Sync {
    /// Create the document unless `code` is taken. Returns `false` on collision.
    async fn insert_new(&self, code: &GameCode, state: &GameState) -> Result<bool>;

    async fn fetch(&self, code: &GameCode) -> Result<Option<Snapshot>>;

    /// Replace the document with `next` only if it still equals `expected`,
    /// announcing the new state to subscribers in the same step.
    async fn commit(
        &self,
        code: &GameCode,
        expected: &Snapshot,
        next: &GameState,
    ) -> Result<CommitStatus>;

    /// Stream of every state committed from now on.
    async fn subscribe(&self, code: &GameCode) -> Result<BoxStream<'static, GameState>>;
}
