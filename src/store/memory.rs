//! In-process store with the same commit semantics as the Redis one.
//! Used by the integration tests and the offline `demo` command.

use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::{
    code::GameCode,
    game::types::GameState,
    store::{CommitStatus, GameStore, Result, Snapshot},
};

const UPDATE_BUFFER: usize = 64;

#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: DashMap<GameCode, String>,
    updates: DashMap<GameCode, broadcast::Sender<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sender(&self, code: &GameCode) -> broadcast::Sender<String> {
        self.updates
            .entry(code.clone())
            .or_insert_with(|| broadcast::channel(UPDATE_BUFFER).0)
            .clone()
    }

    /// Overwrite a document without any precondition (test setup only).
    pub fn put(&self, code: &GameCode, state: &GameState) -> Result<()> {
        self.docs.insert(code.clone(), serde_json::to_string(state)?);
        Ok(())
    }

    pub fn remove(&self, code: &GameCode) {
        self.docs.remove(code);
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn insert_new(&self, code: &GameCode, state: &GameState) -> Result<bool> {
        let raw = serde_json::to_string(state)?;
        Ok(match self.docs.entry(code.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(raw);
                true
            }
        })
    }

    async fn fetch(&self, code: &GameCode) -> Result<Option<Snapshot>> {
        let raw = self.docs.get(code).map(|doc| doc.value().clone());
        raw.map(Snapshot::decode).transpose()
    }

    async fn commit(
        &self,
        code: &GameCode,
        expected: &Snapshot,
        next: &GameState,
    ) -> Result<CommitStatus> {
        let raw = serde_json::to_string(next)?;
        {
            let Some(mut doc) = self.docs.get_mut(code) else {
                return Ok(CommitStatus::Missing);
            };
            if *doc != expected.raw {
                return Ok(CommitStatus::Conflict);
            }
            *doc = raw.clone();
        }
        // No receivers is fine: nobody is watching this game.
        let _ = self.sender(code).send(raw);
        Ok(CommitStatus::Committed)
    }

    async fn subscribe(&self, code: &GameCode) -> Result<BoxStream<'static, GameState>> {
        let rx = self.sender(code).subscribe();
        let updates = stream::unfold(rx, |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(raw) => match serde_json::from_str::<GameState>(&raw) {
                        Ok(state) => return Some((state, rx)),
                        Err(e) => log::warn!("undecodable update: {e}"),
                    },
                    Err(RecvError::Lagged(skipped)) => {
                        log::warn!("subscriber lagged, skipped {skipped} updates");
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        });
        Ok(updates.boxed())
    }
}
