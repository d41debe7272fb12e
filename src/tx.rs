//! Read → compute → conditional-commit cycle over a [`GameStore`].
//!
//! The step function is rerun from a fresh snapshot after every conflict,
//! so it must derive the next state from its argument alone.

use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;
use tokio_retry::strategy::{jitter, ExponentialBackoff};

use crate::{
    code::GameCode,
    config::Settings,
    game::types::{GameEvent, GameState, Rejection, Resolution},
    store::{CommitStatus, GameStore, StoreError},
};

const MAX_BACKOFF: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum CommitError {
    #[error("game {0} not found")]
    NotFound(GameCode),

    #[error("gave up after {attempts} conflicting attempts")]
    Contended { attempts: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Conflict retries after the first attempt.
    pub max_retries: usize,
    /// Backoff before the first retry; each further retry doubles it.
    /// Every delay is jittered down to a random fraction of itself.
    pub base_delay_ms: u64,
}

impl RetryPolicy {
    pub fn from_settings(s: &Settings) -> Self {
        RetryPolicy {
            max_retries: s.commit_max_retries,
            base_delay_ms: s.commit_backoff_ms,
        }
    }

    fn delays(&self) -> impl Iterator<Item = Duration> {
        ExponentialBackoff::from_millis(2)
            .factor((self.base_delay_ms / 2).max(1))
            .max_delay(MAX_BACKOFF)
            .map(jitter)
            .take(self.max_retries)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::from_settings(&Settings::default())
    }
}

/// What a finished cycle did to the shared document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Committed { state: GameState, event: GameEvent },
    /// The step refused the action; nothing was written.
    Rejected(Rejection),
}

impl Outcome {
    pub fn event(&self) -> GameEvent {
        match self {
            Outcome::Committed { event, .. } => event.clone(),
            Outcome::Rejected(r) => r.event(),
        }
    }
}

/// Apply `step` to the current document of `code` and commit the result,
/// retrying from a fresh read whenever another writer got there first.
///
/// Preconditions inside `step` are always evaluated against the snapshot
/// taken in the same attempt.
pub async fn compute_and_commit<S, F>(
    store: &S,
    code: &GameCode,
    policy: RetryPolicy,
    mut step: F,
) -> Result<Outcome, CommitError>
where
    S: GameStore + ?Sized,
    F: FnMut(&GameState) -> Resolution,
{
    let mut delays = policy.delays();
    let mut attempts = 0;
    loop {
        attempts += 1;
        let snapshot = store
            .fetch(code)
            .await?
            .ok_or_else(|| CommitError::NotFound(code.clone()))?;

        let (next, event) = match step(&snapshot.state) {
            Resolution::Applied { state, event } => (state, event),
            Resolution::Rejected(reason) => {
                log::debug!("{code}: rejected on attempt {attempts}: {reason}");
                return Ok(Outcome::Rejected(reason));
            }
        };

        match store.commit(code, &snapshot, &next).await? {
            CommitStatus::Committed => {
                log::debug!("{code}: committed on attempt {attempts}");
                return Ok(Outcome::Committed { state: next, event });
            }
            CommitStatus::Missing => return Err(CommitError::NotFound(code.clone())),
            CommitStatus::Conflict => match delays.next() {
                Some(delay) => {
                    log::warn!("{code}: write conflict on attempt {attempts}, retrying in {delay:?}");
                    sleep(delay).await;
                }
                None => {
                    log::warn!("{code}: giving up after {attempts} conflicting attempts");
                    return Err(CommitError::Contended { attempts });
                }
            },
        }
    }
}
