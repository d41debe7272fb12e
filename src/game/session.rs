//! One client's connection to one shared game.
//!
//! A `Session` bundles the store handle, game code, player identity and
//! settings, and is passed explicitly to every action. The rules it invokes
//! keep no state between calls.

use std::sync::Arc;

use chrono::Utc;
use futures::stream::BoxStream;
use thiserror::Error;

use crate::{
    code::{GameCode, InvalidCode},
    config::Settings,
    game::{
        dice::{SeededDice, ThreadDice},
        lobby, logic, offer,
        types::{DiceMode, GameEvent, GameState, Rejection, Resolution},
    },
    store::{GameStore, StoreError},
    tx::{compute_and_commit, CommitError, Outcome, RetryPolicy},
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("game {0} not found")]
    NotFound(GameCode),

    #[error(transparent)]
    InvalidCode(#[from] InvalidCode),

    #[error("no free game code after {attempts} attempts")]
    CodeSpaceExhausted { attempts: u32 },

    #[error("{0}")]
    Rejected(#[from] Rejection),

    #[error(transparent)]
    Commit(CommitError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<CommitError> for SessionError {
    fn from(e: CommitError) -> Self {
        match e {
            CommitError::NotFound(code) => SessionError::NotFound(code),
            CommitError::Store(e) => SessionError::Store(e),
            other => SessionError::Commit(other),
        }
    }
}

pub struct Session<S: GameStore + ?Sized> {
    store: Arc<S>,
    code: GameCode,
    player_id: String,
    settings: Settings,
}

impl<S: GameStore + ?Sized> Session<S> {
    /// Create a new game with `player_id` in the first seat.
    pub async fn create(
        store: Arc<S>,
        player_id: impl Into<String>,
        settings: Settings,
    ) -> Result<Self, SessionError> {
        let player_id = player_id.into();
        let dice = match settings.dice_seed {
            Some(seed) => DiceMode::Seeded { seed, counter: 0 },
            None => DiceMode::Random,
        };
        let state = lobby::new_game(&player_id, dice, Utc::now());

        for attempt in 1..=settings.code_attempts {
            let code = GameCode::generate(settings.code_len, &mut rand::rng());
            if store.insert_new(&code, &state).await? {
                log::info!("game {code} created by {player_id}");
                return Ok(Session {
                    store,
                    code,
                    player_id,
                    settings,
                });
            }
            log::debug!("game code {code} taken (attempt {attempt})");
        }
        Err(SessionError::CodeSpaceExhausted {
            attempts: settings.code_attempts,
        })
    }

    /// Take a seat in an existing game. Re-joining is harmless.
    pub async fn join(
        store: Arc<S>,
        code: &str,
        player_id: impl Into<String>,
        settings: Settings,
    ) -> Result<(Self, GameEvent), SessionError> {
        let code = GameCode::parse(code)?;
        let player_id = player_id.into();
        let policy = RetryPolicy::from_settings(&settings);

        let outcome = compute_and_commit(&*store, &code, policy, |state| {
            lobby::join(state, &player_id)
        })
        .await?;

        match outcome {
            Outcome::Committed { event, .. } => {
                log::info!("{player_id} joined game {code}");
                let session = Session {
                    store,
                    code,
                    player_id,
                    settings,
                };
                Ok((session, event))
            }
            Outcome::Rejected(reason) => Err(SessionError::Rejected(reason)),
        }
    }

    /// Re-attach to a game without touching it, e.g. from a fresh process.
    pub async fn attach(
        store: Arc<S>,
        code: &str,
        player_id: impl Into<String>,
        settings: Settings,
    ) -> Result<Self, SessionError> {
        let code = GameCode::parse(code)?;
        if store.fetch(&code).await?.is_none() {
            return Err(SessionError::NotFound(code));
        }
        Ok(Session {
            store,
            code,
            player_id: player_id.into(),
            settings,
        })
    }

    pub fn code(&self) -> &GameCode {
        &self.code
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    /// Current committed document.
    pub async fn state(&self) -> Result<GameState, SessionError> {
        match self.store.fetch(&self.code).await? {
            Some(snapshot) => Ok(snapshot.state),
            None => Err(SessionError::NotFound(self.code.clone())),
        }
    }

    /// Roll the dice for this player's turn.
    pub async fn roll(&self) -> Result<Outcome, SessionError> {
        let actor = self.player_id.as_str();
        let outcome = self
            .commit(|state| {
                let now = Utc::now();
                match state.dice {
                    DiceMode::Seeded { seed, counter } => logic::resolve_roll(
                        state,
                        actor,
                        &mut SeededDice::for_turn(seed, counter),
                        now,
                    ),
                    DiceMode::Random => logic::resolve_roll(state, actor, &mut ThreadDice, now),
                }
            })
            .await?;
        if let Outcome::Committed { event, .. } = &outcome {
            log::info!("{}: {actor} rolled: {}", self.code, event.title);
        }
        Ok(outcome)
    }

    /// Buy (`true`) or skip (`false`) the offer pending for this player.
    pub async fn resolve_offer(&self, buy: bool) -> Result<Outcome, SessionError> {
        let actor = self.player_id.as_str();
        let outcome = self
            .commit(|state| offer::resolve_offer(state, actor, buy))
            .await?;
        if let Outcome::Committed { event, .. } = &outcome {
            log::info!("{}: {actor} answered offer: {}", self.code, event.title);
        }
        Ok(outcome)
    }

    /// Every state committed to this game from now on.
    pub async fn watch(&self) -> Result<BoxStream<'static, GameState>, SessionError> {
        Ok(self.store.subscribe(&self.code).await?)
    }

    async fn commit<F>(&self, step: F) -> Result<Outcome, SessionError>
    where
        F: FnMut(&GameState) -> Resolution,
    {
        let policy = RetryPolicy::from_settings(&self.settings);
        Ok(compute_and_commit(&*self.store, &self.code, policy, step).await?)
    }
}
