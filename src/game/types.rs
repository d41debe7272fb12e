use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::game::board::TRACK_LENGTH;

/// Balance every player starts with.
pub const STARTING_MONEY: i64 = 1500;
/// Hard cap on seats; also the number of home-zoo display slots.
pub const MAX_PLAYERS: usize = 6;
/// Informational schema tag written into every new game document.
pub const SCHEMA_VERSION: &str = "v1";

/// One seat at the table.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    #[serde(default, deserialize_with = "lenient_position")]
    pub pos: u32,
    pub money: i64,
    #[serde(default)]
    pub animals: u32,
    #[serde(default)]
    pub tier_points: u32,
    pub home_zoo_index: usize,
}

impl Player {
    pub fn new(id: impl Into<String>, home_zoo_index: usize) -> Self {
        Player {
            id: id.into(),
            pos: 0,
            money: STARTING_MONEY,
            animals: 0,
            tier_points: 0,
            home_zoo_index,
        }
    }
}

/// Documents written by older clients sometimes carry a missing, fractional
/// or out-of-range `pos`; all of those read back as the start tile.
fn lenient_position<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_u64)
        .filter(|p| *p < u64::from(TRACK_LENGTH))
        .map_or(0, |p| p as u32))
}

/// Catalog entry offered at a market.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Animal {
    pub name: String,
    pub cost: i64,
    pub tier: u32,
}

/// A purchase decision that blocks every roll until its owner answers it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub for_player_id: String,
    pub animal: Animal,
    pub created_at: DateTime<Utc>,
}

/// Display-only record of the latest roll.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LastDice {
    pub d1: u8,
    pub d2: u8,
    pub total: u8,
    pub by: String,
    pub payday_roll: Option<u8>,
    pub payday_amount: Option<i64>,
}

/// Human-readable description of the latest resolution.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GameEvent {
    pub title: String,
    pub body: String,
}

impl GameEvent {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        GameEvent {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Where a game's dice come from.
///
/// `Seeded` games derive every roll from `seed` and the number of rolls
/// already resolved, so a replayed document produces the same draws.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum DiceMode {
    #[default]
    Random,
    Seeded { seed: u64, counter: u64 },
}

/// The shared per-game document.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub players: Vec<Player>,
    pub turn_index: usize,
    #[serde(default)]
    pub pending_offer: Option<Offer>,
    #[serde(default)]
    pub last_dice: Option<LastDice>,
    #[serde(default)]
    pub last_event: Option<GameEvent>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub dice: DiceMode,
    pub version: String,
}

impl GameState {
    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_index(&self, id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    /// Whose turn it is, if the turn index points at a seat.
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.turn_index)
    }

    pub fn total_money(&self) -> i64 {
        self.players.iter().map(|p| p.money).sum()
    }

    /// Hand the turn to the next seat.
    pub(crate) fn advance_turn(&mut self) {
        if !self.players.is_empty() {
            self.turn_index = (self.turn_index + 1) % self.players.len();
        }
    }
}

/// Why an action had no effect on the game.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("The game has no players.")]
    NoPlayers,
    #[error("Not your turn.")]
    NotYourTurn,
    #[error("An offer must be resolved first.")]
    OfferPending,
    #[error("There is no offer to resolve.")]
    NoOffer,
    #[error("That offer belongs to another player.")]
    OfferNotYours,
    #[error("You are not seated in this game.")]
    UnknownPlayer,
    #[error("The game is full.")]
    GameFull,
}

impl Rejection {
    pub fn event(&self) -> GameEvent {
        GameEvent::new("Action rejected", self.to_string())
    }
}

/// Result of a pure state transition: either a complete next state to be
/// committed as one unit, or a rejection that leaves the document untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Applied { state: GameState, event: GameEvent },
    Rejected(Rejection),
}
