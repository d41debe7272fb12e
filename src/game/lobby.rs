//! Game creation and seating.

use chrono::{DateTime, Utc};

use crate::game::types::{
    DiceMode, GameEvent, GameState, Player, Rejection, Resolution, MAX_PLAYERS, SCHEMA_VERSION,
};

/// Fresh document with `creator` in the first seat and on turn.
pub fn new_game(creator: &str, dice: DiceMode, now: DateTime<Utc>) -> GameState {
    GameState {
        players: vec![Player::new(creator, 0)],
        turn_index: 0,
        pending_offer: None,
        last_dice: None,
        last_event: Some(GameEvent::new(
            "Game created",
            "Waiting for players to join.",
        )),
        created_at: now,
        dice,
        version: SCHEMA_VERSION.to_string(),
    }
}

/// Seat `player_id` at the end of the table.
///
/// Re-joining a game the player already sits in changes nothing.
pub fn join(state: &GameState, player_id: &str) -> Resolution {
    if state.player(player_id).is_some() {
        return Resolution::Applied {
            state: state.clone(),
            event: GameEvent::new("Welcome back", "You are already seated in this game."),
        };
    }
    if state.players.len() >= MAX_PLAYERS {
        return Resolution::Rejected(Rejection::GameFull);
    }

    let mut next = state.clone();
    let seat = next.players.len();
    next.players.push(Player::new(player_id, seat));
    let event = GameEvent::new(
        "Player joined",
        format!("A new player took zoo #{}.", seat + 1),
    );
    next.last_event = Some(event.clone());
    Resolution::Applied { state: next, event }
}
