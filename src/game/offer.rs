//! Buy/skip resolution for a pending market offer.

use crate::game::types::{GameEvent, GameState, Rejection, Resolution};

/// Answer the pending offer on behalf of `actor`.
///
/// Every accepted answer clears the offer and passes the turn, including a
/// purchase the player cannot afford.
pub fn resolve_offer(state: &GameState, actor: &str, buy: bool) -> Resolution {
    let Some(offer) = &state.pending_offer else {
        return Resolution::Rejected(Rejection::NoOffer);
    };
    if offer.for_player_id != actor {
        return Resolution::Rejected(Rejection::OfferNotYours);
    }
    let Some(idx) = state.player_index(actor) else {
        return Resolution::Rejected(Rejection::UnknownPlayer);
    };

    let animal = offer.animal.clone();
    let mut next = state.clone();
    next.pending_offer = None;

    let event = if !buy {
        GameEvent::new("Offer skipped", format!("Passed on the {}.", animal.name))
    } else if next.players[idx].money < animal.cost {
        GameEvent::new(
            "Not enough money",
            format!(
                "The {} costs ${} but you only have ${}.",
                animal.name, animal.cost, next.players[idx].money
            ),
        )
    } else {
        let player = &mut next.players[idx];
        player.money -= animal.cost;
        player.animals += 1;
        player.tier_points += animal.tier;
        GameEvent::new(
            "Animal purchased",
            format!(
                "Bought a {} for ${} (+{} tier points).",
                animal.name, animal.cost, animal.tier
            ),
        )
    };

    next.advance_turn();
    next.last_event = Some(event.clone());
    Resolution::Applied { state: next, event }
}
