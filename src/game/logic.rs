//! Authoritative turn resolution.
//!
//! `resolve_roll` is a pure function of its inputs. It never touches the
//! store, so the commit layer can rerun it on every retry.

use chrono::{DateTime, Utc};

use crate::game::{
    board::{space_at, Space, SpaceKind, TRACK_LENGTH},
    catalog::catalog,
    dice::{choose, Dice, FACES},
    types::{DiceMode, GameEvent, GameState, LastDice, Offer, Rejection, Resolution},
};

/// Payday pays this much per pip of the bonus die.
pub const PAYDAY_PER_PIP: i64 = 100;
/// A bonus die showing this face pays nothing.
pub const PAYDAY_BUST_FACE: u8 = FACES;

pub const ZOO_ADMISSION_BASE: i64 = 50;
pub const ZOO_ADMISSION_PER_ANIMAL: i64 = 25;

/// Bonus for completing a lap with `roll` on the payday die.
pub fn payday_amount(roll: u8) -> i64 {
    if roll == PAYDAY_BUST_FACE {
        0
    } else {
        i64::from(roll) * PAYDAY_PER_PIP
    }
}

/// Admission charged when visiting a zoo that holds `animals` animals.
pub fn zoo_admission(animals: u32) -> i64 {
    ZOO_ADMISSION_BASE + ZOO_ADMISSION_PER_ANIMAL * i64::from(animals)
}

/// Result of applying a destination space.
struct SpaceOutcome {
    title: String,
    line: String,
    /// A market offer keeps the turn with the acting player.
    holds_turn: bool,
}

impl SpaceOutcome {
    fn passing(title: &str, line: String) -> Self {
        SpaceOutcome {
            title: title.to_string(),
            line,
            holds_turn: false,
        }
    }
}

/// Roll for `actor` and resolve movement, payday and the landing space.
pub fn resolve_roll<D>(
    state: &GameState,
    actor: &str,
    dice: &mut D,
    now: DateTime<Utc>,
) -> Resolution
where
    D: Dice + ?Sized,
{
    if state.players.is_empty() {
        return Resolution::Rejected(Rejection::NoPlayers);
    }
    match state.current_player() {
        Some(p) if p.id == actor => {}
        _ => return Resolution::Rejected(Rejection::NotYourTurn),
    }
    if state.pending_offer.is_some() {
        return Resolution::Rejected(Rejection::OfferPending);
    }

    let idx = state.turn_index;
    let mut next = state.clone();

    let d1 = dice.roll_face();
    let d2 = dice.roll_face();
    let total = d1 + d2;

    let landed = next.players[idx].pos + u32::from(total);
    let passed_home = landed >= TRACK_LENGTH;
    let dest = landed % TRACK_LENGTH;

    let mut lines = Vec::with_capacity(2);
    let mut payday = None;
    if passed_home {
        let roll = dice.roll_face();
        let amount = payday_amount(roll);
        next.players[idx].money += amount;
        lines.push(if amount == 0 {
            format!("Payday! Rolled a {roll}: no bonus this lap.")
        } else {
            format!("Payday! Rolled a {roll}: +${amount}.")
        });
        payday = Some((roll, amount));
    }

    next.players[idx].pos = dest;

    let space = space_at(dest);
    let outcome = apply_space(&mut next, idx, space, dice, now);
    lines.push(outcome.line);

    if !outcome.holds_turn {
        next.advance_turn();
    }

    let event = GameEvent::new(outcome.title, lines.join("\n"));
    next.last_dice = Some(LastDice {
        d1,
        d2,
        total,
        by: actor.to_string(),
        payday_roll: payday.map(|(roll, _)| roll),
        payday_amount: payday.map(|(_, amount)| amount),
    });
    next.last_event = Some(event.clone());
    if let DiceMode::Seeded { counter, .. } = &mut next.dice {
        *counter += 1;
    }

    log::debug!(
        "{actor} rolled {d1}+{d2} to space {dest} ({})",
        space.kind.label()
    );
    Resolution::Applied { state: next, event }
}

fn apply_space<D>(
    state: &mut GameState,
    idx: usize,
    space: &Space,
    dice: &mut D,
    now: DateTime<Utc>,
) -> SpaceOutcome
where
    D: Dice + ?Sized,
{
    let name = space.name.as_str();
    match space.kind {
        SpaceKind::Path | SpaceKind::Home => {
            SpaceOutcome::passing(name, "Nothing special happened.".to_string())
        }
        SpaceKind::Tip { amount } => {
            state.players[idx].money += amount;
            SpaceOutcome::passing(name, format!("Visitors tipped you ${amount}."))
        }
        SpaceKind::Vet { amount } => {
            state.players[idx].money -= amount;
            SpaceOutcome::passing(name, format!("Vet bill: paid ${amount}."))
        }
        SpaceKind::Runaway { amount } => {
            state.players[idx].money -= amount;
            SpaceOutcome::passing(
                name,
                format!("An animal ran away! Recovery cost ${amount}."),
            )
        }
        SpaceKind::Accident { amount } => {
            state.players[idx].money -= amount;
            SpaceOutcome::passing(name, format!("Truck accident! Repairs cost ${amount}."))
        }
        SpaceKind::Donation { amount_from_each } => {
            let mut collected = 0;
            let mut donors = 0;
            for (i, p) in state.players.iter_mut().enumerate() {
                if i == idx {
                    continue;
                }
                p.money -= amount_from_each;
                collected += amount_from_each;
                donors += 1;
            }
            state.players[idx].money += collected;
            let line = if donors == 0 {
                "Nobody else was around to donate.".to_string()
            } else {
                format!("Every other player donated ${amount_from_each}: collected ${collected}.")
            };
            SpaceOutcome::passing(name, line)
        }
        SpaceKind::Market => match choose(dice, catalog()) {
            Some(animal) => {
                let line = format!(
                    "A {} is for sale for ${} (tier {}). Buy or skip?",
                    animal.name, animal.cost, animal.tier
                );
                state.pending_offer = Some(Offer {
                    for_player_id: state.players[idx].id.clone(),
                    animal: animal.clone(),
                    created_at: now,
                });
                SpaceOutcome {
                    title: name.to_string(),
                    line,
                    holds_turn: true,
                }
            }
            None => SpaceOutcome::passing(name, "The market is sold out.".to_string()),
        },
        SpaceKind::ZooZone => {
            let others: Vec<usize> = (0..state.players.len()).filter(|&i| i != idx).collect();
            let Some(&target) = choose(dice, &others) else {
                return SpaceOutcome::passing(name, "No other zoos to visit.".to_string());
            };
            let fee = zoo_admission(state.players[target].animals);
            state.players[idx].money -= fee;
            state.players[target].money += fee;
            let line = format!(
                "Visited zoo #{} ({}): paid ${fee} admission.",
                state.players[target].home_zoo_index + 1,
                state.players[target].id
            );
            SpaceOutcome::passing(name, line)
        }
    }
}
