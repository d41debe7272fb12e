//! Turn resolution: movement, payday, space effects and turn gating.

use chrono::{DateTime, TimeZone, Utc};
use zoo_loop::game::{
    board::{space_at, SpaceKind, TRACK_LENGTH},
    catalog,
    dice::ScriptedDice,
    lobby,
    logic::{resolve_roll, zoo_admission},
    types::{DiceMode, GameEvent, GameState, Offer, Player, Rejection, Resolution},
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn game(ids: &[&str]) -> GameState {
    let mut state = lobby::new_game(ids[0], DiceMode::Random, now());
    for id in &ids[1..] {
        state = applied(lobby::join(&state, id)).0;
    }
    state
}

fn applied(res: Resolution) -> (GameState, GameEvent) {
    match res {
        Resolution::Applied { state, event } => (state, event),
        Resolution::Rejected(r) => panic!("unexpected rejection: {r}"),
    }
}

fn roll(state: &GameState, actor: &str, faces: &[u8]) -> (GameState, GameEvent) {
    applied(resolve_roll(
        state,
        actor,
        &mut ScriptedDice::new(faces.iter().copied()),
        now(),
    ))
}

#[test]
fn vet_visit_scenario() {
    let state = game(&["a", "b"]);

    let (next, event) = roll(&state, "a", &[3, 4]);

    let a = next.player("a").unwrap();
    assert_eq!(a.pos, 7);
    assert_eq!(a.money, 1380);
    assert_eq!(next.turn_index, 1, "turn passes to b");
    let dice = next.last_dice.as_ref().unwrap();
    assert_eq!((dice.d1, dice.d2, dice.total), (3, 4, 7));
    assert_eq!(dice.by, "a");
    assert_eq!(dice.payday_roll, None);
    assert_eq!(dice.payday_amount, None);
    assert_eq!(next.last_event.as_ref(), Some(&event));
    // b is untouched
    assert_eq!(next.player("b"), state.player("b"));
}

#[test]
fn payday_is_applied_before_the_landing_tip() {
    let mut state = game(&["a", "b"]);
    state.players[0].pos = 28;

    // 2 + 3 = 5 -> space 3 (TIP 75), payday die 4
    let (next, event) = roll(&state, "a", &[2, 3, 4]);

    let a = next.player("a").unwrap();
    assert_eq!(a.pos, 3);
    assert_eq!(a.money, 1500 + 400 + 75);
    let dice = next.last_dice.unwrap();
    assert_eq!(dice.payday_roll, Some(4));
    assert_eq!(dice.payday_amount, Some(400));

    let lines: Vec<&str> = event.body.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Payday!"));
    assert_eq!(lines[1], "Visitors tipped you $75.");
}

#[test]
fn payday_six_pays_nothing() {
    let mut state = game(&["a", "b"]);
    state.players[0].pos = 28;

    let (next, _) = roll(&state, "a", &[2, 3, 6]);

    assert_eq!(next.player("a").unwrap().money, 1500 + 75);
    let dice = next.last_dice.unwrap();
    assert_eq!(dice.payday_roll, Some(6));
    assert_eq!(dice.payday_amount, Some(0));
}

#[test]
fn wrapping_onto_a_path_reports_payday_then_nothing() {
    let mut state = game(&["a", "b"]);
    state.players[0].pos = 27;

    let (next, event) = roll(&state, "a", &[1, 4, 4]);

    let a = next.player("a").unwrap();
    assert_eq!(a.pos, 2);
    assert_eq!(space_at(2).kind, SpaceKind::Path);
    assert_eq!(a.money, 1900);
    let lines: Vec<&str> = event.body.lines().collect();
    assert!(lines[0].contains("+$400"));
    assert_eq!(lines[1], "Nothing special happened.");
}

#[test]
fn landing_exactly_on_home_still_pays_out() {
    let mut state = game(&["a", "b"]);
    state.players[0].pos = 25;

    let (next, _) = roll(&state, "a", &[2, 3, 1]);

    let a = next.player("a").unwrap();
    assert_eq!(a.pos, 0);
    assert_eq!(space_at(0).kind, SpaceKind::Home);
    assert_eq!(a.money, 1600);
}

#[test]
fn no_payday_without_passing_home() {
    let mut state = game(&["a", "b"]);
    state.players[0].pos = 16;

    // 16 + 12 = 28, one short of wrapping
    let mut dice = ScriptedDice::new([6, 6, 5]);
    let (next, _) = applied(resolve_roll(&state, "a", &mut dice, now()));

    assert_eq!(next.player("a").unwrap().pos, 28);
    assert_eq!(next.last_dice.unwrap().payday_roll, None);
    assert_eq!(dice.remaining_faces(), 1, "payday die never drawn");
}

#[test]
fn only_the_current_player_may_roll() {
    let state = game(&["a", "b", "c"]);

    for actor in ["b", "c", "stranger"] {
        let res = resolve_roll(&state, actor, &mut ScriptedDice::new([3, 4]), now());
        assert_eq!(res, Resolution::Rejected(Rejection::NotYourTurn));
    }
}

#[test]
fn empty_game_rejects_rolls() {
    let mut state = game(&["a"]);
    state.players.clear();

    let res = resolve_roll(&state, "a", &mut ScriptedDice::new([3, 4]), now());
    assert_eq!(res, Resolution::Rejected(Rejection::NoPlayers));
}

#[test]
fn pending_offer_blocks_every_roll() {
    let mut state = game(&["a", "b"]);
    state.pending_offer = Some(Offer {
        for_player_id: "a".into(),
        animal: catalog::find("Lion").unwrap().clone(),
        created_at: now(),
    });

    for actor in ["a", "b"] {
        let res = resolve_roll(&state, actor, &mut ScriptedDice::new([3, 4]), now());
        assert!(matches!(res, Resolution::Rejected(_)), "{actor} rolled");
    }
    let res = resolve_roll(&state, "a", &mut ScriptedDice::new([3, 4]), now());
    assert_eq!(res, Resolution::Rejected(Rejection::OfferPending));
}

#[test]
fn donation_moves_money_without_creating_it() {
    let mut state = game(&["a", "b", "c", "d"]);
    state.players[0].pos = 2;
    state.players[3].money = 20;
    let before = state.total_money();

    // 2 + 7 = 9 -> Donation Drive (50 from each)
    let (next, _) = roll(&state, "a", &[3, 4]);

    assert_eq!(next.total_money(), before);
    assert_eq!(next.player("a").unwrap().money, 1500 + 150);
    assert_eq!(next.player("b").unwrap().money, 1450);
    assert_eq!(next.player("c").unwrap().money, 1450);
    assert_eq!(next.player("d").unwrap().money, -30, "no floor on balances");
    assert_eq!(next.turn_index, 1);
}

#[test]
fn charity_gala_uses_its_own_rate() {
    let mut state = game(&["a", "b"]);
    state.players[0].pos = 20;
    let before = state.total_money();

    // 20 + 4 = 24 -> Charity Gala (75 from each)
    let (next, _) = roll(&state, "a", &[1, 3]);

    assert_eq!(next.total_money(), before);
    assert_eq!(next.player("a").unwrap().money, 1575);
    assert_eq!(next.player("b").unwrap().money, 1425);
}

#[test]
fn lone_player_donation_collects_nothing() {
    let mut state = game(&["a"]);
    state.players[0].pos = 2;

    let (next, event) = roll(&state, "a", &[3, 4]);

    assert_eq!(next.player("a").unwrap().money, 1500);
    assert_eq!(next.turn_index, 0);
    assert!(event.body.contains("Nobody"));
}

#[test]
fn market_creates_offer_and_keeps_the_turn() {
    let state = game(&["a", "b"]);

    // 0 + 5 -> Animal Market, pick catalog entry 4
    let mut dice = ScriptedDice::new([2, 3]).with_picks([4]);
    let (next, event) = applied(resolve_roll(&state, "a", &mut dice, now()));

    let offer = next.pending_offer.as_ref().expect("offer created");
    assert_eq!(offer.for_player_id, "a");
    assert_eq!(offer.animal, catalog::catalog()[4]);
    assert_eq!(offer.created_at, now());
    assert_eq!(next.turn_index, 0, "turn stays with a");
    assert_eq!(next.player("a").unwrap().money, 1500);
    assert!(event.body.contains(&offer.animal.name));
}

#[test]
fn zoo_zone_charges_admission_to_a_random_rival() {
    let mut state = game(&["a", "b", "c"]);
    state.players[0].pos = 8;
    state.players[2].animals = 2;
    let before = state.total_money();

    // 8 + 3 = 11 -> Zoo Zone; rivals are [b, c], pick the second
    let mut dice = ScriptedDice::new([1, 2]).with_picks([1]);
    let (next, event) = applied(resolve_roll(&state, "a", &mut dice, now()));

    let fee = zoo_admission(2);
    assert_eq!(fee, 100);
    assert_eq!(next.player("a").unwrap().money, 1500 - fee);
    assert_eq!(next.player("c").unwrap().money, 1500 + fee);
    assert_eq!(next.player("b").unwrap().money, 1500);
    assert_eq!(next.total_money(), before);
    assert!(event.body.contains("zoo #3"));
}

#[test]
fn zoo_zone_alone_is_a_no_op() {
    let mut state = game(&["a"]);
    state.players[0].pos = 8;

    let (next, event) = roll(&state, "a", &[1, 2]);

    assert_eq!(next.player("a").unwrap().money, 1500);
    assert_eq!(event.body, "No other zoos to visit.");
}

#[test]
fn costly_spaces_charge_their_amount() {
    // (start, faces, expected money)
    let cases: &[(u32, [u8; 2], i64)] = &[
        (10, [1, 2], 1500 - 150), // 13 Runaway
        (16, [1, 2], 1500 - 200), // 19 Accident
        (20, [1, 2], 1500 - 180), // 23 Vet Emergency
        (12, [1, 2], 1500 + 50),  // 15 Tip Jar
    ];
    for (start, faces, money) in cases {
        let mut state = game(&["a", "b"]);
        state.players[0].pos = *start;
        let (next, _) = roll(&state, "a", faces);
        assert_eq!(next.player("a").unwrap().money, *money, "from {start}");
    }
}

#[test]
fn balances_may_go_negative() {
    let mut state = game(&["a", "b"]);
    state.players[0].pos = 16;
    state.players[0].money = 50;

    let (next, _) = roll(&state, "a", &[1, 2]);

    assert_eq!(next.player("a").unwrap().money, -150);
}

#[test]
fn every_space_but_the_market_passes_the_turn() {
    for dest in 0..TRACK_LENGTH {
        let mut state = game(&["a", "b"]);
        state.turn_index = 1;
        state.players[1].pos = (dest + TRACK_LENGTH - 7) % TRACK_LENGTH;

        let (next, _) = roll(&state, "b", &[3, 4, 1]);

        assert_eq!(next.player("b").unwrap().pos, dest);
        let expected = if space_at(dest).kind == SpaceKind::Market {
            1
        } else {
            0
        };
        assert_eq!(next.turn_index, expected, "landing on {dest}");
    }
}

#[test]
fn seeded_games_advance_their_roll_counter() {
    let mut state = game(&["a", "b"]);
    state.dice = DiceMode::Seeded {
        seed: 9,
        counter: 4,
    };

    let (next, _) = roll(&state, "a", &[3, 4]);

    assert_eq!(
        next.dice,
        DiceMode::Seeded {
            seed: 9,
            counter: 5
        }
    );
}

#[test]
fn malformed_positions_read_as_start() {
    for pos in ["3.5", "-2", "\"7\"", "null", "99"] {
        let json = format!(r#"{{"id":"x","pos":{pos},"money":1500,"homeZooIndex":0}}"#);
        let player: Player = serde_json::from_str(&json).unwrap();
        assert_eq!(player.pos, 0, "pos {pos}");
    }
    let player: Player =
        serde_json::from_str(r#"{"id":"x","money":1500,"homeZooIndex":0}"#).unwrap();
    assert_eq!(player.pos, 0);
    assert_eq!(player.animals, 0);
}
