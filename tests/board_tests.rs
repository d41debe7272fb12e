use zoo_loop::game::board::{board, space_at, SpaceKind, DEFAULT_VET_BILL, TRACK_LENGTH};

#[test]
fn one_space_per_position() {
    let spaces = board();
    assert_eq!(spaces.len(), TRACK_LENGTH as usize);
    for (i, space) in spaces.iter().enumerate() {
        assert_eq!(space.id as usize, i);
    }
}

#[test]
fn start_tile_is_the_only_home() {
    assert_eq!(space_at(0).kind, SpaceKind::Home);
    let homes = board()
        .iter()
        .filter(|s| s.kind == SpaceKind::Home)
        .count();
    assert_eq!(homes, 1);
}

#[test]
fn known_spaces() {
    assert_eq!(space_at(2).kind, SpaceKind::Path);
    assert_eq!(space_at(3).kind, SpaceKind::Tip { amount: 75 });
    assert_eq!(
        space_at(7).kind,
        SpaceKind::Vet {
            amount: DEFAULT_VET_BILL
        }
    );
    assert_eq!(DEFAULT_VET_BILL, 120);
}

#[test]
fn positions_wrap_around_the_loop() {
    assert_eq!(space_at(TRACK_LENGTH + 3), space_at(3));
}

#[test]
fn every_kind_appears_on_the_board() {
    let labels: Vec<&str> = board().iter().map(|s| s.kind.label()).collect();
    for label in [
        "PATH", "HOME", "TIP", "VET", "RUNAWAY", "ACCIDENT", "DONATION", "MARKET", "ZOO_ZONE",
    ] {
        assert!(labels.contains(&label), "{label} missing");
    }
}

#[test]
fn spaces_serialize_with_type_tag_and_data() {
    let json = serde_json::to_value(space_at(9)).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": 9,
            "name": "Donation Drive",
            "type": "DONATION",
            "amountFromEach": 50
        })
    );
}
