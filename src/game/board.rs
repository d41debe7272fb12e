//! Static board topology: one closed loop of `TRACK_LENGTH` spaces.
//!
//! Positions not listed in [`SPECIAL_SPACES`] are plain path tiles.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Number of spaces on the loop. Positions are always `0..TRACK_LENGTH`.
pub const TRACK_LENGTH: u32 = 30;

pub const DEFAULT_TIP: i64 = 50;
pub const DEFAULT_VET_BILL: i64 = 120;
pub const DEFAULT_RUNAWAY_COST: i64 = 150;
pub const DEFAULT_ACCIDENT_COST: i64 = 200;
pub const DEFAULT_DONATION: i64 = 50;

/// Rule attached to a space. Each kind carries its own parameters.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpaceKind {
    Path,
    Home,
    Tip { amount: i64 },
    Vet { amount: i64 },
    Runaway { amount: i64 },
    Accident { amount: i64 },
    Donation {
        #[serde(rename = "amountFromEach")]
        amount_from_each: i64,
    },
    Market,
    ZooZone,
}

impl SpaceKind {
    pub const fn tip() -> Self {
        SpaceKind::Tip {
            amount: DEFAULT_TIP,
        }
    }

    pub const fn vet() -> Self {
        SpaceKind::Vet {
            amount: DEFAULT_VET_BILL,
        }
    }

    pub const fn runaway() -> Self {
        SpaceKind::Runaway {
            amount: DEFAULT_RUNAWAY_COST,
        }
    }

    pub const fn accident() -> Self {
        SpaceKind::Accident {
            amount: DEFAULT_ACCIDENT_COST,
        }
    }

    pub const fn donation() -> Self {
        SpaceKind::Donation {
            amount_from_each: DEFAULT_DONATION,
        }
    }

    /// Short uppercase label, matching the serialized `type` tag.
    pub fn label(&self) -> &'static str {
        match self {
            SpaceKind::Path => "PATH",
            SpaceKind::Home => "HOME",
            SpaceKind::Tip { .. } => "TIP",
            SpaceKind::Vet { .. } => "VET",
            SpaceKind::Runaway { .. } => "RUNAWAY",
            SpaceKind::Accident { .. } => "ACCIDENT",
            SpaceKind::Donation { .. } => "DONATION",
            SpaceKind::Market => "MARKET",
            SpaceKind::ZooZone => "ZOO_ZONE",
        }
    }
}

/// One track position's static descriptor.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Space {
    pub id: u32,
    pub name: String,
    #[serde(flatten)]
    pub kind: SpaceKind,
}

/// Overrides of the default PATH tile, keyed by position.
const SPECIAL_SPACES: &[(u32, &str, SpaceKind)] = &[
    (0, "Home Gate", SpaceKind::Home),
    (3, "Visitor Tips", SpaceKind::Tip { amount: 75 }),
    (5, "Animal Market", SpaceKind::Market),
    (7, "Vet Visit", SpaceKind::vet()),
    (9, "Donation Drive", SpaceKind::donation()),
    (11, "Zoo Zone", SpaceKind::ZooZone),
    (13, "Runaway!", SpaceKind::runaway()),
    (15, "Tip Jar", SpaceKind::tip()),
    (17, "Animal Market", SpaceKind::Market),
    (19, "Truck Accident", SpaceKind::accident()),
    (21, "Zoo Zone", SpaceKind::ZooZone),
    (23, "Vet Emergency", SpaceKind::Vet { amount: 180 }),
    (24, "Charity Gala", SpaceKind::Donation {
        amount_from_each: 75,
    }),
    (26, "Animal Market", SpaceKind::Market),
    (28, "Big Tippers", SpaceKind::Tip { amount: 100 }),
];

static BOARD: Lazy<Vec<Space>> = Lazy::new(|| {
    (0..TRACK_LENGTH)
        .map(|id| match SPECIAL_SPACES.iter().find(|(pos, ..)| *pos == id) {
            Some((_, name, kind)) => Space {
                id,
                name: (*name).to_string(),
                kind: *kind,
            },
            None => Space {
                id,
                name: "Path".to_string(),
                kind: SpaceKind::Path,
            },
        })
        .collect()
});

/// The canonical board, indexed by position.
pub fn board() -> &'static [Space] {
    &BOARD
}

/// Space at `pos`, wrapping positions outside the loop.
pub fn space_at(pos: u32) -> &'static Space {
    &BOARD[(pos % TRACK_LENGTH) as usize]
}
