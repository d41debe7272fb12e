//! Randomness capability injected into the rules.
//!
//! A single resolution must draw everything from one `Dice` instance.
//! `ThreadDice` is used for live play, `SeededDice` for games created with a
//! seed, and `ScriptedDice` replays a fixed sequence.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use sha2::{Digest, Sha256};

pub const FACES: u8 = 6;

pub trait Dice {
    /// One die face, uniform in `1..=6`.
    fn roll_face(&mut self) -> u8;

    /// Uniform index in `0..len`. `len` is never zero.
    fn choose_index(&mut self, len: usize) -> usize;
}

/// Uniform pick from `items`; `None` only when `items` is empty.
pub fn choose<'a, T, D>(dice: &mut D, items: &'a [T]) -> Option<&'a T>
where
    D: Dice + ?Sized,
{
    if items.is_empty() {
        return None;
    }
    items.get(dice.choose_index(items.len()))
}

/// Fresh platform randomness on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadDice;

impl Dice for ThreadDice {
    fn roll_face(&mut self) -> u8 {
        rand::rng().random_range(1..=FACES)
    }

    fn choose_index(&mut self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// Deterministic stream keyed by a per-game seed and the roll counter.
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: Pcg64Mcg,
}

impl SeededDice {
    pub fn for_turn(seed: u64, counter: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(seed.to_le_bytes());
        hasher.update(b"roll");
        hasher.update(counter.to_le_bytes());
        let digest = hasher.finalize();
        let mut seed_bytes = [0u8; 16];
        seed_bytes.copy_from_slice(&digest[..16]);
        SeededDice {
            rng: Pcg64Mcg::from_seed(seed_bytes),
        }
    }
}

impl Dice for SeededDice {
    fn roll_face(&mut self) -> u8 {
        self.rng.random_range(1..=FACES)
    }

    fn choose_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

/// Replays fixed faces and picks in order.
///
/// Once a queue runs dry it keeps answering `1` for faces and `0` for picks.
#[derive(Debug, Default, Clone)]
pub struct ScriptedDice {
    faces: VecDeque<u8>,
    picks: VecDeque<usize>,
}

impl ScriptedDice {
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        ScriptedDice {
            faces: faces.into_iter().collect(),
            picks: VecDeque::new(),
        }
    }

    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }

    /// Faces not yet consumed.
    pub fn remaining_faces(&self) -> usize {
        self.faces.len()
    }
}

impl Dice for ScriptedDice {
    fn roll_face(&mut self) -> u8 {
        match self.faces.pop_front() {
            Some(face) => face.clamp(1, FACES),
            None => {
                log::warn!("scripted dice exhausted, rolling 1");
                1
            }
        }
    }

    fn choose_index(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0) % len
    }
}
