//! Short, human-typed game codes.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Uppercase letters and digits minus the lookalikes `0 O 1 I L`.
pub const ALPHABET: &str = "ABCDEFGHJKMNPQRSTUVWXYZ23456789";
pub const MIN_LEN: usize = 4;
pub const MAX_LEN: usize = 6;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error(
    "invalid game code {0:?}: expected {min}-{max} characters from {alphabet}",
    min = MIN_LEN,
    max = MAX_LEN,
    alphabet = ALPHABET
)]
pub struct InvalidCode(pub String);

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct GameCode(String);

impl GameCode {
    /// Random code of `len` characters (clamped to the valid range).
    pub fn generate<R: Rng>(len: usize, rng: &mut R) -> Self {
        let len = len.clamp(MIN_LEN, MAX_LEN);
        let symbols = ALPHABET.as_bytes();
        let code = (0..len)
            .map(|_| char::from(symbols[rng.random_range(0..symbols.len())]))
            .collect();
        GameCode(code)
    }

    /// Accepts user input: surrounding whitespace is ignored, case is folded.
    pub fn parse(input: &str) -> Result<Self, InvalidCode> {
        let code = input.trim().to_ascii_uppercase();
        let valid = (MIN_LEN..=MAX_LEN).contains(&code.len())
            && code.chars().all(|c| ALPHABET.contains(c));
        if valid {
            Ok(GameCode(code))
        } else {
            Err(InvalidCode(input.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key of the shared document.
    pub fn doc_key(&self) -> String {
        format!("game:{}", self.0)
    }

    /// Channel on which committed states are announced.
    pub fn updates_channel(&self) -> String {
        format!("game:{}:updates", self.0)
    }
}

impl fmt::Display for GameCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for GameCode {
    type Error = InvalidCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        GameCode::parse(&value)
    }
}

impl From<GameCode> for String {
    fn from(code: GameCode) -> Self {
        code.0
    }
}
