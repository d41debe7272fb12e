//! Game rules. Everything here except `session` is pure and synchronous.

pub mod board;
pub mod catalog;
pub mod dice;
pub mod lobby;
pub mod logic;
pub mod offer;
pub mod session;
pub mod types;
