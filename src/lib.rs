//! zoo-loop: turn resolution for a shared-document multiplayer board game.
//!
//! Rules live in [`game`] and are pure. [`tx`] runs them against a
//! [`store::GameStore`] under optimistic concurrency, and
//! [`game::session::Session`] is the per-client entry point.

pub mod code;
pub mod config;
pub mod game;
pub mod store;
pub mod tx;
