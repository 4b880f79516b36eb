//! Burn Goldfish - turn-by-turn simulation of an aggressive burn deck
//!
//! Plays one side of a game against a passive opponent (a "goldfish") and
//! measures how fast the deck can close. Each main phase asks the lethal
//! search whether some ordering of the cards at hand kills this turn; if so
//! the ordering is replayed against the real game state.

pub mod core;
pub mod error;
pub mod game;
pub mod loader;
pub mod pilot;
pub mod rules;
pub mod runner;
pub mod search;
pub mod zones;

pub use error::{GoldfishError, Result};
