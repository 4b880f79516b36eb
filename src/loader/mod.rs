//! Deck list loading

pub mod deck;

pub use deck::{DeckEntry, DeckList, DeckLoader};
