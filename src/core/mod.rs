//! Core value types shared by every layer

pub mod card;
pub mod mana;
pub mod types;

pub use card::CardKind;
pub use mana::{Color, ManaCost, ManaPool};
pub use types::{CardName, CounterKind};
