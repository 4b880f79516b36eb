//! Game zones (Library, Hand, Board, Graveyard, Exile)

use crate::core::CardName;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Different zones where cards can exist
///
/// `LibraryTop` and `LibraryBottom` address the same physical library; they
/// only differ in where a card moved *into* the library ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Hand,
    LibraryTop,
    LibraryBottom,
    Board,
    Exile,
    Graveyard,
}

impl Zone {
    /// Cards moved into a top-inserting zone are prepended
    pub fn inserts_on_top(&self) -> bool {
        matches!(self, Zone::LibraryTop)
    }

    pub fn is_library(&self) -> bool {
        matches!(self, Zone::LibraryTop | Zone::LibraryBottom)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Zone::Hand => "hand",
            Zone::LibraryTop => "library top",
            Zone::LibraryBottom => "library bottom",
            Zone::Board => "board",
            Zone::Exile => "exile",
            Zone::Graveyard => "graveyard",
        };
        write!(f, "{name}")
    }
}

/// An ordered zone of cards; the front is the top
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardZone {
    pub cards: VecDeque<CardName>,
}

impl CardZone {
    pub fn new() -> Self {
        CardZone::default()
    }

    pub fn from_cards(cards: impl IntoIterator<Item = CardName>) -> Self {
        CardZone {
            cards: cards.into_iter().collect(),
        }
    }

    pub fn add(&mut self, card: CardName) {
        self.cards.push_back(card);
    }

    pub fn add_to_top(&mut self, card: CardName) {
        self.cards.push_front(card);
    }

    /// Remove the first copy of `card`
    pub fn remove(&mut self, card: &CardName) -> bool {
        // Note: We use remove() instead of swap_remove() because iteration order
        // matters for deterministic gameplay.
        if let Some(pos) = self.cards.iter().position(|c| c == card) {
            self.cards.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card: &CardName) -> bool {
        self.cards.contains(card)
    }

    /// Number of copies of a card
    pub fn count(&self, card: &str) -> usize {
        self.cards.iter().filter(|c| c.is(card)).count()
    }

    /// Number of cards matching any of the given names
    pub fn count_any(&self, names: &[&str]) -> usize {
        self.cards
            .iter()
            .filter(|c| names.iter().any(|n| c.is(n)))
            .count()
    }

    /// First card matching one of the given names, in name-preference order
    pub fn find_first_of(&self, names: &[&str]) -> Option<CardName> {
        names
            .iter()
            .find_map(|n| self.cards.iter().find(|c| c.is(n)).cloned())
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Draw from top (for Library)
    pub fn draw_top(&mut self) -> Option<CardName> {
        self.cards.pop_front()
    }

    /// Look at top card without removing it
    pub fn peek_top(&self) -> Option<&CardName> {
        self.cards.front()
    }

    pub fn first(&self) -> Option<&CardName> {
        self.cards.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardName> {
        self.cards.iter()
    }

    /// Shuffle the zone (for Library)
    pub fn shuffle(&mut self, rng: &mut impl rand::Rng) {
        use rand::seq::SliceRandom;
        self.cards.make_contiguous().shuffle(rng);
    }

    /// Clear all cards
    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

impl fmt::Display for CardZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{card}")?;
        }
        write!(f, "]")
    }
}

/// Multiset of card names
///
/// Used for tap marks and summoning sickness, where only the number of marked
/// copies of a name matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardCounts {
    counts: FxHashMap<CardName, u32>,
}

impl CardCounts {
    pub fn new() -> Self {
        CardCounts::default()
    }

    pub fn count(&self, card: &CardName) -> u32 {
        self.counts.get(card).copied().unwrap_or(0)
    }

    pub fn insert(&mut self, card: CardName) {
        *self.counts.entry(card).or_insert(0) += 1;
    }

    /// Remove one mark; returns false when the card had none
    pub fn remove(&mut self, card: &CardName) -> bool {
        match self.counts.get_mut(card) {
            Some(n) if *n > 1 => {
                *n -= 1;
                true
            }
            Some(_) => {
                self.counts.remove(card);
                true
            }
            None => false,
        }
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}
