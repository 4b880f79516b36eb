//! Main game state structure

use crate::core::{CardName, CounterKind, ManaPool};
use crate::game::{GameLogger, TurnStructure};
use crate::rules::catalog;
use crate::rules::Trigger;
use crate::zones::{CardCounts, CardZone, Zone};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Poison counters that kill the opponent
pub const LETHAL_POISON: u32 = 10;

/// Maximum hand size at the end of the turn
pub const MAX_HAND_SIZE: usize = 7;

/// A countdown marker on a card in some zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    pub kind: CounterKind,
    pub card: CardName,
    pub zone: Zone,
    pub value: u8,
}

/// Complete state of one goldfish game
///
/// Mutated only through the action API in `actions.rs`. Cloning is cheap
/// enough for tests and the pilot; the lethal search never clones it and
/// works on `BoardSynergy` snapshots instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub library: CardZone,
    pub hand: CardZone,
    pub board: CardZone,
    pub exile: CardZone,
    pub graveyard: CardZone,

    /// Tapped copies per card name; never more than the board count
    pub tapped: CardCounts,

    /// Creatures that entered this turn
    pub summoning_sick: CardCounts,

    pub pool: ManaPool,
    pub counters: Vec<Counter>,
    pub turn: TurnStructure,

    /// Opponent life; may go below zero
    pub opponent_life: i32,
    pub opponent_poison: u32,

    /// A land was played this turn
    pub landed: bool,
    pub damage_dealt_this_turn: i32,

    /// Power added to each attacker by spells cast before combat this turn
    pub prowess_boost: i32,

    pub on_the_play: bool,
    pub mulligans: u32,

    /// Random number generator for shuffles (serializable for deterministic replay)
    pub rng: ChaCha12Rng,

    /// Centralized logger for game events
    #[serde(skip)]
    pub logger: GameLogger,
}

impl GameState {
    /// Create a game with the given library, in order (top first)
    pub fn new(library: impl IntoIterator<Item = CardName>, starting_life: i32) -> Self {
        GameState {
            library: CardZone::from_cards(library),
            hand: CardZone::new(),
            board: CardZone::new(),
            exile: CardZone::new(),
            graveyard: CardZone::new(),
            tapped: CardCounts::new(),
            summoning_sick: CardCounts::new(),
            pool: ManaPool::new(),
            counters: Vec::new(),
            turn: TurnStructure::new(),
            opponent_life: starting_life,
            opponent_poison: 0,
            landed: false,
            damage_dealt_this_turn: 0,
            prowess_boost: 0,
            on_the_play: true,
            mulligans: 0,
            rng: ChaCha12Rng::seed_from_u64(0),
            logger: GameLogger::new(),
        }
    }

    /// Set the RNG seed for deterministic shuffles
    pub fn seed_rng(&mut self, seed: u64) {
        self.rng = ChaCha12Rng::seed_from_u64(seed);
    }

    pub fn zone(&self, zone: Zone) -> &CardZone {
        match zone {
            Zone::Hand => &self.hand,
            Zone::LibraryTop | Zone::LibraryBottom => &self.library,
            Zone::Board => &self.board,
            Zone::Exile => &self.exile,
            Zone::Graveyard => &self.graveyard,
        }
    }

    pub fn zone_mut(&mut self, zone: Zone) -> &mut CardZone {
        match zone {
            Zone::Hand => &mut self.hand,
            Zone::LibraryTop | Zone::LibraryBottom => &mut self.library,
            Zone::Board => &mut self.board,
            Zone::Exile => &mut self.exile,
            Zone::Graveyard => &mut self.graveyard,
        }
    }

    pub fn is_opponent_dead(&self) -> bool {
        self.opponent_life <= 0 || self.opponent_poison >= LETHAL_POISON
    }

    /// Distinct card names on the board, in board order
    pub fn board_names(&self) -> SmallVec<[CardName; 8]> {
        let mut names: SmallVec<[CardName; 8]> = SmallVec::new();
        for card in self.board.iter() {
            if !names.contains(card) {
                names.push(card.clone());
            }
        }
        names
    }

    pub fn untapped_count(&self, card: &CardName) -> u32 {
        (self.board.count(card.as_str()) as u32).saturating_sub(self.tapped.count(card))
    }

    /// Untapped copies that did not enter this turn
    pub fn ready_count(&self, card: &CardName) -> u32 {
        self.untapped_count(card)
            .saturating_sub(self.summoning_sick.count(card))
    }

    pub fn spells_in_graveyard(&self) -> u8 {
        self.graveyard
            .iter()
            .filter_map(|c| catalog::lookup(c.as_str()))
            .filter(|r| r.kind.is_instant_or_sorcery())
            .count() as u8
    }

    /// Creatures that would attack right now, one entry per copy
    pub fn ready_attackers(&self) -> Vec<CardName> {
        let spells = self.spells_in_graveyard();
        let mut attackers = Vec::new();
        for card in self.board_names() {
            let Some(rule) = catalog::lookup(card.as_str()) else {
                continue;
            };
            if !rule.kind.is_creature() || rule.attack_power(spells) == 0 {
                continue;
            }
            let copies = if rule.has_haste(spells) {
                self.untapped_count(&card)
            } else {
                self.ready_count(&card)
            };
            for _ in 0..copies {
                attackers.push(card.clone());
            }
        }
        attackers
    }

    /// Ready permanents that tap to ping at the end of the turn, one per copy
    pub fn ready_pingers(&self) -> Vec<CardName> {
        let mut pingers = Vec::new();
        for card in self.board_names() {
            let taps_to_ping = catalog::lookup(card.as_str())
                .is_some_and(|r| matches!(r.trigger, Trigger::Ping { tap: true, .. }));
            if taps_to_ping {
                for _ in 0..self.ready_count(&card) {
                    pingers.push(card.clone());
                }
            }
        }
        pingers
    }

    /// Untapped lands that can tap for mana, one entry per copy
    pub fn untapped_mana_lands(&self) -> Vec<CardName> {
        let mut lands = Vec::new();
        for card in self.board_names() {
            if catalog::lookup(card.as_str()).is_some_and(|r| r.taps_for_mana) {
                for _ in 0..self.untapped_count(&card) {
                    lands.push(card.clone());
                }
            }
        }
        lands
    }

    /// Mountains on the board, tapped or not
    pub fn mountain_count(&self) -> usize {
        self.board
            .iter()
            .filter(|c| catalog::lookup(c.as_str()).is_some_and(|r| r.mountain))
            .count()
    }

    /// Lands among the given cards
    pub fn count_lands<'a>(cards: impl IntoIterator<Item = &'a CardName>) -> usize {
        cards
            .into_iter()
            .filter(|c| catalog::lookup(c.as_str()).is_some_and(|r| r.kind.is_land()))
            .count()
    }
}
