//! Declarative per-card rule records
//!
//! A `CardRule` says everything the simulator knows about a card: how it can
//! be cast, where it goes, what it deals, and what it grants to other spells
//! while it sits on the board. The same record drives the real turn executor
//! and the lethal search's shadow simulation.

use crate::core::{CardKind, ManaCost};
use crate::zones::Zone;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a card is being cast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CastMode {
    /// Regular mana cost from hand
    Normal,
    /// Cheaper cost once the opponent took damage this turn
    Spectacle,
    /// Exiled with time counters, resolves when the last one is removed
    Suspend,
    /// One-time recast from the graveyard; the card is exiled afterwards
    Flashback,
    /// Non-mana alternative cost (e.g. sacrificing lands)
    Alternate,
    /// Cost available only when the card is the first one drawn this turn
    Miracle,
}

impl CastMode {
    /// Does a cast in this mode deal its damage this turn?
    pub fn resolves_now(&self) -> bool {
        !matches!(self, CastMode::Suspend)
    }
}

impl fmt::Display for CastMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CastMode::Normal => "cast",
            CastMode::Spectacle => "spectacle",
            CastMode::Suspend => "suspend",
            CastMode::Flashback => "flashback",
            CastMode::Alternate => "alternate cost",
            CastMode::Miracle => "miracle",
        };
        write!(f, "{name}")
    }
}

/// What must be given up to cast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cost {
    Free,
    Mana(ManaCost),
    /// Sacrifice this many Mountains
    SacrificeMountains(u8),
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Free => write!(f, "free"),
            Cost::Mana(cost) => write!(f, "{cost}"),
            Cost::SacrificeMountains(n) => write!(f, "sacrifice {n} mountain(s)"),
        }
    }
}

/// Extra requirement on top of the cost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Always,
    /// Opponent was dealt damage this turn (spectacle)
    Spectacle,
    /// Opponent was dealt damage this turn (targeting restriction)
    DamageDealt,
    /// We are in the draw step and the card was just drawn
    Miracle,
}

/// One way of casting a card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastOption {
    pub mode: CastMode,
    pub cost: Cost,
    pub condition: Condition,
    pub from: Zone,
    pub to: Zone,
    /// Time counters put on the card in its destination zone
    pub counters: u8,
}

/// Damage dealt to the opponent when the card resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Damage {
    None,
    Fixed(u8),
    /// `landed` instead of `base` when a land entered this turn
    Landfall { base: u8, landed: u8 },
    /// Stored on a permanent until it is sacrificed
    OnSacrifice(u8),
}

impl Damage {
    /// Highest damage this can ever deal
    pub fn max(&self) -> u8 {
        match *self {
            Damage::None => 0,
            Damage::Fixed(n) | Damage::OnSacrifice(n) => n,
            Damage::Landfall { base, landed } => base.max(landed),
        }
    }
}

/// Which spells fire a board trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpellFilter {
    Noncreature,
    InstantOrSorcery,
}

impl SpellFilter {
    pub fn matches(&self, kind: CardKind) -> bool {
        match self {
            SpellFilter::Noncreature => kind.is_noncreature_spell(),
            SpellFilter::InstantOrSorcery => kind.is_instant_or_sorcery(),
        }
    }
}

/// What a permanent does whenever we cast a matching spell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    None,
    /// Deals damage straight away. `tap` pings need an untapped, non-sick source.
    Ping { on: SpellFilter, damage: u8, tap: bool },
    /// Power boost until end of turn, only worth anything if the creature attacks
    Pump { on: SpellFilter, amount: u8 },
}

/// Whether a creature can attack the turn it enters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Haste {
    No,
    Yes,
    /// Haste and `power_bonus` extra power with enough instants and sorceries
    /// in the graveyard
    Threshold { spells: u8, power_bonus: u8 },
}

/// What happens when the last time counter comes off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    None,
    /// Sacrificed, dealing damage on its way out
    SacrificeFor(u8),
    /// Cast from exile without paying its cost
    CastFromExile,
}

/// How much of a card's behavior is modeled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Support {
    Full,
    /// Playable, with the named part of its text ignored
    Partial(&'static str),
    /// Never castable; the card is dead weight in hand
    Absent(&'static str),
}

/// Everything the simulator knows about one card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardRule {
    pub name: &'static str,
    pub kind: CardKind,
    /// Cast options in order of preference (cheapest first)
    pub options: &'static [CastOption],
    pub damage: Damage,
    pub power: u8,
    pub haste: Haste,
    pub trigger: Trigger,
    /// Damage dealt during each of our upkeeps while on the board
    pub upkeep_damage: u8,
    pub expiry: Expiry,
    pub draws: u8,
    /// Can this card contribute to a kill this turn?
    pub lethal_candidate: bool,
    pub enters_tapped: bool,
    pub taps_for_mana: bool,
    /// Counts as a Mountain for sacrifice costs
    pub mountain: bool,
    pub support: Support,
}

impl CardRule {
    pub const BASE: CardRule = CardRule {
        name: "",
        kind: CardKind::Sorcery,
        options: &[],
        damage: Damage::None,
        power: 0,
        haste: Haste::No,
        trigger: Trigger::None,
        upkeep_damage: 0,
        expiry: Expiry::None,
        draws: 0,
        lethal_candidate: false,
        enters_tapped: false,
        taps_for_mana: false,
        mountain: false,
        support: Support::Full,
    };

    pub fn is_absent(&self) -> bool {
        matches!(self.support, Support::Absent(_))
    }

    pub fn has_flashback(&self) -> bool {
        self.options.iter().any(|o| o.mode == CastMode::Flashback)
    }

    pub fn option(&self, mode: CastMode) -> Option<&'static CastOption> {
        self.options.iter().find(|o| o.mode == mode)
    }

    /// Can this creature attack on the turn it enters?
    pub fn has_haste(&self, spells_in_graveyard: u8) -> bool {
        match self.haste {
            Haste::No => false,
            Haste::Yes => true,
            Haste::Threshold { spells, .. } => spells_in_graveyard >= spells,
        }
    }

    /// Combat damage this creature deals when attacking unblocked
    pub fn attack_power(&self, spells_in_graveyard: u8) -> u8 {
        match self.haste {
            Haste::Threshold {
                spells,
                power_bonus,
            } if spells_in_graveyard >= spells => self.power + power_bonus,
            _ => self.power,
        }
    }

    /// Does this creature's haste or power depend on the graveyard?
    pub fn has_threshold(&self) -> bool {
        matches!(self.haste, Haste::Threshold { .. })
    }

    /// Highest combat damage regardless of graveyard size
    pub fn max_attack_power(&self) -> u8 {
        match self.haste {
            Haste::Threshold { power_bonus, .. } => self.power + power_bonus,
            _ => self.power,
        }
    }
}

/// Regular cast from hand, resolving into the card's natural zone
pub const fn cast(kind: CardKind, cost: ManaCost) -> CastOption {
    CastOption {
        mode: CastMode::Normal,
        cost: Cost::Mana(cost),
        condition: Condition::Always,
        from: Zone::Hand,
        to: resolves_to(kind),
        counters: 0,
    }
}

/// Where a card of this kind goes once it resolves
pub const fn resolves_to(kind: CardKind) -> Zone {
    match kind {
        CardKind::Instant | CardKind::Sorcery => Zone::Graveyard,
        _ => Zone::Board,
    }
}
