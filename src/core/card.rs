//! Card kinds

use serde::{Deserialize, Serialize};
use std::fmt;

/// Card types the catalog distinguishes
///
/// Only what the burn catalog needs: triggers care about "noncreature" and
/// "instant or sorcery", the land drop cares about lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Land,
    Creature,
    Instant,
    Sorcery,
    Enchantment,
}

impl CardKind {
    pub fn is_land(&self) -> bool {
        matches!(self, CardKind::Land)
    }

    pub fn is_creature(&self) -> bool {
        matches!(self, CardKind::Creature)
    }

    /// Noncreature spells trigger prowess and Firebrand Archer
    pub fn is_noncreature_spell(&self) -> bool {
        !matches!(self, CardKind::Land | CardKind::Creature)
    }

    pub fn is_instant_or_sorcery(&self) -> bool {
        matches!(self, CardKind::Instant | CardKind::Sorcery)
    }

    /// Does a card of this kind stay on the board once resolved?
    pub fn is_permanent(&self) -> bool {
        !self.is_instant_or_sorcery()
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CardKind::Land => "land",
            CardKind::Creature => "creature",
            CardKind::Instant => "instant",
            CardKind::Sorcery => "sorcery",
            CardKind::Enchantment => "enchantment",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spell_classes() {
        assert!(CardKind::Instant.is_noncreature_spell());
        assert!(CardKind::Enchantment.is_noncreature_spell());
        assert!(!CardKind::Creature.is_noncreature_spell());
        assert!(!CardKind::Land.is_noncreature_spell());

        assert!(CardKind::Sorcery.is_instant_or_sorcery());
        assert!(!CardKind::Enchantment.is_instant_or_sorcery());
        assert!(CardKind::Enchantment.is_permanent());
    }
}
