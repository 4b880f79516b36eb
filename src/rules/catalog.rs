//! The burn card catalog
//!
//! Only the cards listed here are understood. Cards whose text is partly
//! modeled say which part is ignored; cards that cannot be modeled at all are
//! listed as absent so a deck containing them still loads.

use super::rule::{
    cast, CardRule, CastMode, CastOption, Condition, Cost, Damage, Expiry, Haste, SpellFilter,
    Support, Trigger,
};
use crate::core::{CardKind, CardName, ManaCost};
use crate::zones::Zone;
use crate::{GoldfishError, Result};

pub const MOUNTAIN: &str = "Mountain";
pub const FORGOTTEN_CAVE: &str = "Forgotten Cave";

pub const MONASTERY_SWIFTSPEAR: &str = "Monastery Swiftspear";
pub const THERMO_ALCHEMIST: &str = "Thermo-Alchemist";
pub const ELECTROSTATIC_FIELD: &str = "Electrostatic Field";
pub const FIREBRAND_ARCHER: &str = "Firebrand Archer";
pub const KELDON_MARAUDERS: &str = "Keldon Marauders";
pub const GHITU_LAVARUNNER: &str = "Ghitu Lavarunner";
pub const ORCISH_HELLRAISER: &str = "Orcish Hellraiser";
pub const VIASHINO_PYROMANCER: &str = "Viashino Pyromancer";
pub const KILN_FIEND: &str = "Kiln Fiend";

pub const LIGHTNING_BOLT: &str = "Lightning Bolt";
pub const CHAIN_LIGHTNING: &str = "Chain Lightning";
pub const LAVA_SPIKE: &str = "Lava Spike";
pub const RIFT_BOLT: &str = "Rift Bolt";
pub const FIREBLAST: &str = "Fireblast";
pub const SKEWER_THE_CRITICS: &str = "Skewer the Critics";
pub const LAVA_DART: &str = "Lava Dart";
pub const NEEDLE_DROP: &str = "Needle Drop";
pub const FORKED_BOLT: &str = "Forked Bolt";
pub const SEARING_BLAZE: &str = "Searing Blaze";
pub const MAGMA_JET: &str = "Magma Jet";
pub const VOLCANIC_FALLOUT: &str = "Volcanic Fallout";
pub const FLAME_RIFT: &str = "Flame Rift";
pub const SEAL_OF_FIRE: &str = "Seal of Fire";
pub const GITAXIAN_PROBE: &str = "Gitaxian Probe";
pub const CURSE_OF_THE_PIERCED_HEART: &str = "Curse of the Pierced Heart";
pub const THUNDEROUS_WRATH: &str = "Thunderous Wrath";
pub const LIGHT_UP_THE_STAGE: &str = "Light Up the Stage";

pub const LANDS: &[&str] = &[MOUNTAIN, FORGOTTEN_CAVE];

const R: ManaCost = ManaCost::red(0, 1);
const R1: ManaCost = ManaCost::red(1, 1);
const R2: ManaCost = ManaCost::red(2, 1);
const R3: ManaCost = ManaCost::red(3, 1);
const RR: ManaCost = ManaCost::red(0, 2);
const RR1: ManaCost = ManaCost::red(1, 2);
const RR4: ManaCost = ManaCost::red(4, 2);

const fn creature(name: &'static str, power: u8) -> CardRule {
    CardRule {
        name,
        kind: CardKind::Creature,
        power,
        ..CardRule::BASE
    }
}

const fn land(name: &'static str) -> CardRule {
    CardRule {
        name,
        kind: CardKind::Land,
        taps_for_mana: true,
        ..CardRule::BASE
    }
}

const fn burn(name: &'static str, kind: CardKind, damage: u8) -> CardRule {
    CardRule {
        name,
        kind,
        damage: Damage::Fixed(damage),
        lethal_candidate: true,
        ..CardRule::BASE
    }
}

static CATALOG: &[CardRule] = &[
    // LANDS
    CardRule {
        mountain: true,
        ..land(MOUNTAIN)
    },
    CardRule {
        enters_tapped: true,
        support: Support::Partial("cycling is not modeled"),
        ..land(FORGOTTEN_CAVE)
    },
    // CREATURES
    CardRule {
        options: &[cast(CardKind::Creature, R)],
        haste: Haste::Yes,
        trigger: Trigger::Pump {
            on: SpellFilter::Noncreature,
            amount: 1,
        },
        lethal_candidate: true,
        ..creature(MONASTERY_SWIFTSPEAR, 1)
    },
    CardRule {
        options: &[cast(CardKind::Creature, R1)],
        trigger: Trigger::Ping {
            on: SpellFilter::InstantOrSorcery,
            damage: 1,
            tap: true,
        },
        ..creature(THERMO_ALCHEMIST, 0)
    },
    CardRule {
        options: &[cast(CardKind::Creature, R1)],
        trigger: Trigger::Ping {
            on: SpellFilter::InstantOrSorcery,
            damage: 1,
            tap: false,
        },
        lethal_candidate: true,
        ..creature(ELECTROSTATIC_FIELD, 0)
    },
    CardRule {
        options: &[cast(CardKind::Creature, R1)],
        trigger: Trigger::Ping {
            on: SpellFilter::Noncreature,
            damage: 1,
            tap: false,
        },
        lethal_candidate: true,
        ..creature(FIREBRAND_ARCHER, 2)
    },
    CardRule {
        // Vanishing 2
        options: &[CastOption {
            counters: 2,
            ..cast(CardKind::Creature, R1)
        }],
        damage: Damage::Fixed(1),
        expiry: Expiry::SacrificeFor(1),
        lethal_candidate: true,
        ..creature(KELDON_MARAUDERS, 3)
    },
    CardRule {
        options: &[cast(CardKind::Creature, R)],
        haste: Haste::Threshold {
            spells: 2,
            power_bonus: 1,
        },
        lethal_candidate: true,
        ..creature(GHITU_LAVARUNNER, 1)
    },
    CardRule {
        // The echo reminder counter comes off at our next upkeep
        options: &[CastOption {
            counters: 1,
            ..cast(CardKind::Creature, R1)
        }],
        expiry: Expiry::SacrificeFor(2),
        support: Support::Partial("echo is never paid; it dies at the next upkeep"),
        ..creature(ORCISH_HELLRAISER, 3)
    },
    CardRule {
        options: &[cast(CardKind::Creature, R1)],
        damage: Damage::Fixed(2),
        lethal_candidate: true,
        ..creature(VIASHINO_PYROMANCER, 2)
    },
    CardRule {
        options: &[cast(CardKind::Creature, R3)],
        trigger: Trigger::Pump {
            on: SpellFilter::InstantOrSorcery,
            amount: 3,
        },
        ..creature(KILN_FIEND, 1)
    },
    // BURN
    CardRule {
        options: &[cast(CardKind::Instant, R)],
        ..burn(LIGHTNING_BOLT, CardKind::Instant, 3)
    },
    CardRule {
        options: &[cast(CardKind::Sorcery, R)],
        ..burn(CHAIN_LIGHTNING, CardKind::Sorcery, 3)
    },
    CardRule {
        options: &[cast(CardKind::Sorcery, R)],
        ..burn(LAVA_SPIKE, CardKind::Sorcery, 3)
    },
    CardRule {
        options: &[
            CastOption {
                mode: CastMode::Suspend,
                to: Zone::Exile,
                counters: 1,
                ..cast(CardKind::Sorcery, R)
            },
            cast(CardKind::Sorcery, R2),
        ],
        expiry: Expiry::CastFromExile,
        ..burn(RIFT_BOLT, CardKind::Sorcery, 3)
    },
    CardRule {
        options: &[
            CastOption {
                mode: CastMode::Alternate,
                cost: Cost::SacrificeMountains(2),
                ..cast(CardKind::Instant, ManaCost::ZERO)
            },
            cast(CardKind::Instant, RR4),
        ],
        ..burn(FIREBLAST, CardKind::Instant, 4)
    },
    CardRule {
        options: &[
            CastOption {
                mode: CastMode::Spectacle,
                condition: Condition::Spectacle,
                ..cast(CardKind::Sorcery, R)
            },
            cast(CardKind::Sorcery, R2),
        ],
        ..burn(SKEWER_THE_CRITICS, CardKind::Sorcery, 3)
    },
    CardRule {
        options: &[
            cast(CardKind::Instant, R),
            CastOption {
                mode: CastMode::Flashback,
                cost: Cost::SacrificeMountains(1),
                condition: Condition::Always,
                from: Zone::Graveyard,
                to: Zone::Exile,
                counters: 0,
            },
        ],
        ..burn(LAVA_DART, CardKind::Instant, 1)
    },
    CardRule {
        options: &[CastOption {
            condition: Condition::DamageDealt,
            ..cast(CardKind::Instant, R)
        }],
        draws: 1,
        ..burn(NEEDLE_DROP, CardKind::Instant, 1)
    },
    CardRule {
        options: &[cast(CardKind::Sorcery, R)],
        ..burn(FORKED_BOLT, CardKind::Sorcery, 2)
    },
    CardRule {
        options: &[cast(CardKind::Instant, RR)],
        damage: Damage::Landfall { base: 1, landed: 3 },
        ..burn(SEARING_BLAZE, CardKind::Instant, 1)
    },
    CardRule {
        options: &[cast(CardKind::Instant, R1)],
        support: Support::Partial("scry 2 is not modeled"),
        ..burn(MAGMA_JET, CardKind::Instant, 2)
    },
    CardRule {
        options: &[cast(CardKind::Instant, RR1)],
        ..burn(VOLCANIC_FALLOUT, CardKind::Instant, 2)
    },
    CardRule {
        options: &[cast(CardKind::Sorcery, R1)],
        ..burn(FLAME_RIFT, CardKind::Sorcery, 4)
    },
    CardRule {
        options: &[cast(CardKind::Enchantment, R)],
        damage: Damage::OnSacrifice(2),
        ..burn(SEAL_OF_FIRE, CardKind::Enchantment, 2)
    },
    CardRule {
        // Phyrexian mana, paid with life
        name: GITAXIAN_PROBE,
        kind: CardKind::Sorcery,
        options: &[CastOption {
            cost: Cost::Free,
            ..cast(CardKind::Sorcery, ManaCost::ZERO)
        }],
        draws: 1,
        lethal_candidate: true,
        ..CardRule::BASE
    },
    CardRule {
        name: CURSE_OF_THE_PIERCED_HEART,
        kind: CardKind::Enchantment,
        options: &[cast(CardKind::Enchantment, R1)],
        upkeep_damage: 1,
        ..CardRule::BASE
    },
    CardRule {
        options: &[CastOption {
            mode: CastMode::Miracle,
            condition: Condition::Miracle,
            ..cast(CardKind::Instant, R)
        }],
        lethal_candidate: false,
        support: Support::Partial("only castable for its miracle cost in the draw step"),
        ..burn(THUNDEROUS_WRATH, CardKind::Instant, 5)
    },
    CardRule {
        name: LIGHT_UP_THE_STAGE,
        kind: CardKind::Sorcery,
        support: Support::Absent("playing the exiled cards is not modeled"),
        ..CardRule::BASE
    },
];

/// All known cards
pub fn all() -> &'static [CardRule] {
    CATALOG
}

/// Look a card up by name, ignoring case
pub fn lookup(name: &str) -> Option<&'static CardRule> {
    CATALOG.iter().find(|rule| rule.name.eq_ignore_ascii_case(name))
}

/// Rule for a card in play; unknown names are an error
pub fn rule_for(card: &CardName) -> Result<&'static CardRule> {
    lookup(card.as_str()).ok_or_else(|| GoldfishError::UnknownCard(card.to_string()))
}

/// Canonical spelling of a card name
pub fn canonical(name: &str) -> Option<CardName> {
    lookup(name).map(|rule| CardName::new(rule.name))
}
