//! Burn deck pilot
//!
//! Keeps two to four lands, plays Gitaxian Probes and a land first, then asks
//! the lethal search for a kill. Without one it develops the board from a
//! fixed priority list and saves Fireblast and Lava Dart for the kill.

use super::DeckPilot;
use crate::core::CardName;
use crate::game::GameState;
use crate::rules::catalog::*;
use crate::rules::{cast_card, forecast_damage, BoardSynergy};
use crate::search::{commit, evaluate_lethal};
use crate::zones::{CardZone, Zone};
use crate::Result;

/// Creatures, least wanted first
const CREATURES: &[&str] = &[
    ORCISH_HELLRAISER,
    KELDON_MARAUDERS,
    VIASHINO_PYROMANCER,
    THERMO_ALCHEMIST,
    ELECTROSTATIC_FIELD,
    FIREBRAND_ARCHER,
    GHITU_LAVARUNNER,
    MONASTERY_SWIFTSPEAR,
];

/// Lands, least wanted first
const LANDS_TO_CUT: &[&str] = &[FORGOTTEN_CAVE, MOUNTAIN];

/// Spells that are the first to go
const WEAK_SPELLS: &[&str] = &[
    SEARING_BLAZE,
    MAGMA_JET,
    VOLCANIC_FALLOUT,
    FLAME_RIFT,
    CURSE_OF_THE_PIERCED_HEART,
    GITAXIAN_PROBE,
    LIGHT_UP_THE_STAGE,
];

#[derive(Debug, Clone, Default)]
pub struct BurnPilot;

impl BurnPilot {
    pub fn new() -> Self {
        BurnPilot
    }

    /// Pick the least useful card in hand
    ///
    /// Extra lands go first, then extra creatures, then weak spells, then
    /// the first card.
    fn least_useful(hand: &CardZone, flooded: bool) -> Option<CardName> {
        if flooded {
            if let Some(card) = hand.find_first_of(LANDS_TO_CUT) {
                return Some(card);
            }
        }
        if hand.count_any(CREATURES) > 2 {
            if let Some(card) = hand.find_first_of(CREATURES) {
                return Some(card);
            }
        }
        hand.find_first_of(WEAK_SPELLS)
            .or_else(|| hand.first().cloned())
    }

    /// Play the first card of the priority list that can be played
    fn play_best_card(&self, game: &mut GameState) -> Result<bool> {
        let ghitu_has_haste = game.spells_in_graveyard() >= 2;
        let landed = game.landed;
        let damage_dealt = game.damage_dealt_this_turn > 0;

        let priorities = [
            Some(MOUNTAIN),
            Some(MONASTERY_SWIFTSPEAR),
            Some(GITAXIAN_PROBE),
            Some(NEEDLE_DROP),
            Some(FORGOTTEN_CAVE),
            Some(KILN_FIEND),
            Some(FIREBRAND_ARCHER),
            Some(THERMO_ALCHEMIST),
            Some(ELECTROSTATIC_FIELD),
            Some(KELDON_MARAUDERS),
            Some(VIASHINO_PYROMANCER),
            Some(ORCISH_HELLRAISER),
            Some(CURSE_OF_THE_PIERCED_HEART),
            ghitu_has_haste.then_some(GHITU_LAVARUNNER),
            Some(FLAME_RIFT),
            landed.then_some(SEARING_BLAZE),
            damage_dealt.then_some(SKEWER_THE_CRITICS),
            Some(RIFT_BOLT),
            Some(CHAIN_LIGHTNING),
            Some(LAVA_SPIKE),
            Some(LIGHTNING_BOLT),
            Some(FORKED_BOLT),
            Some(SEAL_OF_FIRE),
            Some(MAGMA_JET),
            Some(VOLCANIC_FALLOUT),
            Some(GHITU_LAVARUNNER),
            Some(SKEWER_THE_CRITICS),
        ];

        for name in priorities.into_iter().flatten() {
            let Some(card) = game.hand.find_first_of(&[name]) else {
                continue;
            };
            if LANDS.contains(&name) {
                if !game.landed {
                    game.land(&card)?;
                    return Ok(true);
                }
                continue;
            }
            if cast_card(game, &card, Zone::Hand, false)?.is_some() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn develop(&self, game: &mut GameState) -> Result<()> {
        while !game.is_opponent_dead() && self.play_best_card(game)? {}
        Ok(())
    }

    /// Commit a lethal line if one exists; returns whether one was played
    fn try_lethal(&self, game: &mut GameState) -> Result<bool> {
        let forecast = forecast_damage(game);
        if game.opponent_life <= forecast {
            return Ok(false);
        }

        let synergy = BoardSynergy::from_state(game);
        let available = synergy.available_mana(&game.pool);
        let hand: Vec<CardName> = game.hand.iter().cloned().collect();
        let Some(plan) = evaluate_lethal(&hand, &synergy, &available, forecast, game.opponent_life)
        else {
            return Ok(false);
        };

        game.logger
            .pilot_choice(self.name(), &format!("lethal with {forecast} forecast: {plan}"));
        commit(game, &plan)?;
        Ok(true)
    }
}

impl DeckPilot for BurnPilot {
    fn name(&self) -> &str {
        "burn"
    }

    fn keep_hand(&mut self, game: &GameState) -> bool {
        let lands = GameState::count_lands(game.hand.iter());
        match game.mulligans {
            0 if game.on_the_play => (2..=4).contains(&lands),
            0 | 1 => (1..=4).contains(&lands),
            _ => true,
        }
    }

    fn choose_bottom(&mut self, game: &GameState) -> Option<CardName> {
        let lands = GameState::count_lands(game.hand.iter());
        Self::least_useful(&game.hand, lands > 2)
    }

    fn choose_discard(&mut self, game: &GameState) -> Option<CardName> {
        // Three lands is all the deck needs
        let lands = GameState::count_lands(game.hand.iter().chain(game.board.iter()));
        Self::least_useful(&game.hand, lands > 3)
    }

    fn first_main(&mut self, game: &mut GameState) -> Result<()> {
        while let Some(probe) = game.hand.find_first_of(&[GITAXIAN_PROBE]) {
            if cast_card(game, &probe, Zone::Hand, false)?.is_none() {
                break;
            }
        }

        if !game.landed {
            if let Some(land) = game.hand.find_first_of(LANDS) {
                game.land(&land)?;
            }
        }

        if self.try_lethal(game)? {
            return Ok(());
        }
        self.develop(game)
    }

    fn second_main(&mut self, game: &mut GameState) -> Result<()> {
        if self.try_lethal(game)? {
            return Ok(());
        }
        self.develop(game)
    }
}
