//! Board snapshot consumed by the damage model
//!
//! `BoardSynergy` is a value: the real executor builds a fresh one from the
//! game state before every cast, and each search branch owns a private copy
//! that it updates as hypothetical spells resolve.

use super::catalog;
use super::rule::{CardRule, Damage, SpellFilter, Trigger};
use crate::core::{CardKind, CardName, ManaPool};
use crate::game::GameState;
use smallvec::SmallVec;

/// Synergy-relevant board counts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardSynergy {
    /// Damage dealt whenever we cast a noncreature spell
    pub noncreature_pings: u8,
    /// Damage dealt whenever we cast an instant or sorcery
    pub spell_pings: u8,
    /// Attack boost per noncreature spell, from creatures that will attack
    pub noncreature_pumps: u8,
    /// Attack boost per instant or sorcery, from creatures that will attack
    pub spell_pumps: u8,
    /// Mountains on the board (sacrifice fuel)
    pub mountains: u8,
    /// Untapped lands that can still tap for R
    pub untapped_lands: u8,
    pub spells_in_graveyard: u8,
    /// Cards in the graveyard that can be cast with flashback
    pub flashback_fuel: SmallVec<[(&'static CardRule, u8); 2]>,
    /// Permanents holding damage until sacrificed, one entry per copy
    pub stored_damage: SmallVec<[&'static CardRule; 2]>,
    /// Attackers whose combat depends on the graveyard at combat, one entry
    /// per copy; the flag is set for copies that need haste to swing
    pub threshold_attackers: SmallVec<[(&'static CardRule, bool); 2]>,
    pub damage_dealt: i32,
    pub landed: bool,
    pub combat_pending: bool,
    pub draw_step: bool,
}

impl BoardSynergy {
    /// Snapshot the real game state
    pub fn from_state(game: &GameState) -> Self {
        let combat_pending = game.turn.current_step.is_before_combat();
        let mut synergy = BoardSynergy {
            damage_dealt: game.damage_dealt_this_turn,
            landed: game.landed,
            combat_pending,
            draw_step: game.turn.current_step == crate::game::Step::Draw,
            ..BoardSynergy::default()
        };

        for card in game.graveyard.iter() {
            if let Some(rule) = catalog::lookup(card.as_str()) {
                if rule.kind.is_instant_or_sorcery() {
                    synergy.spells_in_graveyard += 1;
                }
                if rule.has_flashback() {
                    synergy.add_fuel(rule);
                }
            }
        }

        let mut seen: SmallVec<[&CardName; 16]> = SmallVec::new();
        for card in game.board.iter() {
            if seen.contains(&card) {
                continue;
            }
            seen.push(card);
            let Some(rule) = catalog::lookup(card.as_str()) else {
                continue;
            };

            let copies = game.board.count(rule.name) as u8;
            let tapped = game.tapped.count(card) as u8;
            let sick = game.summoning_sick.count(card) as u8;
            let untapped = copies.saturating_sub(tapped);
            let ready = untapped.saturating_sub(sick);
            let attackers = if rule.has_haste(synergy.spells_in_graveyard) {
                untapped
            } else {
                ready
            };

            if rule.mountain {
                synergy.mountains += copies;
            }
            if rule.taps_for_mana {
                synergy.untapped_lands += untapped;
            }
            if let Damage::OnSacrifice(_) = rule.damage {
                for _ in 0..copies {
                    synergy.stored_damage.push(rule);
                }
            }
            if combat_pending && rule.kind.is_creature() && rule.has_threshold() {
                for _ in 0..ready {
                    synergy.threshold_attackers.push((rule, false));
                }
                for _ in ready..untapped {
                    synergy.threshold_attackers.push((rule, true));
                }
            }
            match rule.trigger {
                Trigger::Ping { on, damage, tap } => {
                    let sources = if tap { ready } else { copies };
                    synergy.add_ping(on, damage * sources);
                }
                Trigger::Pump { on, amount } if combat_pending && rule.power > 0 => {
                    synergy.add_pump(on, amount * attackers);
                }
                _ => {}
            }
        }

        synergy
    }

    /// Mana that can be spent this turn: the pool plus one R per untapped land
    pub fn available_mana(&self, pool: &ManaPool) -> ManaPool {
        pool.plus(&ManaPool::red(self.untapped_lands))
    }

    pub fn add_ping(&mut self, on: SpellFilter, damage: u8) {
        match on {
            SpellFilter::Noncreature => self.noncreature_pings += damage,
            SpellFilter::InstantOrSorcery => self.spell_pings += damage,
        }
    }

    pub fn add_pump(&mut self, on: SpellFilter, amount: u8) {
        match on {
            SpellFilter::Noncreature => self.noncreature_pumps += amount,
            SpellFilter::InstantOrSorcery => self.spell_pumps += amount,
        }
    }

    /// Immediate trigger damage from casting a spell of this kind
    pub fn pings_for(&self, kind: CardKind) -> i32 {
        let mut damage = 0;
        if kind.is_noncreature_spell() {
            damage += self.noncreature_pings as i32;
        }
        if kind.is_instant_or_sorcery() {
            damage += self.spell_pings as i32;
        }
        damage
    }

    /// Extra combat damage from casting a spell of this kind before combat
    pub fn pumps_for(&self, kind: CardKind) -> i32 {
        if !self.combat_pending {
            return 0;
        }
        let mut boost = 0;
        if kind.is_noncreature_spell() {
            boost += self.noncreature_pumps as i32;
        }
        if kind.is_instant_or_sorcery() {
            boost += self.spell_pumps as i32;
        }
        boost
    }

    /// Total bonus damage a spell of this kind picks up from the board
    pub fn bonus_for(&self, kind: CardKind) -> i32 {
        self.pings_for(kind) + self.pumps_for(kind)
    }

    pub fn fuel(&self, rule: &CardRule) -> u8 {
        self.flashback_fuel
            .iter()
            .find(|(r, _)| r.name == rule.name)
            .map_or(0, |(_, n)| *n)
    }

    pub fn total_fuel(&self) -> u8 {
        self.flashback_fuel.iter().map(|(_, n)| n).sum()
    }

    pub fn add_fuel(&mut self, rule: &'static CardRule) {
        match self.flashback_fuel.iter_mut().find(|(r, _)| r.name == rule.name) {
            Some((_, n)) => *n += 1,
            None => self.flashback_fuel.push((rule, 1)),
        }
    }

    /// Returns false when there was no such fuel
    pub fn take_fuel(&mut self, rule: &CardRule) -> bool {
        match self.flashback_fuel.iter_mut().find(|(r, _)| r.name == rule.name) {
            Some((_, n)) if *n > 0 => {
                *n -= 1;
                true
            }
            _ => false,
        }
    }

    /// Combat damage of the threshold attackers against the current graveyard
    pub fn threshold_combat(&self) -> i32 {
        if !self.combat_pending {
            return 0;
        }
        let spells = self.spells_in_graveyard;
        self.threshold_attackers
            .iter()
            .filter(|(rule, needs_haste)| !needs_haste || rule.has_haste(spells))
            .map(|(rule, _)| rule.attack_power(spells) as i32)
            .sum()
    }

    /// Most the threshold attackers can deal, whatever the graveyard becomes
    pub fn threshold_bound(&self) -> i32 {
        self.threshold_attackers
            .iter()
            .map(|(rule, _)| rule.max_attack_power() as i32)
            .sum()
    }
}

/// Damage that will reach the opponent this turn without casting anything
///
/// Ready attackers (plus the prowess boost already banked) while combat is
/// still ahead, and one end-of-turn ping from each ready Thermo-Alchemist.
/// Threshold attackers are left out: what they deal depends on the spells
/// cast before combat, so the lethal search settles them per line.
pub fn forecast_damage(game: &GameState) -> i32 {
    let combat_pending = game.turn.current_step.is_before_combat();
    let spells = game
        .graveyard
        .iter()
        .filter_map(|c| catalog::lookup(c.as_str()))
        .filter(|r| r.kind.is_instant_or_sorcery())
        .count() as u8;

    let mut forecast = 0;
    if combat_pending {
        let mut attacking = false;
        for attacker in game.ready_attackers() {
            if let Some(rule) = catalog::lookup(attacker.as_str()) {
                if !rule.has_threshold() {
                    forecast += rule.attack_power(spells) as i32;
                }
                attacking = true;
            }
        }
        if attacking {
            forecast += game.prowess_boost;
        }
    }
    forecast + game.ready_pingers().len() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::catalog::*;

    #[test]
    fn test_bonus_by_spell_kind() {
        let synergy = BoardSynergy {
            noncreature_pings: 1,
            spell_pings: 2,
            noncreature_pumps: 1,
            spell_pumps: 3,
            combat_pending: true,
            ..BoardSynergy::default()
        };

        assert_eq!(synergy.bonus_for(CardKind::Instant), 7);
        assert_eq!(synergy.bonus_for(CardKind::Enchantment), 2);
        assert_eq!(synergy.bonus_for(CardKind::Creature), 0);

        let after_combat = BoardSynergy {
            combat_pending: false,
            ..synergy
        };
        assert_eq!(after_combat.bonus_for(CardKind::Instant), 3);
    }

    #[test]
    fn test_threshold_attackers_snapshot() {
        let ghitu = CardName::new(GHITU_LAVARUNNER);
        let mut game = GameState::new(Vec::new(), 20);
        game.turn.current_step = crate::game::Step::FirstMain;
        for _ in 0..3 {
            game.board.add(ghitu.clone());
        }
        game.tapped.insert(ghitu.clone());
        game.summoning_sick.insert(ghitu.clone());

        let synergy = BoardSynergy::from_state(&game);
        let rule = lookup(GHITU_LAVARUNNER).unwrap();
        assert_eq!(
            synergy.threshold_attackers.as_slice(),
            &[(rule, false), (rule, true)]
        );
        // Only the ready copy swings without haste
        assert_eq!(synergy.threshold_combat(), 1);
        assert_eq!(synergy.threshold_bound(), 4);

        let fed = BoardSynergy {
            spells_in_graveyard: 2,
            ..synergy
        };
        assert_eq!(fed.threshold_combat(), 4);
    }

    #[test]
    fn test_forecast_leaves_out_threshold_attackers() {
        let mut game = GameState::new(Vec::new(), 20);
        game.turn.current_step = crate::game::Step::FirstMain;
        game.board.add(CardName::new(GHITU_LAVARUNNER));
        game.board.add(CardName::new(FIREBRAND_ARCHER));
        game.board.add(CardName::new(THERMO_ALCHEMIST));

        assert_eq!(forecast_damage(&game), 3);

        game.turn.current_step = crate::game::Step::SecondMain;
        assert_eq!(forecast_damage(&game), 1);
        assert!(BoardSynergy::from_state(&game).threshold_attackers.is_empty());
    }

    #[test]
    fn test_fuel_bookkeeping() {
        let dart = lookup(LAVA_DART).unwrap();
        let mut synergy = BoardSynergy::default();
        assert!(!synergy.take_fuel(dart));

        synergy.add_fuel(dart);
        synergy.add_fuel(dart);
        assert_eq!(synergy.fuel(dart), 2);
        assert!(synergy.take_fuel(dart));
        assert_eq!(synergy.total_fuel(), 1);
    }
}
