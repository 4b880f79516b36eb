//! Casting a card from its rule
//!
//! `choose_option` and `damage_and_cost` answer "can this be cast right now,
//! how, and for how much damage" from a `BoardSynergy` snapshot alone.
//! `resolve` then performs the cast against any `ZoneActions` backing. The
//! real executor and the lethal search both go through these functions.

use super::catalog;
use super::rule::{
    resolves_to, CardRule, CastMode, CastOption, Condition, Cost, Damage, Expiry,
};
use super::synergy::BoardSynergy;
use crate::core::{CardName, CounterKind, ManaPool};
use crate::game::{Counter, GameState, ZoneActions};
use crate::zones::Zone;
use crate::Result;

/// Damage a cast accounts for, split by where it comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamageEffect {
    /// Dealt by the card itself on resolution
    pub direct: i32,
    /// Board triggers: pings now, pumps at combat
    pub bonus: i32,
    /// Attack damage of a creature that can swing this turn
    pub combat: i32,
}

impl DamageEffect {
    pub fn total(&self) -> i32 {
        self.direct + self.bonus + self.combat
    }
}

/// A castable option and what it is worth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Play {
    pub option: &'static CastOption,
    pub effect: DamageEffect,
}

fn is_eligible(rule: &CardRule, option: &CastOption, synergy: &BoardSynergy) -> bool {
    let condition_met = match option.condition {
        Condition::Always => true,
        Condition::Spectacle | Condition::DamageDealt => synergy.damage_dealt > 0,
        Condition::Miracle => synergy.draw_step,
    };
    condition_met && (option.from != Zone::Graveyard || synergy.fuel(rule) > 0)
}

fn is_affordable(option: &CastOption, synergy: &BoardSynergy, available: &ManaPool) -> bool {
    match option.cost {
        Cost::Free => true,
        Cost::Mana(cost) => available.can_pay(&cost),
        Cost::SacrificeMountains(n) => synergy.mountains >= n,
    }
}

/// Can this option ever be paid with the given resources, ignoring conditions?
pub fn fits_resources(option: &CastOption, synergy: &BoardSynergy, available: &ManaPool) -> bool {
    is_affordable(option, synergy, available)
}

/// Is this exact option castable right now?
pub fn is_castable(
    rule: &CardRule,
    option: &CastOption,
    synergy: &BoardSynergy,
    available: &ManaPool,
) -> bool {
    !rule.is_absent()
        && is_eligible(rule, option, synergy)
        && is_affordable(option, synergy, available)
}

/// First eligible, affordable option for casting `rule` out of `from`
///
/// In rush mode (going for the kill) options that deal no damage this turn
/// are skipped.
pub fn choose_option(
    rule: &'static CardRule,
    from: Zone,
    synergy: &BoardSynergy,
    available: &ManaPool,
    rush: bool,
) -> Option<&'static CastOption> {
    rule.options
        .iter()
        .filter(|o| o.from == from)
        .filter(|o| !rush || o.mode.resolves_now())
        .find(|o| is_castable(rule, o, synergy, available))
}

/// Damage a cast with `option` would account for under `synergy`
pub fn damage_effect(
    rule: &CardRule,
    option: &CastOption,
    synergy: &BoardSynergy,
    rush: bool,
) -> DamageEffect {
    if !option.mode.resolves_now() {
        return DamageEffect::default();
    }

    let direct = match rule.damage {
        Damage::None => 0,
        Damage::Fixed(n) => n,
        Damage::Landfall { base, landed } => {
            if synergy.landed {
                landed
            } else {
                base
            }
        }
        Damage::OnSacrifice(n) => {
            if rush {
                n
            } else {
                0
            }
        }
    };

    // Threshold attackers are settled once the turn's graveyard is final
    let spells = synergy.spells_in_graveyard;
    let combat = if rule.kind.is_creature()
        && synergy.combat_pending
        && !rule.has_threshold()
        && rule.has_haste(spells)
    {
        rule.attack_power(spells)
    } else {
        0
    };

    DamageEffect {
        direct: direct as i32,
        bonus: synergy.bonus_for(rule.kind),
        combat: combat as i32,
    }
}

/// How `rule` would be cast from `from` right now, and what it would deal
pub fn damage_and_cost(
    rule: &'static CardRule,
    from: Zone,
    synergy: &BoardSynergy,
    available: &ManaPool,
    rush: bool,
) -> Option<Play> {
    let option = choose_option(rule, from, synergy, available, rush)?;
    Some(Play {
        option,
        effect: damage_effect(rule, option, synergy, rush),
    })
}

/// Cast `rule` with `option` and resolve it
///
/// Steps, in order: pay, board triggers, zone move, resolution damage,
/// counters, hasty attack, draws. Returns the damage the cast accounts for,
/// including combat damage it adds later this turn. A threshold attacker's
/// combat is left for the search to settle.
pub fn resolve<A: ZoneActions + ?Sized>(
    actions: &mut A,
    rule: &'static CardRule,
    option: &CastOption,
    rush: bool,
) -> Result<i32> {
    let synergy = actions.synergy();
    let effect = damage_effect(rule, option, &synergy, rush);

    match option.cost {
        Cost::Free => {}
        Cost::Mana(cost) => {
            actions.produce(&cost)?;
            actions.pay(&cost)?;
        }
        Cost::SacrificeMountains(n) => {
            for _ in 0..n {
                actions.sacrifice_mountain()?;
            }
        }
    }

    if option.mode.resolves_now() {
        let pings = synergy.pings_for(rule.kind);
        if pings > 0 {
            actions.damage_opponent(pings, "spell triggers");
        }
        let pumps = synergy.pumps_for(rule.kind);
        if pumps > 0 {
            actions.pump_attackers(pumps);
        }
    }

    actions.move_card(rule, option.from, option.to)?;

    if effect.direct > 0 {
        if let Damage::OnSacrifice(_) = rule.damage {
            actions.sacrifice(rule)?;
        }
        actions.damage_opponent(effect.direct, rule.name);
    }

    if option.counters > 0 {
        actions.add_counter(CounterKind::Time, rule, option.to, option.counters)?;
    }

    if effect.combat > 0 {
        actions.expect_attack(effect.combat);
    }

    if rule.draws > 0 && option.mode.resolves_now() {
        actions.draw(rule.draws)?;
    }

    Ok(effect.total())
}

/// Cast a card on the real game with its best available option
///
/// Returns the mode it was cast with, or `None` when no option is castable.
pub fn cast_card(
    game: &mut GameState,
    card: &CardName,
    from: Zone,
    rush: bool,
) -> Result<Option<CastMode>> {
    let rule = catalog::rule_for(card)?;
    let synergy = BoardSynergy::from_state(game);
    let available = synergy.available_mana(&game.pool);
    let Some(play) = damage_and_cost(rule, from, &synergy, &available, rush) else {
        return Ok(None);
    };

    let mode = play.option.mode;
    resolve(game, rule, play.option, rush)?;
    let damage = play.effect.total();
    if damage > 0 {
        game.logger.normal(&format!("{mode} {card} for {damage} damage"));
    } else {
        game.logger.normal(&format!("{mode} {card}"));
    }
    Ok(Some(mode))
}

/// Fire the effect of a counter that just ran out
pub fn expire_counter(game: &mut GameState, counter: &Counter) -> Result<()> {
    let rule = catalog::rule_for(&counter.card)?;
    match rule.expiry {
        Expiry::None => {}
        Expiry::SacrificeFor(damage) => {
            if counter.zone == Zone::Board && game.board.contains(&counter.card) {
                game.sacrifice(&counter.card)?;
                game.damage_opponent(damage as i32, rule.name);
                game.logger
                    .normal(&format!("{} leaves, dealing {damage}", counter.card));
            }
        }
        Expiry::CastFromExile => {
            let option = CastOption {
                mode: CastMode::Normal,
                cost: Cost::Free,
                condition: Condition::Always,
                from: counter.zone,
                to: resolves_to(rule.kind),
                counters: 0,
            };
            let damage = resolve(game, rule, &option, false)?;
            game.logger.normal(&format!(
                "{} comes off suspend for {damage} damage",
                counter.card
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::catalog::*;

    fn rule(name: &str) -> &'static CardRule {
        lookup(name).unwrap()
    }

    fn name(s: &str) -> CardName {
        CardName::new(s)
    }

    #[test]
    fn test_cheapest_eligible_option_wins() {
        let skewer = rule(SKEWER_THE_CRITICS);
        let mut synergy = BoardSynergy::default();
        let pool = ManaPool::red(3);

        let play = damage_and_cost(skewer, Zone::Hand, &synergy, &pool, true).unwrap();
        assert_eq!(play.option.mode, CastMode::Normal);

        synergy.damage_dealt = 1;
        let play = damage_and_cost(skewer, Zone::Hand, &synergy, &pool, true).unwrap();
        assert_eq!(play.option.mode, CastMode::Spectacle);
        assert_eq!(play.effect.direct, 3);
    }

    #[test]
    fn test_rush_skips_suspend() {
        let rift = rule(RIFT_BOLT);
        let synergy = BoardSynergy::default();

        let slow = choose_option(rift, Zone::Hand, &synergy, &ManaPool::red(3), false).unwrap();
        assert_eq!(slow.mode, CastMode::Suspend);

        let rush = choose_option(rift, Zone::Hand, &synergy, &ManaPool::red(3), true).unwrap();
        assert_eq!(rush.mode, CastMode::Normal);
        assert!(choose_option(rift, Zone::Hand, &synergy, &ManaPool::red(1), true).is_none());
    }

    #[test]
    fn test_flashback_needs_fuel_and_mountain() {
        let dart = rule(LAVA_DART);
        let mut synergy = BoardSynergy {
            mountains: 1,
            ..BoardSynergy::default()
        };
        let empty = ManaPool::new();
        assert!(choose_option(dart, Zone::Graveyard, &synergy, &empty, true).is_none());

        synergy.add_fuel(dart);
        let option = choose_option(dart, Zone::Graveyard, &synergy, &empty, true).unwrap();
        assert_eq!(option.mode, CastMode::Flashback);

        synergy.mountains = 0;
        assert!(choose_option(dart, Zone::Graveyard, &synergy, &empty, true).is_none());
    }

    #[test]
    fn test_fireblast_alternate_cost() {
        let fireblast = rule(FIREBLAST);
        let synergy = BoardSynergy {
            mountains: 2,
            ..BoardSynergy::default()
        };
        let play = damage_and_cost(fireblast, Zone::Hand, &synergy, &ManaPool::new(), true).unwrap();
        assert_eq!(play.option.mode, CastMode::Alternate);
        assert_eq!(play.effect.total(), 4);
    }

    #[test]
    fn test_damage_effect_with_synergy() {
        let bolt = rule(LIGHTNING_BOLT);
        let synergy = BoardSynergy {
            spell_pings: 1,
            noncreature_pumps: 1,
            combat_pending: true,
            ..BoardSynergy::default()
        };
        let option = &bolt.options[0];
        let effect = damage_effect(bolt, option, &synergy, true);
        assert_eq!(
            effect,
            DamageEffect {
                direct: 3,
                bonus: 2,
                combat: 0
            }
        );

        let blaze = rule(SEARING_BLAZE);
        let landed = BoardSynergy {
            landed: true,
            ..BoardSynergy::default()
        };
        assert_eq!(damage_effect(blaze, &blaze.options[0], &landed, true).direct, 3);
    }

    #[test]
    fn test_hasty_creature_counts_combat() {
        let swiftspear = rule(MONASTERY_SWIFTSPEAR);
        let synergy = BoardSynergy {
            combat_pending: true,
            ..BoardSynergy::default()
        };
        let effect = damage_effect(swiftspear, &swiftspear.options[0], &synergy, true);
        assert_eq!(effect.combat, 1);

        let after = BoardSynergy::default();
        assert_eq!(
            damage_effect(swiftspear, &swiftspear.options[0], &after, true).total(),
            0
        );
    }

    #[test]
    fn test_threshold_creature_defers_combat() {
        let ghitu = rule(GHITU_LAVARUNNER);
        let synergy = BoardSynergy {
            combat_pending: true,
            spells_in_graveyard: 2,
            ..BoardSynergy::default()
        };
        // A later flashback can still shrink the graveyard before combat
        assert_eq!(damage_effect(ghitu, &ghitu.options[0], &synergy, true).combat, 0);
    }

    #[test]
    fn test_needle_drop_needs_damage() {
        let needle = rule(NEEDLE_DROP);
        let pool = ManaPool::red(1);
        assert!(choose_option(needle, Zone::Hand, &BoardSynergy::default(), &pool, true).is_none());

        let damaged = BoardSynergy {
            damage_dealt: 2,
            ..BoardSynergy::default()
        };
        assert!(choose_option(needle, Zone::Hand, &damaged, &pool, true).is_some());
    }

    #[test]
    fn test_absent_card_never_castable() {
        let stage = rule(LIGHT_UP_THE_STAGE);
        assert!(choose_option(stage, Zone::Hand, &BoardSynergy::default(), &ManaPool::red(5), false)
            .is_none());
    }

    #[test]
    fn test_cast_card_on_real_game() {
        let mut game = GameState::new(Vec::new(), 20);
        game.board.add(name(MOUNTAIN));
        game.hand.add(name(LIGHTNING_BOLT));

        let mode = cast_card(&mut game, &name(LIGHTNING_BOLT), Zone::Hand, true).unwrap();
        assert_eq!(mode, Some(CastMode::Normal));
        assert_eq!(game.opponent_life, 17);
        assert_eq!(game.graveyard.count(LIGHTNING_BOLT), 1);
        assert_eq!(game.tapped.count(&name(MOUNTAIN)), 1);
    }

    #[test]
    fn test_cast_card_reports_uncastable() {
        let mut game = GameState::new(Vec::new(), 20);
        game.hand.add(name(LIGHTNING_BOLT));
        assert_eq!(
            cast_card(&mut game, &name(LIGHTNING_BOLT), Zone::Hand, true).unwrap(),
            None
        );
        assert!(game.hand.contains(&name(LIGHTNING_BOLT)));
    }

    #[test]
    fn test_prowess_pump_banks_for_combat() {
        let mut game = GameState::new(Vec::new(), 20);
        game.turn.current_step = crate::game::Step::FirstMain;
        game.board.add(name(MOUNTAIN));
        game.board.add(name(MONASTERY_SWIFTSPEAR));
        game.hand.add(name(LAVA_SPIKE));

        cast_card(&mut game, &name(LAVA_SPIKE), Zone::Hand, true).unwrap();
        assert_eq!(game.opponent_life, 17);
        assert_eq!(game.prowess_boost, 1);
    }

    #[test]
    fn test_seal_sacrificed_in_rush_mode() {
        let mut game = GameState::new(Vec::new(), 20);
        game.board.add(name(MOUNTAIN));
        game.hand.add(name(SEAL_OF_FIRE));

        cast_card(&mut game, &name(SEAL_OF_FIRE), Zone::Hand, true).unwrap();
        assert_eq!(game.opponent_life, 18);
        assert!(game.board.count(SEAL_OF_FIRE) == 0);
        assert_eq!(game.graveyard.count(SEAL_OF_FIRE), 1);
    }

    #[test]
    fn test_suspended_rift_bolt_resolves_from_exile() {
        let mut game = GameState::new(Vec::new(), 20);
        game.board.add(name(MOUNTAIN));
        game.hand.add(name(RIFT_BOLT));

        let mode = cast_card(&mut game, &name(RIFT_BOLT), Zone::Hand, false).unwrap();
        assert_eq!(mode, Some(CastMode::Suspend));
        assert_eq!(game.exile.count(RIFT_BOLT), 1);
        assert_eq!(game.opponent_life, 20);

        for counter in game.tick_counters() {
            expire_counter(&mut game, &counter).unwrap();
        }
        assert_eq!(game.opponent_life, 17);
        assert_eq!(game.graveyard.count(RIFT_BOLT), 1);
        assert!(game.exile.is_empty());
    }

    #[test]
    fn test_keldon_vanishing() {
        let mut game = GameState::new(Vec::new(), 20);
        game.board.add(name(MOUNTAIN));
        game.board.add(name(MOUNTAIN));
        game.hand.add(name(KELDON_MARAUDERS));

        cast_card(&mut game, &name(KELDON_MARAUDERS), Zone::Hand, false).unwrap();
        assert_eq!(game.opponent_life, 19);

        for _ in 0..2 {
            for counter in game.tick_counters() {
                expire_counter(&mut game, &counter).unwrap();
            }
        }
        assert_eq!(game.opponent_life, 18);
        assert_eq!(game.board.count(KELDON_MARAUDERS), 0);
    }
}
