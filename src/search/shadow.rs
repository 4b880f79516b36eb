//! Per-branch shadow of the game state
//!
//! A `ShadowState` carries only what the card rules read: a private mana
//! pool and a private `BoardSynergy`. It implements `ZoneActions`, so a
//! hypothetical cast runs through the same `resolve` as a real one.

use crate::core::{CounterKind, ManaCost, ManaPool};
use crate::game::ZoneActions;
use crate::rules::{BoardSynergy, CardRule, Damage, Trigger};
use crate::zones::Zone;
use crate::{GoldfishError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowState {
    /// Everything still spendable this turn, untapped lands included
    pub pool: ManaPool,
    pub synergy: BoardSynergy,
    /// Damage accounted for so far, combat damage to come included
    pub damage: i32,
}

impl ShadowState {
    /// Seed a shadow from a synergy snapshot and the mana available to it
    ///
    /// `available` already counts the untapped lands, so they are zeroed in
    /// the private synergy.
    pub fn new(synergy: &BoardSynergy, available: &ManaPool) -> Self {
        let mut synergy = synergy.clone();
        synergy.untapped_lands = 0;
        ShadowState {
            pool: *available,
            synergy,
            damage: 0,
        }
    }

    fn enter_board(&mut self, card: &'static CardRule) {
        let synergy = &mut self.synergy;
        match card.trigger {
            // Tap pingers are summoning sick this turn
            Trigger::Ping { on, damage, tap } if !tap => synergy.add_ping(on, damage),
            Trigger::Pump { on, amount }
                if synergy.combat_pending
                    && card.power > 0
                    && card.has_haste(synergy.spells_in_graveyard) =>
            {
                synergy.add_pump(on, amount)
            }
            _ => {}
        }
        if let Damage::OnSacrifice(_) = card.damage {
            synergy.stored_damage.push(card);
        }
        if card.mountain {
            synergy.mountains += 1;
        }
        if synergy.combat_pending && card.kind.is_creature() && card.has_threshold() {
            synergy.threshold_attackers.push((card, true));
        }
    }

    /// Count the threshold attackers' combat against the final graveyard
    ///
    /// Call once the branch has cast everything it will cast; a second call
    /// adds nothing.
    pub fn settle_combat(&mut self) {
        self.damage += self.synergy.threshold_combat();
        self.synergy.threshold_attackers.clear();
    }
}

impl ZoneActions for ShadowState {
    fn synergy(&self) -> BoardSynergy {
        self.synergy.clone()
    }

    fn move_card(&mut self, card: &'static CardRule, from: Zone, to: Zone) -> Result<()> {
        if from == Zone::Graveyard {
            if card.has_flashback() && !self.synergy.take_fuel(card) {
                return Err(GoldfishError::IllegalMove(format!(
                    "can't move {}: not in graveyard",
                    card.name
                )));
            }
            if card.kind.is_instant_or_sorcery() {
                self.synergy.spells_in_graveyard = self.synergy.spells_in_graveyard.saturating_sub(1);
            }
        }

        match to {
            Zone::Graveyard => {
                if card.kind.is_instant_or_sorcery() {
                    self.synergy.spells_in_graveyard += 1;
                }
                if card.has_flashback() {
                    self.synergy.add_fuel(card);
                }
            }
            Zone::Board => self.enter_board(card),
            _ => {}
        }
        Ok(())
    }

    fn pay(&mut self, cost: &ManaCost) -> Result<()> {
        self.pool.pay_cost(cost)
    }

    fn produce(&mut self, cost: &ManaCost) -> Result<()> {
        if self.pool.can_pay(cost) {
            Ok(())
        } else {
            Err(GoldfishError::IllegalMove(format!(
                "can't produce {cost} from {}",
                self.pool
            )))
        }
    }

    fn sacrifice(&mut self, card: &'static CardRule) -> Result<()> {
        if let Damage::OnSacrifice(_) = card.damage {
            let stored = &mut self.synergy.stored_damage;
            let Some(pos) = stored.iter().position(|r| r.name == card.name) else {
                return Err(GoldfishError::IllegalMove(format!(
                    "can't sacrifice {}: not on board",
                    card.name
                )));
            };
            stored.remove(pos);
        }
        Ok(())
    }

    fn sacrifice_mountain(&mut self) -> Result<()> {
        if self.synergy.mountains == 0 {
            return Err(GoldfishError::IllegalMove(
                "can't sacrifice a Mountain: none left".to_string(),
            ));
        }
        self.synergy.mountains -= 1;
        Ok(())
    }

    fn add_counter(
        &mut self,
        _kind: CounterKind,
        _card: &'static CardRule,
        _zone: Zone,
        _amount: u8,
    ) -> Result<()> {
        Ok(())
    }

    fn damage_opponent(&mut self, amount: i32, _source: &str) {
        self.damage += amount;
        self.synergy.damage_dealt += amount;
    }

    fn pump_attackers(&mut self, amount: i32) {
        self.damage += amount;
    }

    fn expect_attack(&mut self, power: i32) {
        self.damage += power;
    }

    /// Drawn cards are unknown and never counted
    fn draw(&mut self, _count: u8) -> Result<()> {
        Ok(())
    }
}
