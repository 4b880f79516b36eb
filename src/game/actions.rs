//! Game actions and mechanics
//!
//! Every mutation of a `GameState` goes through one of these methods. Each
//! one checks the precondition on the zones it touches and returns
//! `GoldfishError::IllegalMove` instead of silently repairing the state.

use crate::core::{CardName, Color, CounterKind, ManaCost};
use crate::game::state::Counter;
use crate::game::{log_if_verbose, GameState};
use crate::rules::{catalog, BoardSynergy, CardRule};
use crate::zones::Zone;
use crate::{GoldfishError, Result};

/// Zone primitives the card rules are executed against
///
/// `GameState` implements this over the real zones. The lethal search
/// implements it over a cheap shadow copy of the synergy counts, so a card
/// resolves through the same code whether it is being played or simulated.
pub trait ZoneActions {
    /// Synergy-relevant counts as of right now
    fn synergy(&self) -> BoardSynergy;

    fn move_card(&mut self, card: &'static CardRule, from: Zone, to: Zone) -> Result<()>;

    fn pay(&mut self, cost: &ManaCost) -> Result<()>;

    /// Make sure `cost` can be paid, tapping lands if needed
    fn produce(&mut self, cost: &ManaCost) -> Result<()>;

    fn sacrifice(&mut self, card: &'static CardRule) -> Result<()>;

    /// Sacrifice one Mountain as a cost
    fn sacrifice_mountain(&mut self) -> Result<()>;

    fn add_counter(
        &mut self,
        kind: CounterKind,
        card: &'static CardRule,
        zone: Zone,
        amount: u8,
    ) -> Result<()>;

    fn damage_opponent(&mut self, amount: i32, source: &str);

    /// Bank extra power for this turn's attackers
    fn pump_attackers(&mut self, amount: i32);

    /// A creature that just entered will attack this turn for `power`
    fn expect_attack(&mut self, _power: i32) {}

    fn draw(&mut self, count: u8) -> Result<()>;
}

impl GameState {
    /// Move a card between zones
    ///
    /// Leaving the board drops a tap mark first, so tapped copies are the ones
    /// that go. Creatures entering the board are summoning sick.
    pub fn move_card(&mut self, card: &CardName, from: Zone, to: Zone) -> Result<()> {
        if !self.zone_mut(from).remove(card) {
            return Err(GoldfishError::IllegalMove(format!(
                "can't move {card} from {from}: not there"
            )));
        }

        if from == Zone::Board {
            let remaining = self.board.count(card.as_str()) as u32;
            self.tapped.remove(card);
            if self.summoning_sick.count(card) > remaining {
                self.summoning_sick.remove(card);
            }
        }
        let remaining = self.zone(from).count(card.as_str());
        let tracked = self
            .counters
            .iter()
            .filter(|c| c.card == *card && c.zone == from)
            .count();
        if tracked > remaining {
            if let Some(pos) = self
                .counters
                .iter()
                .position(|c| c.card == *card && c.zone == from)
            {
                self.counters.remove(pos);
            }
        }

        if to.inserts_on_top() {
            self.zone_mut(to).add_to_top(card.clone());
        } else {
            self.zone_mut(to).add(card.clone());
        }

        if to == Zone::Board && catalog::lookup(card.as_str()).is_some_and(|r| r.kind.is_creature())
        {
            self.summoning_sick.insert(card.clone());
        }

        log_if_verbose!(self.logger, "{card}: {from} -> {to}");
        Ok(())
    }

    /// Tap one untapped copy of a card on the board
    pub fn tap(&mut self, card: &CardName) -> Result<()> {
        if self.untapped_count(card) == 0 {
            return Err(GoldfishError::IllegalMove(format!(
                "can't tap {card}: no untapped copy on board"
            )));
        }
        self.tapped.insert(card.clone());
        log_if_verbose!(self.logger, "tap {card}");
        Ok(())
    }

    pub fn untap_all(&mut self) {
        self.tapped.clear();
    }

    /// Pay a cost out of the mana pool
    pub fn pay(&mut self, cost: &ManaCost) -> Result<()> {
        self.pool.pay_cost(cost)?;
        if !cost.is_zero() {
            log_if_verbose!(self.logger, "pay {cost} (pool: {})", self.pool);
        }
        Ok(())
    }

    /// Tap a land and add R to the pool
    pub fn tap_land_for_mana(&mut self, card: &CardName) -> Result<()> {
        let rule = catalog::rule_for(card)?;
        if !rule.taps_for_mana {
            return Err(GoldfishError::IllegalMove(format!(
                "{card} does not produce mana"
            )));
        }
        self.tap(card)?;
        self.pool.add_color(Color::Red);
        Ok(())
    }

    /// Tap untapped lands until the pool can pay `cost`
    pub fn produce(&mut self, cost: &ManaCost) -> Result<()> {
        while !self.pool.can_pay(cost) {
            let Some(land) = self.untapped_mana_lands().into_iter().next() else {
                return Err(GoldfishError::IllegalMove(format!(
                    "can't produce {cost}: pool is {} and no untapped land left",
                    self.pool
                )));
            };
            self.tap_land_for_mana(&land)?;
        }
        Ok(())
    }

    /// Put `amount` counters on a card that is in `zone`
    pub fn add_counter(
        &mut self,
        kind: CounterKind,
        card: &CardName,
        zone: Zone,
        amount: u8,
    ) -> Result<()> {
        if !self.zone(zone).contains(card) {
            return Err(GoldfishError::IllegalMove(format!(
                "can't put counters on {card}: not in {zone}"
            )));
        }
        self.counters.push(Counter {
            kind,
            card: card.clone(),
            zone,
            value: amount,
        });
        log_if_verbose!(self.logger, "{amount} {kind} counter(s) on {card}");
        Ok(())
    }

    /// Remove one counter from everything; returns the counters that ran out
    pub fn tick_counters(&mut self) -> Vec<Counter> {
        for counter in self.counters.iter_mut() {
            counter.value = counter.value.saturating_sub(1);
        }
        let (expired, running): (Vec<_>, Vec<_>) =
            self.counters.drain(..).partition(|c| c.value == 0);
        self.counters = running;
        expired
    }

    pub fn damage_opponent(&mut self, amount: i32, source: &str) {
        self.opponent_life -= amount;
        self.damage_dealt_this_turn += amount;
        log_if_verbose!(
            self.logger,
            "{source} deals {amount} damage (opponent life: {})",
            self.opponent_life
        );
    }

    pub fn poison_opponent(&mut self, amount: u32) {
        self.opponent_poison += amount;
        log_if_verbose!(
            self.logger,
            "{amount} poison counter(s) (opponent poison: {})",
            self.opponent_poison
        );
    }

    /// Play a land from hand
    pub fn land(&mut self, card: &CardName) -> Result<()> {
        if self.landed {
            return Err(GoldfishError::IllegalMove(format!(
                "can't play {card}: already played a land this turn"
            )));
        }
        if !self.hand.contains(card) {
            return Err(GoldfishError::IllegalMove(format!(
                "can't play {card}: not in hand"
            )));
        }
        let rule = catalog::rule_for(card)?;
        if !rule.kind.is_land() {
            return Err(GoldfishError::IllegalMove(format!(
                "can't play {card} as a land"
            )));
        }

        self.move_card(card, Zone::Hand, Zone::Board)?;
        self.landed = true;
        if rule.enters_tapped {
            self.tap(card)?;
        }
        self.logger.normal(&format!("land {card}"));
        Ok(())
    }

    /// Draw cards; drawing from an empty library loses the game
    pub fn draw(&mut self, count: usize) -> Result<Vec<CardName>> {
        let mut drawn = Vec::with_capacity(count);
        for _ in 0..count {
            let Some(card) = self.library.draw_top() else {
                return Err(GoldfishError::DeckedOut(format!(
                    "library is empty on turn {}",
                    self.turn.turn_number
                )));
            };
            self.hand.add(card.clone());
            drawn.push(card);
        }
        log_if_verbose!(self.logger, "draw {}", crate::zones::CardZone::from_cards(drawn.clone()));
        Ok(drawn)
    }

    /// Pay for a card and move it to its destination
    pub fn cast(&mut self, card: &CardName, from: Zone, to: Zone, cost: &ManaCost) -> Result<()> {
        self.pay(cost)?;
        self.move_card(card, from, to)
    }

    pub fn discard(&mut self, card: &CardName) -> Result<()> {
        self.move_card(card, Zone::Hand, Zone::Graveyard)?;
        self.logger.normal(&format!("discard {card}"));
        Ok(())
    }

    pub fn sacrifice(&mut self, card: &CardName) -> Result<()> {
        self.move_card(card, Zone::Board, Zone::Graveyard)?;
        log_if_verbose!(self.logger, "sacrifice {card}");
        Ok(())
    }

    /// Sacrifice a Mountain, preferring a tapped one
    ///
    /// When every Mountain is untapped, one is tapped for R first so its mana
    /// is not lost.
    pub fn sacrifice_mountain(&mut self) -> Result<CardName> {
        let mut untapped = None;
        for card in self.board_names() {
            if !catalog::lookup(card.as_str()).is_some_and(|r| r.mountain) {
                continue;
            }
            if self.tapped.count(&card) > 0 {
                self.sacrifice(&card)?;
                return Ok(card);
            }
            untapped.get_or_insert(card);
        }

        let Some(card) = untapped else {
            return Err(GoldfishError::IllegalMove(
                "can't sacrifice a Mountain: none on board".to_string(),
            ));
        };
        self.tap_land_for_mana(&card)?;
        self.sacrifice(&card)?;
        Ok(card)
    }

    /// London mulligan: put a card from hand on the bottom of the library
    pub fn put_on_bottom(&mut self, card: &CardName) -> Result<()> {
        self.move_card(card, Zone::Hand, Zone::LibraryBottom)
    }

    pub fn shuffle_library(&mut self) {
        self.library.shuffle(&mut self.rng);
    }

    /// Attack with one untapped copy of a creature
    pub fn tap_for_attack(&mut self, card: &CardName, power: i32) -> Result<()> {
        self.tap(card)?;
        self.damage_opponent(power, card.as_str());
        Ok(())
    }

    /// Turn start: untap, clear per-turn state and empty the pool
    pub fn start_next_turn(&mut self) {
        self.turn.next_turn();
        self.untap_all();
        self.summoning_sick.clear();
        self.pool.clear();
        self.landed = false;
        self.damage_dealt_this_turn = 0;
        self.prowess_boost = 0;
        self.logger.normal(&format!(
            "Turn {} (opponent life: {}, hand: {})",
            self.turn.turn_number, self.opponent_life, self.hand
        ));
    }
}

impl ZoneActions for GameState {
    fn synergy(&self) -> BoardSynergy {
        BoardSynergy::from_state(self)
    }

    fn move_card(&mut self, card: &'static CardRule, from: Zone, to: Zone) -> Result<()> {
        GameState::move_card(self, &CardName::new(card.name), from, to)
    }

    fn pay(&mut self, cost: &ManaCost) -> Result<()> {
        GameState::pay(self, cost)
    }

    fn produce(&mut self, cost: &ManaCost) -> Result<()> {
        GameState::produce(self, cost)
    }

    fn sacrifice(&mut self, card: &'static CardRule) -> Result<()> {
        GameState::sacrifice(self, &CardName::new(card.name))
    }

    fn sacrifice_mountain(&mut self) -> Result<()> {
        GameState::sacrifice_mountain(self).map(|_| ())
    }

    fn add_counter(
        &mut self,
        kind: CounterKind,
        card: &'static CardRule,
        zone: Zone,
        amount: u8,
    ) -> Result<()> {
        GameState::add_counter(self, kind, &CardName::new(card.name), zone, amount)
    }

    fn damage_opponent(&mut self, amount: i32, source: &str) {
        GameState::damage_opponent(self, amount, source)
    }

    fn pump_attackers(&mut self, amount: i32) {
        self.prowess_boost += amount;
        log_if_verbose!(self.logger, "attackers get +{amount} (total +{})", self.prowess_boost);
    }

    fn draw(&mut self, count: u8) -> Result<()> {
        GameState::draw(self, count as usize).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::catalog::*;

    fn name(s: &str) -> CardName {
        CardName::new(s)
    }

    fn game_with_board(board: &[&str]) -> GameState {
        let mut game = GameState::new(Vec::new(), 20);
        for card in board {
            game.board.add(name(card));
        }
        game
    }

    #[test]
    fn test_move_requires_card_in_zone() {
        let mut game = GameState::new(Vec::new(), 20);
        let err = game
            .move_card(&name(LIGHTNING_BOLT), Zone::Hand, Zone::Graveyard)
            .unwrap_err();
        assert!(matches!(err, GoldfishError::IllegalMove(_)));

        game.hand.add(name(LIGHTNING_BOLT));
        game.move_card(&name(LIGHTNING_BOLT), Zone::Hand, Zone::Graveyard)
            .unwrap();
        assert!(game.hand.is_empty());
        assert_eq!(game.graveyard.count(LIGHTNING_BOLT), 1);
    }

    #[test]
    fn test_library_top_and_bottom() {
        let mut game = GameState::new(vec![name(MOUNTAIN)], 20);
        game.hand.add(name(LAVA_SPIKE));
        game.hand.add(name(LIGHTNING_BOLT));

        game.move_card(&name(LAVA_SPIKE), Zone::Hand, Zone::LibraryTop)
            .unwrap();
        game.put_on_bottom(&name(LIGHTNING_BOLT)).unwrap();

        let library: Vec<_> = game.library.iter().map(|c| c.as_str()).collect();
        assert_eq!(library, vec![LAVA_SPIKE, MOUNTAIN, LIGHTNING_BOLT]);
    }

    #[test]
    fn test_tap_up_to_board_count() {
        let mut game = game_with_board(&[MOUNTAIN, MOUNTAIN]);
        game.tap(&name(MOUNTAIN)).unwrap();
        game.tap(&name(MOUNTAIN)).unwrap();
        assert!(game.tap(&name(MOUNTAIN)).is_err());
        assert!(game.tap(&name(LIGHTNING_BOLT)).is_err());

        game.untap_all();
        assert_eq!(game.untapped_count(&name(MOUNTAIN)), 2);
    }

    #[test]
    fn test_sacrifice_drops_tap_mark() {
        let mut game = game_with_board(&[MOUNTAIN, MOUNTAIN]);
        game.tap(&name(MOUNTAIN)).unwrap();
        game.sacrifice(&name(MOUNTAIN)).unwrap();

        assert_eq!(game.tapped.count(&name(MOUNTAIN)), 0);
        assert_eq!(game.untapped_count(&name(MOUNTAIN)), 1);
    }

    #[test]
    fn test_produce_taps_lands() {
        let mut game = game_with_board(&[MOUNTAIN, MOUNTAIN]);
        game.produce(&ManaCost::red(1, 1)).unwrap();
        assert_eq!(game.pool.total(), 2);
        assert_eq!(game.tapped.count(&name(MOUNTAIN)), 2);

        game.pay(&ManaCost::red(1, 1)).unwrap();
        assert!(game.pool.is_empty());

        let err = game.produce(&ManaCost::red(0, 1)).unwrap_err();
        assert!(matches!(err, GoldfishError::IllegalMove(_)));
    }

    #[test]
    fn test_pay_fails_on_empty_pool() {
        let mut game = GameState::new(Vec::new(), 20);
        assert!(game.pay(&ManaCost::red(0, 1)).is_err());
        assert!(game.pay(&ManaCost::ZERO).is_ok());
    }

    #[test]
    fn test_land_once_per_turn() {
        let mut game = GameState::new(Vec::new(), 20);
        game.hand.add(name(FORGOTTEN_CAVE));
        game.hand.add(name(MOUNTAIN));

        game.land(&name(FORGOTTEN_CAVE)).unwrap();
        assert!(game.landed);
        // Forgotten Cave enters tapped
        assert_eq!(game.untapped_count(&name(FORGOTTEN_CAVE)), 0);

        let err = game.land(&name(MOUNTAIN)).unwrap_err();
        assert!(matches!(err, GoldfishError::IllegalMove(_)));
        assert!(game.hand.contains(&name(MOUNTAIN)));
    }

    #[test]
    fn test_land_must_be_in_hand() {
        let mut game = GameState::new(Vec::new(), 20);
        assert!(game.land(&name(MOUNTAIN)).is_err());
        assert!(!game.landed);
    }

    #[test]
    fn test_draw_from_empty_library_is_terminal() {
        let mut game = GameState::new(vec![name(MOUNTAIN)], 20);
        assert_eq!(game.draw(1).unwrap(), vec![name(MOUNTAIN)]);

        let err = game.draw(1).unwrap_err();
        assert!(err.is_decked_out());
    }

    #[test]
    fn test_damage_has_no_floor() {
        let mut game = GameState::new(Vec::new(), 2);
        game.damage_opponent(5, "test");
        assert_eq!(game.opponent_life, -3);
        assert_eq!(game.damage_dealt_this_turn, 5);
        assert!(game.is_opponent_dead());
    }

    #[test]
    fn test_poison_accumulates() {
        let mut game = GameState::new(Vec::new(), 20);
        game.poison_opponent(4);
        game.poison_opponent(5);
        assert_eq!(game.opponent_poison, 9);
        assert!(!game.is_opponent_dead());

        game.poison_opponent(1);
        assert_eq!(game.opponent_poison, crate::game::state::LETHAL_POISON);
        assert!(game.is_opponent_dead());
        // Poison does not touch life
        assert_eq!(game.opponent_life, 20);
        assert_eq!(game.damage_dealt_this_turn, 0);
    }

    #[test]
    fn test_counters_tick_and_expire() {
        let mut game = game_with_board(&[KELDON_MARAUDERS]);
        game.exile.add(name(RIFT_BOLT));
        game.add_counter(CounterKind::Time, &name(KELDON_MARAUDERS), Zone::Board, 2)
            .unwrap();
        game.add_counter(CounterKind::Time, &name(RIFT_BOLT), Zone::Exile, 1)
            .unwrap();
        assert!(game
            .add_counter(CounterKind::Time, &name(LAVA_SPIKE), Zone::Exile, 1)
            .is_err());

        let expired = game.tick_counters();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].card, name(RIFT_BOLT));
        assert_eq!(game.counters.len(), 1);

        let expired = game.tick_counters();
        assert_eq!(expired[0].card, name(KELDON_MARAUDERS));
        assert!(game.counters.is_empty());
    }

    #[test]
    fn test_sacrifice_mountain_prefers_tapped() {
        let mut game = game_with_board(&[MOUNTAIN, MOUNTAIN]);
        game.tap_land_for_mana(&name(MOUNTAIN)).unwrap();
        game.sacrifice_mountain().unwrap();

        // The untapped one survives and the mana stays in the pool
        assert_eq!(game.untapped_count(&name(MOUNTAIN)), 1);
        assert_eq!(game.pool.total(), 1);

        // Sacrificing the last, untapped Mountain floats its mana first
        game.sacrifice_mountain().unwrap();
        assert_eq!(game.pool.total(), 2);
        assert!(game.sacrifice_mountain().is_err());
    }

    #[test]
    fn test_creatures_enter_sick() {
        let mut game = GameState::new(Vec::new(), 20);
        game.hand.add(name(KELDON_MARAUDERS));
        game.move_card(&name(KELDON_MARAUDERS), Zone::Hand, Zone::Board)
            .unwrap();
        assert_eq!(game.summoning_sick.count(&name(KELDON_MARAUDERS)), 1);

        game.start_next_turn();
        assert_eq!(game.summoning_sick.total(), 0);
        assert_eq!(game.turn.turn_number, 1);
    }

    #[test]
    fn test_start_next_turn_resets_turn_state() {
        let mut game = game_with_board(&[MOUNTAIN]);
        game.tap_land_for_mana(&name(MOUNTAIN)).unwrap();
        game.landed = true;
        game.damage_opponent(3, "test");
        game.prowess_boost = 2;

        game.start_next_turn();
        assert!(game.pool.is_empty());
        assert_eq!(game.untapped_count(&name(MOUNTAIN)), 1);
        assert!(!game.landed);
        assert_eq!(game.damage_dealt_this_turn, 0);
        assert_eq!(game.prowess_boost, 0);
        assert_eq!(game.opponent_life, 17);
    }
}
