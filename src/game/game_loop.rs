//! Main game loop implementation
//!
//! Sets up the opening hand, then runs turns step by step, handing each step
//! to the deck pilot and checking the end conditions in between.

use crate::core::CardName;
use crate::game::{log_if_verbose, GameState, Step};
use crate::pilot::DeckPilot;
use crate::rules::{self, catalog, CastMode};
use crate::zones::Zone;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Cards in the opening hand
pub const OPENING_HAND_SIZE: usize = 7;

/// Verbosity level for game output
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum VerbosityLevel {
    /// Silent - no output during game
    Silent = 0,
    /// Minimal - only game outcome
    Minimal = 1,
    /// Normal - turns, plays and kills (default)
    #[default]
    Normal = 2,
    /// Verbose - every zone move, tap and payment
    Verbose = 3,
}

impl VerbosityLevel {
    /// Map a `-v` count or numeric config value onto a level
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => VerbosityLevel::Silent,
            1 => VerbosityLevel::Minimal,
            2 => VerbosityLevel::Normal,
            _ => VerbosityLevel::Verbose,
        }
    }
}

/// Result of running a game to completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// Turn on which the opponent died, if it did
    pub kill_turn: Option<u32>,
    /// Total number of turns played
    pub turns_played: u32,
    pub end_reason: GameEndReason,
    pub mulligans: u32,
    pub opponent_life: i32,
}

/// Reason the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEndReason {
    /// Opponent life reached zero or less
    OpponentDead,
    /// Opponent got ten poison counters
    OpponentPoisoned,
    /// We had to draw from an empty library
    DeckedOut,
    /// Game reached maximum turn limit
    TurnLimit,
}

/// Game loop manager
pub struct GameLoop<'a> {
    /// The game state
    pub game: &'a mut GameState,
    /// Maximum turns before giving up
    max_turns: u32,
    /// Mulligans after which any hand is kept
    max_mulligans: u32,
    pub verbosity: VerbosityLevel,
}

impl<'a> GameLoop<'a> {
    /// Create a new game loop for the given game state
    pub fn new(game: &'a mut GameState) -> Self {
        let verbosity = game.logger.verbosity();
        GameLoop {
            game,
            max_turns: 20,
            max_mulligans: 6,
            verbosity,
        }
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_max_mulligans(mut self, max_mulligans: u32) -> Self {
        self.max_mulligans = max_mulligans;
        self
    }

    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.verbosity = verbosity;
        self.game.logger.set_verbosity(verbosity);
        self
    }

    /// Play a full game with the given pilot
    ///
    /// Deck-out ends the game with `GameEndReason::DeckedOut`; any other error
    /// is a rules or pilot bug and is returned as is.
    pub fn run_game(&mut self, pilot: &mut dyn DeckPilot) -> Result<GameResult> {
        match self.play(pilot) {
            Ok(result) => Ok(result),
            Err(err) if err.is_decked_out() => {
                self.game.logger.normal(&err.to_string());
                Ok(self.finish(GameEndReason::DeckedOut))
            }
            Err(err) => Err(err),
        }
    }

    fn play(&mut self, pilot: &mut dyn DeckPilot) -> Result<GameResult> {
        self.setup_game(pilot)?;

        loop {
            if let Some(result) = self.run_turn_once(pilot)? {
                return Ok(result);
            }
        }
    }

    /// Shuffle, draw an opening hand and mulligan until the pilot keeps
    fn setup_game(&mut self, pilot: &mut dyn DeckPilot) -> Result<()> {
        self.game.shuffle_library();
        self.game.draw(OPENING_HAND_SIZE)?;

        while self.game.mulligans < self.max_mulligans && !pilot.keep_hand(self.game) {
            self.game.mulligans += 1;
            self.game.logger.pilot_choice(
                pilot.name(),
                &format!("mulligan {} ({})", self.game.mulligans, self.game.hand),
            );
            let hand: Vec<CardName> = self.game.hand.iter().cloned().collect();
            for card in &hand {
                self.game
                    .move_card(card, Zone::Hand, Zone::LibraryBottom)?;
            }
            self.game.shuffle_library();
            self.game.draw(OPENING_HAND_SIZE)?;
        }

        for _ in 0..self.game.mulligans {
            let Some(card) = pilot.choose_bottom(self.game) else {
                break;
            };
            self.game.put_on_bottom(&card)?;
        }

        self.game.logger.normal(&format!(
            "keep {} after {} mulligan(s): {}",
            self.game.hand.len(),
            self.game.mulligans,
            self.game.hand
        ));
        Ok(())
    }

    /// Run one turn; returns the result when the game is over
    pub fn run_turn_once(&mut self, pilot: &mut dyn DeckPilot) -> Result<Option<GameResult>> {
        if self.game.turn.turn_number >= self.max_turns {
            return Ok(Some(self.finish(GameEndReason::TurnLimit)));
        }

        self.game.start_next_turn();
        for step in Step::ALL {
            self.game.turn.current_step = step;
            log_if_verbose!(self.game.logger, "-- {step} --");
            self.execute_step(pilot, step)?;

            if let Some(reason) = self.check_win_condition() {
                return Ok(Some(self.finish(reason)));
            }
        }
        Ok(None)
    }

    fn execute_step(&mut self, pilot: &mut dyn DeckPilot, step: Step) -> Result<()> {
        match step {
            Step::Upkeep => pilot.upkeep(self.game),
            Step::Draw => {
                if self.game.on_the_play && self.game.turn.turn_number == 1 {
                    return Ok(());
                }
                pilot.draw_step(self.game)
            }
            Step::FirstMain => pilot.first_main(self.game),
            Step::Combat => pilot.combat(self.game),
            Step::SecondMain => pilot.second_main(self.game),
            Step::Ending => pilot.ending(self.game),
        }
    }

    fn check_win_condition(&self) -> Option<GameEndReason> {
        if self.game.opponent_life <= 0 {
            Some(GameEndReason::OpponentDead)
        } else if self.game.is_opponent_dead() {
            Some(GameEndReason::OpponentPoisoned)
        } else {
            None
        }
    }

    fn finish(&mut self, end_reason: GameEndReason) -> GameResult {
        let turn = self.game.turn.turn_number;
        let kill_turn = match end_reason {
            GameEndReason::OpponentDead | GameEndReason::OpponentPoisoned => Some(turn),
            _ => None,
        };
        let message = match end_reason {
            GameEndReason::OpponentDead => format!("opponent is dead on turn {turn}"),
            GameEndReason::OpponentPoisoned => format!("opponent is poisoned on turn {turn}"),
            GameEndReason::DeckedOut => format!("decked out on turn {turn}"),
            GameEndReason::TurnLimit => format!("no kill after {turn} turns"),
        };
        self.game.logger.minimal(&message);

        GameResult {
            kill_turn,
            turns_played: turn,
            end_reason,
            mulligans: self.game.mulligans,
            opponent_life: self.game.opponent_life,
        }
    }
}

/// Upkeep: remove time counters, fire expiries, then pings from upkeep triggers
pub fn run_upkeep(game: &mut GameState) -> Result<()> {
    for counter in game.tick_counters() {
        rules::expire_counter(game, &counter)?;
    }

    for card in game.board.iter().cloned().collect::<Vec<_>>() {
        let damage = catalog::rule_for(&card)?.upkeep_damage;
        if damage > 0 {
            game.damage_opponent(damage as i32, card.as_str());
        }
    }
    Ok(())
}

/// Draw for the turn; a drawn miracle is cast when affordable
pub fn draw_for_turn(game: &mut GameState) -> Result<()> {
    let drawn = game.draw(1)?;
    for card in drawn {
        let is_miracle = catalog::lookup(card.as_str())
            .is_some_and(|r| r.option(CastMode::Miracle).is_some());
        if is_miracle {
            rules::cast_card(game, &card, Zone::Hand, true)?;
        }
    }
    Ok(())
}

/// Attack with every ready creature, then add the turn's prowess boost
pub fn run_combat(game: &mut GameState) -> Result<()> {
    let spells = game.spells_in_graveyard();
    let attackers = game.ready_attackers();
    if attackers.is_empty() {
        return Ok(());
    }

    for attacker in &attackers {
        let power = catalog::rule_for(attacker)?.attack_power(spells);
        game.tap_for_attack(attacker, power as i32)?;
    }
    if game.prowess_boost > 0 {
        game.damage_opponent(game.prowess_boost, "prowess");
    }
    game.logger.normal(&format!(
        "attack with {} creature(s) (opponent life: {})",
        attackers.len(),
        game.opponent_life
    ));
    Ok(())
}

/// Ready pingers tap for one last point of damage
pub fn end_of_turn_pings(game: &mut GameState) -> Result<()> {
    for pinger in game.ready_pingers() {
        game.tap(&pinger)?;
        game.damage_opponent(1, pinger.as_str());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pilot::BurnPilot;
    use crate::rules::catalog::*;

    fn name(s: &str) -> CardName {
        CardName::new(s)
    }

    fn deck(cards: &[(&str, usize)]) -> Vec<CardName> {
        cards
            .iter()
            .flat_map(|(card, n)| std::iter::repeat(name(card)).take(*n))
            .collect()
    }

    #[test]
    fn test_verbosity_from_level() {
        assert_eq!(VerbosityLevel::from_level(0), VerbosityLevel::Silent);
        assert_eq!(VerbosityLevel::from_level(2), VerbosityLevel::Normal);
        assert_eq!(VerbosityLevel::from_level(9), VerbosityLevel::Verbose);
    }

    #[test]
    fn test_combat_uses_prowess() {
        let mut game = GameState::new(Vec::new(), 20);
        game.board.add(name(MONASTERY_SWIFTSPEAR));
        game.board.add(name(KELDON_MARAUDERS));
        game.summoning_sick.insert(name(KELDON_MARAUDERS));
        game.prowess_boost = 2;

        run_combat(&mut game).unwrap();
        assert_eq!(game.opponent_life, 17);
        assert_eq!(game.tapped.count(&name(MONASTERY_SWIFTSPEAR)), 1);
    }

    #[test]
    fn test_upkeep_curse_ping() {
        let mut game = GameState::new(Vec::new(), 20);
        game.board.add(name(CURSE_OF_THE_PIERCED_HEART));
        game.board.add(name(CURSE_OF_THE_PIERCED_HEART));
        run_upkeep(&mut game).unwrap();
        assert_eq!(game.opponent_life, 18);
    }

    #[test]
    fn test_miracle_in_draw_step() {
        let mut game = GameState::new(vec![name(THUNDEROUS_WRATH)], 20);
        game.turn.current_step = Step::Draw;
        game.board.add(name(MOUNTAIN));

        draw_for_turn(&mut game).unwrap();
        assert_eq!(game.opponent_life, 15);
        assert_eq!(game.graveyard.count(THUNDEROUS_WRATH), 1);
    }

    #[test]
    fn test_thermo_pings_at_end_of_turn() {
        let mut game = GameState::new(Vec::new(), 20);
        game.board.add(name(THERMO_ALCHEMIST));
        game.board.add(name(THERMO_ALCHEMIST));
        game.summoning_sick.insert(name(THERMO_ALCHEMIST));

        end_of_turn_pings(&mut game).unwrap();
        assert_eq!(game.opponent_life, 19);
    }

    #[test]
    fn test_game_ends_at_turn_limit() {
        let mut game = GameState::new(deck(&[(MOUNTAIN, 40)]), 20);
        game.logger.set_verbosity(VerbosityLevel::Silent);
        let mut pilot = BurnPilot::new();
        let result = GameLoop::new(&mut game)
            .with_max_turns(3)
            .run_game(&mut pilot)
            .unwrap();

        assert_eq!(result.end_reason, GameEndReason::TurnLimit);
        assert_eq!(result.turns_played, 3);
        assert_eq!(result.kill_turn, None);
    }

    #[test]
    fn test_deck_out_is_a_result() {
        let mut game = GameState::new(deck(&[(MOUNTAIN, 8)]), 20);
        game.logger.set_verbosity(VerbosityLevel::Silent);
        game.on_the_play = false;
        let mut pilot = BurnPilot::new();
        let result = GameLoop::new(&mut game)
            .with_max_mulligans(0)
            .run_game(&mut pilot)
            .unwrap();

        // Seven in hand, one draw on turn 1, then the library is empty
        assert_eq!(result.end_reason, GameEndReason::DeckedOut);
        assert_eq!(result.turns_played, 2);
    }

    #[test]
    fn test_burn_deck_kills() {
        let mut game = GameState::new(
            deck(&[(MOUNTAIN, 20), (LIGHTNING_BOLT, 20), (LAVA_SPIKE, 20)]),
            20,
        );
        game.logger.set_verbosity(VerbosityLevel::Silent);
        game.seed_rng(7);
        let mut pilot = BurnPilot::new();
        let result = GameLoop::new(&mut game).run_game(&mut pilot).unwrap();

        assert_eq!(result.end_reason, GameEndReason::OpponentDead);
        assert!(result.kill_turn.is_some_and(|t| t <= 10));
        assert!(result.opponent_life <= 0);
    }
}
