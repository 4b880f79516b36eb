//! Batch goldfish runner
//!
//! Plays many independent games of one deck in parallel with rayon and
//! collects kill-turn statistics. Game `i` of a batch is seeded with
//! `seed + i`, so a batch is reproducible regardless of thread scheduling.

use crate::core::CardName;
use crate::game::{GameEndReason, GameLoop, GameResult, GameState, OutputMode, VerbosityLevel};
use crate::pilot::BurnPilot;
use crate::{GoldfishError, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

/// Settings shared by every game of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoldfishConfig {
    pub starting_life: i32,
    pub max_turns: u32,
    pub on_the_play: bool,
    pub seed: u64,
    /// Mulligans after which any hand is kept
    pub max_mulligans: u32,
    pub verbosity: VerbosityLevel,
}

impl Default for GoldfishConfig {
    fn default() -> Self {
        GoldfishConfig {
            starting_life: 20,
            max_turns: 20,
            on_the_play: true,
            seed: 0,
            max_mulligans: 6,
            verbosity: VerbosityLevel::Minimal,
        }
    }
}

impl GoldfishConfig {
    /// Load a JSON config; missing fields take their defaults
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: GoldfishConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.starting_life <= 0 {
            return Err(GoldfishError::InvalidConfig(format!(
                "starting life must be positive, got {}",
                self.starting_life
            )));
        }
        if self.max_turns == 0 {
            return Err(GoldfishError::InvalidConfig(
                "max turns must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// A fresh game for `deck`, seeded and ready for the game loop
    pub fn new_game(&self, deck: &[CardName], seed: u64) -> GameState {
        let mut game = GameState::new(deck.iter().cloned(), self.starting_life);
        game.on_the_play = self.on_the_play;
        game.seed_rng(seed);
        game
    }
}

/// Kill-turn statistics of a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KillTurnStats {
    pub games: usize,
    pub kills: usize,
    /// Mean kill turn over the games that killed
    pub average_kill_turn: Option<f64>,
    /// Games per kill turn
    pub distribution: BTreeMap<u32, usize>,
    pub decked_out: usize,
    pub turn_limit: usize,
    pub total_mulligans: u32,
    /// Games that stopped on a rules error
    pub failed: usize,
}

impl KillTurnStats {
    pub fn record(&mut self, result: &GameResult) {
        self.games += 1;
        self.total_mulligans += result.mulligans;
        match result.end_reason {
            GameEndReason::OpponentDead | GameEndReason::OpponentPoisoned => {
                self.kills += 1;
                if let Some(turn) = result.kill_turn {
                    *self.distribution.entry(turn).or_insert(0) += 1;
                }
            }
            GameEndReason::DeckedOut => self.decked_out += 1,
            GameEndReason::TurnLimit => self.turn_limit += 1,
        }
        self.average_kill_turn = self.mean_kill_turn();
    }

    fn mean_kill_turn(&self) -> Option<f64> {
        let kills: usize = self.distribution.values().sum();
        if kills == 0 {
            return None;
        }
        let total: u64 = self
            .distribution
            .iter()
            .map(|(turn, count)| *turn as u64 * *count as u64)
            .sum();
        Some(total as f64 / kills as f64)
    }

    /// Share of games that killed by `turn`
    pub fn kill_rate_by(&self, turn: u32) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        let kills: usize = self.distribution.range(..=turn).map(|(_, n)| n).sum();
        kills as f64 / self.games as f64
    }
}

/// One game together with its captured log
#[derive(Debug, Clone)]
pub struct GameTrace {
    pub result: GameResult,
    pub log: Vec<String>,
}

/// Play one game silently
pub fn run_game(deck: &[CardName], config: &GoldfishConfig, seed: u64) -> Result<GameResult> {
    let mut game = config.new_game(deck, seed);
    let mut pilot = BurnPilot::new();
    let mut game_loop = GameLoop::new(&mut game)
        .with_max_turns(config.max_turns)
        .with_max_mulligans(config.max_mulligans)
        .with_verbosity(VerbosityLevel::Silent);
    game_loop.run_game(&mut pilot)
}

/// Play one game with the log captured in memory at `verbosity`
pub fn run_single(
    deck: &[CardName],
    config: &GoldfishConfig,
    seed: u64,
    verbosity: VerbosityLevel,
) -> Result<GameTrace> {
    let mut game = config.new_game(deck, seed);
    game.logger.set_output_mode(OutputMode::Memory);
    let mut pilot = BurnPilot::new();

    let result = GameLoop::new(&mut game)
        .with_max_turns(config.max_turns)
        .with_max_mulligans(config.max_mulligans)
        .with_verbosity(verbosity)
        .run_game(&mut pilot)?;

    Ok(GameTrace {
        result,
        log: game.logger.trace(),
    })
}

/// Play `games` games in parallel and collect their statistics
pub fn run_batch(deck: &[CardName], config: &GoldfishConfig, games: usize) -> KillTurnStats {
    let stats = Arc::new(Mutex::new(KillTurnStats::default()));

    (0..games).into_par_iter().for_each(|game_idx| {
        let seed = config.seed.wrapping_add(game_idx as u64);
        record_outcome(&stats, game_idx, seed, run_game(deck, config, seed));
    });

    match Arc::try_unwrap(stats) {
        Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
        Err(shared) => shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone(),
    }
}

/// Fold one game into the shared statistics, even behind a poisoned lock
fn record_outcome(
    stats: &Mutex<KillTurnStats>,
    game_idx: usize,
    seed: u64,
    result: Result<GameResult>,
) {
    let mut stats = stats.lock().unwrap_or_else(PoisonError::into_inner);
    match result {
        Ok(result) => stats.record(&result),
        Err(e) => {
            eprintln!("Warning: game {game_idx} (seed {seed}) failed: {e}");
            stats.failed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::DeckLoader;

    const BURN: &str = "
20 Mountain
4 Monastery Swiftspear
4 Lightning Bolt
4 Chain Lightning
4 Lava Spike
4 Rift Bolt
4 Fireblast
4 Skewer the Critics
4 Lava Dart
4 Searing Blaze
4 Light Up the Stage
";

    fn burn_deck() -> Vec<CardName> {
        DeckLoader::parse(BURN).unwrap().cards()
    }

    #[test]
    fn test_config_defaults_and_partial_json() {
        let config: GoldfishConfig = serde_json::from_str(r#"{"max_turns": 8}"#).unwrap();
        assert_eq!(config.max_turns, 8);
        assert_eq!(config.starting_life, 20);
        assert!(config.on_the_play);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let config = GoldfishConfig {
            starting_life: 0,
            ..GoldfishConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GoldfishError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_stats_record() {
        let mut stats = KillTurnStats::default();
        for (turn, reason) in [
            (4, GameEndReason::OpponentDead),
            (6, GameEndReason::OpponentDead),
            (20, GameEndReason::TurnLimit),
        ] {
            stats.record(&GameResult {
                kill_turn: (reason == GameEndReason::OpponentDead).then_some(turn),
                turns_played: turn,
                end_reason: reason,
                mulligans: 1,
                opponent_life: 0,
            });
        }

        assert_eq!(stats.games, 3);
        assert_eq!(stats.kills, 2);
        assert_eq!(stats.turn_limit, 1);
        assert_eq!(stats.total_mulligans, 3);
        assert_eq!(stats.average_kill_turn, Some(5.0));
        assert!((stats.kill_rate_by(4) - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_poisoned_stats_still_record() {
        let stats = Arc::new(Mutex::new(KillTurnStats::default()));
        let shared = Arc::clone(&stats);
        let poisoner = std::thread::spawn(move || {
            let _guard = shared.lock().unwrap();
            panic!("worker died holding the stats lock");
        });
        assert!(poisoner.join().is_err());
        assert!(stats.is_poisoned());

        let win = GameResult {
            kill_turn: Some(5),
            turns_played: 5,
            end_reason: GameEndReason::OpponentDead,
            mulligans: 0,
            opponent_life: -1,
        };
        record_outcome(&stats, 0, 7, Ok(win));
        record_outcome(&stats, 1, 8, Err(GoldfishError::DeckedOut("empty".into())));

        let stats = stats.lock().unwrap_or_else(PoisonError::into_inner);
        assert_eq!(stats.games, 1);
        assert_eq!(stats.kills, 1);
        assert_eq!(stats.failed, 1);
    }

    #[test]
    fn test_batch_is_reproducible() {
        let deck = burn_deck();
        let config = GoldfishConfig {
            seed: 11,
            ..GoldfishConfig::default()
        };

        let first = run_batch(&deck, &config, 24);
        let second = run_batch(&deck, &config, 24);
        assert_eq!(first, second);
        assert_eq!(first.games, 24);
        assert_eq!(first.failed, 0);
        assert!(first.kills > 20);
    }

    #[test]
    fn test_single_trace_matches_batch_game() {
        let deck = burn_deck();
        let config = GoldfishConfig::default();

        let trace = run_single(&deck, &config, 3, VerbosityLevel::Normal).unwrap();
        let silent = run_game(&deck, &config, 3).unwrap();
        assert_eq!(trace.result, silent);
        assert!(trace.log.iter().any(|line| line.starts_with("Turn 1")));
    }
}
