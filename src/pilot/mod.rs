//! Deck pilots: the decisions a player makes around the lethal search
//!
//! The game loop hands every step to a `DeckPilot`. The default methods do
//! the mechanical part of each step (counters, drawing, attacking, end of
//! turn pings and discarding); a pilot overrides the decisions.

pub mod burn;

pub use burn::BurnPilot;

use crate::core::CardName;
use crate::game::game_loop::{draw_for_turn, end_of_turn_pings, run_combat, run_upkeep};
use crate::game::state::MAX_HAND_SIZE;
use crate::game::GameState;
use crate::Result;

pub trait DeckPilot {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Keep the current opening hand?
    fn keep_hand(&mut self, _game: &GameState) -> bool {
        true
    }

    /// Card to put on the bottom after a mulligan
    fn choose_bottom(&mut self, game: &GameState) -> Option<CardName> {
        game.hand.first().cloned()
    }

    /// Card to discard at the end of the turn
    fn choose_discard(&mut self, game: &GameState) -> Option<CardName> {
        game.hand.first().cloned()
    }

    fn upkeep(&mut self, game: &mut GameState) -> Result<()> {
        run_upkeep(game)
    }

    fn draw_step(&mut self, game: &mut GameState) -> Result<()> {
        draw_for_turn(game)
    }

    fn first_main(&mut self, _game: &mut GameState) -> Result<()> {
        Ok(())
    }

    fn combat(&mut self, game: &mut GameState) -> Result<()> {
        run_combat(game)
    }

    fn second_main(&mut self, _game: &mut GameState) -> Result<()> {
        Ok(())
    }

    fn ending(&mut self, game: &mut GameState) -> Result<()> {
        end_of_turn_pings(game)?;
        while game.hand.len() > MAX_HAND_SIZE {
            let Some(card) = self.choose_discard(game) else {
                break;
            };
            game.discard(&card)?;
        }
        Ok(())
    }
}
