//! Replaying a lethal plan against the real game

use super::lethal::{LethalPlan, PlannedAction};
use crate::core::CardName;
use crate::game::GameState;
use crate::rules::{is_castable, resolve, BoardSynergy};
use crate::{GoldfishError, Result};

/// Play every action of `plan`, in order, through the action API
///
/// Each cast is re-checked against the real state first; a plan step that
/// is not castable any more is a rules bug and fails with `IllegalMove`.
/// Returns the damage dealt right away (combat damage comes later).
pub fn commit(game: &mut GameState, plan: &LethalPlan) -> Result<i32> {
    let life_before = game.opponent_life;
    game.logger.normal(&format!(">>> going for the kill: {plan}"));

    for action in &plan.actions {
        match *action {
            PlannedAction::SacrificeStored(card) => {
                game.sacrifice(&CardName::new(card.name))?;
                game.damage_opponent(card.damage.max() as i32, card.name);
            }
            PlannedAction::Cast { card, mode } => {
                let option = card.option(mode).ok_or_else(|| {
                    GoldfishError::IllegalMove(format!("{} has no {mode} option", card.name))
                })?;
                let synergy = BoardSynergy::from_state(game);
                let available = synergy.available_mana(&game.pool);
                if !is_castable(card, option, &synergy, &available) {
                    return Err(GoldfishError::IllegalMove(format!(
                        "planned {action} is not castable (pool: {}, mountains: {})",
                        game.pool, synergy.mountains
                    )));
                }
                resolve(game, card, option, true)?;
            }
        }
    }

    Ok(life_before - game.opponent_life)
}
