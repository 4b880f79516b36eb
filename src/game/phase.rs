//! Turn steps

use serde::{Deserialize, Serialize};
use std::fmt;

/// Steps of one goldfish turn, in order
///
/// Untap and cleanup have no decisions in a goldfish game, so they are folded
/// into `Upkeep` (turn start) and `Ending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    Upkeep,
    Draw,
    FirstMain,
    Combat,
    SecondMain,
    Ending,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::Upkeep,
        Step::Draw,
        Step::FirstMain,
        Step::Combat,
        Step::SecondMain,
        Step::Ending,
    ];

    /// Will attackers still deal damage this turn?
    pub fn is_before_combat(&self) -> bool {
        matches!(self, Step::Upkeep | Step::Draw | Step::FirstMain)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Upkeep => "Upkeep",
            Step::Draw => "Draw",
            Step::FirstMain => "First Main",
            Step::Combat => "Combat",
            Step::SecondMain => "Second Main",
            Step::Ending => "Ending",
        };
        write!(f, "{name}")
    }
}

/// Represents the current turn structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnStructure {
    /// Current turn number (0 before the first turn starts)
    pub turn_number: u32,

    /// Current step
    pub current_step: Step,
}

impl TurnStructure {
    pub fn new() -> Self {
        TurnStructure {
            turn_number: 0,
            current_step: Step::Upkeep,
        }
    }

    /// Begin the next turn at its upkeep
    pub fn next_turn(&mut self) {
        self.turn_number += 1;
        self.current_step = Step::Upkeep;
    }
}

impl Default for TurnStructure {
    fn default() -> Self {
        Self::new()
    }
}
