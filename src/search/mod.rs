//! Lethal-turn search over shadow copies of the board

pub mod commit;
pub mod lethal;
pub mod shadow;

pub use commit::commit;
pub use lethal::{
    best_line, evaluate_lethal, lethal_candidates, replay, Candidate, LethalPlan, PlannedAction,
    TurnSimulation, MAX_CANDIDATES,
};
pub use shadow::ShadowState;
