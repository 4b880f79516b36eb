//! Core game state and turn structure

/// Log a Verbose trace line; compiled out without the `verbose-logging` feature
macro_rules! log_if_verbose {
    ($logger:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            $logger.verbose(&format!($($arg)*));
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$logger; // Suppress unused variable warning
        }
    };
}
pub(crate) use log_if_verbose;

pub mod actions;
pub mod game_loop;
pub mod logger;
pub mod phase;
pub mod state;

pub use actions::ZoneActions;
pub use game_loop::{GameEndReason, GameLoop, GameResult, VerbosityLevel};
pub use logger::{GameLogger, LogEntry, OutputMode};
pub use phase::{Step, TurnStructure};
pub use state::{Counter, GameState};
