//! Error types for the goldfish simulator

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GoldfishError {
    /// A zone, tap or mana precondition was violated. This is always a bug in
    /// the card rules or the pilot, never an expected game outcome.
    #[error("Illegal move: {0}")]
    IllegalMove(String),

    /// Tried to draw from an empty library. Terminal for the simulated game.
    #[error("Decked out: {0}")]
    DeckedOut(String),

    #[error("Unknown card: {0}")]
    UnknownCard(String),

    #[error("Invalid deck format: {0}")]
    InvalidDeckFormat(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl GoldfishError {
    /// True for the terminal "lost to deck-out" condition
    pub fn is_decked_out(&self) -> bool {
        matches!(self, GoldfishError::DeckedOut(_))
    }
}

impl From<serde_json::Error> for GoldfishError {
    fn from(err: serde_json::Error) -> Self {
        GoldfishError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GoldfishError>;
