//! Strongly-typed wrappers for game concepts
//!
//! Instead of passing bare strings around, card names and counter kinds are
//! wrapped in distinct types that cannot be mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Card name, the opaque identifier of a card in every zone
///
/// Two copies of the same card are indistinguishable: zones hold names, and
/// behavior is looked up in the rule catalog by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardName(String);

impl CardName {
    pub fn new(s: impl Into<String>) -> Self {
        CardName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_lowercase(&self) -> String {
        self.0.to_lowercase()
    }

    /// Case-insensitive comparison against a catalog name
    pub fn is(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for CardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CardName {
    fn from(s: String) -> Self {
        CardName(s)
    }
}

impl From<&str> for CardName {
    fn from(s: &str) -> Self {
        CardName(s.to_string())
    }
}

/// Counter kinds placed on cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CounterKind {
    /// Time counters: vanishing, echo reminders and suspend
    Time,
}

impl fmt::Display for CounterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CounterKind::Time => write!(f, "time"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_name_matching() {
        let name = CardName::new("Lightning Bolt");
        assert!(name.is("lightning bolt"));
        assert!(name.is("LIGHTNING BOLT"));
        assert!(!name.is("Chain Lightning"));
        assert_eq!(name.to_string(), "Lightning Bolt");
    }
}
