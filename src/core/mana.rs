//! Mana costs and the mana pool

use crate::{GoldfishError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mana colors in MTG
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
    Colorless,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "W"),
            Color::Blue => write!(f, "U"),
            Color::Black => write!(f, "B"),
            Color::Red => write!(f, "R"),
            Color::Green => write!(f, "G"),
            Color::Colorless => write!(f, "C"),
        }
    }
}

/// Represents a mana cost (e.g., "2RR" = 2 generic + 2 red)
/// Copy-eligible since it's just 7 u8 fields (7 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManaCost {
    pub generic: u8,
    pub white: u8,
    pub blue: u8,
    pub black: u8,
    pub red: u8,
    pub green: u8,
    pub colorless: u8,
}

impl ManaCost {
    pub const ZERO: ManaCost = ManaCost {
        generic: 0,
        white: 0,
        blue: 0,
        black: 0,
        red: 0,
        green: 0,
        colorless: 0,
    };

    pub fn new() -> Self {
        Self::ZERO
    }

    /// Red cost with a generic part, usable in const catalog tables
    pub const fn red(generic: u8, red: u8) -> Self {
        ManaCost {
            generic,
            red,
            ..Self::ZERO
        }
    }

    /// Parse a mana cost string like "2RR" or "1UB"
    pub fn from_string(s: &str) -> Self {
        let mut cost = ManaCost::new();
        let mut generic_str = String::new();

        for c in s.chars() {
            match c.to_ascii_uppercase() {
                'W' => cost.white += 1,
                'U' => cost.blue += 1,
                'B' => cost.black += 1,
                'R' => cost.red += 1,
                'G' => cost.green += 1,
                'C' => cost.colorless += 1,
                '0'..='9' => generic_str.push(c),
                _ => {} // Ignore other characters
            }
        }

        if !generic_str.is_empty() {
            cost.generic = generic_str.parse().unwrap_or(0);
        }

        cost
    }

    /// Total converted mana cost
    pub fn cmc(&self) -> u8 {
        self.generic + self.white + self.blue + self.black + self.red + self.green + self.colorless
    }

    pub fn is_zero(&self) -> bool {
        self.cmc() == 0
    }
}

impl Default for ManaCost {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ManaCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        if self.generic > 0 {
            write!(f, "{}", self.generic)?;
        }
        for _ in 0..self.white {
            write!(f, "W")?;
        }
        for _ in 0..self.blue {
            write!(f, "U")?;
        }
        for _ in 0..self.black {
            write!(f, "B")?;
        }
        for _ in 0..self.red {
            write!(f, "R")?;
        }
        for _ in 0..self.green {
            write!(f, "G")?;
        }
        for _ in 0..self.colorless {
            write!(f, "C")?;
        }
        Ok(())
    }
}

/// Mana pool
/// Copy-eligible since it's just 6 u8 fields (6 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ManaPool {
    pub white: u8,
    pub blue: u8,
    pub black: u8,
    pub red: u8,
    pub green: u8,
    pub colorless: u8,
}

impl ManaPool {
    pub fn new() -> Self {
        ManaPool::default()
    }

    /// Pool holding `amount` red mana
    pub fn red(amount: u8) -> Self {
        ManaPool {
            red: amount,
            ..ManaPool::default()
        }
    }

    /// Parse a pool from mana symbols ("RR", "1R" counts the 1 as colorless)
    pub fn from_string(s: &str) -> Self {
        let cost = ManaCost::from_string(s);
        ManaPool {
            white: cost.white,
            blue: cost.blue,
            black: cost.black,
            red: cost.red,
            green: cost.green,
            colorless: cost.colorless + cost.generic,
        }
    }

    pub fn add_color(&mut self, color: Color) {
        match color {
            Color::White => self.white += 1,
            Color::Blue => self.blue += 1,
            Color::Black => self.black += 1,
            Color::Red => self.red += 1,
            Color::Green => self.green += 1,
            Color::Colorless => self.colorless += 1,
        }
    }

    /// Sum of two pools
    pub fn plus(&self, other: &ManaPool) -> ManaPool {
        ManaPool {
            white: self.white + other.white,
            blue: self.blue + other.blue,
            black: self.black + other.black,
            red: self.red + other.red,
            green: self.green + other.green,
            colorless: self.colorless + other.colorless,
        }
    }

    pub fn clear(&mut self) {
        *self = ManaPool::default();
    }

    /// Check if we can pay the given mana cost
    pub fn can_pay(&self, cost: &ManaCost) -> bool {
        // Check colored mana requirements
        if self.white < cost.white
            || self.blue < cost.blue
            || self.black < cost.black
            || self.red < cost.red
            || self.green < cost.green
            || self.colorless < cost.colorless
        {
            return false;
        }

        // Check if we have enough mana for generic cost
        self.total() as u16 >= cost.cmc() as u16
    }

    /// Pay a mana cost from this pool
    ///
    /// Colored requirements are paid first, then the generic part using any
    /// remaining mana in WUBRG order, then colorless. The pool is left
    /// unchanged when the cost cannot be paid.
    pub fn pay_cost(&mut self, cost: &ManaCost) -> Result<()> {
        if !self.can_pay(cost) {
            return Err(GoldfishError::IllegalMove(format!(
                "can't pay {cost}: not enough mana in pool ({self})"
            )));
        }

        self.white -= cost.white;
        self.blue -= cost.blue;
        self.black -= cost.black;
        self.red -= cost.red;
        self.green -= cost.green;
        self.colorless -= cost.colorless;

        let mut generic_remaining = cost.generic;
        for amount in [
            &mut self.white,
            &mut self.blue,
            &mut self.black,
            &mut self.red,
            &mut self.green,
            &mut self.colorless,
        ] {
            let used = generic_remaining.min(*amount);
            *amount -= used;
            generic_remaining -= used;
        }

        debug_assert_eq!(generic_remaining, 0, "Failed to pay generic cost");

        Ok(())
    }

    /// Total mana in pool
    pub fn total(&self) -> u8 {
        self.white + self.blue + self.black + self.red + self.green + self.colorless
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl fmt::Display for ManaPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "empty");
        }
        for (count, color) in [
            (self.white, Color::White),
            (self.blue, Color::Blue),
            (self.black, Color::Black),
            (self.red, Color::Red),
            (self.green, Color::Green),
            (self.colorless, Color::Colorless),
        ] {
            for _ in 0..count {
                write!(f, "{color}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mana_cost_parsing() {
        let cost = ManaCost::from_string("2RR");
        assert_eq!(cost.generic, 2);
        assert_eq!(cost.red, 2);
        assert_eq!(cost.cmc(), 4);
        assert_eq!(cost, ManaCost::red(2, 2));
        assert_eq!(cost.to_string(), "2RR");
    }

    #[test]
    fn test_mana_pool_containment() {
        let pool = ManaPool::from_string("RRU");

        assert!(pool.can_pay(&ManaCost::from_string("1R")));
        assert!(pool.can_pay(&ManaCost::from_string("2R")));
        assert!(!pool.can_pay(&ManaCost::from_string("3R")));
        // Only two red available
        assert!(!pool.can_pay(&ManaCost::from_string("RRR")));
    }

    #[test]
    fn test_pay_cost_with_generic() {
        let mut pool = ManaPool::from_string("RRU");

        // 1R: red for R, then blue goes first for the generic part (WUBRG order)
        pool.pay_cost(&ManaCost::from_string("1R")).unwrap();
        assert_eq!(pool.red, 1);
        assert_eq!(pool.blue, 0);
        assert_eq!(pool.total(), 1);
    }

    #[test]
    fn test_pay_cost_insufficient_mana_leaves_pool() {
        let mut pool = ManaPool::red(1);

        let err = pool.pay_cost(&ManaCost::from_string("2R")).unwrap_err();
        assert!(matches!(err, GoldfishError::IllegalMove(_)));
        assert_eq!(pool.red, 1);
    }

    #[test]
    fn test_pool_plus_and_display() {
        let pool = ManaPool::red(1).plus(&ManaPool::from_string("1"));
        assert_eq!(pool.total(), 2);
        assert_eq!(pool.to_string(), "RC");
        assert_eq!(ManaPool::new().to_string(), "empty");
    }
}
