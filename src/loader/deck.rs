//! Deck list loader (.dck sections or plain `N Card Name` lines)

use crate::core::CardName;
use crate::rules::catalog;
use crate::{GoldfishError, Result};
use std::fs;
use std::path::Path;

pub struct DeckLoader;

impl DeckLoader {
    pub fn load_from_file(path: &Path) -> Result<DeckList> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a deck list
    ///
    /// Blank lines, `#` comments and `[Section]` headers are skipped; cards
    /// after a `[Sideboard]` header (or a `Sideboard` line) go to the
    /// sideboard. A `|SET` suffix on a card line is ignored. Names are
    /// matched against the catalog case-insensitively.
    pub fn parse(content: &str) -> Result<DeckList> {
        let mut main_deck = Vec::new();
        let mut sideboard = Vec::new();
        let mut in_sideboard = false;

        for (number, line) in content.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                if line.eq_ignore_ascii_case("[sideboard]") {
                    in_sideboard = true;
                } else if line.starts_with('[') {
                    in_sideboard = false;
                }
                continue;
            }
            if line.eq_ignore_ascii_case("sideboard") || line.eq_ignore_ascii_case("sideboard:") {
                in_sideboard = true;
                continue;
            }
            // .dck metadata such as "Name=Burn"
            if line.contains('=') {
                continue;
            }

            let entry = Self::parse_entry(line).ok_or_else(|| {
                GoldfishError::InvalidDeckFormat(format!(
                    "line {}: expected \"<count> <card name>\", got {line:?}",
                    number + 1
                ))
            })??;

            if in_sideboard {
                sideboard.push(entry);
            } else {
                main_deck.push(entry);
            }
        }

        if main_deck.is_empty() {
            return Err(GoldfishError::InvalidDeckFormat("empty deck".to_string()));
        }

        Ok(DeckList {
            main_deck,
            sideboard,
        })
    }

    /// `None` when the line isn't a card line at all
    fn parse_entry(line: &str) -> Option<Result<DeckEntry>> {
        let (count_str, rest) = line.split_once(' ')?;
        let count = count_str.trim_end_matches('x').parse::<u8>().ok()?;
        let name = rest.split_once('|').map_or(rest, |(name, _set)| name).trim();

        Some(
            catalog::canonical(name)
                .map(|card_name| DeckEntry { card_name, count })
                .ok_or_else(|| GoldfishError::UnknownCard(name.to_string())),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEntry {
    pub card_name: CardName,
    pub count: u8,
}

#[derive(Debug, Clone)]
pub struct DeckList {
    pub main_deck: Vec<DeckEntry>,
    pub sideboard: Vec<DeckEntry>,
}

impl DeckList {
    pub fn total_cards(&self) -> usize {
        self.main_deck.iter().map(|e| e.count as usize).sum()
    }

    pub fn sideboard_size(&self) -> usize {
        self.sideboard.iter().map(|e| e.count as usize).sum()
    }

    /// Main deck expanded to one name per card, in list order
    pub fn cards(&self) -> Vec<CardName> {
        self.main_deck
            .iter()
            .flat_map(|e| std::iter::repeat(e.card_name.clone()).take(e.count as usize))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dck_sections() {
        let content = r#"
[metadata]
Name=Burn

[Main]
20 Mountain
4 lightning bolt|M11

[Sideboard]
2 Searing Blaze
"#;

        let deck = DeckLoader::parse(content).unwrap();
        assert_eq!(deck.main_deck.len(), 2);
        assert_eq!(deck.total_cards(), 24);
        assert_eq!(deck.main_deck[1].card_name.as_str(), "Lightning Bolt");
        assert_eq!(deck.main_deck[1].count, 4);
        assert_eq!(deck.sideboard_size(), 2);
    }

    #[test]
    fn test_parse_plain_list() {
        let deck = DeckLoader::parse("# burn\n3x Fireblast\n2 Lava Dart\n").unwrap();
        let cards = deck.cards();
        assert_eq!(cards.len(), 5);
        assert!(cards[..3].iter().all(|c| c.is("Fireblast")));
        assert!(cards[3].is("Lava Dart"));
    }

    #[test]
    fn test_unknown_card() {
        let err = DeckLoader::parse("4 Grizzly Bears\n").unwrap_err();
        assert!(matches!(err, GoldfishError::UnknownCard(ref name) if name == "Grizzly Bears"));
    }

    #[test]
    fn test_malformed_line_and_empty_deck() {
        assert!(matches!(
            DeckLoader::parse("Mountain\n"),
            Err(GoldfishError::InvalidDeckFormat(_))
        ));
        assert!(matches!(
            DeckLoader::parse("[Main]\n# nothing\n"),
            Err(GoldfishError::InvalidDeckFormat(_))
        ));
    }
}
