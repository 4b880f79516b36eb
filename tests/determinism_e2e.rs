//! End-to-end determinism tests
//!
//! Plays every deck in `test_decks/` twice with the same seed and compares
//! the full verbose traces line by line.

use burn_goldfish::game::VerbosityLevel;
use burn_goldfish::loader::DeckLoader;
use burn_goldfish::runner::{run_batch, run_single, GoldfishConfig};
use similar_asserts::assert_eq;
use std::path::PathBuf;

fn test_decks() -> Vec<PathBuf> {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_decks");
    let mut decks: Vec<PathBuf> = std::fs::read_dir(&dir)
        .expect("test_decks/ exists")
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "dck"))
        .collect();
    decks.sort();
    decks
}

#[test]
fn test_deck_determinism() {
    let decks = test_decks();
    assert!(!decks.is_empty(), "no decks in test_decks/");

    for deck_path in decks {
        let cards = DeckLoader::load_from_file(&deck_path).unwrap().cards();
        assert_eq!(cards.len(), 60, "{} is not 60 cards", deck_path.display());

        for on_the_play in [true, false] {
            let config = GoldfishConfig {
                on_the_play,
                ..GoldfishConfig::default()
            };
            let run1 = run_single(&cards, &config, 42, VerbosityLevel::Verbose).unwrap();
            let run2 = run_single(&cards, &config, 42, VerbosityLevel::Verbose).unwrap();

            assert!(
                !run1.log.is_empty(),
                "{} produced an empty trace",
                deck_path.display()
            );
            assert_eq!(run1.log.join("\n"), run2.log.join("\n"));
            assert_eq!(run1.result, run2.result);
        }
    }
}

#[test]
fn test_different_seeds_differ() {
    let deck_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_decks/burn.dck");
    let cards = DeckLoader::load_from_file(&deck_path).unwrap().cards();
    let config = GoldfishConfig::default();

    let traces: Vec<Vec<String>> = (0..4)
        .map(|seed| {
            run_single(&cards, &config, seed, VerbosityLevel::Normal)
                .unwrap()
                .log
        })
        .collect();
    assert!(traces.windows(2).any(|pair| pair[0] != pair[1]));
}

#[test]
fn test_batch_matches_single_games() {
    let deck_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_decks/burn.dck");
    let cards = DeckLoader::load_from_file(&deck_path).unwrap().cards();
    let config = GoldfishConfig {
        seed: 100,
        ..GoldfishConfig::default()
    };

    let stats = run_batch(&cards, &config, 16);
    let kills = (0..16)
        .map(|i| run_single(&cards, &config, 100 + i, VerbosityLevel::Silent).unwrap())
        .filter(|trace| trace.result.kill_turn.is_some())
        .count();
    assert_eq!(stats.kills, kills);
    assert_eq!(stats.failed, 0);
}
