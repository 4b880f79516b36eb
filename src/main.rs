//! Burn Goldfish - command line runner

use anyhow::{Context, Result};
use burn_goldfish::{
    core::CardName,
    game::VerbosityLevel,
    loader::DeckLoader,
    runner::{run_batch, run_single, GoldfishConfig, KillTurnStats},
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Verbosity level for game output (names or numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

#[derive(Parser)]
#[command(name = "goldfish")]
#[command(about = "Goldfish a burn deck and measure its kill turn", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a batch of games and print kill-turn statistics
    Run {
        /// Deck list (.dck or "N Card Name" lines)
        #[arg(value_name = "DECK")]
        deck: PathBuf,

        /// Number of games
        #[arg(long, default_value_t = 1000)]
        games: usize,

        /// Seed of the first game; game i uses seed + i
        #[arg(long)]
        seed: Option<u64>,

        /// Start on the draw instead of on the play
        #[arg(long)]
        draw: bool,

        /// Turn limit per game
        #[arg(long)]
        max_turns: Option<u32>,

        /// JSON config file; flags override its values
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,

        /// Verbosity level (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, short = 'v')]
        verbosity: Option<VerbosityArg>,
    },

    /// Play one game and print its full trace
    Trace {
        /// Deck list (.dck or "N Card Name" lines)
        #[arg(value_name = "DECK")]
        deck: PathBuf,

        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Start on the draw instead of on the play
        #[arg(long)]
        draw: bool,

        #[arg(long, default_value = "verbose", short = 'v')]
        verbosity: VerbosityArg,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            deck,
            games,
            seed,
            draw,
            max_turns,
            config,
            json,
            verbosity,
        } => {
            let mut config = match config {
                Some(path) => GoldfishConfig::load_from_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => GoldfishConfig::default(),
            };
            if let Some(seed) = seed {
                config.seed = seed;
            }
            if draw {
                config.on_the_play = false;
            }
            if let Some(max_turns) = max_turns {
                config.max_turns = max_turns;
            }
            if let Some(verbosity) = verbosity {
                config.verbosity = verbosity.into();
            }
            config.validate()?;

            let cards = load_deck(&deck)?;
            let start = Instant::now();
            let stats = run_batch(&cards, &config, games);
            let elapsed = start.elapsed();

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&deck, &config, &stats);
                if config.verbosity >= VerbosityLevel::Normal {
                    println!(
                        "\n{} games in {:.2}s ({:.0} games/s)",
                        stats.games,
                        elapsed.as_secs_f64(),
                        stats.games as f64 / elapsed.as_secs_f64()
                    );
                }
            }
        }

        Commands::Trace {
            deck,
            seed,
            draw,
            verbosity,
        } => {
            let config = GoldfishConfig {
                seed,
                on_the_play: !draw,
                ..GoldfishConfig::default()
            };
            let cards = load_deck(&deck)?;
            let trace = run_single(&cards, &config, seed, verbosity.into())
                .with_context(|| format!("game with seed {seed} failed"))?;

            for line in &trace.log {
                println!("{line}");
            }
        }
    }

    Ok(())
}

fn load_deck(path: &Path) -> Result<Vec<CardName>> {
    let deck = DeckLoader::load_from_file(path)
        .with_context(|| format!("loading deck {}", path.display()))?;
    Ok(deck.cards())
}

fn print_stats(deck: &Path, config: &GoldfishConfig, stats: &KillTurnStats) {
    println!("=== {} ===", deck.display());
    println!(
        "{} games {}, seed {}",
        stats.games,
        if config.on_the_play { "on the play" } else { "on the draw" },
        config.seed
    );

    match stats.average_kill_turn {
        Some(avg) => println!("Average kill turn: {avg:.2}"),
        None => println!("No kills"),
    }
    println!(
        "Mulligans per game: {:.2}",
        stats.total_mulligans as f64 / stats.games.max(1) as f64
    );

    println!("\nKill turn distribution:");
    let mut cumulative = 0;
    for (turn, count) in &stats.distribution {
        cumulative += count;
        println!(
            "  turn {turn:>2}: {count:>6} ({:>5.1}%, {:>5.1}% by then)",
            100.0 * *count as f64 / stats.games as f64,
            100.0 * cumulative as f64 / stats.games as f64
        );
    }

    if stats.turn_limit + stats.decked_out + stats.failed > 0 {
        println!(
            "\nNo kill: {} at the turn limit, {} decked out, {} failed",
            stats.turn_limit, stats.decked_out, stats.failed
        );
    }
}
