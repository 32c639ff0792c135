//! Command-line driver for the chessrules engine.
//!
//! ```bash
//! # Two players at one terminal
//! chessrules play
//!
//! # Replay a move list and print the final position
//! chessrules replay f2f3 e7e5 g2g4 d8h4
//!
//! # Same, as JSON
//! chessrules replay --json e2e4 e7e5
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`
//! (default `warn`).

use clap::{Parser, Subcommand};

use chessrules::terminal;

/// chessrules: a two-player chess rules engine.
#[derive(Parser, Debug)]
#[command(name = "chessrules")]
#[command(about = "Two-player chess rules engine with a terminal driver")]
#[command(version)]
struct Cli {
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a game in the terminal (two players, one keyboard).
    Play,

    /// Apply moves from the starting position and print the result.
    Replay {
        /// Moves in coordinate form, e.g. e2e4.
        #[arg(required = true)]
        moves: Vec<String>,

        /// Print the final game state as JSON instead of a diagram.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Play => terminal::run_terminal_game(),
        Commands::Replay { moves, json } => terminal::replay_moves(&moves, json)
            .map(|game| log::debug!("Replayed {} moves", game.history().len()))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e)),
    }
}
