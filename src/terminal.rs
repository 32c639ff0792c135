//! Terminal driver for the chessrules engine.
//!
//! A thin text front end over [`GameState`]: it reads coordinate moves
//! from standard input, hands them to the engine and prints the engine's
//! reports. Two players share one keyboard.

use colored::Colorize;
use std::io::{self, BufRead, Write};

use crate::game::{CheckStatus, GameState, MoveOutcome, MoveReport};
use crate::types::*;

/// Renders the board with colored pieces, rank 8 at the top.
pub fn print_board(game: &GameState) {
    println!();
    println!("  +---+---+---+---+---+---+---+---+");

    for row in 0..8u8 {
        print!("{} ", 8 - row);
        for col in 0..8u8 {
            let sq = Square::new(row, col);
            let is_dark_square = (row + col) % 2 == 1;

            let piece_str = match game.board().piece_at(sq) {
                Some(piece) => {
                    let symbol = piece.to_char().to_string();
                    if piece.color == Color::White {
                        symbol.white().bold().to_string()
                    } else {
                        symbol.blue().bold().to_string()
                    }
                }
                None => {
                    if is_dark_square {
                        "·".dimmed().to_string()
                    } else {
                        " ".to_string()
                    }
                }
            };

            print!("| {} ", piece_str);
        }
        println!("|");
        println!("  +---+---+---+---+---+---+---+---+");
    }
    println!("    a   b   c   d   e   f   g   h");
    println!();
}

fn side_label(color: Color) -> colored::ColoredString {
    match color {
        Color::White => "White".white().bold(),
        Color::Black => "Black".blue().bold(),
    }
}

/// Prints whose turn it is and whether they are in check.
pub fn print_status(game: &mut GameState) {
    if let Some(winner) = game.winner() {
        println!("{} {}", "Checkmate!".red().bold(), format!("{} wins.", winner).green());
        return;
    }

    print!("{} to move", side_label(game.turn()));
    if game.is_check() {
        print!("  {}", "CHECK".red().bold());
    }
    println!("  ({} legal moves)", game.legal_moves().len());
}

/// Prints one line describing an applied move.
pub fn print_report(report: &MoveReport) {
    let mut line = format!("{} {} {} -> {}", report.piece.color, report.piece.kind, report.from, report.to);
    if let Some(capture) = report.captured {
        line.push_str(&format!(", captures {} on {}", capture.piece, capture.square));
    }
    if let Some((rook_from, rook_to)) = report.rook_move {
        line.push_str(&format!(", rook {} -> {}", rook_from, rook_to));
    }
    match report.status {
        CheckStatus::NoCheck => println!("{}", line),
        CheckStatus::Check => println!("{}  {}", line, "check".yellow().bold()),
        CheckStatus::Checkmate => println!("{}  {}", line, "checkmate".red().bold()),
    }
}

/// Prints available commands in the terminal.
pub fn print_help() {
    println!("{}", "Commands:".yellow().bold());
    println!("  {}      - move a piece (coordinates)", "e2e4".green());
    println!("  {}  - legal destinations of the piece on e2", "moves e2".green());
    println!("  {}     - all legal moves", "moves".green());
    println!("  {}     - show the board", "board".green());
    println!("  {}   - list moves played", "history".green());
    println!("  {}      - print the game state as JSON", "json".green());
    println!("  {}      - show this help", "help".green());
    println!("  {}      - leave", "quit".green());
    println!();
}

/// Prints the move history.
pub fn print_history(game: &GameState) {
    if game.history().is_empty() {
        println!("No moves yet.");
        return;
    }

    println!("{}", "Moves:".yellow().bold());
    for (i, record) in game.history().iter().enumerate() {
        println!("  {}. {} {}", i + 1, side_label(record.side), record.notation);
    }
    println!();
}

fn print_json(game: &GameState) {
    match serde_json::to_string_pretty(game) {
        Ok(json) => println!("{}", json),
        Err(e) => println!("{}: {}", "Error".red().bold(), e),
    }
}

/// Runs the interactive two-player game until checkmate or `quit`.
pub fn run_terminal_game() -> io::Result<()> {
    println!();
    println!("{}", "╔═══════════════════════════════╗".cyan());
    println!("{}", "║   chessrules: two players     ║".cyan());
    println!("{}", "╚═══════════════════════════════╝".cyan());
    println!();

    let mut game = GameState::new();

    print_help();
    print_board(&game);
    print_status(&mut game);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        if game.is_over() {
            break;
        }

        print!("{} > ", side_label(game.turn()));
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let input = line?.trim().to_lowercase();

        if input.is_empty() {
            continue;
        }

        let mut words = input.split_whitespace();
        match words.next().unwrap_or("") {
            "quit" | "exit" | "q" => {
                println!("Goodbye.");
                break;
            }
            "help" | "h" | "?" => print_help(),
            "board" | "b" => {
                print_board(&game);
                print_status(&mut game);
            }
            "history" => print_history(&game),
            "json" | "j" => print_json(&game),
            "moves" | "m" => match words.next() {
                Some(name) => match Square::from_algebraic(name) {
                    Ok(from) => {
                        let dests: Vec<String> =
                            game.legal_destinations(from).iter().map(|s| s.to_string()).collect();
                        println!("{}: {}", from, dests.join(" "));
                    }
                    Err(e) => println!("{}: {}", "Error".red().bold(), e),
                },
                None => {
                    let moves: Vec<String> = game.legal_moves().iter().map(|m| m.to_string()).collect();
                    println!("{} {}", "Legal moves:".yellow().bold(), moves.join(" "));
                }
            },
            _ => match parse_move_input(&input) {
                Ok((from, to)) => match game.attempt_move(from, to) {
                    MoveOutcome::Applied(report) => {
                        print_report(&report);
                        print_board(&game);
                        print_status(&mut game);
                    }
                    MoveOutcome::Rejected(reason) => {
                        println!("{}: {}", "Illegal move".red().bold(), reason);
                    }
                },
                Err(_) => println!("Unknown command '{}'. Type {} for commands.", input, "help".green()),
            },
        }
    }

    Ok(())
}

/// Plays `moves` from the starting position, printing each outcome.
///
/// Stops at the first rejected move and returns it as an error.
pub fn replay_moves(moves: &[String], as_json: bool) -> Result<GameState, String> {
    let mut game = GameState::new();

    for (i, text) in moves.iter().enumerate() {
        let (from, to) = parse_move_input(text)?;
        match game.attempt_move(from, to) {
            MoveOutcome::Applied(report) => {
                if !as_json {
                    print!("{:>3}. ", i + 1);
                    print_report(&report);
                }
            }
            MoveOutcome::Rejected(reason) => {
                return Err(format!("Move {} ({}) rejected: {}", i + 1, text, reason));
            }
        }
    }

    if as_json {
        let json = serde_json::to_string_pretty(&game).map_err(|e| e.to_string())?;
        println!("{}", json);
    } else {
        println!();
        println!("{}", game.board());
        println!();
        print_status(&mut game);
    }

    Ok(game)
}

/// Parses a move input string like "e2e4" or "e2 e4".
pub fn parse_move_input(input: &str) -> Result<(Square, Square), String> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.len() != 4 || !compact.is_ascii() {
        return Err(format!("Expected a move like e2e4, got '{}'", input));
    }

    let from = Square::from_algebraic(&compact[0..2])?;
    let to = Square::from_algebraic(&compact[2..4])?;
    Ok((from, to))
}
