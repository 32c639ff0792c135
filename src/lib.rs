//! # chessrules: a two-player chess rules engine
//!
//! Given a position and a requested move, the engine decides legality,
//! updates the board and detects check and checkmate. Presentation is
//! left to the caller: the engine reports what changed (captures, the
//! castling rook's new square, check status) and the caller renders it.
//!
//! ## Layout
//!
//! | Module        | Responsibility                                        |
//! |---------------|-------------------------------------------------------|
//! | [`types`]     | Colors, pieces, squares and the 8×8 board             |
//! | [`rules`]     | Per-piece movement shapes and path clearance          |
//! | [`attacks`]   | "Is this square attacked by that color"               |
//! | [`movegen`]   | Move validation, castling, simulate/undo, checkmate   |
//! | [`game`]      | Turn order, king tracking, committed moves            |
//! | [`terminal`]  | Text driver used by the `chessrules` binary           |
//!
//! ## Example
//!
//! ```
//! use chessrules::game::{CheckStatus, GameState, MoveOutcome};
//! use chessrules::types::Square;
//!
//! let mut game = GameState::new();
//! let sq = |s| Square::from_algebraic(s).unwrap();
//! for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4")] {
//!     assert!(game.attempt_move(sq(from), sq(to)).is_applied());
//! }
//! match game.attempt_move(sq("d8"), sq("h4")) {
//!     MoveOutcome::Applied(report) => assert_eq!(report.status, CheckStatus::Checkmate),
//!     MoveOutcome::Rejected(reason) => panic!("{}", reason),
//! }
//! ```
//!
//! Not implemented: en passant, promotion, draw detection, and any record
//! of whether a king or rook has moved (castling is judged from the
//! current board alone).

pub mod attacks;
pub mod game;
pub mod movegen;
pub mod rules;
pub mod terminal;
pub mod types;
