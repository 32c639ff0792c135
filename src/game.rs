//! Game state management for the chessrules engine.
//!
//! [`GameState`] is the only owner of committed board mutation. It keeps
//! the side to move and a cached square for each king, and turns a move
//! request into a [`MoveOutcome`]: either a rejection with its reason, or
//! a report of what changed on the board and whether the opponent is now
//! in check or checkmated.

use crate::movegen::{self, ChessMove};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Check status of the side to move after a committed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    NoCheck,
    Check,
    Checkmate,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::NoCheck => write!(f, "no check"),
            CheckStatus::Check => write!(f, "check"),
            CheckStatus::Checkmate => write!(f, "checkmate"),
        }
    }
}

/// Why a move request was turned down.
///
/// Rejection is an ordinary result, not a fault: the board and the turn
/// are left exactly as they were.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// A checkmate has already ended the game.
    GameOver,
    /// There is no piece on the origin square.
    EmptySquare,
    /// The piece belongs to the side not on move.
    WrongTurn,
    /// The piece cannot move that way.
    IllegalMove,
    /// The move would leave the mover's own king attacked.
    LeavesKingInCheck,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::GameOver => write!(f, "the game is already over"),
            RejectReason::EmptySquare => write!(f, "there is no piece on that square"),
            RejectReason::WrongTurn => write!(f, "that piece belongs to the other side"),
            RejectReason::IllegalMove => write!(f, "that piece cannot move there"),
            RejectReason::LeavesKingInCheck => write!(f, "that move leaves the king in check"),
        }
    }
}

/// A piece removed from the board by a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    pub piece: Piece,
    pub square: Square,
}

/// What a committed move changed, for the presentation layer to mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
    pub captured: Option<Capture>,
    /// Castling rook relocation `(from, to)`.
    pub rook_move: Option<(Square, Square)>,
    /// Status of the opponent, who is now on move.
    pub status: CheckStatus,
}

/// Result of [`GameState::attempt_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Applied(MoveReport),
    Rejected(RejectReason),
}

impl MoveOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveOutcome::Applied(_))
    }
}

/// A record of a single committed move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Which side made the move.
    pub side: Color,
    /// Coordinate notation, e.g. "e2e4".
    pub notation: String,
    pub report: MoveReport,
}

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// A two-player game: board, side to move and cached king squares.
///
/// The board is the source of truth; `white_king` and `black_king` mirror
/// it and are updated whenever a king moves or castles.
///
/// Deserialization goes through [`GameState::from_board`], so the saved
/// king squares are ignored and recomputed from the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SavedGame")]
pub struct GameState {
    board: Board,
    turn: Color,
    white_king: Square,
    black_king: Square,
    history: Vec<MoveRecord>,
    /// Set once a checkmate has been delivered.
    winner: Option<Color>,
}

/// Serialized form of a [`GameState`] as read back from storage.
#[derive(Deserialize)]
struct SavedGame {
    board: Board,
    turn: Color,
    #[serde(default)]
    history: Vec<MoveRecord>,
    #[serde(default)]
    winner: Option<Color>,
}

impl TryFrom<SavedGame> for GameState {
    type Error = String;

    fn try_from(saved: SavedGame) -> Result<Self, String> {
        let mut game = GameState::from_board(saved.board, saved.turn)?;
        game.history = saved.history;
        if saved.winner.is_some() {
            game.winner = saved.winner;
        }
        Ok(game)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Creates a new game from the standard starting position, White to move.
    pub fn new() -> Self {
        Self {
            board: Board::starting_position(),
            turn: Color::White,
            white_king: Square::new(Color::White.back_row(), 4),
            black_king: Square::new(Color::Black.back_row(), 4),
            history: Vec::new(),
            winner: None,
        }
    }

    /// Creates a game from an arbitrary position.
    ///
    /// Fails unless the board holds exactly one king of each color, and
    /// when the side not on move is in check (its king could be taken).
    pub fn from_board(board: Board, turn: Color) -> Result<Self, String> {
        let locate = |color: Color| -> Result<Square, String> {
            let kings: Vec<Square> = board
                .pieces(color)
                .filter(|(_, p)| p.kind == PieceKind::King)
                .map(|(sq, _)| sq)
                .collect();
            match kings.as_slice() {
                [sq] => Ok(*sq),
                [] => Err(format!("No {} king on the board", color)),
                _ => Err(format!("{} {} kings on the board", kings.len(), color)),
            }
        };

        let white_king = locate(Color::White)?;
        let black_king = locate(Color::Black)?;
        let mut game = Self {
            board,
            turn,
            white_king,
            black_king,
            history: Vec::new(),
            winner: None,
        };

        let waiting = turn.opponent();
        if movegen::is_in_check(&game.board, game.king_square(waiting), waiting) {
            return Err(format!("{} is in check but {} is to move", waiting, turn));
        }

        if game.is_checkmated(turn) {
            game.winner = Some(turn.opponent());
        }
        Ok(game)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side to move.
    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn king_square(&self, color: Color) -> Square {
        match color {
            Color::White => self.white_king,
            Color::Black => self.black_king,
        }
    }

    fn set_king_square(&mut self, color: Color, sq: Square) {
        match color {
            Color::White => self.white_king = sq,
            Color::Black => self.black_king = sq,
        }
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// The side that delivered checkmate, if the game is over.
    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Returns `true` if the side to move is in check.
    pub fn is_check(&self) -> bool {
        movegen::is_in_check(&self.board, self.king_square(self.turn), self.turn)
    }

    fn is_checkmated(&mut self, color: Color) -> bool {
        let king_sq = self.king_square(color);
        movegen::is_checkmate(&mut self.board, king_sq, color)
    }

    /// Destinations for the piece on `from` that do not expose its own king.
    ///
    /// Works for either color so a presentation layer can preview moves.
    pub fn legal_destinations(&mut self, from: Square) -> Vec<Square> {
        let Some(piece) = self.board.piece_at(from) else {
            return Vec::new();
        };
        let king_sq = self.king_square(piece.color);
        movegen::safe_moves_for(&mut self.board, from, king_sq)
    }

    /// All moves available to the side to move.
    pub fn legal_moves(&mut self) -> Vec<ChessMove> {
        if self.is_over() {
            return Vec::new();
        }
        let king_sq = self.king_square(self.turn);
        movegen::safe_moves(&mut self.board, self.turn, king_sq)
    }

    /// Attempts to move the piece on `from` to `to`.
    ///
    /// On success the move is committed, the turn passes and the report
    /// says whether the opponent is in check or checkmated. On rejection
    /// nothing changes.
    pub fn attempt_move(&mut self, from: Square, to: Square) -> MoveOutcome {
        match self.commit_move(from, to) {
            Ok(report) => MoveOutcome::Applied(report),
            Err(reason) => {
                log::debug!("Rejected {}{}: {}", from, to, reason);
                MoveOutcome::Rejected(reason)
            }
        }
    }

    fn commit_move(&mut self, from: Square, to: Square) -> Result<MoveReport, RejectReason> {
        if self.is_over() {
            return Err(RejectReason::GameOver);
        }

        let piece = self.board.piece_at(from).ok_or(RejectReason::EmptySquare)?;
        if piece.color != self.turn {
            return Err(RejectReason::WrongTurn);
        }
        if !movegen::is_legal_move(&self.board, piece, from, to) {
            return Err(RejectReason::IllegalMove);
        }

        let king_sq = self.king_square(self.turn);
        if movegen::simulate_and_check(&mut self.board, from, to, king_sq, self.turn) {
            return Err(RejectReason::LeavesKingInCheck);
        }

        let applied =
            movegen::apply_move_to_board(&mut self.board, from, to).ok_or(RejectReason::EmptySquare)?;

        if piece.kind == PieceKind::King {
            self.set_king_square(piece.color, to);
        }

        let mover = self.turn;
        self.turn = mover.opponent();

        let status = if !self.is_check() {
            CheckStatus::NoCheck
        } else if self.is_checkmated(self.turn) {
            self.winner = Some(mover);
            log::info!("Checkmate: {} wins", mover);
            CheckStatus::Checkmate
        } else {
            log::info!("{} is in check", self.turn);
            CheckStatus::Check
        };

        let report = MoveReport {
            piece,
            from,
            to,
            captured: applied.captured.map(|piece| Capture { piece, square: to }),
            rook_move: applied.rook_move,
            status,
        };

        let notation = ChessMove::new(from, to).to_string();
        log::debug!("{} played {} ({})", mover, notation, status);
        self.history.push(MoveRecord {
            side: mover,
            notation,
            report,
        });

        Ok(report)
    }
}
