//! Move validation, check and checkmate detection.
//!
//! Legality is layered:
//!
//! - [`is_legal_move`] is *shape-legal* only. It follows the movement
//!   rules, blocking, occupancy and castling conditions but does not ask
//!   whether the mover's own king is left in check.
//! - [`safe_moves_for`] and [`is_checkmate`] add the check filter by
//!   simulating each candidate on the live board and undoing it.
//!
//! Castling is validated geometrically. Nothing records whether the king
//! or rook has moved before, so a king and rook that moved away and came
//! back may castle again.

use crate::attacks;
use crate::rules;
use crate::types::*;

// ---------------------------------------------------------------------------
// Move representation
// ---------------------------------------------------------------------------

/// A candidate move: origin and destination square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChessMove {
    pub from: Square,
    pub to: Square,
}

impl ChessMove {
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

impl std::fmt::Display for ChessMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// Everything needed to take back a move applied with [`apply_move_to_board`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMove {
    pub from: Square,
    pub to: Square,
    /// The piece that moved.
    pub piece: Piece,
    /// The piece that stood on `to` before the move, if any.
    pub captured: Option<Piece>,
    /// Rook relocation `(from, to)` when the move was a castle.
    pub rook_move: Option<(Square, Square)>,
}

// ---------------------------------------------------------------------------
// Shape legality
// ---------------------------------------------------------------------------

/// Returns `true` if `from -> to` has the two-column castling shape.
pub fn is_castling_shape(from: Square, to: Square) -> bool {
    from.row == to.row && (to.col as i8 - from.col as i8).abs() == 2
}

/// Column of the rook a castling king moves toward.
fn castling_rook_col(from: Square, to: Square) -> u8 {
    if to.col > from.col { 7 } else { 0 }
}

/// Returns `true` if a king of `color` may castle from `from` to `to`.
///
/// - The rook square in the direction of travel holds a rook of `color`.
/// - Every square between king and rook is empty.
/// - None of the squares the king starts on, crosses or lands on is
///   attacked by the opponent.
pub fn is_castling_legal(board: &Board, color: Color, from: Square, to: Square) -> bool {
    if !is_castling_shape(from, to) {
        return false;
    }

    let rook_sq = Square::new(from.row, castling_rook_col(from, to));
    // Stricter than the bare geometry: the corner must hold our own rook.
    let rook_present = matches!(
        board.piece_at(rook_sq),
        Some(Piece { kind: PieceKind::Rook, color: c }) if c == color
    );
    if !rook_present || !rules::is_path_clear(board, from, rook_sq) {
        return false;
    }

    let step: i8 = if to.col > from.col { 1 } else { -1 };
    let mut cur = from;
    loop {
        if attacks::is_square_attacked(board, cur, color.opponent()) {
            return false;
        }
        if cur == to {
            return true;
        }
        match cur.offset(0, step) {
            Some(next) => cur = next,
            None => return false,
        }
    }
}

/// Returns `true` if `piece` may move from `from` to `to` by its movement
/// rules on the current board.
///
/// This validator is check-blind: it accepts moves that leave the mover's
/// own king attacked.
pub fn is_legal_move(board: &Board, piece: Piece, from: Square, to: Square) -> bool {
    if from == to || board.is_occupied_by(to, piece.color) {
        return false;
    }

    match piece.kind {
        PieceKind::King => {
            if is_castling_shape(from, to) {
                is_castling_legal(board, piece.color, from, to)
            } else {
                rules::is_king_shape(from, to)
            }
        }
        PieceKind::Queen => rules::is_queen_shape(from, to) && rules::is_path_clear(board, from, to),
        PieceKind::Rook => rules::is_rook_shape(from, to) && rules::is_path_clear(board, from, to),
        PieceKind::Bishop => rules::is_bishop_shape(from, to) && rules::is_path_clear(board, from, to),
        PieceKind::Knight => rules::is_knight_shape(from, to),
        PieceKind::Pawn => rules::is_valid_pawn_move(board, from, to, piece.color),
    }
}

// ---------------------------------------------------------------------------
// Enumeration
// ---------------------------------------------------------------------------

/// Returns every destination `piece` on `from` can reach by shape legality.
///
/// This is the set before check filtering.
pub fn legal_moves_for(board: &Board, piece: Piece, from: Square) -> Vec<Square> {
    Square::all()
        .filter(|&to| is_legal_move(board, piece, from, to))
        .collect()
}

/// Returns every shape-legal move of every piece of `color`.
pub fn all_possible_moves(board: &Board, color: Color) -> Vec<ChessMove> {
    let mut moves = Vec::with_capacity(64);
    for (from, piece) in board.pieces(color) {
        for to in legal_moves_for(board, piece, from) {
            moves.push(ChessMove::new(from, to));
        }
    }
    moves
}

/// Returns the destinations of the piece on `from` that do not leave its
/// own king (currently on `king_sq`) in check.
///
/// Empty if `from` is empty.
pub fn safe_moves_for(board: &mut Board, from: Square, king_sq: Square) -> Vec<Square> {
    let Some(piece) = board.piece_at(from) else {
        return Vec::new();
    };

    legal_moves_for(board, piece, from)
        .into_iter()
        .filter(|&to| !simulate_and_check(board, from, to, king_sq, piece.color))
        .collect()
}

/// Returns every move of `color` that does not leave its king in check.
pub fn safe_moves(board: &mut Board, color: Color, king_sq: Square) -> Vec<ChessMove> {
    all_possible_moves(board, color)
        .into_iter()
        .filter(|mv| !simulate_and_check(board, mv.from, mv.to, king_sq, color))
        .collect()
}

// ---------------------------------------------------------------------------
// Apply / undo
// ---------------------------------------------------------------------------

/// Applies a move to the board without any legality check.
///
/// Lifts any piece on `to`, and for a king moving two columns also moves
/// the rook from its corner to the square the king crossed. Returns `None`
/// (leaving the board untouched) if `from` is empty.
pub fn apply_move_to_board(board: &mut Board, from: Square, to: Square) -> Option<AppliedMove> {
    let piece = board.piece_at(from)?;

    let rook_move = if piece.kind == PieceKind::King && is_castling_shape(from, to) {
        let rook_from = Square::new(from.row, castling_rook_col(from, to));
        let rook_to = Square::new(from.row, (from.col + to.col) / 2);
        // Only a rook that can actually slide over is carried along
        let has_rook = board.is_occupied_by(rook_from, piece.color)
            && board.piece_at(rook_from).map(|p| p.kind) == Some(PieceKind::Rook);
        (has_rook && !board.is_occupied(rook_to)).then_some((rook_from, rook_to))
    } else {
        None
    };

    let captured = board.move_piece(from, to);
    if let Some((rook_from, rook_to)) = rook_move {
        board.move_piece(rook_from, rook_to);
    }

    Some(AppliedMove {
        from,
        to,
        piece,
        captured,
        rook_move,
    })
}

/// Restores the board to its state before `applied` was made.
pub fn undo_move_on_board(board: &mut Board, applied: &AppliedMove) {
    if let Some((rook_from, rook_to)) = applied.rook_move {
        board.move_piece(rook_to, rook_from);
    }
    board.remove(applied.to);
    board.place(applied.from, applied.piece);
    if let Some(captured) = applied.captured {
        board.place(applied.to, captured);
    }
}

// ---------------------------------------------------------------------------
// Check & checkmate
// ---------------------------------------------------------------------------

/// Returns `true` if the king of `king_color` on `king_sq` is attacked.
pub fn is_in_check(board: &Board, king_sq: Square, king_color: Color) -> bool {
    attacks::is_king_in_check(board, king_sq, king_color)
}

/// Plays `from -> to` on the live board, reports whether the king of
/// `king_color` is then in check, and restores the board exactly.
///
/// `king_sq` is the king's square before the move; if the king itself is
/// the piece moving, its destination is tested instead. The `&mut` borrow
/// guarantees nothing else observes the board mid-simulation.
pub fn simulate_and_check(
    board: &mut Board,
    from: Square,
    to: Square,
    king_sq: Square,
    king_color: Color,
) -> bool {
    let Some(applied) = apply_move_to_board(board, from, to) else {
        return is_in_check(board, king_sq, king_color);
    };

    let king_now = if from == king_sq { to } else { king_sq };
    let in_check = is_in_check(board, king_now, king_color);

    undo_move_on_board(board, &applied);
    in_check
}

/// Returns `true` if the king of `king_color` on `king_sq` is checkmated.
///
/// Not in check means not mated. Otherwise every king move is tried first,
/// then every move of every piece of that color; any that leaves the king
/// safe refutes the mate.
pub fn is_checkmate(board: &mut Board, king_sq: Square, king_color: Color) -> bool {
    if !is_in_check(board, king_sq, king_color) {
        return false;
    }

    let king = Piece::new(PieceKind::King, king_color);
    for to in legal_moves_for(board, king, king_sq) {
        if !simulate_and_check(board, king_sq, to, king_sq, king_color) {
            return false;
        }
    }

    for mv in all_possible_moves(board, king_color) {
        if !simulate_and_check(board, mv.from, mv.to, king_sq, king_color) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: u8, col: u8) -> Square {
        Square::new(row, col)
    }

    fn board_with(pieces: &[(u8, u8, PieceKind, Color)]) -> Board {
        let mut board = Board::default();
        for &(row, col, kind, color) in pieces {
            board.place(sq(row, col), Piece::new(kind, color));
        }
        board
    }

    /// White king boxed in on e1 by its own rooks and pawns.
    fn back_rank_box() -> Board {
        board_with(&[
            (7, 4, PieceKind::King, Color::White),
            (7, 3, PieceKind::Rook, Color::White),
            (7, 5, PieceKind::Rook, Color::White),
            (6, 3, PieceKind::Pawn, Color::White),
            (6, 5, PieceKind::Pawn, Color::White),
            (0, 0, PieceKind::King, Color::Black),
        ])
    }

    #[test]
    fn test_starting_position_has_20_moves() {
        let mut board = Board::starting_position();
        assert_eq!(all_possible_moves(&board, Color::White).len(), 20);
        assert_eq!(safe_moves(&mut board, Color::Black, sq(0, 4)).len(), 20);
    }

    #[test]
    fn test_shape_table_on_empty_board() {
        let from = sq(4, 3);
        for kind in [
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
            PieceKind::King,
        ] {
            let mut board = Board::default();
            let piece = Piece::new(kind, Color::White);
            board.place(from, piece);
            for to in Square::all() {
                let expected = match kind {
                    PieceKind::Knight => rules::is_knight_shape(from, to),
                    PieceKind::Bishop => rules::is_bishop_shape(from, to),
                    PieceKind::Rook => rules::is_rook_shape(from, to),
                    PieceKind::Queen => rules::is_queen_shape(from, to),
                    _ => rules::is_king_shape(from, to),
                };
                assert_eq!(
                    is_legal_move(&board, piece, from, to),
                    expected,
                    "{} {} -> {}",
                    kind,
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_move_counts_from_edges() {
        let board = Board::default();
        let white = |kind| Piece::new(kind, Color::White);
        assert_eq!(legal_moves_for(&board, white(PieceKind::Rook), sq(0, 0)).len(), 14);
        assert_eq!(legal_moves_for(&board, white(PieceKind::Bishop), sq(0, 0)).len(), 7);
        assert_eq!(legal_moves_for(&board, white(PieceKind::Queen), sq(7, 7)).len(), 21);
        assert_eq!(legal_moves_for(&board, white(PieceKind::Knight), sq(7, 7)).len(), 2);
        assert_eq!(legal_moves_for(&board, white(PieceKind::King), sq(0, 7)).len(), 3);
        assert_eq!(legal_moves_for(&board, white(PieceKind::Queen), sq(3, 3)).len(), 27);
    }

    #[test]
    fn test_own_piece_blocks_destination_and_opponent_is_capture() {
        let board = board_with(&[
            (4, 4, PieceKind::Rook, Color::White),
            (4, 6, PieceKind::Pawn, Color::White),
            (2, 4, PieceKind::Pawn, Color::Black),
        ]);
        let rook = Piece::new(PieceKind::Rook, Color::White);
        assert!(!is_legal_move(&board, rook, sq(4, 4), sq(4, 6)));
        assert!(!is_legal_move(&board, rook, sq(4, 4), sq(4, 7)));
        assert!(is_legal_move(&board, rook, sq(4, 4), sq(4, 5)));
        assert!(is_legal_move(&board, rook, sq(4, 4), sq(2, 4)));
        assert!(!is_legal_move(&board, rook, sq(4, 4), sq(1, 4)));
    }

    #[test]
    fn test_each_intermediate_square_blocks_sliders() {
        let from = sq(7, 0);
        let to = sq(0, 0);
        for kind in [PieceKind::Rook, PieceKind::Queen] {
            for row in 1..7u8 {
                let mut board = Board::default();
                board.place(sq(row, 0), Piece::new(PieceKind::Pawn, Color::Black));
                let piece = Piece::new(kind, Color::White);
                assert!(!is_legal_move(&board, piece, from, to), "{} blocked at row {}", kind, row);
            }
        }
        for step in 1..7u8 {
            let mut board = Board::default();
            board.place(sq(7 - step, step), Piece::new(PieceKind::Knight, Color::White));
            let bishop = Piece::new(PieceKind::Bishop, Color::Black);
            assert!(!is_legal_move(&board, bishop, sq(7, 0), sq(0, 7)));
        }
    }

    #[test]
    fn test_knight_jumps_over_pieces() {
        let mut board = Board::starting_position();
        let knight = Piece::new(PieceKind::Knight, Color::White);
        assert!(is_legal_move(&board, knight, sq(7, 6), sq(5, 5)));
        assert!(is_legal_move(&board, knight, sq(7, 6), sq(5, 7)));
        assert!(!is_legal_move(&board, knight, sq(7, 6), sq(6, 4)));
        assert_eq!(safe_moves_for(&mut board, sq(7, 6), sq(7, 4)).len(), 2);
    }

    #[test]
    fn test_pinned_piece_filtered_but_shape_legal() {
        // White bishop on e2 pinned by a black rook on e8
        let mut board = board_with(&[
            (7, 4, PieceKind::King, Color::White),
            (6, 4, PieceKind::Bishop, Color::White),
            (0, 4, PieceKind::Rook, Color::Black),
            (0, 0, PieceKind::King, Color::Black),
        ]);
        let bishop = Piece::new(PieceKind::Bishop, Color::White);
        assert!(is_legal_move(&board, bishop, sq(6, 4), sq(5, 5)));
        assert!(!legal_moves_for(&board, bishop, sq(6, 4)).is_empty());
        assert!(safe_moves_for(&mut board, sq(6, 4), sq(7, 4)).is_empty());
    }

    #[test]
    fn test_king_cannot_step_into_attack() {
        let mut board = board_with(&[
            (7, 4, PieceKind::King, Color::White),
            (0, 3, PieceKind::Rook, Color::Black),
            (0, 7, PieceKind::King, Color::Black),
        ]);
        let safe = safe_moves_for(&mut board, sq(7, 4), sq(7, 4));
        assert!(!safe.contains(&sq(7, 3)));
        assert!(!safe.contains(&sq(6, 3)));
        assert!(safe.contains(&sq(6, 4)));
        assert!(safe.contains(&sq(7, 5)));
    }

    #[test]
    fn test_kingside_castle_legal_and_applied() {
        let mut board = board_with(&[
            (7, 4, PieceKind::King, Color::White),
            (7, 7, PieceKind::Rook, Color::White),
            (0, 4, PieceKind::King, Color::Black),
        ]);
        let king = Piece::new(PieceKind::King, Color::White);
        assert!(is_legal_move(&board, king, sq(7, 4), sq(7, 6)));

        let applied = apply_move_to_board(&mut board, sq(7, 4), sq(7, 6)).unwrap();
        assert_eq!(applied.rook_move, Some((sq(7, 7), sq(7, 5))));
        assert_eq!(board.piece_at(sq(7, 6)), Some(king));
        assert_eq!(
            board.piece_at(sq(7, 5)),
            Some(Piece::new(PieceKind::Rook, Color::White))
        );
        assert!(!board.is_occupied(sq(7, 7)));
        assert!(!board.is_occupied(sq(7, 4)));
    }

    #[test]
    fn test_castle_through_attacked_square_rejected() {
        let board = board_with(&[
            (7, 4, PieceKind::King, Color::White),
            (7, 7, PieceKind::Rook, Color::White),
            (0, 5, PieceKind::Rook, Color::Black),
            (0, 0, PieceKind::King, Color::Black),
        ]);
        let king = Piece::new(PieceKind::King, Color::White);
        assert!(!is_legal_move(&board, king, sq(7, 4), sq(7, 6)));
    }

    #[test]
    fn test_castle_out_of_or_into_check_rejected() {
        let king = Piece::new(PieceKind::King, Color::White);
        for attacker_col in [4u8, 6] {
            let board = board_with(&[
                (7, 4, PieceKind::King, Color::White),
                (7, 7, PieceKind::Rook, Color::White),
                (0, attacker_col, PieceKind::Rook, Color::Black),
                (0, 0, PieceKind::King, Color::Black),
            ]);
            assert!(!is_legal_move(&board, king, sq(7, 4), sq(7, 6)));
        }
    }

    #[test]
    fn test_queenside_castle_requires_clear_b_file() {
        let mut board = board_with(&[
            (7, 4, PieceKind::King, Color::White),
            (7, 0, PieceKind::Rook, Color::White),
            (0, 4, PieceKind::King, Color::Black),
        ]);
        let king = Piece::new(PieceKind::King, Color::White);
        assert!(is_legal_move(&board, king, sq(7, 4), sq(7, 2)));

        // b1 only needs to be empty, not safe
        board.place(sq(0, 1), Piece::new(PieceKind::Rook, Color::Black));
        assert!(is_legal_move(&board, king, sq(7, 4), sq(7, 2)));

        board.place(sq(7, 1), Piece::new(PieceKind::Knight, Color::White));
        assert!(!is_legal_move(&board, king, sq(7, 4), sq(7, 2)));
    }

    #[test]
    fn test_castle_without_rook_rejected() {
        let board = board_with(&[
            (7, 4, PieceKind::King, Color::White),
            (7, 7, PieceKind::Bishop, Color::White),
            (0, 4, PieceKind::King, Color::Black),
        ]);
        let king = Piece::new(PieceKind::King, Color::White);
        assert!(!is_legal_move(&board, king, sq(7, 4), sq(7, 6)));
        assert!(!is_legal_move(&board, king, sq(7, 4), sq(7, 2)));
    }

    #[test]
    fn test_back_rank_checkmate() {
        let mut board = back_rank_box();
        board.place(sq(1, 4), Piece::new(PieceKind::Queen, Color::Black));
        assert!(is_in_check(&board, sq(7, 4), Color::White));
        assert!(is_checkmate(&mut board, sq(7, 4), Color::White));
        assert!(safe_moves(&mut board, Color::White, sq(7, 4)).is_empty());
    }

    #[test]
    fn test_no_checkmate_without_check() {
        let mut board = back_rank_box();
        assert!(!is_in_check(&board, sq(7, 4), Color::White));
        assert!(!is_checkmate(&mut board, sq(7, 4), Color::White));
    }

    #[test]
    fn test_check_escaped_by_block_or_capture() {
        // A white knight on g3 can interpose on e4 or e2
        let mut board = back_rank_box();
        board.place(sq(1, 4), Piece::new(PieceKind::Queen, Color::Black));
        board.place(sq(5, 6), Piece::new(PieceKind::Knight, Color::White));
        assert!(!is_checkmate(&mut board, sq(7, 4), Color::White));

        // A white rook on a7 captures the queen along the row
        let mut board = back_rank_box();
        board.place(sq(1, 4), Piece::new(PieceKind::Queen, Color::Black));
        board.place(sq(1, 0), Piece::new(PieceKind::Rook, Color::White));
        assert!(!is_checkmate(&mut board, sq(7, 4), Color::White));
    }

    #[test]
    fn test_king_escapes_by_capture() {
        // Unprotected queen next to the king
        let mut board = board_with(&[
            (7, 4, PieceKind::King, Color::White),
            (6, 4, PieceKind::Queen, Color::Black),
            (0, 0, PieceKind::King, Color::Black),
        ]);
        assert!(is_in_check(&board, sq(7, 4), Color::White));
        assert!(!is_checkmate(&mut board, sq(7, 4), Color::White));

        // Protected from behind, with the king's flanks taken by knights
        // that cannot reach e2
        board.place(sq(0, 4), Piece::new(PieceKind::Rook, Color::Black));
        board.place(sq(7, 3), Piece::new(PieceKind::Knight, Color::White));
        board.place(sq(7, 5), Piece::new(PieceKind::Knight, Color::White));
        assert!(is_checkmate(&mut board, sq(7, 4), Color::White));
    }

    #[test]
    fn test_simulation_restores_board() {
        let mut board = back_rank_box();
        board.place(sq(1, 4), Piece::new(PieceKind::Queen, Color::Black));
        board.place(sq(5, 6), Piece::new(PieceKind::Knight, Color::White));
        board.place(sq(3, 5), Piece::new(PieceKind::Pawn, Color::Black));
        let before = board.clone();

        // Non-capturing block
        assert!(!simulate_and_check(&mut board, sq(5, 6), sq(4, 4), sq(7, 4), Color::White));
        assert_eq!(board, before);

        // Capture that leaves the king in check
        assert!(simulate_and_check(&mut board, sq(5, 6), sq(3, 5), sq(7, 4), Color::White));
        assert_eq!(board, before);

        // King move
        assert!(simulate_and_check(&mut board, sq(7, 4), sq(6, 4), sq(7, 4), Color::White));
        assert_eq!(board, before);
    }

    #[test]
    fn test_simulation_restores_castling() {
        let mut board = board_with(&[
            (7, 4, PieceKind::King, Color::White),
            (7, 0, PieceKind::Rook, Color::White),
            (0, 4, PieceKind::King, Color::Black),
        ]);
        let before = board.clone();
        assert!(!simulate_and_check(&mut board, sq(7, 4), sq(7, 2), sq(7, 4), Color::White));
        assert_eq!(board, before);
    }

    #[test]
    fn test_queries_are_idempotent() {
        let mut board = back_rank_box();
        board.place(sq(1, 4), Piece::new(PieceKind::Queen, Color::Black));
        let king = Piece::new(PieceKind::King, Color::White);

        assert_eq!(
            is_in_check(&board, sq(7, 4), Color::White),
            is_in_check(&board, sq(7, 4), Color::White)
        );
        assert_eq!(
            legal_moves_for(&board, king, sq(7, 4)),
            legal_moves_for(&board, king, sq(7, 4))
        );
        let first = safe_moves_for(&mut board, sq(6, 3), sq(7, 4));
        let second = safe_moves_for(&mut board, sq(6, 3), sq(7, 4));
        assert_eq!(first, second);
    }

    #[test]
    fn test_apply_on_empty_square_is_noop() {
        let mut board = Board::starting_position();
        let before = board.clone();
        assert!(apply_move_to_board(&mut board, sq(4, 4), sq(3, 4)).is_none());
        assert_eq!(board, before);
    }
}
