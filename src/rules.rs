//! Piece movement rules.
//!
//! Per-kind shape predicates answer "could this kind of piece move from A
//! to B on an empty board". Blocking is handled separately by
//! [`is_path_clear`], and occupancy by the move validator in
//! [`crate::movegen`]. The pawn is the exception: its rules depend on what
//! stands on the destination, so [`is_valid_pawn_move`] reads the board.

use crate::types::*;

/// Signed `(drow, dcol)` from `from` to `to`.
fn delta(from: Square, to: Square) -> (i8, i8) {
    (
        to.row as i8 - from.row as i8,
        to.col as i8 - from.col as i8,
    )
}

/// Straight line along a row or a column, any distance.
pub fn is_rook_shape(from: Square, to: Square) -> bool {
    let (dr, dc) = delta(from, to);
    (dr == 0) != (dc == 0)
}

/// Diagonal line, any distance.
pub fn is_bishop_shape(from: Square, to: Square) -> bool {
    let (dr, dc) = delta(from, to);
    dr != 0 && dr.abs() == dc.abs()
}

pub fn is_queen_shape(from: Square, to: Square) -> bool {
    is_rook_shape(from, to) || is_bishop_shape(from, to)
}

pub fn is_knight_shape(from: Square, to: Square) -> bool {
    let (dr, dc) = delta(from, to);
    matches!((dr.abs(), dc.abs()), (2, 1) | (1, 2))
}

/// One step in any direction. Castling is not a king shape.
pub fn is_king_shape(from: Square, to: Square) -> bool {
    let (dr, dc) = delta(from, to);
    dr.abs() <= 1 && dc.abs() <= 1 && (dr, dc) != (0, 0)
}

/// Returns `true` if the pawn move is allowed on the current board.
///
/// - Single advance onto an empty square.
/// - Double advance from the home row, both squares empty.
/// - Diagonal step onto an opponent piece.
///
/// There is no en passant and no promotion: a pawn on the last row stays a
/// pawn and simply has no forward moves.
pub fn is_valid_pawn_move(board: &Board, from: Square, to: Square, color: Color) -> bool {
    let dir = color.pawn_direction();
    let (dr, dc) = delta(from, to);

    if dc == 0 && dr == dir {
        return !board.is_occupied(to);
    }

    if dc == 0 && dr == 2 * dir && from.row == color.pawn_home_row() {
        return match from.offset(dir, 0) {
            Some(between) => !board.is_occupied(between) && !board.is_occupied(to),
            None => false,
        };
    }

    if dc.abs() == 1 && dr == dir {
        return board.is_occupied_by(to, color.opponent());
    }

    false
}

/// Returns `true` if every square strictly between `from` and `to` is empty.
///
/// The two squares must share a row, column or diagonal; for any other
/// pair the result is `false`. Adjacent squares have nothing in between
/// and are always clear.
pub fn is_path_clear(board: &Board, from: Square, to: Square) -> bool {
    if !is_queen_shape(from, to) {
        return false;
    }
    let (dr, dc) = delta(from, to);
    let (step_r, step_c) = (dr.signum(), dc.signum());

    let mut cur = from;
    loop {
        match cur.offset(step_r, step_c) {
            Some(next) if next == to => return true,
            Some(next) => {
                if board.is_occupied(next) {
                    return false;
                }
                cur = next;
            }
            None => return false,
        }
    }
}
