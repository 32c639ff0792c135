//! Attack detection.
//!
//! One routine answers "is this square attacked by that color right now".
//! It backs both check detection and the castling rule that the king may
//! not start on, pass through or land on an attacked square.

use crate::types::*;

/// Ray directions as `(drow, dcol)`: four orthogonal, then four diagonal.
const RAYS: [(i8, i8); 8] = [
    (-1, 0), (1, 0), (0, -1), (0, 1),
    (-1, -1), (-1, 1), (1, -1), (1, 1),
];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];

/// Returns `true` if a slider of `kind` attacks along a ray of this shape.
fn slides_along(kind: PieceKind, diagonal: bool) -> bool {
    match kind {
        PieceKind::Queen => true,
        PieceKind::Rook => !diagonal,
        PieceKind::Bishop => diagonal,
        _ => false,
    }
}

/// Returns `true` if a piece of `attacker` of the given kind stands on `sq`.
fn holds(board: &Board, sq: Option<Square>, attacker: Color, kind: PieceKind) -> bool {
    matches!(
        sq.and_then(|s| board.piece_at(s)),
        Some(p) if p.color == attacker && p.kind == kind
    )
}

/// Returns `true` if the given square is attacked by any piece of `attacker`.
///
/// Independent of whose turn it is. Whatever stands on `sq` itself is
/// ignored, so this also answers "would a king be safe here".
pub fn is_square_attacked(board: &Board, sq: Square, attacker: Color) -> bool {
    // Sliders: first piece on each ray
    for &(dr, dc) in &RAYS {
        let diagonal = dr != 0 && dc != 0;
        let mut cur = sq;
        while let Some(next) = cur.offset(dr, dc) {
            if let Some(piece) = board.piece_at(next) {
                if piece.color == attacker && slides_along(piece.kind, diagonal) {
                    return true;
                }
                break;
            }
            cur = next;
        }
    }

    if KNIGHT_OFFSETS
        .iter()
        .any(|&(dr, dc)| holds(board, sq.offset(dr, dc), attacker, PieceKind::Knight))
    {
        return true;
    }

    // An attacking pawn stands one step behind `sq` from its own point of view
    let behind = -attacker.pawn_direction();
    if [-1i8, 1]
        .iter()
        .any(|&dc| holds(board, sq.offset(behind, dc), attacker, PieceKind::Pawn))
    {
        return true;
    }

    RAYS
        .iter()
        .any(|&(dr, dc)| holds(board, sq.offset(dr, dc), attacker, PieceKind::King))
}

/// Returns `true` if the king of `king_color` standing on `king_sq` is in check.
pub fn is_king_in_check(board: &Board, king_sq: Square, king_color: Color) -> bool {
    is_square_attacked(board, king_sq, king_color.opponent())
}
