//! Magpie - Position Evaluation Module
//!
//! Static evaluation from material and piece-square tables, plus the
//! MVV-LVA score used to order captures.
//!
//! The tables are written from white's point of view with a8 at index 0.
//! Black pieces read the same table mirrored vertically (`sq ^ 56`).

use crate::bitboard::pop_lsb;
use crate::moves::Move;
use crate::position::Position;
use crate::types::*;

// ============================================================================
// PIECE VALUES
// ============================================================================

/// Material value per piece kind, indexed by `PieceKind::index()`
pub const PIECE_VALUES: [i32; 6] = [
    100,    // PAWN
    300,    // KNIGHT
    350,    // BISHOP
    500,    // ROOK
    1000,   // QUEEN
    10000,  // KING
];

// ============================================================================
// PIECE-SQUARE TABLES
// ============================================================================

#[rustfmt::skip]
const PAWN_PST: [i32; 64] = [
    90,  90,  90,  90,  90,  90,  90,  90,   // Rank 8
    30,  30,  30,  40,  40,  30,  30,  30,   // Rank 7
    20,  20,  20,  30,  30,  30,  20,  20,   // Rank 6
    10,  10,  10,  20,  20,  10,  10,  10,   // Rank 5
     5,   5,  10,  20,  20,   5,   5,   5,   // Rank 4
     0,   0,   0,   5,   5,   0,   0,   0,   // Rank 3
     0,   0,   0, -10, -10,   0,   0,   0,   // Rank 2
     0,   0,   0,   0,   0,   0,   0,   0,   // Rank 1
];

#[rustfmt::skip]
const KNIGHT_PST: [i32; 64] = [
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,  10,  10,   0,   0,  -5,
    -5,   5,  20,  20,  20,  20,   5,  -5,
    -5,  10,  20,  30,  30,  20,  10,  -5,
    -5,  10,  20,  30,  30,  20,  10,  -5,
    -5,   5,  20,  10,  10,  20,   5,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5, -10,   0,   0,   0,   0, -10,  -5,
];

#[rustfmt::skip]
const BISHOP_PST: [i32; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
     0,   0,   0,   0,   0,   0,   0,   0,
     0,   0,   0,  10,  10,   0,   0,   0,
     0,   0,  10,  20,  20,  10,   0,   0,
     0,   0,  10,  20,  20,  10,   0,   0,
     0,  10,   0,   0,   0,   0,  10,   0,
     0,  30,   0,   0,   0,   0,  30,   0,
     0,   0, -10,   0,   0, -10,   0,   0,
];

#[rustfmt::skip]
const ROOK_PST: [i32; 64] = [
    50,  50,  50,  50,  50,  50,  50,  50,
    50,  50,  50,  50,  50,  50,  50,  50,
     0,   0,  10,  20,  20,  10,   0,   0,
     0,   0,  10,  20,  20,  10,   0,   0,
     0,   0,  10,  20,  20,  10,   0,   0,
     0,   0,  10,  20,  20,  10,   0,   0,
     0,   0,  10,  20,  20,  10,   0,   0,
     0,   0,   0,  20,  20,   0,   0,   0,
];

#[rustfmt::skip]
const KING_PST: [i32; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
     0,   0,   5,   5,   5,   5,   0,   0,
     0,   5,   5,  10,  10,   5,   5,   0,
     0,   5,  10,  20,  20,  10,   5,   0,
     0,   5,  10,  20,  20,  10,   5,   0,
     0,   0,   5,  10,  10,   5,   0,   0,
     0,   5,   5,  -5,  -5,   0,   5,   0,
     0,   0,   5,   0, -15,   0,  10,   0,
];

/// Positional bonus for a piece kind on a square seen from white's side.
///
/// Queens have no table.
fn pst_value(kind: PieceKind, sq: Square) -> i32 {
    match kind {
        PieceKind::Pawn => PAWN_PST[sq],
        PieceKind::Knight => KNIGHT_PST[sq],
        PieceKind::Bishop => BISHOP_PST[sq],
        PieceKind::Rook => ROOK_PST[sq],
        PieceKind::Queen => 0,
        PieceKind::King => KING_PST[sq],
    }
}

/// Mirror a square across the horizontal midline (a8 <-> a1)
#[inline]
pub const fn mirror(sq: Square) -> Square {
    sq ^ 56
}

// ============================================================================
// MAIN EVALUATION FUNCTION
// ============================================================================

/// Evaluate the position from the side to move's perspective
pub fn evaluate(pos: &Position) -> i32 {
    let mut score = 0;

    for piece in Piece::ALL {
        let kind = piece.kind();
        let mut bb = pos.pieces(piece);
        while bb != 0 {
            let sq = pop_lsb(&mut bb);
            match piece.color() {
                Color::White => score += PIECE_VALUES[kind.index()] + pst_value(kind, sq),
                Color::Black => score -= PIECE_VALUES[kind.index()] + pst_value(kind, mirror(sq)),
            }
        }
    }

    match pos.side_to_move() {
        Color::White => score,
        Color::Black => -score,
    }
}

// ============================================================================
// MOVE ORDERING
// ============================================================================

/// Most valuable victim, least valuable attacker: `[attacker][victim]`
pub const MVV_LVA: [[i32; 6]; 6] = build_mvv_lva();

const fn build_mvv_lva() -> [[i32; 6]; 6] {
    let mut table = [[0; 6]; 6];
    let mut attacker = 0;
    while attacker < 6 {
        let mut victim = 0;
        while victim < 6 {
            table[attacker][victim] = 100 * (victim as i32 + 1) + 5 - attacker as i32;
            victim += 1;
        }
        attacker += 1;
    }
    table
}

/// Ordering score for a move: MVV-LVA for captures, 0 otherwise.
///
/// An en passant target square is empty, so the victim defaults to a pawn.
pub fn score_move(pos: &Position, mv: Move) -> i32 {
    if !mv.is_capture() {
        return 0;
    }

    let victim = pos
        .piece_at(mv.target())
        .map_or(PieceKind::Pawn, |p| p.kind());
    MVV_LVA[mv.piece().kind().index()][victim.index()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::FLAG_CAPTURE;

    #[test]
    fn startpos_is_balanced() {
        let pos = Position::startpos();
        assert_eq!(evaluate(&pos), 0);

        let mut black = pos;
        black.set_side_to_move(Color::Black);
        assert_eq!(evaluate(&black), 0);
    }

    #[test]
    fn score_is_relative_to_side_to_move() {
        // white is a queen up; queens carry no positional term
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        let white_view = evaluate(&pos);
        assert_eq!(white_view, 1000 + KING_PST[E1] - KING_PST[mirror(E8)]);

        pos.set_side_to_move(Color::Black);
        assert_eq!(evaluate(&pos), -white_view);
    }

    #[test]
    fn black_tables_are_mirrored() {
        // a pawn on e4 for white is worth the same as a pawn on e5 for black
        let white = Position::from_fen("4k3/8/8/8/4P3/8/8/4K3 w - - 0 1").unwrap();
        let black = Position::from_fen("4k3/8/8/4p3/8/8/8/4K3 b - - 0 1").unwrap();
        assert_eq!(evaluate(&white), evaluate(&black));
        assert_eq!(evaluate(&white), 100 + 20);
    }

    #[test]
    fn mvv_lva_prefers_big_victims_and_small_attackers() {
        assert_eq!(MVV_LVA[0][0], 105);
        assert_eq!(MVV_LVA[0][4], 505);
        assert_eq!(MVV_LVA[5][0], 100);
        assert_eq!(MVV_LVA[5][5], 600);
        assert!(MVV_LVA[0][4] > MVV_LVA[4][4]);
        assert!(MVV_LVA[4][4] > MVV_LVA[0][3]);
    }

    #[test]
    fn score_move_uses_victim_on_target() {
        let pos = Position::from_fen("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let e4 = parse_square("e4").unwrap();
        let d5 = parse_square("d5").unwrap();

        let capture = Move::new(e4, d5, Piece::WhitePawn, None, FLAG_CAPTURE);
        assert_eq!(score_move(&pos, capture), 505);

        let quiet = Move::quiet(e4, parse_square("e5").unwrap(), Piece::WhitePawn);
        assert_eq!(score_move(&pos, quiet), 0);
    }
}
