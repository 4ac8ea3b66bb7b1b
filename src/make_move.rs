//! Magpie - Move Application Module
//!
//! The only code that mutates a `Position` during play. A move is applied
//! in place, then rejected (and undone) if it leaves the mover's king
//! attacked. Callers that need to backtrack either keep a `Snapshot` and
//! call `restore`, or hold a `MoveGuard` which restores on drop.

use std::ops::{Deref, DerefMut};

use crate::bitboard::*;
use crate::moves::Move;
use crate::position::{Position, Snapshot};
use crate::types::*;

/// Which moves `make_move` is willing to apply
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveFilter {
    AllMoves,
    /// Non-captures are refused without touching the position
    CapturesOnly,
}

/// Castling rights kept after a move touches a square.
///
/// Rights are ANDed with the entries for both source and target, so moving
/// the king or a rook, or capturing on a rook's home square, revokes the
/// matching rights for good.
#[rustfmt::skip]
pub const CASTLING_RIGHTS: [u8; 64] = [
     7, 15, 15, 15,  3, 15, 15, 11,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    13, 15, 15, 15, 12, 15, 15, 14,
];

impl Position {
    /// Apply a pseudo-legal move.
    ///
    /// Returns `false` if the move was refused: either `filter` is
    /// `CapturesOnly` and the move is quiet, or the move would leave the
    /// mover in check. In both cases the position is unchanged.
    pub fn make_move(&mut self, mv: Move, filter: MoveFilter) -> bool {
        if filter == MoveFilter::CapturesOnly && !mv.is_capture() {
            return false;
        }

        let snapshot = self.snapshot();
        let mover = self.side;
        let source = mv.source();
        let target = mv.target();
        let piece = mv.piece().index();

        pop_bit(&mut self.bitboards[piece], source);
        set_bit(&mut self.bitboards[piece], target);

        if mv.is_capture() {
            let first = Piece::new(mover.opponent(), PieceKind::Pawn).index();
            if let Some(victim) = self.bitboards[first..first + 6]
                .iter_mut()
                .find(|bb| get_bit(**bb, target))
            {
                pop_bit(victim, target);
            }
        }

        if let Some(promoted) = mv.promoted() {
            pop_bit(&mut self.bitboards[piece], target);
            set_bit(&mut self.bitboards[promoted.index()], target);
        }

        // the captured pawn sits one rank behind the target, from the mover's view
        let behind = match mover {
            Color::White => target + 8,
            Color::Black => target.wrapping_sub(8),
        };

        if mv.is_en_passant() {
            let enemy_pawn = Piece::new(mover.opponent(), PieceKind::Pawn).index();
            pop_bit(&mut self.bitboards[enemy_pawn], behind);
        }

        self.en_passant = None;
        if mv.is_double_push() {
            self.en_passant = Some(behind);
        }

        if mv.is_castling() {
            if let Some((from, to)) = castling_rook_route(target) {
                let rook = Piece::new(mover, PieceKind::Rook).index();
                pop_bit(&mut self.bitboards[rook], from);
                set_bit(&mut self.bitboards[rook], to);
            }
        }

        self.castling &= CASTLING_RIGHTS[source] & CASTLING_RIGHTS[target];

        self.update_occupancies();
        self.side = mover.opponent();

        let exposed = self
            .king_square(mover)
            .is_some_and(|king| self.is_square_attacked(king, self.side));
        if exposed {
            self.restore(&snapshot);
            return false;
        }

        true
    }

    /// Apply a move and hand back a guard that undoes it when dropped.
    ///
    /// Returns `None` exactly when `make_move` would return `false`.
    pub fn try_make_move(&mut self, mv: Move, filter: MoveFilter) -> Option<MoveGuard<'_>> {
        let snapshot = self.snapshot();
        if self.make_move(mv, filter) {
            Some(MoveGuard {
                position: self,
                snapshot,
            })
        } else {
            None
        }
    }
}

/// Rook source and destination for a king's castling target square
fn castling_rook_route(king_target: Square) -> Option<(Square, Square)> {
    match king_target {
        G1 => Some((H1, F1)),
        C1 => Some((A1, D1)),
        G8 => Some((H8, F8)),
        C8 => Some((A8, D8)),
        _ => None,
    }
}

/// A position with one move applied; restores the prior state on drop
pub struct MoveGuard<'a> {
    position: &'a mut Position,
    snapshot: Snapshot,
}

impl Deref for MoveGuard<'_> {
    type Target = Position;

    fn deref(&self) -> &Position {
        self.position
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Position {
        self.position
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        self.position.restore(&self.snapshot);
    }
}
