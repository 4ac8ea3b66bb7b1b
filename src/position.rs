//! Magpie - Position Module
//!
//! The board state: one bitboard per colored piece, cached occupancies,
//! side to move, en passant target and castling rights. Everything the
//! search needs to answer "who stands where" and "is this square attacked"
//! lives here; applying moves lives in `make_move`.

use std::fmt;

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::bitboard::*;
use crate::types::*;

/// Starting position FEN
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Index of the combined occupancy in `Position::occupancies`
pub const BOTH: usize = 2;

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Chess position
///
/// `occupancies` is a cache: index 0 is white, 1 is black, 2 is both. It is
/// refreshed from the piece bitboards whenever they change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub(crate) bitboards: [Bitboard; 12],
    pub(crate) occupancies: [Bitboard; 3],
    pub(crate) side: Color,
    pub(crate) en_passant: Option<Square>,
    pub(crate) castling: u8,
}

/// Saved copy of a position's state, taken before applying a move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    bitboards: [Bitboard; 12],
    occupancies: [Bitboard; 3],
    side: Color,
    en_passant: Option<Square>,
    castling: u8,
}

impl Position {
    /// An empty board with white to move and no rights
    pub fn empty() -> Self {
        Position {
            bitboards: [0; 12],
            occupancies: [0; 3],
            side: Color::White,
            en_passant: None,
            castling: 0,
        }
    }

    /// The standard starting position
    pub fn startpos() -> Self {
        let mut pos = Position::empty();
        for (file, &kind) in BACK_RANK.iter().enumerate() {
            pos.put_piece(Piece::new(Color::Black, kind), A8 + file);
            pos.put_piece(Piece::BlackPawn, A8 + 8 + file);
            pos.put_piece(Piece::WhitePawn, A1 - 8 + file);
            pos.put_piece(Piece::new(Color::White, kind), A1 + file);
        }
        pos.castling = CASTLE_ALL;
        pos
    }

    /// Place a piece and refresh the occupancy cache.
    ///
    /// Used for setting up positions; the square should be empty.
    pub fn put_piece(&mut self, piece: Piece, sq: Square) {
        set_bit(&mut self.bitboards[piece.index()], sq);
        self.update_occupancies();
    }

    pub fn set_side_to_move(&mut self, side: Color) {
        self.side = side;
    }

    pub fn set_en_passant(&mut self, sq: Option<Square>) {
        self.en_passant = sq;
    }

    pub fn set_castling_rights(&mut self, rights: u8) {
        self.castling = rights & CASTLE_ALL;
    }

    /// Recompute white, black and combined occupancy from the piece boards
    pub(crate) fn update_occupancies(&mut self) {
        let (white, black) = self.bitboards.split_at(6);
        self.occupancies[Color::White.index()] = white.iter().fold(0, |acc, bb| acc | bb);
        self.occupancies[Color::Black.index()] = black.iter().fold(0, |acc, bb| acc | bb);
        self.occupancies[BOTH] = self.occupancies[0] | self.occupancies[1];
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Piece standing on `sq`, if any
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        if !get_bit(self.occupancies[BOTH], sq) {
            return None;
        }
        Piece::ALL
            .iter()
            .copied()
            .find(|p| get_bit(self.bitboards[p.index()], sq))
    }

    /// Bitboard of one colored piece
    #[inline]
    pub fn pieces(&self, piece: Piece) -> Bitboard {
        self.bitboards[piece.index()]
    }

    #[inline]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        self.occupancies[color.index()]
    }

    #[inline]
    pub fn all_occupied(&self) -> Bitboard {
        self.occupancies[BOTH]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Castling rights as a `CASTLE_*` bitmask
    #[inline]
    pub fn castling_rights(&self) -> u8 {
        self.castling
    }

    #[inline]
    pub fn can_castle(&self, right: u8) -> bool {
        self.castling & right != 0
    }

    /// Square of `color`'s king, if it has one
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let kings = self.bitboards[Piece::new(color, PieceKind::King).index()];
        if kings == 0 {
            None
        } else {
            Some(lsb(kings))
        }
    }

    // ========================================================================
    // ATTACK DETECTION
    // ========================================================================

    /// Is `sq` attacked by any piece of color `by`?
    ///
    /// Works backwards from the square: a white pawn attacks `sq` iff a
    /// black pawn standing on `sq` would attack the white pawn, and so on.
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        let theirs = |kind: PieceKind| self.bitboards[Piece::new(by, kind).index()];
        let occupied = self.occupancies[BOTH];

        if pawn_attacks(by.opponent(), sq) & theirs(PieceKind::Pawn) != 0 {
            return true;
        }
        if knight_attacks(sq) & theirs(PieceKind::Knight) != 0 {
            return true;
        }
        if king_attacks(sq) & theirs(PieceKind::King) != 0 {
            return true;
        }

        let queens = theirs(PieceKind::Queen);
        if bishop_attacks(sq, occupied) & (theirs(PieceKind::Bishop) | queens) != 0 {
            return true;
        }
        rook_attacks(sq, occupied) & (theirs(PieceKind::Rook) | queens) != 0
    }

    /// Is the side to move in check?
    pub fn in_check(&self) -> bool {
        self.king_square(self.side)
            .is_some_and(|king| self.is_square_attacked(king, self.side.opponent()))
    }

    /// Piece boards disjoint, occupancy caches exact and one king per side
    pub fn is_consistent(&self) -> bool {
        let mut seen = 0u64;
        for bb in self.bitboards {
            if seen & bb != 0 {
                return false;
            }
            seen |= bb;
        }

        let mut expected = *self;
        expected.update_occupancies();
        if expected.occupancies != self.occupancies || self.occupancies[BOTH] != seen {
            return false;
        }

        Color::ALL
            .iter()
            .all(|&c| count_bits(self.bitboards[Piece::new(c, PieceKind::King).index()]) == 1)
    }

    // ========================================================================
    // SNAPSHOT / RESTORE
    // ========================================================================

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            bitboards: self.bitboards,
            occupancies: self.occupancies,
            side: self.side,
            en_passant: self.en_passant,
            castling: self.castling,
        }
    }

    /// Overwrite the state with a snapshot taken earlier
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.bitboards = snapshot.bitboards;
        self.occupancies = snapshot.occupancies;
        self.side = snapshot.side;
        self.en_passant = snapshot.en_passant;
        self.castling = snapshot.castling;
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::startpos()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for rank in 0..8 {
            write!(f, " {}  ", 8 - rank)?;
            for file in 0..8 {
                let c = self.piece_at(rank * 8 + file).map_or('.', Piece::to_fen_char);
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;
        writeln!(f, "     a b c d e f g h")?;
        writeln!(f, "     Side = {}", self.side)?;
        match self.en_passant {
            Some(sq) => writeln!(f, "     EnPas square = {}", square_name(sq))?,
            None => writeln!(f, "     EnPas square = none")?,
        }
        let flag = |right: u8, c: char| if self.can_castle(right) { c } else { '-' };
        write!(
            f,
            "     Castling = {}{}{}{}",
            flag(CASTLE_WK, 'K'),
            flag(CASTLE_WQ, 'Q'),
            flag(CASTLE_BK, 'k'),
            flag(CASTLE_BQ, 'q')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        parse_square(name).unwrap()
    }

    #[test]
    fn startpos_layout() {
        let pos = Position::startpos();
        assert!(pos.is_consistent());
        assert_eq!(pos.piece_at(E1), Some(Piece::WhiteKing));
        assert_eq!(pos.piece_at(D8), Some(Piece::BlackQueen));
        assert_eq!(pos.piece_at(sq("e2")), Some(Piece::WhitePawn));
        assert_eq!(pos.piece_at(sq("e7")), Some(Piece::BlackPawn));
        assert_eq!(pos.piece_at(sq("e4")), None);
        assert_eq!(count_bits(pos.all_occupied()), 32);
        assert_eq!(pos.occupancy(Color::White), RANK_1 | RANK_2);
        assert_eq!(pos.occupancy(Color::Black), RANK_8 | RANK_7);
        assert_eq!(pos.side_to_move(), Color::White);
        assert_eq!(pos.castling_rights(), CASTLE_ALL);
        assert_eq!(pos.en_passant(), None);
        assert_eq!(pos.king_square(Color::Black), Some(E8));
        assert!(!pos.in_check());
    }

    #[test]
    fn attack_detection_covers_every_piece_type() {
        let mut pos = Position::empty();
        pos.put_piece(Piece::WhiteKing, H1);
        pos.put_piece(Piece::BlackKing, H8);
        pos.put_piece(Piece::WhitePawn, sq("d4"));
        pos.put_piece(Piece::BlackKnight, sq("b8"));
        pos.put_piece(Piece::WhiteRook, sq("a1"));
        pos.put_piece(Piece::BlackBishop, sq("f6"));

        // white pawn on d4 hits c5 and e5, not d5
        assert!(pos.is_square_attacked(sq("c5"), Color::White));
        assert!(pos.is_square_attacked(sq("e5"), Color::White));
        assert!(!pos.is_square_attacked(sq("d5"), Color::White));
        // black pawns would attack downwards; there are none
        assert!(!pos.is_square_attacked(sq("c3"), Color::Black));

        assert!(pos.is_square_attacked(sq("c6"), Color::Black));
        assert!(pos.is_square_attacked(sq("g7"), Color::Black));
        assert!(pos.is_square_attacked(sq("a8"), Color::White));
        assert!(pos.is_square_attacked(sq("g2"), Color::White));

        // bishop ray from f6 stops at the d4 pawn
        assert!(pos.is_square_attacked(sq("d4"), Color::Black));
        assert!(!pos.is_square_attacked(sq("c3"), Color::Black));
    }

    #[test]
    fn in_check_tracks_side_to_move() {
        let mut pos = Position::empty();
        pos.put_piece(Piece::WhiteKing, E1);
        pos.put_piece(Piece::BlackKing, E8);
        pos.put_piece(Piece::BlackRook, sq("e4"));
        assert!(pos.in_check());

        pos.set_side_to_move(Color::Black);
        assert!(!pos.in_check());
    }

    #[test]
    fn consistency_rejects_overlaps_and_stale_cache() {
        let mut pos = Position::startpos();
        set_bit(&mut pos.bitboards[Piece::WhiteQueen.index()], E1);
        assert!(!pos.is_consistent());

        let mut pos = Position::startpos();
        pop_bit(&mut pos.bitboards[Piece::WhitePawn.index()], sq("e2"));
        assert!(!pos.is_consistent());
        pos.update_occupancies();
        assert!(pos.is_consistent());

        let mut pos = Position::empty();
        pos.put_piece(Piece::WhiteKing, E1);
        assert!(!pos.is_consistent());
    }

    #[test]
    fn snapshot_restores_every_field() {
        let mut pos = Position::startpos();
        let saved = pos.snapshot();

        pos.put_piece(Piece::WhiteQueen, sq("d4"));
        pos.set_side_to_move(Color::Black);
        pos.set_en_passant(Some(sq("e3")));
        pos.set_castling_rights(CASTLE_BK);

        pos.restore(&saved);
        assert_eq!(pos, Position::startpos());
    }

    #[test]
    fn display_matches_board_printout() {
        let mut pos = Position::startpos();
        pos.set_castling_rights(CASTLE_WK | CASTLE_BQ);
        pos.set_en_passant(Some(sq("e3")));
        let text = pos.to_string();

        assert!(text.contains(" 8   r n b q k b n r\n"));
        assert!(text.contains(" 4   . . . . . . . .\n"));
        assert!(text.contains(" 1   R N B Q K B N R\n"));
        assert!(text.contains("     a b c d e f g h\n"));
        assert!(text.contains("     Side = white\n"));
        assert!(text.contains("     EnPas square = e3\n"));
        assert!(text.ends_with("     Castling = K--q"));
    }
}
