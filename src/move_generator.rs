//! Magpie - Move Generator Module
//!
//! Pseudo-legal move generation on bitboards. Moves that leave the king in
//! check are generated here and weeded out by `Position::make_move`.
//!
//! Generation order for the side to move is fixed: pawns, knights, bishops,
//! rooks, queens, then the king (castling before ordinary king moves). Within
//! a piece type, sources and targets are visited in ascending square order.

use crate::attacks::*;
use crate::bitboard::*;
use crate::make_move::MoveFilter;
use crate::moves::*;
use crate::position::Position;
use crate::types::*;

/// Castling rule for one side of the board
struct CastlingPath {
    right: u8,
    king_from: Square,
    king_to: Square,
    /// Squares between king and rook that must be empty
    empty: &'static [Square],
    /// Squares the king starts on or passes through that must not be attacked
    safe: [Square; 2],
}

const WHITE_CASTLING: [CastlingPath; 2] = [
    CastlingPath { right: CASTLE_WK, king_from: E1, king_to: G1, empty: &[F1, G1], safe: [E1, F1] },
    CastlingPath { right: CASTLE_WQ, king_from: E1, king_to: C1, empty: &[D1, C1, B1], safe: [E1, D1] },
];

const BLACK_CASTLING: [CastlingPath; 2] = [
    CastlingPath { right: CASTLE_BK, king_from: E8, king_to: G8, empty: &[F8, G8], safe: [E8, F8] },
    CastlingPath { right: CASTLE_BQ, king_from: E8, king_to: C8, empty: &[D8, C8, B8], safe: [E8, D8] },
];

/// Move generator for chess positions
pub struct MoveGenerator;

impl MoveGenerator {
    /// Create a new move generator
    pub fn new() -> Self {
        MoveGenerator
    }

    /// Generate all legal moves for the current position
    pub fn generate_legal_moves(&self, pos: &Position) -> MoveList {
        let pseudo_legal = self.generate_pseudo_legal_moves(pos);
        let mut legal_moves = MoveList::new();
        let mut scratch = *pos;

        for &mv in &pseudo_legal {
            if scratch.try_make_move(mv, MoveFilter::AllMoves).is_some() {
                legal_moves.push(mv);
            }
        }

        legal_moves
    }

    /// Generate all pseudo-legal moves (may leave king in check)
    pub fn generate_pseudo_legal_moves(&self, pos: &Position) -> MoveList {
        let mut moves = MoveList::new();
        self.generate_moves(pos, &mut moves);
        moves
    }

    /// Append every pseudo-legal move to `moves`
    pub fn generate_moves(&self, pos: &Position, moves: &mut MoveList) {
        let side = pos.side_to_move();

        for kind in PieceKind::ALL {
            let piece = Piece::new(side, kind);
            match kind {
                PieceKind::Pawn => self.generate_pawn_moves(pos, piece, moves),
                PieceKind::Knight => {
                    self.generate_piece_moves(pos, piece, moves, |sq, _| knight_attacks(sq))
                }
                PieceKind::Bishop => self.generate_piece_moves(pos, piece, moves, bishop_attacks),
                PieceKind::Rook => self.generate_piece_moves(pos, piece, moves, rook_attacks),
                PieceKind::Queen => self.generate_piece_moves(pos, piece, moves, queen_attacks),
                PieceKind::King => {
                    self.generate_castling_moves(pos, piece, moves);
                    self.generate_piece_moves(pos, piece, moves, |sq, _| king_attacks(sq));
                }
            }
        }
    }

    /// Pushes, double pushes, captures, promotions and en passant
    fn generate_pawn_moves(&self, pos: &Position, piece: Piece, moves: &mut MoveList) {
        let side = piece.color();
        let occupied = pos.all_occupied();
        let enemies = pos.occupancy(side.opponent());

        let (start_rank, promotion_rank) = match side {
            Color::White => (RANK_2, RANK_7),
            Color::Black => (RANK_7, RANK_2),
        };

        let mut pawns = pos.pieces(piece);
        while pawns != 0 {
            let source = pop_lsb(&mut pawns);
            let promoting = get_bit(promotion_rank, source);

            // single step forward
            let forward = match side {
                Color::White => source.checked_sub(8),
                Color::Black => Some(source + 8).filter(|&sq| sq < 64),
            };

            if let Some(target) = forward.filter(|&sq| !get_bit(occupied, sq)) {
                if promoting {
                    push_promotions(moves, source, target, piece, 0);
                } else {
                    let double = match side {
                        Color::White => target.checked_sub(8),
                        Color::Black => Some(target + 8).filter(|&sq| sq < 64),
                    };
                    if let Some(double) = double {
                        if get_bit(start_rank, source) && !get_bit(occupied, double) {
                            moves.push(Move::new(source, double, piece, None, FLAG_DOUBLE_PUSH));
                        }
                    }
                    moves.push(Move::quiet(source, target, piece));
                }
            }

            let mut captures = pawn_attacks(side, source) & enemies;
            while captures != 0 {
                let target = pop_lsb(&mut captures);
                if promoting {
                    push_promotions(moves, source, target, piece, FLAG_CAPTURE);
                } else {
                    moves.push(Move::new(source, target, piece, None, FLAG_CAPTURE));
                }
            }

            if let Some(ep) = pos.en_passant() {
                if get_bit(pawn_attacks(side, source), ep) {
                    moves.push(Move::new(source, ep, piece, None, FLAG_CAPTURE | FLAG_EN_PASSANT));
                }
            }
        }
    }

    /// Castling moves: right held, path empty, king's path not attacked.
    ///
    /// The landing square is left to `make_move`'s own check test.
    fn generate_castling_moves(&self, pos: &Position, king: Piece, moves: &mut MoveList) {
        let side = king.color();
        let paths = match side {
            Color::White => &WHITE_CASTLING,
            Color::Black => &BLACK_CASTLING,
        };
        let occupied = pos.all_occupied();

        for path in paths {
            if !pos.can_castle(path.right) {
                continue;
            }
            if path.empty.iter().any(|&sq| get_bit(occupied, sq)) {
                continue;
            }
            if path.safe.iter().any(|&sq| pos.is_square_attacked(sq, side.opponent())) {
                continue;
            }
            moves.push(Move::new(path.king_from, path.king_to, king, None, FLAG_CASTLING));
        }
    }

    /// Knight, bishop, rook, queen and ordinary king moves
    fn generate_piece_moves<F>(&self, pos: &Position, piece: Piece, moves: &mut MoveList, attacks: F)
    where
        F: Fn(Square, Bitboard) -> Bitboard,
    {
        let side = piece.color();
        let own = pos.occupancy(side);
        let enemies = pos.occupancy(side.opponent());
        let occupied = pos.all_occupied();

        let mut sources = pos.pieces(piece);
        while sources != 0 {
            let source = pop_lsb(&mut sources);
            let mut targets = attacks(source, occupied) & !own;
            while targets != 0 {
                let target = pop_lsb(&mut targets);
                let flags = if get_bit(enemies, target) { FLAG_CAPTURE } else { 0 };
                moves.push(Move::new(source, target, piece, None, flags));
            }
        }
    }

    /// Check if the side to move is in check
    pub fn is_in_check(&self, pos: &Position) -> bool {
        pos.in_check()
    }

    /// Check if the position is checkmate
    pub fn is_checkmate(&self, pos: &Position) -> bool {
        self.is_in_check(pos) && self.generate_legal_moves(pos).is_empty()
    }

    /// Check if the position is stalemate
    pub fn is_stalemate(&self, pos: &Position) -> bool {
        !self.is_in_check(pos) && self.generate_legal_moves(pos).is_empty()
    }
}

impl Default for MoveGenerator {
    fn default() -> Self {
        MoveGenerator::new()
    }
}

/// Queen, rook, bishop and knight promotions, in that order
fn push_promotions(moves: &mut MoveList, source: Square, target: Square, pawn: Piece, flags: u32) {
    for kind in PieceKind::PROMOTIONS {
        let promoted = Piece::new(pawn.color(), kind);
        moves.push(Move::new(source, target, pawn, Some(promoted), flags));
    }
}
