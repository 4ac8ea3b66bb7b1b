//! Magpie - Move Encoding Module
//!
//! A move is packed into the low 24 bits of a `u32`:
//!
//! ```text
//! 0000 0000 0000 0000 0011 1111   source square
//! 0000 0000 0000 1111 1100 0000   target square
//! 0000 0000 1111 0000 0000 0000   moving piece
//! 0000 1111 0000 0000 0000 0000   promoted piece (0 = none)
//! 0001 0000 0000 0000 0000 0000   capture flag
//! 0010 0000 0000 0000 0000 0000   double push flag
//! 0100 0000 0000 0000 0000 0000   en passant flag
//! 1000 0000 0000 0000 0000 0000   castling flag
//! ```
//!
//! A white pawn (piece index 0) is never a promotion target, so a zero
//! promotion field unambiguously means "no promotion".

use std::fmt;
use std::ops::Index;

use crate::types::{square_name, Piece, Square};

pub const FLAG_CAPTURE: u32 = 0x10_0000;
pub const FLAG_DOUBLE_PUSH: u32 = 0x20_0000;
pub const FLAG_EN_PASSANT: u32 = 0x40_0000;
pub const FLAG_CASTLING: u32 = 0x80_0000;

const SOURCE_MASK: u32 = 0x3f;
const TARGET_MASK: u32 = 0xfc0;
const PIECE_MASK: u32 = 0xf000;
const PROMOTED_MASK: u32 = 0xf_0000;

/// Upper bound on moves generated for a single position
pub const MAX_MOVES: usize = 256;

/// Represents a chess move
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Move(u32);

impl Move {
    /// Encode a move. `flags` is any combination of the `FLAG_*` constants.
    #[inline]
    pub fn new(source: Square, target: Square, piece: Piece, promoted: Option<Piece>, flags: u32) -> Self {
        let promoted = promoted.map_or(0, |p| p.index() as u32);
        Move(source as u32 | (target as u32) << 6 | (piece.index() as u32) << 12 | promoted << 16 | flags)
    }

    /// A non-capturing move without special flags
    #[inline]
    pub fn quiet(source: Square, target: Square, piece: Piece) -> Self {
        Move::new(source, target, piece, None, 0)
    }

    /// Raw 24-bit encoding
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn source(self) -> Square {
        (self.0 & SOURCE_MASK) as Square
    }

    #[inline]
    pub const fn target(self) -> Square {
        ((self.0 & TARGET_MASK) >> 6) as Square
    }

    #[inline]
    pub fn piece(self) -> Piece {
        // only ever built from a valid piece index
        Piece::ALL[((self.0 & PIECE_MASK) >> 12) as usize]
    }

    #[inline]
    pub fn promoted(self) -> Option<Piece> {
        match (self.0 & PROMOTED_MASK) >> 16 {
            0 => None,
            index => Piece::from_index(index as usize),
        }
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.0 & FLAG_CAPTURE != 0
    }

    #[inline]
    pub const fn is_double_push(self) -> bool {
        self.0 & FLAG_DOUBLE_PUSH != 0
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.0 & FLAG_EN_PASSANT != 0
    }

    #[inline]
    pub const fn is_castling(self) -> bool {
        self.0 & FLAG_CASTLING != 0
    }

    /// Convert move to UCI notation (e.g., "e2e4", "e7e8q")
    pub fn to_uci(self) -> String {
        let mut uci = format!("{}{}", square_name(self.source()), square_name(self.target()));
        if let Some(promoted) = self.promoted() {
            uci.push(promoted.kind().uci_char());
        }
        uci
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci())
    }
}

/// Bounded, append-only list of moves for one position
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    count: usize,
}

impl MoveList {
    pub fn new() -> Self {
        MoveList {
            moves: [Move::default(); MAX_MOVES],
            count: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!(self.count < MAX_MOVES, "move list overflow");
        self.moves[self.count] = mv;
        self.count += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn clear(&mut self) {
        self.count = 0;
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.count]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves[..self.count]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    pub fn contains(&self, mv: &Move) -> bool {
        self.as_slice().contains(mv)
    }
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList::new()
    }
}

impl fmt::Debug for MoveList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter().map(|m| m.to_uci())).finish()
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, index: usize) -> &Move {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
