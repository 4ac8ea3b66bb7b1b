//! Magpie - Type definitions and constants
//!
//! This module provides the core type definitions and constants for
//! representing squares, colors, pieces and castling rights.
//!
//! Squares are numbered rank-major from a8 (0) to h1 (63), so white pawns
//! advance towards lower indices.

use std::fmt;

/// Board square index (0 = a8, 63 = h1)
pub type Square = usize;

pub const A8: Square = 0;
pub const B8: Square = 1;
pub const C8: Square = 2;
pub const D8: Square = 3;
pub const E8: Square = 4;
pub const F8: Square = 5;
pub const G8: Square = 6;
pub const H8: Square = 7;

pub const A1: Square = 56;
pub const B1: Square = 57;
pub const C1: Square = 58;
pub const D1: Square = 59;
pub const E1: Square = 60;
pub const F1: Square = 61;
pub const G1: Square = 62;
pub const H1: Square = 63;

/// Castling rights bitmasks
pub const CASTLE_WK: u8 = 1; // White kingside
pub const CASTLE_WQ: u8 = 2; // White queenside
pub const CASTLE_BK: u8 = 4; // Black kingside
pub const CASTLE_BQ: u8 = 8; // Black queenside
pub const CASTLE_ALL: u8 = CASTLE_WK | CASTLE_WQ | CASTLE_BK | CASTLE_BQ;

/// File and rank names for UCI notation
pub const FILE_NAMES: &[u8; 8] = b"abcdefgh";
pub const RANK_NAMES: &[u8; 8] = b"87654321";

/// Side to move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// Colorless piece type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Promotion choices in generation order
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase letter used for promotions in UCI notation
    pub const fn uci_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }
}

/// One of the twelve colored pieces, ordered P N B R Q K p n b r q k.
///
/// The discriminant doubles as the index of the piece's bitboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Piece {
    WhitePawn = 0,
    WhiteKnight = 1,
    WhiteBishop = 2,
    WhiteRook = 3,
    WhiteQueen = 4,
    WhiteKing = 5,
    BlackPawn = 6,
    BlackKnight = 7,
    BlackBishop = 8,
    BlackRook = 9,
    BlackQueen = 10,
    BlackKing = 11,
}

impl Piece {
    pub const ALL: [Piece; 12] = [
        Piece::WhitePawn,
        Piece::WhiteKnight,
        Piece::WhiteBishop,
        Piece::WhiteRook,
        Piece::WhiteQueen,
        Piece::WhiteKing,
        Piece::BlackPawn,
        Piece::BlackKnight,
        Piece::BlackBishop,
        Piece::BlackRook,
        Piece::BlackQueen,
        Piece::BlackKing,
    ];

    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Piece {
        Piece::ALL[color.index() * 6 + kind.index()]
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Inverse of `index`; `None` outside 0..12
    #[inline]
    pub const fn from_index(index: usize) -> Option<Piece> {
        if index < 12 {
            Some(Piece::ALL[index])
        } else {
            None
        }
    }

    #[inline]
    pub const fn color(self) -> Color {
        if (self as usize) < 6 {
            Color::White
        } else {
            Color::Black
        }
    }

    #[inline]
    pub const fn kind(self) -> PieceKind {
        PieceKind::ALL[self as usize % 6]
    }

    /// FEN piece character to piece value
    pub fn from_fen_char(c: char) -> Option<Piece> {
        let piece = match c {
            'P' => Piece::WhitePawn,
            'N' => Piece::WhiteKnight,
            'B' => Piece::WhiteBishop,
            'R' => Piece::WhiteRook,
            'Q' => Piece::WhiteQueen,
            'K' => Piece::WhiteKing,
            'p' => Piece::BlackPawn,
            'n' => Piece::BlackKnight,
            'b' => Piece::BlackBishop,
            'r' => Piece::BlackRook,
            'q' => Piece::BlackQueen,
            'k' => Piece::BlackKing,
            _ => return None,
        };
        Some(piece)
    }

    /// Piece value to FEN character
    pub const fn to_fen_char(self) -> char {
        match self {
            Piece::WhitePawn => 'P',
            Piece::WhiteKnight => 'N',
            Piece::WhiteBishop => 'B',
            Piece::WhiteRook => 'R',
            Piece::WhiteQueen => 'Q',
            Piece::WhiteKing => 'K',
            Piece::BlackPawn => 'p',
            Piece::BlackKnight => 'n',
            Piece::BlackBishop => 'b',
            Piece::BlackRook => 'r',
            Piece::BlackQueen => 'q',
            Piece::BlackKing => 'k',
        }
    }
}

/// Convert square index (0-63) to algebraic notation (e.g., "e4")
pub fn square_name(sq: Square) -> String {
    let file = sq % 8;
    let rank = sq / 8;
    format!("{}{}", FILE_NAMES[file] as char, RANK_NAMES[rank] as char)
}

/// Convert algebraic notation to square index
pub fn parse_square(name: &str) -> Option<Square> {
    let bytes = name.as_bytes();
    if bytes.len() < 2 {
        return None;
    }

    let file = match bytes[0] {
        b'a'..=b'h' => (bytes[0] - b'a') as usize,
        _ => return None,
    };

    // rank 8 is row 0
    let row = match bytes[1] {
        b'1'..=b'8' => (b'8' - bytes[1]) as usize,
        _ => return None,
    };

    Some(row * 8 + file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_names_follow_a8_first_layout() {
        assert_eq!(square_name(A8), "a8");
        assert_eq!(square_name(H8), "h8");
        assert_eq!(square_name(A1), "a1");
        assert_eq!(square_name(E1), "e1");
        assert_eq!(square_name(H1), "h1");
        assert_eq!(parse_square("e4"), Some(36));
        assert_eq!(parse_square("g1"), Some(G1));
        assert_eq!(parse_square("i1"), None);
        assert_eq!(parse_square("a9"), None);
        assert_eq!(parse_square("a"), None);
    }

    #[test]
    fn piece_index_color_and_kind_agree() {
        for (i, piece) in Piece::ALL.iter().enumerate() {
            assert_eq!(piece.index(), i);
            assert_eq!(Piece::from_index(i), Some(*piece));
            assert_eq!(Piece::new(piece.color(), piece.kind()), *piece);
            assert_eq!(Piece::from_fen_char(piece.to_fen_char()), Some(*piece));
        }
        assert_eq!(Piece::from_index(12), None);
        assert_eq!(Piece::BlackQueen.color(), Color::Black);
        assert_eq!(Piece::BlackQueen.kind(), PieceKind::Queen);
        assert_eq!(Color::White.opponent(), Color::Black);
    }
}
