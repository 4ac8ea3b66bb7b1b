//! Magpie - FEN Module
//!
//! Forsyth-Edwards Notation import and export for `Position`.
//!
//! The halfmove clock and fullmove number are accepted but not stored,
//! since the engine keeps no game history; `to_fen` always writes `0 1`.

use crate::bitboard::{count_bits, set_bit};
use crate::error::FenError;
use crate::position::Position;
use crate::types::*;

impl Position {
    /// Create a position from a FEN string.
    ///
    /// Piece placement and side to move are required. Missing castling or
    /// en passant fields are read as `-`.
    pub fn from_fen(fen: &str) -> Result<Position, FenError> {
        let mut fields = fen.split_whitespace();
        let placement = fields
            .next()
            .ok_or(FenError::MissingField { field: "piece placement" })?;
        let side = fields
            .next()
            .ok_or(FenError::MissingField { field: "side to move" })?;
        let castling = fields.next().unwrap_or("-");
        let en_passant = fields.next().unwrap_or("-");

        let mut pos = Position::empty();
        parse_placement(&mut pos, placement)?;

        pos.side = match side {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidSide(other.to_string())),
        };
        pos.castling = parse_castling(castling)?;
        pos.en_passant = parse_en_passant(en_passant)?;

        for color in Color::ALL {
            if count_bits(pos.pieces(Piece::new(color, PieceKind::King))) != 1 {
                return Err(FenError::MissingKing { color });
            }
        }

        Ok(pos)
    }

    /// Generate FEN string from current position
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in 0..8 {
            let mut empty_count = 0;
            for file in 0..8 {
                match self.piece_at(rank * 8 + file) {
                    None => empty_count += 1,
                    Some(piece) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(piece.to_fen_char());
                    }
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank < 7 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        if self.castling == 0 {
            fen.push('-');
        } else {
            for (right, c) in [(CASTLE_WK, 'K'), (CASTLE_WQ, 'Q'), (CASTLE_BK, 'k'), (CASTLE_BQ, 'q')] {
                if self.can_castle(right) {
                    fen.push(c);
                }
            }
        }

        fen.push(' ');
        match self.en_passant {
            Some(sq) => fen.push_str(&square_name(sq)),
            None => fen.push('-'),
        }

        fen.push_str(" 0 1");
        fen
    }
}

fn parse_placement(pos: &mut Position, placement: &str) -> Result<(), FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::BadRankCount(ranks.len()));
    }

    for (row, text) in ranks.iter().enumerate() {
        let rank = 8 - row;
        let mut file = 0usize;
        for c in text.chars() {
            if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                file += skip as usize;
            } else {
                let piece = Piece::from_fen_char(c).ok_or(FenError::InvalidPiece(c))?;
                if file >= 8 {
                    return Err(FenError::BadRankLength { rank, squares: file + 1 });
                }
                set_bit(&mut pos.bitboards[piece.index()], row * 8 + file);
                file += 1;
            }
            if file > 8 {
                return Err(FenError::BadRankLength { rank, squares: file });
            }
        }
        if file != 8 {
            return Err(FenError::BadRankLength { rank, squares: file });
        }
    }

    pos.update_occupancies();
    Ok(())
}

fn parse_castling(field: &str) -> Result<u8, FenError> {
    if field == "-" {
        return Ok(0);
    }

    let mut rights = 0;
    for c in field.chars() {
        rights |= match c {
            'K' => CASTLE_WK,
            'Q' => CASTLE_WQ,
            'k' => CASTLE_BK,
            'q' => CASTLE_BQ,
            _ => return Err(FenError::InvalidCastling(field.to_string())),
        };
    }
    Ok(rights)
}

fn parse_en_passant(field: &str) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }

    // only ranks 3 and 6 can hold an en passant target
    match parse_square(field) {
        Some(sq) if field.len() == 2 && matches!(field.as_bytes()[1], b'3' | b'6') => Ok(Some(sq)),
        _ => Err(FenError::InvalidSquare(field.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::STARTING_FEN;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    #[test]
    fn starting_fen_matches_startpos() {
        let pos = Position::from_fen(STARTING_FEN).unwrap();
        assert_eq!(pos, Position::startpos());
        assert_eq!(pos.to_fen(), STARTING_FEN);
    }

    #[test]
    fn round_trip_preserves_all_fields() {
        for fen in [
            KIWIPETE,
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
            "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w Kq d6 0 1",
        ] {
            let pos = Position::from_fen(fen).unwrap();
            assert!(pos.is_consistent(), "{}", fen);
            assert_eq!(pos.to_fen(), fen);
        }
    }

    #[test]
    fn clocks_are_ignored_and_optional_fields_default() {
        let pos = Position::from_fen("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8").unwrap();
        assert_eq!(pos.to_fen(), "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 0 1");

        let bare = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b").unwrap();
        assert_eq!(bare.side_to_move(), Color::Black);
        assert_eq!(bare.castling_rights(), 0);
        assert_eq!(bare.en_passant(), None);
    }

    #[test]
    fn en_passant_square_is_parsed() {
        let pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        assert_eq!(pos.en_passant(), parse_square("d6"));
    }

    #[test]
    fn malformed_fields_are_reported() {
        assert_eq!(
            Position::from_fen(""),
            Err(FenError::MissingField { field: "piece placement" })
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3"),
            Err(FenError::MissingField { field: "side to move" })
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/4K3 w - -"),
            Err(FenError::BadRankCount(7))
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K4 w - -"),
            Err(FenError::BadRankLength { rank: 1, squares: 9 })
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K2 w - -"),
            Err(FenError::BadRankLength { rank: 1, squares: 7 })
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4X3 w - -"),
            Err(FenError::InvalidPiece('X'))
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 x - -"),
            Err(FenError::InvalidSide("x".into()))
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 w KX -"),
            Err(FenError::InvalidCastling("KX".into()))
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - e4"),
            Err(FenError::InvalidSquare("e4".into()))
        );
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/4K3 w - -"),
            Err(FenError::MissingKing { color: Color::Black })
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/3KK3 w - -"),
            Err(FenError::MissingKing { color: Color::White })
        );
    }
}
