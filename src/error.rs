//! Magpie - Error types
//!
//! Errors raised while turning text (FEN strings, UCI move lists) into
//! positions and moves. The search core itself never fails: illegal moves
//! are reported by `make_move` returning `false`.

use thiserror::Error;

/// Errors that can occur while decoding a FEN string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// A required field is absent
    #[error("FEN is missing the {field} field")]
    MissingField { field: &'static str },

    /// Unknown character in the piece placement field
    #[error("Invalid piece character '{0}' in FEN")]
    InvalidPiece(char),

    /// A rank describes more or fewer than eight squares
    #[error("Rank {rank} of FEN describes {squares} squares (expected 8)")]
    BadRankLength { rank: usize, squares: usize },

    /// Piece placement does not have eight ranks
    #[error("FEN piece placement has {0} ranks (expected 8)")]
    BadRankCount(usize),

    /// Side to move is neither `w` nor `b`
    #[error("Invalid side to move '{0}' in FEN")]
    InvalidSide(String),

    /// Castling field contains something other than `KQkq` or `-`
    #[error("Invalid castling rights '{0}' in FEN")]
    InvalidCastling(String),

    /// En passant field is not a square or `-`
    #[error("Invalid en passant square '{0}' in FEN")]
    InvalidSquare(String),

    /// Each side needs exactly one king
    #[error("FEN must contain exactly one {color} king")]
    MissingKing { color: crate::types::Color },
}

/// Errors raised by the protocol layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Position could not be set up
    #[error(transparent)]
    Fen(#[from] FenError),

    /// Move text could not be parsed
    #[error("Invalid move: {0}")]
    InvalidMove(String),

    /// Move parsed but is not legal in the current position
    #[error("Illegal move: {0}")]
    IllegalMove(String),

    /// Command arguments not understood
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;

    #[test]
    fn messages_name_the_offending_input() {
        assert_eq!(
            FenError::InvalidPiece('x').to_string(),
            "Invalid piece character 'x' in FEN"
        );
        assert_eq!(
            FenError::MissingKing { color: Color::Black }.to_string(),
            "FEN must contain exactly one black king"
        );
        assert_eq!(
            EngineError::IllegalMove("e2e5".into()).to_string(),
            "Illegal move: e2e5"
        );
    }

    #[test]
    fn fen_errors_convert_transparently() {
        let err: EngineError = FenError::BadRankCount(7).into();
        assert_eq!(err, EngineError::Fen(FenError::BadRankCount(7)));
        assert_eq!(err.to_string(), "FEN piece placement has 7 ranks (expected 8)");
    }
}
