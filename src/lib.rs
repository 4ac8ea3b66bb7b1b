//! Magpie - UCI Chess Engine
//!
//! A chess engine written in Rust with support for:
//! - Full FIDE move rules (castling, en passant, promotion)
//! - Bitboard representation with magic-bitboard slider attacks
//! - Fixed-depth negamax search with alpha-beta pruning
//! - Quiescence search and MVV-LVA move ordering
//! - FEN import/export and perft
//! - UCI protocol

pub mod types;
pub mod bitboard;
pub mod magics;
pub mod attacks;
pub mod magic_search;
pub mod position;
pub mod fen;
pub mod moves;
pub mod move_generator;
pub mod make_move;
pub mod evaluation;
pub mod search;
pub mod perft;
pub mod error;
pub mod uci;

pub use error::{EngineError, FenError};
pub use make_move::{MoveFilter, MoveGuard};
pub use move_generator::MoveGenerator;
pub use moves::{Move, MoveList};
pub use position::{Position, Snapshot};
pub use search::{SearchEngine, SearchResult};
