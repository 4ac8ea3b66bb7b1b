//! Magpie - Perft Module
//!
//! Counts leaf nodes of the legal move tree to a fixed depth. The totals
//! for well-known positions are published, which makes this the main
//! correctness check for move generation and application.

use crate::make_move::MoveFilter;
use crate::move_generator::MoveGenerator;
use crate::moves::Move;
use crate::position::Position;

/// Number of leaf nodes `depth` plies below `pos`
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = MoveGenerator::new().generate_pseudo_legal_moves(pos);
    let mut nodes = 0;

    for &mv in moves.iter() {
        if let Some(mut child) = pos.try_make_move(mv, MoveFilter::AllMoves) {
            nodes += if depth == 1 { 1 } else { perft(&mut child, depth - 1) };
        }
    }

    nodes
}

/// Leaf counts below each legal root move, in generation order.
///
/// The counts sum to `perft(pos, depth)`.
pub fn perft_divide(pos: &mut Position, depth: u32) -> Vec<(Move, u64)> {
    let moves = MoveGenerator::new().generate_pseudo_legal_moves(pos);
    let mut divide = Vec::with_capacity(moves.len());

    for &mv in moves.iter() {
        if let Some(mut child) = pos.try_make_move(mv, MoveFilter::AllMoves) {
            let nodes = perft(&mut child, depth.saturating_sub(1));
            divide.push((mv, nodes));
        }
    }

    divide
}
