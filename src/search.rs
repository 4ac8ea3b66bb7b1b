//! Magpie - Search Engine Module
//!
//! Fixed-depth negamax with fail-hard alpha-beta pruning:
//! - Quiescence search over captures at the horizon
//! - Check extension (one extra ply while in check)
//! - MVV-LVA move ordering
//!
//! Each search works on its own copy of the position and backtracks through
//! `MoveGuard`, so the caller's position is never touched.

use std::cmp::Reverse;
use std::time::Instant;

use crate::evaluation::{evaluate, score_move};
use crate::make_move::MoveFilter;
use crate::move_generator::MoveGenerator;
use crate::moves::{Move, MoveList};
use crate::position::Position;

// Constants for search
pub const INFINITY: i32 = 50000;
pub const MATE_VALUE: i32 = 49000;

/// Scores at or beyond this magnitude encode a forced mate
pub const MATE_BOUND: i32 = MATE_VALUE - 1000;

/// Outcome of one search
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// `None` if the side to move has no legal move
    pub best_move: Option<Move>,
    /// Centipawns from the side to move's perspective
    pub score: i32,
    pub nodes: u64,
}

/// Progress report handed to the info callback
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchInfo {
    pub depth: u32,
    pub score: i32,
    pub nodes: u64,
    pub time_ms: u64,
    pub best_move: Option<Move>,
}

impl SearchInfo {
    /// Nodes per second, 0 for searches too fast to time
    pub fn nps(&self) -> u64 {
        if self.time_ms > 0 {
            self.nodes * 1000 / self.time_ms
        } else {
            0
        }
    }

    /// Moves until mate (negative when being mated), if the score is a mate
    pub fn mate_in(&self) -> Option<i32> {
        if self.score.abs() < MATE_BOUND {
            return None;
        }
        let distance = (MATE_VALUE - self.score.abs() + 1) / 2;
        Some(if self.score > 0 { distance } else { -distance })
    }
}

/// Sort moves by descending MVV-LVA score; equal scores keep generation order
pub fn sort_moves(pos: &Position, moves: &mut MoveList) {
    moves
        .as_mut_slice()
        .sort_by_key(|&mv| Reverse(score_move(pos, mv)));
}

// ============================================================================
// SEARCH ENGINE
// ============================================================================

pub struct SearchEngine {
    move_generator: MoveGenerator,
    pub nodes_searched: u64,
    pub best_move: Option<Move>,
    /// Distance from the root of the current node
    ply: u32,
}

impl SearchEngine {
    pub fn new() -> Self {
        SearchEngine {
            move_generator: MoveGenerator::new(),
            nodes_searched: 0,
            best_move: None,
            ply: 0,
        }
    }

    /// Search `pos` to a fixed depth. Depth 0 is treated as 1.
    pub fn search(&mut self, pos: &Position, depth: u32) -> SearchResult {
        self.search_with_info(pos, depth, |_| {})
    }

    /// Search and report the result through `info_callback` once done
    pub fn search_with_info<F>(&mut self, pos: &Position, depth: u32, mut info_callback: F) -> SearchResult
    where
        F: FnMut(&SearchInfo),
    {
        let depth = depth.max(1);
        let start = Instant::now();

        self.nodes_searched = 0;
        self.best_move = None;
        self.ply = 0;

        let mut root = *pos;
        let score = self.negamax(&mut root, -INFINITY, INFINITY, depth);

        info_callback(&SearchInfo {
            depth,
            score,
            nodes: self.nodes_searched,
            time_ms: start.elapsed().as_millis() as u64,
            best_move: self.best_move,
        });

        SearchResult {
            best_move: self.best_move,
            score,
            nodes: self.nodes_searched,
        }
    }

    fn negamax(&mut self, pos: &mut Position, mut alpha: i32, beta: i32, depth: u32) -> i32 {
        if depth == 0 {
            return self.quiescence(pos, alpha, beta);
        }

        self.nodes_searched += 1;

        let in_check = pos.in_check();
        // Check extension
        let depth = if in_check { depth + 1 } else { depth };

        let old_alpha = alpha;
        let mut legal_moves = 0;
        let mut best_so_far = None;

        let mut moves = self.move_generator.generate_pseudo_legal_moves(pos);
        sort_moves(pos, &mut moves);

        for &mv in moves.iter() {
            let Some(mut child) = pos.try_make_move(mv, MoveFilter::AllMoves) else {
                continue;
            };
            legal_moves += 1;

            self.ply += 1;
            let score = -self.negamax(&mut child, -beta, -alpha, depth - 1);
            self.ply -= 1;
            drop(child);

            // fail-hard beta cutoff
            if score >= beta {
                return beta;
            }

            if score > alpha {
                alpha = score;
                if self.ply == 0 {
                    best_so_far = Some(mv);
                }
            }
        }

        if legal_moves == 0 {
            // checkmate, preferring the shortest mate; otherwise stalemate
            return if in_check { -MATE_VALUE + self.ply as i32 } else { 0 };
        }

        if self.ply == 0 && old_alpha != alpha {
            self.best_move = best_so_far;
        }

        alpha
    }

    fn quiescence(&mut self, pos: &mut Position, mut alpha: i32, beta: i32) -> i32 {
        self.nodes_searched += 1;

        let stand_pat = evaluate(pos);
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut moves = self.move_generator.generate_pseudo_legal_moves(pos);
        sort_moves(pos, &mut moves);

        for &mv in moves.iter() {
            let Some(mut child) = pos.try_make_move(mv, MoveFilter::CapturesOnly) else {
                continue;
            };

            self.ply += 1;
            let score = -self.quiescence(&mut child, -beta, -alpha);
            self.ply -= 1;
            drop(child);

            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        SearchEngine::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;

    #[test]
    fn finds_mate_in_one() {
        // after 1.f3 e5 2.g4
        let pos = Position::from_fen("rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2").unwrap();
        let result = SearchEngine::new().search(&pos, 2);

        assert_eq!(result.best_move.map(|m| m.to_uci()), Some("d8h4".to_string()));
        assert_eq!(result.score, MATE_VALUE - 1);
        assert!(result.nodes > 0);
    }

    #[test]
    fn grabs_hanging_queen() {
        let pos = Position::from_fen("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let result = SearchEngine::new().search(&pos, 1);
        assert_eq!(result.best_move.map(|m| m.to_uci()), Some("e4d5".to_string()));
        // bare kings remain besides the pawn on d5
        assert_eq!(result.score, 100 + 20);

        let before_capture = evaluate(&pos);
        assert!(before_capture < -500);
    }

    #[test]
    fn terminal_positions_have_no_best_move() {
        let mated = Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3").unwrap();
        let result = SearchEngine::new().search(&mated, 3);
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, -MATE_VALUE);

        let stalemate = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let result = SearchEngine::new().search(&stalemate, 3);
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn depth_zero_searches_one_ply_and_leaves_input_alone() {
        let pos = Position::startpos();
        let before = pos;
        let mut engine = SearchEngine::new();

        let shallow = engine.search(&pos, 0);
        let one = engine.search(&pos, 1);
        assert_eq!(shallow, one);
        assert!(shallow.best_move.is_some());
        assert_eq!(pos, before);
    }

    #[test]
    fn info_callback_reports_once() {
        let pos = Position::startpos();
        let mut reports = Vec::new();
        let result = SearchEngine::new().search_with_info(&pos, 2, |info| reports.push(*info));

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].depth, 2);
        assert_eq!(reports[0].score, result.score);
        assert_eq!(reports[0].nodes, result.nodes);
        assert_eq!(reports[0].best_move, result.best_move);
    }

    #[test]
    fn mate_distance_from_score() {
        let info = |score| SearchInfo { depth: 1, score, nodes: 0, time_ms: 0, best_move: None };
        assert_eq!(info(MATE_VALUE - 1).mate_in(), Some(1));
        assert_eq!(info(MATE_VALUE - 3).mate_in(), Some(2));
        assert_eq!(info(-(MATE_VALUE - 2)).mate_in(), Some(-1));
        assert_eq!(info(150).mate_in(), None);
        assert_eq!(info(0).nps(), 0);
    }

    #[test]
    fn sort_puts_best_capture_first_and_keeps_quiet_order() {
        let pos = Position::from_fen("4k3/8/8/2rq4/1P2P3/8/8/4K3 w - - 0 1").unwrap();
        let mut moves = MoveGenerator::new().generate_pseudo_legal_moves(&pos);
        let quiet_before: Vec<Move> = moves.iter().copied().filter(|m| !m.is_capture()).collect();

        sort_moves(&pos, &mut moves);

        // pawn takes queen, then pawn takes rook
        assert_eq!(moves[0].to_uci(), "e4d5");
        assert_eq!(moves[1].to_uci(), "b4c5");
        let quiet_after: Vec<Move> = moves.iter().copied().filter(|m| !m.is_capture()).collect();
        assert_eq!(quiet_before, quiet_after);
        assert_eq!(moves[0].target(), parse_square("d5").unwrap());
    }
}
