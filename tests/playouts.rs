use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use magpie_chess::{MoveFilter, MoveGenerator, Position};

const PLAYOUT_PLIES: usize = 200;

fn random_playout(seed: u64, start: Position) {
    let mut rng = StdRng::seed_from_u64(seed);
    let generator = MoveGenerator::new();
    let mut pos = start;

    for _ in 0..PLAYOUT_PLIES {
        let moves = generator.generate_legal_moves(&pos);
        let Some(&mv) = moves.as_slice().choose(&mut rng) else {
            assert!(generator.is_checkmate(&pos) || generator.is_stalemate(&pos));
            return;
        };

        // make then restore must give back the exact state
        let snapshot = pos.snapshot();
        let before = pos;
        assert!(pos.make_move(mv, MoveFilter::AllMoves), "legal move {mv} rejected");
        pos.restore(&snapshot);
        assert_eq!(pos, before);

        assert!(pos.make_move(mv, MoveFilter::AllMoves));
        assert!(pos.is_consistent(), "inconsistent after {mv}:\n{pos}");
        assert_ne!(pos.side_to_move(), before.side_to_move());

        let mover = before.side_to_move();
        let king = pos.king_square(mover).unwrap();
        assert!(!pos.is_square_attacked(king, mover.opponent()), "{mv} left the king in check");

        let reparsed = Position::from_fen(&pos.to_fen()).unwrap();
        assert_eq!(reparsed, pos);
    }
}

#[test]
fn playouts_from_startpos_stay_consistent() {
    for seed in 0..8 {
        random_playout(seed, Position::startpos());
    }
}

#[test]
fn playouts_from_kiwipete_stay_consistent() {
    let start = Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
    for seed in 100..104 {
        random_playout(seed, start);
    }
}

#[test]
fn castling_rights_only_shrink() {
    let mut rng = StdRng::seed_from_u64(7);
    let generator = MoveGenerator::new();
    let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();

    for _ in 0..60 {
        let moves = generator.generate_legal_moves(&pos);
        let Some(&mv) = moves.as_slice().choose(&mut rng) else {
            break;
        };
        let rights = pos.castling_rights();
        assert!(pos.make_move(mv, MoveFilter::AllMoves));
        assert_eq!(pos.castling_rights() & !rights, 0, "{mv} granted a castling right");
    }
}
