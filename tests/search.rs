use magpie_chess::search::MATE_VALUE;
use magpie_chess::{MoveFilter, MoveGenerator, Position, SearchEngine};

fn after_moves(moves: &[&str]) -> Position {
    let generator = MoveGenerator::new();
    let mut pos = Position::startpos();
    for text in moves {
        let mv = generator
            .generate_legal_moves(&pos)
            .iter()
            .copied()
            .find(|m| m.to_uci() == *text)
            .unwrap_or_else(|| panic!("{text} is not legal"));
        assert!(pos.make_move(mv, MoveFilter::AllMoves));
    }
    pos
}

#[test]
fn fools_mate() {
    let before_mate = after_moves(&["f2f3", "e7e5", "g2g4"]);
    let result = SearchEngine::new().search(&before_mate, 3);
    assert_eq!(result.best_move.unwrap().to_uci(), "d8h4");
    assert_eq!(result.score, MATE_VALUE - 1);

    let mated = after_moves(&["f2f3", "e7e5", "g2g4", "d8h4"]);
    let generator = MoveGenerator::new();
    assert!(mated.in_check());
    assert!(generator.generate_legal_moves(&mated).is_empty());
    assert!(generator.is_checkmate(&mated));
    assert_eq!(mated.to_fen(), "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 1");
}

#[test]
fn search_is_deterministic() {
    let pos = Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
    let first = SearchEngine::new().search(&pos, 3);

    let mut engine = SearchEngine::new();
    engine.search(&Position::startpos(), 2);
    let second = engine.search(&pos, 3);

    assert_eq!(first, second);
    assert!(first.best_move.is_some());
}

#[test]
fn best_move_is_legal() {
    let generator = MoveGenerator::new();
    for fen in [
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    ] {
        let pos = Position::from_fen(fen).unwrap();
        let result = SearchEngine::new().search(&pos, 3);
        let best = result.best_move.unwrap();
        assert!(generator.generate_legal_moves(&pos).contains(&best), "{best} from {fen}");
    }
}

#[test]
fn back_rank_mate() {
    let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
    let result = SearchEngine::new().search(&pos, 2);
    assert_eq!(result.best_move.unwrap().to_uci(), "a1a8");
    assert_eq!(result.score, MATE_VALUE - 1);
}
