use corvid::board::Board;
use corvid::moves::magic::loader::load_magic_tables;
use corvid::search::search::search;
use std::time::Duration;

fn board_from(fen: &str) -> Board {
    let mut board = Board::new();
    board.set_fen(fen).unwrap();
    board
}

#[test]
fn recognizes_a_lost_position_after_being_mated() {
    let mut board =
        board_from("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 1");
    let tables = load_magic_tables();

    let (score, _) = search(&mut board, &tables, 1, Some(Duration::from_secs(5)));
    assert!(score < -500, "should recognize a very bad position, got {score}");
}

#[test]
fn finds_the_back_rank_mate() {
    let mut board = board_from("3r2k1/5ppp/8/8/8/8/5PPP/6K1 b - - 0 1");
    let tables = load_magic_tables();

    let (_score, best_move) = search(&mut board, &tables, 3, Some(Duration::from_secs(10)));
    let mv = best_move.expect("should find a move");
    assert_eq!(mv.to_uci(), "d8d1", "should deliver mate with Rd1#");
}

#[test]
fn captures_a_hanging_queen() {
    let mut board =
        board_from("rnb1kbnr/pppp1ppp/4q3/4Q3/4P3/8/PPPP1PPP/RNB1KBNR b KQkq - 0 1");
    let tables = load_magic_tables();

    let (score, best_move) = search(&mut board, &tables, 2, Some(Duration::from_secs(5)));
    assert!(score > 700, "should win the queen, score {score}");

    let mv = best_move.expect("should find a move");
    assert!(mv.to_uci().ends_with("e5"), "should capture the queen on e5: {}", mv.to_uci());
}

#[test]
fn starting_position_evaluates_as_roughly_equal() {
    let mut board = board_from("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    let tables = load_magic_tables();

    let (score, best_move) = search(&mut board, &tables, 3, Some(Duration::from_secs(5)));
    assert!(best_move.is_some(), "should find a move in the starting position");
    assert!(score.abs() < 150, "starting position should be ~equal, got {score}");
}

#[test]
fn a_full_queen_advantage_is_scored_as_decisive_for_either_side() {
    let tables = load_magic_tables();

    let mut white_up_a_queen = board_from("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    let (score, _) = search(&mut white_up_a_queen, &tables, 2, Some(Duration::from_secs(5)));
    assert!(score > 700, "should recognize white's queen advantage, got {score}");

    let mut white_down_a_queen = board_from("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1");
    let (score, _) = search(&mut white_down_a_queen, &tables, 2, Some(Duration::from_secs(5)));
    assert!(score < -800, "should recognize white's queen disadvantage, got {score}");
}
