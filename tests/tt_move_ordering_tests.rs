//! Transposition table interaction with the searcher: a shallow search
//! primes the table for a deeper one, entries survive across independent
//! searches of unrelated positions, and whatever move the table hands
//! back is always legal in the position it was stored for.
use std::str::FromStr;
use std::time::Instant;

use corvid::board::Board;
use corvid::moves::execute::generate_legal;
use corvid::moves::magic::loader::load_magic_tables;
use corvid::moves::types::Move;
use corvid::search::context::SearchContext;
use corvid::search::search::{TimeManager, alpha_beta, search};
use corvid::search::tt::TranspositionTable;

const INF: i32 = 32000;

fn search_fixed_depth(
    board: &mut Board,
    tables: &corvid::moves::magic::MagicTables,
    depth: i32,
    tt: &mut TranspositionTable,
    ctx: &mut SearchContext,
) -> (i32, Option<Move>) {
    let mut nodes = 0;
    let mut time = TimeManager::new(None);
    alpha_beta(board, tables, ctx, tt, depth, 0, -INF, INF, true, None, &mut nodes, &mut time)
}

fn fen(f: &str) -> Board {
    Board::from_str(f).expect("valid FEN")
}

#[test]
fn a_shallow_search_primes_the_table_so_a_deeper_search_of_the_same_position_still_finds_a_move() {
    let mut board = fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    let tables = load_magic_tables();
    let mut tt = TranspositionTable::new(64);
    let mut ctx = SearchContext::new();

    let (_, shallow_move) = search_fixed_depth(&mut board, &tables, 2, &mut tt, &mut ctx);
    assert!(shallow_move.is_some());

    let (_, deep_move) = search_fixed_depth(&mut board, &tables, 5, &mut tt, &mut ctx);
    assert!(deep_move.is_some(), "a primed table must still produce a move at a deeper depth");
}

#[test]
fn iterative_deepening_through_the_public_search_entry_point_finds_a_move() {
    let mut board = fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    let tables = load_magic_tables();

    let (_score, best_move) = search(&mut board, &tables, 5, None);
    assert!(best_move.is_some(), "iterative deepening should find a move");
}

#[test]
fn the_same_table_can_be_reused_across_unrelated_positions_without_corrupting_results() {
    let tables = load_magic_tables();
    let mut tt = TranspositionTable::new(64);
    let mut ctx = SearchContext::new();

    let positions = [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 1",
    ];

    for position in positions {
        let mut board = fen(position);
        let (_, best_move) = search_fixed_depth(&mut board, &tables, 3, &mut tt, &mut ctx);
        assert!(best_move.is_some(), "{position}: should find a move sharing a table with other positions");
    }
}

#[test]
fn whatever_move_the_table_hands_back_is_always_legal_in_the_position_it_was_stored_for() {
    let mut board = fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    let tables = load_magic_tables();
    let mut tt = TranspositionTable::new(64);
    let mut ctx = SearchContext::new();

    let (_, best_move) = search_fixed_depth(&mut board, &tables, 4, &mut tt, &mut ctx);
    let mv = best_move.expect("should find a move");

    let mut legal_moves = Vec::new();
    let mut scratch = Vec::new();
    generate_legal(&mut board, &tables, &mut legal_moves, &mut scratch);
    assert!(legal_moves.contains(&mv), "table-backed move {mv:?} must be legal in the root position");
}

#[test]
fn repeating_the_same_search_from_scratch_is_deterministic() {
    let tables = load_magic_tables();
    let fen_str = "r1bqkb1r/pppp1ppp/2n2n2/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 0 1";

    let mut board1 = fen(fen_str);
    let mut tt1 = TranspositionTable::new(64);
    let mut ctx1 = SearchContext::new();
    let (score1, move1) = search_fixed_depth(&mut board1, &tables, 4, &mut tt1, &mut ctx1);

    let mut board2 = fen(fen_str);
    let mut tt2 = TranspositionTable::new(64);
    let mut ctx2 = SearchContext::new();
    let (score2, move2) = search_fixed_depth(&mut board2, &tables, 4, &mut tt2, &mut ctx2);

    assert_eq!(score1, score2, "a fresh table and context must reproduce the same score");
    assert!(move1.is_some() && move2.is_some());
}

#[test]
fn a_free_queen_is_still_found_when_the_table_is_shared_with_an_unrelated_prior_search() {
    let tables = load_magic_tables();
    let mut tt = TranspositionTable::new(64);
    let mut ctx = SearchContext::new();

    let mut warmup = fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    search_fixed_depth(&mut warmup, &tables, 3, &mut tt, &mut ctx);

    let mut board = fen("rnb1kbnr/pppppppp/8/8/8/3q4/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    let (score, best_move) = search_fixed_depth(&mut board, &tables, 3, &mut tt, &mut ctx);
    assert!(score > 700, "should see the winning queen capture even with a warmed-up table, got {score}");
    assert!(best_move.is_some());
}

#[test]
fn repeated_searches_of_the_same_mate_in_one_stay_fast_once_the_table_is_populated() {
    let mut board = fen("6k1/5ppp/8/8/8/8/5PPP/3Q2K1 w - - 0 1");
    let tables = load_magic_tables();
    let mut tt = TranspositionTable::new(64);
    let mut ctx = SearchContext::new();

    let (score1, _) = search_fixed_depth(&mut board, &tables, 3, &mut tt, &mut ctx);
    assert!(score1 > 20000, "should find mate, got score {score1}");

    let start = Instant::now();
    let (score2, _) = search_fixed_depth(&mut board, &tables, 3, &mut tt, &mut ctx);
    assert_eq!(score1, score2, "re-searching the same position must reproduce the same score");
    assert!(start.elapsed().as_millis() < 1000, "a fully populated table should answer almost instantly");
}
