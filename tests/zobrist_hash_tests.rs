use corvid::board::castle_bits::{CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};
use corvid::board::{Board, Piece};
use corvid::hash::zobrist::zobrist_keys;
use corvid::moves::execute::{generate_legal, make_move_basic, undo_move_basic};
use corvid::moves::magic::loader::load_magic_tables;
use corvid::moves::types::{Move, PROMOTION, PROMOTION_CAPTURE, QUIET_MOVE};
use corvid::square::Square;
use std::str::FromStr;

fn sq(i: u8) -> Square {
    Square::from_index(i)
}

fn mv_king(from: u8, to: u8) -> Move {
    Move {
        from: sq(from),
        to: sq(to),
        piece: Piece::King,
        promotion: None,
        flags: QUIET_MOVE,
    }
}

fn mv_pawn(from: u8, to: u8) -> Move {
    Move {
        from: sq(from),
        to: sq(to),
        piece: Piece::Pawn,
        promotion: None,
        flags: QUIET_MOVE,
    }
}

fn mv_rook(from: u8, to: u8) -> Move {
    Move {
        from: sq(from),
        to: sq(to),
        piece: Piece::Rook,
        promotion: None,
        flags: QUIET_MOVE,
    }
}

fn assert_parity(b: &Board, label: &str) {
    assert_eq!(
        b.zobrist,
        b.compute_zobrist_full(),
        "incremental/full zobrist mismatch: {label}"
    );
}

#[test]
fn starting_position_hash_is_internally_consistent() {
    let b = Board::new();
    assert_parity(&b, "startpos");
}

#[test]
fn fen_roundtrip_preserves_hash_parity_across_castling_variants() {
    let base = "rn1qkbnr/pppbpppp/8/3p4/3P4/5N2/PPP1PPPP/RNBQKB1R w";
    for rights in ["KQkq", "K", "Q", "k", "q", "-"] {
        let fen = format!("{base} {rights} - 2 3");
        let b = Board::from_str(&fen).expect("valid FEN");
        assert_parity(&b, &fen);
    }
}

#[test]
fn en_passant_only_hashes_when_actually_capturable() {
    // Black pawn on d4 can capture the e3 en-passant square; both are
    // otherwise-identical boards, so only the capturable one should differ
    // from its own no-EP twin.
    let capturable = Board::from_str("4k3/8/8/8/3pP3/8/8/4K3 b KQkq e3 0 1").unwrap();
    let no_ep = Board::from_str("4k3/8/8/8/3pP3/8/8/4K3 b KQkq - 0 1").unwrap();
    assert_ne!(capturable.zobrist, no_ep.zobrist);
    assert_parity(&capturable, "capturable EP");
    assert_parity(&no_ep, "no EP");

    // Same shape but with no black pawn able to reach the EP square at all.
    let not_capturable = Board::from_str("4k3/8/8/8/4P3/8/8/4K3 b KQkq e3 0 1").unwrap();
    let its_no_ep_twin = Board::from_str("4k3/8/8/8/4P3/8/8/4K3 b KQkq - 0 1").unwrap();
    assert_eq!(
        not_capturable.zobrist, its_no_ep_twin.zobrist,
        "an EP square nothing can capture onto must not affect the hash"
    );
}

#[test]
fn side_to_move_toggle_matches_full_recompute() {
    let mut b = Board::new();
    let h0 = b.zobrist;
    b.side_to_move = b.side_to_move.opposite();
    let expected = b.compute_zobrist_full();
    assert_eq!(h0 ^ zobrist_keys().side_to_move, expected);
}

#[test]
fn castling_rights_cleared_by_rook_and_king_moves() {
    let mut b = Board::new();

    let u = make_move_basic(&mut b, mv_rook(0, 8)); // a1-a2
    assert_eq!(b.castling_rights & CASTLE_WQ, 0, "a1 rook moved, WQ lost");
    assert_parity(&b, "after a1-a2");
    undo_move_basic(&mut b, u);
    assert_parity(&b, "after undo a1-a2");

    let u = make_move_basic(&mut b, mv_rook(7, 15)); // h1-h2
    assert_eq!(b.castling_rights & CASTLE_WK, 0, "h1 rook moved, WK lost");
    undo_move_basic(&mut b, u);

    let u = make_move_basic(&mut b, mv_king(4, 12)); // e1-e2
    assert_eq!(
        b.castling_rights & (CASTLE_WK | CASTLE_WQ),
        0,
        "king moved, both white rights lost"
    );
    assert_parity(&b, "after king move");
    undo_move_basic(&mut b, u);
    assert_parity(&b, "after undo king move");

    // Black side, via a harmless white move in between to keep turn order legal.
    let w = make_move_basic(&mut b, mv_pawn(12, 20)); // a2-a3
    let u = make_move_basic(&mut b, mv_rook(56, 48)); // a8-a7
    assert_eq!(b.castling_rights & CASTLE_BQ, 0, "a8 rook moved, BQ lost");
    assert_parity(&b, "after a8-a7");
    undo_move_basic(&mut b, u);
    undo_move_basic(&mut b, w);
}

#[test]
fn castling_right_cleared_when_rooks_corner_square_is_captured() {
    // Black rook sits on a3 and captures straight down onto a1, taking the
    // white rook that was guarding White's queenside right.
    let mut b = Board::from_str("rnbqkbnr/pppppppp/8/8/8/r7/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
    let w = make_move_basic(&mut b, mv_pawn(12, 20)); // a2-a3 isn't legal (own pawn there); use b2-b3 instead
    undo_move_basic(&mut b, w);
    let w = make_move_basic(&mut b, mv_pawn(13, 21)); // b2-b3
    let capture = make_move_basic(&mut b, mv_rook(40, 0)); // a3xa1
    assert_eq!(
        b.castling_rights & CASTLE_WQ,
        0,
        "capturing the a1 rook must strip WQ even though White's king never moved"
    );
    assert_parity(&b, "after corner rook capture");
    undo_move_basic(&mut b, capture);
    undo_move_basic(&mut b, w);
    assert_parity(&b, "after undoing corner rook capture");
}

#[test]
fn lost_castling_rights_do_not_come_back_when_the_rook_returns() {
    let mut b = Board::new();
    let out = make_move_basic(&mut b, mv_rook(0, 8)); // a1-a2
    let w = make_move_basic(&mut b, mv_pawn(52, 44)); // e7-e6, just to get a legal ply for Black
    let back = make_move_basic(&mut b, mv_rook(8, 0)); // a2-a1
    assert_eq!(
        b.castling_rights & CASTLE_WQ,
        0,
        "WQ must stay lost once the rook has moved, even after it returns to a1"
    );
    assert_parity(&b, "after rook returns to a1");
    undo_move_basic(&mut b, back);
    undo_move_basic(&mut b, w);
    undo_move_basic(&mut b, out);
}

/// `zobrist_promo_{white,black}_{quiet,capture}_{q,r,b,n}` used to be 16
/// nearly-identical functions; the only thing that varies across them is the
/// promotion piece, the color, and whether a rook capture is involved, so one
/// loop covers the same ground.
#[test]
fn promotions_preserve_hash_parity_for_every_piece_and_color() {
    struct Case {
        fen: &'static str,
        from: u8,
        to: u8,
        capture: bool,
    }
    let cases = [
        Case { fen: "8/P7/8/8/8/8/8/4k2K w - - 0 1", from: 48, to: 56, capture: false }, // a7-a8
        Case { fen: "4k3/8/8/8/8/8/p7/7K b - - 0 1", from: 8, to: 0, capture: false }, // a2-a1
        Case { fen: "k6r/6P1/8/8/8/8/8/4K3 w - - 0 1", from: 54, to: 63, capture: true }, // g7xh8
        Case { fen: "7K/8/8/8/8/8/6p1/k6R b - - 0 1", from: 14, to: 7, capture: true }, // g2xh1
    ];

    for case in cases {
        for piece in [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight] {
            let mut board = Board::from_str(case.fen).expect("valid FEN");
            assert_parity(&board, "pre-promotion");

            let mv = Move {
                from: sq(case.from),
                to: sq(case.to),
                piece: Piece::Pawn,
                promotion: Some(piece),
                flags: if case.capture { PROMOTION_CAPTURE } else { PROMOTION },
            };
            let undo = make_move_basic(&mut board, mv);
            assert_parity(&board, "post-promotion");
            assert_eq!(board.halfmove_clock, 0, "promotion resets the halfmove clock");
            assert!(board.en_passant.is_none(), "promotion never creates an EP target");

            undo_move_basic(&mut board, undo);
            assert_parity(&board, "post-undo");
        }
    }
}

#[test]
fn capture_promotion_on_a_corner_square_clears_the_matching_castling_right() {
    // White captures the black rook on h8 by promoting: Black's kingside
    // right must die with the rook, same as a normal capture would.
    let mut b = Board::from_str("4k2r/6P1/8/8/8/8/8/4K3 w k - 0 1").unwrap();
    assert_ne!(b.castling_rights & CASTLE_BK, 0, "precondition: black has 'k'");
    let mv = Move {
        from: sq(54),
        to: sq(63),
        piece: Piece::Pawn,
        promotion: Some(Piece::Queen),
        flags: PROMOTION_CAPTURE,
    };
    let undo = make_move_basic(&mut b, mv);
    assert_eq!(b.castling_rights & CASTLE_BK, 0);
    assert_parity(&b, "post-promotion-capture");
    undo_move_basic(&mut b, undo);
    assert_parity(&b, "post-undo");
}

#[test]
fn repetition_count_tracks_position_not_just_piece_placement() {
    let mut b = Board::from_str("8/8/8/8/8/8/4k3/4K3 w - - 0 1").unwrap();
    assert_eq!(b.repetition_count(), 1);

    let u1 = make_move_basic(&mut b, mv_king(4, 3));
    let u2 = make_move_basic(&mut b, mv_king(12, 11));
    let u3 = make_move_basic(&mut b, mv_king(3, 4));
    let u4 = make_move_basic(&mut b, mv_king(11, 12));
    assert_eq!(b.repetition_count(), 2, "one full king shuffle round trip");
    assert!(!b.is_threefold());

    let u5 = make_move_basic(&mut b, mv_king(4, 3));
    let u6 = make_move_basic(&mut b, mv_king(12, 11));
    let u7 = make_move_basic(&mut b, mv_king(3, 4));
    let u8 = make_move_basic(&mut b, mv_king(11, 12));
    assert!(b.repetition_count() >= 3);
    assert!(b.is_threefold());

    for u in [u8, u7, u6, u5, u4, u3, u2, u1] {
        undo_move_basic(&mut b, u);
    }
    assert_eq!(b.repetition_count(), 1);
}

#[test]
fn irreversible_moves_truncate_repetition_history() {
    let mut b = Board::from_str("8/8/8/8/8/8/3Pk3/4K3 w - - 0 1").unwrap();

    let u1 = make_move_basic(&mut b, mv_king(4, 3));
    let u2 = make_move_basic(&mut b, mv_king(12, 13));
    let u3 = make_move_basic(&mut b, mv_king(3, 4));
    let u4 = make_move_basic(&mut b, mv_king(13, 12));
    assert_eq!(b.repetition_count(), 2);

    let u5 = make_move_basic(&mut b, mv_pawn(11, 19)); // d2-d3, irreversible
    assert_eq!(b.history.len(), 1, "pawn push must truncate the ancestor list");
    assert_eq!(b.repetition_count(), 1);
    assert!(!b.is_threefold());

    undo_move_basic(&mut b, u5);
    undo_move_basic(&mut b, u4);
    undo_move_basic(&mut b, u3);
    undo_move_basic(&mut b, u2);
    undo_move_basic(&mut b, u1);
}

#[test]
fn en_passant_disappearing_breaks_an_otherwise_repeated_position() {
    let mut b = Board::from_str("8/8/8/3pP3/8/8/4k3/4K3 w - d6 0 1").unwrap();
    let start_hash = b.zobrist;

    let u1 = make_move_basic(&mut b, mv_king(4, 3));
    let u2 = make_move_basic(&mut b, mv_king(12, 11));
    let u3 = make_move_basic(&mut b, mv_king(3, 4));
    let u4 = make_move_basic(&mut b, mv_king(11, 12));

    assert_ne!(
        b.zobrist, start_hash,
        "the lost EP target makes this position distinct from the start, despite identical pieces"
    );
    assert_eq!(b.repetition_count(), 1);

    undo_move_basic(&mut b, u4);
    undo_move_basic(&mut b, u3);
    undo_move_basic(&mut b, u2);
    undo_move_basic(&mut b, u1);
}

#[test]
fn promotion_and_capture_both_truncate_history_and_restore_on_undo() {
    for (fen, mv) in [
        (
            "8/P7/8/8/8/8/8/4k2K w - - 0 1",
            Move { from: sq(48), to: sq(56), piece: Piece::Pawn, promotion: Some(Piece::Queen), flags: PROMOTION },
        ),
        (
            "k6r/6P1/8/8/8/8/8/4K3 w - - 0 1",
            Move { from: sq(54), to: sq(63), piece: Piece::Pawn, promotion: Some(Piece::Queen), flags: PROMOTION_CAPTURE },
        ),
    ] {
        let mut b = Board::from_str(fen).unwrap();
        let before_len = b.history.len();
        let undo = make_move_basic(&mut b, mv);
        assert_eq!(b.history.len(), 1);
        undo_move_basic(&mut b, undo);
        assert_eq!(b.history.len(), before_len);
    }
}

#[test]
fn make_undo_round_trip_preserves_hash_for_every_legal_startpos_move() {
    let mut board = Board::new();
    let tables = load_magic_tables();
    let mut moves = Vec::new();
    let mut pseudo_scratch = Vec::new();
    generate_legal(&mut board, &tables, &mut moves, &mut pseudo_scratch);

    for mv in moves {
        let before = board.zobrist;
        let undo = make_move_basic(&mut board, mv);
        assert_ne!(before, board.zobrist, "{mv} should change the hash");
        undo_move_basic(&mut board, undo);
        assert_eq!(before, board.zobrist, "{mv} should restore the hash on undo");
    }
}
