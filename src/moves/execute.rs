use crate::board::castle_bits::*;
use crate::board::{Board, Color, EMPTY_SQ, Piece};
use crate::hash::zobrist::{ep_file_to_hash, xor_castling_rights_delta, zobrist_keys};
use crate::moves::magic::MagicTables;
use crate::moves::movegen::generate_pseudo_legal;
use crate::moves::square_control::{in_check, is_legal_castling};
use crate::moves::types::{Move, MoveBuffer, NullMoveUndo, Undo};
use crate::square::Square;

/// Precomputed castling rook squares, keyed by the king's destination
/// square. The four castle destinations are fixed regardless of position,
/// so this is a lookup rather than arithmetic on `mv`.
#[inline(always)]
fn rook_castle_squares(king_to_idx: u8) -> Option<(Square, Square)> {
    match king_to_idx {
        6 => Some((Square::from_index(7), Square::from_index(5))), // White O-O
        2 => Some((Square::from_index(0), Square::from_index(3))), // White O-O-O
        62 => Some((Square::from_index(63), Square::from_index(61))), // Black O-O
        58 => Some((Square::from_index(56), Square::from_index(59))), // Black O-O-O
        _ => None,
    }
}

#[inline(always)]
fn rights_mask_for_rook_square(color: Color, rook_sq: u8) -> u8 {
    match (color, rook_sq) {
        (Color::White, 0) => CASTLE_WQ,  // a1
        (Color::White, 7) => CASTLE_WK,  // h1
        (Color::Black, 56) => CASTLE_BQ, // a8
        (Color::Black, 63) => CASTLE_BK, // h8
        _ => 0,
    }
}

#[inline(always)]
fn remove_piece(board: &mut Board, color: Color, piece: Piece, idx: usize) {
    let new_bb = board.bb(color, piece) & !(1u64 << idx);
    board.set_bb(color, piece, new_bb);
}

#[inline(always)]
fn place_piece(board: &mut Board, color: Color, piece: Piece, idx: usize) {
    let new_bb = board.bb(color, piece) | (1u64 << idx);
    board.set_bb(color, piece, new_bb);
}

/// XOR the en-passant file key in or out of the hash, matching whatever
/// `ep_file_to_hash` currently reports. Called once before a position
/// changes (to remove the outgoing EP key) and once after (to add the
/// incoming one), so it's pulled out rather than repeated at each call site.
#[inline(always)]
fn toggle_ep_hash(board: &mut Board) {
    if let Some(f) = ep_file_to_hash(board) {
        board.zobrist ^= zobrist_keys().ep_file[f as usize];
    }
}

/// Resolve what `mv` captures, if anything, and remove it from the board.
/// En passant captures a pawn on a square the move doesn't land on, so it
/// can't be read off `piece_on_sq[to]` the way an ordinary capture is.
fn resolve_and_remove_capture(
    board: &mut Board,
    mv: Move,
    color: Color,
    to_idx: usize,
) -> Option<(Color, Piece, Square)> {
    if mv.is_en_passant() {
        let cap_sq = if color == Color::White {
            to_idx - 8
        } else {
            to_idx + 8
        };
        remove_piece(board, color.opposite(), Piece::Pawn, cap_sq);
        Some((color.opposite(), Piece::Pawn, Square::from_index(cap_sq as u8)))
    } else {
        let occupant = board.piece_on_sq[to_idx];
        if occupant == EMPTY_SQ {
            return None;
        }
        let cap_color = Color::from_u8(occupant >> 3);
        let cap_piece = Piece::from_u8(occupant & 0b111);
        remove_piece(board, cap_color, cap_piece, to_idx);
        Some((cap_color, cap_piece, mv.to))
    }
}

/// Castling rights lost by playing `mv`: the mover's own rights if a king or
/// rook left its home square, plus the opponent's if `mv` captured a rook
/// still sitting on its home corner.
fn rights_lost_by(mv: Move, color: Color, piece: Piece, capture: Option<(Color, Piece, Square)>) -> u8 {
    let mut mask = 0u8;

    if piece == Piece::King {
        mask |= match color {
            Color::White => CASTLE_WK | CASTLE_WQ,
            Color::Black => CASTLE_BK | CASTLE_BQ,
        };
    }

    if piece == Piece::Rook {
        mask |= rights_mask_for_rook_square(color, mv.from.index());
    }

    if let Some((cap_color, cap_piece, cap_sq)) = capture
        && cap_piece == Piece::Rook
    {
        mask |= rights_mask_for_rook_square(cap_color, cap_sq.index());
    }

    mask
}

/// Record the en-passant target for a pawn double push, if `mv` is one.
fn double_push_ep_square(mv: Move, piece: Piece, color: Color, from_idx: usize, to_idx: usize) -> Option<Square> {
    if piece != Piece::Pawn {
        return None;
    }
    let from_rank = from_idx / 8;
    let to_rank = to_idx / 8;
    let is_double_push = (color == Color::White && from_rank == 1 && to_rank == 3)
        || (color == Color::Black && from_rank == 6 && to_rank == 4);
    if !is_double_push {
        return None;
    }
    let ep_sq = if color == Color::White {
        from_idx + 8
    } else {
        from_idx - 8
    };
    debug_assert!(
        (color == Color::White && ep_sq / 8 == 2) || (color == Color::Black && ep_sq / 8 == 5),
        "en passant square on wrong rank for {:?}: {:?}",
        color,
        mv
    );
    Some(Square::from_index(ep_sq as u8))
}

pub fn make_move_basic(board: &mut Board, mv: Move) -> Undo {
    let start_zobrist = board.zobrist;
    let color = board.side_to_move;
    let piece = mv.piece;
    let from_idx = mv.from.index() as usize;
    let to_idx = mv.to.index() as usize;

    let prev_en_passant = board.en_passant;
    let prev_halfmove_clock = board.halfmove_clock;
    let prev_fullmove_number = board.fullmove_number;

    toggle_ep_hash(board); // drop the outgoing EP key before state changes
    board.en_passant = None;

    let capture = resolve_and_remove_capture(board, mv, color, to_idx);

    let old_rights = board.castling_rights;
    let castling_rook = if mv.is_castling() {
        rook_castle_squares(to_idx as u8)
    } else {
        None
    };

    let mut undo = Undo {
        from: mv.from,
        to: mv.to,
        piece,
        color,
        prev_side: color,
        capture,
        castling_rook,
        prev_castling_rights: old_rights,
        promotion: None,
        prev_en_passant,
        prev_halfmove_clock,
        prev_fullmove_number,
        prev_history: None,
    };

    if let Some(ep) = double_push_ep_square(mv, piece, color, from_idx, to_idx) {
        board.en_passant = Some(ep);
    }

    let mask_to_clear = rights_lost_by(mv, color, piece, capture);
    let new_rights = old_rights & !mask_to_clear;
    if new_rights != old_rights {
        board.castling_rights = new_rights;
        xor_castling_rights_delta(&mut board.zobrist, zobrist_keys(), old_rights, new_rights);
    }

    remove_piece(board, color, piece, from_idx);
    if let Some(prom) = mv.promotion {
        debug_assert!(piece == Piece::Pawn, "only pawns can promote");
        place_piece(board, color, prom, to_idx);
        undo.promotion = Some(prom);
    } else {
        place_piece(board, color, piece, to_idx);
    }

    if let Some((rook_from, rook_to)) = undo.castling_rook {
        remove_piece(board, color, Piece::Rook, rook_from.index() as usize);
        place_piece(board, color, Piece::Rook, rook_to.index() as usize);
    }

    board.halfmove_clock = if capture.is_some() || piece == Piece::Pawn {
        0
    } else {
        prev_halfmove_clock + 1
    };
    if color == Color::Black {
        board.fullmove_number = prev_fullmove_number + 1;
    }

    board.side_to_move = color.opposite();
    board.zobrist ^= zobrist_keys().side_to_move;
    toggle_ep_hash(board); // add the incoming EP key, if any

    #[cfg(debug_assertions)]
    debug_assert_valid_ep(board);

    // Repetition history resets at every irreversible move (capture, pawn
    // move, or promotion); otherwise the pre-move key is just appended.
    let irreversible = capture.is_some() || piece == Piece::Pawn || mv.promotion.is_some();
    undo.prev_history = if irreversible {
        let saved = board.history.clone();
        board.history.clear();
        Some(saved)
    } else {
        None
    };
    board.history.push(start_zobrist);

    #[cfg(all(debug_assertions, feature = "paranoid_hash"))]
    paranoid_hash_check(board);

    #[cfg(debug_assertions)]
    board.assert_hash();

    undo
}

#[cfg(all(debug_assertions, feature = "paranoid_hash"))]
fn paranoid_hash_check(board: &Board) {
    let full = board.compute_zobrist_full();
    let diff = board.zobrist ^ full;
    if diff == 0 {
        return;
    }
    eprintln!("HASH DIFF: stored ^ full = 0x{:016x}", diff);

    let kz = zobrist_keys();
    for f in 0..8 {
        if diff == kz.ep_file[f] {
            eprintln!("looks like an EP file mismatch: file {}", f);
        }
    }
    if diff == kz.side_to_move {
        eprintln!("side-to-move bit mismatch");
    }
    for cur in 0u8..16 {
        for prev in 0u8..16 {
            let mut z = 0u64;
            xor_castling_rights_delta(&mut z, kz, cur, prev);
            if z == diff {
                eprintln!("castling delta mismatch cur={} prev={}", cur, prev);
            }
        }
    }
}

pub fn undo_move_basic(board: &mut Board, undo: Undo) {
    toggle_ep_hash(board); // drop the current EP key before state changes back

    board.side_to_move = undo.prev_side;
    board.zobrist ^= zobrist_keys().side_to_move;

    let kz = zobrist_keys();
    let cur = board.castling_rights;
    let prev = undo.prev_castling_rights;
    if cur != prev {
        xor_castling_rights_delta(&mut board.zobrist, kz, cur, prev);
    }
    board.castling_rights = prev;

    board.halfmove_clock = undo.prev_halfmove_clock;
    board.fullmove_number = undo.prev_fullmove_number;

    let from_idx = undo.from.index() as usize;
    let to_idx = undo.to.index() as usize;

    if let Some(prom) = undo.promotion {
        remove_piece(board, undo.color, prom, to_idx);
        place_piece(board, undo.color, Piece::Pawn, from_idx);
    } else {
        remove_piece(board, undo.color, undo.piece, to_idx);
        place_piece(board, undo.color, undo.piece, from_idx);
    }

    // `undo.capture` already holds the captured pawn's square for en
    // passant, so restoring it needs no special case here.
    if let Some((cap_color, cap_piece, cap_sq)) = undo.capture {
        place_piece(board, cap_color, cap_piece, cap_sq.index() as usize);
    }

    if let Some((rook_from, rook_to)) = undo.castling_rook {
        remove_piece(board, undo.color, Piece::Rook, rook_to.index() as usize);
        place_piece(board, undo.color, Piece::Rook, rook_from.index() as usize);
    }

    board.en_passant = undo.prev_en_passant;
    toggle_ep_hash(board); // restore whatever EP key belongs to the prior position

    #[cfg(debug_assertions)]
    debug_assert_valid_ep(board);

    let _ = board.history.pop(); // drop the pre-move key make() pushed
    if let Some(prev) = undo.prev_history {
        board.history = prev;
    }

    #[cfg(debug_assertions)]
    board.assert_hash();
}

pub fn make_null_move(board: &mut Board) -> NullMoveUndo {
    board.history.push(board.zobrist);
    let undo = NullMoveUndo {
        prev_en_passant: board.en_passant,
        prev_halfmove_clock: board.halfmove_clock,
        prev_side: board.side_to_move,
    };

    toggle_ep_hash(board);
    board.en_passant = None;

    let color = board.side_to_move;
    board.side_to_move = color.opposite();
    board.zobrist ^= zobrist_keys().side_to_move;

    // The halfmove clock is deliberately left untouched: a null move isn't
    // a real ply for fifty-move purposes, only a search-side pruning probe.

    undo
}

pub fn undo_null_move(board: &mut Board, undo: NullMoveUndo) {
    board.side_to_move = undo.prev_side;
    board.zobrist ^= zobrist_keys().side_to_move;

    board.en_passant = undo.prev_en_passant;
    toggle_ep_hash(board);

    board.halfmove_clock = undo.prev_halfmove_clock;
    board.history.pop();
}

pub fn generate_legal(
    board: &mut Board,
    tables: &MagicTables,
    moves: &mut impl MoveBuffer,
    scratch: &mut impl MoveBuffer,
) {
    scratch.clear();
    generate_pseudo_legal(board, tables, scratch);
    moves.clear();

    for mv in scratch.iter().copied() {
        if mv.is_castling() && !is_legal_castling(board, mv, tables) {
            continue;
        }
        let mover = board.side_to_move;
        let undo = make_move_basic(board, mv);
        let illegal = in_check(board, mover, tables);
        undo_move_basic(board, undo);
        if !illegal {
            moves.push(mv);
        }
    }
}

/// Check if a pseudo-legal move is legal (doesn't leave own king in check).
/// For castling moves, this also checks that the king doesn't pass through check.
#[inline]
pub fn is_legal_move(board: &mut Board, mv: Move, tables: &MagicTables) -> bool {
    if mv.is_castling() {
        return is_legal_castling(board, mv, tables);
    }
    let mover = board.side_to_move;
    let undo = make_move_basic(board, mv);
    let illegal = in_check(board, mover, tables);
    undo_move_basic(board, undo);
    !illegal
}

/// Generate only legal captures, plus quiet moves that give check — the set
/// quiescence search needs so it doesn't go blind to forcing non-captures.
pub fn generate_captures(
    board: &mut Board,
    tables: &MagicTables,
    moves: &mut impl MoveBuffer,
    scratch: &mut impl MoveBuffer,
) {
    scratch.clear();
    generate_pseudo_legal(board, tables, scratch);
    moves.clear();

    for &mv in scratch.iter() {
        if !mv.is_capture() && !mv.is_promotion() {
            continue;
        }

        let mover = board.side_to_move;
        let undo = make_move_basic(board, mv);
        let legal = !in_check(board, mover, tables);
        let gives_check = in_check(board, board.side_to_move, tables);
        undo_move_basic(board, undo);

        if legal && (mv.is_capture() || gives_check) {
            moves.push(mv);
        }
    }
}

#[cfg(debug_assertions)]
#[inline]
pub(crate) fn debug_assert_valid_ep(board: &Board) {
    let Some(ep) = board.en_passant else {
        return;
    };
    let ep_idx = ep.index() as usize;
    let ep_rank = ep_idx / 8;
    debug_assert!(ep_idx % 8 <= 7, "EP file out of range: {}", ep_idx % 8);

    match board.side_to_move {
        // A pending EP square always belongs to the side that just moved,
        // so it sits on the rank behind the double-pushing pawn, one rank
        // closer to whichever side is now to move.
        Color::White => debug_assert!(
            ep_rank == 5,
            "EP must be on rank 6 (r=5) when White is to move, got rank {} at {:?}",
            ep_rank,
            ep
        ),
        Color::Black => debug_assert!(
            ep_rank == 2,
            "EP must be on rank 3 (r=2) when Black is to move, got rank {} at {:?}",
            ep_rank,
            ep
        ),
    }
}
