use crate::board::{Board, Color, Piece};
use crate::moves::king::KING_ATTACKS;
use crate::moves::knight::KNIGHT_ATTACKS;
use crate::moves::magic::MagicTables;
use crate::moves::pawn::{BLACK_PAWN_ATTACKS, WHITE_PAWN_ATTACKS};
use crate::moves::square_control::is_legal_castling;
use crate::moves::types::{
    CAPTURE, DOUBLE_PAWN_PUSH, EN_PASSANT, KINGSIDE_CASTLE, Move, MoveBuffer, PROMOTION,
    PROMOTION_CAPTURE, QUEENSIDE_CASTLE, QUIET_MOVE,
};
use crate::square::Square;
use crate::utils::pop_lsb;

const RANK1: u64 = 0x0000_0000_0000_00FF;
const RANK2: u64 = 0x0000_0000_0000_FF00;
const RANK7: u64 = 0x00FF_0000_0000_0000;
const RANK8: u64 = 0xFF00_0000_0000_0000;

const WHITE_KINGSIDE_BETWEEN: u64 = 0x0000_0000_0000_0060;
const WHITE_QUEENSIDE_BETWEEN: u64 = 0x0000_0000_0000_000E;
const BLACK_KINGSIDE_BETWEEN: u64 = 0x6000_0000_0000_0000;
const BLACK_QUEENSIDE_BETWEEN: u64 = 0x0E00_0000_0000_0000;

/// Every promotion choice a pawn reaching the back rank may take. All four
/// are pseudo-legal even though queening dominates the under-promotions in
/// almost every position; search decides which to try, movegen doesn't.
const PROMOS: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

/// Which slice of a piece's pseudo-legal targets to emit. The staged move
/// picker asks for captures and quiets as separate passes so it can search
/// the violent half of the move list first; `All` backs perft and the
/// legality filter, which both need the whole list in one go.
#[derive(Clone, Copy, PartialEq, Eq)]
enum GenMode {
    All,
    CapturesOnly,
    QuietsOnly,
}

#[inline(always)]
fn emit_targets(
    from: u8,
    targets: u64,
    enemy: u64,
    empty: u64,
    mode: GenMode,
    piece: Piece,
    move_list: &mut impl MoveBuffer,
) {
    let mut bb = match mode {
        GenMode::All => targets,
        GenMode::CapturesOnly => targets & enemy,
        GenMode::QuietsOnly => targets & empty,
    };
    while bb != 0 {
        let to = pop_lsb(&mut bb);
        let is_cap = (enemy >> to) & 1 != 0;
        move_list.push(Move {
            from: Square::from_index(from),
            to: Square::from_index(to),
            piece,
            promotion: None,
            flags: if is_cap { CAPTURE } else { QUIET_MOVE },
        });
    }
}

#[inline(always)]
fn kingside_between(color: Color) -> u64 {
    match color {
        Color::White => WHITE_KINGSIDE_BETWEEN,
        Color::Black => BLACK_KINGSIDE_BETWEEN,
    }
}

#[inline(always)]
fn queenside_between(color: Color) -> u64 {
    match color {
        Color::White => WHITE_QUEENSIDE_BETWEEN,
        Color::Black => BLACK_QUEENSIDE_BETWEEN,
    }
}

fn generate_knight(board: &Board, mode: GenMode, move_list: &mut impl MoveBuffer) {
    let color = board.side_to_move;
    let friendly = board.occupancy(color);
    let empty = !board.occupied();
    let enemy_king = board.pieces(Piece::King, color.opposite());
    let enemy = board.opponent_occupancy(color) & !enemy_king;

    let mut bb = board.pieces(Piece::Knight, color);
    while bb != 0 {
        let from = pop_lsb(&mut bb);
        let targets = KNIGHT_ATTACKS[from as usize] & !friendly & !enemy_king;
        emit_targets(from, targets, enemy, empty, mode, Piece::Knight, move_list);
    }
}

/// Shared attack-ray walker for bishops, rooks and queens. `attacks_of`
/// closes over the right magic table (or `MagicTables::queen_attacks` for
/// the union of both) so the square-by-square loop below only needs to be
/// written once.
fn generate_sliding(
    board: &Board,
    piece: Piece,
    attacks_of: impl Fn(usize, u64) -> u64,
    mode: GenMode,
    move_list: &mut impl MoveBuffer,
) {
    let color = board.side_to_move;
    let friendly = board.occupancy(color);
    let blockers = board.occupied();
    let empty = !blockers;
    let enemy_king = board.pieces(Piece::King, color.opposite());
    let enemy = board.opponent_occupancy(color) & !enemy_king;

    let mut bb = board.pieces(piece, color);
    while bb != 0 {
        let from = pop_lsb(&mut bb);
        let attacks = attacks_of(from as usize, blockers);
        let targets = attacks & !friendly & !enemy_king;
        emit_targets(from, targets, enemy, empty, mode, piece, move_list);
    }
}

fn generate_king(
    board: &Board,
    tables: &MagicTables,
    mode: GenMode,
    move_list: &mut impl MoveBuffer,
) {
    let color = board.side_to_move;
    let king_bb = board.pieces(Piece::King, color);
    if king_bb == 0 {
        return; // illegal position safeguard
    }

    let from = king_bb.trailing_zeros() as u8; // only one king per side
    let friendly = board.occupancy(color);
    let empty = !board.occupied();
    let enemy_king = board.pieces(Piece::King, color.opposite());
    let enemy = board.opponent_occupancy(color) & !enemy_king;

    let targets = KING_ATTACKS[from as usize] & !friendly & !enemy_king;
    emit_targets(from, targets, enemy, empty, mode, Piece::King, move_list);

    if mode == GenMode::CapturesOnly {
        return; // castling is never a capture
    }

    // Occupancy between king and rook only rules out blocked castling; it
    // says nothing about the king passing through or landing in check, so
    // both sides route through `is_legal_castling` before being emitted.
    // `generate_legal` re-checks this independently, so a pseudo-legal move
    // that slips past here (there shouldn't be any) is still caught.
    let occ = board.occupied();

    if board.has_kingside_castle(color) && (occ & kingside_between(color)) == 0 {
        let mv = Move {
            from: Square::from_index(from),
            to: Square::from_index(from + 2),
            piece: Piece::King,
            promotion: None,
            flags: KINGSIDE_CASTLE,
        };
        if is_legal_castling(board, mv, tables) {
            move_list.push(mv);
        }
    }

    if board.has_queenside_castle(color) && (occ & queenside_between(color)) == 0 {
        let mv = Move {
            from: Square::from_index(from),
            to: Square::from_index(from - 2),
            piece: Piece::King,
            promotion: None,
            flags: QUEENSIDE_CASTLE,
        };
        if is_legal_castling(board, mv, tables) {
            move_list.push(mv);
        }
    }
}

#[inline(always)]
fn push_pawn_promotions(from: u8, to: u8, is_capture: bool, move_list: &mut impl MoveBuffer) {
    let flags = if is_capture {
        PROMOTION_CAPTURE
    } else {
        PROMOTION
    };
    for &promo in PROMOS.iter() {
        move_list.push(Move {
            from: Square::from_index(from),
            to: Square::from_index(to),
            piece: Piece::Pawn,
            promotion: Some(promo),
            flags,
        });
    }
}

fn generate_pawn(board: &Board, mode: GenMode, move_list: &mut impl MoveBuffer) {
    let color = board.side_to_move;
    let pawns = board.pieces(Piece::Pawn, color);
    let enemy_without_king =
        board.opponent_occupancy(color) & !board.pieces(Piece::King, color.opposite());
    let empty = !board.occupied();

    let (start_rank, promo_rank) = match color {
        Color::White => (RANK7, RANK8),
        Color::Black => (RANK2, RANK1),
    };

    let pawn_attacks = |sq: usize| -> u64 {
        match color {
            Color::White => WHITE_PAWN_ATTACKS[sq],
            Color::Black => BLACK_PAWN_ATTACKS[sq],
        }
    };

    if mode != GenMode::CapturesOnly {
        // Single and double pushes, excluding the promotion rank: a pawn
        // reaching the back rank always promotes, so it's handled below
        // instead of falling out as a plain quiet move.
        let single = match color {
            Color::White => ((pawns << 8) & empty) & !promo_rank,
            Color::Black => ((pawns >> 8) & empty) & !promo_rank,
        };
        let mut bb = single;
        while bb != 0 {
            let to = pop_lsb(&mut bb);
            let from = match color {
                Color::White => to - 8,
                Color::Black => to + 8,
            };
            move_list.push(Move {
                from: Square::from_index(from),
                to: Square::from_index(to),
                piece: Piece::Pawn,
                promotion: None,
                flags: QUIET_MOVE,
            });
        }

        let double = match color {
            Color::White => (((pawns & RANK2) << 8) & empty) << 8 & empty,
            Color::Black => (((pawns & RANK7) >> 8) & empty) >> 8 & empty,
        };
        let mut bb = double;
        while bb != 0 {
            let to = pop_lsb(&mut bb);
            let from = match color {
                Color::White => to - 16,
                Color::Black => to + 16,
            };
            move_list.push(Move {
                from: Square::from_index(from),
                to: Square::from_index(to),
                piece: Piece::Pawn,
                promotion: None,
                flags: DOUBLE_PAWN_PUSH,
            });
        }
    }

    if mode != GenMode::QuietsOnly {
        // Normal captures, excluding the promotion rank (those are handled
        // as promotion captures below so every under-promotion gets listed).
        let mut attackers = pawns & !start_rank;
        while attackers != 0 {
            let from = pop_lsb(&mut attackers);
            let mut targets = pawn_attacks(from as usize) & enemy_without_king & !promo_rank;
            while targets != 0 {
                let to = pop_lsb(&mut targets);
                move_list.push(Move {
                    from: Square::from_index(from),
                    to: Square::from_index(to),
                    piece: Piece::Pawn,
                    promotion: None,
                    flags: CAPTURE,
                });
            }
        }

        let promo_pushes = match color {
            Color::White => (pawns & start_rank) << 8 & empty,
            Color::Black => (pawns & start_rank) >> 8 & empty,
        };
        let mut bb = promo_pushes;
        while bb != 0 {
            let to = pop_lsb(&mut bb);
            let from = match color {
                Color::White => to - 8,
                Color::Black => to + 8,
            };
            push_pawn_promotions(from, to, false, move_list);
        }

        let mut promo_attackers = pawns & start_rank;
        while promo_attackers != 0 {
            let from = pop_lsb(&mut promo_attackers);
            let mut targets = pawn_attacks(from as usize) & enemy_without_king & promo_rank;
            while targets != 0 {
                let to = pop_lsb(&mut targets);
                push_pawn_promotions(from, to, true, move_list);
            }
        }

        // En passant. The capture square must hold an enemy pawn and the EP
        // square itself must be empty — true by construction since a pawn
        // can never occupy the square it just skipped over, but checked
        // anyway so a stale `en_passant` field can't manufacture a move.
        if let Some(ep_sq) = board.en_passant {
            let ep = ep_sq.index();
            if (empty & (1u64 << ep)) != 0 {
                let cap_sq = match color {
                    Color::White => ep - 8,
                    Color::Black => ep + 8,
                };
                let enemy_pawns = board.pieces(Piece::Pawn, color.opposite());
                if (enemy_pawns & (1u64 << cap_sq)) != 0 {
                    let mut atk = pawns;
                    while atk != 0 {
                        let from = pop_lsb(&mut atk);
                        if (pawn_attacks(from as usize) & (1u64 << ep)) != 0 {
                            move_list.push(Move {
                                from: Square::from_index(from),
                                to: Square::from_index(ep),
                                piece: Piece::Pawn,
                                promotion: None,
                                flags: EN_PASSANT,
                            });
                        }
                    }
                }
            }
        }
    }
}

/// Thin compatibility entry point for callers that only want pawn moves
/// (used by targeted pawn-movegen tests).
pub fn generate_pawn_moves(board: &Board, move_list: &mut impl MoveBuffer) {
    generate_pawn(board, GenMode::All, move_list);
}

fn generate_all(board: &Board, tables: &MagicTables, mode: GenMode, moves: &mut impl MoveBuffer) {
    generate_pawn(board, mode, moves);
    generate_knight(board, mode, moves);
    generate_sliding(
        board,
        Piece::Bishop,
        |sq, occ| tables.bishop.get_attacks(sq, occ),
        mode,
        moves,
    );
    generate_sliding(
        board,
        Piece::Rook,
        |sq, occ| tables.rook.get_attacks(sq, occ),
        mode,
        moves,
    );
    generate_sliding(
        board,
        Piece::Queen,
        |sq, occ| tables.queen_attacks(sq, occ),
        mode,
        moves,
    );
    generate_king(board, tables, mode, moves);
}

pub fn generate_pseudo_legal(board: &Board, tables: &MagicTables, moves: &mut impl MoveBuffer) {
    moves.clear();
    generate_all(board, tables, GenMode::All, moves);
}

/// Generate all pseudo-legal captures and promotions.
/// Includes: captures, promotion pushes, promotion captures, en passant.
pub fn generate_pseudo_legal_captures(
    board: &Board,
    tables: &MagicTables,
    moves: &mut impl MoveBuffer,
) {
    generate_all(board, tables, GenMode::CapturesOnly, moves);
}

/// Generate all pseudo-legal quiet moves (non-captures).
/// Includes: single/double pawn pushes, piece moves to empty squares, castling.
pub fn generate_pseudo_legal_quiets(
    board: &Board,
    tables: &MagicTables,
    moves: &mut impl MoveBuffer,
) {
    generate_all(board, tables, GenMode::QuietsOnly, moves);
}
