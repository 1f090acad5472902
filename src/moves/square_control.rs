use crate::board::{Board, Color, Piece};
use crate::moves::king::KING_ATTACKS;
use crate::moves::knight::KNIGHT_ATTACKS;
use crate::moves::magic::MagicTables;
use crate::moves::pawn::pawn_attacks;
use crate::moves::types::Move;
use crate::square::Square;

/// Bitboard file masks (a1 = bit 0 … h8 = bit 63).
pub const FILE_A: u64 = 0x0101_0101_0101_0101;
pub const FILE_H: u64 = 0x8080_8080_8080_8080;

/// Returns a bitboard showing all the squares that *piece* could attack from *square*
pub fn attacks_from(
    piece: Piece,
    color: Color,
    square: u8,
    blockers: u64,
    tables: &MagicTables,
) -> u64 {
    let sq = square as usize;

    match piece {
        Piece::Knight => KNIGHT_ATTACKS[sq],
        Piece::King => KING_ATTACKS[sq],
        Piece::Pawn => pawn_attacks(sq, color),
        Piece::Bishop => tables.bishop.get_attacks(square as usize, blockers),
        Piece::Rook => tables.rook.get_attacks(sq, blockers),
        Piece::Queen => tables.queen_attacks(sq, blockers),
    }
}

/// Is `square` attacked by any `attacker`-colored piece? Walks backwards from
/// the target square using each piece's own attack pattern, rather than
/// generating every attacker's moves and checking membership — cheaper
/// because this runs on every legality check, not just once per move.
pub fn is_square_attacked(
    board: &Board,
    square: Square,
    attacker: Color,
    tables: &MagicTables,
) -> bool {
    let index = square.index() as usize;
    let target = 1u64 << index;

    // Pawn attackers sit diagonally behind the target from the attacker's
    // point of view, so this looks "backwards" from a pawn's own attack
    // table: White attackers come from one rank below, Black from above.
    let pawn_attackers = match attacker {
        Color::White => ((target & !FILE_H) >> 7) | ((target & !FILE_A) >> 9),
        Color::Black => ((target & !FILE_A) << 7) | ((target & !FILE_H) << 9),
    };
    if pawn_attackers & board.pieces(Piece::Pawn, attacker) != 0 {
        return true;
    }
    if KNIGHT_ATTACKS[index] & board.pieces(Piece::Knight, attacker) != 0 {
        return true;
    }
    if KING_ATTACKS[index] & board.pieces(Piece::King, attacker) != 0 {
        return true;
    }

    let occupied = board.occupied();
    let rook_attacks = tables.rook.get_attacks(index, occupied);
    let bishop_attacks = tables.bishop.get_attacks(index, occupied);

    rook_attacks & board.pieces(Piece::Rook, attacker) != 0
        || bishop_attacks & board.pieces(Piece::Bishop, attacker) != 0
        || (rook_attacks | bishop_attacks) & board.pieces(Piece::Queen, attacker) != 0
}

#[inline(always)]
pub fn in_check(board: &Board, side: Color, tables: &MagicTables) -> bool {
    let king_sq = board.king_square(side);
    is_square_attacked(board, king_sq, side.opposite(), tables)
}

/// A castle is legal only if the king is not currently in check and does not
/// cross or land on an attacked square; occupancy between king and rook is
/// checked separately by the caller before a castle move is even formed.
pub fn is_legal_castling(board: &Board, mv: Move, tables: &MagicTables) -> bool {
    let color = board.side_to_move;
    if in_check(board, color, tables) {
        return false;
    }

    let (start_idx, middle_idx, end_idx) = match (color, mv.to.index()) {
        (Color::White, 6) => (4, 5, 6),     // White kingside
        (Color::White, 2) => (4, 3, 2),     // White queenside
        (Color::Black, 62) => (60, 61, 62), // Black kingside
        (Color::Black, 58) => (60, 59, 58), // Black queenside
        _ => return false,
    };

    let opp = color.opposite();
    [start_idx, middle_idx, end_idx]
        .into_iter()
        .all(|sq| !is_square_attacked(board, Square::from_index(sq as u8), opp, tables))
}
