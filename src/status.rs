use crate::board::{Board, Color, Piece};
use crate::moves::execute::generate_legal;
use crate::moves::magic::MagicTables;
use crate::moves::square_control::in_check;

// Public enum you can use anywhere without pulling movegen into board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]

pub enum GameStatus {
    InPlay,
    DrawFivefold,
    DrawSeventyFiveMove,
    DrawThreefold,
    DrawFiftyMove,
    DrawDeadPosition,
    Stalemate,
    Checkmate,
}

// Ply thresholds shared between the free predicates below and
// `position_status`, so the two can't drift out of sync.
const FIFTY_MOVE_PLIES: u32 = 100;
const SEVENTYFIVE_MOVE_PLIES: u32 = 150;
const FIVEFOLD_COUNT: u8 = 5;

// Free helpers that do not live on Board (prevents board → status imports)
pub fn is_draw_by_threefold(board: &Board) -> bool {
    board.is_threefold()
}
pub fn is_draw_by_fifty_move(board: &Board) -> bool {
    board.halfmove_clock >= FIFTY_MOVE_PLIES
}

pub fn is_fivefold(board: &Board) -> bool {
    board.repetition_count() >= FIVEFOLD_COUNT
}
pub fn is_seventyfive_move(board: &Board) -> bool {
    board.halfmove_clock >= SEVENTYFIVE_MOVE_PLIES
}

/// Per-side minor piece counts used by the insufficient-material check.
struct MinorCounts {
    bishops: u32,
    knights: u32,
}

impl MinorCounts {
    fn for_side(board: &Board, color: Color) -> Self {
        Self {
            bishops: board.bb(color, Piece::Bishop).count_ones(),
            knights: board.bb(color, Piece::Knight).count_ones(),
        }
    }

    fn total(&self) -> u32 {
        self.bishops + self.knights
    }
}

pub fn is_insufficient_material(board: &Board) -> bool {
    // Quick reject: any pawn/rook/queen on the board => mating material exists.
    let heavy_or_pawns = [Piece::Pawn, Piece::Rook, Piece::Queen]
        .iter()
        .any(|&p| board.bb(Color::White, p) | board.bb(Color::Black, p) != 0);
    if heavy_or_pawns {
        return false;
    }

    let white = MinorCounts::for_side(board, Color::White);
    let black = MinorCounts::for_side(board, Color::Black);
    let total_minors = white.total() + black.total();

    match total_minors {
        // K vs K, or K vs KB/KN
        0 | 1 => true,
        2 => {
            // Two knights on one side (KNN vs K) cannot mate.
            // One minor each side (KN vs kn, KB vs kb, KB vs kn) cannot mate.
            white.knights == 2 || black.knights == 2 || (white.total() == 1 && black.total() == 1)
        }
        // 3+ minors total: these sets can allow mate (KBB vs K, KBN vs K, ...).
        _ => false,
    }
}

/// Determine the game status for the current position.
///
/// Priority (highest → lowest):
///  1) `DrawFivefold`          (automatic)
///  2) `DrawSeventyFiveMove`   (automatic; halfmove_clock ≥ 150)
///  3) `DrawDeadPosition`      (insufficient material)
///  4) `DrawThreefold`         (claimable)
///  5) `DrawFiftyMove`         (claimable; halfmove_clock ≥ 100)
///  6) `Checkmate` / `Stalemate` / `InPlay`
pub fn position_status(board: &mut Board, tables: &MagicTables) -> GameStatus {
    // Snapshot the clock once; decisions below use this immutable view.
    let hmc = board.halfmove_clock;

    // FIDE automatic first
    if board.repetition_count() >= FIVEFOLD_COUNT {
        return GameStatus::DrawFivefold;
    }
    if hmc >= SEVENTYFIVE_MOVE_PLIES {
        return GameStatus::DrawSeventyFiveMove;
    }

    // Dead position (insufficient material)
    if is_insufficient_material(board) {
        return GameStatus::DrawDeadPosition;
    }

    // Claim-based
    if board.is_threefold() {
        return GameStatus::DrawThreefold;
    }
    if hmc >= FIFTY_MOVE_PLIES {
        return GameStatus::DrawFiftyMove;
    }

    // Move-based outcomes
    let mut legal = Vec::with_capacity(64);
    let mut scratch = Vec::with_capacity(256);
    generate_legal(board, tables, &mut legal, &mut scratch);
    if legal.is_empty() {
        if in_check(board, board.side_to_move, tables) {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        }
    } else {
        GameStatus::InPlay
    }
}
