// O(1) FEN glyph <-> (piece, color) maps, built from one canonical table so
// the uppercase/lowercase and piece/char pairings can't drift apart.

use super::{Color, Piece};

/// (glyph, piece, color) for all 12 pieces; White uppercase, Black lowercase.
const GLYPHS: [(char, Piece, Color); 12] = [
    ('P', Piece::Pawn, Color::White),
    ('N', Piece::Knight, Color::White),
    ('B', Piece::Bishop, Color::White),
    ('R', Piece::Rook, Color::White),
    ('Q', Piece::Queen, Color::White),
    ('K', Piece::King, Color::White),
    ('p', Piece::Pawn, Color::Black),
    ('n', Piece::Knight, Color::Black),
    ('b', Piece::Bishop, Color::Black),
    ('r', Piece::Rook, Color::Black),
    ('q', Piece::Queen, Color::Black),
    ('k', Piece::King, Color::Black),
];

#[inline]
const fn pc_index(piece: Piece, color: Color) -> usize {
    (color as usize) * 6 + (piece as usize)
}

pub(super) const CHAR_TO_PC: [Option<(Piece, Color)>; 128] = {
    let mut table: [Option<(Piece, Color)>; 128] = [None; 128];
    let mut i = 0;
    while i < GLYPHS.len() {
        let (glyph, piece, color) = GLYPHS[i];
        table[glyph as usize] = Some((piece, color));
        i += 1;
    }
    table
};

pub(super) const PC_TO_CHAR: [char; 12] = {
    let mut t = ['\0'; 12];
    let mut i = 0;
    while i < GLYPHS.len() {
        let (glyph, piece, color) = GLYPHS[i];
        t[pc_index(piece, color)] = glyph;
        i += 1;
    }
    t
};

#[cfg(any(test, debug_assertions))]
mod debug_guards {
    use super::*;
    pub fn _assert_tables() {
        debug_assert_eq!(Color::White as u8, 0);
        debug_assert_eq!(Color::Black as u8, 1);

        // Round-trip the 12 canonical glyphs.
        const GLYPHS: [char; 12] = ['P', 'N', 'B', 'R', 'Q', 'K', 'p', 'n', 'b', 'r', 'q', 'k'];
        for &g in &GLYPHS {
            let (piece, color) = CHAR_TO_PC[g as usize].expect("glyph missing from CHAR_TO_PC");
            let idx = pc_index(piece, color);
            debug_assert_eq!(PC_TO_CHAR[idx], g, "pc→char mismatch for {}", g);
        }
    }
}
