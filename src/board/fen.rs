//! FEN parsing and serialization. Standard six-field FEN; the fullmove counter
//! is accepted but `ply`/history bookkeeping always resets on parse.

use super::fen_tables::{CHAR_TO_PC, PC_TO_CHAR};
use super::{Board, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, Color};
use crate::square::Square;

impl Board {
    pub fn set_fen(&mut self, fen: &str) -> Result<(), String> {
        let mut fields = fen.split_whitespace();

        let placement = fields.next().ok_or("FEN missing piece placement field")?;
        let side = fields.next().ok_or("FEN missing side-to-move field")?;
        let castling = fields.next().ok_or("FEN missing castling field")?;
        let ep = fields.next().ok_or("FEN missing en passant field")?;
        let halfmove = fields.next().unwrap_or("0");
        let fullmove = fields.next().unwrap_or("1");

        let mut board = Board::new_empty();

        let mut rank = 7i32;
        let mut file = 0i32;
        for ch in placement.chars() {
            match ch {
                '/' => {
                    if file != 8 {
                        return Err(format!("rank had {file} files, expected 8"));
                    }
                    rank -= 1;
                    file = 0;
                }
                '1'..='8' => {
                    file += ch.to_digit(10).unwrap() as i32;
                }
                c => {
                    if !(0..8).contains(&rank) || !(0..8).contains(&file) {
                        return Err(format!("piece '{c}' placed outside the board"));
                    }
                    let (piece, color) = CHAR_TO_PC[c as usize]
                        .ok_or_else(|| format!("unrecognized piece glyph '{c}'"))?;
                    let sq = Square::from_file_rank(file as u8, rank as u8);
                    if board.piece_on_sq[sq.index() as usize] != super::EMPTY_SQ {
                        return Err(format!("square {sq} occupied twice"));
                    }
                    let bb = board.bb(color, piece) | (1u64 << sq.index());
                    board.set_bb(color, piece, bb);
                    file += 1;
                }
            }
        }
        if rank != 0 || file != 8 {
            return Err("piece placement did not cover exactly 8 ranks".to_string());
        }

        board.side_to_move = match side {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(format!("invalid side-to-move '{other}'")),
        };

        board.castling_rights = 0;
        if castling != "-" {
            for ch in castling.chars() {
                board.castling_rights |= match ch {
                    'K' => CASTLE_WK,
                    'Q' => CASTLE_WQ,
                    'k' => CASTLE_BK,
                    'q' => CASTLE_BQ,
                    other => return Err(format!("invalid castling glyph '{other}'")),
                };
            }
        }

        board.en_passant = if ep == "-" {
            None
        } else {
            Some(ep.parse::<Square>().map_err(|e| e.to_string())?)
        };

        board.halfmove_clock = halfmove
            .parse()
            .map_err(|_| format!("invalid halfmove clock '{halfmove}'"))?;
        board.fullmove_number = fullmove
            .parse()
            .map_err(|_| format!("invalid fullmove number '{fullmove}'"))?;

        board.history.clear();
        board.refresh_zobrist();

        *self = board;
        Ok(())
    }

    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(64);

        for rank in (0..8).rev() {
            let mut empty_run = 0;
            for file in 0..8 {
                let sq = Square::from_file_rank(file, rank);
                match self.piece_at(sq) {
                    None => empty_run += 1,
                    Some((color, piece)) => {
                        if empty_run > 0 {
                            out.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        let idx = (color as usize) * 6 + (piece as usize);
                        out.push(PC_TO_CHAR[idx]);
                    }
                }
            }
            if empty_run > 0 {
                out.push_str(&empty_run.to_string());
            }
            if rank != 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        out.push(' ');
        if self.castling_rights == 0 {
            out.push('-');
        } else {
            if self.castling_rights & CASTLE_WK != 0 {
                out.push('K');
            }
            if self.castling_rights & CASTLE_WQ != 0 {
                out.push('Q');
            }
            if self.castling_rights & CASTLE_BK != 0 {
                out.push('k');
            }
            if self.castling_rights & CASTLE_BQ != 0 {
                out.push('q');
            }
        }

        out.push(' ');
        match self.en_passant {
            Some(sq) => out.push_str(&sq.to_string()),
            None => out.push('-'),
        }

        out.push(' ');
        out.push_str(&self.halfmove_clock.to_string());
        out.push(' ');
        out.push_str(&self.fullmove_number.to_string());

        out
    }
}
