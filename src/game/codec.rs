//! Conversions between move text, square indices and the display grid.
//!
//! Move text is two `<file><rank>` pairs such as `h2e2`: files `a`..=`i` from
//! the player's left, ranks `0`..=`9` from the player's back rank.

use super::error::GameError;
use crate::engine::{
    A0, DISPLAY_COLS, DISPLAY_ORIGIN, DISPLAY_ROWS, Move, Position, ROW_STRIDE, SQUARE_SPACE,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Ten rows of nine cells, top row first, always in the player's orientation.
///
/// Uppercase cells are the player's (red) pieces, lowercase the engine's,
/// `.` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayGrid([String; DISPLAY_ROWS]);

impl DisplayGrid {
    /// Rows, top first.
    pub fn rows(&self) -> &[String; DISPLAY_ROWS] {
        &self.0
    }
}

impl std::fmt::Display for DisplayGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, row) in self.0.iter().enumerate() {
            writeln!(f, "{} {}", DISPLAY_ROWS - 1 - i, row)?;
        }
        write!(f, "  abcdefghi")
    }
}

/// Parses move text into a move in the player's frame. Purely syntactic.
#[instrument]
pub fn parse_move_text(text: &str) -> Result<Move, GameError> {
    let malformed = || GameError::MalformedMoveText(text.to_string());
    let bytes = text.as_bytes();
    if bytes.len() != 4 {
        return Err(malformed());
    }
    let from = parse_square(bytes[0], bytes[1]).ok_or_else(malformed)?;
    let to = parse_square(bytes[2], bytes[3]).ok_or_else(malformed)?;
    Ok(Move::new(from, to))
}

fn parse_square(file: u8, rank: u8) -> Option<usize> {
    if !(b'a'..=b'i').contains(&file) || !rank.is_ascii_digit() {
        return None;
    }
    Some(A0 + (file - b'a') as usize - ROW_STRIDE * (rank - b'0') as usize)
}

/// Renders one playable square as `<file><rank>`.
pub fn render_square(square: usize) -> String {
    let (row, col) = (square / ROW_STRIDE, square % ROW_STRIDE);
    let (row0, col0) = DISPLAY_ORIGIN;
    let file = (b'a' + (col - col0) as u8) as char;
    let rank = row0 + DISPLAY_ROWS - 1 - row;
    format!("{file}{rank}")
}

/// Renders a move whose squares are in the player's frame.
pub fn render_move(mv: Move) -> String {
    format!("{}{}", render_square(mv.from), render_square(mv.to))
}

/// Maps a square between the two sides' frames.
pub fn mirror_index(square: usize) -> usize {
    SQUARE_SPACE - 1 - square
}

/// Re-expresses a move made in the engine's rotated frame in the player's frame.
pub fn mirror_move(mv: Move) -> Move {
    Move::new(mirror_index(mv.from), mirror_index(mv.to))
}

/// Cuts the playable window out of a padded board.
pub fn to_display_grid(position: &Position) -> DisplayGrid {
    let (row0, col0) = DISPLAY_ORIGIN;
    let board = position.board();
    DisplayGrid(std::array::from_fn(|row| {
        let start = (row0 + row) * ROW_STRIDE + col0;
        board[start..start + DISPLAY_COLS]
            .iter()
            .map(|&cell| cell as char)
            .collect()
    }))
}
