//! Padded 16x16 xiangqi board, move generation and rotation.
//!
//! A position is always stored from the point of view of the side about to
//! move: its pieces are uppercase and sit at the bottom of the board. Making a
//! move rotates the board half a turn, so the opponent becomes the mover.

use super::tables::{MATE_UPPER, piece_square};
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::instrument;

/// Number of cells in the padded board.
pub const BOARD_LEN: usize = 256;

/// Cells per board row (including padding).
pub const ROW_STRIDE: usize = 16;

/// Size of the square index space touched by rotation; `k` maps to `SQUARE_SPACE - 1 - k`.
pub const SQUARE_SPACE: usize = 255;

/// Row and column of the top-left playable cell.
pub const DISPLAY_ORIGIN: (usize, usize) = (3, 3);

/// Playable rows.
pub const DISPLAY_ROWS: usize = 10;

/// Playable columns.
pub const DISPLAY_COLS: usize = 9;

/// Square of file `a`, rank `0` (bottom-left corner of the mover's side).
pub const A0: usize = 12 * ROW_STRIDE + 3;

/// Square of file `a`, rank `9` (top-left corner).
pub const A9: usize = 3 * ROW_STRIDE + 3;

const EMPTY: u8 = b'.';
const PADDING: u8 = b' ';

const N: isize = -(ROW_STRIDE as isize);
const E: isize = 1;
const S: isize = ROW_STRIDE as isize;
const W: isize = -1;

/// Standard opening layout, mover (red) at the bottom.
const INITIAL: &str = concat!(
    "               \n",
    "               \n",
    "               \n",
    "   rnbakabnr   \n",
    "   .........   \n",
    "   .c.....c.   \n",
    "   p.p.p.p.p   \n",
    "   .........   \n",
    "   .........   \n",
    "   P.P.P.P.P   \n",
    "   .C.....C.   \n",
    "   .........   \n",
    "   RNBAKABNR   \n",
    "               \n",
    "               \n",
    "               \n",
);

/// A move between two squares, in the frame of the position it is played in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct Move {
    /// Origin square.
    pub from: usize,
    /// Destination square.
    pub to: usize,
}

/// Error building a position from a custom layout.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum LayoutError {
    /// A row does not have exactly nine cells.
    #[display("Row {} has {} cells, expected {}", row, len, DISPLAY_COLS)]
    RowWidth {
        /// Row index from the top.
        row: usize,
        /// Actual cell count.
        len: usize,
    },
    /// A cell holds something other than a piece letter or `.`.
    #[display("Unknown piece {:?} in row {}", piece, row)]
    UnknownPiece {
        /// Row index from the top.
        row: usize,
        /// Offending character.
        piece: char,
    },
}

impl std::error::Error for LayoutError {}

/// Immutable board state plus the mover's incremental evaluation.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Position {
    board: [u8; BOARD_LEN],
    score: i32,
}

impl Position {
    /// Standard opening position with score zero.
    pub fn initial() -> Self {
        let mut board = [PADDING; BOARD_LEN];
        board.copy_from_slice(INITIAL.as_bytes());
        Self { board, score: 0 }
    }

    /// Builds a position from ten rows of nine cells, top row first.
    ///
    /// Uppercase letters belong to the mover, lowercase to the opponent.
    #[instrument(skip(rows))]
    pub fn from_rows(rows: [&str; DISPLAY_ROWS], score: i32) -> Result<Self, LayoutError> {
        let mut position = Self::initial();
        let (row0, col0) = DISPLAY_ORIGIN;
        for (row, text) in rows.iter().enumerate() {
            let cells = text.as_bytes();
            if cells.len() != DISPLAY_COLS {
                return Err(LayoutError::RowWidth {
                    row,
                    len: cells.len(),
                });
            }
            for (col, &cell) in cells.iter().enumerate() {
                if cell != EMPTY && !b"RNBAKCP".contains(&cell.to_ascii_uppercase()) {
                    return Err(LayoutError::UnknownPiece {
                        row,
                        piece: cell as char,
                    });
                }
                position.board[(row0 + row) * ROW_STRIDE + col0 + col] = cell;
            }
        }
        position.score = score;
        Ok(position)
    }

    /// Raw padded cells.
    pub fn board(&self) -> &[u8; BOARD_LEN] {
        &self.board
    }

    /// Evaluation from the point of view of the side about to move.
    pub fn score(&self) -> i32 {
        self.score
    }

    /// Cell at `square`, padding outside the board.
    pub fn cell(&self, square: usize) -> u8 {
        self.board.get(square).copied().unwrap_or(PADDING)
    }

    /// True when any of `pieces` (mover's letters) is still on the board.
    pub fn has_any(&self, pieces: &[u8]) -> bool {
        self.board.iter().any(|cell| pieces.contains(cell))
    }

    /// Same board seen from the other side: squares mirrored, colours swapped, score negated.
    pub fn rotate(&self) -> Self {
        let mut board = [PADDING; BOARD_LEN];
        for (k, cell) in board.iter_mut().take(SQUARE_SPACE).enumerate() {
            *cell = swap_case(self.board[SQUARE_SPACE - 1 - k]);
        }
        Self {
            board,
            score: -self.score,
        }
    }

    /// Passes the turn without moving.
    pub fn null_move(&self) -> Self {
        self.rotate()
    }

    /// Score change caused by `mv`, from the mover's point of view.
    pub fn value(&self, mv: Move) -> i32 {
        let piece = self.board[mv.from];
        let captured = self.board[mv.to];
        let mut score = piece_square(piece, mv.to) - piece_square(piece, mv.from);
        if captured.is_ascii_lowercase() {
            let upper = captured.to_ascii_uppercase();
            score += piece_square(upper, SQUARE_SPACE - 1 - mv.to);
            if upper == b'K' {
                score += 2 * MATE_UPPER;
            }
        }
        score
    }

    /// Plays `mv` and returns the rotated result, opponent to move.
    pub fn apply(&self, mv: Move) -> Self {
        let mut next = Self {
            board: self.board,
            score: self.score + self.value(mv),
        };
        next.board[mv.to] = next.board[mv.from];
        next.board[mv.from] = EMPTY;
        next.rotate()
    }

    /// Pseudo-legal moves for the side to move. Leaving the general en prise is
    /// allowed; capturing it ends the game.
    pub fn moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(48);
        for (from, &piece) in self.board.iter().enumerate() {
            if !piece.is_ascii_uppercase() {
                continue;
            }
            match piece {
                b'K' => {
                    self.flying_general(from, &mut moves);
                    self.steps(from, piece, &[N, E, S, W], &mut moves);
                }
                b'C' => self.cannon(from, &mut moves),
                b'R' => self.slides(from, &mut moves),
                b'P' => self.steps(from, piece, &[N, W, E], &mut moves),
                b'N' => self.steps(
                    from,
                    piece,
                    &[N + N + E, E + N + E, E + S + E, S + S + E, S + S + W, W + S + W, W + N + W, N + N + W],
                    &mut moves,
                ),
                b'B' => self.steps(
                    from,
                    piece,
                    &[2 * N + 2 * E, 2 * S + 2 * E, 2 * S + 2 * W, 2 * N + 2 * W],
                    &mut moves,
                ),
                b'A' => self.steps(from, piece, &[N + E, S + E, S + W, N + W], &mut moves),
                _ => {}
            }
        }
        moves
    }

    fn flying_general(&self, from: usize, moves: &mut Vec<Move>) {
        let mut square = from.saturating_sub(ROW_STRIDE);
        while square > A9 {
            match self.board[square] {
                b'k' => {
                    moves.push(Move::new(from, square));
                    break;
                }
                EMPTY => square -= ROW_STRIDE,
                _ => break,
            }
        }
    }

    fn cannon(&self, from: usize, moves: &mut Vec<Move>) {
        for d in [N, E, S, W] {
            let mut screened = false;
            let mut to = offset(from, d);
            while let Some(square) = to {
                let cell = self.board[square];
                if is_padding(cell) {
                    break;
                }
                if !screened {
                    if cell == EMPTY {
                        moves.push(Move::new(from, square));
                    } else {
                        screened = true;
                    }
                } else if cell.is_ascii_lowercase() {
                    moves.push(Move::new(from, square));
                    break;
                } else if cell.is_ascii_uppercase() {
                    break;
                }
                to = offset(square, d);
            }
        }
    }

    fn slides(&self, from: usize, moves: &mut Vec<Move>) {
        for d in [N, E, S, W] {
            let mut to = offset(from, d);
            while let Some(square) = to {
                let cell = self.board[square];
                if is_padding(cell) || cell.is_ascii_uppercase() {
                    break;
                }
                moves.push(Move::new(from, square));
                if cell.is_ascii_lowercase() {
                    break;
                }
                to = offset(square, d);
            }
        }
    }

    /// Single-step pieces: soldier, horse, elephant, advisor, general.
    fn steps(&self, from: usize, piece: u8, directions: &[isize], moves: &mut Vec<Move>) {
        for &d in directions {
            let Some(to) = offset(from, d) else { continue };
            let cell = self.board[to];
            if is_padding(cell) || cell.is_ascii_uppercase() {
                continue;
            }
            let blocked = match piece {
                // sideways only once across the river
                b'P' => (d == E || d == W) && from > 128,
                b'A' | b'K' => !in_palace(to),
                b'B' => to < 128 || self.occupied(from as isize + d / 2),
                b'N' => {
                    let dx = (to as isize - from as isize) & 15;
                    let leg = match dx {
                        2 => from as isize + 1,
                        14 => from as isize - 1,
                        _ if to > from => from as isize + S,
                        _ => from as isize + N,
                    };
                    self.occupied(leg)
                }
                _ => false,
            };
            if !blocked {
                moves.push(Move::new(from, to));
            }
        }
    }

    fn occupied(&self, square: isize) -> bool {
        usize::try_from(square).map_or(true, |sq| self.cell(sq) != EMPTY)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (row0, col0) = DISPLAY_ORIGIN;
        let rows: Vec<String> = (row0..row0 + DISPLAY_ROWS)
            .map(|row| {
                let start = row * ROW_STRIDE + col0;
                String::from_utf8_lossy(&self.board[start..start + DISPLAY_COLS]).into_owned()
            })
            .collect();
        f.debug_struct("Position")
            .field("score", &self.score)
            .field("rows", &rows)
            .finish()
    }
}

fn offset(square: usize, d: isize) -> Option<usize> {
    square.checked_add_signed(d).filter(|&sq| sq < BOARD_LEN)
}

fn in_palace(square: usize) -> bool {
    let col = square & 15;
    square >= 160 && (6..=8).contains(&col)
}

fn is_padding(cell: u8) -> bool {
    cell.is_ascii_whitespace()
}

fn swap_case(cell: u8) -> u8 {
    if cell.is_ascii_uppercase() {
        cell.to_ascii_lowercase()
    } else {
        cell.to_ascii_uppercase()
    }
}
