//! Material values and piece-square tables.

use super::position::{BOARD_LEN, DISPLAY_COLS, DISPLAY_ORIGIN, DISPLAY_ROWS, ROW_STRIDE};
use std::sync::LazyLock;

const PAWN: i32 = 44;
const HORSE: i32 = 108;
const ELEPHANT: i32 = 23;
const CHARIOT: i32 = 233;
const ADVISOR: i32 = 23;
const CANNON: i32 = 101;
const GENERAL: i32 = 2500;

const MATERIAL: i32 =
    2 * CHARIOT + 2 * HORSE + 2 * ELEPHANT + 2 * ADVISOR + 2 * CANNON + 5 * PAWN;

/// Below this the mover has certainly lost its general.
pub const MATE_LOWER: i32 = GENERAL - MATERIAL;

/// Score magnitude beyond which a position is decided.
pub const MATE_UPPER: i32 = GENERAL + MATERIAL;

/// Captures worth less than this are skipped in quiescence.
pub const QS_LIMIT: i32 = 219;

/// MTD-bi stops once the window is this narrow.
pub const EVAL_ROUGHNESS: i32 = 13;

type Placement = [[i32; DISPLAY_COLS]; DISPLAY_ROWS];

// Rows run from the opponent's back rank (top) to the mover's (bottom).
#[rustfmt::skip]
const PAWN_PLACEMENT: Placement = [
    [ 0,  3,  6,  9, 12,  9,  6,  3,  0],
    [18, 24, 30, 36, 40, 36, 30, 24, 18],
    [14, 20, 26, 30, 34, 30, 26, 20, 14],
    [10, 16, 22, 24, 28, 24, 22, 16, 10],
    [ 6, 10, 14, 16, 18, 16, 14, 10,  6],
    [ 2,  0,  8,  0,  8,  0,  8,  0,  2],
    [ 0,  0, -2,  0,  4,  0, -2,  0,  0],
    [ 0,  0,  0,  0,  0,  0,  0,  0,  0],
    [ 0,  0,  0,  0,  0,  0,  0,  0,  0],
    [ 0,  0,  0,  0,  0,  0,  0,  0,  0],
];

#[rustfmt::skip]
const HORSE_PLACEMENT: Placement = [
    [ 4,  8, 16, 12,  4, 12, 16,  8,  4],
    [ 4, 10, 28, 16,  8, 16, 28, 10,  4],
    [12, 14, 16, 20, 18, 20, 16, 14, 12],
    [ 8, 24, 18, 24, 20, 24, 18, 24,  8],
    [ 6, 16, 14, 18, 16, 18, 14, 16,  6],
    [ 4, 12, 16, 14, 12, 14, 16, 12,  4],
    [ 2,  6,  8,  6, 10,  6,  8,  6,  2],
    [ 4,  2,  8,  8,  4,  8,  8,  2,  4],
    [ 0,  2,  4,  4, -2,  4,  4,  2,  0],
    [ 0, -4,  0,  0,  0,  0,  0, -4,  0],
];

#[rustfmt::skip]
const CHARIOT_PLACEMENT: Placement = [
    [14, 14, 12, 18, 16, 18, 12, 14, 14],
    [16, 20, 18, 24, 26, 24, 18, 20, 16],
    [12, 12, 12, 18, 18, 18, 12, 12, 12],
    [12, 18, 16, 22, 22, 22, 16, 18, 12],
    [12, 14, 12, 18, 18, 18, 12, 14, 12],
    [12, 16, 14, 20, 20, 20, 14, 16, 12],
    [ 6, 10,  8, 14, 14, 14,  8, 10,  6],
    [ 4,  8,  6, 14, 12, 14,  6,  8,  4],
    [ 8,  4,  8, 16,  8, 16,  8,  4,  8],
    [-2, 10,  6, 14, 12, 14,  6, 10, -2],
];

#[rustfmt::skip]
const CANNON_PLACEMENT: Placement = [
    [ 6,  4,  0, -10, -12, -10,  0,  4,  6],
    [ 2,  2,  0,  -4, -14,  -4,  0,  2,  2],
    [ 2,  2,  0, -10,  -8, -10,  0,  2,  2],
    [ 0,  0, -2,   4,  10,   4, -2,  0,  0],
    [ 0,  0,  0,   2,   8,   2,  0,  0,  0],
    [-2,  0,  4,   2,   6,   2,  4,  0, -2],
    [ 0,  0,  0,   2,   4,   2,  0,  0,  0],
    [ 4,  0,  8,   6,  10,   6,  8,  0,  4],
    [ 0,  2,  4,   6,   6,   6,  4,  2,  0],
    [ 0,  0,  2,   6,   6,   6,  2,  0,  0],
];

#[rustfmt::skip]
const ELEPHANT_PLACEMENT: Placement = [
    [0, 0,  0, 0, 0, 0,  0, 0, 0],
    [0, 0,  0, 0, 0, 0,  0, 0, 0],
    [0, 0,  0, 0, 0, 0,  0, 0, 0],
    [0, 0,  0, 0, 0, 0,  0, 0, 0],
    [0, 0,  0, 0, 0, 0,  0, 0, 0],
    [0, 0, -2, 0, 0, 0, -2, 0, 0],
    [0, 0,  0, 0, 0, 0,  0, 0, 0],
    [-2, 0, 0, 0, 3, 0,  0, 0, -2],
    [0, 0,  0, 0, 0, 0,  0, 0, 0],
    [0, 0,  0, 0, 0, 0,  0, 0, 0],
];

#[rustfmt::skip]
const ADVISOR_PLACEMENT: Placement = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 3, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
];

#[rustfmt::skip]
const GENERAL_PLACEMENT: Placement = [
    [0, 0, 0,  0,  0,  0, 0, 0, 0],
    [0, 0, 0,  0,  0,  0, 0, 0, 0],
    [0, 0, 0,  0,  0,  0, 0, 0, 0],
    [0, 0, 0,  0,  0,  0, 0, 0, 0],
    [0, 0, 0,  0,  0,  0, 0, 0, 0],
    [0, 0, 0,  0,  0,  0, 0, 0, 0],
    [0, 0, 0,  0,  0,  0, 0, 0, 0],
    [0, 0, 0, -9, -9, -9, 0, 0, 0],
    [0, 0, 0, -8, -8, -8, 0, 0, 0],
    [0, 0, 0,  1,  5,  1, 0, 0, 0],
];

const PIECES: [(u8, i32, &Placement); 7] = [
    (b'P', PAWN, &PAWN_PLACEMENT),
    (b'N', HORSE, &HORSE_PLACEMENT),
    (b'B', ELEPHANT, &ELEPHANT_PLACEMENT),
    (b'R', CHARIOT, &CHARIOT_PLACEMENT),
    (b'A', ADVISOR, &ADVISOR_PLACEMENT),
    (b'C', CANNON, &CANNON_PLACEMENT),
    (b'K', GENERAL, &GENERAL_PLACEMENT),
];

/// Material plus placement, padded out to the full board.
static TABLES: LazyLock<[[i32; BOARD_LEN]; 7]> = LazyLock::new(|| {
    let (row0, col0) = DISPLAY_ORIGIN;
    PIECES.map(|(_, material, placement)| {
        let mut table = [0; BOARD_LEN];
        for (row, cells) in placement.iter().enumerate() {
            for (col, bonus) in cells.iter().enumerate() {
                table[(row0 + row) * ROW_STRIDE + col0 + col] = material + bonus;
            }
        }
        table
    })
});

/// Value of the mover's `piece` standing on `square`; zero for anything that is not a piece.
pub fn piece_square(piece: u8, square: usize) -> i32 {
    PIECES
        .iter()
        .position(|(letter, _, _)| *letter == piece)
        .and_then(|index| TABLES[index].get(square).copied())
        .unwrap_or(0)
}
