//! Constants for board geometry, evaluator weights, and engine defaults.
//!
//! The board is a 7x7 grid with the four 2x2 corners cut away, leaving a
//! cross of 33 playable cells. Row 0 is the Officers' side of the board.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN grid before the corners are removed).
pub const N: usize = 7;

/// Number of playable cells on the cross.
pub const PLAYABLE_CELLS: usize = N * N - 16;

/// Center column. Rebels on either side of it may not drift further out.
pub const CENTER_COL: i32 = 3;

/// Rebels on the board at the start of a game.
pub const REBELS_AT_START: usize = 24;

/// Officers on the board at the start of a game.
pub const OFFICERS_AT_START: usize = 2;

/// Officers win as soon as fewer than this many Rebels remain.
pub const MIN_REBELS: usize = 9;

/// Fortress rows (inclusive range start..=end).
pub const FORTRESS_ROWS: (i32, i32) = (0, 2);

/// Fortress columns (inclusive range start..=end).
pub const FORTRESS_COLS: (i32, i32) = (2, 4);

/// Number of cells in the fortress.
pub const FORTRESS_CELLS: usize = 9;

/// Canonical start layout, row 0 first.
pub const START_LAYOUT: [&str; N] = [
    "  ...  ",
    "  O.O  ",
    "RR...RR",
    "RRRRRRR",
    "RRRRRRR",
    "  RRR  ",
    "  RRR  ",
];

/// Offsets to the 8 neighbors of a cell as (row, col).
/// Order: N, NE, E, SE, S, SW, W, NW
pub const DIRECTIONS: [(i32, i32); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

/// Orthogonal neighbor offsets.
pub const ORTHOGONAL: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

// =============================================================================
// Serialization
// =============================================================================

pub const EMPTY: char = '.';
pub const REBEL: char = 'R';
pub const OFFICER: char = 'O';
pub const OUT: char = ' ';

// =============================================================================
// Evaluator Weights
// =============================================================================

/// Base score for a decided game. Search adds the remaining depth to it.
pub const WIN_SCORE: i32 = 10_000;

/// Officer: per Rebel captured since the start.
pub const OFFICER_CAPTURE_REWARD: i32 = 500;

/// Officer: per Rebel standing in the fortress.
pub const OFFICER_FORTRESS_PENALTY: i32 = 200;

/// Officer: per Officer standing on a defense cell.
pub const OFFICER_DEFENSE_REWARD: i32 = 100;

/// Cells in front of the fortress the Officers like to hold.
pub const DEFENSE_CELLS: [(i32, i32); 3] = [(2, 2), (2, 3), (2, 4)];

/// Officer: anchor for the centralization term.
pub const OFFICER_ANCHOR: (i32, i32) = (2, 3);

/// Officer: per unit of Manhattan distance from the anchor.
pub const OFFICER_DISTANCE_PENALTY: i32 = 10;

/// Officer: per empty neighbor of an Officer.
pub const OFFICER_MOBILITY_REWARD: i32 = 20;

/// Rebel: base reward for a Rebel inside the fortress.
pub const REBEL_FORTRESS_REWARD: i32 = 200;

/// Rebel: extra reward per row of fortress depth.
pub const REBEL_FORTRESS_DEPTH_REWARD: i32 = 20;

/// Rebel: target cell for the approach term.
pub const REBEL_TARGET: (i32, i32) = (1, 3);

/// Rebel: per unit of Manhattan distance from the target.
pub const REBEL_DISTANCE_PENALTY: i32 = 5;

/// Rebel: per orthogonal friendly neighbor.
pub const REBEL_SUPPORT_REWARD: i32 = 10;

/// Rebel: flat penalty per Officer on the board.
pub const REBEL_OFFICER_PENALTY: i32 = 100;

/// Rebel: per empty neighbor of an Officer.
pub const REBEL_OFFICER_MOBILITY_PENALTY: i32 = 20;

/// Rebel: per Rebel still on the board.
pub const REBEL_COUNT_REWARD: i32 = 50;

// =============================================================================
// Search and Game Defaults
// =============================================================================

/// Default fixed search depth.
pub const SEARCH_DEPTH: u32 = 5;

/// Default iterative deepening budget in seconds.
pub const TIME_BUDGET_SECS: f64 = 9.0;

/// Default depth cap for iterative deepening.
pub const MAX_ITERATIVE_DEPTH: u32 = 10;

/// Default per-turn limit; a player taking longer forfeits.
pub const TURN_TIME_LIMIT_SECS: f64 = 10.0;

/// Default number of rounds before the game is called.
pub const ROUND_CAP: usize = 1000;
