//! Board model: cells, sides, positions, and moves.
//!
//! The board is a value type (`Copy`), so search code can take as many
//! scratch copies as it likes without touching the authoritative board
//! owned by the [`Arbiter`](crate::arbiter::Arbiter).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    EMPTY, FORTRESS_COLS, FORTRESS_ROWS, N, OFFICER, OUT, REBEL, START_LAYOUT,
};

/// A (row, col) coordinate. Values outside the grid are representable so
/// that submitted moves can be checked and rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// True if the coordinate lies inside the 7x7 grid (corners included).
    #[inline]
    pub fn in_bounds(self) -> bool {
        (0..N as i32).contains(&self.row) && (0..N as i32).contains(&self.col)
    }

    /// True if the coordinate is on the cross.
    pub fn is_playable(self) -> bool {
        self.in_bounds() && !(is_corner(self.row) && is_corner(self.col))
    }

    #[inline]
    pub fn offset(self, dr: i32, dc: i32) -> Self {
        Self::new(self.row + dr, self.col + dc)
    }

    /// Diagonal moves may only start from cells whose row and column share parity.
    #[inline]
    pub fn allows_diagonal(self) -> bool {
        self.row.rem_euclid(2) == self.col.rem_euclid(2)
    }

    /// Chebyshev (king-move) distance.
    pub fn chebyshev(self, other: Self) -> i32 {
        (self.row - other.row).abs().max((self.col - other.col).abs())
    }

    pub fn manhattan(self, other: Self) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }

    pub fn is_diagonal_to(self, other: Self) -> bool {
        self.row != other.row && self.col != other.col
    }

    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.row + other.row) / 2, (self.col + other.col) / 2)
    }

    pub fn in_fortress(self) -> bool {
        (FORTRESS_ROWS.0..=FORTRESS_ROWS.1).contains(&self.row)
            && (FORTRESS_COLS.0..=FORTRESS_COLS.1).contains(&self.col)
    }
}

fn is_corner(i: i32) -> bool {
    !(2..=4).contains(&i)
}

impl From<[i32; 2]> for Position {
    fn from([row, col]: [i32; 2]) -> Self {
        Self::new(row, col)
    }
}

impl From<Position> for [i32; 2] {
    fn from(p: Position) -> Self {
        [p.row, p.col]
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Rebel,
    Officer,
    OffBoard,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => EMPTY,
            Cell::Rebel => REBEL,
            Cell::Officer => OFFICER,
            Cell::OffBoard => OUT,
        }
    }

    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            EMPTY => Some(Cell::Empty),
            REBEL => Some(Cell::Rebel),
            OFFICER => Some(Cell::Officer),
            OUT => Some(Cell::OffBoard),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Rebel,
    Officer,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Rebel => Side::Officer,
            Side::Officer => Side::Rebel,
        }
    }

    /// The cell kind this side moves.
    pub fn piece(self) -> Cell {
        match self {
            Side::Rebel => Cell::Rebel,
            Side::Officer => Cell::Officer,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Rebel => write!(f, "rebel"),
            Side::Officer => write!(f, "officer"),
        }
    }
}

/// Errors from parsing a board or a move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected 7 rows, got {0}")]
    RowCount(usize),
    #[error("row {row}: expected 7 cells, got {len}")]
    RowLength { row: usize, len: usize },
    #[error("row {row}, col {col}: unknown cell {ch:?}")]
    UnknownCell { row: usize, col: usize, ch: char },
    #[error("row {row}, col {col}: cell does not match the cross shape")]
    Geometry { row: usize, col: usize },
    #[error("invalid move: {0}")]
    Move(String),
}

/// The 7x7 grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Board {
    cells: [[Cell; N]; N],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The canonical start layout.
    pub fn new() -> Self {
        let mut board = Self::empty();
        for (r, line) in START_LAYOUT.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                if let Some(cell) = Cell::from_char(ch) {
                    board.cells[r][c] = cell;
                }
            }
        }
        board
    }

    /// A cross with every playable cell empty.
    pub fn empty() -> Self {
        let mut cells = [[Cell::OffBoard; N]; N];
        for (r, row) in cells.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                if Position::new(r as i32, c as i32).is_playable() {
                    *cell = Cell::Empty;
                }
            }
        }
        Self { cells }
    }

    /// Parse a board from its row strings.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, ParseError> {
        if rows.len() != N {
            return Err(ParseError::RowCount(rows.len()));
        }
        let mut board = Self::empty();
        for (r, line) in rows.iter().enumerate() {
            let chars: Vec<char> = line.as_ref().chars().collect();
            if chars.len() != N {
                return Err(ParseError::RowLength {
                    row: r,
                    len: chars.len(),
                });
            }
            for (c, &ch) in chars.iter().enumerate() {
                let cell = Cell::from_char(ch).ok_or(ParseError::UnknownCell { row: r, col: c, ch })?;
                let playable = Position::new(r as i32, c as i32).is_playable();
                if playable == (cell == Cell::OffBoard) {
                    return Err(ParseError::Geometry { row: r, col: c });
                }
                board.cells[r][c] = cell;
            }
        }
        Ok(board)
    }

    /// Row strings in the serialization format.
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|c| c.to_char()).collect())
            .collect()
    }

    /// Cell at `pos`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, pos: Position) -> Option<Cell> {
        if !pos.in_bounds() {
            return None;
        }
        Some(self.cells[pos.row as usize][pos.col as usize])
    }

    #[inline]
    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.get(pos) == Some(Cell::Empty)
    }

    /// Set a playable cell. Writes to off-board cells or outside the grid are ignored.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        if pos.is_playable() {
            self.cells[pos.row as usize][pos.col as usize] = cell;
        }
    }

    /// Iterate every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(c, &cell)| (Position::new(r as i32, c as i32), cell))
        })
    }

    /// Positions holding `cell`, row-major.
    pub fn positions(&self, cell: Cell) -> impl Iterator<Item = Position> + '_ {
        self.cells().filter(move |&(_, c)| c == cell).map(|(p, _)| p)
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells().filter(|&(_, c)| c == cell).count()
    }

    pub fn rebel_count(&self) -> usize {
        self.count(Cell::Rebel)
    }

    pub fn officer_count(&self) -> usize {
        self.count(Cell::Officer)
    }

    pub fn rebels_in_fortress(&self) -> usize {
        self.positions(Cell::Rebel).filter(|p| p.in_fortress()).count()
    }

    /// Number of empty cells among the 8 neighbors of `pos`.
    pub fn empty_neighbors(&self, pos: Position) -> usize {
        crate::constants::DIRECTIONS
            .iter()
            .filter(|&&(dr, dc)| self.is_empty_at(pos.offset(dr, dc)))
            .count()
    }
}

impl TryFrom<Vec<String>> for Board {
    type Error = ParseError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        Board::from_rows(&rows)
    }
}

impl From<Board> for Vec<String> {
    fn from(board: Board) -> Self {
        board.rows()
    }
}

impl FromStr for Board {
    type Err = ParseError;

    /// Parse seven newline-separated rows. Trailing spaces may have been
    /// stripped by an editor, so short rows are padded back to full width.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<String> = s
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| format!("{l:<width$}", width = N))
            .collect();
        Board::from_rows(&rows)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

/// An ordered path of positions: the piece's start, then each landing square.
///
/// An empty move is how a player says it has nothing to play.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Move {
    path: Vec<Position>,
}

impl Move {
    pub fn new(path: Vec<Position>) -> Self {
        Self { path }
    }

    /// A two-square move (simple step or single jump).
    pub fn step(from: Position, to: Position) -> Self {
        Self::new(vec![from, to])
    }

    /// The empty "no move available" move.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn path(&self) -> &[Position] {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn start(&self) -> Option<Position> {
        self.path.first().copied()
    }

    pub fn end(&self) -> Option<Position> {
        self.path.last().copied()
    }

    /// Consecutive (from, to) pairs.
    pub fn hops(&self) -> impl Iterator<Item = (Position, Position)> + '_ {
        self.path.windows(2).map(|w| (w[0], w[1]))
    }

    /// Extend a capture chain by one landing square.
    pub fn extended(&self, to: Position) -> Self {
        let mut path = self.path.clone();
        path.push(to);
        Self { path }
    }

    pub fn to_json(&self) -> String {
        // A Vec of integer pairs cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(s: &str) -> Result<Self, ParseError> {
        serde_json::from_str(s).map_err(|e| ParseError::Move(e.to_string()))
    }
}

impl From<Vec<(i32, i32)>> for Move {
    fn from(path: Vec<(i32, i32)>) -> Self {
        Self::new(path.into_iter().map(Position::from).collect())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            return write!(f, "none");
        }
        for (i, p) in self.path.iter().enumerate() {
            if i > 0 {
                write!(f, "->")?;
            }
            write!(f, "{p}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{OFFICERS_AT_START, PLAYABLE_CELLS, REBELS_AT_START};

    #[test]
    fn test_start_layout_counts() {
        let board = Board::new();
        assert_eq!(board.rebel_count(), REBELS_AT_START);
        assert_eq!(board.officer_count(), OFFICERS_AT_START);
        assert_eq!(board.count(Cell::OffBoard), 16);
        assert_eq!(
            board.count(Cell::Empty),
            PLAYABLE_CELLS - REBELS_AT_START - OFFICERS_AT_START
        );
        assert_eq!(board.get(Position::new(1, 2)), Some(Cell::Officer));
        assert_eq!(board.get(Position::new(1, 4)), Some(Cell::Officer));
    }

    #[test]
    fn test_playable_cross() {
        assert!(!Position::new(0, 0).is_playable());
        assert!(!Position::new(1, 5).is_playable());
        assert!(!Position::new(6, 6).is_playable());
        assert!(Position::new(0, 2).is_playable());
        assert!(Position::new(3, 0).is_playable());
        assert!(Position::new(6, 4).is_playable());
        assert!(!Position::new(-1, 3).is_playable());
        assert!(!Position::new(3, 7).is_playable());
    }

    #[test]
    fn test_parity() {
        assert!(Position::new(2, 2).allows_diagonal());
        assert!(Position::new(1, 3).allows_diagonal());
        assert!(!Position::new(2, 3).allows_diagonal());
        assert!(!Position::new(1, 2).allows_diagonal());
    }

    #[test]
    fn test_fortress() {
        let cells: Vec<_> = Board::empty().cells().filter(|(p, _)| p.in_fortress()).collect();
        assert_eq!(cells.len(), 9);
        assert!(Position::new(2, 4).in_fortress());
        assert!(!Position::new(3, 3).in_fortress());
        assert!(!Position::new(2, 1).in_fortress());
    }

    #[test]
    fn test_text_roundtrip() {
        let board = Board::new();
        let parsed: Board = board.to_string().parse().unwrap();
        assert_eq!(parsed, board);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Board::from_rows(&["  ...  "]),
            Err(ParseError::RowCount(1))
        );

        let mut rows = START_LAYOUT.map(String::from);
        rows[3] = "RRRXRRR".into();
        assert_eq!(
            Board::from_rows(&rows),
            Err(ParseError::UnknownCell { row: 3, col: 3, ch: 'X' })
        );

        let mut rows = START_LAYOUT.map(String::from);
        rows[0] = "R ...  ".into();
        assert_eq!(
            Board::from_rows(&rows),
            Err(ParseError::Geometry { row: 0, col: 0 })
        );

        let mut rows = START_LAYOUT.map(String::from);
        rows[6] = "  RR".into();
        assert_eq!(
            Board::from_rows(&rows),
            Err(ParseError::RowLength { row: 6, len: 4 })
        );
    }

    #[test]
    fn test_json_forms() {
        let mv = Move::from(vec![(1, 2), (3, 2), (3, 4)]);
        assert_eq!(mv.to_json(), "[[1,2],[3,2],[3,4]]");
        assert_eq!(Move::from_json("[[1,2],[3,2],[3,4]]").unwrap(), mv);
        assert!(Move::from_json("[[1,2,3]]").is_err());

        let json = serde_json::to_string(&Board::new()).unwrap();
        assert!(json.starts_with("[\"  ...  \",\"  O.O  \""));
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Board::new());
    }

    #[test]
    fn test_set_ignores_off_board() {
        let mut board = Board::empty();
        board.set(Position::new(0, 0), Cell::Rebel);
        board.set(Position::new(9, 9), Cell::Rebel);
        assert_eq!(board.get(Position::new(0, 0)), Some(Cell::OffBoard));
        assert_eq!(board.rebel_count(), 0);
    }
}
