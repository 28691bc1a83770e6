//! Move generation shared by the arbiter and the search engine.
//!
//! Moves are produced in grid scan order (row-major) and, per piece, in
//! [`DIRECTIONS`] order. Callers that need an unbiased choice shuffle the
//! result themselves.
//!
//! The search normally runs in [`CaptureMode::SingleHop`]: an Officer ply
//! considers one jump at a time, even though the arbiter accepts chained
//! captures. [`CaptureMode::Chained`] closes that gap at the price of a
//! wider tree.

use crate::board::{Board, Cell, Move, Position, Side};
use crate::constants::{CENTER_COL, DIRECTIONS};

/// How an Officer ply enumerates captures during search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CaptureMode {
    /// One-jump captures only.
    #[default]
    SingleHop,
    /// Every capture chain the arbiter would accept.
    Chained,
}

/// True if a one-square step from `from` in direction (dr, dc) respects the parity rule.
#[inline]
fn direction_allowed(from: Position, dr: i32, dc: i32) -> bool {
    dr == 0 || dc == 0 || from.allows_diagonal()
}

/// Rebels never step back toward their start row, and off-center Rebels
/// never drift further from the center column.
pub(crate) fn rebel_step_allowed(from: Position, to: Position) -> bool {
    if to.row > from.row {
        return false;
    }
    if from.col < CENTER_COL && to.col < from.col {
        return false;
    }
    if from.col > CENTER_COL && to.col > from.col {
        return false;
    }
    true
}

/// Legal one-square moves for `side`.
pub fn legal_simple_moves(board: &Board, side: Side) -> Vec<Move> {
    let mut moves = Vec::new();
    for from in board.positions(side.piece()) {
        for &(dr, dc) in &DIRECTIONS {
            let to = from.offset(dr, dc);
            if !board.is_empty_at(to) || !direction_allowed(from, dr, dc) {
                continue;
            }
            if side == Side::Rebel && !rebel_step_allowed(from, to) {
                continue;
            }
            moves.push(Move::step(from, to));
        }
    }
    moves
}

/// Landing squares of every single jump available to the Officer at `from`.
fn jumps_from(board: &Board, from: Position) -> impl Iterator<Item = Position> + '_ {
    DIRECTIONS.iter().filter_map(move |&(dr, dc)| {
        if !direction_allowed(from, dr, dc) {
            return None;
        }
        let over = from.offset(dr, dc);
        let to = from.offset(2 * dr, 2 * dc);
        (board.get(over) == Some(Cell::Rebel) && board.is_empty_at(to)).then_some(to)
    })
}

/// Legal single-hop captures for `side`. Rebels never capture.
pub fn legal_captures(board: &Board, side: Side) -> Vec<Move> {
    if side == Side::Rebel {
        return Vec::new();
    }
    board
        .positions(Cell::Officer)
        .flat_map(|from| jumps_from(board, from).map(move |to| Move::step(from, to)))
        .collect()
}

/// True if any Officer on the board has a capture.
pub fn has_capture(board: &Board) -> bool {
    board
        .positions(Cell::Officer)
        .any(|from| jumps_from(board, from).next().is_some())
}

/// True if at least one Officer can step or capture.
pub fn officer_can_act(board: &Board) -> bool {
    board.positions(Cell::Officer).any(|from| {
        DIRECTIONS.iter().any(|&(dr, dc)| {
            direction_allowed(from, dr, dc) && board.is_empty_at(from.offset(dr, dc))
        }) || jumps_from(board, from).next().is_some()
    })
}

/// Every capture sequence an Officer may submit.
///
/// Each prefix of a chain is itself a legal move, so both the one-jump move
/// and every longer continuation are listed.
pub fn capture_chains(board: &Board) -> Vec<Move> {
    let mut chains = Vec::new();
    for from in board.positions(Cell::Officer) {
        extend_chain(board, &Move::new(vec![from]), &mut chains);
    }
    chains
}

fn extend_chain(board: &Board, chain: &Move, out: &mut Vec<Move>) {
    let Some(from) = chain.end() else {
        return;
    };
    for to in jumps_from(board, from).collect::<Vec<_>>() {
        let mut next = *board;
        next.set(from.midpoint(to), Cell::Empty);
        next.set(to, Cell::Officer);
        next.set(from, Cell::Empty);
        let longer = chain.extended(to);
        out.push(longer.clone());
        extend_chain(&next, &longer, out);
    }
}

/// The move list a search ply works from: for Officers, captures
/// supersede simple moves whenever any exist.
pub fn search_moves(board: &Board, side: Side, mode: CaptureMode) -> Vec<Move> {
    if side == Side::Officer {
        let captures = match mode {
            CaptureMode::SingleHop => legal_captures(board, side),
            CaptureMode::Chained => capture_chains(board),
        };
        if !captures.is_empty() {
            return captures;
        }
    }
    legal_simple_moves(board, side)
}

/// Apply a move from the generator to a scratch board without validation.
///
/// Jumps remove the piece they pass over.
pub fn play_unchecked(board: &Board, mv: &Move) -> Board {
    let mut next = *board;
    for (from, to) in mv.hops() {
        let piece = next.get(from).unwrap_or(Cell::Empty);
        next.set(from, Cell::Empty);
        if from.chebyshev(to) == 2 {
            next.set(from.midpoint(to), Cell::Empty);
        }
        next.set(to, piece);
    }
    next
}
