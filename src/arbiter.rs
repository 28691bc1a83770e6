//! Authoritative rule enforcement.
//!
//! [`apply_move`] validates a submitted move against a board and returns
//! the resulting board; [`Arbiter`] owns the game's board and the per-side
//! illegal-move tallies; [`check_win`] decides whether the game is over.
//!
//! Validation covers the complete rule set, including chained Officer
//! captures and huffing: an Officer that makes a simple step while any
//! Officer has a capture available is removed from the board.

use thiserror::Error;
use tracing::{trace, warn};

use crate::board::{Board, Cell, Move, Position, Side};
use crate::constants::{FORTRESS_CELLS, MIN_REBELS};
use crate::movegen::{has_capture, officer_can_act, rebel_step_allowed};

/// Why a submitted move was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("move needs at least 2 squares, got {0}")]
    TooShort(usize),
    #[error("start {0} is off the board")]
    StartOutOfBounds(Position),
    #[error("{pos} does not hold a {side} piece")]
    NotOwnPiece { pos: Position, side: Side },
    #[error("rebels cannot chain moves")]
    RebelChain,
    #[error("hop starts and ends on {0}")]
    SameSquare(Position),
    #[error("diagonal hop {from}->{to} from a cell of mixed parity")]
    Parity { from: Position, to: Position },
    #[error("destination {0} is off the board")]
    OutOfBounds(Position),
    #[error("destination {0} is not empty")]
    Occupied(Position),
    #[error("hop {from}->{to} is longer than one jump")]
    TooFar { from: Position, to: Position },
    #[error("rebels cannot capture")]
    RebelCapture,
    #[error("jump {from}->{to} does not continue a capture chain")]
    CaptureAfterStep { from: Position, to: Position },
    #[error("jump {from}->{to} is not along a line")]
    CrookedJump { from: Position, to: Position },
    #[error("no rebel to capture on {0}")]
    NothingToCapture(Position),
    #[error("simple steps cannot be chained")]
    ChainedStep,
    #[error("rebel {from}->{to} moves away from the fortress")]
    RebelRetreat { from: Position, to: Position },
    #[error("officer on {officer} ignored an available capture and was huffed")]
    Huffed { officer: Position, board: Board },
}

/// Validate `mv` for `side` and return the board after it.
///
/// On [`IllegalMove::Huffed`] the error carries the board with the huffed
/// Officer removed; every other rejection leaves the board as it was.
pub fn apply_move(board: &Board, side: Side, mv: &Move) -> Result<Board, IllegalMove> {
    let start = match mv.start() {
        Some(start) if mv.len() >= 2 => start,
        _ => return Err(IllegalMove::TooShort(mv.len())),
    };
    if !start.in_bounds() {
        return Err(IllegalMove::StartOutOfBounds(start));
    }
    if side == Side::Rebel && mv.len() > 2 {
        return Err(IllegalMove::RebelChain);
    }
    if board.get(start) != Some(side.piece()) {
        return Err(IllegalMove::NotOwnPiece { pos: start, side });
    }

    let mut next = *board;
    let mut captured = false;

    for (i, (from, to)) in mv.hops().enumerate() {
        if from == to {
            return Err(IllegalMove::SameSquare(from));
        }
        if from.is_diagonal_to(to) && !from.allows_diagonal() {
            return Err(IllegalMove::Parity { from, to });
        }
        if !to.in_bounds() {
            return Err(IllegalMove::OutOfBounds(to));
        }
        if !next.is_empty_at(to) {
            return Err(IllegalMove::Occupied(to));
        }

        match from.chebyshev(to) {
            1 => {
                if i > 0 {
                    return Err(IllegalMove::ChainedStep);
                }
                match side {
                    Side::Rebel if !rebel_step_allowed(from, to) => {
                        return Err(IllegalMove::RebelRetreat { from, to });
                    }
                    Side::Officer if has_capture(board) => {
                        let mut huffed = *board;
                        huffed.set(from, Cell::Empty);
                        return Err(IllegalMove::Huffed {
                            officer: from,
                            board: huffed,
                        });
                    }
                    _ => {}
                }
                next.set(from, Cell::Empty);
                next.set(to, side.piece());
                captured = false;
            }
            2 => {
                if side == Side::Rebel {
                    return Err(IllegalMove::RebelCapture);
                }
                if i > 0 && !captured {
                    return Err(IllegalMove::CaptureAfterStep { from, to });
                }
                if from.manhattan(to) % 2 != 0 {
                    return Err(IllegalMove::CrookedJump { from, to });
                }
                let over = from.midpoint(to);
                if next.get(over) != Some(Cell::Rebel) {
                    return Err(IllegalMove::NothingToCapture(over));
                }
                next.set(over, Cell::Empty);
                next.set(from, Cell::Empty);
                next.set(to, Cell::Officer);
                captured = true;
            }
            _ => return Err(IllegalMove::TooFar { from, to }),
        }
    }

    Ok(next)
}

/// Decide the game on `board`.
///
/// Officers win once fewer than [`MIN_REBELS`] Rebels remain. Otherwise the
/// Rebels win by filling the fortress or by leaving no Officer a legal move.
pub fn check_win(board: &Board) -> Option<Side> {
    if board.rebel_count() < MIN_REBELS {
        return Some(Side::Officer);
    }
    if board.rebels_in_fortress() == FORTRESS_CELLS || !officer_can_act(board) {
        return Some(Side::Rebel);
    }
    None
}

/// Outcome of [`Arbiter::submit`].
#[derive(Debug, Clone)]
pub struct Submission {
    /// True if the move was legal and applied
    pub accepted: bool,
    /// The authoritative board after the submission
    pub board: Board,
    /// Winner on the resulting board, if the game is over
    pub winner: Option<Side>,
    /// Why the move was rejected
    pub rejection: Option<IllegalMove>,
}

/// Owner of the authoritative board.
#[derive(Debug, Clone)]
pub struct Arbiter {
    board: Board,
    rebel_illegal: u32,
    officer_illegal: u32,
    submissions: u32,
}

impl Default for Arbiter {
    fn default() -> Self {
        Self::new()
    }
}

impl Arbiter {
    /// An arbiter over the canonical start layout.
    pub fn new() -> Self {
        Self::with_board(Board::new())
    }

    pub fn with_board(board: Board) -> Self {
        Self {
            board,
            rebel_illegal: 0,
            officer_illegal: 0,
            submissions: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn illegal_moves(&self, side: Side) -> u32 {
        match side {
            Side::Rebel => self.rebel_illegal,
            Side::Officer => self.officer_illegal,
        }
    }

    /// Moves submitted so far, legal or not.
    pub fn submissions(&self) -> u32 {
        self.submissions
    }

    pub fn winner(&self) -> Option<Side> {
        check_win(&self.board)
    }

    /// Validate and apply a move for `side`.
    pub fn submit(&mut self, side: Side, mv: &Move) -> Submission {
        self.submissions += 1;
        trace!(%side, %mv, "submission");

        let rejection = match apply_move(&self.board, side, mv) {
            Ok(next) => {
                self.board = next;
                None
            }
            Err(err) => {
                if let IllegalMove::Huffed { officer, board } = &err {
                    warn!(%officer, "officer huffed");
                    self.board = *board;
                } else {
                    warn!(%side, %mv, error = %err, "illegal move");
                }
                match side {
                    Side::Rebel => self.rebel_illegal += 1,
                    Side::Officer => self.officer_illegal += 1,
                }
                Some(err)
            }
        };

        Submission {
            accepted: rejection.is_none(),
            board: self.board,
            winner: check_win(&self.board),
            rejection,
        }
    }
}
