//! Players: anything that can propose a move for either side.
//!
//! The game loop only sees the [`Player`] trait. [`SearchPlayer`] wraps the
//! alpha-beta engine; [`ValuePlayer`] greedily follows a black-box
//! [`BoardValue`], which is where a learned evaluator plugs in.

use anyhow::Result;

use crate::board::{Board, Move, Side};
use crate::eval::{evaluate_officer, evaluate_rebel};
use crate::movegen::{CaptureMode, play_unchecked, search_moves};
use crate::search::{SearchConfig, Searcher};

/// A participant in a game. Returning an empty [`Move`] means "no move".
pub trait Player {
    fn play_rebel(&mut self, board: &Board) -> Result<Move>;
    fn play_officer(&mut self, board: &Board) -> Result<Move>;

    fn play(&mut self, board: &Board, side: Side) -> Result<Move> {
        match side {
            Side::Rebel => self.play_rebel(board),
            Side::Officer => self.play_officer(board),
        }
    }
}

/// Plays both roles with the alpha-beta engine.
pub struct SearchPlayer {
    rebel: Searcher,
    officer: Searcher,
}

impl SearchPlayer {
    /// Use the same configuration for both roles.
    pub fn new(config: SearchConfig) -> Self {
        Self::with_configs(config.clone(), config)
    }

    pub fn with_configs(rebel: SearchConfig, officer: SearchConfig) -> Self {
        Self {
            rebel: Searcher::new(rebel),
            officer: Searcher::new(officer),
        }
    }
}

impl Player for SearchPlayer {
    fn play_rebel(&mut self, board: &Board) -> Result<Move> {
        Ok(self.rebel.best_move(board, Side::Rebel).into_move())
    }

    fn play_officer(&mut self, board: &Board) -> Result<Move> {
        Ok(self.officer.best_move(board, Side::Officer).into_move())
    }
}

/// A value function over boards. Positive values favor the Rebels.
pub trait BoardValue {
    fn value(&mut self, board: &Board) -> Result<f32>;
}

/// The built-in heuristics as a value function: the Rebel score minus the
/// Officer score.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicValue;

impl BoardValue for HeuristicValue {
    fn value(&mut self, board: &Board) -> Result<f32> {
        Ok((evaluate_rebel(board) - evaluate_officer(board)) as f32)
    }
}

/// One-ply greedy player: the Rebels pick the successor with the highest
/// value, the Officers the lowest. Officers only consider captures when any
/// exist.
pub struct ValuePlayer<V> {
    value: V,
}

impl<V: BoardValue> ValuePlayer<V> {
    pub fn new(value: V) -> Self {
        Self { value }
    }

    fn select(&mut self, board: &Board, side: Side) -> Result<Move> {
        let mut best: Option<(Move, f32)> = None;
        for mv in search_moves(board, side, CaptureMode::SingleHop) {
            let v = self.value.value(&play_unchecked(board, &mv))?;
            let better = match (&best, side) {
                (None, _) => true,
                (Some((_, b)), Side::Rebel) => v > *b,
                (Some((_, b)), Side::Officer) => v < *b,
            };
            if better {
                best = Some((mv, v));
            }
        }
        Ok(best.map(|(mv, _)| mv).unwrap_or_default())
    }
}

impl<V: BoardValue> Player for ValuePlayer<V> {
    fn play_rebel(&mut self, board: &Board) -> Result<Move> {
        self.select(board, Side::Rebel)
    }

    fn play_officer(&mut self, board: &Board) -> Result<Move> {
        self.select(board, Side::Officer)
    }
}
