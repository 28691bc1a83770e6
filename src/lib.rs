//! Asalto: an engine for the asymmetric fox-and-geese board game.
//!
//! Twenty-four Rebels try to occupy the nine-cell fortress at the top of a
//! cross-shaped 7x7 board. Two Officers defend it by capturing Rebels with
//! jumps.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, evaluation weights and engine defaults
//! - [`board`] - Positions, cells, the board and moves
//! - [`movegen`] - Legal move enumeration for both sides
//! - [`arbiter`] - Move validation, huffing and win detection
//! - [`eval`] - Side-specific static evaluation
//! - [`search`] - Alpha-beta search, fixed depth or iterative deepening
//! - [`player`] - The player capability and its implementations
//! - [`game`] - The game loop with forfeits and the round cap
//!
//! ## Example
//!
//! ```
//! use asalto::arbiter::apply_move;
//! use asalto::board::{Board, Side};
//! use asalto::search::{SearchConfig, Searcher};
//!
//! let board = Board::new();
//! let mut searcher = Searcher::new(SearchConfig::for_testing());
//! let mv = searcher.best_move(&board, Side::Rebel).into_move();
//! assert!(apply_move(&board, Side::Rebel, &mv).is_ok());
//! ```

pub mod arbiter;
pub mod board;
pub mod constants;
pub mod eval;
pub mod game;
pub mod movegen;
pub mod player;
pub mod search;
