//! Minimax search with alpha-beta pruning.
//!
//! One [`Searcher`] plays either side. It runs in one of two modes:
//! - Fixed depth: a single alpha-beta search to [`SearchConfig::depth`]
//! - Iterative deepening: depth 1, 2, 3, ... under a wall-clock budget,
//!   keeping the result of the last depth that finished
//!
//! Scores are always from the point of view of the side the search was
//! started for. Decided games score `±(WIN_SCORE + remaining depth)`, so
//! faster wins and slower losses are preferred.
//!
//! The root move list is shuffled once per search with a seedable RNG, which
//! breaks ties between equal moves while keeping tests reproducible.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

use crate::arbiter::check_win;
use crate::board::{Board, Move, Side};
use crate::constants::{MAX_ITERATIVE_DEPTH, SEARCH_DEPTH, TIME_BUDGET_SECS, WIN_SCORE};
use crate::eval::evaluate;
use crate::movegen::{CaptureMode, play_unchecked, search_moves};

/// Invalid engine or game configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("search depth must be at least 1")]
    ZeroDepth,
    #[error("iterative deepening needs a maximum depth of at least 1")]
    ZeroMaxDepth,
    #[error("invalid time value {0}: must be a finite, non-negative number of seconds")]
    InvalidTime(f64),
    #[error("round cap must be at least 1")]
    ZeroRoundCap,
}

/// Convert seconds from a flag or config file into a [`Duration`].
pub fn duration_from_secs(secs: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidTime(secs))
}

/// Configuration for a [`Searcher`].
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Depth of a fixed-depth search, in plies
    pub depth: u32,
    /// Use iterative deepening instead of a single fixed-depth search
    pub iterative: bool,
    /// Wall-clock budget for iterative deepening
    pub time_budget: Duration,
    /// Deepest iteration attempted by iterative deepening
    pub max_depth: u32,
    /// How Officer plies enumerate captures
    pub capture_mode: CaptureMode,
    /// Seed for the root shuffle; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: SEARCH_DEPTH,
            iterative: false,
            time_budget: Duration::from_secs_f64(TIME_BUDGET_SECS),
            max_depth: MAX_ITERATIVE_DEPTH,
            capture_mode: CaptureMode::SingleHop,
            seed: None,
        }
    }
}

impl SearchConfig {
    /// Iterative deepening with the default budget.
    pub fn iterative() -> Self {
        Self {
            iterative: true,
            ..Self::default()
        }
    }

    /// A shallow, seeded config for tests.
    pub fn for_testing() -> Self {
        Self {
            depth: 2,
            max_depth: 3,
            time_budget: Duration::from_secs(5),
            seed: Some(7),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if self.iterative && self.max_depth == 0 {
            return Err(ConfigError::ZeroMaxDepth);
        }
        Ok(())
    }
}

/// Cooperative cancellation for a running search: a deadline plus a stop
/// flag that another owner of the handle may raise.
#[derive(Debug, Clone)]
pub struct SearchBudget {
    deadline: Option<Instant>,
    stopped: Arc<AtomicBool>,
}

impl SearchBudget {
    /// A budget that only ends when stopped.
    pub fn unlimited() -> Self {
        Self {
            deadline: None,
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A budget expiring `limit` from now.
    pub fn with_deadline(limit: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(limit),
            ..Self::unlimited()
        }
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    /// Shared handle to the stop flag.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stopped)
    }

    #[inline]
    pub fn expired(&self) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Marker returned up the recursion when the budget runs out mid-search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

/// How the returned move was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    /// The side to move has no legal move
    NoMoves,
    /// Only one move was available, returned without search
    Forced,
    /// Result of a completed search
    Searched,
    /// Budget ran out before depth 1 finished; first shuffled move
    Fallback,
}

/// Result of a search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Chosen move, `None` only with [`SearchKind::NoMoves`]
    pub best_move: Option<Move>,
    /// Score of the chosen move at the completed depth
    pub score: Option<i32>,
    /// Deepest fully completed depth
    pub depth: u32,
    /// Nodes visited
    pub nodes: u64,
    pub kind: SearchKind,
}

impl SearchResult {
    fn unsearched(best_move: Option<Move>, kind: SearchKind) -> Self {
        Self {
            best_move,
            score: None,
            depth: 0,
            nodes: 0,
            kind,
        }
    }

    /// The chosen move, or the empty move when there is none.
    pub fn into_move(self) -> Move {
        self.best_move.unwrap_or_default()
    }
}

/// Alpha-beta searcher for either side.
pub struct Searcher {
    config: SearchConfig,
    rng: fastrand::Rng,
    nodes: u64,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self {
            config,
            rng,
            nodes: 0,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Choose a move for `side` using the configured mode.
    pub fn best_move(&mut self, board: &Board, side: Side) -> SearchResult {
        if self.config.iterative {
            let budget = SearchBudget::with_deadline(self.config.time_budget);
            self.search_iterative(board, side, &budget)
        } else {
            self.search_fixed(board, side, self.config.depth)
        }
    }

    /// Single alpha-beta search to `depth` plies.
    pub fn search_fixed(&mut self, board: &Board, side: Side, depth: u32) -> SearchResult {
        let moves = match self.root_moves(board, side) {
            Ok(moves) => moves,
            Err(early) => return early,
        };
        self.nodes = 0;
        let depth = depth.max(1);

        match self.search_root(board, side, &moves, depth, &SearchBudget::unlimited()) {
            Ok((best, score)) => {
                debug!(%side, depth, score, nodes = self.nodes, "fixed-depth search complete");
                SearchResult {
                    best_move: Some(best),
                    score: Some(score),
                    depth,
                    nodes: self.nodes,
                    kind: SearchKind::Searched,
                }
            }
            Err(Cancelled) => SearchResult::unsearched(moves.into_iter().next(), SearchKind::Fallback),
        }
    }

    /// Iterative deepening from depth 1 up to the configured maximum,
    /// abandoning the depth in progress once `budget` expires.
    pub fn search_iterative(&mut self, board: &Board, side: Side, budget: &SearchBudget) -> SearchResult {
        let moves = match self.root_moves(board, side) {
            Ok(moves) => moves,
            Err(early) => return early,
        };
        self.nodes = 0;

        let mut result = SearchResult::unsearched(moves.first().cloned(), SearchKind::Fallback);
        for depth in 1..=self.config.max_depth.max(1) {
            match self.search_root(board, side, &moves, depth, budget) {
                Ok((best, score)) => {
                    debug!(%side, depth, score, nodes = self.nodes, "iteration complete");
                    result = SearchResult {
                        best_move: Some(best),
                        score: Some(score),
                        depth,
                        nodes: self.nodes,
                        kind: SearchKind::Searched,
                    };
                }
                Err(Cancelled) => {
                    debug!(%side, depth, nodes = self.nodes, "budget expired, iteration discarded");
                    break;
                }
            }
        }
        result.nodes = self.nodes;
        result
    }

    /// Legal root moves in shuffled order, or an early result when there is
    /// nothing to search.
    ///
    /// A single available move is returned without search. For the Officer
    /// this includes the lone mandatory capture.
    fn root_moves(&mut self, board: &Board, side: Side) -> Result<Vec<Move>, SearchResult> {
        let mut moves = search_moves(board, side, self.config.capture_mode);
        match moves.len() {
            0 => Err(SearchResult::unsearched(None, SearchKind::NoMoves)),
            1 => Err(SearchResult::unsearched(moves.pop(), SearchKind::Forced)),
            _ => {
                self.rng.shuffle(&mut moves);
                Ok(moves)
            }
        }
    }

    fn search_root(
        &mut self,
        board: &Board,
        side: Side,
        moves: &[Move],
        depth: u32,
        budget: &SearchBudget,
    ) -> Result<(Move, i32), Cancelled> {
        let mut alpha = i32::MIN;
        let beta = i32::MAX;
        let mut best: Option<(&Move, i32)> = None;

        for mv in moves {
            if budget.expired() {
                return Err(Cancelled);
            }
            let child = play_unchecked(board, mv);
            let score = self.minimax(&child, side, side.opponent(), depth - 1, alpha, beta, budget)?;
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((mv, score));
            }
            alpha = alpha.max(score);
        }

        // Root move lists are never empty here.
        best.map(|(mv, score)| (mv.clone(), score)).ok_or(Cancelled)
    }

    #[allow(clippy::too_many_arguments)]
    fn minimax(
        &mut self,
        board: &Board,
        root: Side,
        to_move: Side,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        budget: &SearchBudget,
    ) -> Result<i32, Cancelled> {
        if budget.expired() {
            return Err(Cancelled);
        }
        self.nodes += 1;

        let decided = WIN_SCORE + depth as i32;
        match check_win(board) {
            Some(winner) if winner == root => return Ok(decided),
            Some(_) => return Ok(-decided),
            None => {}
        }
        if depth == 0 {
            return Ok(evaluate(board, root));
        }

        let moves = search_moves(board, to_move, self.config.capture_mode);
        let maximizing = to_move == root;
        if moves.is_empty() {
            return Ok(if maximizing { -WIN_SCORE } else { WIN_SCORE });
        }

        if maximizing {
            let mut best = i32::MIN;
            for mv in &moves {
                let child = play_unchecked(board, mv);
                let score = self.minimax(&child, root, to_move.opponent(), depth - 1, alpha, beta, budget)?;
                best = best.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    break;
                }
            }
            Ok(best)
        } else {
            let mut best = i32::MAX;
            for mv in &moves {
                let child = play_unchecked(board, mv);
                let score = self.minimax(&child, root, to_move.opponent(), depth - 1, alpha, beta, budget)?;
                best = best.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    break;
                }
            }
            Ok(best)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;
    use crate::movegen::legal_captures;

    fn board(rows: [&str; 7]) -> Board {
        Board::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.depth, 5);
        assert_eq!(config.max_depth, 10);
        assert_eq!(config.time_budget, Duration::from_secs(9));
        assert!(!config.iterative);
        assert!(config.validate().is_ok());

        let bad = SearchConfig {
            depth: 0,
            ..SearchConfig::default()
        };
        assert_eq!(bad.validate(), Err(ConfigError::ZeroDepth));
        assert_eq!(duration_from_secs(-1.0), Err(ConfigError::InvalidTime(-1.0)));
        assert_eq!(duration_from_secs(0.5), Ok(Duration::from_millis(500)));
    }

    #[test]
    fn test_budget() {
        assert!(!SearchBudget::unlimited().expired());
        assert!(SearchBudget::with_deadline(Duration::ZERO).expired());

        let budget = SearchBudget::with_deadline(Duration::from_secs(60));
        assert!(!budget.expired());
        budget.stop_handle().store(true, Ordering::Relaxed);
        assert!(budget.expired());
    }

    #[test]
    fn test_single_capture_is_forced() {
        let b = board([
            "  ...  ",
            "  O..  ",
            "..R....",
            "RR.RRRR",
            "RRRRRRR",
            "  ...  ",
            "  ...  ",
        ]);
        let mut searcher = Searcher::new(SearchConfig::for_testing());
        let result = searcher.best_move(&b, Side::Officer);
        assert_eq!(result.kind, SearchKind::Forced);
        assert_eq!(result.best_move, Some(Move::from(vec![(1, 2), (3, 2)])));
    }

    #[test]
    fn test_search_restricted_to_captures() {
        // The officer on (2,2) can jump (2,3) to (2,4) or (3,3) to (4,4).
        let b = board([
            "  ...  ",
            "  ...  ",
            "..OR...",
            "...R...",
            "RRRR.RR",
            "  RRR  ",
            "  RRR  ",
        ]);
        let captures = legal_captures(&b, Side::Officer);
        assert_eq!(captures.len(), 2);

        let mut searcher = Searcher::new(SearchConfig::for_testing());
        let result = searcher.best_move(&b, Side::Officer);
        assert_eq!(result.kind, SearchKind::Searched);
        assert!(captures.contains(result.best_move.as_ref().unwrap()));
    }

    #[test]
    fn test_no_moves() {
        let b = board([
            "  ...  ",
            "  ...  ",
            ".......",
            "...O...",
            ".......",
            "  ...  ",
            "  ...  ",
        ]);
        let mut searcher = Searcher::new(SearchConfig::for_testing());
        let result = searcher.best_move(&b, Side::Rebel);
        assert_eq!(result.kind, SearchKind::NoMoves);
        assert!(result.into_move().is_empty());
    }

    #[test]
    fn test_zero_budget_still_moves() {
        let start = Board::new();
        let mut searcher = Searcher::new(SearchConfig {
            iterative: true,
            time_budget: Duration::ZERO,
            ..SearchConfig::for_testing()
        });
        let result = searcher.best_move(&start, Side::Rebel);
        assert_eq!(result.kind, SearchKind::Fallback);
        assert_eq!(result.depth, 0);
        let mv = result.into_move();
        assert!(crate::arbiter::apply_move(&start, Side::Rebel, &mv).is_ok());
    }

    #[test]
    fn test_stopped_budget_discards_iteration() {
        let start = Board::new();
        let budget = SearchBudget::unlimited();
        budget.stop();
        let mut searcher = Searcher::new(SearchConfig::for_testing());
        let result = searcher.search_iterative(&start, Side::Officer, &budget);
        assert_eq!(result.kind, SearchKind::Fallback);
        assert!(result.best_move.is_some());
    }

    #[test]
    fn test_iterative_completes_depths() {
        let start = Board::new();
        let mut searcher = Searcher::new(SearchConfig {
            iterative: true,
            max_depth: 2,
            time_budget: Duration::from_secs(60),
            ..SearchConfig::for_testing()
        });
        let result = searcher.best_move(&start, Side::Officer);
        assert_eq!(result.kind, SearchKind::Searched);
        assert_eq!(result.depth, 2);
        assert!(result.nodes > 0);
    }

    #[test]
    fn test_expired_budget_keeps_last_completed_depth() {
        let start = Board::new();
        let config = SearchConfig {
            iterative: true,
            max_depth: 10,
            ..SearchConfig::for_testing()
        };
        let mut searcher = Searcher::new(config.clone());
        let result = searcher.search_iterative(
            &start,
            Side::Rebel,
            &SearchBudget::with_deadline(Duration::from_millis(300)),
        );
        assert_eq!(result.kind, SearchKind::Searched);
        assert!(result.depth >= 1 && result.depth < searcher.config().max_depth);

        let fixed = Searcher::new(config).search_fixed(&start, Side::Rebel, result.depth);
        assert_eq!(fixed.best_move, result.best_move);
        assert_eq!(fixed.score, result.score);
    }

    #[test]
    fn test_depth_one_from_start_is_undecided() {
        let start = Board::new();
        for side in [Side::Rebel, Side::Officer] {
            let mut searcher = Searcher::new(SearchConfig::for_testing());
            let result = searcher.search_fixed(&start, side, 1);
            let score = result.score.unwrap();
            assert!(score.abs() < WIN_SCORE, "{side} scored {score}");
        }
    }

    #[test]
    fn test_rebel_completes_fortress() {
        let b = board([
            "  RRR  ",
            "  RRR  ",
            "..R.R..",
            "...R...",
            ".......",
            "  ...  ",
            "  .O.  ",
        ]);
        let mut searcher = Searcher::new(SearchConfig::for_testing());
        let result = searcher.search_fixed(&b, Side::Rebel, 1);
        assert_eq!(result.best_move, Some(Move::from(vec![(3, 3), (2, 3)])));
        assert_eq!(result.score, Some(WIN_SCORE));
    }

    #[test]
    fn test_seeded_search_is_reproducible() {
        let start = Board::new();
        let a = Searcher::new(SearchConfig::for_testing()).search_fixed(&start, Side::Rebel, 2);
        let b = Searcher::new(SearchConfig::for_testing()).search_fixed(&start, Side::Rebel, 2);
        assert_eq!(a.best_move, b.best_move);
        assert_eq!(a.score, b.score);
    }

    #[test]
    fn test_chained_mode_at_root() {
        let b = board([
            "  ...  ",
            "  O..  ",
            "..R....",
            "...R...",
            "RRR.RRR",
            "  RRR  ",
            "  RRR  ",
        ]);
        let mut searcher = Searcher::new(SearchConfig {
            capture_mode: CaptureMode::Chained,
            ..SearchConfig::for_testing()
        });
        let result = searcher.search_fixed(&b, Side::Officer, 1);
        // Taking both Rebels beats stopping after the first.
        let mv = result.best_move.unwrap();
        assert_eq!(mv.len(), 3);
        assert_eq!(mv.end(), Some(Position::new(3, 4)));
    }
}
