//! The game loop.
//!
//! Each round the Rebel player moves first, then the Officer player. Every
//! proposal goes through the [`Arbiter`]. The game ends on a win, when the
//! side to move has no legal move, on a forfeit (player error, panic or
//! overtime), or at the round cap.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::arbiter::Arbiter;
use crate::board::{Board, Side};
use crate::constants::{ROUND_CAP, TURN_TIME_LIMIT_SECS};
use crate::movegen::{CaptureMode, search_moves};
use crate::player::Player;
use crate::search::ConfigError;

/// Limits for one game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// A player taking longer than this for one move forfeits
    pub turn_time_limit: Duration,
    /// Rounds played before the game is called
    pub round_cap: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            turn_time_limit: Duration::from_secs_f64(TURN_TIME_LIMIT_SECS),
            round_cap: ROUND_CAP,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round_cap == 0 {
            return Err(ConfigError::ZeroRoundCap);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForfeitReason {
    /// The player returned an error
    Error(String),
    /// The player panicked
    Panic,
    /// The player exceeded the turn time limit
    Timeout(Duration),
}

impl fmt::Display for ForfeitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForfeitReason::Error(e) => write!(f, "error: {e}"),
            ForfeitReason::Panic => write!(f, "panicked"),
            ForfeitReason::Timeout(d) => write!(f, "took {:.2}s", d.as_secs_f64()),
        }
    }
}

/// How a game ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameOutcome {
    /// A win condition was reached on the board
    Win,
    /// `side` had no legal move on its turn and lost
    NoMoves { side: Side },
    /// `side` forfeited
    Forfeit { side: Side, reason: ForfeitReason },
    /// The round cap was hit; the winner, if any, has fewer illegal moves
    RoundCap,
}

#[derive(Debug, Clone)]
pub struct GameReport {
    pub winner: Option<Side>,
    pub outcome: GameOutcome,
    pub rounds: usize,
    pub rebel_illegal: u32,
    pub officer_illegal: u32,
    pub board: Board,
}

impl fmt::Display for GameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.winner {
            Some(side) => writeln!(f, "winner: {side}")?,
            None => writeln!(f, "winner: none")?,
        }
        match &self.outcome {
            GameOutcome::Win => writeln!(f, "outcome: win on the board")?,
            GameOutcome::NoMoves { side } => writeln!(f, "outcome: {side} had no legal move")?,
            GameOutcome::Forfeit { side, reason } => writeln!(f, "outcome: {side} forfeited ({reason})")?,
            GameOutcome::RoundCap => writeln!(f, "outcome: round cap")?,
        }
        writeln!(f, "rounds: {}", self.rounds)?;
        writeln!(
            f,
            "illegal moves: rebel {}, officer {}",
            self.rebel_illegal, self.officer_illegal
        )?;
        write!(f, "{}", self.board)
    }
}

/// One game between two players.
pub struct Game {
    config: GameConfig,
    arbiter: Arbiter,
    rounds: usize,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self::with_board(config, Board::new())
    }

    /// Start from an arbitrary position.
    pub fn with_board(config: GameConfig, board: Board) -> Self {
        Self {
            config,
            arbiter: Arbiter::with_board(board),
            rounds: 0,
        }
    }

    pub fn arbiter(&self) -> &Arbiter {
        &self.arbiter
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Play until the game ends and report the result.
    pub fn play(&mut self, rebel: &mut dyn Player, officer: &mut dyn Player) -> GameReport {
        loop {
            let mut ended = self.take_turn(rebel, Side::Rebel);
            if ended.is_none() {
                ended = self.take_turn(officer, Side::Officer);
            }
            self.rounds += 1;

            if let Some((winner, outcome)) = ended {
                return self.finish(winner, outcome);
            }
            if self.rounds >= self.config.round_cap {
                let rebel_illegal = self.arbiter.illegal_moves(Side::Rebel);
                let officer_illegal = self.arbiter.illegal_moves(Side::Officer);
                let winner = match rebel_illegal.cmp(&officer_illegal) {
                    std::cmp::Ordering::Less => Some(Side::Rebel),
                    std::cmp::Ordering::Greater => Some(Side::Officer),
                    std::cmp::Ordering::Equal => None,
                };
                return self.finish(winner, GameOutcome::RoundCap);
            }
        }
    }

    /// Ask `player` for a move and submit it. Returns the winner and outcome
    /// if the game ended on this turn.
    fn take_turn(&mut self, player: &mut dyn Player, side: Side) -> Option<(Option<Side>, GameOutcome)> {
        let board = *self.arbiter.board();
        if search_moves(&board, side, CaptureMode::SingleHop).is_empty() {
            info!(%side, "no legal move");
            return Some((Some(side.opponent()), GameOutcome::NoMoves { side }));
        }

        let started = Instant::now();
        let proposal = panic::catch_unwind(AssertUnwindSafe(|| player.play(&board, side)));
        let elapsed = started.elapsed();

        let mv = match proposal {
            Ok(Ok(mv)) => mv,
            Ok(Err(err)) => return Some(forfeit(side, ForfeitReason::Error(format!("{err:#}")))),
            Err(_) => return Some(forfeit(side, ForfeitReason::Panic)),
        };
        if elapsed > self.config.turn_time_limit {
            return Some(forfeit(side, ForfeitReason::Timeout(elapsed)));
        }

        let submission = self.arbiter.submit(side, &mv);
        submission.winner.map(|w| (Some(w), GameOutcome::Win))
    }

    fn finish(&self, winner: Option<Side>, outcome: GameOutcome) -> GameReport {
        let report = GameReport {
            winner,
            outcome,
            rounds: self.rounds,
            rebel_illegal: self.arbiter.illegal_moves(Side::Rebel),
            officer_illegal: self.arbiter.illegal_moves(Side::Officer),
            board: *self.arbiter.board(),
        };
        info!(
            winner = ?report.winner,
            outcome = ?report.outcome,
            rounds = report.rounds,
            "game over"
        );
        report
    }
}

fn forfeit(side: Side, reason: ForfeitReason) -> (Option<Side>, GameOutcome) {
    warn!(%side, %reason, "forfeit");
    (Some(side.opponent()), GameOutcome::Forfeit { side, reason })
}
