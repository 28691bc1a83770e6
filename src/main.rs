//! Asalto engine command line.
//!
//! ## Usage
//!
//! - `asalto` / `asalto play` - Play one engine-vs-engine game
//! - `asalto analyse --board FILE --side rebel` - Print the engine's move for a position

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Command, FromArgMatches, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use asalto::board::{Board, Side};
use asalto::constants::{MAX_ITERATIVE_DEPTH, ROUND_CAP, SEARCH_DEPTH, TIME_BUDGET_SECS, TURN_TIME_LIMIT_SECS};
use asalto::game::{Game, GameConfig};
use asalto::movegen::CaptureMode;
use asalto::player::{HeuristicValue, Player, SearchPlayer, ValuePlayer};
use asalto::search::{SearchConfig, Searcher, duration_from_secs};

/// Asalto: an alpha-beta engine for the fox-and-geese fortress game
#[derive(Parser)]
#[command(name = "asalto")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one game between two engines and print the report
    Play(PlayArgs),
    /// Read a board from a JSON file and print the chosen move as JSON
    Analyse(AnalyseArgs),
}

#[derive(Args, Clone)]
struct SearchArgs {
    /// Fixed search depth in plies
    #[arg(long, default_value_t = SEARCH_DEPTH)]
    depth: u32,
    /// Time budget per move for iterative deepening, in seconds
    #[arg(long, default_value_t = TIME_BUDGET_SECS)]
    time_budget: f64,
    /// Deepest iteration for iterative deepening
    #[arg(long, default_value_t = MAX_ITERATIVE_DEPTH)]
    max_depth: u32,
    /// Seed for move ordering; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Let Officer plies search full capture chains
    #[arg(long)]
    chained_captures: bool,
}

impl SearchArgs {
    fn config(&self, iterative: bool) -> Result<SearchConfig> {
        let config = SearchConfig {
            depth: self.depth,
            iterative,
            time_budget: duration_from_secs(self.time_budget)?,
            max_depth: self.max_depth,
            capture_mode: if self.chained_captures {
                CaptureMode::Chained
            } else {
                CaptureMode::SingleHop
            },
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Args)]
struct PlayArgs {
    /// Engine playing the Rebels
    #[arg(long, value_enum, default_value_t = Engine::Iterative)]
    rebel: Engine,
    /// Engine playing the Officers
    #[arg(long, value_enum, default_value_t = Engine::Iterative)]
    officer: Engine,
    /// Rounds before the game is called
    #[arg(long, default_value_t = ROUND_CAP)]
    round_cap: usize,
    /// Seconds a player may take for one move before forfeiting
    #[arg(long, default_value_t = TURN_TIME_LIMIT_SECS)]
    turn_time_limit: f64,
    #[command(flatten)]
    search: SearchArgs,
}

impl PlayArgs {
    /// The arguments of a bare `play`, taken from the clap defaults.
    fn defaults() -> Result<Self> {
        let matches = Self::augment_args(Command::new("play")).try_get_matches_from(["play"])?;
        Ok(Self::from_arg_matches(&matches)?)
    }
}

#[derive(Args)]
struct AnalyseArgs {
    /// JSON file holding the board as an array of 7 row strings
    #[arg(long)]
    board: PathBuf,
    /// Side to move
    #[arg(long, value_enum)]
    side: SideArg,
    /// Use iterative deepening instead of a fixed-depth search
    #[arg(long)]
    iterative: bool,
    #[command(flatten)]
    search: SearchArgs,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Engine {
    /// Fixed-depth alpha-beta
    Minimax,
    /// Iterative deepening under a time budget
    Iterative,
    /// One-ply greedy on the heuristic value
    Greedy,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum SideArg {
    Rebel,
    Officer,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Rebel => Side::Rebel,
            SideArg::Officer => Side::Officer,
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Some(Commands::Play(args)) => run_play(&args),
        Some(Commands::Analyse(args)) => run_analyse(&args),
        None => run_play(&PlayArgs::defaults()?),
    }
}

fn build_player(engine: Engine, search: &SearchArgs, seed_offset: u64) -> Result<Box<dyn Player>> {
    let mut search = search.clone();
    search.seed = search.seed.map(|s| s.wrapping_add(seed_offset));
    Ok(match engine {
        Engine::Minimax => Box::new(SearchPlayer::new(search.config(false)?)),
        Engine::Iterative => Box::new(SearchPlayer::new(search.config(true)?)),
        Engine::Greedy => Box::new(ValuePlayer::new(HeuristicValue)),
    })
}

fn run_play(args: &PlayArgs) -> Result<()> {
    let config = GameConfig {
        turn_time_limit: duration_from_secs(args.turn_time_limit)
            .context("invalid --turn-time-limit")?,
        round_cap: args.round_cap,
    };
    config.validate()?;

    let mut rebel = build_player(args.rebel, &args.search, 0).context("configuring the Rebel engine")?;
    let mut officer = build_player(args.officer, &args.search, 1).context("configuring the Officer engine")?;

    info!(rebel = ?args.rebel, officer = ?args.officer, "starting game");
    let mut game = Game::new(config);
    let report = game.play(rebel.as_mut(), officer.as_mut());
    println!("{report}");
    Ok(())
}

fn run_analyse(args: &AnalyseArgs) -> Result<()> {
    let text = fs::read_to_string(&args.board)
        .with_context(|| format!("reading {}", args.board.display()))?;
    let board: Board = serde_json::from_str(&text)
        .with_context(|| format!("parsing board from {}", args.board.display()))?;

    let mut searcher = Searcher::new(args.search.config(args.iterative)?);
    let result = searcher.best_move(&board, args.side.into());
    info!(
        depth = result.depth,
        nodes = result.nodes,
        score = ?result.score,
        kind = ?result.kind,
        "analysis done"
    );
    println!("{}", result.into_move().to_json());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_invocation_plays_with_defaults() {
        let args = PlayArgs::defaults().unwrap();
        assert_eq!(args.rebel, Engine::Iterative);
        assert_eq!(args.officer, Engine::Iterative);
        assert_eq!(args.round_cap, ROUND_CAP);
        assert_eq!(args.turn_time_limit, TURN_TIME_LIMIT_SECS);
        assert_eq!(args.search.depth, SEARCH_DEPTH);
        assert_eq!(args.search.time_budget, TIME_BUDGET_SECS);
        assert_eq!(args.search.max_depth, MAX_ITERATIVE_DEPTH);
        assert_eq!(args.search.seed, None);
        assert!(!args.search.chained_captures);
    }

    #[test]
    fn test_play_flags_override_defaults() {
        let cli = Cli::try_parse_from(["asalto", "play", "--rebel", "greedy", "--round-cap", "5", "--seed", "3"]).unwrap();
        match cli.command {
            Some(Commands::Play(args)) => {
                assert_eq!(args.rebel, Engine::Greedy);
                assert_eq!(args.round_cap, 5);
                assert_eq!(args.search.seed, Some(3));
            }
            _ => panic!("expected play"),
        }
    }
}
