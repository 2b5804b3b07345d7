//! Command-line interface
//!
//! Offline analysis commands over the engine. Each command returns its
//! report as a string; `main` prints it to stdout while logs go to stderr.
//!
//! Precedence for every engine parameter: command-line flag, then the
//! settings file, then the built-in default.

use crate::core::{save_settings, AppResult, EngineSettings, EvaluatorKind};
use chess_engine::{
    perft, perft_divide, Game, GameState, InsufficientMaterialOracle, MctsSearch, SearchError,
    TimeControl,
};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "tars")]
#[command(about = "Bitboard chess engine driven by parallel Monte Carlo Tree Search")]
#[command(version)]
pub struct Cli {
    /// Settings file [default: settings.json in the platform config directory]
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG wins over both
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one timed search and print the chosen move with statistics
    Search(SearchArgs),
    /// Count legal leaf nodes to a depth
    Perft(PerftArgs),
    /// List the legal moves of a position
    Moves(PositionArgs),
    /// Print the effective settings, optionally saving them
    Settings(SettingsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PositionArgs {
    /// Six-field FEN, or `startpos`
    #[arg(long, default_value = "startpos")]
    pub fen: String,

    /// Moves to play from the position first, e.g. `--moves e2e4 e7e5`
    #[arg(long, num_args = 1..)]
    pub moves: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub position: PositionArgs,

    /// Fixed think time in milliseconds
    #[arg(long)]
    pub movetime: Option<u64>,

    /// White's remaining clock in milliseconds
    #[arg(long)]
    pub wtime: Option<u64>,

    /// Black's remaining clock in milliseconds
    #[arg(long)]
    pub btime: Option<u64>,

    #[arg(long)]
    pub winc: Option<u64>,

    #[arg(long)]
    pub binc: Option<u64>,

    /// Stop after exactly this many iterations
    #[arg(long)]
    pub iterations: Option<u64>,

    /// Worker threads, 0 for all cores
    #[arg(long)]
    pub threads: Option<usize>,

    /// UCB1 exploration constant
    #[arg(long)]
    pub exploration: Option<f64>,

    /// Evaluate each expanded node's children in one evaluator call
    #[arg(long)]
    pub batch_children: bool,

    #[arg(long, value_enum)]
    pub evaluator: Option<EvaluatorKind>,

    /// Base seed for rollouts
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct PerftArgs {
    #[command(flatten)]
    pub position: PositionArgs,

    #[arg(long, default_value_t = 4)]
    pub depth: u32,

    /// Print the node count under each root move
    #[arg(long)]
    pub divide: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SettingsArgs {
    /// Write the effective settings to the settings file
    #[arg(long)]
    pub save: bool,
}

impl SearchArgs {
    /// `settings` with this command's flags applied on top
    pub fn apply(&self, settings: &EngineSettings) -> EngineSettings {
        let mut merged = settings.clone();
        if let Some(iterations) = self.iterations {
            merged.mcts.max_iterations = Some(iterations);
        }
        if let Some(threads) = self.threads {
            merged.mcts.threads = threads;
        }
        if let Some(exploration) = self.exploration {
            merged.mcts.exploration = exploration;
        }
        if self.batch_children {
            merged.mcts.batch_children = true;
        }
        if let Some(evaluator) = self.evaluator {
            merged.evaluator = evaluator;
        }
        if let Some(seed) = self.seed {
            merged.seed = seed;
        }
        merged
    }

    /// Clock for this search; the settings' think time applies when no clock is given
    pub fn time_control(&self, settings: &EngineSettings) -> TimeControl {
        let clock_given = self.wtime.is_some() || self.btime.is_some();
        TimeControl {
            movetime: self
                .movetime
                .or((!clock_given).then_some(settings.movetime_ms)),
            wtime: self.wtime.unwrap_or(0),
            btime: self.btime.unwrap_or(0),
            winc: self.winc.unwrap_or(0),
            binc: self.binc.unwrap_or(0),
        }
    }
}

/// Dispatch a parsed command
pub fn run(command: &Command, settings: &EngineSettings, settings_file: &Path) -> AppResult<String> {
    match command {
        Command::Search(args) => run_search(args, settings),
        Command::Perft(args) => run_perft(args),
        Command::Moves(args) => run_moves(args),
        Command::Settings(args) => run_settings(args, settings, settings_file),
    }
}

/// Load the position and play the listed moves
pub fn load_game(args: &PositionArgs) -> AppResult<Game> {
    let mut game = Game::new();
    game.set_position(&args.fen)?;
    for text in &args.moves {
        game.play(text)?;
    }
    debug!("[CLI] Loaded {} after {} move(s)", game.to_fen(), args.moves.len());
    Ok(game)
}

pub fn run_search(args: &SearchArgs, settings: &EngineSettings) -> AppResult<String> {
    let game = load_game(&args.position)?;
    let settings = args.apply(settings);
    settings.validate()?;

    let search = MctsSearch::new(settings.build_evaluator(), settings.mcts.clone())
        .with_oracle(InsufficientMaterialOracle);
    match game.reply(&search, &args.time_control(&settings)) {
        Ok(result) => Ok(result.to_string()),
        Err(SearchError::NoLegalMoves { outcome }) => Ok(format!(
            "bestmove 0000 ({:?} for {})\n",
            outcome,
            game.position().side_to_move()
        )),
        Err(err) => Err(err.into()),
    }
}

pub fn run_perft(args: &PerftArgs) -> AppResult<String> {
    let game = load_game(&args.position)?;
    let start = Instant::now();
    let mut report = String::new();

    let nodes = if args.divide {
        let split = perft_divide(game.position(), args.depth)?;
        for (mv, count) in &split {
            report.push_str(&format!("{mv}: {count}\n"));
        }
        split.iter().map(|(_, count)| count).sum::<u64>()
    } else {
        perft(game.position(), args.depth)?
    };

    let elapsed = start.elapsed();
    info!(
        "[PERFT] depth {} nodes {} in {:?} ({:.0} nps)",
        args.depth,
        nodes,
        elapsed,
        nodes as f64 / elapsed.as_secs_f64().max(1e-9)
    );
    report.push_str(&format!("nodes {nodes}\n"));
    Ok(report)
}

pub fn run_moves(args: &PositionArgs) -> AppResult<String> {
    let game = load_game(args)?;
    let mut moves: Vec<String> = game.legal_moves()?.iter().map(|mv| mv.to_string()).collect();
    moves.sort();

    let state = match game.state()? {
        GameState::Playing => String::new(),
        GameState::Checkmate => " (checkmate)".to_string(),
        GameState::Stalemate => " (stalemate)".to_string(),
    };
    Ok(format!("{} legal move(s){}\n{}\n", moves.len(), state, moves.join(" ")))
}

pub fn run_settings(
    args: &SettingsArgs,
    settings: &EngineSettings,
    settings_file: &Path,
) -> AppResult<String> {
    if args.save {
        save_settings(settings_file, settings)?;
    }
    Ok(format!("{}\n", serde_json::to_string_pretty(settings)?))
}
