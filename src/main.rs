use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use connect4_solver::bitboard::Board;
use connect4_solver::config::{MoveOrdering, SolverConfig, TablePolicy};
use connect4_solver::positions;
use connect4_solver::solver::{win_distance, Solver};
use connect4_solver::transposition_table::DEFAULT_TABLE_SIZE;
use connect4_solver::CELLS;

#[derive(Parser, Debug)]
#[command(author, version, about = "Exact Connect 4 solver", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Number of transposition table slots
    #[arg(long, default_value_t = DEFAULT_TABLE_SIZE)]
    table_size: usize,

    /// Clear the transposition table before every solve
    #[arg(long)]
    reset_table: bool,

    /// Order in which candidate columns are searched
    #[arg(long, value_enum, default_value_t = OrderingArg::Center)]
    ordering: OrderingArg,

    /// Search depth in plies
    #[arg(long, default_value_t = CELLS)]
    depth: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OrderingArg {
    Center,
    Threats,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve the position reached by a sequence of 1-indexed columns, e.g. "4453"
    Solve {
        #[arg(default_value = "")]
        moves: String,
    },
    /// Solve every position of a benchmark file
    Bench {
        file: PathBuf,
        /// Worker threads, 0 uses one per core
        #[arg(long, default_value_t = 0)]
        threads: usize,
    },
}

impl Args {
    fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            table_size: self.table_size,
            table_policy: if self.reset_table {
                TablePolicy::ResetEachSolve
            } else {
                TablePolicy::Persistent
            },
            ordering: match self.ordering {
                OrderingArg::Center => MoveOrdering::CenterFirst,
                OrderingArg::Threats => MoveOrdering::ThreatCount,
            },
            depth: self.depth,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    )
    .format_timestamp(None)
    .init();

    let config = args.solver_config();
    match &args.command {
        Command::Solve { moves } => solve(moves, config),
        Command::Bench { file, threads } => bench(file, config, *threads),
    }
}

fn solve(moves: &str, config: SolverConfig) -> Result<()> {
    let board = Board::from_moves(moves)?;
    let mut solver = Solver::with_config(config);
    let (best_move, score) = solver.evaluate(&board);

    let player = board.rounds() % 2 + 1;
    let opponent = 3 - player;
    let win_distance = win_distance(&board, score);
    let move_string = if win_distance == 1 { "move" } else { "moves" };
    match score.cmp(&0) {
        Ordering::Greater => info!(
            "Player {} can force a win in at most {} {}.",
            player, win_distance, move_string
        ),
        Ordering::Less => info!(
            "Player {} can force a win in at most {} {}.",
            opponent, win_distance, move_string
        ),
        Ordering::Equal => info!(
            "Player {} can at best force a draw, {} {} remaining",
            player, win_distance, move_string
        ),
    }
    match best_move {
        Some(column) => info!("Best move: {}", column + 1),
        None => info!("The board is full"),
    }
    info!("Score: {}, positions searched: {}", score, solver.node_count);
    Ok(())
}

fn bench(file: &Path, config: SolverConfig, threads: usize) -> Result<()> {
    let positions = positions::load(file)?;
    info!("Loaded {} positions from {}", positions.len(), file.display());

    let summary = positions::run_benchmark(positions, config, threads)?;
    info!(
        "Mean time: {:.6}ms, Mean no. of positions: {}, kpos/s: {:.1}, total: {:.3}s",
        summary.mean_time().as_secs_f64() * 1000.0,
        summary.mean_nodes(),
        summary.kpos_per_second(),
        summary.total_time.as_secs_f64()
    );

    let mismatches = summary.mismatches().count();
    if mismatches != 0 {
        anyhow::bail!("{} positions did not match their expected score", mismatches);
    }
    Ok(())
}
