//! Benchmark files: one position per line, written as 1-indexed column
//! digits and optionally followed by whitespace and an expected score.
//! Annotations that are not scores are ignored.

use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use rayon::prelude::*;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::{Duration, Instant};

use crate::bitboard::Board;
use crate::config::{SolverConfig, TablePolicy};
use crate::solver::Solver;
use crate::transposition_table::SharedTranspositionTable;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestPosition {
    pub moves: String,
    pub board: Board,
    /// The annotation after the moves, if it is a score
    pub expected: Option<i32>,
}

/// Parses one line, returning `None` for blank lines
pub fn parse_line(line: &str) -> Result<Option<TestPosition>> {
    let mut fields = line.split_whitespace();
    let moves = match fields.next() {
        Some(moves) => moves,
        None => return Ok(None),
    };
    let board = Board::from_moves(moves)
        .with_context(|| format!("invalid test position '{}'", moves))?;
    let expected = fields.next().and_then(|field| field.parse::<i32>().ok());

    Ok(Some(TestPosition {
        moves: moves.to_string(),
        board,
        expected,
    }))
}

/// Reads every position of a benchmark file
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<TestPosition>> {
    let path = path.as_ref();
    let file = BufReader::new(
        File::open(path).with_context(|| format!("could not open {}", path.display()))?,
    );

    let mut positions = Vec::new();
    for (number, line) in file.lines().enumerate() {
        let line = line?;
        if let Some(position) =
            parse_line(&line).with_context(|| format!("{}:{}", path.display(), number + 1))?
        {
            positions.push(position);
        }
    }
    Ok(positions)
}

/// Outcome of solving one benchmark position
#[derive(Clone, Debug)]
pub struct BenchResult {
    pub position: TestPosition,
    pub best_move: Option<usize>,
    pub score: i32,
    pub node_count: usize,
    pub time: Duration,
}

impl BenchResult {
    /// False only when the position was annotated with a different score
    pub fn matches(&self) -> bool {
        self.position.expected.map_or(true, |expected| expected == self.score)
    }
}

#[derive(Clone, Debug)]
pub struct BenchSummary {
    pub results: Vec<BenchResult>,
    pub total_time: Duration,
}

impl BenchSummary {
    pub fn mean_time(&self) -> Duration {
        match self.results.len() {
            0 => Duration::default(),
            len => self.results.iter().map(|r| r.time).sum::<Duration>() / len as u32,
        }
    }

    pub fn mean_nodes(&self) -> f64 {
        match self.results.len() {
            0 => 0.0,
            len => self.results.iter().map(|r| r.node_count).sum::<usize>() as f64 / len as f64,
        }
    }

    /// Thousands of positions searched per second of solving time
    pub fn kpos_per_second(&self) -> f64 {
        let time = self.results.iter().map(|r| r.time).sum::<Duration>();
        let nodes = self.results.iter().map(|r| r.node_count).sum::<usize>();
        match time.as_secs_f64() {
            t if t > 0.0 => nodes as f64 / (1000.0 * t),
            _ => 0.0,
        }
    }

    pub fn mismatches(&self) -> impl Iterator<Item = &BenchResult> {
        self.results.iter().filter(|r| !r.matches())
    }
}

/// Solves every position with `threads` workers sharing one transposition table
///
/// The shared table is kept for the whole run whatever `config.table_policy` says.
pub fn run_benchmark(
    positions: Vec<TestPosition>,
    config: SolverConfig,
    threads: usize,
) -> Result<BenchSummary> {
    let config = SolverConfig {
        table_policy: TablePolicy::Persistent,
        ..config
    };
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|err| anyhow!("could not start worker threads: {}", err))?;

    let table = SharedTranspositionTable::with_size(config.table_size);
    let progress = ProgressBar::new(positions.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("Solving positions: {bar:40.cyan/blue} {pos}/{len} ~{eta} remaining")
            .progress_chars("█▓▒░  "),
    );

    let start = Instant::now();
    let results: Vec<BenchResult> = pool.install(|| {
        positions
            .into_par_iter()
            .map_with(table, |table, position| {
                let mut solver = Solver::with_table(table.clone(), config);
                let solve_start = Instant::now();
                let (best_move, score) = solver.evaluate(&position.board);
                let time = solve_start.elapsed();
                progress.inc(1);

                let result = BenchResult {
                    position,
                    best_move,
                    score,
                    node_count: solver.node_count,
                    time,
                };
                if !result.matches() {
                    warn!(
                        "{}: expected {:?}, calculated {}",
                        result.position.moves, result.position.expected, result.score
                    );
                }
                result
            })
            .collect()
    });
    progress.finish();

    Ok(BenchSummary {
        results,
        total_time: start.elapsed(),
    })
}
