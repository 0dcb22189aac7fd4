//! An agent to solve the game of Connect 4

use log::{debug, trace};

use crate::bitboard::Board;
use crate::config::{SolverConfig, TablePolicy};
use crate::negamax::Negamax;
use crate::transposition_table::{BoundTable, TranspositionTable};
use crate::{CELLS, WIDTH};

use std::cmp::Ordering;
use std::time::Instant;

/// An agent to solve Connect 4 positions
///
/// # Notes
/// The solver owns its transposition table for as long as it lives. With
/// [`TablePolicy::Persistent`] every `solve` reuses the bounds found by
/// earlier ones, with [`TablePolicy::ResetEachSolve`] each solve starts
/// from an empty table. Either way the results are the same; only the
/// node counts differ.
///
/// Scores follow the [negamax scoring](crate::negamax#position-scoring).
#[derive(Clone)]
pub struct Solver<T: BoundTable = TranspositionTable> {
    table: T,
    config: SolverConfig,

    /// The number of nodes searched by this `Solver` so far (for diagnostics only)
    pub node_count: usize,
}

impl Solver<TranspositionTable> {
    /// Creates a new `Solver` with the default configuration
    pub fn new() -> Self {
        Self::with_config(SolverConfig::default())
    }

    /// Creates a new `Solver` with a table sized by `config`
    pub fn with_config(config: SolverConfig) -> Self {
        Self::with_table(TranspositionTable::with_size(config.table_size), config)
    }
}

impl Default for Solver<TranspositionTable> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: BoundTable> Solver<T> {
    /// Creates a new `Solver` from an existing table
    pub fn with_table(table: T, config: SolverConfig) -> Self {
        Self {
            table,
            config,
            node_count: 0,
        }
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    pub fn clear_table(&mut self) {
        self.table.clear();
    }

    /// Performs a single game tree search inside the window `[alpha, beta)`
    ///
    /// # Panics
    /// Panics if `alpha >= beta`.
    pub fn negamax(
        &mut self,
        board: &Board,
        depth: usize,
        alpha: i32,
        beta: i32,
    ) -> (Option<usize>, i32) {
        let mut search = Negamax::new(&mut self.table, self.config.ordering);
        let result = search.search(board, depth, alpha, beta);
        self.node_count += search.node_count;
        result
    }

    /// Solves `board` to the configured depth
    pub fn evaluate(&mut self, board: &Board) -> (Option<usize>, i32) {
        self.solve(board, self.config.depth)
    }

    /// Calculates the best move and score of `board` by narrowing the score window
    ///
    /// The column is `None` only when the board is full.
    pub fn solve(&mut self, board: &Board, depth: usize) -> (Option<usize>, i32) {
        if self.config.table_policy == TablePolicy::ResetEachSolve {
            self.clear_table();
        }
        let start = Instant::now();
        let start_nodes = self.node_count;

        let mut min = -((CELLS - board.rounds()) as i32) / 2;
        let mut max = (CELLS + 1 - board.rounds()) as i32 / 2;

        let mut best_move = None;
        let mut fallback = None;
        // iteratively narrow the search window
        while min < max {
            let mut mid = min + (max - min) / 2;
            // tweak the search value for both negative and positive searches
            if mid <= 0 && min / 2 < mid {
                mid = min / 2
            } else if mid >= 0 && max / 2 > mid {
                mid = max / 2
            }

            // use a null-window to determine if the actual score is greater or less that mid
            let (column, r) = self.negamax(board, depth, mid, mid + 1);
            trace!(
                "window [{}, {}], probe {}, result {}, nodes {}",
                min,
                max,
                mid,
                r,
                self.node_count - start_nodes
            );

            // r is not necessarily the exact true score, but its value indicates
            // whether the true score is above or below the search target
            if r <= mid {
                // actual score <= mid
                max = r;
                fallback = column.or(fallback);
            } else {
                // actual score > mid
                min = r;
                best_move = column;
            }
        }

        // every move loses or no probe failed high, any playable column will do
        let best_move = best_move
            .or(fallback)
            .or_else(|| (0..WIDTH).find(|&column| board.can_play(column)));

        debug!(
            "solved position with {} tiles: score {}, best move {:?}, {} nodes in {:.3}ms",
            board.rounds(),
            min,
            best_move.map(|column| column + 1),
            self.node_count - start_nodes,
            start.elapsed().as_secs_f64() * 1000.0
        );
        (best_move, min)
    }
}

/// Converts a position score to a win distance in the winning player's moves
///
/// A drawn position returns the number of tiles left to play.
pub fn win_distance(board: &Board, score: i32) -> usize {
    match score.cmp(&0) {
        Ordering::Equal => CELLS - board.rounds(),
        Ordering::Greater => (CELLS / 2 + 1 - score as usize) - board.rounds() / 2,
        Ordering::Less => (CELLS / 2 + 1 - (-score) as usize) - (board.rounds() + 1) / 2,
    }
}
