//! Entry point for game loops that drive a minimax bot

use log::debug;

use crate::bitboard::Board;
use crate::negamax::{negamax, INFINITE_SCORE};
use crate::solver::Solver;
use crate::transposition_table::{BoundTable, DisabledTable};

/// Picks a column for the player to move
///
/// With `pruning` and the full window `[-INFINITE_SCORE, INFINITE_SCORE)`
/// the position is solved with null-window searches. With `pruning` and a
/// narrower window a single search runs inside that window. Without
/// `pruning` a single full-window search runs without a transposition table.
///
/// The search always scores from the point of view of the player to move;
/// when `maximizing_player` is false the score is negated before returning.
pub fn select_move<T: BoundTable>(
    solver: &mut Solver<T>,
    board: &Board,
    depth: usize,
    alpha: i32,
    beta: i32,
    maximizing_player: bool,
    pruning: bool,
) -> (Option<usize>, i32) {
    let (column, score) = if !pruning {
        negamax(board, depth, -INFINITE_SCORE, INFINITE_SCORE, &mut DisabledTable)
    } else if alpha <= -INFINITE_SCORE && beta >= INFINITE_SCORE {
        solver.solve(board, depth)
    } else {
        solver.negamax(board, depth, alpha, beta)
    };
    debug!(
        "bot picked column {:?} with score {} (pruning: {})",
        column, score, pruning
    );

    if maximizing_player {
        (column, score)
    } else {
        (column, -score)
    }
}
