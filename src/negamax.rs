//! Negamax alpha-beta search over [`Board`] positions
//!
//! # Position Scoring
//! Scores are given from the point of view of the player to move. A win
//! with the move after `rounds` tiles scores `(CELLS + 1 - rounds) / 2`, so
//! earlier wins score higher. A position where every move hands the
//! opponent a win scores `-((CELLS - rounds) / 2)`, the opponent's win
//! score negated, so later losses score closer to 0. Draws, and positions
//! beyond the depth limit, score 0.

use crate::bitboard::Board;
use crate::config::MoveOrdering;
use crate::threats::{column_mask, move_order};
use crate::transposition_table::BoundTable;
use crate::{CELLS, WIDTH};

/// The minimum possible score of a position
pub const MIN_SCORE: i32 = -((CELLS / 2) as i32);
/// The maximum possible score of a position
pub const MAX_SCORE: i32 = ((CELLS + 1) / 2) as i32;
/// A bound outside the range of every score, for full-window searches
pub const INFINITE_SCORE: i32 = CELLS as i32 + 1;

/// Score of winning with the next tile
pub fn win_score(rounds: usize) -> i32 {
    ((CELLS + 1 - rounds) / 2) as i32
}

/// Score of a position where every move loses on the opponent's reply
///
/// This is the negation of the opponent's [`win_score`] after one more tile.
pub fn loss_score(rounds: usize) -> i32 {
    -(((CELLS - rounds) / 2) as i32)
}

/// Upper bound of the score when the player to move cannot win immediately
pub fn max_score(rounds: usize) -> i32 {
    (CELLS as i32 - 1 - rounds as i32) / 2
}

struct MoveSorter {
    size: usize,
    // move bitmap, column and score
    moves: [(u64, usize, u32); WIDTH],
}

impl MoveSorter {
    pub fn new() -> Self {
        Self {
            size: 0,
            moves: [(0, 0, 0); WIDTH],
        }
    }

    // moves pushed later come out first among equal scores
    pub fn push(&mut self, new_move: u64, column: usize, score: u32) {
        let mut pos = self.size;
        self.size += 1;
        while pos != 0 && self.moves[pos - 1].2 > score {
            self.moves[pos] = self.moves[pos - 1];
            pos -= 1;
        }
        self.moves[pos] = (new_move, column, score);
    }

    pub fn peek(&self) -> Option<usize> {
        match self.size {
            0 => None,
            _ => Some(self.moves[self.size - 1].1),
        }
    }
}

impl Iterator for MoveSorter {
    type Item = (u64, usize);

    fn next(&mut self) -> Option<Self::Item> {
        match self.size {
            0 => None,
            _ => {
                self.size -= 1;
                Some((self.moves[self.size].0, self.moves[self.size].1))
            }
        }
    }
}

/// A single search over one bound table
pub struct Negamax<'a, T: BoundTable> {
    table: &'a mut T,
    ordering: MoveOrdering,
    /// The number of nodes visited so far (for diagnostics only)
    pub node_count: usize,
}

impl<'a, T: BoundTable> Negamax<'a, T> {
    pub fn new(table: &'a mut T, ordering: MoveOrdering) -> Self {
        Self {
            table,
            ordering,
            node_count: 0,
        }
    }

    /// Searches `board` to `depth` plies inside the window `[alpha, beta)`
    ///
    /// Returns the best column found, if any, and the score of the position
    /// (see [Position Scoring]). A score outside the window is only a bound
    /// on the true score, in the direction of the side it fell out on.
    ///
    /// # Panics
    /// Panics if `alpha >= beta`.
    ///
    /// [Position Scoring]: crate::negamax#position-scoring
    pub fn search(
        &mut self,
        board: &Board,
        depth: usize,
        mut alpha: i32,
        mut beta: i32,
    ) -> (Option<usize>, i32) {
        assert!(alpha < beta, "empty search window [{}, {})", alpha, beta);
        self.node_count += 1;

        if board.is_full() {
            return (None, 0);
        }

        // check for next-move win for current player
        for &column in move_order().iter() {
            if board.can_play(column) && board.winning_move(column) {
                return (Some(column), win_score(board.rounds()));
            }
        }

        // look for moves that don't give the opponent a next turn win
        let non_losing_moves = board.non_losing_moves();
        if non_losing_moves == 0 {
            return (None, loss_score(board.rounds()));
        }

        if depth == 0 {
            return (None, 0);
        }

        let moves = self.candidates(board, non_losing_moves);
        let first = match moves.peek() {
            Some(column) => column,
            None => return (None, 0),
        };

        // bounds are only shared between searches that see to the end of the game
        let exact = depth >= CELLS - board.rounds();
        let key = board.key();

        // upper bound of score
        let mut max = max_score(board.rounds());
        if exact {
            if let Some(bound) = self.table.lookup(key) {
                max = max.min(bound);
            }
        }
        if beta > max {
            // clamp beta to calculated upper bound
            beta = max;
            // if the upper bound is lower than alpha, we can prune the exploration
            if alpha >= beta {
                return (Some(first), beta);
            }
        }

        let mut best = Some(first);
        for (move_bitmap, column) in moves {
            let mut next = *board;
            next.play_move(move_bitmap);

            // the search window is flipped for the other player
            let (_, score) = self.search(&next, depth - 1, -beta, -alpha);
            let score = -score;
            // a perfect opponent will not allow this branch
            if score >= beta {
                return (Some(column), score);
            }
            if score > alpha {
                alpha = score;
                best = Some(column);
            }
        }

        if exact {
            self.table.store(key, alpha);
        }
        (best, alpha)
    }

    fn candidates(&self, board: &Board, non_losing_moves: u64) -> MoveSorter {
        let mut moves = MoveSorter::new();
        // push edges first so that ties come out center first
        for &column in move_order().iter().rev() {
            let candidate = non_losing_moves & column_mask(column);
            if candidate != 0 {
                let score = match self.ordering {
                    MoveOrdering::CenterFirst => 0,
                    MoveOrdering::ThreatCount => board.move_score(candidate),
                };
                moves.push(candidate, column, score);
            }
        }
        moves
    }
}

/// Runs a single [`Negamax`] search with center-first ordering
pub fn negamax<T: BoundTable>(
    board: &Board,
    depth: usize,
    alpha: i32,
    beta: i32,
    table: &mut T,
) -> (Option<usize>, i32) {
    Negamax::new(table, MoveOrdering::CenterFirst).search(board, depth, alpha, beta)
}
