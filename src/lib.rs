//! An exact solver for the board game 'Connect 4'
//!
//! Positions are encoded as a pair of bitmasks, searched with a negamax
//! alpha-beta search backed by a transposition table, and driven to an
//! exact game value by a sequence of null-window searches.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_solver::{bitboard::Board, solver::Solver};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let board = Board::from_moves("112233")?;
//! let mut solver = Solver::new();
//! let (best_move, score) = solver.solve(&board, connect4_solver::CELLS);
//!
//! assert_eq!((best_move, score), (Some(3), 18));
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod threats;

pub mod bitboard;

pub mod transposition_table;

pub mod negamax;

pub mod config;

pub mod solver;

pub mod bot;

pub mod positions;


/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

/// The number of playable cells on the board
pub const CELLS: usize = WIDTH * HEIGHT;

// ensure that the given dimensions fit in a u64 for the bitboard representation
const_assert!(WIDTH * (HEIGHT + 1) < 64);
// the table packs scores into a single byte
const_assert!(CELLS < 250);
