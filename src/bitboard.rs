use thiserror::Error;

use crate::threats::{self, bottom_mask, column_mask, top_mask};
use crate::{CELLS, HEIGHT, WIDTH};

/// Reasons a move history or board snapshot cannot be turned into a [`Board`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("could not parse '{0}' as a valid move")]
    InvalidMove(char),
    #[error("column {0} is out of range")]
    ColumnOutOfRange(usize),
    #[error("invalid move, column {0} full")]
    ColumnFull(usize),
    #[error("invalid position, game is over")]
    GameOver,
    #[error("invalid cell value {value} at column {column}, row {row}")]
    InvalidCell { column: usize, row: usize, value: i8 },
    #[error("tile at column {column}, row {row} has an empty cell below it")]
    FloatingTile { column: usize, row: usize },
    #[error("snapshot holds {tiles} tiles but {rounds} rounds were given")]
    RoundMismatch { tiles: usize, rounds: usize },
    #[error("snapshot holds {first} first player and {second} second player tiles after {rounds} rounds")]
    TileCountMismatch {
        first: usize,
        second: usize,
        rounds: usize,
    },
}

/// A Connect 4 position encoded as two bitmasks
///
/// Columns occupy blocks of `HEIGHT + 1` bits, bottom cell first. The
/// extra bit on top of every column is never set and keeps alignments
/// from wrapping into the next column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    // mask of the tiles of the player to move
    position: u64,
    // mask of all tiles
    mask: u64,
    rounds: usize,
}

impl Board {
    pub fn new() -> Self {
        Self {
            position: 0,
            mask: 0,
            rounds: 0,
        }
    }

    /// Replays a string of 1-indexed column digits, e.g. `"4453"`
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self, BoardError> {
        let mut board = Self::new();

        for column_char in moves.as_ref().chars() {
            match column_char.to_digit(10).map(|c| c as usize) {
                Some(column @ 1..=WIDTH) => {
                    let column = column - 1;
                    if !board.can_play(column) {
                        return Err(BoardError::ColumnFull(column + 1));
                    }
                    // abort if the position is won at any point
                    if board.winning_move(column) {
                        return Err(BoardError::GameOver);
                    }
                    board.play(column);
                }
                Some(column) => return Err(BoardError::ColumnOutOfRange(column)),
                None => return Err(BoardError::InvalidMove(column_char)),
            }
        }
        Ok(board)
    }

    /// Imports a grid indexed as `cells[column][row]`, row 0 at the bottom
    ///
    /// `1` marks a tile of the first player, `-1` a tile of the second
    /// player and `0` an empty cell. The player to move follows from the
    /// parity of `rounds`.
    pub fn from_snapshot(cells: &[[i8; HEIGHT]; WIDTH], rounds: usize) -> Result<Self, BoardError> {
        let mut first: u64 = 0;
        let mut mask: u64 = 0;

        for (column, rows) in cells.iter().enumerate() {
            let mut column_top = false;
            for (row, &value) in rows.iter().enumerate() {
                let bit = 1 << (column * (HEIGHT + 1) + row);
                match value {
                    0 => column_top = true,
                    1 | -1 if column_top => return Err(BoardError::FloatingTile { column, row }),
                    1 => {
                        first |= bit;
                        mask |= bit;
                    }
                    -1 => mask |= bit,
                    _ => return Err(BoardError::InvalidCell { column, row, value }),
                }
            }
        }

        let tiles = mask.count_ones() as usize;
        if tiles != rounds {
            return Err(BoardError::RoundMismatch { tiles, rounds });
        }
        let first_tiles = first.count_ones() as usize;
        if first_tiles != (rounds + 1) / 2 {
            return Err(BoardError::TileCountMismatch {
                first: first_tiles,
                second: tiles - first_tiles,
                rounds,
            });
        }

        let position = if rounds % 2 == 0 { first } else { first ^ mask };
        let board = Self::from_masks(position, mask, rounds);
        if board.last_move_won() || threats::alignment(board.position) {
            return Err(BoardError::GameOver);
        }
        Ok(board)
    }

    pub fn from_masks(position: u64, mask: u64, rounds: usize) -> Self {
        Self {
            position,
            mask,
            rounds,
        }
    }

    /// Tiles of the player to move
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Tiles of both players
    pub fn mask(&self) -> u64 {
        self.mask
    }

    /// Number of tiles placed so far
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn is_full(&self) -> bool {
        self.rounds == CELLS
    }

    pub fn can_play(&self, column: usize) -> bool {
        top_mask(column) & self.mask == 0
    }

    /// Drops a tile of the player to move into `column`
    ///
    /// # Panics
    /// Panics if `column` is already full.
    pub fn play(&mut self, column: usize) {
        assert!(self.can_play(column), "column {} is full", column + 1);
        self.play_move(self.move_bitmap(column));
    }

    /// Plays a single-bit move taken from [`Board::possible`] or [`Board::non_losing_moves`]
    pub fn play_move(&mut self, move_bitmap: u64) {
        // switch the current player
        self.position ^= self.mask;
        // add a cell of the previous player to the correct column
        self.mask |= move_bitmap;
        self.rounds += 1;
    }

    /// The cell a tile dropped into `column` would land on
    pub fn move_bitmap(&self, column: usize) -> u64 {
        (self.mask + bottom_mask(column)) & column_mask(column)
    }

    /// Returns true if dropping a tile into `column` wins for the player to move
    pub fn winning_move(&self, column: usize) -> bool {
        // play the move on a copy of the position, keeping the current player
        threats::alignment(self.position | self.move_bitmap(column))
    }

    /// Returns true if the player who moved last has four aligned tiles
    pub fn last_move_won(&self) -> bool {
        threats::alignment(self.position ^ self.mask)
    }

    pub fn possible(&self) -> u64 {
        threats::possible(self.mask)
    }

    pub fn non_losing_moves(&self) -> u64 {
        threats::non_losing_moves(self.position, self.mask)
    }

    /// Empty cells that would complete an alignment for the opponent
    pub fn opponent_winning_positions(&self) -> u64 {
        threats::winning_positions(self.position ^ self.mask, self.mask)
    }

    pub fn move_score(&self, candidate: u64) -> u32 {
        // how many open ends of 3-alignments are there?
        threats::winning_positions(self.position | candidate, self.mask | candidate).count_ones()
    }

    // key for transposition table
    pub fn key(&self) -> u64 {
        self.position + self.mask
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
