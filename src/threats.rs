//! Alignment and threat detection over raw bitmasks
//!
//! Every function here is pure: it takes the masks of a position and
//! returns a mask or a flag, so the search can ask about hypothetical
//! positions without building a [`Board`](crate::bitboard::Board).

use crate::{HEIGHT, WIDTH};

pub mod static_masks {
    use crate::{HEIGHT, WIDTH};

    /// One bit at the bottom of every column
    pub const fn bottom_mask() -> u64 {
        let mut mask = 0;
        let mut column = 0;
        while column < WIDTH {
            mask |= 1 << (column * (HEIGHT + 1));
            column += 1;
        }
        mask
    }

    /// Every playable cell, guard bits excluded
    pub const fn full_board_mask() -> u64 {
        bottom_mask() * ((1 << HEIGHT) - 1)
    }
}

/// Bit strides of the four alignment directions: horizontal, both diagonals, vertical
pub const DIRECTIONS: [usize; 4] = [HEIGHT + 1, HEIGHT, HEIGHT + 2, 1];

/// Returns true if `pos` contains four aligned tiles in any direction
pub fn alignment(pos: u64) -> bool {
    for &stride in DIRECTIONS.iter() {
        // mark all runs of 2
        let m = pos & (pos >> stride);
        // check for runs of 2 * (runs of 2)
        if m & (m >> (2 * stride)) != 0 {
            return true;
        }
    }
    false
}

/// Creates a bitmap of the empty squares that would complete an alignment for `side_mask`
pub fn winning_positions(side_mask: u64, full_mask: u64) -> u64 {
    // vertical
    // find the top ends of 3-alignments
    let mut r = (side_mask << 1) & (side_mask << 2) & (side_mask << 3);

    // horizontal and both diagonals share the same pattern with different strides
    for &stride in DIRECTIONS[..3].iter() {
        let mut p = (side_mask << stride) & (side_mask << (2 * stride));
        // find the right ends of 3-alignments
        r |= p & (side_mask << (3 * stride));
        // find holes of the type ...O O _ O...
        r |= p & (side_mask >> stride);

        p = (side_mask >> stride) & (side_mask >> (2 * stride));
        // find the left ends of 3-alignments
        r |= p & (side_mask >> (3 * stride));
        // find holes of the type ...O _ O O...
        r |= p & (side_mask << stride);
    }

    r & (static_masks::full_board_mask() ^ full_mask)
}

/// The lowest empty cell of every column that is not full
pub fn possible(full_mask: u64) -> u64 {
    (full_mask + static_masks::bottom_mask()) & static_masks::full_board_mask()
}

/// Playable cells that do not hand the opponent a win on their next move
///
/// `position` holds the tiles of the side to move and `full_mask` every tile.
/// An empty result means the opponent has more threats than can be blocked,
/// or every playable cell sits under one of their winning cells.
pub fn non_losing_moves(position: u64, full_mask: u64) -> u64 {
    let mut possible_moves = possible(full_mask);
    let opponent_winning_positions = winning_positions(position ^ full_mask, full_mask);
    let forced_moves = possible_moves & opponent_winning_positions;

    if forced_moves != 0 {
        // if more than one forced move exists, you can't prevent the opponent winning
        if forced_moves & (forced_moves - 1) != 0 {
            return 0;
        } else {
            possible_moves = forced_moves
        }
    }
    // avoid playing below an opponent's winning move
    possible_moves & !(opponent_winning_positions >> 1)
}

/// Mask of the playable cells in `column`
pub const fn column_mask(column: usize) -> u64 {
    ((1 << HEIGHT) - 1) << (column * (HEIGHT + 1))
}

/// Mask of the bottom cell of `column`
pub const fn bottom_mask(column: usize) -> u64 {
    1 << (column * (HEIGHT + 1))
}

/// Mask of the top playable cell of `column`
pub const fn top_mask(column: usize) -> u64 {
    1 << (column * (HEIGHT + 1) + (HEIGHT - 1))
}

/// Returns the columns ordered from the middle outwards, as
/// the middle columns are often better moves
pub const fn move_order() -> [usize; WIDTH] {
    let mut move_order = [0; WIDTH];
    let mut i = 0;
    while i < WIDTH {
        move_order[i] = (WIDTH / 2) + (i % 2) * (i / 2 + 1) - (1 - i % 2) * (i / 2);
        i += 1;
    }
    move_order
}
