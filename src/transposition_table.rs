//! Caches of previously established score bounds, keyed by [`Board::key`]
//!
//! A table is a pure optimisation: the search returns the same results
//! with any of the implementations here, including [`DisabledTable`].
//!
//! [`Board::key`]: crate::bitboard::Board::key

use std::sync::{atomic::*, Arc};

use crate::negamax::{MAX_SCORE, MIN_SCORE};
use crate::{HEIGHT, WIDTH};

/// Number of bits a position key can occupy
const KEY_BITS: usize = WIDTH * (HEIGHT + 1);

/// Smallest table for which the slot index and the 32-bit partial key
/// together identify a full key
pub const MIN_TABLE_SIZE: usize = 1 << KEY_BITS.saturating_sub(32);

pub const DEFAULT_TABLE_SIZE: usize = (1 << 23) + 9; // prime value

/// Storage for upper bounds of position scores
pub trait BoundTable {
    /// Records `score` as an upper bound of the position with `key`, replacing any older entry in its slot
    fn store(&mut self, key: u64, score: i32);
    /// The stored upper bound for `key`, if its slot still holds it
    fn lookup(&self, key: u64) -> Option<i32>;
    /// Drops every entry
    fn clear(&mut self);
}

// offset of one to prevent putting a 0, which represents an empty entry
pub fn pack_score(score: i32) -> u8 {
    debug_assert!((MIN_SCORE..=MAX_SCORE).contains(&score));
    (score - MIN_SCORE + 1) as u8
}

pub fn unpack_score(value: u8) -> i32 {
    value as i32 + MIN_SCORE - 1
}

/// Rounds a requested size up to one that keeps partial keys unambiguous
pub fn table_size(requested: usize) -> usize {
    if requested % 2 == 1 && requested >= MIN_TABLE_SIZE {
        return requested;
    }
    let mut size = requested.max(MIN_TABLE_SIZE) | 1;
    while !is_prime(size) {
        size += 2;
    }
    size
}

fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

#[derive(Copy, Clone)]
struct Entry {
    key: u32,
    value: u8,
}
impl Entry {
    pub fn new() -> Self {
        Self { key: 0, value: 0 }
    }
}

/// Direct-addressed table with one always-replace slot per index
#[derive(Clone)]
pub struct TranspositionTable {
    entries: Vec<Entry>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::with_size(DEFAULT_TABLE_SIZE)
    }

    /// Creates a table of at least `size` slots, see [`table_size`]
    pub fn with_size(size: usize) -> Self {
        Self {
            entries: vec![Entry::new(); table_size(size)],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Number of occupied slots
    pub fn occupied(&self) -> usize {
        self.entries.iter().filter(|entry| entry.value != 0).count()
    }
}

impl BoundTable for TranspositionTable {
    fn store(&mut self, key: u64, score: i32) {
        let len = self.entries.len();
        self.entries[key as usize % len] = Entry {
            key: key as u32,
            value: pack_score(score),
        };
    }

    fn lookup(&self, key: u64) -> Option<i32> {
        let entry = self.entries[key as usize % self.entries.len()];
        if entry.value != 0 && entry.key == key as u32 {
            Some(unpack_score(entry.value))
        } else {
            None
        }
    }

    fn clear(&mut self) {
        for entry in self.entries.iter_mut() {
            *entry = Entry::new();
        }
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new()
    }
}

/// A table that never remembers anything
#[derive(Copy, Clone, Default)]
pub struct DisabledTable;

impl BoundTable for DisabledTable {
    fn store(&mut self, _key: u64, _score: i32) {}

    fn lookup(&self, _key: u64) -> Option<i32> {
        None
    }

    fn clear(&mut self) {}
}

/// A table whose clones share storage, for searches running on several threads
///
/// Each slot packs the partial key and the value into a single atomic word,
/// so a reader never sees a key paired with another position's value.
#[derive(Clone)]
pub struct SharedTranspositionTable {
    entries: Arc<Vec<AtomicU64>>,
}

impl SharedTranspositionTable {
    pub fn with_size(size: usize) -> Self {
        let size = table_size(size);
        let mut entries = Vec::with_capacity(size);
        for _ in 0..size {
            entries.push(AtomicU64::new(0));
        }
        Self {
            entries: Arc::new(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl BoundTable for SharedTranspositionTable {
    fn store(&mut self, key: u64, score: i32) {
        let i = key as usize % self.entries.len();
        let data = ((key as u32 as u64) << 8) | pack_score(score) as u64;
        self.entries[i].store(data, Ordering::Relaxed);
    }

    fn lookup(&self, key: u64) -> Option<i32> {
        let data = self.entries[key as usize % self.entries.len()].load(Ordering::Relaxed);
        let value = data as u8;
        if value != 0 && (data >> 8) as u32 == key as u32 {
            Some(unpack_score(value))
        } else {
            None
        }
    }

    fn clear(&mut self) {
        for entry in self.entries.iter() {
            entry.store(0, Ordering::Relaxed);
        }
    }
}
