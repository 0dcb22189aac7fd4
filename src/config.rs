//! Tunables of a [`Solver`](crate::solver::Solver)

use crate::transposition_table::DEFAULT_TABLE_SIZE;
use crate::CELLS;

/// The order in which candidate columns are searched
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum MoveOrdering {
    /// Center column first, then alternating outwards
    #[default]
    CenterFirst,
    /// Moves creating the most winning cells first, ties broken center first
    ThreatCount,
}

/// What happens to the transposition table between top-level solves
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum TablePolicy {
    /// Entries survive from one solve to the next
    #[default]
    Persistent,
    /// The table is cleared at the start of every solve
    ResetEachSolve,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    /// Requested number of table slots, rounded up to a usable size
    pub table_size: usize,
    pub table_policy: TablePolicy,
    pub ordering: MoveOrdering,
    /// Search depth in plies, `CELLS` always solves exactly
    pub depth: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            table_size: DEFAULT_TABLE_SIZE,
            table_policy: TablePolicy::default(),
            ordering: MoveOrdering::default(),
            depth: CELLS,
        }
    }
}
