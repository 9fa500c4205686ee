//! Error taxonomy.
//!
//! Only `InvalidGridSize` is expected to reach a player (a level size
//! supplied by the presentation layer). The other variants signal a broken
//! contract between components and should never surface in normal play.
//!
//! Rejected selections are not errors; see [`crate::turns::SelectOutcome`].

use thiserror::Error;

/// Errors raised by the game core.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConcentrationError {
    /// An odd number of cards can never be fully paired.
    #[error("cannot pair an odd number of cards: {count}")]
    InvalidSize { count: usize },

    /// Requested board dimensions are empty or exceed the board capacity.
    #[error("invalid grid size {rows}x{cols} (capacity {max_rows}x{max_cols})")]
    InvalidGridSize {
        rows: usize,
        cols: usize,
        max_rows: usize,
        max_cols: usize,
    },

    /// Identity sequence length disagrees with the active cell count.
    #[error("expected {expected} identities, got {actual}")]
    IdentityCountMismatch { expected: usize, actual: usize },

    /// Position lies outside the capacity grid.
    #[error("position ({row}, {col}) is outside the {max_rows}x{max_cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        max_rows: usize,
        max_cols: usize,
    },

    /// A decoded board does not satisfy the arena invariants.
    #[error("corrupt board: {reason}")]
    CorruptBoard { reason: &'static str },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConcentrationError>;
