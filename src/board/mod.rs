//! The card grid.
//!
//! `Board` is a fixed-capacity arena of [`Card`] slots addressed by
//! [`GridPos`]. A game uses the top-left `active_rows x active_cols` region;
//! the remaining slots stay allocated but inactive.
//!
//! ## Invariants
//!
//! - Exactly `active_rows * active_cols` cards are active.
//! - After [`Board::assign_identities`] with a paired sequence, every
//!   identity on an active card appears on exactly two active cards.
//! - Failed operations leave the board untouched.
//!
//! ```
//! use concentration::board::Board;
//! use concentration::cards::generate_paired_identities;
//! use concentration::core::GameRng;
//!
//! let mut board = Board::new(8, 8);
//! board.configure(2, 3).unwrap();
//!
//! let identities = generate_paired_identities(6, &mut GameRng::new(1)).unwrap();
//! board.assign_identities(&identities).unwrap();
//!
//! assert_eq!(board.active_count(), 6);
//! assert!(!board.is_fully_matched());
//! ```

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Identity};
use crate::core::GridPos;
use crate::error::{ConcentrationError, Result};

/// Capacity grid of cards with an active top-left region.
///
/// Deserialization checks the arena shape and the active flags, so a
/// decoded board upholds the same invariants as one built by
/// [`Board::configure`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    max_rows: usize,
    max_cols: usize,
    active_rows: usize,
    active_cols: usize,
    /// Row-major, `max_rows * max_cols` long.
    cards: Vec<Card>,
}

#[derive(Deserialize)]
struct RawBoard {
    max_rows: usize,
    max_cols: usize,
    active_rows: usize,
    active_cols: usize,
    cards: Vec<Card>,
}

impl TryFrom<RawBoard> for Board {
    type Error = ConcentrationError;

    fn try_from(raw: RawBoard) -> Result<Self> {
        let expected = raw.max_rows * raw.max_cols;
        if raw.cards.len() != expected {
            return Err(ConcentrationError::CorruptBoard {
                reason: "card count does not match capacity",
            });
        }

        let board = Self {
            max_rows: raw.max_rows,
            max_cols: raw.max_cols,
            active_rows: raw.active_rows,
            active_cols: raw.active_cols,
            cards: raw.cards,
        };
        if board.active_rows != 0 || board.active_cols != 0 {
            board.validate_dimensions(board.active_rows, board.active_cols)?;
        }

        for (index, card) in board.cards.iter().enumerate() {
            let pos = GridPos::from_index(index, board.max_cols);
            let in_region = pos.row < board.active_rows && pos.col < board.active_cols;
            if card.is_active() != in_region {
                return Err(ConcentrationError::CorruptBoard {
                    reason: "active flags disagree with the active region",
                });
            }
        }
        Ok(board)
    }
}

impl Board {
    /// Allocate a board with the given capacity. All cards start inactive.
    #[must_use]
    pub fn new(max_rows: usize, max_cols: usize) -> Self {
        Self {
            max_rows,
            max_cols,
            active_rows: 0,
            active_cols: 0,
            cards: vec![Card::new(); max_rows * max_cols],
        }
    }

    /// Capacity as `(max_rows, max_cols)`.
    #[must_use]
    pub fn capacity(&self) -> (usize, usize) {
        (self.max_rows, self.max_cols)
    }

    /// Active region as `(rows, cols)`.
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.active_rows, self.active_cols)
    }

    /// Number of active cards.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active_rows * self.active_cols
    }

    /// Check that `rows x cols` is a non-empty region within capacity.
    ///
    /// # Errors
    ///
    /// [`ConcentrationError::InvalidGridSize`] otherwise.
    pub fn validate_dimensions(&self, rows: usize, cols: usize) -> Result<()> {
        if rows == 0 || cols == 0 || rows > self.max_rows || cols > self.max_cols {
            return Err(ConcentrationError::InvalidGridSize {
                rows,
                cols,
                max_rows: self.max_rows,
                max_cols: self.max_cols,
            });
        }
        Ok(())
    }

    /// Activate the top-left `rows x cols` region and reset every card.
    ///
    /// All identities are cleared; deal new ones with
    /// [`Board::assign_identities`].
    ///
    /// # Errors
    ///
    /// [`ConcentrationError::InvalidGridSize`] if the region is empty or
    /// exceeds capacity. The board is left unchanged.
    pub fn configure(&mut self, rows: usize, cols: usize) -> Result<()> {
        self.validate_dimensions(rows, cols)?;

        self.active_rows = rows;
        self.active_cols = cols;
        let max_cols = self.max_cols;
        for (index, card) in self.cards.iter_mut().enumerate() {
            let pos = GridPos::from_index(index, max_cols);
            card.reset(pos.row < rows && pos.col < cols);
        }
        Ok(())
    }

    /// Deal identities onto the active cells in row-major order.
    ///
    /// # Errors
    ///
    /// [`ConcentrationError::IdentityCountMismatch`] if the sequence length
    /// differs from [`Board::active_count`]. The board is left unchanged.
    pub fn assign_identities(&mut self, identities: &[Identity]) -> Result<()> {
        let expected = self.active_count();
        if identities.len() != expected {
            return Err(ConcentrationError::IdentityCountMismatch {
                expected,
                actual: identities.len(),
            });
        }

        let positions: Vec<GridPos> = self.active_positions().collect();
        for (pos, identity) in positions.into_iter().zip(identities) {
            let index = pos.index(self.max_cols);
            self.cards[index].set_identity(*identity);
        }
        Ok(())
    }

    /// Get the card at `(row, col)`, active or not.
    ///
    /// # Errors
    ///
    /// [`ConcentrationError::OutOfBounds`] if the position exceeds capacity.
    pub fn card_at(&self, row: usize, col: usize) -> Result<&Card> {
        let index = self.index_of(GridPos::new(row, col))?;
        Ok(&self.cards[index])
    }

    /// Get the card at `pos`.
    ///
    /// # Errors
    ///
    /// [`ConcentrationError::OutOfBounds`] if the position exceeds capacity.
    pub fn card(&self, pos: GridPos) -> Result<&Card> {
        self.card_at(pos.row, pos.col)
    }

    pub(crate) fn card_mut(&mut self, pos: GridPos) -> Result<&mut Card> {
        let index = self.index_of(pos)?;
        Ok(&mut self.cards[index])
    }

    /// True iff every active card is matched.
    #[must_use]
    pub fn is_fully_matched(&self) -> bool {
        self.active_cards().all(|(_, card)| card.is_matched())
    }

    /// Active positions in row-major order.
    pub fn active_positions(&self) -> impl Iterator<Item = GridPos> + '_ {
        (0..self.active_rows)
            .flat_map(move |row| (0..self.active_cols).map(move |col| GridPos::new(row, col)))
    }

    /// Active cards with their positions, row-major.
    pub fn active_cards(&self) -> impl Iterator<Item = (GridPos, &Card)> + '_ {
        self.active_positions()
            .map(move |pos| (pos, &self.cards[pos.index(self.max_cols)]))
    }

    /// Active cards that are face up but not yet matched.
    #[must_use]
    pub fn face_up_unmatched(&self) -> Vec<GridPos> {
        self.active_cards()
            .filter(|(_, card)| card.is_face_up() && !card.is_matched())
            .map(|(pos, _)| pos)
            .collect()
    }

    fn index_of(&self, pos: GridPos) -> Result<usize> {
        if pos.row >= self.max_rows || pos.col >= self.max_cols {
            return Err(ConcentrationError::OutOfBounds {
                row: pos.row,
                col: pos.col,
                max_rows: self.max_rows,
                max_cols: self.max_cols,
            });
        }
        Ok(pos.index(self.max_cols))
    }
}
