//! The two-selection turn state machine.
//!
//! ```text
//!   Idle --select--> OneSelected --select--> Resolving --settle--> Idle
//! ```
//!
//! Selecting a card reveals it. The second reveal schedules a settle timer;
//! until it fires every selection is rejected, so at most two unmatched
//! cards are ever face up. On settle the pair is compared: a match retires
//! both cards, a mismatch turns them back down. Either way the turn counter
//! advances.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::scheduler::{Scheduler, SettleTicket, TimerHandle};
use crate::board::Board;
use crate::core::GridPos;
use crate::error::Result;

/// Where the resolver is in the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// No card selected this turn.
    Idle,
    /// One card revealed, waiting for the second.
    OneSelected,
    /// Two cards revealed, settle timer running.
    Resolving,
}

/// Why a selection was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectReason {
    /// Position is outside the current level's board.
    Inactive,
    /// Card is already part of a found pair.
    Matched,
    /// Card is already showing its face.
    FaceUp,
    /// A pair is being resolved.
    Resolving,
}

/// Result of a selection attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectOutcome {
    /// Revealed as the first card of the turn.
    First(GridPos),
    /// Revealed as the second card; the settle timer was scheduled.
    Second { pos: GridPos, ticket: SettleTicket },
    /// Ignored; no state changed.
    Rejected(RejectReason),
}

impl SelectOutcome {
    /// Whether the selection revealed a card.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        !matches!(self, SelectOutcome::Rejected(_))
    }
}

/// Outcome of a completed turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub first: GridPos,
    pub second: GridPos,
    /// Whether the two cards shared an identity.
    pub matched: bool,
    /// Turn count after this turn.
    pub turn_count: u32,
    /// Pairs found after this turn.
    pub matched_pairs: u32,
    /// Whether this turn found the last pair.
    pub won: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingSettle {
    ticket: SettleTicket,
    handle: TimerHandle,
}

/// Turn state for one game.
#[derive(Clone, Debug, Default)]
pub struct TurnResolver {
    first: Option<GridPos>,
    second: Option<GridPos>,
    pending: Option<PendingSettle>,
    turn_count: u32,
    matched_pairs: u32,
    /// Last ticket generation issued. Survives `reset`.
    generation: u64,
}

impl TurnResolver {
    /// Create a resolver in `Idle` with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        if self.pending.is_some() {
            TurnPhase::Resolving
        } else if self.first.is_some() {
            TurnPhase::OneSelected
        } else {
            TurnPhase::Idle
        }
    }

    /// Completed turns this game.
    #[must_use]
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Pairs found this game.
    #[must_use]
    pub fn matched_pairs(&self) -> u32 {
        self.matched_pairs
    }

    #[must_use]
    pub fn first_selection(&self) -> Option<GridPos> {
        self.first
    }

    #[must_use]
    pub fn second_selection(&self) -> Option<GridPos> {
        self.second
    }

    /// Whether a settle timer is outstanding.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Ticket of the outstanding settle timer, if any.
    #[must_use]
    pub fn pending_ticket(&self) -> Option<SettleTicket> {
        self.pending.map(|pending| pending.ticket)
    }

    /// Try to reveal the card at `pos`.
    ///
    /// Rejections are not errors: they leave every piece of state as it was.
    ///
    /// # Errors
    ///
    /// [`crate::ConcentrationError::OutOfBounds`] if `pos` exceeds the board
    /// capacity.
    pub fn select<S: Scheduler + ?Sized>(
        &mut self,
        board: &mut Board,
        pos: GridPos,
        scheduler: &mut S,
        settle_delay: Duration,
    ) -> Result<SelectOutcome> {
        let card = board.card_mut(pos)?;

        let rejection = if self.pending.is_some() {
            Some(RejectReason::Resolving)
        } else if !card.is_active() {
            Some(RejectReason::Inactive)
        } else if card.is_matched() {
            Some(RejectReason::Matched)
        } else if card.is_face_up() {
            Some(RejectReason::FaceUp)
        } else {
            None
        };
        if let Some(reason) = rejection {
            trace!(%pos, ?reason, "selection rejected");
            return Ok(SelectOutcome::Rejected(reason));
        }

        card.reveal();

        if self.first.is_none() {
            self.first = Some(pos);
            debug!(%pos, "first card revealed");
            return Ok(SelectOutcome::First(pos));
        }

        self.second = Some(pos);
        self.generation += 1;
        let ticket = SettleTicket::new(self.generation);
        let handle = scheduler.schedule_after(settle_delay, ticket);
        self.pending = Some(PendingSettle { ticket, handle });
        debug!(
            %pos,
            generation = self.generation,
            delay = ?settle_delay,
            "second card revealed, settle scheduled"
        );

        Ok(SelectOutcome::Second { pos, ticket })
    }

    /// Resolve the pending pair when its settle timer fires.
    ///
    /// Returns `Ok(None)` for a ticket that is not the pending one (already
    /// resolved, or cancelled by a reset); such tickets change nothing.
    ///
    /// # Errors
    ///
    /// [`crate::ConcentrationError::OutOfBounds`] if the board shrank under
    /// the resolver without a [`TurnResolver::reset`].
    pub fn settle(
        &mut self,
        board: &mut Board,
        ticket: SettleTicket,
    ) -> Result<Option<Resolution>> {
        match self.pending {
            Some(pending) if pending.ticket == ticket => {}
            _ => {
                trace!(generation = ticket.generation(), "stale settle ticket ignored");
                return Ok(None);
            }
        }

        let (Some(first), Some(second)) = (self.first, self.second) else {
            warn!(generation = ticket.generation(), "settle pending without two selections");
            self.clear_turn();
            return Ok(None);
        };

        let first_identity = board.card(first)?.identity();
        let second_identity = board.card(second)?.identity();
        let matched = first_identity.is_some() && first_identity == second_identity;

        self.turn_count += 1;
        if matched {
            board.card_mut(first)?.mark_matched();
            board.card_mut(second)?.mark_matched();
            self.matched_pairs += 1;
        } else {
            board.card_mut(first)?.hide();
            board.card_mut(second)?.hide();
        }
        self.clear_turn();

        let total_pairs = board.active_count() / 2;
        let won = matched && self.matched_pairs as usize == total_pairs;
        debug!(
            %first,
            %second,
            matched,
            turn_count = self.turn_count,
            matched_pairs = self.matched_pairs,
            "turn resolved"
        );

        Ok(Some(Resolution {
            first,
            second,
            matched,
            turn_count: self.turn_count,
            matched_pairs: self.matched_pairs,
            won,
        }))
    }

    /// Cancel any pending settle and return to `Idle` with zeroed counters.
    ///
    /// Cards are not touched; the caller re-deals the board.
    pub fn reset<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let Some(pending) = self.pending.take() {
            let cancelled = scheduler.cancel(pending.handle);
            debug!(generation = pending.ticket.generation(), cancelled, "pending settle cancelled");
        }
        self.first = None;
        self.second = None;
        self.turn_count = 0;
        self.matched_pairs = 0;
    }

    fn clear_turn(&mut self) {
        self.first = None;
        self.second = None;
        self.pending = None;
    }
}
