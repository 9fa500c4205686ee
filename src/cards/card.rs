//! Per-cell card state.
//!
//! Cards live in the board's capacity arena for the whole session. A new
//! game resets their flags and deals fresh identities rather than
//! reallocating them.
//!
//! ## Invariants
//!
//! - A matched card is face up.
//! - A matched or inactive card is never selectable.

use serde::{Deserialize, Serialize};

use super::identity::Identity;

/// A single card slot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    identity: Option<Identity>,
    face_up: bool,
    matched: bool,
    active: bool,
}

impl Card {
    /// Create an inactive, face-down card with no identity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The card's identity, if one has been dealt.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.identity
    }

    #[must_use]
    pub fn is_face_up(&self) -> bool {
        self.face_up
    }

    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.matched
    }

    /// Whether the card participates in the current game.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether a player may turn this card over right now.
    ///
    /// Ignores the resolver phase; see [`crate::turns::TurnResolver`].
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        self.active && !self.matched && !self.face_up
    }

    /// Presentation view of this card.
    #[must_use]
    pub fn view(&self) -> CardView {
        CardView {
            active: self.active,
            face_up: self.face_up,
            matched: self.matched,
            identity: if self.face_up { self.identity } else { None },
        }
    }

    /// Clear all per-game state and set participation.
    pub(crate) fn reset(&mut self, active: bool) {
        self.identity = None;
        self.face_up = false;
        self.matched = false;
        self.active = active;
    }

    pub(crate) fn set_identity(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    pub(crate) fn reveal(&mut self) {
        self.face_up = true;
    }

    /// Turn face down again after a mismatch. Matched cards stay up.
    pub(crate) fn hide(&mut self) {
        if !self.matched {
            self.face_up = false;
        }
    }

    pub(crate) fn mark_matched(&mut self) {
        self.face_up = true;
        self.matched = true;
    }
}

/// What the presentation layer is allowed to see of a card.
///
/// `identity` is only populated while the card is face up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub active: bool,
    pub face_up: bool,
    pub matched: bool,
    pub identity: Option<Identity>,
}
