//! Events emitted to the presentation layer.
//!
//! The core never draws or plays sounds. It reports what changed and lets
//! the host react: redraw a cell, update the turn label, play the match cue,
//! show the victory dialog.
//!
//! ## Ordering
//!
//! Within one resolution events are emitted in this order: `CardChanged`
//! for both cards, `TurnCountChanged`, then `PairMatched` (on a match) and
//! `GameWon` (on the final pair). Hosts should not rely on anything
//! stronger than "after the card flags were updated".

use serde::{Deserialize, Serialize};

use crate::core::GridPos;

/// Something the presentation layer may want to react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEvent {
    /// A fresh board was dealt. Every cell should be redrawn.
    GameStarted { rows: usize, cols: usize },

    /// The card at this position changed face or matched state.
    CardChanged(GridPos),

    /// The turn counter has a new value (including the reset to zero).
    TurnCountChanged(u32),

    /// Two cards were matched.
    PairMatched { first: GridPos, second: GridPos },

    /// All pairs were found. Fires once per game.
    GameWon { turns: u32 },
}

impl GameEvent {
    /// Whether this event ends the game.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameEvent::GameWon { .. })
    }
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameEvent::GameStarted { rows, cols } => write!(f, "game started ({rows}x{cols})"),
            GameEvent::CardChanged(pos) => write!(f, "card changed at {pos}"),
            GameEvent::TurnCountChanged(count) => write!(f, "turns: {count}"),
            GameEvent::PairMatched { first, second } => {
                write!(f, "pair matched at {first} and {second}")
            }
            GameEvent::GameWon { turns } => {
                write!(f, "you've matched all the cards in {turns} turns")
            }
        }
    }
}
