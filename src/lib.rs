//! # concentration
//!
//! Game state machine for a tile-matching ("concentration") card game.
//!
//! A rectangular grid of face-down cards holds pairs of identical faces.
//! Each turn the player reveals two cards. After a short settle delay a
//! matching pair is retired and a mismatch is turned back down. The game is
//! won when every pair is found.
//!
//! ## Design Principles
//!
//! 1. **Headless**: No rendering, sound or input handling. The core reports
//!    changes as [`GameEvent`]s and exposes read-only [`CardView`]s.
//!
//! 2. **Deterministic**: The shuffle is the only randomness and is driven by
//!    a seeded [`GameRng`]. The settle delay goes through an injectable
//!    [`Scheduler`], so tests run on a virtual clock.
//!
//! 3. **Arena board**: Cards are allocated once at board capacity and
//!    re-dealt in place; a level only changes which region is active.
//!
//! ## Modules
//!
//! - `core`: Grid positions, RNG, configuration and level presets
//! - `cards`: Identities, the paired shuffler, per-cell card state
//! - `board`: Capacity grid with an active region
//! - `turns`: Turn resolver state machine and settle-timer scheduling
//! - `events`: Events emitted to the presentation layer
//! - `session`: `GameSession`, the orchestration surface

pub mod board;
pub mod cards;
pub mod core;
pub mod error;
pub mod events;
pub mod session;
pub mod turns;

// Re-export commonly used types
pub use crate::core::{GameRng, GameRngState, GridPos, LevelPreset, SessionConfig};

pub use crate::cards::{generate_paired_identities, Card, CardView, Identity};

pub use crate::board::Board;

pub use crate::turns::{
    FrameScheduler, ManualScheduler, RejectReason, Resolution, Scheduler, SelectOutcome,
    SettleTicket, TimerHandle, TurnPhase, TurnResolver,
};

pub use crate::error::{ConcentrationError, Result};
pub use crate::events::GameEvent;
pub use crate::session::GameSession;
