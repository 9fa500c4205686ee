//! Core types: grid positions, RNG, configuration.
//!
//! These are the building blocks shared by the board, the turn resolver and
//! the session.

pub mod config;
pub mod position;
pub mod rng;

pub use config::{LevelPreset, SessionConfig, DEFAULT_MAX_DIM, DEFAULT_SETTLE_DELAY_MS};
pub use position::GridPos;
pub use rng::{GameRng, GameRngState};
