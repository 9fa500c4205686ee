//! Card system: identities, the shuffler, and per-cell card state.
//!
//! ## Key Types
//!
//! - `Identity`: Opaque pair token; equal identities match
//! - `Card`: Mutable per-cell state (face up, matched, active)
//! - `CardView`: What the presentation layer may see of a card
//! - `generate_paired_identities`: Shuffled multiset of paired identities

pub mod card;
pub mod identity;

pub use card::{Card, CardView};
pub use identity::{generate_paired_identities, Identity};
