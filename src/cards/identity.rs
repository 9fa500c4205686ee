//! Card identities and the paired identity shuffler.
//!
//! An `Identity` is the face a card shows when turned up. In a dealt game
//! every identity sits on exactly two cards; equal identities are a match.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ConcentrationError, Result};

/// Opaque token shared by the two cards of a pair.
///
/// The core never interprets the value. The presentation layer maps it to an
/// image (identity `n` is the `n`th face in its asset list).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identity(pub u32);

impl Identity {
    /// Create a new identity.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Identity({})", self.0)
    }
}

/// Build `count / 2` distinct identities, emit each twice, and shuffle.
///
/// The permutation is uniform (Fisher-Yates) and is the only source of
/// randomness in the core. Identities are numbered from zero.
///
/// # Errors
///
/// [`ConcentrationError::InvalidSize`] if `count` is odd.
///
/// ```
/// use concentration::cards::generate_paired_identities;
/// use concentration::core::GameRng;
///
/// let mut rng = GameRng::new(1);
/// let deal = generate_paired_identities(6, &mut rng).unwrap();
/// assert_eq!(deal.len(), 6);
///
/// assert!(generate_paired_identities(5, &mut rng).is_err());
/// ```
pub fn generate_paired_identities<R: Rng + ?Sized>(
    count: usize,
    rng: &mut R,
) -> Result<Vec<Identity>> {
    if count % 2 != 0 {
        return Err(ConcentrationError::InvalidSize { count });
    }

    let pairs = u32::try_from(count / 2).map_err(|_| ConcentrationError::InvalidSize { count })?;
    let mut identities: Vec<Identity> = (0..pairs)
        .flat_map(|id| [Identity(id), Identity(id)])
        .collect();
    identities.shuffle(rng);

    Ok(identities)
}
