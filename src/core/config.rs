//! Session configuration and level presets.
//!
//! The presentation layer owns the choice of level; the presets here are
//! plain data it can hand to [`crate::GameSession::new_game`]. The core only
//! enforces the grid-size validity rule, not membership in this list.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default board capacity (rows and columns).
pub const DEFAULT_MAX_DIM: usize = 8;

/// Default pause between revealing the second card and resolving the turn.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 800;

/// The six fixed board sizes offered to players.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelPreset {
    #[default]
    Level1,
    Level2,
    Level3,
    Level4,
    Level5,
    Level6,
}

impl LevelPreset {
    /// All presets, easiest first.
    pub const ALL: [LevelPreset; 6] = [
        LevelPreset::Level1,
        LevelPreset::Level2,
        LevelPreset::Level3,
        LevelPreset::Level4,
        LevelPreset::Level5,
        LevelPreset::Level6,
    ];

    /// Board size as `(rows, cols)`.
    #[must_use]
    pub const fn dimensions(self) -> (usize, usize) {
        match self {
            LevelPreset::Level1 => (2, 3),
            LevelPreset::Level2 => (2, 4),
            LevelPreset::Level3 => (4, 4),
            LevelPreset::Level4 => (4, 6),
            LevelPreset::Level5 => (6, 6),
            LevelPreset::Level6 => (8, 8),
        }
    }

    /// Number of pairs on the board.
    #[must_use]
    pub const fn pair_count(self) -> usize {
        let (rows, cols) = self.dimensions();
        rows * cols / 2
    }

    /// Display name, e.g. "Level 3".
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            LevelPreset::Level1 => "Level 1",
            LevelPreset::Level2 => "Level 2",
            LevelPreset::Level3 => "Level 3",
            LevelPreset::Level4 => "Level 4",
            LevelPreset::Level5 => "Level 5",
            LevelPreset::Level6 => "Level 6",
        }
    }

    /// Look up a preset by its display name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.name() == name)
    }
}

impl std::fmt::Display for LevelPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for a [`crate::GameSession`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Board capacity in rows.
    pub max_rows: usize,

    /// Board capacity in columns.
    pub max_cols: usize,

    /// Settle delay in milliseconds.
    pub settle_delay_ms: u64,

    /// RNG seed. `None` draws one from OS entropy.
    pub seed: Option<u64>,

    /// Level dealt when the session is created.
    pub opening_level: LevelPreset,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_DIM,
            max_cols: DEFAULT_MAX_DIM,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            seed: None,
            opening_level: LevelPreset::Level1,
        }
    }
}

impl SessionConfig {
    /// Settle delay as a `Duration`.
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Use a fixed seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the board capacity.
    #[must_use]
    pub fn with_capacity(mut self, max_rows: usize, max_cols: usize) -> Self {
        self.max_rows = max_rows;
        self.max_cols = max_cols;
        self
    }

    /// Set the settle delay.
    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the level dealt on creation.
    #[must_use]
    pub fn with_opening_level(mut self, level: LevelPreset) -> Self {
        self.opening_level = level;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.max_rows, 8);
        assert_eq!(config.max_cols, 8);
        assert_eq!(config.settle_delay(), Duration::from_millis(800));
        assert_eq!(config.seed, None);
        assert_eq!(config.opening_level, LevelPreset::Level1);
    }

    #[test]
    fn test_builder_pattern() {
        let config = SessionConfig::default()
            .with_seed(123)
            .with_capacity(4, 6)
            .with_settle_delay(Duration::from_millis(250))
            .with_opening_level(LevelPreset::Level4);

        assert_eq!(config.seed, Some(123));
        assert_eq!((config.max_rows, config.max_cols), (4, 6));
        assert_eq!(config.settle_delay_ms, 250);
        assert_eq!(config.opening_level, LevelPreset::Level4);
    }

    #[test]
    fn test_presets_fit_default_capacity_and_pair_up() {
        for level in LevelPreset::ALL {
            let (rows, cols) = level.dimensions();
            assert!(rows <= DEFAULT_MAX_DIM && cols <= DEFAULT_MAX_DIM);
            assert_eq!((rows * cols) % 2, 0, "{level} has an odd cell count");
        }
        assert_eq!(LevelPreset::Level1.pair_count(), 3);
        assert_eq!(LevelPreset::Level6.pair_count(), 32);
    }

    #[test]
    fn test_preset_names_round_trip() {
        for level in LevelPreset::ALL {
            assert_eq!(LevelPreset::from_name(level.name()), Some(level));
        }
        assert_eq!(LevelPreset::from_name("Level 7"), None);
    }

    #[test]
    fn test_serialization() {
        let config = SessionConfig::default().with_seed(5);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SessionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{"settle_delay_ms": 100}"#).unwrap();
        assert_eq!(config.settle_delay_ms, 100);
        assert_eq!(config.max_rows, DEFAULT_MAX_DIM);
        assert_eq!(config.opening_level, LevelPreset::Level1);
    }
}
