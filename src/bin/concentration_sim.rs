//! Headless concentration player.
//!
//! Deals a board and plays it to the end with a perfect-memory player on a
//! virtual clock, logging every event.
//!
//! ```text
//! RUST_LOG=debug concentration_sim --level 3 --seed 7
//! ```

use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use concentration::{
    GameRng, GameSession, GridPos, Identity, LevelPreset, ManualScheduler, SessionConfig,
};

#[derive(Parser, Debug)]
#[command(about = "Play a game of concentration with a perfect-memory player")]
struct Args {
    /// Level preset, 1 through 6.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=6))]
    level: u8,

    /// Custom row count (requires --cols); overrides --level.
    #[arg(long, requires = "cols")]
    rows: Option<usize>,

    /// Custom column count (requires --rows).
    #[arg(long, requires = "rows")]
    cols: Option<usize>,

    /// Deal seed. Random if omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Settle delay in milliseconds.
    #[arg(long, default_value_t = concentration::core::DEFAULT_SETTLE_DELAY_MS)]
    settle_ms: u64,
}

/// Remembers every face it has seen.
struct MemoryPlayer {
    rng: GameRng,
    seen: HashMap<GridPos, Identity>,
}

impl MemoryPlayer {
    fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
            seen: HashMap::new(),
        }
    }

    /// A remembered pair that is still face down, if any.
    fn known_pair(&self, session: &GameSession) -> Option<(GridPos, GridPos)> {
        let mut by_identity: HashMap<Identity, GridPos> = HashMap::new();
        for (pos, identity) in &self.seen {
            if session.board().card(*pos).map_or(true, |card| card.is_matched()) {
                continue;
            }
            if let Some(other) = by_identity.insert(*identity, *pos) {
                return Some((other, *pos));
            }
        }
        None
    }

    /// Where the partner of `identity` was seen, other than `pos`.
    fn partner_of(&self, identity: Identity, pos: GridPos) -> Option<GridPos> {
        self.seen
            .iter()
            .find(|(other, id)| **id == identity && **other != pos)
            .map(|(other, _)| *other)
    }

    fn random_unseen(
        &mut self,
        session: &GameSession,
        exclude: Option<GridPos>,
    ) -> Option<GridPos> {
        let unseen: Vec<GridPos> = session
            .board()
            .active_cards()
            .filter(|(pos, card)| {
                card.is_selectable() && !self.seen.contains_key(pos) && Some(*pos) != exclude
            })
            .map(|(pos, _)| pos)
            .collect();
        if unseen.is_empty() {
            return None;
        }
        Some(unseen[self.rng.gen_range_usize(0..unseen.len())])
    }

    fn reveal(&mut self, session: &mut GameSession, pos: GridPos) -> Result<Identity> {
        let outcome = session.select_card(pos.row, pos.col)?;
        if !outcome.is_accepted() {
            bail!("selection at {pos} rejected: {outcome:?}");
        }
        let identity = session
            .card_state(pos.row, pos.col)?
            .identity
            .context("revealed card has no identity")?;
        self.seen.insert(pos, identity);
        Ok(identity)
    }

    fn take_turn(&mut self, session: &mut GameSession) -> Result<()> {
        if let Some((a, b)) = self.known_pair(session) {
            self.reveal(session, a)?;
            self.reveal(session, b)?;
            return Ok(());
        }

        let first = self
            .random_unseen(session, None)
            .context("no face-down card left to try")?;
        let identity = self.reveal(session, first)?;

        let second = match self.partner_of(identity, first) {
            Some(partner) => partner,
            None => self
                .random_unseen(session, Some(first))
                .context("no second card to try")?,
        };
        self.reveal(session, second)?;
        Ok(())
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let args = Args::parse();

    let level = LevelPreset::ALL[usize::from(args.level) - 1];
    let (rows, cols) = match (args.rows, args.cols) {
        (Some(rows), Some(cols)) => (rows, cols),
        _ => level.dimensions(),
    };

    let mut config = SessionConfig::default()
        .with_settle_delay(std::time::Duration::from_millis(args.settle_ms))
        .with_opening_level(level);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    let settle_delay = config.settle_delay();

    let mut session = GameSession::new(config, ManualScheduler::new())?;
    session.new_game(rows, cols)?;
    session.drain_events();

    let mut player = MemoryPlayer::new(session.seed());
    while !session.is_won() {
        player.take_turn(&mut session)?;
        session.advance(settle_delay)?;
        for event in session.drain_events() {
            debug!(%event, "event");
        }
    }

    info!(
        rows,
        cols,
        seed = session.seed(),
        turns = session.current_turn_count(),
        elapsed = ?session.scheduler().now(),
        "finished"
    );
    println!(
        "Matched all {} pairs in {} turns (seed {})",
        session.total_pairs(),
        session.current_turn_count(),
        session.seed()
    );
    Ok(())
}
