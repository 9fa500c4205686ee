//! Game session: the surface the presentation layer talks to.
//!
//! A `GameSession` owns the board, the turn resolver, the RNG and the
//! settle scheduler. All mutation goes through it on a single thread; the
//! settle timer is the only deferred step, and its tickets come back in
//! through [`GameSession::settle`].
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use concentration::{GameSession, ManualScheduler, SessionConfig};
//!
//! let config = SessionConfig::default().with_seed(42);
//! let mut session = GameSession::new(config, ManualScheduler::new()).unwrap();
//!
//! session.select_card(0, 0).unwrap();
//! session.select_card(0, 1).unwrap();
//!
//! // Nothing resolves until the settle delay has passed
//! session.advance(Duration::from_millis(799)).unwrap();
//! assert_eq!(session.current_turn_count(), 0);
//!
//! session.advance(Duration::from_millis(1)).unwrap();
//! assert_eq!(session.current_turn_count(), 1);
//! ```

use std::time::{Duration, Instant};

use tracing::{info, instrument};

use crate::board::Board;
use crate::cards::{generate_paired_identities, CardView};
use crate::core::{GameRng, GameRngState, GridPos, LevelPreset, SessionConfig};
use crate::error::Result;
use crate::events::GameEvent;
use crate::turns::{
    FrameScheduler, ManualScheduler, Scheduler, SelectOutcome, SettleTicket, TurnPhase,
    TurnResolver,
};

type Listener = Box<dyn FnMut(&GameEvent)>;

/// One player's game, from deal to win, across any number of levels.
pub struct GameSession<S: Scheduler = ManualScheduler> {
    config: SessionConfig,
    board: Board,
    resolver: TurnResolver,
    rng: GameRng,
    scheduler: S,
    /// Emitted since the last `drain_events`, while nobody is subscribed.
    events: Vec<GameEvent>,
    listeners: Vec<Listener>,
}

impl<S: Scheduler> GameSession<S> {
    /// Create a session and deal `config.opening_level`.
    ///
    /// # Errors
    ///
    /// [`crate::ConcentrationError::InvalidGridSize`] if the opening level
    /// does not fit the configured capacity.
    pub fn new(config: SessionConfig, scheduler: S) -> Result<Self> {
        let rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        let board = Board::new(config.max_rows, config.max_cols);
        let opening_level = config.opening_level;

        let mut session = Self {
            config,
            board,
            resolver: TurnResolver::new(),
            rng,
            scheduler,
            events: Vec::new(),
            listeners: Vec::new(),
        };
        session.change_level(opening_level)?;
        Ok(session)
    }

    /// Deal a new `rows x cols` game.
    ///
    /// Any pending resolution is cancelled before the board is touched, and
    /// counters restart from zero. On error nothing changes, including the
    /// pending resolution.
    ///
    /// # Errors
    ///
    /// - [`crate::ConcentrationError::InvalidGridSize`] if the size is empty
    ///   or exceeds capacity.
    /// - [`crate::ConcentrationError::InvalidSize`] if `rows * cols` is odd.
    #[instrument(skip(self))]
    pub fn new_game(&mut self, rows: usize, cols: usize) -> Result<()> {
        self.board.validate_dimensions(rows, cols)?;
        let identities = generate_paired_identities(rows * cols, &mut self.rng)?;

        self.resolver.reset(&mut self.scheduler);
        self.board.configure(rows, cols)?;
        self.board.assign_identities(&identities)?;

        info!(rows, cols, seed = self.rng.seed(), "new game dealt");
        self.emit(GameEvent::GameStarted { rows, cols });
        self.emit(GameEvent::TurnCountChanged(0));
        Ok(())
    }

    /// Deal a new game at a preset size.
    ///
    /// # Errors
    ///
    /// As [`GameSession::new_game`].
    pub fn change_level(&mut self, level: LevelPreset) -> Result<()> {
        let (rows, cols) = level.dimensions();
        self.new_game(rows, cols)
    }

    /// Deal a new game at the current size.
    ///
    /// # Errors
    ///
    /// As [`GameSession::new_game`].
    pub fn restart(&mut self) -> Result<()> {
        let (rows, cols) = self.board.dimensions();
        self.new_game(rows, cols)
    }

    /// Player picked the card at `(row, col)`.
    ///
    /// Inactive, matched, face-up cards and any pick during resolution are
    /// ignored and reported as [`SelectOutcome::Rejected`].
    ///
    /// # Errors
    ///
    /// [`crate::ConcentrationError::OutOfBounds`] if the position exceeds the
    /// board capacity.
    #[instrument(level = "debug", skip(self))]
    pub fn select_card(&mut self, row: usize, col: usize) -> Result<SelectOutcome> {
        let pos = GridPos::new(row, col);
        let delay = self.config.settle_delay();
        let outcome = self
            .resolver
            .select(&mut self.board, pos, &mut self.scheduler, delay)?;

        if outcome.is_accepted() {
            self.emit(GameEvent::CardChanged(pos));
        }
        Ok(outcome)
    }

    /// Deliver a fired settle timer.
    ///
    /// Returns `true` if a turn was resolved. Tickets that were cancelled or
    /// already delivered are ignored.
    ///
    /// # Errors
    ///
    /// Propagates board lookup failures, which indicate a broken invariant.
    pub fn settle(&mut self, ticket: SettleTicket) -> Result<bool> {
        let Some(resolution) = self.resolver.settle(&mut self.board, ticket)? else {
            return Ok(false);
        };

        self.emit(GameEvent::CardChanged(resolution.first));
        self.emit(GameEvent::CardChanged(resolution.second));
        self.emit(GameEvent::TurnCountChanged(resolution.turn_count));
        if resolution.matched {
            self.emit(GameEvent::PairMatched {
                first: resolution.first,
                second: resolution.second,
            });
        }
        if resolution.won {
            info!(turns = resolution.turn_count, "game won");
            self.emit(GameEvent::GameWon {
                turns: resolution.turn_count,
            });
        }
        Ok(true)
    }

    /// Completed turns in the current game.
    #[must_use]
    pub fn current_turn_count(&self) -> u32 {
        self.resolver.turn_count()
    }

    /// Pairs found in the current game.
    #[must_use]
    pub fn matched_pairs(&self) -> u32 {
        self.resolver.matched_pairs()
    }

    /// Pairs on the current board.
    #[must_use]
    pub fn total_pairs(&self) -> usize {
        self.board.active_count() / 2
    }

    /// Whether every pair has been found.
    #[must_use]
    pub fn is_won(&self) -> bool {
        let total = self.total_pairs();
        total > 0 && self.resolver.matched_pairs() as usize == total
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.resolver.phase()
    }

    /// Current board size as `(rows, cols)`.
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        self.board.dimensions()
    }

    /// Seed of the session RNG; replaying it reproduces every deal.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Checkpoint of the session RNG.
    ///
    /// Hand it back to [`GameSession::restore_rng`] to replay the deals that
    /// follow.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    /// Rewind the dealing RNG to a checkpoint taken with
    /// [`GameSession::rng_state`].
    ///
    /// The current board is untouched; the next deal is the one that
    /// followed the checkpoint.
    pub fn restore_rng(&mut self, state: &GameRngState) {
        self.rng = GameRng::from_state(state);
        info!(seed = state.seed, "dealing rng restored");
    }

    /// What the presentation layer may show at `(row, col)`.
    ///
    /// # Errors
    ///
    /// [`crate::ConcentrationError::OutOfBounds`] if the position exceeds the
    /// board capacity.
    pub fn card_state(&self, row: usize, col: usize) -> Result<CardView> {
        Ok(self.board.card_at(row, col)?.view())
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Take the events emitted since the last call.
    ///
    /// Events are only buffered while no listener is subscribed.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Register a callback invoked synchronously for every event.
    ///
    /// Once a listener is registered, events are no longer buffered for
    /// [`GameSession::drain_events`]; anything already buffered stays there.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&GameEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&mut self, event: GameEvent) {
        if self.listeners.is_empty() {
            self.events.push(event);
            return;
        }
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    fn settle_all(&mut self, tickets: Vec<SettleTicket>) -> Result<usize> {
        let mut resolved = 0;
        for ticket in tickets {
            if self.settle(ticket)? {
                resolved += 1;
            }
        }
        Ok(resolved)
    }
}

impl GameSession<ManualScheduler> {
    /// Advance the virtual clock and settle whatever came due.
    ///
    /// Returns the number of turns resolved.
    ///
    /// # Errors
    ///
    /// As [`GameSession::settle`].
    pub fn advance(&mut self, by: Duration) -> Result<usize> {
        let due = self.scheduler.advance(by);
        self.settle_all(due)
    }
}

impl GameSession<FrameScheduler> {
    /// Settle everything due at frame time `now`.
    ///
    /// Returns the number of turns resolved.
    ///
    /// # Errors
    ///
    /// As [`GameSession::settle`].
    pub fn poll(&mut self, now: Instant) -> Result<usize> {
        let due = self.scheduler.poll(now);
        self.settle_all(due)
    }
}

impl<S: Scheduler + std::fmt::Debug> std::fmt::Debug for GameSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("config", &self.config)
            .field("dimensions", &self.board.dimensions())
            .field("resolver", &self.resolver)
            .field("scheduler", &self.scheduler)
            .field("pending_events", &self.events.len())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConcentrationError;

    fn session() -> GameSession {
        GameSession::new(SessionConfig::default().with_seed(42), ManualScheduler::new()).unwrap()
    }

    #[test]
    fn test_new_session_deals_opening_level() {
        let session = session();
        assert_eq!(session.dimensions(), (2, 3));
        assert_eq!(session.total_pairs(), 3);
        assert_eq!(session.current_turn_count(), 0);
        assert!(!session.is_won());
        assert_eq!(session.phase(), TurnPhase::Idle);
        assert_eq!(session.seed(), 42);
    }

    #[test]
    fn test_opening_level_must_fit_capacity() {
        let config = SessionConfig::default()
            .with_seed(1)
            .with_capacity(4, 4)
            .with_opening_level(LevelPreset::Level6);
        let result = GameSession::new(config, ManualScheduler::new());
        assert!(matches!(result, Err(ConcentrationError::InvalidGridSize { .. })));
    }

    #[test]
    fn test_new_game_emits_start_events() {
        let mut session = session();
        session.drain_events();

        session.new_game(4, 4).unwrap();
        assert_eq!(
            session.drain_events(),
            vec![
                GameEvent::GameStarted { rows: 4, cols: 4 },
                GameEvent::TurnCountChanged(0)
            ]
        );
    }

    #[test]
    fn test_odd_area_rejected_without_mutation() {
        let mut session = session();
        session.select_card(0, 0).unwrap();

        let result = session.new_game(3, 3);
        assert_eq!(result, Err(ConcentrationError::InvalidSize { count: 9 }));
        assert_eq!(session.dimensions(), (2, 3));
        assert_eq!(session.phase(), TurnPhase::OneSelected);
    }

    #[test]
    fn test_restart_keeps_dimensions() {
        let mut session = session();
        session.change_level(LevelPreset::Level3).unwrap();
        session.restart().unwrap();
        assert_eq!(session.dimensions(), (4, 4));
    }

    #[test]
    fn test_card_state_hides_face_down() {
        let mut session = session();
        let view = session.card_state(0, 0).unwrap();
        assert!(view.active);
        assert_eq!(view.identity, None);

        session.select_card(0, 0).unwrap();
        assert!(session.card_state(0, 0).unwrap().identity.is_some());
        assert!(!session.card_state(7, 7).unwrap().active);
        assert!(session.card_state(8, 0).is_err());
    }

    #[test]
    fn test_listener_receives_events() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut session = session();
        let sink = Rc::clone(&seen);
        session.subscribe(move |event| sink.borrow_mut().push(*event));

        session.select_card(1, 2).unwrap();
        assert_eq!(*seen.borrow(), vec![GameEvent::CardChanged(GridPos::new(1, 2))]);
    }

    #[test]
    fn test_frame_session_polls() {
        let config = SessionConfig::default().with_seed(3);
        let mut session = GameSession::new(config, FrameScheduler::new()).unwrap();
        session.select_card(0, 0).unwrap();
        session.select_card(0, 1).unwrap();

        assert_eq!(session.poll(Instant::now()).unwrap(), 0);
        let later = Instant::now() + Duration::from_secs(1);
        assert_eq!(session.poll(later).unwrap(), 1);
        assert_eq!(session.current_turn_count(), 1);
    }

    #[test]
    fn test_restore_rng_replays_deal() {
        let mut session = session();
        let checkpoint = session.rng_state();
        session.change_level(LevelPreset::Level4).unwrap();
        let dealt = session.board().clone();

        session.change_level(LevelPreset::Level4).unwrap();
        assert_ne!(session.board(), &dealt);

        session.restore_rng(&checkpoint);
        session.change_level(LevelPreset::Level4).unwrap();
        assert_eq!(session.board(), &dealt);
        assert_eq!(session.seed(), 42);
    }

    #[test]
    fn test_debug_output() {
        let session = session();
        let debug = format!("{session:?}");
        assert!(debug.contains("GameSession"));
    }
}
