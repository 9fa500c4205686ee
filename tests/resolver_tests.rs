//! Turn resolver integration tests.
//!
//! These plug a host-defined scheduler into the resolver and check the
//! scheduling contract: one timer per completed pair, scheduled with the
//! configured delay, cancelled on reset.

use std::time::Duration;

use concentration::{
    Board, GameSession, GridPos, Identity, Scheduler, SelectOutcome, SessionConfig, SettleTicket,
    TimerHandle, TurnPhase, TurnResolver,
};

/// Records every scheduling call and fires only when told to.
#[derive(Debug, Default)]
struct RecordingScheduler {
    scheduled: Vec<(Duration, SettleTicket, TimerHandle)>,
    cancelled: Vec<TimerHandle>,
    next: u64,
}

impl Scheduler for RecordingScheduler {
    fn schedule_after(&mut self, delay: Duration, ticket: SettleTicket) -> TimerHandle {
        let handle = TimerHandle(self.next);
        self.next += 1;
        self.scheduled.push((delay, ticket, handle));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.cancelled.push(handle);
        true
    }
}

/// 2x3 board: A A B / B C C
fn board() -> Board {
    let mut board = Board::new(8, 8);
    board.configure(2, 3).unwrap();
    board
        .assign_identities(&[
            Identity(0),
            Identity(0),
            Identity(1),
            Identity(1),
            Identity(2),
            Identity(2),
        ])
        .unwrap();
    board
}

fn pos(row: usize, col: usize) -> GridPos {
    GridPos::new(row, col)
}

// =============================================================================
// Scheduling contract
// =============================================================================

/// Only the second reveal schedules, with the configured delay.
#[test]
fn test_second_selection_schedules_once() {
    let mut board = board();
    let mut scheduler = RecordingScheduler::default();
    let mut resolver = TurnResolver::new();
    let delay = Duration::from_millis(250);

    resolver.select(&mut board, pos(0, 0), &mut scheduler, delay).unwrap();
    assert!(scheduler.scheduled.is_empty());

    let outcome = resolver.select(&mut board, pos(0, 1), &mut scheduler, delay).unwrap();
    assert_eq!(scheduler.scheduled.len(), 1);

    let (scheduled_delay, ticket, _) = scheduler.scheduled[0];
    assert_eq!(scheduled_delay, delay);
    assert_eq!(outcome, SelectOutcome::Second { pos: pos(0, 1), ticket });

    // Rejected selections never schedule
    resolver.select(&mut board, pos(1, 0), &mut scheduler, delay).unwrap();
    assert_eq!(scheduler.scheduled.len(), 1);
}

/// Very long settle delays are handed to the scheduler unchanged.
#[test]
fn test_long_delay_passed_through() {
    let mut board = board();
    let mut scheduler = RecordingScheduler::default();
    let mut resolver = TurnResolver::new();
    let delay = Duration::MAX;

    resolver.select(&mut board, pos(0, 0), &mut scheduler, delay).unwrap();
    resolver.select(&mut board, pos(1, 1), &mut scheduler, delay).unwrap();

    assert_eq!(scheduler.scheduled[0].0, Duration::MAX);
    assert_eq!(resolver.phase(), TurnPhase::Resolving);
}

/// Reset cancels through the scheduler using the issued handle.
#[test]
fn test_reset_cancels_issued_handle() {
    let mut board = board();
    let mut scheduler = RecordingScheduler::default();
    let mut resolver = TurnResolver::new();
    let delay = Duration::from_millis(800);

    resolver.select(&mut board, pos(0, 0), &mut scheduler, delay).unwrap();
    resolver.select(&mut board, pos(1, 2), &mut scheduler, delay).unwrap();
    let (_, ticket, handle) = scheduler.scheduled[0];

    resolver.reset(&mut scheduler);
    assert_eq!(scheduler.cancelled, vec![handle]);

    // Even if the host fires it anyway, nothing happens
    assert!(resolver.settle(&mut board, ticket).unwrap().is_none());
    assert!(board.card(pos(0, 0)).unwrap().is_face_up());
}

/// Reset with nothing pending does not touch the scheduler.
#[test]
fn test_idle_reset_does_not_cancel() {
    let mut scheduler = RecordingScheduler::default();
    let mut resolver = TurnResolver::new();

    resolver.reset(&mut scheduler);
    assert!(scheduler.cancelled.is_empty());
}

/// Tickets are unique across turns.
#[test]
fn test_tickets_unique_across_turns() {
    let mut board = board();
    let mut scheduler = RecordingScheduler::default();
    let mut resolver = TurnResolver::new();
    let delay = Duration::from_millis(800);

    for (a, b) in [(pos(0, 0), pos(1, 0)), (pos(0, 0), pos(0, 1)), (pos(0, 2), pos(1, 0))] {
        resolver.select(&mut board, a, &mut scheduler, delay).unwrap();
        resolver.select(&mut board, b, &mut scheduler, delay).unwrap();
        let ticket = resolver.pending_ticket().unwrap();
        resolver.settle(&mut board, ticket).unwrap().unwrap();
    }

    let tickets: Vec<_> = scheduler.scheduled.iter().map(|(_, t, _)| *t).collect();
    assert_eq!(tickets.len(), 3);
    assert!(tickets.windows(2).all(|w| w[0] != w[1]));
    assert_eq!(resolver.turn_count(), 3);
    assert_eq!(resolver.matched_pairs(), 2);
}

// =============================================================================
// Session with a host scheduler
// =============================================================================

/// A session can run on any scheduler; the host delivers tickets itself.
#[test]
fn test_session_with_host_scheduler() {
    let config = SessionConfig::default()
        .with_seed(21)
        .with_settle_delay(Duration::from_millis(300));
    let mut session = GameSession::new(config, RecordingScheduler::default()).unwrap();

    let (a, b) = {
        let cards: Vec<_> = session.board().active_cards().collect();
        let (a, first) = cards[0];
        let (b, _) = cards
            .iter()
            .skip(1)
            .find(|(_, card)| card.identity() == first.identity())
            .copied()
            .unwrap();
        (a, b)
    };

    session.select_card(a.row, a.col).unwrap();
    session.select_card(b.row, b.col).unwrap();
    assert_eq!(session.phase(), TurnPhase::Resolving);

    let (delay, ticket, _) = session.scheduler().scheduled[0];
    assert_eq!(delay, Duration::from_millis(300));

    assert!(session.settle(ticket).unwrap());
    assert!(!session.settle(ticket).unwrap());
    assert_eq!(session.matched_pairs(), 1);
    assert_eq!(session.current_turn_count(), 1);
}
