//! Settle-timer scheduling.
//!
//! The resolver never sleeps. When the second card of a turn is revealed it
//! asks a [`Scheduler`] to fire a [`SettleTicket`] after the settle delay,
//! and keeps the returned [`TimerHandle`] so the timer can be cancelled if
//! the game is reset first. When the timer fires, the host hands the ticket
//! back to [`crate::GameSession::settle`].
//!
//! Two schedulers are provided:
//!
//! - [`ManualScheduler`]: a virtual clock advanced explicitly. Deterministic,
//!   used by tests and headless hosts.
//! - [`FrameScheduler`]: wall-clock deadlines polled once per frame by a UI
//!   loop.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Identifies one scheduled resolution.
///
/// Generations never repeat within a resolver, so a ticket from a cancelled
/// turn cannot resolve a later one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SettleTicket {
    generation: u64,
}

impl SettleTicket {
    pub(crate) const fn new(generation: u64) -> Self {
        Self { generation }
    }

    /// The resolver generation this ticket belongs to.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

/// Cancel handle returned by [`Scheduler::schedule_after`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(pub u64);

/// A one-shot, cancellable deferred callback service.
pub trait Scheduler {
    /// Arrange for `ticket` to be delivered after `delay`.
    fn schedule_after(&mut self, delay: Duration, ticket: SettleTicket) -> TimerHandle;

    /// Cancel a scheduled ticket.
    ///
    /// Returns `false` if the handle already fired or was never issued.
    fn cancel(&mut self, handle: TimerHandle) -> bool;
}

impl<S: Scheduler + ?Sized> Scheduler for Box<S> {
    fn schedule_after(&mut self, delay: Duration, ticket: SettleTicket) -> TimerHandle {
        (**self).schedule_after(delay, ticket)
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        (**self).cancel(handle)
    }
}

#[derive(Clone, Debug)]
struct Scheduled<T> {
    due: T,
    handle: TimerHandle,
    ticket: SettleTicket,
}

/// Deadline queue shared by the provided schedulers.
#[derive(Clone, Debug)]
struct TimerQueue<T> {
    next_handle: u64,
    entries: Vec<Scheduled<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_handle: 0,
            entries: Vec::new(),
        }
    }
}

impl<T: Copy + Ord> TimerQueue<T> {
    fn push(&mut self, due: T, ticket: SettleTicket) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.push(Scheduled { due, handle, ticket });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.handle != handle);
        self.entries.len() != before
    }

    /// Remove and return everything due at or before `now`, earliest first.
    fn take_due(&mut self, now: T) -> Vec<SettleTicket> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(|entry| entry.due <= now);
        self.entries = pending;

        due.sort_by_key(|entry| (entry.due, entry.handle.0));
        due.into_iter().map(|entry| entry.ticket).collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Scheduler driven by a virtual clock.
///
/// Time only moves when [`ManualScheduler::advance`] is called.
///
/// ```
/// use std::time::Duration;
/// use concentration::turns::ManualScheduler;
///
/// let mut scheduler = ManualScheduler::new();
/// assert_eq!(scheduler.pending(), 0);
/// assert!(scheduler.advance(Duration::from_secs(1)).is_empty());
/// assert_eq!(scheduler.now(), Duration::from_secs(1));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    queue: TimerQueue<Duration>,
}

impl ManualScheduler {
    /// Create a scheduler at virtual time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of tickets waiting to fire.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Move the clock forward and return tickets that came due.
    pub fn advance(&mut self, by: Duration) -> Vec<SettleTicket> {
        self.now += by;
        self.queue.take_due(self.now)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_after(&mut self, delay: Duration, ticket: SettleTicket) -> TimerHandle {
        self.queue.push(self.now + delay, ticket)
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.queue.cancel(handle)
    }
}

/// Scheduler keyed on wall-clock deadlines.
///
/// A UI loop calls [`FrameScheduler::poll`] every frame with the frame
/// timestamp and settles whatever came due.
#[derive(Clone, Debug, Default)]
pub struct FrameScheduler {
    queue: TimerQueue<Instant>,
}

impl FrameScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tickets waiting to fire.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Return tickets whose deadline is at or before `now`.
    pub fn poll(&mut self, now: Instant) -> Vec<SettleTicket> {
        self.queue.take_due(now)
    }
}

impl Scheduler for FrameScheduler {
    fn schedule_after(&mut self, delay: Duration, ticket: SettleTicket) -> TimerHandle {
        self.queue.push(Instant::now() + delay, ticket)
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.queue.cancel(handle)
    }
}
