//! Turn resolution and the settle timer.
//!
//! - [`TurnResolver`]: the select-select-settle state machine
//! - [`Scheduler`]: the deferred-callback seam the resolver schedules on
//! - [`ManualScheduler`] / [`FrameScheduler`]: provided schedulers

mod resolver;
mod scheduler;

pub use resolver::{RejectReason, Resolution, SelectOutcome, TurnPhase, TurnResolver};
pub use scheduler::{FrameScheduler, ManualScheduler, Scheduler, SettleTicket, TimerHandle};
