//! Trailing-edge debounce over the page timer queue.

use crate::timers::{TimerId, TimerQueue};
use core::time::Duration;

/// Defers work until calls stop for `wait`.
///
/// Every [`call`](Self::call) cancels the pending timer (if any) and arms a new
/// one `wait` later, remembering only the latest arguments. When the timer
/// fires the host calls [`fire`](Self::fire) to collect them. At most one
/// timer is pending per `Debounce` at any time.
#[derive(Debug)]
pub struct Debounce<A> {
    wait: Duration,
    pending: Option<TimerId>,
    latest: Option<A>,
}

impl<A> Debounce<A> {
    #[must_use]
    pub const fn new(wait: Duration) -> Self {
        Self {
            wait,
            pending: None,
            latest: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn wait(&self) -> Duration {
        self.wait
    }

    /// Whether a trailing invocation is armed.
    #[inline]
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Record a call with `args`, re-arming the trailing timer with `task`.
    pub fn call<T>(&mut self, queue: &mut TimerQueue<T>, args: A, task: T) -> TimerId {
        if let Some(previous) = self.pending.take() {
            queue.cancel(previous);
        }
        let id = queue.schedule(self.wait, task);
        self.pending = Some(id);
        self.latest = Some(args);
        id
    }

    /// Take the arguments of the last call once timer `id` has fired.
    ///
    /// Returns `None` for a stale timer id (one that was superseded by a later call).
    pub fn fire(&mut self, id: TimerId) -> Option<A> {
        if self.pending != Some(id) {
            return None;
        }
        self.pending = None;
        self.latest.take()
    }
}
