//! Deterministic timer queue standing in for `setTimeout`.
//!
//! Time is a [`Duration`] measured from page start. The queue never reads a
//! wall clock: hosts feed it "now" and it hands back every task whose deadline
//! has passed, in deadline order. Tasks due at the same instant fire in the
//! order they were scheduled.

use core::time::Duration;
use std::collections::{BTreeMap, HashMap};

/// Handle returned by [`TimerQueue::schedule`], used for cancellation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Ordering key: deadline first, then scheduling sequence.
type Slot = (Duration, u64);

/// A virtual-time queue of pending tasks.
#[derive(Debug)]
pub struct TimerQueue<T> {
    now: Duration,
    next_seq: u64,
    pending: BTreeMap<Slot, (TimerId, T)>,
    slots: HashMap<TimerId, Slot>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            pending: BTreeMap::new(),
            slots: HashMap::new(),
        }
    }

    /// Current virtual time: the deadline of the last task handed out, or the
    /// last time passed to [`Self::advance_clock`].
    #[inline]
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Number of tasks still pending.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Schedule `task` to run `delay` after the current virtual time.
    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerId {
        let id = TimerId(self.next_seq);
        let slot = (self.now.saturating_add(delay), self.next_seq);
        self.next_seq = self.next_seq.wrapping_add(1);
        self.pending.insert(slot, (id, task));
        self.slots.insert(id, slot);
        id
    }

    /// Cancel a pending task. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.slots
            .remove(&id)
            .and_then(|slot| self.pending.remove(&slot))
            .is_some()
    }

    /// Whether `id` is still waiting to fire.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Deadline of the earliest pending task.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Remove and return the earliest task due at or before `now`, moving the
    /// virtual clock to that task's deadline.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerId, T)> {
        let slot = *self.pending.keys().next()?;
        if slot.0 > now {
            return None;
        }
        let (id, task) = self.pending.remove(&slot)?;
        self.slots.remove(&id);
        self.now = self.now.max(slot.0);
        Some((id, task))
    }

    /// Move the virtual clock forward without running anything. Never moves backwards.
    pub fn advance_clock(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}
