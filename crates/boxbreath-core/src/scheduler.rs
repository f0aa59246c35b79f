#![forbid(unsafe_code)]

//! One-shot timers on a host-driven virtual clock.
//!
//! [`TimerQueue`] never reads a wall clock. The host moves time forward
//! ([`TimerQueue::advance_to`]) and drains due timers one at a time with
//! [`TimerQueue::pop_due`], which also moves `now` to the timer's deadline.
//! Timers scheduled while handling a fired timer are therefore measured from
//! that timer's deadline, not from whenever the host happened to poll.
//!
//! # Invariants
//!
//! 1. At most one timer per kind is pending; scheduling a kind replaces
//!    (and invalidates) the previous timer of that kind.
//! 2. Every schedule call returns a fresh [`TimerHandle`]; a handle that was
//!    cancelled or replaced never comes out of `pop_due`.
//! 3. Due timers pop in deadline order, ties broken by scheduling order.
//! 4. `now` never moves backwards.

use std::time::Duration;

/// Identifies one scheduled timer. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Raw sequence number (monotonically increasing per queue).
    pub const fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry<K> {
    handle: TimerHandle,
    kind: K,
    deadline: Duration,
}

/// Pending one-shot timers, keyed by kind.
#[derive(Debug, Clone)]
pub struct TimerQueue<K> {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry<K>>,
}

impl<K: Copy + Eq> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq> TimerQueue<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Current virtual time.
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `kind` to fire `delay` from now, replacing any pending timer
    /// of the same kind.
    pub fn schedule(&mut self, kind: K, delay: Duration) -> TimerHandle {
        self.cancel(kind);
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            handle,
            kind,
            deadline: self.now.saturating_add(delay),
        });
        handle
    }

    /// Cancel the pending timer of `kind`. Returns whether one was pending.
    pub fn cancel(&mut self, kind: K) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.kind != kind);
        self.entries.len() != before
    }

    /// Cancel a specific timer. Returns whether it was still pending.
    pub fn cancel_handle(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    /// Cancel everything. Returns how many timers were pending.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    pub fn is_pending(&self, kind: K) -> bool {
        self.entries.iter().any(|e| e.kind == kind)
    }

    /// Whether `handle` is still waiting to fire.
    pub fn is_live(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    pub fn pending_count(&self) -> usize {
        self.entries.len()
    }

    /// Deadline of the pending timer of `kind`, if any.
    pub fn deadline_of(&self, kind: K) -> Option<Duration> {
        self.entries
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| e.deadline)
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    /// Remove and return the earliest timer due at or before `limit`,
    /// moving `now` up to its deadline.
    pub fn pop_due(&mut self, limit: Duration) -> Option<(TimerHandle, K)> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= limit)
            .min_by_key(|(_, e)| (e.deadline, e.handle))
            .map(|(idx, _)| idx)?;
        let entry = self.entries.remove(idx);
        self.now = self.now.max(entry.deadline);
        Some((entry.handle, entry.kind))
    }

    /// Move the clock forward to `t` without firing anything.
    pub fn advance_to(&mut self, t: Duration) {
        self.now = self.now.max(t);
    }
}
