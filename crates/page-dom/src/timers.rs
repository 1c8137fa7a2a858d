//! Virtual clock and timer queues
//!
//! Every delayed continuation in the site is a value pushed into a
//! [`Timers`] queue. Queues sharing one [`Clock`] are pumped together by the
//! host, which makes the event loop deterministic under test.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// Clock
// =============================================================================

/// Shared monotonic clock in milliseconds
#[derive(Debug, Clone, Default)]
pub struct Clock {
    millis: Arc<AtomicU64>,
}

impl Clock {
    /// Clock starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time since the clock started
    pub fn now(&self) -> Duration {
        Duration::from_millis(self.millis.load(AtomicOrdering::SeqCst))
    }

    /// Move the clock forward; moving backwards is ignored
    pub fn advance_to(&self, at: Duration) {
        let target = at.as_millis() as u64;
        self.millis.fetch_max(target, AtomicOrdering::SeqCst);
    }
}

// =============================================================================
// Timers
// =============================================================================

/// Handle of a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

struct Entry<T> {
    at: Duration,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed so the max-heap pops the earliest deadline, ties in scheduling order
    fn cmp(&self, other: &Self) -> Ordering {
        other.at.cmp(&self.at).then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Queue of delayed tasks ordered by deadline, then by scheduling order
pub struct Timers<T> {
    clock: Clock,
    heap: BinaryHeap<Entry<T>>,
    next_seq: u64,
}

impl<T> std::fmt::Debug for Timers<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timers")
            .field("now", &self.clock.now())
            .field("pending", &self.heap.len())
            .field("next", &self.next_deadline())
            .finish()
    }
}

impl<T> Timers<T> {
    /// Create a queue reading time from `clock`
    pub fn new(clock: Clock) -> Self {
        Self { clock, heap: BinaryHeap::new(), next_seq: 0 }
    }

    /// Clock the queue schedules against
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Run `task` once `delay` has elapsed
    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerId {
        self.schedule_at(self.clock.now() + delay, task)
    }

    /// Run `task` at an absolute time
    pub fn schedule_at(&mut self, at: Duration, task: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { at, seq, task });
        TimerId(seq)
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Duration> {
        self.heap.peek().map(|e| e.at)
    }

    /// Latest pending deadline
    pub fn last_deadline(&self) -> Option<Duration> {
        self.heap.iter().map(|e| e.at).max()
    }

    /// Pop the earliest task whose deadline is not after the current time
    pub fn pop_due(&mut self) -> Option<T> {
        let now = self.clock.now();
        if self.heap.peek().is_some_and(|e| e.at <= now) {
            self.heap.pop().map(|e| e.task)
        } else {
            None
        }
    }

    /// Number of pending tasks
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_due_respects_clock() {
        let clock = Clock::new();
        let mut timers = Timers::new(clock.clone());
        timers.schedule(Duration::from_millis(100), "late");
        timers.schedule(Duration::from_millis(10), "early");

        assert_eq!(timers.pop_due(), None);
        assert_eq!(timers.next_deadline(), Some(Duration::from_millis(10)));

        clock.advance_to(Duration::from_millis(50));
        assert_eq!(timers.pop_due(), Some("early"));
        assert_eq!(timers.pop_due(), None);

        clock.advance_to(Duration::from_millis(100));
        assert_eq!(timers.pop_due(), Some("late"));
        assert!(timers.is_empty());
    }

    #[test]
    fn test_equal_deadlines_run_in_scheduling_order() {
        let clock = Clock::new();
        let mut timers = Timers::new(clock.clone());
        timers.schedule(Duration::from_millis(5), 1);
        timers.schedule(Duration::from_millis(5), 2);
        timers.schedule(Duration::from_millis(5), 3);

        clock.advance_to(Duration::from_millis(5));
        let order: Vec<_> = std::iter::from_fn(|| timers.pop_due()).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_clock_never_runs_backwards() {
        let clock = Clock::new();
        clock.advance_to(Duration::from_millis(30));
        clock.advance_to(Duration::from_millis(10));
        assert_eq!(clock.now(), Duration::from_millis(30));
    }

    #[test]
    fn test_last_deadline() {
        let mut timers = Timers::new(Clock::new());
        assert_eq!(timers.last_deadline(), None);
        timers.schedule(Duration::from_millis(300), ());
        timers.schedule(Duration::from_millis(20), ());
        assert_eq!(timers.last_deadline(), Some(Duration::from_millis(300)));
    }
}
