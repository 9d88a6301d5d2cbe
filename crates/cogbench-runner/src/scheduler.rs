//! Cancellable delayed actions on a virtual millisecond clock.
//!
//! The scheduler never sleeps. Whoever owns it moves time forward with
//! [`Scheduler::pop_due`] and [`Scheduler::advance_clock`]; a host that wants
//! real time maps its ticks onto those calls.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A pending action and when it fires.
#[derive(Debug)]
struct Entry<A> {
    deadline_ms: u64,
    seq: u64,
    action: A,
}

impl<A> PartialEq for Entry<A> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline_ms == other.deadline_ms && self.seq == other.seq
    }
}

impl<A> Eq for Entry<A> {}

impl<A> PartialOrd for Entry<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Reversed so the max-heap pops the earliest deadline first, FIFO on ties.
impl<A> Ord for Entry<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline_ms
            .cmp(&self.deadline_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Deadline-ordered queue of actions with a single cancel-all primitive.
#[derive(Debug)]
pub struct Scheduler<A> {
    now_ms: u64,
    next_seq: u64,
    queue: BinaryHeap<Entry<A>>,
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Queue `action` to fire `delay_ms` from now.
    pub fn schedule(&mut self, delay_ms: u64, action: A) {
        let deadline_ms = self.now_ms.saturating_add(delay_ms);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Entry {
            deadline_ms,
            seq,
            action,
        });
    }

    /// Drop every pending action. Nothing queued before this call will fire.
    pub fn cancel_all(&mut self) {
        self.queue.clear();
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.queue.peek().map(|e| e.deadline_ms)
    }

    /// Pop the earliest action due at or before `until_ms`, moving the clock
    /// to its deadline.
    ///
    /// Call repeatedly: actions fired in between may schedule or cancel
    /// others, and this only ever looks at the queue as it is now.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<A> {
        if self.queue.peek()?.deadline_ms > until_ms {
            return None;
        }
        let entry = self.queue.pop()?;
        self.now_ms = self.now_ms.max(entry.deadline_ms);
        Some(entry.action)
    }

    /// Move the clock forward to `to_ms`. The clock never runs backwards.
    pub fn advance_clock(&mut self, to_ms: u64) {
        self.now_ms = self.now_ms.max(to_ms);
    }
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(scheduler: &mut Scheduler<&'static str>, until: u64) -> Vec<(u64, &'static str)> {
        let mut fired = Vec::new();
        while let Some(action) = scheduler.pop_due(until) {
            fired.push((scheduler.now(), action));
        }
        scheduler.advance_clock(until);
        fired
    }

    #[test]
    fn fires_in_deadline_order() {
        let mut s = Scheduler::new();
        s.schedule(700, "off");
        s.schedule(300, "on");
        s.schedule(1500, "end");

        let fired = drain(&mut s, 1000);
        assert_eq!(fired, vec![(300, "on"), (700, "off")]);
        assert_eq!(s.now(), 1000);
        assert_eq!(s.next_deadline(), Some(1500));
    }

    #[test]
    fn ties_fire_in_insertion_order() {
        let mut s = Scheduler::new();
        s.schedule(100, "first");
        s.schedule(100, "second");
        s.schedule(100, "third");
        let fired: Vec<_> = drain(&mut s, 100).into_iter().map(|(_, a)| a).collect();
        assert_eq!(fired, vec!["first", "second", "third"]);
    }

    #[test]
    fn nothing_fires_after_cancel_all() {
        let mut s = Scheduler::new();
        s.schedule(100, "a");
        s.schedule(200, "b");
        s.cancel_all();
        assert!(s.is_idle());
        assert!(drain(&mut s, 10_000).is_empty());
    }

    #[test]
    fn delays_are_relative_to_current_time() {
        let mut s = Scheduler::new();
        s.advance_clock(5000);
        s.schedule(200, "unlock");
        assert_eq!(s.next_deadline(), Some(5200));
        assert_eq!(s.pop_due(5199), None);
        assert_eq!(s.pop_due(5200), Some("unlock"));
    }

    #[test]
    fn clock_is_monotonic() {
        let mut s: Scheduler<()> = Scheduler::new();
        s.advance_clock(300);
        s.advance_clock(100);
        assert_eq!(s.now(), 300);
    }

    #[test]
    fn cancel_between_pops_stops_the_rest() {
        let mut s = Scheduler::new();
        s.schedule(10, "resolve");
        s.schedule(20, "stale tick");
        assert_eq!(s.pop_due(100), Some("resolve"));
        s.cancel_all();
        assert_eq!(s.pop_due(100), None);
    }
}
