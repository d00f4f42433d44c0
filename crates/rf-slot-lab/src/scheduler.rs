//! Virtual-clock timer queue
//!
//! The machine never sleeps. Hosts move the clock forward and the machine
//! pops whatever came due. Every timer remembers the state generation it was
//! scheduled under so a late pop from an older state can be recognised.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimerKind {
    /// IDLE pause before an automatic spin
    AutoSpin,
    /// One reel lands
    ReelStop { reel: u8 },
    /// Last reel landed, move to STOPPING
    AllReelsStopped,
    /// STOPPING settled, move to EVALUATING
    Settle,
    /// Result display finished
    RoundComplete,
    /// "NOT ENOUGH CREDITS!" display finished
    ReturnToIdle,
}

/// A pending timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub kind: TimerKind,
    pub generation: u64,
    pub due_ms: u64,
}

/// Ordered timer queue on a virtual millisecond clock
///
/// Timers with equal deadlines fire in the order they were scheduled.
#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_seq: u64,
    queue: BTreeMap<(u64, u64), Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `kind` to fire `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: u64, kind: TimerKind, generation: u64) -> u64 {
        let due_ms = self.now_ms.saturating_add(delay_ms);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert(
            (due_ms, seq),
            Timer {
                kind,
                generation,
                due_ms,
            },
        );
        due_ms
    }

    /// Drop every pending timer
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        dropped
    }

    /// Drop pending timers of one kind
    pub fn cancel_kind(&mut self, kind: TimerKind) -> usize {
        let before = self.queue.len();
        self.queue.retain(|_, timer| timer.kind != kind);
        before - self.queue.len()
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<u64> {
        self.queue.keys().next().map(|&(due, _)| due)
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to it
    pub fn pop_due(&mut self, until: u64) -> Option<Timer> {
        let (&key, _) = self.queue.first_key_value()?;
        if key.0 > until {
            return None;
        }
        let timer = self.queue.remove(&key)?;
        self.now_ms = self.now_ms.max(timer.due_ms);
        Some(timer)
    }

    /// Move the clock forward without firing anything
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}
