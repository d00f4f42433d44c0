//! Shared session handle
//!
//! The machine itself is single-threaded. Hosts that touch it from more than
//! one thread (an input thread and a ticker, say) go through [`SharedMachine`],
//! which serializes every mutation behind one lock.

use std::sync::Arc;

use parking_lot::Mutex;
use rf_stage::{GameState, StageEvent};

use crate::engine::{PlayerAction, SlotMachine};

/// Cloneable, lock-protected [`SlotMachine`]
#[derive(Clone)]
pub struct SharedMachine {
    inner: Arc<Mutex<SlotMachine>>,
}

impl SharedMachine {
    pub fn new(machine: SlotMachine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(machine)),
        }
    }

    pub fn handle_action(&self, action: PlayerAction) -> bool {
        self.inner.lock().handle_action(action)
    }

    pub fn advance(&self, elapsed_ms: u64) -> usize {
        self.inner.lock().advance(elapsed_ms)
    }

    pub fn drain_stages(&self) -> Vec<StageEvent> {
        self.inner.lock().drain_stages()
    }

    pub fn state(&self) -> GameState {
        self.inner.lock().state()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.inner.lock().next_deadline()
    }

    /// Run a closure with exclusive access
    pub fn with<R>(&self, f: impl FnOnce(&mut SlotMachine) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
