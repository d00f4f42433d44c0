//! Outbound collaborators besides audio
//!
//! The decorative background only needs the clock and the current state.
//! Trace and log sinks are the stage consumers used by hosts and tests.

use std::sync::Arc;

use parking_lot::Mutex;
use rf_stage::{GameState, SinkError, StageEvent, StageSink, StageTrace};

/// Animated background behind the cabinet
pub trait Backdrop: Send {
    /// Clock moved to `now_ms`
    fn tick(&mut self, now_ms: u64);

    /// Machine entered a new state
    fn on_state(&mut self, state: GameState);
}

/// Backdrop that draws nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBackdrop;

impl Backdrop for NullBackdrop {
    fn tick(&mut self, _now_ms: u64) {}

    fn on_state(&mut self, _state: GameState) {}
}

/// Logs every stage at debug level
#[derive(Debug, Default)]
pub struct LogSink;

impl StageSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    fn on_stage(&mut self, event: &StageEvent) -> Result<(), SinkError> {
        log::debug!(
            "[{:>8}ms g{}] {:<14} {}",
            event.timestamp_ms,
            event.generation,
            event.stage.category().display_name(),
            event.type_name()
        );
        Ok(())
    }
}

/// Appends every stage to a shared [`StageTrace`]
///
/// Keep a clone of [`TraceSink::handle`] to read the trace while the machine
/// owns the sink.
#[derive(Debug, Clone)]
pub struct TraceSink {
    trace: Arc<Mutex<StageTrace>>,
}

impl TraceSink {
    pub fn new(trace_id: impl Into<String>, game_id: impl Into<String>) -> Self {
        Self {
            trace: Arc::new(Mutex::new(StageTrace::new(trace_id, game_id))),
        }
    }

    pub fn handle(&self) -> Arc<Mutex<StageTrace>> {
        Arc::clone(&self.trace)
    }

    /// Copy of everything recorded so far
    pub fn snapshot(&self) -> StageTrace {
        self.trace.lock().clone()
    }
}

impl StageSink for TraceSink {
    fn name(&self) -> &str {
        "trace"
    }

    fn on_stage(&mut self, event: &StageEvent) -> Result<(), SinkError> {
        self.trace.lock().push(event.clone());
        Ok(())
    }
}
