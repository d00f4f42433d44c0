//! StageSink — Outbound consumers of stage events
//!
//! Renderers, audio and background layers implement [`StageSink`]. Sinks are
//! best-effort: the producer logs a failed delivery and carries on.

use thiserror::Error;

use crate::event::StageEvent;

/// Error reported by a stage consumer
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Sink closed")]
    Closed,
}

/// Consumer of stage events
pub trait StageSink: Send {
    /// Sink name for logs
    fn name(&self) -> &str;

    /// Receive one event
    fn on_stage(&mut self, event: &StageEvent) -> Result<(), SinkError>;
}
