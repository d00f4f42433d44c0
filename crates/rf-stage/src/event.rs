//! StageEvent — A stage occurrence with metadata
//!
//! Wraps a Stage with timing and source information.

use serde::{Deserialize, Serialize};

use crate::stage::Stage;

/// A stage event with full metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEvent {
    /// The canonical stage
    pub stage: Stage,

    /// Machine clock in milliseconds (from session start)
    pub timestamp_ms: u64,

    /// State generation the event was emitted under
    #[serde(default)]
    pub generation: u64,

    /// Spin the event belongs to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spin_id: Option<String>,

    /// Routing tags ("auto_spin" while auto-spin is on)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl StageEvent {
    /// Create a new stage event
    pub fn new(stage: Stage, timestamp_ms: u64) -> Self {
        Self {
            stage,
            timestamp_ms,
            generation: 0,
            spin_id: None,
            tags: Vec::new(),
        }
    }

    /// Set generation
    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    /// Attach to a spin
    pub fn with_spin(mut self, spin_id: impl Into<String>) -> Self {
        self.spin_id = Some(spin_id.into());
        self
    }

    /// Get stage type name
    pub fn type_name(&self) -> &'static str {
        self.stage.type_name()
    }
}

/// Builder for creating StageEvents fluently
pub struct StageEventBuilder {
    stage: Stage,
    timestamp_ms: u64,
    generation: u64,
    spin_id: Option<String>,
    tags: Vec<String>,
}

impl StageEventBuilder {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            timestamp_ms: 0,
            generation: 0,
            spin_id: None,
            tags: Vec::new(),
        }
    }

    pub fn timestamp(mut self, ms: u64) -> Self {
        self.timestamp_ms = ms;
        self
    }

    pub fn generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    pub fn spin(mut self, spin_id: Option<String>) -> Self {
        self.spin_id = spin_id;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn build(self) -> StageEvent {
        StageEvent {
            stage: self.stage,
            timestamp_ms: self.timestamp_ms,
            generation: self.generation,
            spin_id: self.spin_id,
            tags: self.tags,
        }
    }
}
