//! StageTrace — A recorded sequence of stage events for one session
//!
//! A trace captures the full timeline of a play session so it can be
//! inspected, validated or dumped to JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::StageEvent;
use crate::stage::{Stage, StageCategory};
use crate::taxonomy::GameState;

/// A complete trace of stage events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTrace {
    /// Unique identifier for this trace
    pub trace_id: String,

    /// Game identifier
    pub game_id: String,

    /// All events in chronological order
    pub events: Vec<StageEvent>,

    /// When this trace was recorded
    pub recorded_at: DateTime<Utc>,

    /// Custom metadata
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl StageTrace {
    /// Create a new empty trace
    pub fn new(trace_id: impl Into<String>, game_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            game_id: game_id.into(),
            events: Vec::new(),
            recorded_at: Utc::now(),
            metadata: serde_json::Map::new(),
        }
    }

    /// Add an event to the trace
    pub fn push(&mut self, event: StageEvent) {
        self.events.push(event);
    }

    /// Append many events
    pub fn extend(&mut self, events: impl IntoIterator<Item = StageEvent>) {
        self.events.extend(events);
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Get total duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        match (self.events.first(), self.events.last()) {
            (Some(first), Some(last)) => last.timestamp_ms.saturating_sub(first.timestamp_ms),
            _ => 0,
        }
    }

    /// Get events by category
    pub fn events_by_category(&self, category: StageCategory) -> Vec<&StageEvent> {
        self.events
            .iter()
            .filter(|e| e.stage.category() == category)
            .collect()
    }

    /// Get events by stage type name
    pub fn events_by_type(&self, type_name: &str) -> Vec<&StageEvent> {
        self.events
            .iter()
            .filter(|e| e.stage.type_name() == type_name)
            .collect()
    }

    /// Find first event matching a predicate
    pub fn find_event<F>(&self, predicate: F) -> Option<&StageEvent>
    where
        F: Fn(&StageEvent) -> bool,
    {
        self.events.iter().find(|e| predicate(e))
    }

    /// Check if trace contains a specific stage type
    pub fn has_stage(&self, type_name: &str) -> bool {
        self.events.iter().any(|e| e.stage.type_name() == type_name)
    }

    /// Get all reel stop events
    pub fn reel_stops(&self) -> Vec<&StageEvent> {
        self.events_by_type("reel_stop")
    }

    /// Ordered list of entered states
    pub fn state_path(&self) -> Vec<GameState> {
        self.events
            .iter()
            .filter_map(|e| match e.stage {
                Stage::StateEntered { state } => Some(state),
                _ => None,
            })
            .collect()
    }

    /// Most recent message text
    pub fn last_message(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|e| match &e.stage {
            Stage::Message { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Sum of all presented wins
    pub fn total_win(&self) -> u64 {
        self.events
            .iter()
            .filter_map(|e| match e.stage {
                Stage::WinPresent { win_amount, .. } => Some(win_amount),
                _ => None,
            })
            .sum()
    }

    /// Validate trace has the required spin stages
    pub fn validate(&self) -> TraceValidation {
        let spin_starts = self.events_by_type("spin_start").len();
        let spin_ends = self.events_by_type("spin_end").len();

        TraceValidation {
            spin_starts,
            spin_ends,
            reel_stop_count: self.reel_stops().len(),
            has_evaluate: self.has_stage("evaluate_wins"),
            is_chronological: self
                .events
                .windows(2)
                .all(|w| w[0].timestamp_ms <= w[1].timestamp_ms),
        }
    }

    /// Get summary of trace
    pub fn summary(&self) -> TraceSummary {
        TraceSummary {
            trace_id: self.trace_id.clone(),
            game_id: self.game_id.clone(),
            event_count: self.events.len(),
            duration_ms: self.duration_ms(),
            total_win: self.total_win(),
            spins: self.events_by_type("spin_start").len(),
        }
    }
}

/// Validation result for a trace
#[derive(Debug, Clone, Default)]
pub struct TraceValidation {
    pub spin_starts: usize,
    pub spin_ends: usize,
    pub reel_stop_count: usize,
    pub has_evaluate: bool,
    pub is_chronological: bool,
}

impl TraceValidation {
    /// Every started spin stopped all three reels; at most one spin still open
    pub fn is_valid(&self) -> bool {
        self.is_chronological
            && self.spin_ends <= self.spin_starts
            && self.spin_starts - self.spin_ends <= 1
            && self.reel_stop_count >= self.spin_ends * 3
    }

    /// Get list of warnings
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();

        if !self.is_chronological {
            warnings.push("Events are not in chronological order");
        }
        if self.spin_ends > self.spin_starts {
            warnings.push("More SPIN_END than SPIN_START events");
        }
        if self.reel_stop_count < self.spin_ends * 3 {
            warnings.push("Not all reels have stop events");
        }
        if self.spin_starts > 0 && !self.has_evaluate {
            warnings.push("Spins recorded without EVALUATE_WINS");
        }

        warnings
    }
}

/// Summary of a trace for quick overview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceSummary {
    pub trace_id: String,
    pub game_id: String,
    pub event_count: usize,
    pub duration_ms: u64,
    pub total_win: u64,
    pub spins: usize,
}
