//! Spin result and reel targets

use rf_stage::Cell;
use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::paytable::EvaluationResult;
use crate::symbols::{REEL_COUNT, ReelStrip};

/// One played round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinResult {
    /// Spin ID
    pub spin_id: String,
    /// Bet the round was played at
    pub bet: u64,
    /// Middle-row strip index per reel
    pub stops: [usize; REEL_COUNT],
    /// Filled in during EVALUATING; stays empty if evaluation failed
    pub evaluation: Option<EvaluationResult>,
}

impl SpinResult {
    pub fn new(spin_id: String, bet: u64, stops: [usize; REEL_COUNT]) -> Self {
        Self {
            spin_id,
            bet,
            stops,
            evaluation: None,
        }
    }

    /// Attach evaluation
    pub fn with_evaluation(mut self, evaluation: EvaluationResult) -> Self {
        self.evaluation = Some(evaluation);
        self
    }

    pub fn win_amount(&self) -> u64 {
        self.evaluation.as_ref().map_or(0, |e| e.total_win)
    }

    /// Check if this is a winning spin
    pub fn is_win(&self) -> bool {
        self.win_amount() > 0
    }

    /// Deduplicated winning cells, sorted by reel then row
    pub fn winning_positions(&self) -> Vec<Cell> {
        self.evaluation
            .as_ref()
            .map(|e| e.winning_positions.iter().copied().collect())
            .unwrap_or_default()
    }
}

/// Explicit stop triple replacing the next random draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForcedStops(pub [usize; REEL_COUNT]);

impl ForcedStops {
    /// Every stop must be inside its strip
    pub fn validate(&self, strips: &[ReelStrip]) -> SlotResult<()> {
        if strips.len() != REEL_COUNT {
            return Err(SlotError::ReelOutOfRange {
                expected: REEL_COUNT,
                got: strips.len(),
            });
        }
        for (reel, (&index, strip)) in self.0.iter().zip(strips).enumerate() {
            if index >= strip.len() {
                return Err(SlotError::InvalidIndex {
                    reel,
                    index,
                    len: strip.len(),
                });
            }
        }
        Ok(())
    }
}

impl From<[usize; REEL_COUNT]> for ForcedStops {
    fn from(stops: [usize; REEL_COUNT]) -> Self {
        Self(stops)
    }
}

/// Rows the reel animation travels so that `stop_index` lands on the middle row
///
/// The rendered reel repeats its strip `repeat_count` times; the target sits
/// in the second-to-last copy with the row above the stop at the top.
pub fn reel_target_offset(repeat_count: usize, strip_len: usize, stop_index: usize) -> usize {
    (repeat_count.saturating_sub(2) * strip_len + stop_index).saturating_sub(1)
}
