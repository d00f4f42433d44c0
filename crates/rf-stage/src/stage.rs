//! Stage — The core enum defining all canonical game phases
//!
//! A Stage is NOT an animation, NOT a timer callback.
//! A Stage is the SEMANTIC MEANING of a moment in the game flow. Renderers,
//! audio and the background layer react to stages, never to machine internals.

use serde::{Deserialize, Serialize};

use crate::taxonomy::{Cell, ControlId, Controls, GameState, MessageTone, StatsSnapshot};

/// Canonical game stage: everything the machine tells the outside world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stage {
    // ═══════════════════════════════════════════════════════════════════════
    // SPIN LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════
    /// Machine entered a new state
    StateEntered { state: GameState },

    /// Bet deducted, reels about to move
    SpinStart {
        spin_id: String,
        bet: u64,
    },

    /// Reel starts its run towards a target strip position
    ReelSpinning {
        /// Which reel (0-indexed)
        reel_index: u8,
        /// Strip index that lands on the middle row
        stop_index: usize,
        /// Target offset in symbol rows from the top of the rendered strip
        target_offset: usize,
        /// Animation length
        duration_ms: u64,
    },

    /// Reel has stopped, showing final symbols
    ReelStop {
        /// Which reel stopped (0-indexed)
        reel_index: u8,
        /// Last reel of the spin
        #[serde(default)]
        is_last: bool,
        /// Visible glyphs, top to bottom
        #[serde(default)]
        symbols: Vec<String>,
    },

    /// All reels settled, paylines being scored
    EvaluateWins,

    /// Round finished (win or no win)
    SpinEnd {
        #[serde(default)]
        win_amount: u64,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // WIN LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════
    /// Win celebration starting
    WinPresent {
        win_amount: u64,
        #[serde(default)]
        line_count: u8,
        /// Deduplicated winning cells
        #[serde(default)]
        positions: Vec<Cell>,
    },

    /// Individual paying line
    WinLineShow {
        line_index: u8,
        #[serde(default)]
        line_amount: u64,
    },

    /// Round lost
    NoWin,

    /// Remove any winning-cell highlight
    ClearHighlights,

    // ═══════════════════════════════════════════════════════════════════════
    // ACCOUNT
    // ═══════════════════════════════════════════════════════════════════════
    CreditsChanged { credits: u64 },

    BetChanged { bet: u64, bet_index: usize },

    /// Spin refused because the bet exceeds the credits
    InsufficientCredits { credits: u64, bet: u64 },

    /// Credits fell below the minimum bet
    GameOver,

    /// Account reset to its starting values
    Restart,

    // ═══════════════════════════════════════════════════════════════════════
    // UI
    // ═══════════════════════════════════════════════════════════════════════
    /// Message display text
    Message { text: String, tone: MessageTone },

    /// Control affordances changed
    ControlsChanged { controls: Controls },

    /// A control was pressed (click feedback)
    ControlPressed { control: ControlId },

    AutoSpinChanged { enabled: bool },

    MuteChanged { muted: bool },

    StatsShown { stats: StatsSnapshot },

    StatsClosed,
}

impl Stage {
    /// Get stage type name (for serialization, debugging)
    pub fn type_name(&self) -> &'static str {
        match self {
            Stage::StateEntered { .. } => "state_entered",
            Stage::SpinStart { .. } => "spin_start",
            Stage::ReelSpinning { .. } => "reel_spinning",
            Stage::ReelStop { .. } => "reel_stop",
            Stage::EvaluateWins => "evaluate_wins",
            Stage::SpinEnd { .. } => "spin_end",
            Stage::WinPresent { .. } => "win_present",
            Stage::WinLineShow { .. } => "win_line_show",
            Stage::NoWin => "no_win",
            Stage::ClearHighlights => "clear_highlights",
            Stage::CreditsChanged { .. } => "credits_changed",
            Stage::BetChanged { .. } => "bet_changed",
            Stage::InsufficientCredits { .. } => "insufficient_credits",
            Stage::GameOver => "game_over",
            Stage::Restart => "restart",
            Stage::Message { .. } => "message",
            Stage::ControlsChanged { .. } => "controls_changed",
            Stage::ControlPressed { .. } => "control_pressed",
            Stage::AutoSpinChanged { .. } => "auto_spin_changed",
            Stage::MuteChanged { .. } => "mute_changed",
            Stage::StatsShown { .. } => "stats_shown",
            Stage::StatsClosed => "stats_closed",
        }
    }

    /// Get category for grouping
    pub fn category(&self) -> StageCategory {
        match self {
            Stage::StateEntered { .. }
            | Stage::SpinStart { .. }
            | Stage::ReelSpinning { .. }
            | Stage::ReelStop { .. }
            | Stage::EvaluateWins
            | Stage::SpinEnd { .. } => StageCategory::SpinLifecycle,

            Stage::WinPresent { .. }
            | Stage::WinLineShow { .. }
            | Stage::NoWin
            | Stage::ClearHighlights => StageCategory::WinLifecycle,

            Stage::CreditsChanged { .. }
            | Stage::BetChanged { .. }
            | Stage::InsufficientCredits { .. }
            | Stage::GameOver
            | Stage::Restart => StageCategory::Account,

            Stage::Message { .. }
            | Stage::ControlsChanged { .. }
            | Stage::ControlPressed { .. }
            | Stage::AutoSpinChanged { .. }
            | Stage::MuteChanged { .. }
            | Stage::StatsShown { .. }
            | Stage::StatsClosed => StageCategory::UI,
        }
    }

    /// Stages that accompany a sound in the default audio mapping
    pub fn is_audible(&self) -> bool {
        matches!(
            self,
            Stage::SpinStart { .. }
                | Stage::ReelStop { .. }
                | Stage::WinPresent { .. }
                | Stage::NoWin
                | Stage::GameOver
                | Stage::ControlPressed { .. }
        )
    }

    /// Get all valid stage type names for validation
    pub fn all_type_names() -> &'static [&'static str] {
        &[
            "state_entered",
            "spin_start",
            "reel_spinning",
            "reel_stop",
            "evaluate_wins",
            "spin_end",
            "win_present",
            "win_line_show",
            "no_win",
            "clear_highlights",
            "credits_changed",
            "bet_changed",
            "insufficient_credits",
            "game_over",
            "restart",
            "message",
            "controls_changed",
            "control_pressed",
            "auto_spin_changed",
            "mute_changed",
            "stats_shown",
            "stats_closed",
        ]
    }
}

/// Stage category for grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageCategory {
    SpinLifecycle,
    WinLifecycle,
    Account,
    UI,
}

impl StageCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SpinLifecycle => "Spin Lifecycle",
            Self::WinLifecycle => "Win Lifecycle",
            Self::Account => "Account",
            Self::UI => "UI",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_serialization() {
        let stage = Stage::ReelStop {
            reel_index: 2,
            is_last: true,
            symbols: vec!["🍒".into(), "⭐".into(), "🔔".into()],
        };
        let json = serde_json::to_string(&stage).unwrap();
        assert!(json.contains("reel_stop"));
        assert!(json.contains("reel_index"));

        let deserialized: Stage = serde_json::from_str(&json).unwrap();
        assert_eq!(stage, deserialized);
    }

    #[test]
    fn test_stage_category() {
        assert_eq!(Stage::EvaluateWins.category(), StageCategory::SpinLifecycle);
        assert_eq!(Stage::NoWin.category(), StageCategory::WinLifecycle);
        assert_eq!(Stage::GameOver.category(), StageCategory::Account);
        assert_eq!(Stage::StatsClosed.category(), StageCategory::UI);
    }

    #[test]
    fn test_type_names_are_listed() {
        let samples = [
            Stage::EvaluateWins,
            Stage::NoWin,
            Stage::GameOver,
            Stage::StateEntered { state: GameState::Idle },
            Stage::AutoSpinChanged { enabled: true },
        ];
        for stage in samples {
            assert!(Stage::all_type_names().contains(&stage.type_name()));
        }
        assert_eq!(Stage::all_type_names().len(), 22);
    }

    #[test]
    fn test_is_audible() {
        assert!(Stage::NoWin.is_audible());
        assert!(!Stage::EvaluateWins.is_audible());
        assert!(!Stage::CreditsChanged { credits: 5 }.is_audible());
    }
}
