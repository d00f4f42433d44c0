//! Stage Taxonomy — Enums and small records shared by stages
//!
//! These types classify the machine state, UI affordances and grid cells
//! referenced from stage payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Game state tag of the spin machine
///
/// Exactly one state is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    /// Waiting for a spin
    #[default]
    Idle,
    /// Bet deducted, reels in motion
    Spinning,
    /// All reels landed, settling before evaluation
    Stopping,
    /// Paylines being scored
    Evaluating,
    /// Showing a win
    WinCelebration,
    /// Showing a loss
    NoWinDisplay,
    /// Credits below the minimum bet; only restart leaves this state
    GameOver,
}

impl GameState {
    /// Upper-case label as shown in logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Spinning => "SPINNING",
            Self::Stopping => "STOPPING",
            Self::Evaluating => "EVALUATING",
            Self::WinCelebration => "WIN_CELEBRATION",
            Self::NoWinDisplay => "NO_WIN_DISPLAY",
            Self::GameOver => "GAME_OVER",
        }
    }

    /// States in which a round is in flight
    pub fn is_round_active(&self) -> bool {
        matches!(
            self,
            Self::Spinning
                | Self::Stopping
                | Self::Evaluating
                | Self::WinCelebration
                | Self::NoWinDisplay
        )
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Visual tone of the message display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MessageTone {
    #[default]
    Neutral,
    Win,
    Lose,
}

/// A single cell of the visible grid
///
/// `reel` is the column, `row` is 0 (top) to 2 (bottom).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub reel: u8,
    pub row: u8,
}

impl Cell {
    pub const fn new(reel: u8, row: u8) -> Self {
        Self { reel, row }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.reel, self.row)
    }
}

/// Which user control produced a click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum ControlId {
    BetUp,
    BetDown,
    AutoSpin { enabled: bool },
    Mute { muted: bool },
    StatsOpen,
    StatsClose,
    Restart,
}

/// Enabled/visible flags of the cabinet controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Controls {
    pub spin_visible: bool,
    pub spin_enabled: bool,
    pub restart_visible: bool,
    pub auto_enabled: bool,
    pub bet_up_enabled: bool,
    pub bet_down_enabled: bool,
}

impl Controls {
    /// Everything disabled, restart offered
    pub fn game_over() -> Self {
        Self {
            spin_visible: false,
            spin_enabled: false,
            restart_visible: true,
            auto_enabled: false,
            bet_up_enabled: false,
            bet_down_enabled: false,
        }
    }

    /// Spin shown but locked while a round is running
    pub fn round_in_flight() -> Self {
        Self {
            spin_visible: true,
            spin_enabled: false,
            restart_visible: false,
            auto_enabled: true,
            bet_up_enabled: false,
            bet_down_enabled: false,
        }
    }
}

/// Point-in-time copy of session statistics for the stats panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct StatsSnapshot {
    pub total_spins: u64,
    pub wins: u64,
    pub total_winnings: u64,
    pub biggest_win: u64,
    /// Percentage of spins that won (0.0 - 100.0)
    pub win_rate: f64,
}
