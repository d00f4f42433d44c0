//! Timing profiles for reel animation and state transitions

use serde::{Deserialize, Serialize};

/// Timing profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimingProfile {
    /// Normal cabinet timing
    #[default]
    Normal,
    /// Fast/Turbo mode
    Turbo,
    /// No delays at all (simulation and tests)
    Instant,
    /// Scaled or hand-edited timing
    Custom,
}

/// Detailed timing configuration (all values in milliseconds)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Profile type
    pub profile: TimingProfile,

    /// Spin time of the first reel
    pub reel_spin_base_ms: u64,

    /// Extra spin time for each following reel
    pub reel_spin_increment_ms: u64,

    /// Upper bound (exclusive) of random extra spin time per reel
    pub reel_spin_jitter_ms: u64,

    /// Gap between the last reel stop and STOPPING, and the STOPPING settle
    pub state_transition_ms: u64,

    /// How long a win is presented
    pub win_celebration_ms: u64,

    /// How long a loss is presented
    pub no_win_display_ms: u64,

    /// Pause in IDLE before an auto-spin fires
    pub auto_spin_delay_ms: u64,

    /// How long "NOT ENOUGH CREDITS!" stays before returning to IDLE
    pub insufficient_credits_ms: u64,

    /// Spin presses closer together than this are ignored
    pub spin_debounce_ms: u64,
}

impl TimingConfig {
    /// Normal gameplay timing
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            reel_spin_base_ms: 3000,
            reel_spin_increment_ms: 1000,
            reel_spin_jitter_ms: 1000,
            state_transition_ms: 100,
            win_celebration_ms: 2500,
            no_win_display_ms: 1500,
            auto_spin_delay_ms: 500,
            insufficient_credits_ms: 2000,
            spin_debounce_ms: 300,
        }
    }

    /// Turbo mode
    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            reel_spin_base_ms: 800,
            reel_spin_increment_ms: 300,
            reel_spin_jitter_ms: 200,
            state_transition_ms: 50,
            win_celebration_ms: 1200,
            no_win_display_ms: 600,
            auto_spin_delay_ms: 200,
            insufficient_credits_ms: 1000,
            spin_debounce_ms: 150,
        }
    }

    /// Every delay zero
    pub fn instant() -> Self {
        Self {
            profile: TimingProfile::Instant,
            reel_spin_base_ms: 0,
            reel_spin_increment_ms: 0,
            reel_spin_jitter_ms: 0,
            state_transition_ms: 0,
            win_celebration_ms: 0,
            no_win_display_ms: 0,
            auto_spin_delay_ms: 0,
            insufficient_credits_ms: 0,
            spin_debounce_ms: 0,
        }
    }

    /// Get config for profile
    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Instant => Self::instant(),
            TimingProfile::Custom => Self::normal(),
        }
    }

    /// Scale timing by factor (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |ms: u64| (ms as f64 * factor.max(0.0)).round() as u64;
        Self {
            profile: TimingProfile::Custom,
            reel_spin_base_ms: scale(self.reel_spin_base_ms),
            reel_spin_increment_ms: scale(self.reel_spin_increment_ms),
            reel_spin_jitter_ms: scale(self.reel_spin_jitter_ms),
            state_transition_ms: scale(self.state_transition_ms),
            win_celebration_ms: scale(self.win_celebration_ms),
            no_win_display_ms: scale(self.no_win_display_ms),
            auto_spin_delay_ms: scale(self.auto_spin_delay_ms),
            insufficient_credits_ms: scale(self.insufficient_credits_ms),
            spin_debounce_ms: scale(self.spin_debounce_ms),
        }
    }

    /// Spin duration of one reel before jitter
    pub fn reel_spin_duration(&self, reel_index: usize) -> u64 {
        self.reel_spin_base_ms + reel_index as u64 * self.reel_spin_increment_ms
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}
