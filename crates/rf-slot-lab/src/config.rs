//! Game configuration
//!
//! Everything that differs between cabinets lives here: strips, payouts, the
//! bet ladder, the starting account and timing. Files may be JSON or YAML and
//! may leave out any field; missing fields take the classic defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, SlotResult};
use crate::paytable::{PayTable, PayoutTable};
use crate::symbols::{REEL_COUNT, ReelStrip, Symbol, build_strips, classic_strips};
use crate::timing::{TimingConfig, TimingProfile};

/// Default bet ladder
pub const CLASSIC_BET_AMOUNTS: [u64; 9] = [1, 5, 10, 25, 50, 100, 500, 1000, 5000];

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Game name
    pub name: String,
    /// One symbol list per reel
    pub strips: Vec<Vec<Symbol>>,
    /// Symbol → {count → multiplier}
    pub payouts: PayoutTable,
    /// Available bets, strictly ascending
    pub bet_amounts: Vec<u64>,
    /// Credits at startup and after restart
    pub starting_credits: u64,
    /// Bet index at startup and after restart
    pub starting_bet_index: usize,
    /// How many strip copies the reel animation runs through
    pub reel_repeat_count: usize,
    /// Animation and display timing
    pub timing: TimingConfig,
    /// Fixed RNG seed (random when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            name: "Classic Slots".into(),
            strips: classic_strips(),
            payouts: PayoutTable::classic(),
            bet_amounts: CLASSIC_BET_AMOUNTS.to_vec(),
            starting_credits: 100,
            starting_bet_index: 1,
            reel_repeat_count: 10,
            timing: TimingConfig::normal(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Classic cabinet with a different timing profile
    pub fn with_profile(profile: TimingProfile) -> Self {
        Self {
            timing: TimingConfig::from_profile(profile),
            ..Default::default()
        }
    }

    /// Zero-delay classic cabinet (tests, simulation)
    pub fn instant() -> Self {
        Self::with_profile(TimingProfile::Instant)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_credits(mut self, credits: u64) -> Self {
        self.starting_credits = credits;
        self
    }

    pub fn with_bet_index(mut self, index: usize) -> Self {
        self.starting_bet_index = index;
        self
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; `.yaml`/`.yml` are read as YAML, anything else as JSON
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        log::debug!("Loading game config from {}", path.display());
        if is_yaml {
            Self::from_yaml(&text)
        } else {
            Self::from_json(&text)
        }
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every structural rule
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.strips.len() != REEL_COUNT {
            return Err(ConfigError::ReelCount {
                expected: REEL_COUNT,
                got: self.strips.len(),
            });
        }
        if let Some(reel) = self.strips.iter().position(|s| s.is_empty()) {
            return Err(ConfigError::EmptyStrip(reel));
        }

        if self.bet_amounts.is_empty() {
            return Err(ConfigError::EmptyBetLadder);
        }
        let ascending = self.bet_amounts.windows(2).all(|w| w[0] < w[1]);
        if !ascending || self.bet_amounts[0] == 0 {
            return Err(ConfigError::UnorderedBetLadder);
        }
        if self.starting_bet_index >= self.bet_amounts.len() {
            return Err(ConfigError::BetIndexOutOfRange {
                index: self.starting_bet_index,
                len: self.bet_amounts.len(),
            });
        }

        if self.reel_repeat_count < 2 {
            return Err(ConfigError::RepeatCount(self.reel_repeat_count));
        }

        self.payouts.validate()
    }

    /// Smallest bet on the ladder
    pub fn min_bet(&self) -> u64 {
        self.bet_amounts.first().copied().unwrap_or(0)
    }

    /// Build the runtime strips
    pub fn build_strips(&self) -> SlotResult<Vec<ReelStrip>> {
        build_strips(&self.strips)
    }

    /// Paytable over the classic lines
    pub fn paytable(&self) -> PayTable {
        PayTable::new(self.payouts.clone())
    }
}
