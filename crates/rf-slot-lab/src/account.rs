//! Credits, bet ladder and session statistics

use rf_stage::StatsSnapshot;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::{SlotError, SlotResult};

/// Session statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub wins: u64,
    pub total_winnings: u64,
    pub biggest_win: u64,
}

impl SessionStats {
    /// Percentage of spins that won
    pub fn win_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Record a paid round
    pub fn record_win(&mut self, amount: u64) {
        self.wins += 1;
        self.total_winnings = self.total_winnings.saturating_add(amount);
        self.biggest_win = self.biggest_win.max(amount);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_spins: self.total_spins,
            wins: self.wins,
            total_winnings: self.total_winnings,
            biggest_win: self.biggest_win,
            win_rate: self.win_rate(),
        }
    }
}

/// Player account for one session
///
/// The current bet is always read through the ladder, so it cannot drift
/// from the bet index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameAccount {
    credits: u64,
    bet_index: usize,
    bet_amounts: Vec<u64>,
    starting_credits: u64,
    starting_bet_index: usize,
    stats: SessionStats,
}

impl GameAccount {
    /// Fresh account from a validated config
    pub fn new(config: &GameConfig) -> Self {
        let starting_bet_index = config
            .starting_bet_index
            .min(config.bet_amounts.len().saturating_sub(1));
        Self {
            credits: config.starting_credits,
            bet_index: starting_bet_index,
            bet_amounts: config.bet_amounts.clone(),
            starting_credits: config.starting_credits,
            starting_bet_index,
            stats: SessionStats::default(),
        }
    }

    pub fn credits(&self) -> u64 {
        self.credits
    }

    pub fn bet_index(&self) -> usize {
        self.bet_index
    }

    pub fn bet_amounts(&self) -> &[u64] {
        &self.bet_amounts
    }

    /// Bet at the current ladder position
    pub fn current_bet(&self) -> u64 {
        self.bet_amounts.get(self.bet_index).copied().unwrap_or(0)
    }

    /// Smallest bet on the ladder
    pub fn min_bet(&self) -> u64 {
        self.bet_amounts.first().copied().unwrap_or(0)
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn can_afford_bet(&self) -> bool {
        self.credits >= self.current_bet()
    }

    pub fn can_afford_min_bet(&self) -> bool {
        self.credits >= self.min_bet()
    }

    /// Bet-up affordance: a next rung exists and is affordable
    pub fn can_raise_bet(&self) -> bool {
        self.bet_amounts
            .get(self.bet_index + 1)
            .is_some_and(|&next| next <= self.credits)
    }

    /// Bet-down affordance
    pub fn can_lower_bet(&self) -> bool {
        self.bet_index > 0
    }

    /// Move one rung up; no-op at the top of the ladder
    pub fn raise_bet(&mut self) -> bool {
        if self.bet_index + 1 < self.bet_amounts.len() {
            self.bet_index += 1;
            true
        } else {
            false
        }
    }

    /// Move one rung down; no-op at the bottom
    pub fn lower_bet(&mut self) -> bool {
        if self.bet_index > 0 {
            self.bet_index -= 1;
            true
        } else {
            false
        }
    }

    /// Take the current bet and count the spin
    pub fn deduct_bet(&mut self) -> SlotResult<u64> {
        let bet = self.current_bet();
        if self.credits < bet {
            return Err(SlotError::InsufficientCredits {
                credits: self.credits,
                bet,
            });
        }
        self.credits -= bet;
        self.stats.total_spins += 1;
        Ok(bet)
    }

    /// Pay out a round
    pub fn credit_win(&mut self, amount: u64) {
        self.credits = self.credits.saturating_add(amount);
        self.stats.record_win(amount);
    }

    /// Back to the starting credits, bet and empty stats
    pub fn reset(&mut self) {
        self.credits = self.starting_credits;
        self.bet_index = self.starting_bet_index;
        self.stats = SessionStats::default();
    }
}
