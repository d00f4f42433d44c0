//! Batch simulator
//!
//! Runs the evaluator without the state machine to measure return-to-player
//! and hit rate. Work is split into fixed-size chunks; chunk `n` draws from
//! ChaCha stream `n` of the base seed, so a report depends only on the seed,
//! the spin count and the chunk size, never on the thread count.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::SlotResult;
use crate::paytable::{EvaluationResult, PayTable, PaylineId};
use crate::symbols::{REEL_COUNT, ReelStrip, Symbol};

/// Batch parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub spins: u64,
    pub bet: u64,
    pub seed: u64,
    /// Spins per parallel work unit
    pub chunk_size: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            spins: 1_000_000,
            bet: 1,
            seed: 0,
            chunk_size: 65_536,
        }
    }
}

/// Aggregated outcome of a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub spins: u64,
    pub total_bet: u64,
    pub total_win: u64,
    /// Spins that paid anything
    pub wins: u64,
    pub biggest_win: u64,
    /// Paying occurrences per line
    pub line_hits: BTreeMap<PaylineId, u64>,
    /// Three-of-a-kind occurrences per symbol
    pub symbol_hits: BTreeMap<Symbol, u64>,
}

impl SimulationReport {
    /// Return to player, percent
    pub fn rtp(&self) -> f64 {
        if self.total_bet > 0 {
            (self.total_win as f64 / self.total_bet as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Percentage of spins that paid
    pub fn hit_rate(&self) -> f64 {
        if self.spins > 0 {
            (self.wins as f64 / self.spins as f64) * 100.0
        } else {
            0.0
        }
    }

    fn record(&mut self, bet: u64, evaluation: &EvaluationResult) {
        self.spins += 1;
        self.total_bet += bet;
        if !evaluation.is_win() {
            return;
        }
        self.wins += 1;
        self.total_win += evaluation.total_win;
        self.biggest_win = self.biggest_win.max(evaluation.total_win);
        for line_win in &evaluation.line_wins {
            *self.line_hits.entry(line_win.line).or_default() += 1;
            if line_win.match_count == 3 {
                *self.symbol_hits.entry(line_win.symbol).or_default() += 1;
            }
        }
    }

    /// Combine two partial reports
    pub fn merge(mut self, other: Self) -> Self {
        self.spins += other.spins;
        self.total_bet += other.total_bet;
        self.total_win += other.total_win;
        self.wins += other.wins;
        self.biggest_win = self.biggest_win.max(other.biggest_win);
        for (line, hits) in other.line_hits {
            *self.line_hits.entry(line).or_default() += hits;
        }
        for (symbol, hits) in other.symbol_hits {
            *self.symbol_hits.entry(symbol).or_default() += hits;
        }
        self
    }
}

/// Evaluator-only simulator for one configuration
pub struct Simulator {
    strips: Vec<ReelStrip>,
    paytable: PayTable,
}

impl Simulator {
    pub fn new(config: &GameConfig) -> SlotResult<Self> {
        config.validate()?;
        Ok(Self {
            strips: config.build_strips()?,
            paytable: config.paytable(),
        })
    }

    /// Random batch, parallel over chunks
    pub fn run(&self, config: &SimulationConfig) -> SlotResult<SimulationReport> {
        let chunk_size = config.chunk_size.max(1);
        let chunks = config.spins.div_ceil(chunk_size);
        log::info!(
            "Simulating {} spins at bet {} ({} chunks, seed {})",
            config.spins,
            config.bet,
            chunks,
            config.seed
        );

        let report = (0..chunks)
            .into_par_iter()
            .map(|chunk| {
                let start = chunk * chunk_size;
                let len = chunk_size.min(config.spins - start);
                self.run_chunk(config.seed, chunk, len, config.bet)
            })
            .try_reduce(SimulationReport::default, |a, b| Ok(a.merge(b)))?;

        log::info!(
            "RTP {:.2}%, hit rate {:.2}%, biggest win {}",
            report.rtp(),
            report.hit_rate(),
            report.biggest_win
        );
        Ok(report)
    }

    /// One chunk draws from its own ChaCha stream of the base seed
    fn run_chunk(&self, seed: u64, chunk: u64, spins: u64, bet: u64) -> SlotResult<SimulationReport> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(chunk);
        let mut report = SimulationReport::default();
        let mut stops = [0usize; REEL_COUNT];

        for _ in 0..spins {
            for (stop, strip) in stops.iter_mut().zip(&self.strips) {
                *stop = rng.random_range(0..strip.len());
            }
            let evaluation = self.paytable.evaluate(&self.strips, &stops, bet)?;
            report.record(bet, &evaluation);
        }
        Ok(report)
    }

    /// Every stop combination exactly once; gives the true RTP of the strips
    pub fn exhaustive(&self, bet: u64) -> SlotResult<SimulationReport> {
        let lens: Vec<usize> = self.strips.iter().map(ReelStrip::len).collect();
        let mut report = SimulationReport::default();

        for a in 0..lens[0] {
            for b in 0..lens[1] {
                for c in 0..lens[2] {
                    let evaluation = self.paytable.evaluate(&self.strips, &[a, b, c], bet)?;
                    report.record(bet, &evaluation);
                }
            }
        }
        Ok(report)
    }
}
