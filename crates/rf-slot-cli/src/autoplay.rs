//! Headless rounds on the virtual clock
//!
//! Plays like a patient player: press spin whenever the machine is idle,
//! step the bet down when it no longer fits the credits, stop at game over.
//! No wall-clock waiting; the machine jumps from deadline to deadline.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rf_slot_lab::{PlayerAction, SlotMachine, TraceSink};
use rf_stage::{GameState, StageTrace};
use serde_json::json;

use crate::render::ConsoleRenderer;

/// Longest a single round may take on the virtual clock
const ROUND_LIMIT_MS: u64 = 60_000;

/// Outcome of a headless session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoplayReport {
    pub spins: u64,
    pub wins: u64,
    pub total_winnings: u64,
    pub biggest_win: u64,
    pub credits: u64,
    pub game_over: bool,
    /// Virtual time spent
    pub elapsed_ms: u64,
}

/// Play up to `spins` rounds; with `frames` every round's final cabinet is printed
pub fn play(machine: &mut SlotMachine, spins: u64, frames: bool) -> AutoplayReport {
    let mut renderer = ConsoleRenderer::new();
    machine.start();

    while machine.stats().total_spins < spins {
        match machine.state() {
            GameState::GameOver => break,
            GameState::Idle if !machine.account().can_afford_bet() => {
                log::info!(
                    "Bet {} exceeds {} credits, stepping down",
                    machine.current_bet(),
                    machine.credits()
                );
                machine.handle_action(PlayerAction::BetDown);
            }
            GameState::Idle => {
                if !machine.handle_action(PlayerAction::Spin) {
                    let wait = machine.timing().spin_debounce_ms.max(1);
                    machine.advance(wait);
                    continue;
                }
            }
            _ => {}
        }

        machine.run_until_settled(ROUND_LIMIT_MS);
        let events = machine.drain_stages();
        for event in &events {
            renderer.apply(event);
        }

        if let Some(result) = machine.last_result() {
            log::debug!(
                "{} stops {:?} win {} credits {}",
                result.spin_id,
                result.stops,
                result.win_amount(),
                machine.credits()
            );
        }
        if frames {
            println!("{}", renderer.frame());
        }
    }

    let stats = machine.stats();
    AutoplayReport {
        spins: stats.total_spins,
        wins: stats.wins,
        total_winnings: stats.total_winnings,
        biggest_win: stats.biggest_win,
        credits: machine.credits(),
        game_over: machine.state() == GameState::GameOver,
        elapsed_ms: machine.now(),
    }
}

/// Fresh trace sink named after the current time
pub fn trace_sink(game_id: &str) -> TraceSink {
    let trace_id = format!("autoplay-{}", Utc::now().format("%Y%m%d-%H%M%S"));
    TraceSink::new(trace_id, game_id)
}

/// Write a recorded trace as pretty JSON
pub fn write_trace(trace: StageTrace, seed: Option<u64>, path: &Path) -> Result<()> {
    let validation = trace.validate();
    for warning in validation.warnings() {
        log::warn!("Trace: {warning}");
    }

    let trace = trace.with_metadata("seed", json!(seed));
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &trace)
        .with_context(|| format!("failed to write trace to {}", path.display()))?;

    log::info!("Wrote {} stages to {}", trace.events.len(), path.display());
    Ok(())
}
