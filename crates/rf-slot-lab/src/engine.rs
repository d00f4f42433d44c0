//! Slot Machine — the spin/evaluate/payout state machine
//!
//! One owned [`SlotMachine`] per session. The host feeds it [`PlayerAction`]s
//! and moves its clock with [`SlotMachine::advance`]; everything the machine
//! has to say comes out as [`StageEvent`]s, both through the outbox and
//! through the registered [`StageSink`]s.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use rf_stage::{
    ControlId, Controls, GameState, MessageTone, Stage, StageEvent, StageEventBuilder, StageSink,
};

use crate::account::{GameAccount, SessionStats};
use crate::config::GameConfig;
use crate::error::SlotResult;
use crate::frontend::{Backdrop, NullBackdrop};
use crate::paytable::PayTable;
use crate::scheduler::{Scheduler, Timer, TimerKind};
use crate::spin::{ForcedStops, SpinResult, reel_target_offset};
use crate::symbols::{REEL_COUNT, ReelStrip};
use crate::timing::{TimingConfig, TimingProfile};

/// Upper bound on timers fired by a single `advance` or `run_until_settled` call
const MAX_FIRES_PER_ADVANCE: usize = 4096;

/// Tag on every stage emitted while auto-spin is on
pub const AUTO_SPIN_TAG: &str = "auto_spin";

/// Undrained stages kept in the outbox; older ones are dropped first
pub const OUTBOX_CAPACITY: usize = 65_536;

/// Something the player did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    Spin,
    BetUp,
    BetDown,
    ToggleAutoSpin,
    ToggleMute,
    OpenStats,
    CloseStats,
    Restart,
}

/// Classic 3-reel slot machine
pub struct SlotMachine {
    /// Configuration
    config: GameConfig,
    /// Reel strips
    strips: Vec<ReelStrip>,
    /// Paytable
    paytable: PayTable,
    /// Timing configuration
    timing: TimingConfig,
    /// Random number generator
    rng: ChaCha8Rng,
    /// Credits, bet and stats
    account: GameAccount,

    state: GameState,
    /// Bumped on every state entry
    generation: u64,
    scheduler: Scheduler,
    started: bool,

    auto_spin: bool,
    muted: bool,
    stats_open: bool,
    controls: Controls,
    message: (String, MessageTone),

    /// Reels of the current round still in motion
    reels_spinning: usize,
    current_spin: Option<SpinResult>,
    last_result: Option<SpinResult>,
    spin_count: u64,
    last_spin_press: Option<u64>,
    forced_stops: VecDeque<ForcedStops>,

    outbox: VecDeque<StageEvent>,
    outbox_overflowed: bool,
    sinks: Vec<Box<dyn StageSink>>,
    backdrop: Box<dyn Backdrop>,
}

impl SlotMachine {
    /// Create a machine from a config; the config is validated first
    pub fn new(config: GameConfig) -> SlotResult<Self> {
        config.validate()?;
        let strips = config.build_strips()?;
        let paytable = config.paytable();
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };

        Ok(Self {
            strips,
            paytable,
            timing: config.timing.clone(),
            rng,
            account: GameAccount::new(&config),
            config,
            state: GameState::Idle,
            generation: 0,
            scheduler: Scheduler::new(),
            started: false,
            auto_spin: false,
            muted: false,
            stats_open: false,
            controls: Controls::default(),
            message: (String::new(), MessageTone::Neutral),
            reels_spinning: 0,
            current_spin: None,
            last_result: None,
            spin_count: 0,
            last_spin_press: None,
            forced_stops: VecDeque::new(),
            outbox: VecDeque::new(),
            outbox_overflowed: false,
            sinks: Vec::new(),
            backdrop: Box::new(NullBackdrop),
        })
    }

    /// Classic cabinet
    pub fn classic() -> SlotResult<Self> {
        Self::new(GameConfig::default())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Register a stage consumer
    pub fn add_sink(&mut self, sink: Box<dyn StageSink>) {
        log::debug!("Registered stage sink '{}'", sink.name());
        self.sinks.push(sink);
    }

    pub fn with_sink(mut self, sink: Box<dyn StageSink>) -> Self {
        self.add_sink(sink);
        self
    }

    pub fn set_backdrop(&mut self, backdrop: Box<dyn Backdrop>) {
        self.backdrop = backdrop;
    }

    /// Set timing profile; applies to timers scheduled from now on
    pub fn set_timing(&mut self, profile: TimingProfile) {
        self.timing = TimingConfig::from_profile(profile);
    }

    pub fn set_timing_config(&mut self, timing: TimingConfig) {
        self.timing = timing;
    }

    /// Seed RNG for reproducible results
    pub fn seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Replace the next random draw with explicit stops
    pub fn queue_forced_stops(&mut self, stops: impl Into<ForcedStops>) -> SlotResult<()> {
        let stops = stops.into();
        stops.validate(&self.strips)?;
        self.forced_stops.push_back(stops);
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Machine clock in milliseconds
    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    /// When the next timer is due, if any
    pub fn next_deadline(&self) -> Option<u64> {
        self.scheduler.next_deadline()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn account(&self) -> &GameAccount {
        &self.account
    }

    pub fn credits(&self) -> u64 {
        self.account.credits()
    }

    pub fn current_bet(&self) -> u64 {
        self.account.current_bet()
    }

    pub fn bet_index(&self) -> usize {
        self.account.bet_index()
    }

    pub fn stats(&self) -> &SessionStats {
        self.account.stats()
    }

    pub fn is_auto_spin(&self) -> bool {
        self.auto_spin
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_stats_open(&self) -> bool {
        self.stats_open
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    /// Current message text and tone
    pub fn message(&self) -> (&str, MessageTone) {
        (&self.message.0, self.message.1)
    }

    /// Round in flight
    pub fn current_spin(&self) -> Option<&SpinResult> {
        self.current_spin.as_ref()
    }

    /// Most recent finished round
    pub fn last_result(&self) -> Option<&SpinResult> {
        self.last_result.as_ref()
    }

    pub fn strips(&self) -> &[ReelStrip] {
        &self.strips
    }

    pub fn paytable(&self) -> &PayTable {
        &self.paytable
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// Take every stage emitted since the last drain
    ///
    /// Only the newest [`OUTBOX_CAPACITY`] stages are kept. Hosts that read
    /// stages through sinks alone never need to drain.
    pub fn drain_stages(&mut self) -> Vec<StageEvent> {
        self.outbox_overflowed = false;
        self.outbox.drain(..).collect()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // HOST ENTRY POINTS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Publish the account and enter IDLE; later calls do nothing
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        log::info!(
            "{} ready: {} credits, bet {}",
            self.config.name,
            self.account.credits(),
            self.account.current_bet()
        );
        self.emit(Stage::CreditsChanged {
            credits: self.account.credits(),
        });
        self.emit_bet();
        self.set_state(GameState::Idle);
    }

    /// Apply a player action; returns false when the current state ignores it
    pub fn handle_action(&mut self, action: PlayerAction) -> bool {
        self.start();
        log::debug!("Action {:?} in {}", action, self.state);

        match action {
            PlayerAction::Spin => self.press_spin(),
            PlayerAction::BetUp => self.change_bet(true),
            PlayerAction::BetDown => self.change_bet(false),
            PlayerAction::ToggleAutoSpin => self.toggle_auto_spin(),
            PlayerAction::ToggleMute => {
                self.muted = !self.muted;
                self.emit(Stage::MuteChanged { muted: self.muted });
                self.emit(Stage::ControlPressed {
                    control: ControlId::Mute { muted: self.muted },
                });
                true
            }
            PlayerAction::OpenStats => {
                self.stats_open = true;
                self.emit(Stage::ControlPressed {
                    control: ControlId::StatsOpen,
                });
                self.emit(Stage::StatsShown {
                    stats: self.account.stats().snapshot(),
                });
                true
            }
            PlayerAction::CloseStats => {
                self.stats_open = false;
                self.emit(Stage::ControlPressed {
                    control: ControlId::StatsClose,
                });
                self.emit(Stage::StatsClosed);
                true
            }
            PlayerAction::Restart => {
                self.restart();
                true
            }
        }
    }

    /// Move the clock forward, firing every timer that comes due
    ///
    /// Returns how many timers fired, stale ones included.
    pub fn advance(&mut self, elapsed_ms: u64) -> usize {
        self.start();
        let until = self.scheduler.now().saturating_add(elapsed_ms);
        let mut fired = 0;

        while fired < MAX_FIRES_PER_ADVANCE {
            let Some(timer) = self.scheduler.pop_due(until) else {
                break;
            };
            fired += 1;
            self.fire(timer);
        }

        let truncated = self.scheduler.next_deadline().is_some_and(|due| due <= until);
        if truncated {
            log::warn!(
                "Timer budget of {} exhausted at {}ms; remaining timers fire on the next advance",
                MAX_FIRES_PER_ADVANCE,
                self.scheduler.now()
            );
        } else {
            self.scheduler.set_now(until);
        }

        self.backdrop.tick(self.scheduler.now());
        fired
    }

    /// Jump from deadline to deadline until nothing is pending, `limit_ms`
    /// has passed or [`MAX_FIRES_PER_ADVANCE`] timers have fired; returns the
    /// elapsed time
    ///
    /// Auto-spin on zero-delay timing re-arms at the same instant forever, so
    /// the fire budget is what ends such a run.
    pub fn run_until_settled(&mut self, limit_ms: u64) -> u64 {
        self.start();
        let started_at = self.scheduler.now();
        let limit = started_at.saturating_add(limit_ms);
        let mut fired = 0;

        while let Some(deadline) = self.scheduler.next_deadline() {
            if deadline > limit {
                break;
            }
            if fired >= MAX_FIRES_PER_ADVANCE {
                log::warn!(
                    "Stopped settling after {} timers at {}ms with {} still pending",
                    fired,
                    self.scheduler.now(),
                    self.scheduler.pending()
                );
                break;
            }
            fired += self.advance(deadline.saturating_sub(self.scheduler.now()));
        }
        self.scheduler.now() - started_at
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // STATE MACHINE CORE
    // ═══════════════════════════════════════════════════════════════════════════

    fn set_state(&mut self, next: GameState) {
        let cancelled = self.scheduler.cancel_all();
        self.generation += 1;
        log::debug!(
            "State transition: {} -> {} (gen {}, {} timers cancelled)",
            self.state,
            next,
            self.generation,
            cancelled
        );
        self.state = next;
        self.backdrop.on_state(next);
        self.emit(Stage::StateEntered { state: next });

        match next {
            GameState::Idle => self.enter_idle(),
            GameState::Spinning => self.enter_spinning(),
            GameState::Stopping => self.enter_stopping(),
            GameState::Evaluating => self.enter_evaluating(),
            GameState::WinCelebration => self.enter_win_celebration(),
            GameState::NoWinDisplay => self.enter_no_win(),
            GameState::GameOver => self.enter_game_over(),
        }
    }

    fn fire(&mut self, timer: Timer) {
        if timer.generation != self.generation {
            log::trace!(
                "Dropping stale {:?} (gen {} != {})",
                timer.kind,
                timer.generation,
                self.generation
            );
            return;
        }

        match timer.kind {
            TimerKind::AutoSpin => {
                if self.state == GameState::Idle {
                    self.set_state(GameState::Spinning);
                }
            }
            TimerKind::ReelStop { reel } => self.on_reel_stop(reel as usize),
            TimerKind::AllReelsStopped => {
                if self.state == GameState::Spinning {
                    self.set_state(GameState::Stopping);
                }
            }
            TimerKind::Settle => {
                if self.state == GameState::Stopping {
                    self.set_state(GameState::Evaluating);
                }
            }
            TimerKind::RoundComplete => self.complete_round(),
            TimerKind::ReturnToIdle => self.set_state(GameState::Idle),
        }
    }

    fn schedule(&mut self, delay_ms: u64, kind: TimerKind) {
        self.scheduler.schedule(delay_ms, kind, self.generation);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // STATE HANDLERS
    // ═══════════════════════════════════════════════════════════════════════════

    fn enter_idle(&mut self) {
        if !self.account.can_afford_min_bet() {
            self.set_state(GameState::GameOver);
            return;
        }

        self.publish_controls(self.idle_controls());
        self.set_message("Press Spin!", MessageTone::Neutral);
        self.emit(Stage::ClearHighlights);

        if self.auto_spin {
            self.schedule(self.timing.auto_spin_delay_ms, TimerKind::AutoSpin);
        }
    }

    fn enter_spinning(&mut self) {
        let bet = self.account.current_bet();
        if let Err(err) = self.account.deduct_bet() {
            log::info!("Spin refused: {err}");
            self.emit(Stage::InsufficientCredits {
                credits: self.account.credits(),
                bet,
            });
            self.set_message("NOT ENOUGH CREDITS!", MessageTone::Lose);
            self.disable_auto_spin();
            self.publish_controls(Controls::round_in_flight());
            self.schedule(self.timing.insufficient_credits_ms, TimerKind::ReturnToIdle);
            return;
        }

        self.spin_count += 1;
        let spin_id = format!("spin-{:06}", self.spin_count);
        let stops = self.draw_stops();
        self.current_spin = Some(SpinResult::new(spin_id.clone(), bet, stops));

        self.emit(Stage::CreditsChanged {
            credits: self.account.credits(),
        });
        self.publish_controls(Controls::round_in_flight());
        self.set_message("SPINNING...", MessageTone::Neutral);
        self.emit(Stage::ClearHighlights);
        self.emit(Stage::SpinStart { spin_id, bet });

        self.reels_spinning = REEL_COUNT;
        for (reel, &stop_index) in stops.iter().enumerate() {
            let jitter = match self.timing.reel_spin_jitter_ms {
                0 => 0,
                range => self.rng.random_range(0..range),
            };
            let duration_ms = self.timing.reel_spin_duration(reel) + jitter;
            let target_offset = reel_target_offset(
                self.config.reel_repeat_count,
                self.strips[reel].len(),
                stop_index,
            );

            self.emit(Stage::ReelSpinning {
                reel_index: reel as u8,
                stop_index,
                target_offset,
                duration_ms,
            });
            self.schedule(duration_ms, TimerKind::ReelStop { reel: reel as u8 });
        }
    }

    fn on_reel_stop(&mut self, reel: usize) {
        if self.state != GameState::Spinning || self.reels_spinning == 0 {
            return;
        }
        self.reels_spinning -= 1;
        let is_last = self.reels_spinning == 0;

        let symbols: Vec<String> = self
            .current_spin
            .as_ref()
            .and_then(|spin| self.strips.get(reel)?.window(spin.stops[reel]).ok())
            .map(|window| window.iter().map(|s| s.glyph().to_string()).collect())
            .unwrap_or_default();

        self.emit(Stage::ReelStop {
            reel_index: reel as u8,
            is_last,
            symbols,
        });

        if is_last {
            self.schedule(self.timing.state_transition_ms, TimerKind::AllReelsStopped);
        }
    }

    fn enter_stopping(&mut self) {
        self.set_message("CHECKING...", MessageTone::Neutral);
        self.schedule(self.timing.state_transition_ms, TimerKind::Settle);
    }

    fn enter_evaluating(&mut self) {
        self.emit(Stage::EvaluateWins);

        let next = match self.current_spin.as_mut() {
            Some(spin) => match self.paytable.evaluate(&self.strips, &spin.stops, spin.bet) {
                Ok(evaluation) => {
                    let won = evaluation.is_win();
                    spin.evaluation = Some(evaluation);
                    if won {
                        GameState::WinCelebration
                    } else {
                        GameState::NoWinDisplay
                    }
                }
                Err(err) => {
                    log::warn!("Evaluation of {} failed: {err}", spin.spin_id);
                    GameState::NoWinDisplay
                }
            },
            None => {
                log::warn!("EVALUATING entered without a spin");
                GameState::NoWinDisplay
            }
        };

        self.set_state(next);
    }

    fn enter_win_celebration(&mut self) {
        let Some(evaluation) = self
            .current_spin
            .as_ref()
            .and_then(|spin| spin.evaluation.clone())
        else {
            log::warn!("WIN_CELEBRATION entered without an evaluation");
            self.schedule(self.timing.win_celebration_ms, TimerKind::RoundComplete);
            return;
        };

        let win = evaluation.total_win;
        self.account.credit_win(win);
        log::info!(
            "Win {} on {} line(s), credits {}",
            win,
            evaluation.win_count(),
            self.account.credits()
        );

        self.set_message(format!("WIN! +{win}"), MessageTone::Win);
        self.emit(Stage::CreditsChanged {
            credits: self.account.credits(),
        });
        self.emit(Stage::WinPresent {
            win_amount: win,
            line_count: evaluation.win_count() as u8,
            positions: evaluation.winning_positions.iter().copied().collect(),
        });
        for line_win in &evaluation.line_wins {
            self.emit(Stage::WinLineShow {
                line_index: line_win.line.index(),
                line_amount: line_win.win_amount,
            });
        }

        self.schedule(self.timing.win_celebration_ms, TimerKind::RoundComplete);
    }

    fn enter_no_win(&mut self) {
        self.set_message("NO WIN! TRY AGAIN.", MessageTone::Lose);
        self.emit(Stage::NoWin);
        self.schedule(self.timing.no_win_display_ms, TimerKind::RoundComplete);
    }

    fn enter_game_over(&mut self) {
        log::info!(
            "Game over after {} spins with {} credits",
            self.account.stats().total_spins,
            self.account.credits()
        );
        self.set_message("GAME OVER", MessageTone::Lose);
        self.emit(Stage::GameOver);
        self.disable_auto_spin();
        self.publish_controls(Controls::game_over());
    }

    /// Result display finished: archive the round and pick the next state
    fn complete_round(&mut self) {
        let was_win = self.state == GameState::WinCelebration;
        let win_amount = self.current_spin.as_ref().map_or(0, SpinResult::win_amount);

        if was_win {
            self.emit(Stage::ClearHighlights);
        }
        self.emit(Stage::SpinEnd { win_amount });
        if let Some(spin) = self.current_spin.take() {
            log::debug!(
                "{} finished: stops {:?}, win {}",
                spin.spin_id,
                spin.stops,
                win_amount
            );
            self.last_result = Some(spin);
        }

        if self.auto_spin && self.account.can_afford_bet() {
            self.set_state(GameState::Spinning);
        } else {
            if self.auto_spin {
                log::info!(
                    "Auto-spin stopped: bet {} exceeds credits",
                    self.account.current_bet()
                );
                self.disable_auto_spin();
            }
            self.set_state(GameState::Idle);
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ACTIONS
    // ═══════════════════════════════════════════════════════════════════════════

    fn press_spin(&mut self) -> bool {
        if self.state != GameState::Idle {
            return false;
        }
        let now = self.scheduler.now();
        if let Some(last) = self.last_spin_press {
            if now.saturating_sub(last) < self.timing.spin_debounce_ms {
                log::debug!("Spin press debounced ({}ms after previous)", now - last);
                return false;
            }
        }
        self.last_spin_press = Some(now);
        self.set_state(GameState::Spinning);
        true
    }

    fn change_bet(&mut self, up: bool) -> bool {
        if self.state != GameState::Idle {
            return false;
        }
        // Same gate as the bet-up affordance: never raise past the credits
        if up && !self.account.can_raise_bet() {
            return false;
        }
        self.emit(Stage::ControlPressed {
            control: if up { ControlId::BetUp } else { ControlId::BetDown },
        });
        self.disable_auto_spin();

        let changed = if up {
            self.account.raise_bet()
        } else {
            self.account.lower_bet()
        };
        if changed {
            self.emit_bet();
        }
        self.publish_controls(self.idle_controls());
        true
    }

    fn toggle_auto_spin(&mut self) -> bool {
        if self.state == GameState::GameOver {
            return false;
        }
        self.auto_spin = !self.auto_spin;
        self.emit(Stage::AutoSpinChanged {
            enabled: self.auto_spin,
        });
        self.emit(Stage::ControlPressed {
            control: ControlId::AutoSpin {
                enabled: self.auto_spin,
            },
        });

        if !self.auto_spin {
            self.scheduler.cancel_kind(TimerKind::AutoSpin);
        } else if self.state == GameState::Idle {
            self.set_state(GameState::Spinning);
        }
        true
    }

    fn restart(&mut self) {
        let cancelled = self.scheduler.cancel_all();
        log::info!("Restart from {} ({} timers cancelled)", self.state, cancelled);

        self.emit(Stage::ControlPressed {
            control: ControlId::Restart,
        });
        self.account.reset();
        self.reels_spinning = 0;
        self.current_spin = None;
        self.last_spin_press = None;
        self.disable_auto_spin();

        self.emit(Stage::ClearHighlights);
        self.emit(Stage::Restart);
        self.emit(Stage::CreditsChanged {
            credits: self.account.credits(),
        });
        self.emit_bet();
        self.set_state(GameState::Idle);
    }

    /// Force auto-spin off, dropping a pending auto trigger
    fn disable_auto_spin(&mut self) {
        if !self.auto_spin {
            return;
        }
        self.auto_spin = false;
        self.scheduler.cancel_kind(TimerKind::AutoSpin);
        self.emit(Stage::AutoSpinChanged { enabled: false });
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // HELPERS
    // ═══════════════════════════════════════════════════════════════════════════

    fn draw_stops(&mut self) -> [usize; REEL_COUNT] {
        if let Some(forced) = self.forced_stops.pop_front() {
            log::debug!("Using forced stops {:?}", forced.0);
            return forced.0;
        }
        let mut stops = [0; REEL_COUNT];
        for (stop, strip) in stops.iter_mut().zip(&self.strips) {
            *stop = self.rng.random_range(0..strip.len());
        }
        stops
    }

    fn idle_controls(&self) -> Controls {
        Controls {
            spin_visible: true,
            spin_enabled: true,
            restart_visible: false,
            auto_enabled: true,
            bet_up_enabled: self.account.can_raise_bet(),
            bet_down_enabled: self.account.can_lower_bet(),
        }
    }

    fn publish_controls(&mut self, controls: Controls) {
        self.controls = controls;
        self.emit(Stage::ControlsChanged { controls });
    }

    fn set_message(&mut self, text: impl Into<String>, tone: MessageTone) {
        let text = text.into();
        self.message = (text.clone(), tone);
        self.emit(Stage::Message { text, tone });
    }

    fn emit_bet(&mut self) {
        self.emit(Stage::BetChanged {
            bet: self.account.current_bet(),
            bet_index: self.account.bet_index(),
        });
    }

    fn emit(&mut self, stage: Stage) {
        let mut builder = StageEventBuilder::new(stage)
            .timestamp(self.scheduler.now())
            .generation(self.generation)
            .spin(self.current_spin.as_ref().map(|s| s.spin_id.clone()));
        if self.auto_spin {
            builder = builder.tag(AUTO_SPIN_TAG);
        }
        let event = builder.build();

        for sink in &mut self.sinks {
            if let Err(err) = sink.on_stage(&event) {
                log::warn!(
                    "Stage sink '{}' failed on {}: {err}",
                    sink.name(),
                    event.type_name()
                );
            }
        }
        if self.outbox.len() >= OUTBOX_CAPACITY {
            self.outbox.pop_front();
            if !self.outbox_overflowed {
                self.outbox_overflowed = true;
                log::warn!(
                    "Stage outbox full ({} undrained), dropping oldest stages",
                    OUTBOX_CAPACITY
                );
            }
        }
        self.outbox.push_back(event);
    }
}
