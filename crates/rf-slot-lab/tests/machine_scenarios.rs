//! End-to-end rounds through the public machine API

use std::sync::Arc;

use parking_lot::Mutex;
use rf_slot_lab::{
    AudioBackend, AudioCueMapper, GameConfig, PlayerAction, SlotMachine, SoundRequest,
    TimingConfig,
};
use rf_stage::{Cell, ControlId, Controls, GameState, MessageTone, SinkError, Stage, StageEvent};

/// Middle row 🍒🍒🍒
const CHERRY_TRIPLE: [usize; 3] = [12, 6, 0];
/// Middle row 🍒🍒⭐
const CHERRY_PAIR: [usize; 3] = [6, 6, 1];
/// Nothing pays
const LOSING: [usize; 3] = [3, 9, 7];

fn machine(config: GameConfig) -> SlotMachine {
    let mut machine = SlotMachine::new(config).unwrap();
    machine.start();
    machine
}

fn stages_of(events: &[StageEvent], type_name: &str) -> Vec<Stage> {
    events
        .iter()
        .filter(|e| e.type_name() == type_name)
        .map(|e| e.stage.clone())
        .collect()
}

#[derive(Clone, Default)]
struct SharedBackend(Arc<Mutex<Vec<SoundRequest>>>);

impl AudioBackend for SharedBackend {
    fn play(&mut self, request: &SoundRequest) -> Result<(), SinkError> {
        self.0.lock().push(request.clone());
        Ok(())
    }
}

#[test]
fn cherry_triple_pays_fifty_at_bet_five() {
    let mut machine = machine(GameConfig::instant());
    machine.queue_forced_stops(CHERRY_TRIPLE).unwrap();
    machine.handle_action(PlayerAction::Spin);
    machine.run_until_settled(1_000);

    let events = machine.drain_stages();
    let win = stages_of(&events, "win_present");
    assert_eq!(
        win,
        vec![Stage::WinPresent {
            win_amount: 50,
            line_count: 1,
            positions: vec![Cell::new(0, 1), Cell::new(1, 1), Cell::new(2, 1)],
        }]
    );
    assert_eq!(
        stages_of(&events, "win_line_show"),
        vec![Stage::WinLineShow {
            line_index: 1,
            line_amount: 50,
        }]
    );

    let stops = stages_of(&events, "reel_stop");
    let symbols: Vec<Vec<String>> = stops
        .into_iter()
        .map(|s| match s {
            Stage::ReelStop { symbols, .. } => symbols,
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(symbols[0], vec!["🍋", "🍒", "🍒"]);
    assert_eq!(symbols[1], vec!["🍋", "🍒", "⭐"]);
    assert_eq!(symbols[2], vec!["7️⃣", "🍒", "⭐"]);

    assert_eq!(machine.credits(), 100 - 5 + 50);
    assert_eq!(machine.state(), GameState::Idle);
}

#[test]
fn cherry_pair_highlights_first_two_cells() {
    let mut machine = machine(GameConfig::instant());
    machine.queue_forced_stops(CHERRY_PAIR).unwrap();
    machine.handle_action(PlayerAction::Spin);
    machine.run_until_settled(1_000);

    let events = machine.drain_stages();
    assert_eq!(
        stages_of(&events, "win_present"),
        vec![Stage::WinPresent {
            win_amount: 10,
            line_count: 1,
            positions: vec![Cell::new(0, 1), Cell::new(1, 1)],
        }]
    );
    assert!(events.iter().any(|e| e.stage
        == Stage::Message {
            text: "WIN! +10".into(),
            tone: MessageTone::Win,
        }));
}

#[test]
fn insufficient_credits_refuses_without_deduction() {
    let mut config = GameConfig::default().with_credits(3);
    config.timing = TimingConfig::normal();
    let mut machine = machine(config);
    assert_eq!(machine.current_bet(), 5);

    assert!(machine.handle_action(PlayerAction::Spin));
    assert_eq!(machine.state(), GameState::Spinning);
    assert_eq!(machine.message(), ("NOT ENOUGH CREDITS!", MessageTone::Lose));
    assert_eq!(machine.credits(), 3);
    assert_eq!(machine.stats().total_spins, 0);

    let events = machine.drain_stages();
    assert!(stages_of(&events, "spin_start").is_empty());
    assert_eq!(
        stages_of(&events, "insufficient_credits"),
        vec![Stage::InsufficientCredits { credits: 3, bet: 5 }]
    );

    machine.advance(1_999);
    assert_eq!(machine.state(), GameState::Spinning);
    machine.advance(1);
    assert_eq!(machine.state(), GameState::Idle);
    assert_eq!(machine.credits(), 3);
    assert_eq!(machine.stats().total_spins, 0);
}

#[test]
fn losing_last_credits_enters_game_over() {
    let mut machine = machine(GameConfig::instant().with_credits(5));
    machine.queue_forced_stops(LOSING).unwrap();
    machine.handle_action(PlayerAction::Spin);
    machine.run_until_settled(1_000);

    assert_eq!(machine.credits(), 0);
    assert_eq!(machine.state(), GameState::GameOver);
    assert_eq!(machine.controls(), Controls::game_over());
    assert_eq!(machine.message().0, "GAME OVER");

    assert!(!machine.handle_action(PlayerAction::Spin));
    assert!(!machine.handle_action(PlayerAction::BetDown));
    assert!(!machine.handle_action(PlayerAction::ToggleAutoSpin));
    assert_eq!(machine.state(), GameState::GameOver);

    assert!(machine.handle_action(PlayerAction::Restart));
    assert_eq!(machine.state(), GameState::Idle);
    assert_eq!(machine.credits(), 5);
    assert_eq!(machine.current_bet(), 5);
    assert_eq!(machine.stats().total_spins, 0);
}

#[test]
fn empty_account_starts_in_game_over() {
    let machine = machine(GameConfig::instant().with_credits(0));
    assert_eq!(machine.state(), GameState::GameOver);
    assert!(machine.controls().restart_visible);
}

#[test]
fn auto_spin_losing_streak_stops_when_unaffordable() {
    let mut machine = machine(GameConfig::instant().with_credits(12));
    for _ in 0..10 {
        machine.queue_forced_stops(LOSING).unwrap();
    }
    machine.drain_stages();

    assert!(machine.handle_action(PlayerAction::ToggleAutoSpin));
    assert_eq!(machine.state(), GameState::Spinning);
    machine.run_until_settled(60_000);

    // 12 → 7 → 2, then the 5 bet is no longer affordable
    assert_eq!(machine.stats().total_spins, 2);
    assert_eq!(machine.credits(), 2);
    assert!(!machine.is_auto_spin());
    assert_eq!(machine.state(), GameState::Idle);

    let events = machine.drain_stages();
    assert_eq!(
        stages_of(&events, "auto_spin_changed"),
        vec![
            Stage::AutoSpinChanged { enabled: true },
            Stage::AutoSpinChanged { enabled: false },
        ]
    );
    assert_eq!(stages_of(&events, "no_win").len(), 2);
}

#[test]
fn auto_spin_to_zero_lands_in_game_over() {
    let mut machine = machine(GameConfig::instant().with_credits(10));
    for _ in 0..10 {
        machine.queue_forced_stops(LOSING).unwrap();
    }
    machine.handle_action(PlayerAction::ToggleAutoSpin);
    machine.run_until_settled(60_000);

    assert_eq!(machine.credits(), 0);
    assert_eq!(machine.stats().total_spins, 2);
    assert!(!machine.is_auto_spin());
    assert_eq!(machine.state(), GameState::GameOver);
}

#[test]
fn auto_spin_enabled_mid_round_chains_next_round() {
    let mut machine = machine(GameConfig::default().with_seed(3));
    machine.queue_forced_stops(LOSING).unwrap();
    machine.handle_action(PlayerAction::Spin);
    machine.handle_action(PlayerAction::ToggleAutoSpin);

    // Turning auto on mid-round does not start a second round
    assert_eq!(machine.stats().total_spins, 1);

    // Reels, settle and the loss display
    while machine.state() != GameState::NoWinDisplay {
        let deadline = machine.next_deadline().unwrap();
        machine.advance(deadline - machine.now());
    }
    machine.advance(1_500);

    // Loss display ends straight in SPINNING
    assert_eq!(machine.state(), GameState::Spinning);
    assert_eq!(machine.stats().total_spins, 2);
}

#[test]
fn auto_spin_off_lets_round_finish() {
    let mut machine = machine(GameConfig::instant());
    machine.queue_forced_stops(LOSING).unwrap();
    machine.handle_action(PlayerAction::ToggleAutoSpin);
    assert_eq!(machine.state(), GameState::Spinning);

    machine.handle_action(PlayerAction::ToggleAutoSpin);
    assert!(machine.pending_timers() > 0);
    machine.run_until_settled(1_000);

    assert_eq!(machine.state(), GameState::Idle);
    assert_eq!(machine.stats().total_spins, 1);
}

#[test]
fn bet_tracks_ladder_through_any_sequence() {
    let mut machine = machine(GameConfig::instant().with_credits(1_000_000));
    let ladder = machine.config().bet_amounts.clone();
    let actions = [
        PlayerAction::BetUp,
        PlayerAction::BetUp,
        PlayerAction::BetDown,
        PlayerAction::BetUp,
        PlayerAction::BetUp,
        PlayerAction::BetUp,
        PlayerAction::BetUp,
        PlayerAction::BetUp,
        PlayerAction::BetUp,
        PlayerAction::BetUp,
        PlayerAction::BetUp,
        PlayerAction::Restart,
        PlayerAction::BetDown,
        PlayerAction::BetDown,
        PlayerAction::BetDown,
    ];

    for action in actions {
        machine.handle_action(action);
        assert!(machine.bet_index() < ladder.len());
        assert_eq!(machine.current_bet(), ladder[machine.bet_index()]);
    }
    assert_eq!(machine.bet_index(), 0);
    assert!(!machine.controls().bet_down_enabled);

    let events = machine.drain_stages();
    for stage in stages_of(&events, "bet_changed") {
        if let Stage::BetChanged { bet, bet_index } = stage {
            assert_eq!(bet, ladder[bet_index]);
        }
    }
}

#[test]
fn bet_up_affordance_follows_credits() {
    let mut machine = machine(GameConfig::instant().with_credits(9));
    // 10 is the next rung and exceeds 9 credits
    assert!(!machine.controls().bet_up_enabled);
    assert!(machine.controls().bet_down_enabled);
    assert!(!machine.handle_action(PlayerAction::BetUp));
    assert_eq!(machine.current_bet(), 5);

    // The refused press leaves a spin at the old bet possible
    machine.queue_forced_stops(LOSING).unwrap();
    assert!(machine.handle_action(PlayerAction::Spin));
    machine.run_until_settled(1_000);
    assert_eq!(machine.credits(), 4);
    assert!(!machine.controls().bet_up_enabled);
    machine.handle_action(PlayerAction::BetDown);
    assert!(machine.controls().bet_up_enabled);
}

#[test]
fn bet_changes_outside_idle_are_ignored() {
    let mut machine = machine(GameConfig::instant());
    machine.queue_forced_stops(LOSING).unwrap();
    machine.handle_action(PlayerAction::Spin);
    machine.drain_stages();

    assert!(!machine.handle_action(PlayerAction::BetUp));
    assert!(!machine.handle_action(PlayerAction::BetDown));
    assert!(!machine.handle_action(PlayerAction::Spin));
    assert_eq!(machine.current_bet(), 5);
    assert!(machine.drain_stages().is_empty());
}

#[test]
fn restart_drops_in_flight_timers() {
    let mut machine = machine(GameConfig::default().with_seed(5));
    machine.queue_forced_stops(CHERRY_TRIPLE).unwrap();
    machine.handle_action(PlayerAction::Spin);
    machine.advance(1_000);
    assert_eq!(machine.state(), GameState::Spinning);
    let before = machine.generation();

    machine.handle_action(PlayerAction::Restart);
    assert!(machine.generation() > before);
    assert_eq!(machine.pending_timers(), 0);
    machine.drain_stages();

    machine.advance(20_000);
    let events = machine.drain_stages();
    assert!(events.is_empty(), "stale timers fired: {events:?}");
    assert_eq!(machine.state(), GameState::Idle);
    assert_eq!(machine.credits(), 100);
    assert_eq!(machine.stats().total_spins, 0);
}

#[test]
fn restart_during_win_celebration() {
    let mut machine = machine(GameConfig::default().with_seed(5));
    machine.queue_forced_stops(CHERRY_TRIPLE).unwrap();
    machine.handle_action(PlayerAction::Spin);
    while machine.state() != GameState::WinCelebration {
        let deadline = machine.next_deadline().unwrap();
        machine.advance(deadline - machine.now());
    }
    assert_eq!(machine.credits(), 145);

    machine.handle_action(PlayerAction::Restart);
    machine.advance(10_000);
    assert_eq!(machine.state(), GameState::Idle);
    assert_eq!(machine.credits(), 100);
    assert_eq!(machine.stats().wins, 0);
}

#[test]
fn rapid_spin_presses_are_debounced() {
    let mut config = GameConfig::instant();
    config.timing.spin_debounce_ms = 300;
    let mut machine = machine(config);
    for _ in 0..3 {
        machine.queue_forced_stops(LOSING).unwrap();
    }

    assert!(machine.handle_action(PlayerAction::Spin));
    machine.advance(0);
    assert_eq!(machine.state(), GameState::Idle);

    assert!(!machine.handle_action(PlayerAction::Spin));
    machine.advance(299);
    assert!(!machine.handle_action(PlayerAction::Spin));
    machine.advance(1);
    assert!(machine.handle_action(PlayerAction::Spin));
    assert_eq!(machine.stats().total_spins, 2);
}

#[test]
fn stats_panel_reports_snapshot() {
    let mut machine = machine(GameConfig::instant());
    machine.queue_forced_stops(CHERRY_TRIPLE).unwrap();
    machine.queue_forced_stops(LOSING).unwrap();
    for _ in 0..2 {
        machine.handle_action(PlayerAction::Spin);
        machine.run_until_settled(1_000);
    }
    machine.drain_stages();

    machine.handle_action(PlayerAction::OpenStats);
    assert!(machine.is_stats_open());
    let events = machine.drain_stages();
    let Some(Stage::StatsShown { stats }) = stages_of(&events, "stats_shown").pop() else {
        panic!("no stats snapshot");
    };
    assert_eq!(stats.total_spins, 2);
    assert_eq!(stats.wins, 1);
    assert_eq!(stats.total_winnings, 50);
    assert_eq!(stats.biggest_win, 50);
    assert!((stats.win_rate - 50.0).abs() < 1e-9);

    machine.handle_action(PlayerAction::CloseStats);
    assert!(!machine.is_stats_open());
    assert_eq!(
        stages_of(&machine.drain_stages(), "control_pressed"),
        vec![Stage::ControlPressed {
            control: ControlId::StatsClose
        }]
    );
}

#[test]
fn audio_follows_the_round() {
    let backend = SharedBackend::default();
    let played = Arc::clone(&backend.0);
    let mut machine = SlotMachine::new(GameConfig::instant())
        .unwrap()
        .with_sink(Box::new(AudioCueMapper::new(backend)));

    machine.queue_forced_stops(CHERRY_TRIPLE).unwrap();
    machine.handle_action(PlayerAction::Spin);
    machine.run_until_settled(1_000);

    let notes: Vec<String> = played.lock().iter().map(|r| r.notes.join("+")).collect();
    assert_eq!(
        notes,
        vec!["C4+E4+G4+C5", "C2", "C2", "G2", "C4+E4+G4", "E4+G4+B4", "G4+B4+D5"]
    );

    played.lock().clear();
    machine.handle_action(PlayerAction::ToggleMute);
    machine.queue_forced_stops(LOSING).unwrap();
    machine.handle_action(PlayerAction::Spin);
    machine.run_until_settled(1_000);
    assert!(played.lock().is_empty());
    assert!(machine.is_muted());
}

#[test]
fn malformed_config_is_rejected() {
    assert!(GameConfig::from_json(r#"{"strips": [[], ["cherry"], ["cherry"]]}"#).is_err());
    assert!(GameConfig::from_yaml("bet_amounts: [10, 5]\n").is_err());

    let mut config = GameConfig::default();
    config.starting_bet_index = 42;
    assert!(SlotMachine::new(config).is_err());
}
