//! Console cabinet
//!
//! Folds stage events into a small text model of the cabinet and draws it as
//! a frame of plain lines. Knows nothing about the machine itself.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use rf_stage::{Cell, MessageTone, Stage, StageEvent, StatsSnapshot};

const ROWS: usize = 3;
const REELS: usize = 3;
const SPINNING_GLYPH: &str = "··";

/// Text model of the cabinet
#[derive(Debug, Clone)]
pub struct ConsoleRenderer {
    reels: [[String; ROWS]; REELS],
    highlights: BTreeSet<Cell>,
    credits: u64,
    bet: u64,
    message: String,
    tone: MessageTone,
    auto_spin: bool,
    muted: bool,
}

impl Default for ConsoleRenderer {
    fn default() -> Self {
        Self {
            reels: std::array::from_fn(|_| std::array::from_fn(|_| SPINNING_GLYPH.to_string())),
            highlights: BTreeSet::new(),
            credits: 0,
            bet: 0,
            message: String::new(),
            tone: MessageTone::Neutral,
            auto_spin: false,
            muted: false,
        }
    }
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event in; returns true when the frame should be redrawn
    pub fn apply(&mut self, event: &StageEvent) -> bool {
        match &event.stage {
            Stage::ReelSpinning { reel_index, .. } => {
                if let Some(column) = self.reels.get_mut(*reel_index as usize) {
                    column.iter_mut().for_each(|cell| *cell = SPINNING_GLYPH.to_string());
                }
                false
            }
            Stage::ReelStop {
                reel_index,
                symbols,
                ..
            } => {
                if let Some(column) = self.reels.get_mut(*reel_index as usize) {
                    for (cell, glyph) in column.iter_mut().zip(symbols) {
                        cell.clone_from(glyph);
                    }
                }
                true
            }
            Stage::WinPresent { positions, .. } => {
                self.highlights.extend(positions.iter().copied());
                true
            }
            Stage::ClearHighlights => {
                self.highlights.clear();
                false
            }
            Stage::CreditsChanged { credits } => {
                self.credits = *credits;
                false
            }
            Stage::BetChanged { bet, .. } => {
                self.bet = *bet;
                true
            }
            Stage::Message { text, tone } => {
                self.message.clone_from(text);
                self.tone = *tone;
                true
            }
            Stage::AutoSpinChanged { enabled } => {
                self.auto_spin = *enabled;
                true
            }
            Stage::MuteChanged { muted } => {
                self.muted = *muted;
                true
            }
            _ => false,
        }
    }

    pub fn credits(&self) -> u64 {
        self.credits
    }

    /// Current cabinet as text
    pub fn frame(&self) -> String {
        let mut out = String::new();
        for row in 0..ROWS {
            out.push(' ');
            for (reel, column) in self.reels.iter().enumerate() {
                let glyph = &column[row];
                if self.highlights.contains(&Cell::new(reel as u8, row as u8)) {
                    let _ = write!(out, " [{glyph}]");
                } else {
                    let _ = write!(out, "  {glyph} ");
                }
            }
            out.push('\n');
        }

        let mut flags = Vec::new();
        if self.auto_spin {
            flags.push("AUTO");
        }
        if self.muted {
            flags.push("MUTED");
        }
        let _ = writeln!(
            out,
            " CREDITS {:<6} BET {:<5} {}",
            self.credits,
            self.bet,
            flags.join(" ")
        );
        let marker = match self.tone {
            MessageTone::Neutral => ' ',
            MessageTone::Win => '+',
            MessageTone::Lose => '-',
        };
        let _ = writeln!(out, " {marker} {}", self.message);
        out
    }
}

/// Stats panel
pub fn format_stats(stats: &StatsSnapshot) -> String {
    format!(
        " Total spins   {}\n Wins          {}\n Win rate      {:.1}%\n Total won     {}\n Biggest win   {}\n",
        stats.total_spins, stats.wins, stats.win_rate, stats.total_winnings, stats.biggest_win
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(stage: Stage) -> StageEvent {
        StageEvent::new(stage, 0)
    }

    fn glyphs(symbols: &[&str]) -> Vec<String> {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_reel_stop_fills_column() {
        let mut renderer = ConsoleRenderer::new();
        assert!(renderer.apply(&event(Stage::ReelStop {
            reel_index: 1,
            is_last: false,
            symbols: glyphs(&["🍋", "🍒", "⭐"]),
        })));
        let frame = renderer.frame();
        let lines: Vec<&str> = frame.lines().collect();
        assert!(lines[0].contains("🍋"));
        assert!(lines[1].contains("🍒"));
        assert!(lines[2].contains("⭐"));
    }

    #[test]
    fn test_highlights_until_cleared() {
        let mut renderer = ConsoleRenderer::new();
        for reel_index in 0..3 {
            renderer.apply(&event(Stage::ReelStop {
                reel_index,
                is_last: reel_index == 2,
                symbols: glyphs(&["🍋", "🍒", "⭐"]),
            }));
        }
        renderer.apply(&event(Stage::WinPresent {
            win_amount: 50,
            line_count: 1,
            positions: vec![Cell::new(0, 1), Cell::new(1, 1), Cell::new(2, 1)],
        }));
        assert_eq!(renderer.frame().matches("[🍒]").count(), 3);

        renderer.apply(&event(Stage::ClearHighlights));
        assert_eq!(renderer.frame().matches('[').count(), 0);
    }

    #[test]
    fn test_status_line() {
        let mut renderer = ConsoleRenderer::new();
        renderer.apply(&event(Stage::CreditsChanged { credits: 95 }));
        renderer.apply(&event(Stage::BetChanged { bet: 5, bet_index: 1 }));
        renderer.apply(&event(Stage::AutoSpinChanged { enabled: true }));
        renderer.apply(&event(Stage::Message {
            text: "NO WIN! TRY AGAIN.".into(),
            tone: MessageTone::Lose,
        }));

        let frame = renderer.frame();
        assert!(frame.contains("CREDITS 95"));
        assert!(frame.contains("AUTO"));
        assert!(frame.contains("- NO WIN! TRY AGAIN."));
        assert_eq!(renderer.credits(), 95);
    }

    #[test]
    fn test_stats_panel() {
        let text = format_stats(&StatsSnapshot {
            total_spins: 4,
            wins: 1,
            total_winnings: 50,
            biggest_win: 50,
            win_rate: 25.0,
        });
        assert!(text.contains("25.0%"));
        assert!(text.contains("Biggest win   50"));
    }
}
