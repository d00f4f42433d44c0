//! Interactive session on the real clock
//!
//! The main thread reads commands from stdin; a ticker thread moves the
//! machine clock along with wall time and draws whatever the machine emitted.
//! Both go through one [`SharedMachine`].

use std::io::{self, BufRead};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use rf_slot_lab::{PlayerAction, SharedMachine, SlotMachine};
use rf_stage::Stage;

use crate::render::{ConsoleRenderer, format_stats};

/// Ticker period
const TICK: Duration = Duration::from_millis(16);

const HELP: &str = "\
 <enter>/s  spin        +  bet up      -  bet down
 a          auto-spin   m  mute        i  stats     c  close stats
 r          restart     h  help        q  quit";

/// One line of player input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Action(PlayerAction),
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Option<Command> {
    let command = match line.trim().to_ascii_lowercase().as_str() {
        "" | "s" | "spin" => Command::Action(PlayerAction::Spin),
        "+" | "up" => Command::Action(PlayerAction::BetUp),
        "-" | "down" => Command::Action(PlayerAction::BetDown),
        "a" | "auto" => Command::Action(PlayerAction::ToggleAutoSpin),
        "m" | "mute" => Command::Action(PlayerAction::ToggleMute),
        "i" | "stats" => Command::Action(PlayerAction::OpenStats),
        "c" | "close" => Command::Action(PlayerAction::CloseStats),
        "r" | "restart" => Command::Action(PlayerAction::Restart),
        "h" | "?" | "help" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        _ => return None,
    };
    Some(command)
}

pub fn run(mut machine: SlotMachine) -> Result<()> {
    machine.start();
    let shared = SharedMachine::new(machine);
    let running = Arc::new(AtomicBool::new(true));

    println!("{HELP}\n");

    let ticker = {
        let shared = shared.clone();
        let running = Arc::clone(&running);
        thread::Builder::new()
            .name("slot-ticker".into())
            .spawn(move || tick_loop(&shared, &running))
            .context("failed to spawn ticker thread")?
    };

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        match parse_command(&line) {
            Some(Command::Quit) => break,
            Some(Command::Help) => println!("{HELP}"),
            Some(Command::Action(action)) => {
                if !shared.handle_action(action) {
                    log::debug!("{:?} ignored in {}", action, shared.state());
                }
            }
            None => println!(" unknown command '{}', h for help", line.trim()),
        }
    }

    running.store(false, Ordering::Relaxed);
    if ticker.join().is_err() {
        log::error!("Ticker thread panicked");
    }

    let stats = shared.with(|m| m.stats().snapshot());
    println!("\n{}", format_stats(&stats));
    Ok(())
}

fn tick_loop(shared: &SharedMachine, running: &AtomicBool) {
    let origin = Instant::now();
    let mut renderer = ConsoleRenderer::new();

    while running.load(Ordering::Relaxed) {
        let wall_ms = u64::try_from(origin.elapsed().as_millis()).unwrap_or(u64::MAX);
        let events = shared.with(|m| {
            m.advance(wall_ms.saturating_sub(m.now()));
            m.drain_stages()
        });

        let mut redraw = false;
        for event in &events {
            redraw |= renderer.apply(event);
            if let Stage::StatsShown { stats } = &event.stage {
                println!("{}", format_stats(stats));
            }
        }
        if redraw {
            println!("{}", renderer.frame());
        }

        thread::sleep(TICK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command(""), Some(Command::Action(PlayerAction::Spin)));
        assert_eq!(parse_command(" + "), Some(Command::Action(PlayerAction::BetUp)));
        assert_eq!(
            parse_command("AUTO"),
            Some(Command::Action(PlayerAction::ToggleAutoSpin))
        );
        assert_eq!(parse_command("q"), Some(Command::Quit));
        assert_eq!(parse_command("?"), Some(Command::Help));
        assert_eq!(parse_command("jackpot"), None);
    }
}
