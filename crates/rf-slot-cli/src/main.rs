//! Classic Slots terminal host
//!
//! Usage:
//!   rf-slot play                      - Interactive cabinet on the real clock
//!   rf-slot autoplay -n 500           - Headless rounds on the virtual clock
//!   rf-slot simulate -n 10000000      - Evaluator-only RTP measurement
//!   rf-slot dump-config               - Print the effective config as JSON

mod autoplay;
mod play;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rf_slot_lab::{
    AudioCueMapper, GameConfig, LogAudioBackend, LogSink, SimulationConfig, SimulationReport,
    Simulator, SlotMachine, TimingConfig, TimingProfile,
};

#[derive(Parser)]
#[command(name = "rf-slot", about = "Classic 3-reel slot machine", version)]
struct Cli {
    /// Game config file (JSON, or YAML by extension)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Timing profile, overrides the config
    #[arg(short, long, global = true, value_enum)]
    profile: Option<Profile>,

    /// RNG seed for reproducible sessions
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive cabinet
    Play,
    /// Headless rounds
    Autoplay {
        /// Rounds to play
        #[arg(short = 'n', long, default_value_t = 100)]
        spins: u64,
        /// Write the stage trace to this JSON file
        #[arg(short, long)]
        trace: Option<PathBuf>,
        /// Print the cabinet after every round
        #[arg(long)]
        frames: bool,
    },
    /// Measure RTP and hit rate
    Simulate {
        /// Spins to draw
        #[arg(short = 'n', long, default_value_t = 1_000_000)]
        spins: u64,
        /// Bet per spin
        #[arg(short, long, default_value_t = 1)]
        bet: u64,
        /// Spins per parallel work unit
        #[arg(long, default_value_t = 65_536)]
        chunk_size: u64,
        /// Walk every stop combination instead of sampling
        #[arg(long)]
        exhaustive: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the effective config
    DumpConfig,
}

#[derive(Clone, Copy, ValueEnum)]
enum Profile {
    Normal,
    Turbo,
    Instant,
}

impl From<Profile> for TimingProfile {
    fn from(profile: Profile) -> Self {
        match profile {
            Profile::Normal => TimingProfile::Normal,
            Profile::Turbo => TimingProfile::Turbo,
            Profile::Instant => TimingProfile::Instant,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let config = load_config(&cli)?;
    log::info!("Starting {}...", config.name);

    match cli.command {
        Commands::Play => {
            let machine = build_machine(config)?;
            play::run(machine)
        }
        Commands::Autoplay {
            spins,
            trace,
            frames,
        } => run_autoplay(config, spins, trace, frames),
        Commands::Simulate {
            spins,
            bet,
            chunk_size,
            exhaustive,
            json,
        } => {
            let simulator = Simulator::new(&config).context("invalid game config")?;
            let report = if exhaustive {
                simulator.exhaustive(bet)?
            } else {
                simulator.run(&SimulationConfig {
                    spins,
                    bet,
                    seed: config.seed.unwrap_or_default(),
                    chunk_size,
                })?
            };
            print_report(&report, json)
        }
        Commands::DumpConfig => {
            println!("{}", config.to_json()?);
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(profile) = cli.profile {
        config.timing = TimingConfig::from_profile(profile.into());
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    Ok(config)
}

fn build_machine(config: GameConfig) -> Result<SlotMachine> {
    let machine = SlotMachine::new(config)
        .context("invalid game config")?
        .with_sink(Box::new(LogSink))
        .with_sink(Box::new(AudioCueMapper::new(LogAudioBackend)));
    Ok(machine)
}

fn run_autoplay(
    config: GameConfig,
    spins: u64,
    trace: Option<PathBuf>,
    frames: bool,
) -> Result<()> {
    let seed = config.seed;
    let game_id = config.name.clone();
    let mut machine = build_machine(config)?;

    let sink = trace.as_ref().map(|_| autoplay::trace_sink(&game_id));
    if let Some(sink) = &sink {
        machine.add_sink(Box::new(sink.clone()));
    }

    let report = autoplay::play(&mut machine, spins, frames);
    println!(
        "{} spins, {} wins, {} won (biggest {}), {} credits left{}",
        report.spins,
        report.wins,
        report.total_winnings,
        report.biggest_win,
        report.credits,
        if report.game_over { ", GAME OVER" } else { "" }
    );
    println!("{:.1}s of cabinet time", report.elapsed_ms as f64 / 1000.0);

    if let (Some(path), Some(sink)) = (trace, sink) {
        autoplay::write_trace(sink.snapshot(), seed, &path)?;
    }
    Ok(())
}

fn print_report(report: &SimulationReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("Spins        {}", report.spins);
    println!("Total bet    {}", report.total_bet);
    println!("Total win    {}", report.total_win);
    println!("RTP          {:.3}%", report.rtp());
    println!("Hit rate     {:.3}%", report.hit_rate());
    println!("Biggest win  {}", report.biggest_win);
    for (line, hits) in &report.line_hits {
        println!("  {:<16} {}", line.name(), hits);
    }
    for (symbol, hits) in &report.symbol_hits {
        println!("  3x {:<13} {}", symbol.name(), hits);
    }
    Ok(())
}
