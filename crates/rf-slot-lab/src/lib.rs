//! # rf-slot-lab — Classic 3-Reel Slot Engine
//!
//! A 3×3 cabinet with five paylines, a credit/bet account and a seven-state
//! spin machine driven by a virtual clock.
//!
//! ## Features
//!
//! - **Evaluator**: fixed symbol strips, five paylines, two-cherry rule
//! - **State Machine**: IDLE → SPINNING → STOPPING → EVALUATING → WIN/NO WIN → IDLE, plus GAME OVER
//! - **Timers**: cancellable, generation-tagged, host-driven clock
//! - **Stage Output**: every visible or audible moment leaves as a STAGE event
//! - **Timing Profiles**: Normal, Turbo, Instant
//! - **Batch Simulator**: RTP and hit rate over millions of spins
//!
//! ## Architecture
//!
//! ```text
//! SlotMachine
//!     │
//!     ├── ReelStrip × 3 (fixed symbol sequences)
//!     ├── PayTable (payouts, paylines)
//!     ├── GameAccount (credits, bet ladder, stats)
//!     └── Scheduler (virtual-clock timers)
//!           │
//!           v
//!     StageEvent → StageSink (audio, renderer, trace)
//! ```

pub mod account;
pub mod audio;
pub mod config;
pub mod engine;
pub mod error;
pub mod frontend;
pub mod paytable;
pub mod scheduler;
pub mod shared;
pub mod simulator;
pub mod spin;
pub mod symbols;
pub mod timing;

pub use account::*;
pub use audio::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use frontend::*;
pub use paytable::*;
pub use scheduler::*;
pub use shared::*;
pub use simulator::*;
pub use spin::*;
pub use symbols::*;
pub use timing::*;
