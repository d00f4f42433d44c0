//! # rf-stage — Classic Slot Stage System
//!
//! Defines the canonical stages a slot cabinet passes through and the
//! consumers that react to them.
//!
//! ## Philosophy
//!
//! Every round passes through the same semantic phases:
//! - Spin starts → Reels stop → Wins evaluated → Win or loss presented
//!
//! Rendering, audio and the background layer never look at machine
//! internals, only at STAGES.

pub mod event;
pub mod sink;
pub mod stage;
pub mod taxonomy;
pub mod trace;

pub use event::*;
pub use sink::*;
pub use stage::*;
pub use taxonomy::*;
pub use trace::*;
