//! Error types for the slot engine

use thiserror::Error;

/// Engine error type
#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Invalid stop index {index} for reel {reel} (strip length {len})")]
    InvalidIndex { reel: usize, index: usize, len: usize },

    #[error("Reel out of range: expected {expected} stop indices, got {got}")]
    ReelOutOfRange { expected: usize, got: usize },

    #[error("Insufficient credits: have {credits}, bet {bet}")]
    InsufficientCredits { credits: u64, bet: u64 },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sink error: {0}")]
    Sink(#[from] rf_stage::SinkError),
}

/// Configuration validation and loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Expected {expected} reel strips, got {got}")]
    ReelCount { expected: usize, got: usize },

    #[error("Reel strip {0} is empty")]
    EmptyStrip(usize),

    #[error("Bet ladder is empty")]
    EmptyBetLadder,

    #[error("Bet ladder must be strictly ascending and non-zero")]
    UnorderedBetLadder,

    #[error("Starting bet index {index} outside ladder of {len}")]
    BetIndexOutOfRange { index: usize, len: usize },

    #[error("Unsupported match count {count} for {symbol}")]
    UnsupportedMatchCount { symbol: String, count: u8 },

    #[error("Reel repeat count must be at least 2, got {0}")]
    RepeatCount(usize),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type SlotResult<T> = Result<T, SlotError>;
