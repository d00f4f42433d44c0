//! Symbol definitions and reel strips

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};

/// Number of reels on the cabinet
pub const REEL_COUNT: usize = 3;

/// Number of visible rows per reel
pub const ROW_COUNT: usize = 3;

/// A reel symbol
///
/// Config files use the snake_case name; the emoji glyph is accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    #[serde(alias = "🍒")]
    Cherry,
    #[serde(alias = "⭐")]
    Star,
    #[serde(alias = "🔔")]
    Bell,
    #[serde(alias = "🍉")]
    Melon,
    #[serde(alias = "🍊")]
    Orange,
    #[serde(alias = "🍋")]
    Lemon,
    #[serde(alias = "7️⃣")]
    Seven,
}

impl Symbol {
    /// All symbols, in paytable order
    pub const ALL: [Symbol; 7] = [
        Symbol::Cherry,
        Symbol::Star,
        Symbol::Bell,
        Symbol::Melon,
        Symbol::Orange,
        Symbol::Lemon,
        Symbol::Seven,
    ];

    /// Display glyph
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Cherry => "🍒",
            Self::Star => "⭐",
            Self::Bell => "🔔",
            Self::Melon => "🍉",
            Self::Orange => "🍊",
            Self::Lemon => "🍋",
            Self::Seven => "7️⃣",
        }
    }

    /// Config name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cherry => "cherry",
            Self::Star => "star",
            Self::Bell => "bell",
            Self::Melon => "melon",
            Self::Orange => "orange",
            Self::Lemon => "lemon",
            Self::Seven => "seven",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

/// A fixed reel strip, read-only after construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReelStrip {
    /// Symbols in order
    symbols: Vec<Symbol>,
    /// Reel index
    reel_index: u8,
}

impl ReelStrip {
    /// Create a new reel strip; empty strips are rejected
    pub fn new(reel_index: u8, symbols: Vec<Symbol>) -> SlotResult<Self> {
        if symbols.is_empty() {
            return Err(crate::error::ConfigError::EmptyStrip(reel_index as usize).into());
        }
        Ok(Self { symbols, reel_index })
    }

    /// Get symbol at any integer offset (wraps in both directions)
    pub fn symbol_at(&self, offset: i64) -> Symbol {
        let len = self.symbols.len() as i64;
        self.symbols[offset.rem_euclid(len) as usize]
    }

    /// Rows above, at and below a stop index
    pub fn window(&self, stop_index: usize) -> SlotResult<[Symbol; ROW_COUNT]> {
        if stop_index >= self.symbols.len() {
            return Err(SlotError::InvalidIndex {
                reel: self.reel_index as usize,
                index: stop_index,
                len: self.symbols.len(),
            });
        }
        let middle = stop_index as i64;
        Ok([
            self.symbol_at(middle - 1),
            self.symbol_at(middle),
            self.symbol_at(middle + 1),
        ])
    }

    /// Get total strip length
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false for a constructed strip
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn reel_index(&self) -> u8 {
        self.reel_index
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// How many times a symbol appears on the strip
    pub fn count(&self, symbol: Symbol) -> usize {
        self.symbols.iter().filter(|&&s| s == symbol).count()
    }
}

/// The cabinet's default strips
///
/// Symbol frequency on a strip is the only weighting mechanism.
pub fn classic_strips() -> Vec<Vec<Symbol>> {
    use Symbol::*;
    vec![
        vec![
            Cherry, Star, Bell, Melon, Orange, Lemon, Cherry, Star, Bell, Melon, Orange, Lemon,
            Cherry, Cherry, Seven,
        ],
        vec![
            Cherry, Star, Bell, Melon, Orange, Lemon, Cherry, Star, Bell, Melon, Orange, Lemon,
            Star, Seven,
        ],
        vec![
            Cherry, Star, Bell, Melon, Orange, Lemon, Seven, Star, Bell, Melon, Orange, Lemon,
            Bell, Seven,
        ],
    ]
}

/// Build strips from raw symbol lists
pub fn build_strips(raw: &[Vec<Symbol>]) -> SlotResult<Vec<ReelStrip>> {
    raw.iter()
        .enumerate()
        .map(|(i, symbols)| ReelStrip::new(i as u8, symbols.clone()))
        .collect()
}
