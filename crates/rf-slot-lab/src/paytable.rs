//! Paytable and win calculation

use std::collections::{BTreeMap, BTreeSet};

use rf_stage::Cell;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, SlotError, SlotResult};
use crate::symbols::{REEL_COUNT, ROW_COUNT, ReelStrip, Symbol};

/// Payline identifiers, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaylineId {
    Top,
    Middle,
    Bottom,
    DiagDown,
    DiagUp,
}

impl PaylineId {
    /// 0-based line index
    pub fn index(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Bottom => "bottom",
            Self::DiagDown => "diag-down",
            Self::DiagUp => "diag-up",
        }
    }

    /// Only horizontal lines pay the two-cherry rule
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Self::Top | Self::Middle | Self::Bottom)
    }
}

/// A payline definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payline {
    pub id: PaylineId,
    /// One cell per reel, left to right
    pub cells: [Cell; REEL_COUNT],
}

impl Payline {
    /// Same row across all reels
    pub const fn straight(id: PaylineId, row: u8) -> Self {
        Self {
            id,
            cells: [Cell::new(0, row), Cell::new(1, row), Cell::new(2, row)],
        }
    }
}

/// The five fixed lines of the 3×3 cabinet
pub const CLASSIC_PAYLINES: [Payline; 5] = [
    Payline::straight(PaylineId::Top, 0),
    Payline::straight(PaylineId::Middle, 1),
    Payline::straight(PaylineId::Bottom, 2),
    Payline {
        id: PaylineId::DiagDown,
        cells: [Cell::new(0, 0), Cell::new(1, 1), Cell::new(2, 2)],
    },
    Payline {
        id: PaylineId::DiagUp,
        cells: [Cell::new(0, 2), Cell::new(1, 1), Cell::new(2, 0)],
    },
];

/// Symbol → {match count → bet multiplier}
///
/// Only counts 2 and 3 exist; a missing entry pays nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayoutTable(BTreeMap<Symbol, BTreeMap<u8, u64>>);

impl PayoutTable {
    /// Empty table
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Classic cabinet payouts
    pub fn classic() -> Self {
        let mut table = Self::empty();
        table.set(Symbol::Cherry, 3, 10);
        table.set(Symbol::Cherry, 2, 2);
        table.set(Symbol::Lemon, 3, 15);
        table.set(Symbol::Orange, 3, 20);
        table.set(Symbol::Melon, 3, 25);
        table.set(Symbol::Bell, 3, 50);
        table.set(Symbol::Star, 3, 100);
        table.set(Symbol::Seven, 3, 500);
        table
    }

    /// Set a multiplier
    pub fn set(&mut self, symbol: Symbol, count: u8, multiplier: u64) {
        self.0.entry(symbol).or_default().insert(count, multiplier);
    }

    /// Multiplier for a match, 0 when undefined
    pub fn multiplier(&self, symbol: Symbol, count: u8) -> u64 {
        self.0
            .get(&symbol)
            .and_then(|pays| pays.get(&count))
            .copied()
            .unwrap_or(0)
    }

    /// Reject match counts other than 2 and 3
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (symbol, pays) in &self.0 {
            if let Some(&count) = pays.keys().find(|&&c| c != 2 && c != 3) {
                return Err(ConfigError::UnsupportedMatchCount {
                    symbol: symbol.name().to_string(),
                    count,
                });
            }
        }
        Ok(())
    }
}

impl Default for PayoutTable {
    fn default() -> Self {
        Self::classic()
    }
}

/// Visible 3×3 window, indexed `[reel][row]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleGrid(pub [[Symbol; ROW_COUNT]; REEL_COUNT]);

impl VisibleGrid {
    /// Compute the window around each reel's stop index
    pub fn from_stops(strips: &[ReelStrip], stops: &[usize]) -> SlotResult<Self> {
        if strips.len() != REEL_COUNT || stops.len() != REEL_COUNT {
            return Err(SlotError::ReelOutOfRange {
                expected: REEL_COUNT,
                got: stops.len().min(strips.len()),
            });
        }
        Ok(Self([
            strips[0].window(stops[0])?,
            strips[1].window(stops[1])?,
            strips[2].window(stops[2])?,
        ]))
    }

    pub fn get(&self, cell: Cell) -> Symbol {
        self.0[cell.reel as usize][cell.row as usize]
    }

    /// Symbols along a payline
    pub fn line(&self, payline: &Payline) -> [Symbol; REEL_COUNT] {
        payline.cells.map(|cell| self.get(cell))
    }

    /// Visible glyphs of one reel, top to bottom
    pub fn reel_glyphs(&self, reel: usize) -> Vec<String> {
        self.0[reel].iter().map(|s| s.glyph().to_string()).collect()
    }
}

/// A win result on a single payline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineWin {
    pub line: PaylineId,
    /// Winning symbol
    pub symbol: Symbol,
    /// 3 for a full line, 2 for the cherry rule
    pub match_count: u8,
    /// Win amount (bet × multiplier)
    pub win_amount: u64,
    /// Cells that form the win
    pub positions: Vec<Cell>,
}

/// Complete paytable
#[derive(Debug, Clone)]
pub struct PayTable {
    pub payouts: PayoutTable,
    pub paylines: Vec<Payline>,
}

impl PayTable {
    /// Classic payouts on the five classic lines
    pub fn classic() -> Self {
        Self::new(PayoutTable::classic())
    }

    pub fn new(payouts: PayoutTable) -> Self {
        Self {
            payouts,
            paylines: CLASSIC_PAYLINES.to_vec(),
        }
    }

    /// Evaluate the stop indices at a bet
    pub fn evaluate(
        &self,
        strips: &[ReelStrip],
        stops: &[usize],
        bet: u64,
    ) -> SlotResult<EvaluationResult> {
        let grid = VisibleGrid::from_stops(strips, stops)?;
        Ok(self.evaluate_grid(&grid, bet))
    }

    /// Score every payline of an already computed grid
    pub fn evaluate_grid(&self, grid: &VisibleGrid, bet: u64) -> EvaluationResult {
        let line_wins: Vec<LineWin> = self
            .paylines
            .iter()
            .filter_map(|payline| self.evaluate_line(grid, payline, bet))
            .collect();

        let total_win = line_wins.iter().map(|w| w.win_amount).sum();
        let winning_positions = line_wins
            .iter()
            .flat_map(|w| w.positions.iter().copied())
            .collect();

        EvaluationResult {
            grid: *grid,
            line_wins,
            total_win,
            winning_positions,
        }
    }

    fn evaluate_line(&self, grid: &VisibleGrid, payline: &Payline, bet: u64) -> Option<LineWin> {
        let [s1, s2, s3] = grid.line(payline);

        let (symbol, match_count) = if s1 == s2 && s2 == s3 {
            (s1, 3)
        } else if payline.id.is_horizontal() && s1 == Symbol::Cherry && s2 == Symbol::Cherry {
            // s3 differs from cherry here, so only the first two cells count
            (Symbol::Cherry, 2)
        } else {
            return None;
        };

        let win_amount = self
            .payouts
            .multiplier(symbol, match_count)
            .saturating_mul(bet);
        if win_amount == 0 {
            return None;
        }

        Some(LineWin {
            line: payline.id,
            symbol,
            match_count,
            win_amount,
            positions: payline.cells[..match_count as usize].to_vec(),
        })
    }
}

impl Default for PayTable {
    fn default() -> Self {
        Self::classic()
    }
}

/// Result of evaluating a grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub grid: VisibleGrid,
    /// Paying lines
    pub line_wins: Vec<LineWin>,
    /// Total win amount
    pub total_win: u64,
    /// Union of winning cells across lines
    pub winning_positions: BTreeSet<Cell>,
}

impl EvaluationResult {
    /// Check if this is a winning spin
    pub fn is_win(&self) -> bool {
        self.total_win > 0
    }

    /// Get win count
    pub fn win_count(&self) -> usize {
        self.line_wins.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{build_strips, classic_strips};

    fn strips() -> Vec<ReelStrip> {
        build_strips(&classic_strips()).unwrap()
    }

    fn cells(pairs: &[(u8, u8)]) -> BTreeSet<Cell> {
        pairs.iter().map(|&(r, w)| Cell::new(r, w)).collect()
    }

    #[test]
    fn test_payline_shapes() {
        assert_eq!(CLASSIC_PAYLINES.len(), 5);
        assert_eq!(
            CLASSIC_PAYLINES[1].cells,
            [Cell::new(0, 1), Cell::new(1, 1), Cell::new(2, 1)]
        );
        assert_eq!(
            CLASSIC_PAYLINES[4].cells,
            [Cell::new(0, 2), Cell::new(1, 1), Cell::new(2, 0)]
        );
        assert!(!PaylineId::DiagUp.is_horizontal());
        assert_eq!(PaylineId::DiagUp.index(), 4);
    }

    #[test]
    fn test_three_cherries_on_middle() {
        // Grid: 🍋🍋7️⃣ / 🍒🍒🍒 / 🍒⭐⭐
        let result = PayTable::classic().evaluate(&strips(), &[12, 6, 0], 5).unwrap();

        assert_eq!(result.total_win, 50);
        assert_eq!(result.line_wins.len(), 1);
        assert_eq!(result.line_wins[0].line, PaylineId::Middle);
        assert_eq!(result.line_wins[0].match_count, 3);
        assert_eq!(result.winning_positions, cells(&[(0, 1), (1, 1), (2, 1)]));
    }

    #[test]
    fn test_middle_cherries_also_light_top_and_bottom() {
        // Grid: 7️⃣7️⃣7️⃣ / 🍒🍒🍒 / ⭐⭐⭐
        let result = PayTable::classic().evaluate(&strips(), &[0, 0, 0], 5).unwrap();

        assert_eq!(result.total_win, 50 + 2500 + 500);
        assert_eq!(result.win_count(), 3);
        assert_eq!(result.winning_positions.len(), 9);
    }

    #[test]
    fn test_two_cherries_pay_first_two_cells() {
        // Grid: 🍋🍋🍒 / 🍒🍒⭐ / ⭐⭐🔔
        let result = PayTable::classic().evaluate(&strips(), &[6, 6, 1], 5).unwrap();

        assert_eq!(result.total_win, 10);
        assert_eq!(result.line_wins[0].match_count, 2);
        assert_eq!(result.winning_positions, cells(&[(0, 1), (1, 1)]));
        assert!(!result.winning_positions.contains(&Cell::new(2, 1)));
    }

    #[test]
    fn test_cherry_pair_overlaps_diagonal() {
        // Grid: 🍋🍋🍒 / 🍒🍒⭐ / 🍒⭐🔔; middle pair plus diag-up triple share (1,1)
        let result = PayTable::classic().evaluate(&strips(), &[12, 6, 1], 5).unwrap();

        assert_eq!(result.total_win, 10 + 50);
        assert_eq!(
            result.winning_positions,
            cells(&[(0, 1), (1, 1), (0, 2), (2, 0)])
        );
    }

    #[test]
    fn test_two_cherries_ignored_on_diagonal() {
        let mut grid = VisibleGrid([[Symbol::Lemon; 3]; 3]);
        grid.0[0][0] = Symbol::Cherry;
        grid.0[1][1] = Symbol::Cherry;
        grid.0[2][2] = Symbol::Bell;
        grid.0[1][0] = Symbol::Star;
        grid.0[1][2] = Symbol::Star;
        grid.0[0][1] = Symbol::Melon;
        grid.0[2][1] = Symbol::Orange;
        grid.0[0][2] = Symbol::Seven;
        grid.0[2][0] = Symbol::Bell;

        let result = PayTable::classic().evaluate_grid(&grid, 5);
        assert!(!result.is_win());
        assert!(result.winning_positions.is_empty());
    }

    #[test]
    fn test_undefined_triple_pays_nothing() {
        let mut payouts = PayoutTable::classic();
        payouts.0.remove(&Symbol::Seven);
        let table = PayTable::new(payouts);
        let grid = VisibleGrid([[Symbol::Seven; 3]; 3]);
        assert_eq!(table.evaluate_grid(&grid, 10).total_win, 0);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let table = PayTable::classic();
        let strips = strips();
        for stops in [[0, 0, 0], [12, 6, 1], [14, 13, 13], [3, 9, 7]] {
            let first = table.evaluate(&strips, &stops, 25).unwrap();
            let second = table.evaluate(&strips, &stops, 25).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_invalid_stops_rejected() {
        let table = PayTable::classic();
        assert!(matches!(
            table.evaluate(&strips(), &[0, 14, 0], 1),
            Err(SlotError::InvalidIndex { reel: 1, .. })
        ));
        assert!(matches!(
            table.evaluate(&strips(), &[0, 0], 1),
            Err(SlotError::ReelOutOfRange { expected: 3, got: 2 })
        ));
    }

    #[test]
    fn test_payout_table_validation() {
        assert!(PayoutTable::classic().validate().is_ok());
        let mut bad = PayoutTable::classic();
        bad.set(Symbol::Bell, 4, 80);
        assert!(matches!(
            bad.validate(),
            Err(ConfigError::UnsupportedMatchCount { count: 4, .. })
        ));
    }

    #[test]
    fn test_payout_table_json_shape() {
        let table: PayoutTable =
            serde_json::from_str(r#"{"cherry": {"3": 10, "2": 2}, "seven": {"3": 500}}"#).unwrap();
        assert_eq!(table.multiplier(Symbol::Cherry, 2), 2);
        assert_eq!(table.multiplier(Symbol::Seven, 3), 500);
        assert_eq!(table.multiplier(Symbol::Star, 3), 0);
    }
}
