//! Strategy catalog: per-strategy statistics and the monthly return table.
//!
//! Records are loaded once per session by a [`CatalogPort`] implementation
//! and treated as read-only afterwards.
//!
//! [`CatalogPort`]: crate::ports::catalog_port::CatalogPort

use super::returns::ReturnTable;

/// Token that identifies the benchmark column by name.
pub const BENCHMARK_MARKER: &str = "S&P";

/// Strategy name tokens that disqualify a column from being the benchmark,
/// even when it carries the benchmark marker (e.g. "DELTA S&P").
pub const EXCLUDED_MARKERS: [&str; 3] = ["DELTA", "GAMMA", "VEGA"];

/// Drawdown floor assumed when no benchmark column exists.
pub const DEFAULT_BENCHMARK_DRAWDOWN: f64 = -0.20;

pub fn is_benchmark_name(name: &str) -> bool {
    name.contains(BENCHMARK_MARKER) && !EXCLUDED_MARKERS.iter().any(|m| name.contains(m))
}

/// One row of the strategy statistics table.
///
/// `max_drawdown` and `average_year_return` are fractions; `margin_fraction`
/// is the fraction of a unit's notional allocation held as required equity.
/// Only records with `unit_equity > 0` are usable; loaders drop the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyRecord {
    pub name: String,
    pub unit_equity: f64,
    pub total_trades: u32,
    pub winning_trades: u32,
    pub losing_trades: u32,
    pub average_winner: f64,
    pub average_loser: f64,
    pub average_net: f64,
    pub max_drawdown: f64,
    pub average_year_return: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub calmar_ratio: f64,
    pub margin_fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    pub records: Vec<StrategyRecord>,
    pub returns: ReturnTable,
}

impl Catalog {
    pub fn find(&self, name: &str) -> Option<&StrategyRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Historical max drawdown of the benchmark record, if one exists.
    pub fn benchmark_drawdown(&self) -> Option<f64> {
        self.records
            .iter()
            .find(|r| is_benchmark_name(&r.name))
            .map(|r| r.max_drawdown)
    }
}
