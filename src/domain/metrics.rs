//! Drawdown and ratio engine.
//!
//! Max drawdown is computed from the compounding equity curve of the
//! aggregated return series, never as a weighted average of per-strategy
//! drawdowns: diversification changes the timing of peaks and valleys, so
//! the averaged figure would be wrong.
//!
//! Sharpe/Sortino/Calmar and the average yearly return, by contrast, are
//! weighted averages of each strategy's independently reported ratio. That
//! is a linear approximation (ratios are not linear in weights), kept
//! deliberately from the original design rather than recomputed from the
//! aggregated series.

use super::allocation::AllocationPlan;
use super::catalog::StrategyRecord;

/// Compounding equity curve starting at 1.0; output length is
/// `returns.len() + 1`.
pub fn equity_curve(returns: &[f64]) -> Vec<f64> {
    let mut curve = Vec::with_capacity(returns.len() + 1);
    let mut equity = 1.0;
    curve.push(equity);
    for r in returns {
        equity *= 1.0 + r;
        curve.push(equity);
    }
    curve
}

/// Maximum peak-to-valley drawdown of an equity curve, as a fraction in
/// [-1, 0]. The running maximum includes the current point, so a curve that
/// never dips below a prior peak yields exactly 0.
pub fn max_drawdown(curve: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0;
    for &equity in curve {
        if equity > peak {
            peak = equity;
        }
        if peak > 0.0 {
            let dd = (equity - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Portfolio-level statistics derived from a resolved allocation.
///
/// Immutable snapshot, produced fresh per analysis request.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioResult {
    pub total_allocation: f64,
    pub required_equity: f64,
    /// Unit-scaled trade counts: `units * per-strategy count`, summed.
    pub total_trades: u64,
    pub winning_trades: u64,
    pub losing_trades: u64,
    pub average_winner: f64,
    pub average_loser: f64,
    pub average_net: f64,
    /// Computed from the aggregated equity curve (see module docs).
    pub max_drawdown: f64,
    pub average_year_return: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub calmar_ratio: f64,
}

impl PortfolioResult {
    /// Combine the plan's weights with per-strategy statistics and the
    /// aggregated monthly return series.
    pub fn compute(
        plan: &AllocationPlan,
        records: &[StrategyRecord],
        portfolio_returns: &[f64],
    ) -> Self {
        let curve = equity_curve(portfolio_returns);
        let max_dd = max_drawdown(&curve);

        let mut total_trades = 0u64;
        let mut winning_trades = 0u64;
        let mut losing_trades = 0u64;
        let mut average_winner = 0.0;
        let mut average_loser = 0.0;
        let mut average_net = 0.0;
        let mut average_year_return = 0.0;
        let mut sharpe_ratio = 0.0;
        let mut sortino_ratio = 0.0;
        let mut calmar_ratio = 0.0;

        for entry in &plan.entries {
            let Some(record) = records.iter().find(|r| r.name == entry.name) else {
                continue;
            };
            let units = entry.units as u64;
            total_trades += units * record.total_trades as u64;
            winning_trades += units * record.winning_trades as u64;
            losing_trades += units * record.losing_trades as u64;

            average_winner += entry.weight * record.average_winner;
            average_loser += entry.weight * record.average_loser;
            average_net += entry.weight * record.average_net;
            average_year_return += entry.weight * record.average_year_return;
            sharpe_ratio += entry.weight * record.sharpe_ratio;
            sortino_ratio += entry.weight * record.sortino_ratio;
            calmar_ratio += entry.weight * record.calmar_ratio;
        }

        PortfolioResult {
            total_allocation: plan.total_allocation,
            required_equity: plan.required_equity,
            total_trades,
            winning_trades,
            losing_trades,
            average_winner,
            average_loser,
            average_net,
            max_drawdown: max_dd,
            average_year_return,
            sharpe_ratio,
            sortino_ratio,
            calmar_ratio,
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.total_trades > 0 {
            self.winning_trades as f64 / self.total_trades as f64
        } else {
            0.0
        }
    }

    pub fn effective_leverage(&self) -> f64 {
        if self.total_allocation > 0.0 {
            self.required_equity / self.total_allocation
        } else {
            0.0
        }
    }
}
