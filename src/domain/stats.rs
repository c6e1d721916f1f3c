//! Statistics for a single strategy's monthly P&L series.
//!
//! Works on dollar P&L against a starting capital, not on pre-computed
//! return fractions: each month's return is measured against the equity at
//! the start of that month, so the series compounds the way the account did.

use chrono::NaiveDate;

use super::metrics::max_drawdown;

pub const MONTHS_PER_YEAR: f64 = 12.0;

/// One month of realized profit or loss, in account currency.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyPnl {
    pub month: NaiveDate,
    pub pnl: f64,
}

/// Summary statistics for a P&L series.
///
/// Ratios that are undefined for the given data are `None`, never a silent
/// zero: Sortino needs at least two losing months for a sample deviation,
/// Calmar needs a non-zero drawdown, Sharpe needs return dispersion.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStats {
    pub months: usize,
    pub initial_capital: f64,
    pub final_equity: f64,
    pub mean_monthly_return: f64,
    pub cagr: f64,
    pub monthly_stdev: f64,
    pub annual_stdev: f64,
    pub sharpe_ratio: Option<f64>,
    pub sortino_ratio: Option<f64>,
    pub calmar_ratio: Option<f64>,
    pub max_drawdown: f64,
}

/// Sample (N-1) standard deviation. `None` for fewer than two values.
fn sample_stdev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(var.sqrt())
}

impl SeriesStats {
    /// Compute statistics from a chronological P&L series.
    ///
    /// `annual_risk_free` is an annual rate; it is divided by 12 for the
    /// Sharpe excess-return term. Returns `None` for an empty series or a
    /// non-positive initial capital.
    pub fn from_pnl(
        initial_capital: f64,
        series: &[MonthlyPnl],
        annual_risk_free: f64,
    ) -> Option<SeriesStats> {
        if series.is_empty() || initial_capital <= 0.0 {
            return None;
        }

        let mut equity = initial_capital;
        let mut equity_points = Vec::with_capacity(series.len() + 1);
        let mut returns = Vec::with_capacity(series.len());
        equity_points.push(equity);
        for entry in series {
            let r = entry.pnl / equity;
            returns.push(r);
            equity += entry.pnl;
            equity_points.push(equity);
        }

        let n_months = returns.len() as f64;
        let mean_monthly_return = returns.iter().sum::<f64>() / n_months;
        let cagr = (equity / initial_capital).powf(MONTHS_PER_YEAR / n_months) - 1.0;

        let monthly_stdev = sample_stdev(&returns).unwrap_or(0.0);
        let annual_stdev = monthly_stdev * MONTHS_PER_YEAR.sqrt();

        let monthly_rf = annual_risk_free / MONTHS_PER_YEAR;
        let sharpe_ratio = if monthly_stdev > 0.0 {
            Some((mean_monthly_return - monthly_rf) / monthly_stdev * MONTHS_PER_YEAR.sqrt())
        } else {
            None
        };

        let negative: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
        let sortino_ratio = sample_stdev(&negative).and_then(|downside| {
            if downside > 0.0 {
                Some((mean_monthly_return - monthly_rf) / downside * MONTHS_PER_YEAR.sqrt())
            } else {
                None
            }
        });

        let max_dd = max_drawdown(&equity_points);
        let calmar_ratio = if max_dd < 0.0 {
            Some(cagr / max_dd.abs())
        } else {
            None
        };

        Some(SeriesStats {
            months: series.len(),
            initial_capital,
            final_equity: equity,
            mean_monthly_return,
            cagr,
            monthly_stdev,
            annual_stdev,
            sharpe_ratio,
            sortino_ratio,
            calmar_ratio,
            max_drawdown: max_dd,
        })
    }
}
