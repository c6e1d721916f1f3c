//! Portfolio return aggregation.
//!
//! Weights are fixed for the life of the series: each month the portfolio is
//! implicitly rebalanced back to target weights. No drift between periods is
//! modeled. Callers presenting these numbers should state that assumption.

use super::allocation::AllocationPlan;
use super::returns::ReturnTable;

/// One weighted portfolio return per month in the table, chronological.
///
/// A missing (`None`) cell contributes nothing to that month's sum, and a
/// strategy without a return series contributes nothing at all.
pub fn portfolio_returns(plan: &AllocationPlan, table: &ReturnTable) -> Vec<f64> {
    let mut out = vec![0.0; table.months.len()];
    for entry in &plan.entries {
        let Some(series) = table.series(&entry.name) else {
            continue;
        };
        // Cells beyond the month axis are ignored rather than trusted.
        for (slot, value) in out.iter_mut().zip(series.values.iter()) {
            if let Some(r) = value {
                *slot += entry.weight * r;
            }
        }
    }
    out
}

/// Chain monthly returns into cumulative returns for charting:
/// `cum[t] = (1 + cum[t-1]) * (1 + r[t]) - 1`.
pub fn cumulative_returns(returns: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(returns.len());
    let mut cum = 0.0;
    for r in returns {
        cum = (1.0 + cum) * (1.0 + r) - 1.0;
        out.push(cum);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::allocation::{AllocationPlan, PlanEntry};
    use crate::domain::returns::{ReturnSeries, ReturnTable};
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn month(m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, 1).unwrap()
    }

    fn plan_of(weights: &[(&str, f64)]) -> AllocationPlan {
        let entries = weights
            .iter()
            .map(|(name, weight)| PlanEntry {
                name: name.to_string(),
                units: 1,
                allocation: *weight,
                required: 0.0,
                weight: *weight,
            })
            .collect();
        AllocationPlan {
            total_allocation: 1.0,
            required_equity: 0.0,
            entries,
        }
    }

    fn table(series: Vec<(&str, Vec<Option<f64>>)>, n_months: u32) -> ReturnTable {
        ReturnTable {
            months: (1..=n_months).map(month).collect(),
            series: series
                .into_iter()
                .map(|(name, values)| ReturnSeries {
                    name: name.to_string(),
                    values,
                })
                .collect(),
        }
    }

    #[test]
    fn equal_weights_average_the_series() {
        let table = table(
            vec![
                ("A", vec![Some(0.10), Some(-0.05)]),
                ("B", vec![Some(-0.05), Some(0.10)]),
            ],
            2,
        );
        let plan = plan_of(&[("A", 0.5), ("B", 0.5)]);
        let returns = portfolio_returns(&plan, &table);

        assert_eq!(returns.len(), 2);
        assert_relative_eq!(returns[0], 0.025, epsilon = 1e-12);
        assert_relative_eq!(returns[1], 0.025, epsilon = 1e-12);
    }

    #[test]
    fn missing_cell_contributes_zero() {
        let table = table(vec![("A", vec![Some(0.10), None])], 2);
        let plan = plan_of(&[("A", 1.0)]);
        let returns = portfolio_returns(&plan, &table);

        assert_relative_eq!(returns[0], 0.10);
        assert_relative_eq!(returns[1], 0.0);
    }

    #[test]
    fn strategy_without_series_contributes_nothing() {
        let table = table(vec![("A", vec![Some(0.10)])], 1);
        let plan = plan_of(&[("A", 0.5), ("GHOST", 0.5)]);
        let returns = portfolio_returns(&plan, &table);

        assert_relative_eq!(returns[0], 0.05);
    }

    #[test]
    fn unweighted_series_are_excluded() {
        let table = table(
            vec![
                ("A", vec![Some(0.10)]),
                ("S&P 500", vec![Some(-0.50)]),
            ],
            1,
        );
        let plan = plan_of(&[("A", 1.0)]);
        let returns = portfolio_returns(&plan, &table);

        assert_relative_eq!(returns[0], 0.10);
    }

    #[test]
    fn series_longer_than_month_axis_is_truncated() {
        let table = table(vec![("A", vec![Some(0.10), Some(0.20), Some(0.30)])], 2);
        let plan = plan_of(&[("A", 1.0)]);
        let returns = portfolio_returns(&plan, &table);

        assert_eq!(returns.len(), 2);
        assert_relative_eq!(returns[0], 0.10);
        assert_relative_eq!(returns[1], 0.20);
    }

    #[test]
    fn cumulative_returns_compound() {
        let cum = cumulative_returns(&[0.10, 0.10]);
        assert_relative_eq!(cum[0], 0.10, epsilon = 1e-12);
        assert_relative_eq!(cum[1], 0.21, epsilon = 1e-12);
    }

    #[test]
    fn cumulative_returns_empty() {
        assert!(cumulative_returns(&[]).is_empty());
    }
}
