//! Allocation resolver: unit selections to capital weights under a leverage
//! ceiling.

use std::collections::BTreeMap;

use super::catalog::StrategyRecord;
use super::error::UnitfolioError;

/// Strategy name to unit count. Zero or absent entries mean "not selected".
pub type Selection = BTreeMap<String, u32>;

#[derive(Debug, Clone, PartialEq)]
pub struct PlanEntry {
    pub name: String,
    pub units: u32,
    /// `units * unit_equity`.
    pub allocation: f64,
    /// `allocation * margin_fraction`.
    pub required: f64,
    /// Share of total allocation, in (0, 1].
    pub weight: f64,
}

/// Resolved allocation. Weights sum to 1.0 (within 1e-9) across entries.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationPlan {
    pub total_allocation: f64,
    pub required_equity: f64,
    pub entries: Vec<PlanEntry>,
}

impl AllocationPlan {
    /// `required_equity / total_allocation`, 0 when nothing is allocated.
    pub fn effective_leverage(&self) -> f64 {
        if self.total_allocation > 0.0 {
            self.required_equity / self.total_allocation
        } else {
            0.0
        }
    }

    pub fn weight(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.weight)
    }
}

/// Resolve a selection against the catalog records.
///
/// Fails with [`UnitfolioError::EmptySelection`] when no strategy has
/// `units > 0`, [`UnitfolioError::UnknownStrategy`] when a selected name has
/// no catalog record, and [`UnitfolioError::LeverageExceeded`] when the
/// effective leverage breaches `max_leverage`. The leverage check is a hard
/// gate: no partial or clamped plan is ever returned.
pub fn resolve(
    selection: &Selection,
    records: &[StrategyRecord],
    max_leverage: f64,
) -> Result<AllocationPlan, UnitfolioError> {
    if !selection.values().any(|&units| units > 0) {
        return Err(UnitfolioError::EmptySelection);
    }

    let mut entries = Vec::new();
    let mut total_allocation = 0.0;
    let mut required_equity = 0.0;

    for (name, &units) in selection {
        if units == 0 {
            continue;
        }
        let record = records.iter().find(|r| r.name == *name).ok_or_else(|| {
            UnitfolioError::UnknownStrategy { name: name.clone() }
        })?;

        let allocation = units as f64 * record.unit_equity;
        let required = allocation * record.margin_fraction;
        total_allocation += allocation;
        required_equity += required;

        entries.push(PlanEntry {
            name: name.clone(),
            units,
            allocation,
            required,
            weight: 0.0,
        });
    }

    let effective = if total_allocation > 0.0 {
        required_equity / total_allocation
    } else {
        0.0
    };
    if effective > max_leverage {
        return Err(UnitfolioError::LeverageExceeded {
            effective,
            maximum: max_leverage,
        });
    }

    for entry in &mut entries {
        entry.weight = if total_allocation > 0.0 {
            entry.allocation / total_allocation
        } else {
            0.0
        };
    }

    Ok(AllocationPlan {
        total_allocation,
        required_equity,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::StrategyRecord;
    use approx::assert_relative_eq;

    fn record(name: &str, unit_equity: f64, margin_fraction: f64) -> StrategyRecord {
        StrategyRecord {
            name: name.to_string(),
            unit_equity,
            total_trades: 100,
            winning_trades: 60,
            losing_trades: 40,
            average_winner: 1_000.0,
            average_loser: -500.0,
            average_net: 400.0,
            max_drawdown: -0.10,
            average_year_return: 0.12,
            sharpe_ratio: 1.0,
            sortino_ratio: 1.4,
            calmar_ratio: 1.2,
            margin_fraction,
        }
    }

    fn selection(pairs: &[(&str, u32)]) -> Selection {
        pairs
            .iter()
            .map(|(name, units)| (name.to_string(), *units))
            .collect()
    }

    #[test]
    fn resolve_sums_allocation_and_required_equity() {
        let records = vec![
            record("A", 100_000.0, 0.5),
            record("B", 200_000.0, 0.25),
        ];
        let plan = resolve(&selection(&[("A", 2), ("B", 1)]), &records, 1.0).unwrap();

        assert_relative_eq!(plan.total_allocation, 400_000.0);
        assert_relative_eq!(plan.required_equity, 150_000.0);
        assert_relative_eq!(plan.effective_leverage(), 0.375);
    }

    #[test]
    fn weights_sum_to_one() {
        let records = vec![
            record("A", 100_000.0, 0.5),
            record("B", 250_000.0, 0.3),
            record("C", 50_000.0, 0.8),
        ];
        let plan = resolve(&selection(&[("A", 3), ("B", 2), ("C", 5)]), &records, 1.0).unwrap();

        let sum: f64 = plan.entries.iter().map(|e| e.weight).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn effective_leverage_equals_weighted_margin() {
        let records = vec![
            record("A", 100_000.0, 0.5),
            record("B", 200_000.0, 0.25),
        ];
        let plan = resolve(&selection(&[("A", 1), ("B", 2)]), &records, 1.0).unwrap();

        let weighted_margin: f64 = plan
            .entries
            .iter()
            .map(|e| {
                let margin = records
                    .iter()
                    .find(|r| r.name == e.name)
                    .map(|r| r.margin_fraction)
                    .unwrap();
                e.weight * margin
            })
            .sum();
        assert_relative_eq!(plan.effective_leverage(), weighted_margin, epsilon = 1e-12);
    }

    #[test]
    fn empty_selection_is_rejected() {
        let records = vec![record("A", 100_000.0, 0.5)];
        let err = resolve(&Selection::new(), &records, 1.0).unwrap_err();
        assert!(matches!(err, UnitfolioError::EmptySelection));
    }

    #[test]
    fn all_zero_units_is_rejected() {
        let records = vec![record("A", 100_000.0, 0.5)];
        let err = resolve(&selection(&[("A", 0)]), &records, 1.0).unwrap_err();
        assert!(matches!(err, UnitfolioError::EmptySelection));
    }

    #[test]
    fn zero_unit_entries_are_ignored() {
        let records = vec![
            record("A", 100_000.0, 0.5),
            record("B", 200_000.0, 0.25),
        ];
        let plan = resolve(&selection(&[("A", 1), ("B", 0)]), &records, 1.0).unwrap();
        assert_eq!(plan.entries.len(), 1);
        assert_eq!(plan.entries[0].name, "A");
        assert_relative_eq!(plan.entries[0].weight, 1.0);
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        let records = vec![record("A", 100_000.0, 0.5)];
        let err = resolve(&selection(&[("A", 1), ("GHOST", 2)]), &records, 1.0).unwrap_err();
        match err {
            UnitfolioError::UnknownStrategy { name } => assert_eq!(name, "GHOST"),
            other => panic!("expected UnknownStrategy, got {other:?}"),
        }
    }

    #[test]
    fn leverage_gate_carries_both_values() {
        let records = vec![record("A", 100_000.0, 0.6)];
        let err = resolve(&selection(&[("A", 1)]), &records, 0.5).unwrap_err();
        match err {
            UnitfolioError::LeverageExceeded { effective, maximum } => {
                assert_relative_eq!(effective, 0.6);
                assert_relative_eq!(maximum, 0.5);
            }
            other => panic!("expected LeverageExceeded, got {other:?}"),
        }
    }

    #[test]
    fn leverage_at_the_cap_passes() {
        let records = vec![record("A", 100_000.0, 0.5)];
        let plan = resolve(&selection(&[("A", 1)]), &records, 0.5).unwrap();
        assert_relative_eq!(plan.effective_leverage(), 0.5);
    }
}
