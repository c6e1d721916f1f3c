//! Risk appetite tiers and the drawdown filter.

use std::fmt;
use std::str::FromStr;

use super::catalog::{DEFAULT_BENCHMARK_DRAWDOWN, StrategyRecord};

/// Drawdown tolerance tier selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskAppetite {
    /// Drawdown no worse than -5% peak to valley.
    MaxDd5,
    /// Drawdown no worse than -10% peak to valley.
    MaxDd10,
    /// Drawdown no worse than -20% peak to valley.
    MaxDd20,
    /// Drawdown no worse than the benchmark's own historical drawdown.
    BenchmarkLevel,
}

impl RiskAppetite {
    /// Drawdown floor for this tier. `benchmark_dd` resolves the benchmark
    /// tier and falls back to [`DEFAULT_BENCHMARK_DRAWDOWN`] when absent.
    pub fn floor(&self, benchmark_dd: Option<f64>) -> f64 {
        match self {
            RiskAppetite::MaxDd5 => -0.05,
            RiskAppetite::MaxDd10 => -0.10,
            RiskAppetite::MaxDd20 => -0.20,
            RiskAppetite::BenchmarkLevel => benchmark_dd.unwrap_or(DEFAULT_BENCHMARK_DRAWDOWN),
        }
    }

    pub const ALL: [RiskAppetite; 4] = [
        RiskAppetite::MaxDd5,
        RiskAppetite::MaxDd10,
        RiskAppetite::MaxDd20,
        RiskAppetite::BenchmarkLevel,
    ];
}

impl fmt::Display for RiskAppetite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskAppetite::MaxDd5 => "<5% peak to valley",
            RiskAppetite::MaxDd10 => "<10% peak to valley",
            RiskAppetite::MaxDd20 => "<20% peak to valley",
            RiskAppetite::BenchmarkLevel => "benchmark level",
        };
        f.write_str(s)
    }
}

impl FromStr for RiskAppetite {
    type Err = String;

    /// Accepts the presentation strings ("<5% peak to valley"), short forms
    /// ("5%", "10%", "20%") and "benchmark", case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_lowercase();
        match norm.as_str() {
            "5%" | "<5%" | "<5% peak to valley" => Ok(RiskAppetite::MaxDd5),
            "10%" | "<10%" | "<10% peak to valley" => Ok(RiskAppetite::MaxDd10),
            "20%" | "<20%" | "<20% peak to valley" => Ok(RiskAppetite::MaxDd20),
            "benchmark" | "benchmark level" | "s&p level" => Ok(RiskAppetite::BenchmarkLevel),
            _ => Err(format!(
                "unknown risk appetite '{}' (expected 5%, 10%, 20% or benchmark)",
                s
            )),
        }
    }
}

/// Keep strategies whose historical drawdown is within the tier's floor
/// (less negative passes). Output preserves catalog order.
pub fn filter_by_risk(
    records: &[StrategyRecord],
    appetite: RiskAppetite,
    benchmark_dd: Option<f64>,
) -> Vec<StrategyRecord> {
    let floor = appetite.floor(benchmark_dd);
    records
        .iter()
        .filter(|r| r.max_drawdown >= floor)
        .cloned()
        .collect()
}
