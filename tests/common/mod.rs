#![allow(dead_code)]

use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use unitfolio::domain::catalog::{Catalog, StrategyRecord};
use unitfolio::domain::error::UnitfolioError;
use unitfolio::domain::returns::{ReturnSeries, ReturnTable};
use unitfolio::ports::catalog_port::CatalogPort;

pub struct MockCatalogPort {
    pub catalog: Catalog,
    pub error: Option<String>,
}

impl MockCatalogPort {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            error: None,
        }
    }

    pub fn with_error(reason: &str) -> Self {
        Self {
            catalog: Catalog::default(),
            error: Some(reason.to_string()),
        }
    }
}

impl CatalogPort for MockCatalogPort {
    fn load_catalog(&self) -> Result<Catalog, UnitfolioError> {
        if let Some(reason) = &self.error {
            return Err(UnitfolioError::DataFormat {
                reason: reason.clone(),
            });
        }
        Ok(self.catalog.clone())
    }
}

pub fn record(
    name: &str,
    unit_equity: f64,
    max_drawdown: f64,
    margin_fraction: f64,
) -> StrategyRecord {
    StrategyRecord {
        name: name.to_string(),
        unit_equity,
        total_trades: 100,
        winning_trades: 60,
        losing_trades: 40,
        average_winner: 1_000.0,
        average_loser: -500.0,
        average_net: 400.0,
        max_drawdown,
        average_year_return: 0.12,
        sharpe_ratio: 1.1,
        sortino_ratio: 1.6,
        calmar_ratio: 1.0,
        margin_fraction,
    }
}

pub fn month(y: i32, m: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, 1).unwrap()
}

/// Two equal-equity strategies with exactly offsetting returns, plus a
/// benchmark column.
pub fn sample_catalog() -> Catalog {
    Catalog {
        records: vec![
            record("DELTA S&P", 100_000.0, -0.08, 0.4),
            record("VEGA CRUDE", 100_000.0, -0.15, 0.6),
            record("S&P 500", 1.0, -0.34, 1.0),
        ],
        returns: ReturnTable {
            months: vec![month(2024, 1), month(2024, 2)],
            series: vec![
                ReturnSeries {
                    name: "DELTA S&P".into(),
                    values: vec![Some(0.10), Some(-0.05)],
                },
                ReturnSeries {
                    name: "VEGA CRUDE".into(),
                    values: vec![Some(-0.05), Some(0.10)],
                },
                ReturnSeries {
                    name: "S&P 500".into(),
                    values: vec![Some(0.01), Some(0.02)],
                },
            ],
        },
    }
}

pub const STATS_CSV: &str = "\
Metric,DELTA S&P,VEGA CRUDE,S&P 500
Unit Equity,100000,100000,1
Total Trades,120,80,0
Winning Trades,70,50,0
Losing Trades,50,30,0
Average Winner,4200,3100,0
Average Loser,-2100,-1500,0
Average Net,1500,1200,0
Max Drawdown,-0.08,-0.15,-0.34
Average Yearly Return,0.14,0.18,0.08
Sharpe Ratio,1.2,0.9,0.5
Sortino Ratio,1.8,1.3,0.7
Calmar Ratio,1.1,0.8,0.2
,,,
Margin,0.4,0.6,1
";

pub const RETURNS_CSV: &str = "\
DATE,DELTA S&P,VEGA CRUDE,S&P 500
2024-01-01,0.10,-0.05,0.01
2024-02-01,-0.05,0.10,0.02
";

/// Write the workbook fixture files and return their paths.
pub fn write_workbook(dir: &Path) -> (PathBuf, PathBuf) {
    let stats = dir.join("stats.csv");
    let returns = dir.join("returns.csv");
    fs::write(&stats, STATS_CSV).unwrap();
    fs::write(&returns, RETURNS_CSV).unwrap();
    (stats, returns)
}

/// Write an analysis config pointing at a workbook in the same directory.
pub fn write_config(dir: &Path, extra: &str) -> PathBuf {
    let (stats, returns) = write_workbook(dir);
    let config_path = dir.join("unitfolio.ini");
    let content = format!(
        "[data]\nstats = {}\nmonthly_returns = {}\n\n[analysis]\nmax_leverage = 100\nrisk_appetite = benchmark\n\n{}",
        stats.display(),
        returns.display(),
        extra
    );
    fs::write(&config_path, content).unwrap();
    config_path
}
