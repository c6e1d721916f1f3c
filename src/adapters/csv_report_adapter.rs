//! CSV report adapter implementing ReportPort.
//!
//! Writes two sheets: the summary at `output_path` (metric,value rows plus
//! the holdings table) and the monthly series next to it with a `_returns`
//! suffix (date, portfolio return, cumulative return, benchmark return).

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::aggregate::cumulative_returns;
use crate::domain::error::UnitfolioError;
use crate::ports::report_port::{AnalysisReport, ReportPort};

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn returns_path(output_path: &str) -> PathBuf {
        let path = Path::new(output_path);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report".to_string());
        path.with_file_name(format!("{stem}_returns.csv"))
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn csv_err(e: csv::Error) -> UnitfolioError {
    UnitfolioError::Io(std::io::Error::other(e.to_string()))
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, report: &AnalysisReport<'_>, output_path: &str) -> Result<(), UnitfolioError> {
        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let result = &report.analysis.result;
        let plan = &report.analysis.plan;

        let mut wtr = csv::Writer::from_path(path).map_err(csv_err)?;
        wtr.write_record(["metric", "value"]).map_err(csv_err)?;
        let rows: [(&str, String); 16] = [
            ("total_allocation", format!("{:.2}", result.total_allocation)),
            ("required_equity", format!("{:.2}", result.required_equity)),
            (
                "effective_leverage",
                format!("{:.6}", plan.effective_leverage()),
            ),
            ("total_trades", result.total_trades.to_string()),
            ("winning_trades", result.winning_trades.to_string()),
            ("losing_trades", result.losing_trades.to_string()),
            ("win_rate", format!("{:.6}", result.win_rate())),
            ("average_winner", format!("{:.2}", result.average_winner)),
            ("average_loser", format!("{:.2}", result.average_loser)),
            ("average_net", format!("{:.2}", result.average_net)),
            ("max_drawdown", format!("{:.6}", result.max_drawdown)),
            (
                "average_year_return",
                format!("{:.6}", result.average_year_return),
            ),
            ("sharpe_ratio", format!("{:.4}", result.sharpe_ratio)),
            ("sortino_ratio", format!("{:.4}", result.sortino_ratio)),
            ("calmar_ratio", format!("{:.4}", result.calmar_ratio)),
            ("risk_alert", report.analysis.risk_alert.to_string()),
        ];
        for (metric, value) in rows {
            wtr.write_record([metric, &value]).map_err(csv_err)?;
        }
        wtr.write_record([""; 2]).map_err(csv_err)?;
        wtr.write_record(["strategy", "units"]).map_err(csv_err)?;
        for entry in &plan.entries {
            wtr.write_record([entry.name.as_str(), &entry.units.to_string()])
                .map_err(csv_err)?;
        }
        wtr.write_record([""; 2]).map_err(csv_err)?;
        wtr.write_record(["strategy", "weight"]).map_err(csv_err)?;
        for entry in &plan.entries {
            wtr.write_record([entry.name.as_str(), &format!("{:.6}", entry.weight)])
                .map_err(csv_err)?;
        }
        wtr.flush()?;

        let cumulative = cumulative_returns(&report.analysis.monthly_returns);
        let mut wtr = csv::Writer::from_path(Self::returns_path(output_path)).map_err(csv_err)?;
        wtr.write_record(["date", "portfolio_return", "cumulative_return", "benchmark_return"])
            .map_err(csv_err)?;
        for (idx, month) in report.months.iter().enumerate() {
            let portfolio = report
                .analysis
                .monthly_returns
                .get(idx)
                .copied()
                .unwrap_or(0.0);
            let cum = cumulative.get(idx).copied().unwrap_or(0.0);
            let benchmark = report
                .benchmark
                .and_then(|s| s.values.get(idx))
                .and_then(|v| *v)
                .map(|v| format!("{:.6}", v))
                .unwrap_or_default();
            wtr.write_record([
                month.format("%Y-%m-%d").to_string(),
                format!("{:.6}", portfolio),
                format!("{:.6}", cum),
                benchmark,
            ])
            .map_err(csv_err)?;
        }
        wtr.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::{AnalysisRequest, analyze};
    use crate::domain::catalog::{Catalog, StrategyRecord};
    use crate::domain::returns::{ReturnSeries, ReturnTable};
    use crate::domain::risk::RiskAppetite;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn sample_catalog() -> Catalog {
        Catalog {
            records: vec![StrategyRecord {
                name: "DELTA S&P".into(),
                unit_equity: 100_000.0,
                total_trades: 100,
                winning_trades: 60,
                losing_trades: 40,
                average_winner: 1_000.0,
                average_loser: -500.0,
                average_net: 400.0,
                max_drawdown: -0.08,
                average_year_return: 0.12,
                sharpe_ratio: 1.1,
                sortino_ratio: 1.6,
                calmar_ratio: 1.0,
                margin_fraction: 0.4,
            }],
            returns: ReturnTable {
                months: vec![
                    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                ],
                series: vec![ReturnSeries {
                    name: "DELTA S&P".into(),
                    values: vec![Some(0.02), Some(-0.01)],
                }],
            },
        }
    }

    #[test]
    fn writes_summary_and_returns_sheets() {
        let catalog = sample_catalog();
        let request = AnalysisRequest {
            selection: [("DELTA S&P".to_string(), 2)].into_iter().collect(),
            max_leverage: 1.0,
            risk_appetite: RiskAppetite::MaxDd10,
        };
        let analysis = analyze(&catalog, &request).unwrap();
        let report = AnalysisReport {
            analysis: &analysis,
            months: &catalog.returns.months,
            benchmark: None,
            risk_appetite: request.risk_appetite,
        };

        let dir = tempdir().unwrap();
        let output = dir.path().join("summary.csv");
        CsvReportAdapter::new()
            .write(&report, output.to_str().unwrap())
            .unwrap();

        let summary = fs::read_to_string(&output).unwrap();
        assert!(summary.contains("total_allocation,200000.00"));
        assert!(summary.contains("DELTA S&P,2"));
        assert!(summary.contains("risk_alert,false"));
        assert!(summary.contains("sharpe_ratio,1.1000"));
        assert!(summary.contains("sortino_ratio,1.6000"));
        assert!(summary.contains("calmar_ratio,1.0000"));

        let returns = fs::read_to_string(dir.path().join("summary_returns.csv")).unwrap();
        assert!(returns.contains("2024-01-01,0.020000,0.020000,"));
        assert!(returns.contains("2024-02-01,-0.010000,0.009800,"));
    }

    #[test]
    fn returns_path_keeps_directory() {
        assert_eq!(
            CsvReportAdapter::returns_path("/tmp/out/report.csv"),
            PathBuf::from("/tmp/out/report_returns.csv")
        );
    }
}
