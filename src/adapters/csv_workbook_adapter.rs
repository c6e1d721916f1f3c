//! CSV workbook adapter: loads the strategy statistics sheet and the monthly
//! returns sheet exported from the upstream workbook.
//!
//! The statistics sheet layout is positional and is the contract: a header
//! row of strategy names (first cell is the row-label column), then one
//! metric per row at a fixed offset. Renaming a row label changes nothing;
//! moving a row breaks the file.

use crate::domain::catalog::{Catalog, StrategyRecord};
use crate::domain::error::UnitfolioError;
use crate::domain::returns::{ReturnSeries, ReturnTable};
use crate::domain::stats::MonthlyPnl;
use crate::ports::catalog_port::CatalogPort;
use chrono::NaiveDate;
use csv::StringRecord;
use std::fs;
use std::path::{Path, PathBuf};

// Metric row offsets below the header row.
const ROW_UNIT_EQUITY: usize = 0;
const ROW_TOTAL_TRADES: usize = 1;
const ROW_WINNING_TRADES: usize = 2;
const ROW_LOSING_TRADES: usize = 3;
const ROW_AVERAGE_WINNER: usize = 4;
const ROW_AVERAGE_LOSER: usize = 5;
const ROW_AVERAGE_NET: usize = 6;
const ROW_MAX_DRAWDOWN: usize = 7;
const ROW_AVERAGE_YEAR: usize = 8;
const ROW_SHARPE: usize = 9;
const ROW_SORTINO: usize = 10;
const ROW_CALMAR: usize = 11;
// Row 12 is a spacer in the workbook export.
const ROW_MARGIN: usize = 13;
const MIN_STAT_ROWS: usize = 14;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct CsvWorkbookAdapter {
    stats_path: PathBuf,
    returns_path: PathBuf,
}

impl CsvWorkbookAdapter {
    pub fn new(stats_path: PathBuf, returns_path: PathBuf) -> Self {
        Self {
            stats_path,
            returns_path,
        }
    }
}

fn data_format(reason: impl Into<String>) -> UnitfolioError {
    UnitfolioError::DataFormat {
        reason: reason.into(),
    }
}

fn read_rows(path: &Path) -> Result<Vec<StringRecord>, UnitfolioError> {
    // An absent sheet is a data problem, not an I/O one.
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            data_format(format!("expected sheet {} does not exist", path.display()))
        } else {
            UnitfolioError::Io(e)
        }
    })?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result
            .map_err(|e| data_format(format!("CSV parse error in {}: {}", path.display(), e)))?;
        rows.push(record);
    }
    Ok(rows)
}

/// Numeric cell with workbook formatting tolerated. Missing or unparseable
/// cells coerce to 0.0.
fn cell_f64(row: &StringRecord, col: usize) -> f64 {
    row.get(col)
        .map(|s| s.trim().replace(['$', ','], ""))
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.0)
}

fn cell_count(row: &StringRecord, col: usize) -> u32 {
    let v = cell_f64(row, col);
    if v > 0.0 { v.round() as u32 } else { 0 }
}

fn load_stats(path: &Path) -> Result<Vec<StrategyRecord>, UnitfolioError> {
    let rows = read_rows(path)?;
    if rows.len() < MIN_STAT_ROWS + 1 {
        return Err(data_format(format!(
            "statistics sheet {} has {} rows, expected at least {}",
            path.display(),
            rows.len(),
            MIN_STAT_ROWS + 1
        )));
    }

    let header = &rows[0];
    let metrics = &rows[1..];
    let mut records = Vec::new();

    for col in 1..header.len() {
        let name = match header.get(col) {
            Some(n) if !n.trim().is_empty() => n.trim().to_string(),
            _ => continue,
        };
        let unit_equity = cell_f64(&metrics[ROW_UNIT_EQUITY], col);
        // A column without a unit equity is a placeholder, not a strategy.
        if unit_equity <= 0.0 {
            continue;
        }
        records.push(StrategyRecord {
            name,
            unit_equity,
            total_trades: cell_count(&metrics[ROW_TOTAL_TRADES], col),
            winning_trades: cell_count(&metrics[ROW_WINNING_TRADES], col),
            losing_trades: cell_count(&metrics[ROW_LOSING_TRADES], col),
            average_winner: cell_f64(&metrics[ROW_AVERAGE_WINNER], col),
            average_loser: cell_f64(&metrics[ROW_AVERAGE_LOSER], col),
            average_net: cell_f64(&metrics[ROW_AVERAGE_NET], col),
            max_drawdown: cell_f64(&metrics[ROW_MAX_DRAWDOWN], col),
            average_year_return: cell_f64(&metrics[ROW_AVERAGE_YEAR], col),
            sharpe_ratio: cell_f64(&metrics[ROW_SHARPE], col),
            sortino_ratio: cell_f64(&metrics[ROW_SORTINO], col),
            calmar_ratio: cell_f64(&metrics[ROW_CALMAR], col),
            margin_fraction: cell_f64(&metrics[ROW_MARGIN], col),
        });
    }

    Ok(records)
}

fn load_returns(path: &Path) -> Result<ReturnTable, UnitfolioError> {
    let rows = read_rows(path)?;
    let Some((header, data_rows)) = rows.split_first() else {
        return Err(data_format(format!(
            "returns sheet {} is empty",
            path.display()
        )));
    };

    match header.get(0) {
        Some(first) if first.trim().eq_ignore_ascii_case("date") => {}
        _ => {
            return Err(data_format(format!(
                "returns sheet {} must start with a DATE column",
                path.display()
            )));
        }
    }

    let names: Vec<String> = (1..header.len())
        .filter_map(|col| header.get(col))
        .map(|n| n.trim().to_string())
        .collect();

    let mut months: Vec<NaiveDate> = Vec::with_capacity(data_rows.len());
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::with_capacity(data_rows.len()); names.len()];

    for row in data_rows {
        let date_str = row.get(0).unwrap_or("").trim();
        let date = NaiveDate::parse_from_str(date_str, DATE_FORMAT).map_err(|e| {
            data_format(format!(
                "returns sheet {}: invalid date '{}': {}",
                path.display(),
                date_str,
                e
            ))
        })?;
        if let Some(&last) = months.last() {
            if date <= last {
                return Err(data_format(format!(
                    "returns sheet {}: rows must be in ascending date order ({} follows {})",
                    path.display(),
                    date,
                    last
                )));
            }
        }
        months.push(date);

        for (idx, column) in columns.iter_mut().enumerate() {
            let value = row
                .get(idx + 1)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .and_then(|s| s.parse().ok());
            column.push(value);
        }
    }

    let series = names
        .into_iter()
        .zip(columns)
        .map(|(name, values)| ReturnSeries { name, values })
        .collect();

    Ok(ReturnTable { months, series })
}

impl CatalogPort for CsvWorkbookAdapter {
    fn load_catalog(&self) -> Result<Catalog, UnitfolioError> {
        let records = load_stats(&self.stats_path)?;
        let returns = load_returns(&self.returns_path)?;
        Ok(Catalog { records, returns })
    }
}

/// Read a `month,pnl` CSV for single-strategy statistics. Expects a header
/// row and chronological rows.
pub fn read_pnl_series<P: AsRef<Path>>(path: P) -> Result<Vec<MonthlyPnl>, UnitfolioError> {
    let path = path.as_ref();
    let rows = read_rows(path)?;
    let Some((_header, data_rows)) = rows.split_first() else {
        return Err(data_format(format!("P&L file {} is empty", path.display())));
    };

    let mut series: Vec<MonthlyPnl> = Vec::with_capacity(data_rows.len());
    for row in data_rows {
        let date_str = row.get(0).unwrap_or("").trim();
        let month = NaiveDate::parse_from_str(date_str, DATE_FORMAT).map_err(|e| {
            data_format(format!(
                "P&L file {}: invalid date '{}': {}",
                path.display(),
                date_str,
                e
            ))
        })?;
        if let Some(last) = series.last() {
            if month <= last.month {
                return Err(data_format(format!(
                    "P&L file {}: rows must be in ascending date order",
                    path.display()
                )));
            }
        }
        let pnl_str = row.get(1).unwrap_or("").trim();
        let pnl: f64 = pnl_str.replace(['$', ','], "").parse().map_err(|_| {
            data_format(format!(
                "P&L file {}: invalid P&L value '{}' for {}",
                path.display(),
                pnl_str,
                month
            ))
        })?;
        series.push(MonthlyPnl { month, pnl });
    }
    Ok(series)
}
