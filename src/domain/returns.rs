//! Monthly return series, aligned on a shared sequence of calendar months.
//!
//! Row order is chronological and load-bearing: compounding and drawdown
//! depend on sequence, not on date lookups. A `None` cell means the strategy
//! has no return recorded for that month.

use chrono::NaiveDate;

use super::catalog::is_benchmark_name;

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    pub name: String,
    /// One entry per month in [`ReturnTable::months`], in the same order.
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReturnTable {
    pub months: Vec<NaiveDate>,
    pub series: Vec<ReturnSeries>,
}

impl ReturnTable {
    pub fn series(&self, name: &str) -> Option<&ReturnSeries> {
        self.series.iter().find(|s| s.name == name)
    }

    pub fn benchmark(&self) -> Option<&ReturnSeries> {
        self.series.iter().find(|s| is_benchmark_name(&s.name))
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn sample_table() -> ReturnTable {
        ReturnTable {
            months: vec![date(2024, 1), date(2024, 2)],
            series: vec![
                ReturnSeries {
                    name: "DELTA S&P".into(),
                    values: vec![Some(0.02), None],
                },
                ReturnSeries {
                    name: "S&P 500".into(),
                    values: vec![Some(0.01), Some(-0.03)],
                },
            ],
        }
    }

    #[test]
    fn series_lookup_by_name() {
        let table = sample_table();
        assert!(table.series("DELTA S&P").is_some());
        assert!(table.series("MISSING").is_none());
    }

    #[test]
    fn benchmark_lookup_uses_marker_rules() {
        let table = sample_table();
        assert_eq!(table.benchmark().map(|s| s.name.as_str()), Some("S&P 500"));
    }

    #[test]
    fn len_tracks_months() {
        let table = sample_table();
        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
        assert!(ReturnTable::default().is_empty());
    }
}
