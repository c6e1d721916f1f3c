//! Report generation port trait.

use chrono::NaiveDate;

use crate::domain::analysis::Analysis;
use crate::domain::error::UnitfolioError;
use crate::domain::returns::ReturnSeries;
use crate::domain::risk::RiskAppetite;

/// Everything a renderer needs to present one analysis.
pub struct AnalysisReport<'a> {
    pub analysis: &'a Analysis,
    pub months: &'a [NaiveDate],
    pub benchmark: Option<&'a ReturnSeries>,
    pub risk_appetite: RiskAppetite,
}

/// Port for writing analysis reports.
pub trait ReportPort {
    fn write(&self, report: &AnalysisReport<'_>, output_path: &str) -> Result<(), UnitfolioError>;
}
