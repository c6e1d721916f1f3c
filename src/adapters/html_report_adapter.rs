//! HTML report adapter implementing ReportPort.
//!
//! Renders an Askama template with inline SVG charts: the metric card grid,
//! the holdings table, cumulative return vs benchmark and the drawdown
//! profile.

use std::fs;
use std::path::Path;

use askama::Template;
use chrono::Local;

use crate::adapters::chart_svg::{generate_cumulative_svg, generate_drawdown_svg};
use crate::adapters::format::{fmt_count, fmt_currency, fmt_pct, fmt_ratio};
use crate::domain::aggregate::cumulative_returns;
use crate::domain::error::UnitfolioError;
use crate::domain::metrics::equity_curve;
use crate::ports::report_port::{AnalysisReport, ReportPort};

pub struct MetricCard {
    pub label: String,
    pub value: String,
}

pub struct HoldingRow {
    pub name: String,
    pub units: u32,
    pub allocation: String,
    pub weight: String,
    pub required: String,
}

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate {
    generated: String,
    risk_appetite: String,
    risk_alert: Option<String>,
    cards: Vec<MetricCard>,
    holdings: Vec<HoldingRow>,
    cumulative_svg: String,
    drawdown_svg: String,
    month_span: String,
}

pub fn metric_cards(report: &AnalysisReport<'_>) -> Vec<MetricCard> {
    let result = &report.analysis.result;
    let card = |label: &str, value: String| MetricCard {
        label: label.to_string(),
        value,
    };
    vec![
        card("Total Allocation", fmt_currency(result.total_allocation)),
        card("Required Equity", fmt_currency(result.required_equity)),
        card(
            "Effective Leverage",
            fmt_pct(report.analysis.plan.effective_leverage()),
        ),
        card("Total Trades", fmt_count(result.total_trades)),
        card("Win Rate", fmt_pct(result.win_rate())),
        card("Average Winner", fmt_currency(result.average_winner)),
        card("Average Loser", fmt_currency(result.average_loser)),
        card("Average Net", fmt_currency(result.average_net)),
        card("Max Drawdown", fmt_pct(result.max_drawdown)),
        card("Avg Yearly Return", fmt_pct(result.average_year_return)),
        card("Sharpe Ratio", fmt_ratio(result.sharpe_ratio)),
        card("Sortino Ratio", fmt_ratio(result.sortino_ratio)),
        card("Calmar Ratio", fmt_ratio(result.calmar_ratio)),
    ]
}

pub fn holding_rows(report: &AnalysisReport<'_>) -> Vec<HoldingRow> {
    report
        .analysis
        .plan
        .entries
        .iter()
        .map(|entry| HoldingRow {
            name: entry.name.clone(),
            units: entry.units,
            allocation: fmt_currency(entry.allocation),
            weight: fmt_pct(entry.weight),
            required: fmt_currency(entry.required),
        })
        .collect()
}

pub fn risk_alert_message(report: &AnalysisReport<'_>) -> Option<String> {
    if report.analysis.risk_alert {
        Some(format!(
            "Portfolio max drawdown {} breaches the {} floor of {}",
            fmt_pct(report.analysis.result.max_drawdown),
            report.risk_appetite,
            fmt_pct(report.analysis.risk_floor),
        ))
    } else {
        None
    }
}

/// Cumulative return and drawdown charts for one analysis.
pub fn render_charts(report: &AnalysisReport<'_>) -> (String, String) {
    let cumulative = cumulative_returns(&report.analysis.monthly_returns);
    let benchmark_cumulative = report.benchmark.map(|series| {
        let filled: Vec<f64> = series.values.iter().map(|v| v.unwrap_or(0.0)).collect();
        cumulative_returns(&filled)
    });
    let cumulative_svg = generate_cumulative_svg(&cumulative, benchmark_cumulative.as_deref());
    let drawdown_svg = generate_drawdown_svg(&equity_curve(&report.analysis.monthly_returns));
    (cumulative_svg, drawdown_svg)
}

fn month_span(report: &AnalysisReport<'_>) -> String {
    match (report.months.first(), report.months.last()) {
        (Some(first), Some(last)) => {
            format!(
                "{} – {} ({} months)",
                first.format("%Y-%m"),
                last.format("%Y-%m"),
                report.months.len()
            )
        }
        _ => "no return history".to_string(),
    }
}

pub struct HtmlReportAdapter;

impl HtmlReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for HtmlReportAdapter {
    fn write(&self, report: &AnalysisReport<'_>, output_path: &str) -> Result<(), UnitfolioError> {
        let (cumulative_svg, drawdown_svg) = render_charts(report);

        let template = ReportTemplate {
            generated: Local::now().format("%Y-%m-%d %H:%M").to_string(),
            risk_appetite: report.risk_appetite.to_string(),
            risk_alert: risk_alert_message(report),
            cards: metric_cards(report),
            holdings: holding_rows(report),
            cumulative_svg,
            drawdown_svg,
            month_span: month_span(report),
        };

        let html = template
            .render()
            .map_err(|e| UnitfolioError::Io(std::io::Error::other(e.to_string())))?;

        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, html)?;

        Ok(())
    }
}
