//! HTML templates for the web dashboard.

use askama::Template;

use crate::adapters::format::{fmt_currency, fmt_pct};
use crate::adapters::html_report_adapter::{
    holding_rows, metric_cards, render_charts, risk_alert_message,
};
use crate::domain::risk::RiskAppetite;
use crate::ports::report_port::AnalysisReport;

pub struct StrategyOption {
    pub name: String,
    pub unit_equity: String,
    pub max_drawdown: String,
    pub margin: String,
}

pub struct RiskOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub strategies: Vec<StrategyOption>,
    pub risk_options: Vec<RiskOption>,
    pub leverage_options: Vec<i64>,
}

impl DashboardTemplate {
    pub fn new(
        records: &[crate::domain::catalog::StrategyRecord],
        selected: RiskAppetite,
        leverage_options: &[i64],
    ) -> Self {
        let strategies = records
            .iter()
            .map(|r| StrategyOption {
                name: r.name.clone(),
                unit_equity: fmt_currency(r.unit_equity),
                max_drawdown: fmt_pct(r.max_drawdown),
                margin: fmt_pct(r.margin_fraction),
            })
            .collect();
        let risk_options = RiskAppetite::ALL
            .iter()
            .map(|appetite| RiskOption {
                value: appetite.to_string(),
                label: appetite.to_string(),
                selected: *appetite == selected,
            })
            .collect();
        Self {
            strategies,
            risk_options,
            leverage_options: leverage_options.to_vec(),
        }
    }

    /// The selection form alone, for HTMX swaps of `#content`.
    pub fn fragment(&self) -> String {
        let mut html = String::from("<div id=\"content\"><h1>Portfolio Builder</h1>");
        html.push_str("<form hx-post=\"/analyze\" hx-target=\"#result\" hx-swap=\"outerHTML\">");

        html.push_str("<table>");
        html.push_str(
            "<tr><th>Strategy</th><th>Unit Equity</th><th>Max Drawdown</th><th>Margin</th><th>Units</th></tr>",
        );
        for strategy in &self.strategies {
            html.push_str(&format!(
                "<tr><td>{name}</td><td>{equity}</td><td>{dd}</td><td>{margin}</td><td><input type=\"number\" min=\"0\" name=\"units_{name}\" value=\"0\"></td></tr>",
                name = strategy.name,
                equity = strategy.unit_equity,
                dd = strategy.max_drawdown,
                margin = strategy.margin,
            ));
        }
        html.push_str("</table>");

        html.push_str("<label>Max Leverage: <select name=\"max_leverage\">");
        for pct in &self.leverage_options {
            html.push_str(&format!("<option value=\"{pct}\">{pct}%</option>"));
        }
        html.push_str("</select></label> ");

        html.push_str("<label>Risk Appetite: <select name=\"risk_appetite\">");
        for option in &self.risk_options {
            let selected = if option.selected { " selected" } else { "" };
            html.push_str(&format!(
                "<option value=\"{}\"{}>{}</option>",
                option.value, selected, option.label
            ));
        }
        html.push_str("</select></label> ");

        html.push_str("<button type=\"submit\">Analyze</button></form>");
        html.push_str("<div id=\"result\"></div></div>");
        html
    }
}

/// HTMX fragment for a completed analysis, swapped into `#result`.
pub fn result_fragment(report: &AnalysisReport<'_>) -> String {
    let mut html = String::from("<div id=\"result\">");

    if let Some(message) = risk_alert_message(report) {
        html.push_str(&format!("<div class=\"alert\">&#9888; {}</div>", message));
    }

    html.push_str("<h2>Metrics</h2><div class=\"cards\">");
    for card in metric_cards(report) {
        html.push_str(&format!(
            "<div class=\"card\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>",
            card.label, card.value
        ));
    }
    html.push_str("</div>");

    html.push_str("<h2>Holdings</h2><table>");
    html.push_str(
        "<tr><th>Strategy</th><th>Units</th><th>Allocation</th><th>Weight</th><th>Required</th></tr>",
    );
    for row in holding_rows(report) {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            row.name, row.units, row.allocation, row.weight, row.required
        ));
    }
    html.push_str("</table>");

    let (cumulative_svg, drawdown_svg) = render_charts(report);
    html.push_str(&format!(
        "<h2>Cumulative Return</h2><div class=\"chart\">{}</div>",
        cumulative_svg
    ));
    html.push_str(&format!(
        "<h2>Drawdown</h2><div class=\"chart\">{}</div>",
        drawdown_svg
    ));

    html.push_str("</div>");
    html
}
