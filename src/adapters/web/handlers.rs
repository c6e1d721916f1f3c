//! HTTP request handlers for the web dashboard.

use askama::Template;
use axum::{
    Form,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use crate::domain::allocation::Selection;
use crate::domain::analysis::{AnalysisRequest, analyze};
use crate::domain::config_validation::ALLOWED_LEVERAGE_PCT;
use crate::domain::risk::{RiskAppetite, filter_by_risk};
use crate::ports::report_port::AnalysisReport;

use super::{AppState, WebError, is_htmx_request};

#[derive(Debug, serde::Deserialize)]
pub struct DashboardParams {
    pub risk: Option<String>,
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DashboardParams>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let appetite = match params.risk.as_deref() {
        Some(raw) => raw
            .parse::<RiskAppetite>()
            .map_err(WebError::bad_request)?,
        None => RiskAppetite::BenchmarkLevel,
    };
    let benchmark_dd = state.catalog.benchmark_drawdown();
    let records = filter_by_risk(&state.catalog.records, appetite, benchmark_dd);

    let template =
        super::templates::DashboardTemplate::new(&records, appetite, &ALLOWED_LEVERAGE_PCT);
    if is_htmx_request(&headers) {
        Ok(Html(template.fragment()).into_response())
    } else {
        let html = template
            .render()
            .map_err(|e| WebError::internal(e.to_string()))?;
        Ok(Html(html).into_response())
    }
}

/// Parse the posted form fields. Strategy unit inputs are named
/// `units_<strategy name>`; everything else is fixed-name.
fn parse_form(fields: &[(String, String)]) -> Result<AnalysisRequest, WebError> {
    let mut selection = Selection::new();
    let mut max_leverage = 1.0;
    let mut risk_appetite = RiskAppetite::BenchmarkLevel;

    for (key, value) in fields {
        let value = value.trim();
        if let Some(name) = key.strip_prefix("units_") {
            if value.is_empty() {
                continue;
            }
            let units: u32 = value.parse().map_err(|_| {
                WebError::bad_request(format!("invalid unit count '{value}' for {name}"))
            })?;
            selection.insert(name.to_string(), units);
        } else if key == "max_leverage" {
            let pct: i64 = value
                .parse()
                .map_err(|_| WebError::bad_request(format!("invalid max leverage '{value}'")))?;
            max_leverage = pct as f64 / 100.0;
        } else if key == "risk_appetite" {
            risk_appetite = value.parse().map_err(WebError::bad_request)?;
        }
    }

    Ok(AnalysisRequest {
        selection,
        max_leverage,
        risk_appetite,
    })
}

pub async fn analyze_portfolio(
    State(state): State<Arc<AppState>>,
    _headers: HeaderMap,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response, WebError> {
    let request = parse_form(&fields)?;
    let analysis = analyze(&state.catalog, &request)?;

    let report = AnalysisReport {
        analysis: &analysis,
        months: &state.catalog.returns.months,
        benchmark: state.catalog.returns.benchmark(),
        risk_appetite: request.risk_appetite,
    };

    Ok(Html(super::templates::result_fragment(&report)).into_response())
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html("<h1>404 Not Found</h1>")).into_response()
}
