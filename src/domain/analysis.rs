//! Analysis orchestration: one request in, one self-contained result out.
//!
//! The catalog is shared read-only between requests; nothing here mutates it
//! or carries state across calls.

use super::aggregate::portfolio_returns;
use super::allocation::{AllocationPlan, Selection, resolve};
use super::catalog::Catalog;
use super::error::UnitfolioError;
use super::metrics::PortfolioResult;
use super::risk::RiskAppetite;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub selection: Selection,
    /// Ceiling on `required_equity / total_allocation`, as a fraction.
    pub max_leverage: f64,
    pub risk_appetite: RiskAppetite,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub plan: AllocationPlan,
    pub result: PortfolioResult,
    /// Aggregated monthly return per catalog month, chronological.
    pub monthly_returns: Vec<f64>,
    /// Drawdown floor implied by the requested risk appetite.
    pub risk_floor: f64,
    /// True when the portfolio's drawdown breaches the floor. The analysis
    /// still completes; presentation layers surface this as a warning.
    pub risk_alert: bool,
}

/// Run the full pipeline: resolve the allocation, aggregate returns, compute
/// portfolio statistics and check the result against the risk floor.
pub fn analyze(catalog: &Catalog, request: &AnalysisRequest) -> Result<Analysis, UnitfolioError> {
    let plan = resolve(&request.selection, &catalog.records, request.max_leverage)?;
    let monthly_returns = portfolio_returns(&plan, &catalog.returns);
    let result = PortfolioResult::compute(&plan, &catalog.records, &monthly_returns);

    let risk_floor = request.risk_appetite.floor(catalog.benchmark_drawdown());
    let risk_alert = result.max_drawdown < risk_floor;

    Ok(Analysis {
        plan,
        result,
        monthly_returns,
        risk_floor,
        risk_alert,
    })
}
