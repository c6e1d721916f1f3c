//! Web dashboard adapter.
//!
//! Axum server with an HTMX frontend: the catalog is loaded once at startup
//! and shared read-only, each analysis request is self-contained.

mod error;
mod handlers;
mod templates;

pub use error::WebError;
pub use handlers::*;
pub use templates::*;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::domain::catalog::Catalog;
use crate::domain::error::UnitfolioError;

pub struct AppState {
    pub catalog: Arc<Catalog>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/analyze", post(handlers::analyze_portfolio))
        .fallback(handlers::not_found)
        .with_state(Arc::new(state))
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: AppState, listen: &str) -> Result<(), UnitfolioError> {
    let listener = tokio::net::TcpListener::bind(listen).await?;
    eprintln!("listening on http://{listen}");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
