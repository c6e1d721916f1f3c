//! HTTP error responses for the web adapter.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::domain::error::UnitfolioError;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<UnitfolioError> for WebError {
    fn from(err: UnitfolioError) -> Self {
        let status = match &err {
            // Selection problems come back to the form, not as failures.
            UnitfolioError::EmptySelection
            | UnitfolioError::UnknownStrategy { .. }
            | UnitfolioError::LeverageExceeded { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            UnitfolioError::ConfigParse { .. }
            | UnitfolioError::ConfigMissing { .. }
            | UnitfolioError::ConfigInvalid { .. } => StatusCode::BAD_REQUEST,
            UnitfolioError::DataFormat { .. } | UnitfolioError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.to_string())
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let html = format!(
            "<div id=\"result\" class=\"error\"><strong>Error {}</strong><p>{}</p></div>",
            self.status.as_u16(),
            escape_html(&self.message)
        );
        (self.status, Html(html)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_errors_are_unprocessable() {
        let err: WebError = UnitfolioError::EmptySelection.into();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.message, "no strategy selected");
    }

    #[test]
    fn leverage_errors_keep_the_domain_message() {
        let err: WebError = UnitfolioError::LeverageExceeded {
            effective: 0.6,
            maximum: 0.5,
        }
        .into();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.message.contains("60.0%"));
    }

    #[test]
    fn io_errors_are_internal() {
        let err: WebError = UnitfolioError::Io(std::io::Error::other("disk gone")).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
