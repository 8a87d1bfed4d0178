//! JSON error responses for the API.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::state::LoadError;
use crate::web::middleware::request_log::ListingOutcome;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication failed")]
    Unauthenticated,
    #[error("Failed to fetch diplomas")]
    FetchFailed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::FetchFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<LoadError> for ApiError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Unauthenticated => Self::Unauthenticated,
            LoadError::Portal(_) | LoadError::TimedOut(_) => Self::FetchFailed,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let outcome = match &self {
            Self::Unauthenticated => ListingOutcome::Unauthenticated,
            Self::FetchFailed => ListingOutcome::FetchFailed,
        };
        let mut response =
            (self.status(), Json(json!({ "error": self.to_string() }))).into_response();
        response.extensions_mut().insert(outcome);
        response
    }
}
