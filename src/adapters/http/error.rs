//! JSON error body and status mapping shared by every endpoint.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::application::GetAdherenceReportError;
use crate::domain::action_plan::ActionPlanError;
use crate::domain::foundation::{DomainError, ErrorKind, ValidationError};
use crate::domain::phase::PhaseGateError;

/// Standard error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<&DomainError> for ErrorResponse {
    fn from(err: &DomainError) -> Self {
        let details = if err.details.is_empty() {
            None
        } else {
            serde_json::to_value(&err.details).ok()
        };
        Self {
            code: err.code.to_string(),
            message: err.message.clone(),
            details,
        }
    }
}

/// Errors returned by the HTTP handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Request could not be parsed (bad path id, malformed date).
    BadRequest(String),
    Domain(DomainError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Domain(err) => match err.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::ConcurrencyConflict => StatusCode::CONFLICT,
                ErrorKind::CollaboratorUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Domain(err.into())
    }
}

impl From<PhaseGateError> for ApiError {
    fn from(err: PhaseGateError) -> Self {
        ApiError::Domain(err.into())
    }
}

impl From<ActionPlanError> for ApiError {
    fn from(err: ActionPlanError) -> Self {
        ApiError::Domain(err.into())
    }
}

impl From<GetAdherenceReportError> for ApiError {
    fn from(err: GetAdherenceReportError) -> Self {
        ApiError::Domain(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::BadRequest(msg) => ErrorResponse::bad_request(msg.clone()),
            ApiError::Domain(err) => {
                if status.is_server_error() {
                    tracing::error!(code = %err.code, error = %err.message, "Request failed");
                }
                ErrorResponse::from(err)
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Parses a path segment into a typed id, as a 400 on failure.
pub(crate) fn parse_path<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {}: {}", what, raw)))
}
