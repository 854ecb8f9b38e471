use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::info;

use investoros_core::{FieldViolation, UnderwritingError};

/// Errors surfaced by the HTTP handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Body could not be read as JSON (syntax, content type, size).
    Body(JsonRejection),
    Underwriting(UnderwritingError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: Vec<FieldViolation>,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Body(rejection)
    }
}

impl From<UnderwritingError> for ApiError {
    fn from(err: UnderwritingError) -> Self {
        ApiError::Underwriting(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Body(rejection) => (
                rejection.status(),
                vec![FieldViolation {
                    field: "body".to_string(),
                    constraint: "a JSON document".to_string(),
                    value: Some(rejection.body_text()),
                }],
            ),
            ApiError::Underwriting(UnderwritingError::InvalidInput { violations }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, violations)
            }
            ApiError::Underwriting(UnderwritingError::Serialization(msg)) => (
                StatusCode::BAD_REQUEST,
                vec![FieldViolation {
                    field: "body".to_string(),
                    constraint: "a JSON document".to_string(),
                    value: Some(msg),
                }],
            ),
        };

        let fields: Vec<&str> = detail.iter().map(|v| v.field.as_str()).collect();
        info!(status = status.as_u16(), ?fields, "request rejected");

        (status, Json(ErrorBody { detail })).into_response()
    }
}
