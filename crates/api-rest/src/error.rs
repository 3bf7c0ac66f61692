//! Mapping of core errors onto HTTP responses.

use api_shared::ErrorRes;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use records_core::PatientError;

/// An error ready to be returned from a handler as `{"detail": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<PatientError> for ApiError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::Validation(e) => Self::new(StatusCode::BAD_REQUEST, e.to_string()),
            PatientError::Conflict(id) => Self::new(
                StatusCode::BAD_REQUEST,
                format!("Patient already exists: {id}"),
            ),
            PatientError::InvalidQuery(message) => Self::new(StatusCode::BAD_REQUEST, message),
            PatientError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "Patient not found"),
            e @ (PatientError::Storage(_) | PatientError::InvalidConfig(_)) => {
                tracing::error!("Patient records error: {:?}", e);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorRes { detail: self.detail })).into_response()
    }
}
