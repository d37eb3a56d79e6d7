use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::domain::DomainError;

/// Request-boundary wrapper: every handler error becomes a JSON `{"error": …}`
/// body with the status from the taxonomy; nothing propagates as a crash.
#[derive(Debug)]
pub struct ApiError(DomainError);

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            DomainError::Authentication(_) => StatusCode::UNAUTHORIZED,
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Storage(_)
            | DomainError::Embedding(_)
            | DomainError::Persistence(_)
            | DomainError::RlsDenied(_)
            | DomainError::IoError(_)
            | DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
