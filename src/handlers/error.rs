//! Error responses
//!
//! Every failure leaves the API as `{"error": {"kind": ..., "message": ...}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::utils::errors::{CampBarError, ErrorKind, ErrorSeverity};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub kind: &'static str,
    pub message: String,
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidState | ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for CampBarError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        match self.severity() {
            ErrorSeverity::Critical | ErrorSeverity::Error => error!(error = %self, kind = %kind, "Request failed"),
            ErrorSeverity::Warning => warn!(error = %self, kind = %kind, "Request rejected"),
            ErrorSeverity::Info => debug!(error = %self, kind = %kind, "Request rejected"),
        }

        let body = ErrorBody {
            error: ErrorDetail {
                kind: kind.as_str(),
                message: self.user_message(),
            },
        };
        (status_for(kind), Json(body)).into_response()
    }
}
