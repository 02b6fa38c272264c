use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domain::DomainError;
use serde_json::json;
use tracing::error;

/// A failed request. Storage failures answer 500 on reads and 400 on writes,
/// so the error remembers which kind of operation produced it.
#[derive(Debug)]
pub struct ApiError {
    error: DomainError,
    during_write: bool,
}

impl ApiError {
    /// Wraps an error raised while changing state.
    pub fn write(error: DomainError) -> Self {
        Self { error, during_write: true }
    }

    pub fn status(&self) -> StatusCode {
        match &self.error {
            DomainError::ValidationError(_)
            | DomainError::InvalidListing(_)
            | DomainError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            DomainError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::RepositoryError(_) if self.during_write => StatusCode::BAD_REQUEST,
            DomainError::RepositoryError(_) | DomainError::CredentialError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self { error, during_write: false }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if matches!(
            self.error,
            DomainError::RepositoryError(_) | DomainError::CredentialError(_)
        ) {
            error!(status = status.as_u16(), error = %self.error, "request failed");
        }

        let body = match self.error {
            DomainError::InvalidListing(errors) => json!({ "success": false, "errors": errors }),
            other => json!({ "success": false, "error": other.public_message() }),
        };
        (status, Json(body)).into_response()
    }
}
