use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the service layer. Requests that merely do not apply
/// in the current session phase are not errors.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No configured tier carries this label.
    #[error("unknown tier `{0}`")]
    UnknownTier(String),
    /// No session has finished since the last start.
    #[error("no finished session")]
    NoFinishedSession,
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            err @ (ServiceError::UnknownTier(_) | ServiceError::NoFinishedSession) => {
                AppError::NotFound(err.to_string())
            }
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::UnknownTier("Expert".into()), StatusCode::NOT_FOUND),
            (ServiceError::NoFinishedSession, StatusCode::NOT_FOUND),
            (ServiceError::InvalidInput("colour".into()), StatusCode::BAD_REQUEST),
        ];
        for (err, status) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), status);
        }
    }
}
