//! HTTP error responses

use crate::hub::HubError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use helpdesk_common::{AppError, ErrorResponse};

/// Error returned from HTTP handlers
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub AppError);

impl ApiError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<HubError> for ApiError {
    fn from(err: HubError) -> Self {
        Self(AppError::Unavailable(err.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = ?self.0, "Server error occurred");
        }

        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}

/// Type alias for HTTP handler results
pub type ApiResult<T> = Result<T, ApiError>;
