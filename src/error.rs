use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::{api::ApiError, models::ActionMessage, paths};

/// PortalError
///
/// Handler-level error. A backend 401 has already cleared the session by the time it
/// gets here, so it turns into a navigation to login rather than an error body.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The backend refused the submitted credentials on the login form.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PortalError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            PortalError::Api(api) => match api {
                ApiError::Network { .. } => (
                    StatusCode::BAD_GATEWAY,
                    "Cannot connect to server. Please check if the backend is running.".to_string(),
                ),
                ApiError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message.clone()),
                ApiError::Forbidden(message) => (StatusCode::FORBIDDEN, message.clone()),
                ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
                ApiError::Server { message, .. } => (StatusCode::BAD_GATEWAY, message.clone()),
                ApiError::Status { status, message } => (*status, message.clone()),
                ApiError::Decode(_) => (StatusCode::BAD_GATEWAY, api.to_string()),
                ApiError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, api.to_string()),
            },
            PortalError::InvalidCredentials(message) => (StatusCode::UNAUTHORIZED, message.clone()),
            PortalError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            PortalError::Serialization(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        }
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        if let PortalError::Api(ApiError::Unauthorized(_)) = &self {
            return Redirect::to(paths::LOGIN).into_response();
        }

        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "request rejected");
        }

        (
            status,
            Json(ActionMessage {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}
