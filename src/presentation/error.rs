use crate::application::error::ApiError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
}

/// Upstream failures as seen by our HTTP clients.
#[derive(Debug)]
pub struct HttpError(pub ApiError);

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        HttpError(err)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let message = self.0.user_message();
        let (status, error, upstream_status) = match &self.0 {
            ApiError::NotAuthenticated => (StatusCode::UNAUTHORIZED, "not_authenticated", None),
            ApiError::Http { status: 403, .. } => (StatusCode::FORBIDDEN, "forbidden", Some(403)),
            ApiError::Http { status: 404, .. } => (StatusCode::NOT_FOUND, "not_found", Some(404)),
            ApiError::Http { status, .. } => (StatusCode::BAD_GATEWAY, "upstream_error", Some(*status)),
            ApiError::Transport(_) => (StatusCode::BAD_GATEWAY, "upstream_unavailable", None),
            ApiError::Decode(_) => (StatusCode::BAD_GATEWAY, "upstream_payload", None),
        };

        if status == StatusCode::BAD_GATEWAY {
            tracing::warn!("Upstream failure: {}", self.0);
        }

        let body = ErrorResponse {
            error,
            message,
            upstream_status,
        };
        (status, Json(body)).into_response()
    }
}
