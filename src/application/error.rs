// Errors surfaced by the upstream sensor API
use serde_json::Value;
use thiserror::Error;

const GENERIC_FAILURE: &str = "Failed to load sensor data";
const NOT_AUTHENTICATED: &str = "Not authenticated";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("not authenticated")]
    NotAuthenticated,

    #[error("unexpected payload: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-2xx upstream response.
    ///
    /// The message comes from a JSON `detail` field when one is present,
    /// otherwise from the status and raw body. A 403 whose detail reads
    /// "Not authenticated", and any 401 that survived the token refresh,
    /// become `NotAuthenticated`.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|json| json.get("detail").and_then(detail_message));

        if status == 401 || (status == 403 && detail.as_deref() == Some(NOT_AUTHENTICATED)) {
            return ApiError::NotAuthenticated;
        }

        let message = detail.unwrap_or_else(|| {
            let body = body.trim();
            if body.is_empty() {
                format!("HTTP {}", status)
            } else {
                format!("HTTP {}: {}", status, body)
            }
        });
        ApiError::Http { status, message }
    }

    /// Text suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { message, .. } => message.clone(),
            ApiError::NotAuthenticated => NOT_AUTHENTICATED.to_string(),
            ApiError::Transport(_) | ApiError::Decode(_) => GENERIC_FAILURE.to_string(),
        }
    }
}

// FastAPI sends either a string or a list of validation errors.
fn detail_message(detail: &Value) -> Option<String> {
    match detail {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}
