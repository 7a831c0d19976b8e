//! Mapping of non-success responses onto the shared store error.

use reqwest::StatusCode;

use crate::remote::RemoteStoreError;

/// Pulls a readable message out of an error body.
///
/// JSON bodies are searched for `message`, then `error`; anything else is
/// used verbatim after trimming. An empty body falls back to the status
/// reason phrase.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(text) = json.get(key).and_then(serde_json::Value::as_str) {
                return text.to_owned();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_owned();
    }
    trimmed.to_owned()
}

/// Converts a non-success status and body into a store error.
pub(crate) fn status_error(status: StatusCode, body: &str) -> RemoteStoreError {
    let message = error_message(status, body);
    match status {
        StatusCode::UNAUTHORIZED => RemoteStoreError::Unauthorized(message),
        StatusCode::FORBIDDEN => RemoteStoreError::Forbidden(message),
        StatusCode::NOT_FOUND => RemoteStoreError::NotFound(message),
        StatusCode::CONFLICT => RemoteStoreError::Conflict(message),
        other => RemoteStoreError::Rejected {
            status: other.as_u16(),
            message,
        },
    }
}
