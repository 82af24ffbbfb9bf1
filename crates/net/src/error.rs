//! Network error types

use serde_json::Value;

/// Network result type
pub type Result<T> = std::result::Result<T, Error>;

/// Network errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Transport(reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    /// The backend rejected the stored token; it has already been cleared
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Upload rejected: {0}")]
    Upload(String),

    #[error("Token storage error: {0}")]
    Storage(#[from] csquare_core::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else {
            Error::Transport(err)
        }
    }
}

impl Error {
    /// Build the error for a non-success response body
    ///
    /// A 4xx body carrying a `details` array is a validation failure,
    /// anything else keeps the backend's `error` (or `message`) text.
    pub(crate) fn from_response(status: u16, body: &Value) -> Self {
        if (400..500).contains(&status) {
            let details: Vec<String> = body
                .get("details")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .map(|d| match d {
                            Value::String(s) => s.clone(),
                            other => other
                                .get("message")
                                .and_then(Value::as_str)
                                .map(str::to_string)
                                .unwrap_or_else(|| other.to_string()),
                        })
                        .collect()
                })
                .unwrap_or_default();
            if !details.is_empty() {
                return Error::Validation(details);
            }
        }

        let message = ["error", "message"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str))
            .map(str::to_string);
        Error::Api { status, message }
    }

    /// HTTP status behind this error, when there was a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Unauthorized => Some(401),
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text the backend supplied with a failed response
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Status line for the UI: joined validation details, else `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Error::Validation(details) => details.join(", "),
            Error::Upload(reason) => reason.clone(),
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_details_become_validation() {
        let err = Error::from_response(
            400,
            &json!({ "error": "Validation failed", "details": ["Title is required", "Date is required"] }),
        );
        assert_eq!(
            err.user_message("Failed to add event"),
            "Title is required, Date is required"
        );
    }

    #[test]
    fn test_error_field_is_kept() {
        let err = Error::from_response(403, &json!({ "error": "Invalid credentials" }));
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.server_message(), Some("Invalid credentials"));
        assert_eq!(err.user_message("Login failed. Please try again."), "Login failed. Please try again.");
    }

    #[test]
    fn test_server_errors_ignore_details() {
        let err = Error::from_response(500, &json!({ "details": ["boom"] }));
        assert!(matches!(err, Error::Api { status: 500, message: None }));
    }

    #[test]
    fn test_object_details_use_message() {
        let err = Error::from_response(422, &json!({ "details": [{ "message": "Name too long" }] }));
        assert_eq!(err.user_message("x"), "Name too long");
    }
}
