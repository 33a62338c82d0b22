//! Error classification and serializable error payloads for the session layer.
//!
//! Every error a caller can see converts into an [`ErrorResponse`] carrying a
//! machine-readable code, a message and optional structured details. The
//! [`IntoErrorResponse::report`] helper logs the error at a level chosen by
//! its [`ErrorSeverity`].
use pokerlab_engine::errors::ErrorKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Standard error payload handed to transports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "session_not_found")
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (structured data)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Error classification for logging levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Caller mistakes; expected during normal play
    Client,
    /// Unexpected failures that need investigation
    Server,
    /// Table integrity is at risk
    Critical,
}

impl From<ErrorKind> for ErrorSeverity {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Validation | ErrorKind::State => ErrorSeverity::Client,
            ErrorKind::InvariantViolation => ErrorSeverity::Critical,
        }
    }
}

pub trait IntoErrorResponse {
    /// Machine-readable error code
    fn error_code(&self) -> &'static str;

    /// Human-readable error message
    fn error_message(&self) -> String;

    fn error_details(&self) -> Option<serde_json::Value> {
        None
    }

    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Client
    }

    fn to_error_response(&self) -> ErrorResponse {
        if let Some(details) = self.error_details() {
            ErrorResponse::with_details(self.error_code(), self.error_message(), details)
        } else {
            ErrorResponse::new(self.error_code(), self.error_message())
        }
    }

    /// Logs the error according to its severity and returns the payload.
    fn report(&self) -> ErrorResponse {
        let response = self.to_error_response();
        match self.severity() {
            ErrorSeverity::Client => {
                tracing::info!(code = %response.error, "client error: {}", response.message)
            }
            ErrorSeverity::Server => {
                tracing::error!(code = %response.error, "server error: {}", response.message)
            }
            ErrorSeverity::Critical => {
                tracing::error!(
                    code = %response.error,
                    critical = true,
                    "critical error: {}",
                    response.message
                )
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_response_serialization() {
        let error = ErrorResponse::new("test_error", "Test error message");
        let json = serde_json::to_value(&error).expect("serialize");

        assert_eq!(json["error"], "test_error");
        assert_eq!(json["message"], "Test error message");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn error_response_with_details() {
        let details = json!({ "seat": 3, "minimum": 20 });

        let error = ErrorResponse::with_details("validation_error", "Invalid raise", details);
        let json = serde_json::to_value(&error).expect("serialize");

        assert_eq!(json["error"], "validation_error");
        assert_eq!(json["details"]["minimum"], 20);
    }

    #[test]
    fn error_response_display() {
        let error = ErrorResponse::new("session_not_found", "no such session");
        assert_eq!(error.to_string(), "session_not_found: no such session");
    }

    #[test]
    fn severity_follows_error_kind() {
        assert_eq!(ErrorSeverity::from(ErrorKind::Validation), ErrorSeverity::Client);
        assert_eq!(ErrorSeverity::from(ErrorKind::State), ErrorSeverity::Client);
        assert_eq!(
            ErrorSeverity::from(ErrorKind::InvariantViolation),
            ErrorSeverity::Critical
        );
    }
}
