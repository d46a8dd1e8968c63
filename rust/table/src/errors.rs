/// Error reporting for table operations
///
/// This module provides:
/// - A serializable error reply for callers outside the process
/// - Severity classification used to pick the log level
/// - Error logging through `tracing`
use serde::{Deserialize, Serialize};
use std::fmt;

/// Standard error payload handed to whatever front end drives the table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorReply {
    /// Machine-readable error code (e.g., "not_your_turn")
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (structured data)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorReply {
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

impl fmt::Display for ErrorReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Error classification for logging levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Rejected requests: wrong turn, bad bet, paused table
    Client,
    /// Failures on our side such as a storage backend error
    Server,
    /// Lock poisoning and other integrity problems
    Critical,
}

/// Trait for converting errors to replies with proper logging
pub trait IntoErrorReply {
    /// Get the error code string (machine-readable)
    fn error_code(&self) -> &'static str;

    /// Get the error message (human-readable)
    fn error_message(&self) -> String;

    fn error_details(&self) -> Option<serde_json::Value> {
        None
    }

    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Client
    }

    fn to_error_reply(&self) -> ErrorReply {
        if let Some(details) = self.error_details() {
            ErrorReply::with_details(self.error_code(), self.error_message(), details)
        } else {
            ErrorReply::new(self.error_code(), self.error_message())
        }
    }

    /// Convert to a reply, logging at the level its severity calls for
    fn into_logged_reply(self) -> ErrorReply
    where
        Self: Sized,
    {
        let reply = self.to_error_reply();
        match self.severity() {
            ErrorSeverity::Client => log_client_error(&reply),
            ErrorSeverity::Server => log_server_error(&reply),
            ErrorSeverity::Critical => log_critical_error(&reply),
        }
        reply
    }
}

fn log_client_error(error: &ErrorReply) {
    tracing::info!(error = %error.error, message = %error.message, "request rejected");
}

fn log_server_error(error: &ErrorReply) {
    tracing::error!(error = %error.error, message = %error.message, "table error");
}

fn log_critical_error(error: &ErrorReply) {
    tracing::error!(
        error = %error.error,
        message = %error.message,
        critical = true,
        "critical table error"
    );
}
