//! Error types for the servtrack client.

use thiserror::Error;

/// A shared error type for every layer of the servtrack client.
///
/// The taxonomy mirrors what callers need to branch on: transport failures
/// with no server reply, server replies with a failure status, client-side
/// input rejection, and credential-storage failures.
#[derive(Error, Debug, Clone)]
pub enum ServtrackError {
    /// Transport failure: the request never produced a server reply.
    #[error("network error: {message}")]
    Network { message: String },

    /// The server replied with a failure status.
    #[error("server rejected request (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        status: u16,
        /// Human-readable message extracted from the error payload, if any.
        message: Option<String>,
    },

    /// Client-side precondition failure; no request was sent.
    #[error("validation error: {0}")]
    Validation(String),

    /// Credential read/write/delete failure.
    #[error("credential storage error: {0}")]
    Storage(String),

    /// Internal error (should not happen in normal operation).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServtrackError {
    /// Creates a Network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates a Server error without a payload message.
    pub fn server(status: u16) -> Self {
        Self::Server {
            status,
            message: None,
        }
    }

    /// Creates a Server error carrying the payload message.
    pub fn server_with_message(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: Some(message.into()),
        }
    }

    /// Creates a Validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a Network error.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Check if this is a Validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a Storage error.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Check if this is a server reply with status 401.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Server { status: 401, .. })
    }

    /// Derives the display string a store publishes as `last_error`.
    ///
    /// Server-provided payload messages and client-side validation messages
    /// are shown verbatim; everything else falls back to the
    /// operation-specific message, matching the UI contract.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Validation(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for ServtrackError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::server(status.as_u16()),
            None => Self::Network {
                message: err.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for ServtrackError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON error: {err}"))
    }
}

impl From<std::io::Error> for ServtrackError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("{} (kind: {:?})", err, err.kind()))
    }
}

/// A type alias for `Result<T, ServtrackError>`.
pub type Result<T> = std::result::Result<T, ServtrackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_unauthorized() {
        assert!(ServtrackError::server(401).is_unauthorized());
        assert!(!ServtrackError::server(500).is_unauthorized());
        assert!(!ServtrackError::network("down").is_unauthorized());
    }

    #[test]
    fn test_user_message_prefers_payload() {
        let err = ServtrackError::server_with_message(422, "Title is required");
        assert_eq!(err.user_message("Failed to create service"), "Title is required");
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = ServtrackError::server(500);
        assert_eq!(err.user_message("Login failed"), "Login failed");

        let err = ServtrackError::network("connection refused");
        assert_eq!(err.user_message("Login failed"), "Login failed");
    }

    #[test]
    fn test_user_message_validation_verbatim() {
        let err = ServtrackError::validation("invalid role: 'superuser'");
        assert_eq!(
            err.user_message("Registration failed"),
            "invalid role: 'superuser'"
        );
    }
}
