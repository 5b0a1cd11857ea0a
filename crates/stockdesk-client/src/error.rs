//! # Client Error Types
//!
//! Error types for everything that talks to the backend.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     API                 │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Connection     │  │  Api { status, message }│ │
//! │  │  InvalidUrl     │  │  Timeout        │  │   401 / auth messages   │ │
//! │  │  ConfigLoad/Save│  │                 │  │   → refresh interceptor │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────────────────────────────────┐  │
//! │  │    Session      │  │     Protocol                                │  │
//! │  │                 │  │                                             │  │
//! │  │  SessionStore   │  │  InvalidResponse (body not the expected     │  │
//! │  │                 │  │  envelope), SerializationFailed, InvalidId  │  │
//! │  └─────────────────┘  └─────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use stockdesk_core::GENERIC_ERROR_MESSAGE;
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Backend messages that mean "your access token is no good".
pub const AUTH_ERROR_MESSAGES: [&str; 4] = [
    "Unauthorized",
    "Given token not valid for any token type",
    "Authentication credentials were not provided.",
    "Authentication token invalid or expired",
];

/// Client error type covering every failure a request can hit.
///
/// ## Design Principles
/// - Each variant includes enough context for debugging
/// - Errors are categorized for different handling strategies
/// - All errors are `Send + Sync` for async compatibility
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request never produced a response.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// No response within the per-request deadline.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    // =========================================================================
    // API Errors
    // =========================================================================
    /// The backend answered with a non-success status.
    ///
    /// `message` is the envelope's `message` (arrays joined with `, `),
    /// absent when the body carried none.
    #[error("API error {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },

    // =========================================================================
    // Session Errors
    // =========================================================================
    /// The session cookie store could not be read or written.
    #[error("Session store error: {0}")]
    SessionStore(String),

    // =========================================================================
    // Protocol Errors
    // =========================================================================
    /// The body was not the envelope we expected.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// An id that cannot stand as a single path segment.
    #[error("Invalid id: '{0}'")]
    InvalidId(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ClientError::InvalidConfig(err.to_string())
        } else if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else {
            ClientError::ConnectionFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::InvalidResponse(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// HTTP status, for API errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Backend message, for API errors.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Returns true if the access token was rejected.
    ///
    /// Either the status is 401 or the message is one of
    /// [`AUTH_ERROR_MESSAGES`] (some backends answer 403 with them).
    pub fn is_auth_failure(&self) -> bool {
        match self {
            ClientError::Api { status, message } => {
                *status == 401
                    || message
                        .as_deref()
                        .is_some_and(|m| AUTH_ERROR_MESSAGES.contains(&m))
            }
            _ => false,
        }
    }

    /// Returns true if the same request might succeed later.
    ///
    /// Informational only: the client itself never retries these.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::ConnectionFailed(_) | ClientError::Timeout(_) => true,
            ClientError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }

    /// Text to show the operator.
    ///
    /// The backend's own message when it sent one, otherwise a generic
    /// apology. Server-side crashes (`Internal server error`) also get the
    /// apology rather than leaking internals.
    pub fn user_message(&self) -> String {
        match self.api_message() {
            Some(message) if !message.contains("Internal server error") => message.to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, message: Option<&str>) -> ClientError {
        ClientError::Api {
            status,
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn test_auth_failure_detection() {
        assert!(api(401, None).is_auth_failure());
        assert!(api(403, Some("Given token not valid for any token type")).is_auth_failure());
        assert!(api(400, Some("Unauthorized")).is_auth_failure());

        assert!(!api(403, Some("Forbidden resource")).is_auth_failure());
        assert!(!api(500, None).is_auth_failure());
        assert!(!ClientError::Timeout(30).is_auth_failure());
    }

    #[test]
    fn test_user_message_fallbacks() {
        assert_eq!(api(400, Some("SKU already exists")).user_message(), "SKU already exists");
        assert_eq!(api(500, Some("Internal server error")).user_message(), GENERIC_ERROR_MESSAGE);
        assert_eq!(api(502, None).user_message(), GENERIC_ERROR_MESSAGE);
        assert_eq!(
            ClientError::ConnectionFailed("refused".into()).user_message(),
            GENERIC_ERROR_MESSAGE
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(ClientError::ConnectionFailed("network error".into()).is_retryable());
        assert!(ClientError::Timeout(30).is_retryable());
        assert!(api(503, None).is_retryable());

        assert!(!api(404, None).is_retryable());
        assert!(!ClientError::InvalidConfig("bad config".into()).is_retryable());
        assert!(ClientError::InvalidUrl("x".into()).is_config_error());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(api(404, Some("Product not found")).to_string(), "API error 404: Product not found");
        assert_eq!(api(502, None).to_string(), "API error 502: no message");
    }
}
