//! Error types for `OAuth2` operations.

use crate::token::ErrorResponse;

/// Result type alias for `OAuth2` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `OAuth2` error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The token endpoint answered with a body that is not a usable token.
    #[error("Malformed token response: {0}")]
    MalformedResponse(String),

    /// The token endpoint answered with a non-success status or a non-JSON body.
    #[error("Token endpoint returned HTTP {status}: {body}")]
    Transport {
        /// HTTP status code.
        status: u16,
        /// Response body, kept verbatim for diagnostics.
        body: String,
    },

    /// Network-level failure while talking to the token endpoint.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// CSRF state in a redirect does not match the stored state.
    #[error("State mismatch: expected {expected:?}, received {received:?}")]
    StateMismatch {
        /// State stored on the config.
        expected: String,
        /// State found in the redirected URI.
        received: String,
    },

    /// The operation cannot run in the current config state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The redirected URI lacks a required parameter.
    #[error("Invalid redirect: {0}")]
    InvalidRedirect(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),
}

impl Error {
    /// Creates a transport error from a status code and body.
    #[must_use]
    pub fn transport(status: u16, body: impl Into<String>) -> Self {
        Self::Transport {
            status,
            body: body.into(),
        }
    }

    /// Returns true for failures reported by the HTTP layer.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Http(_))
    }

    /// Decodes an RFC 6749 error object from a transport error body.
    ///
    /// Returns `None` for other variants or when the body carries no
    /// `error` field.
    #[must_use]
    pub fn oauth_error(&self) -> Option<ErrorResponse> {
        match self {
            Self::Transport { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_is_transport() {
        assert!(Error::transport(500, "boom").is_transport());
        assert!(!Error::InvalidState("no refresh token".into()).is_transport());
    }

    #[test]
    fn test_oauth_error_from_body() {
        let err = Error::transport(
            400,
            r#"{"error":"invalid_grant","error_description":"code expired"}"#,
        );
        let oauth = err.oauth_error().unwrap();
        assert_eq!(oauth.error, "invalid_grant");
        assert_eq!(oauth.error_description, "code expired");
    }

    #[test]
    fn test_oauth_error_plain_body() {
        assert!(Error::transport(502, "Bad Gateway").oauth_error().is_none());
        assert!(Error::MalformedResponse("x".into()).oauth_error().is_none());
    }

    #[test]
    fn test_state_mismatch_display() {
        let err = Error::StateMismatch {
            expected: "xyzzy".into(),
            received: "plugh".into(),
        };
        assert_eq!(
            err.to_string(),
            r#"State mismatch: expected "xyzzy", received "plugh""#
        );
    }
}
