//! `OAuth2` token types and parsing.

use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// `OAuth2` access token with metadata.
///
/// A token is replaced wholesale by a grant exchange; the setters exist for
/// seeding a pre-provisioned token (for example one restored from storage).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    access_token: String,
    token_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_in: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    obtained_at: Option<DateTime<Utc>>,
}

impl Token {
    /// Value returned by [`Token::expires_in`] when the server gave no lifetime.
    pub const UNDEFINED_EXPIRATION: i64 = -1;

    /// Token type assumed when the server omits it.
    pub const BEARER: &'static str = "bearer";

    /// Creates a bearer token from a raw access token string.
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: Self::BEARER.to_string(),
            ..Self::default()
        }
    }

    /// Parses a token endpoint JSON body.
    ///
    /// Only `access_token` is required. `token_type` defaults to `bearer`,
    /// `expires_in` may be a number or a numeric string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedResponse`] if the body is not JSON, lacks
    /// `access_token`, or carries fields of the wrong type.
    pub fn parse_from_json(body: &str) -> Result<Self> {
        let response: TokenResponse =
            serde_json::from_str(body).map_err(|e| Error::MalformedResponse(e.to_string()))?;
        Self::from_response(response)
    }

    /// Creates a token from a decoded token response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedResponse`] if `expires_in` is not numeric.
    pub fn from_response(response: TokenResponse) -> Result<Self> {
        let expires_in = response.expires_in.map(ExpiresIn::seconds).transpose()?;

        let token_type = response
            .token_type
            .unwrap_or_else(|| Self::BEARER.to_string());
        if !token_type.eq_ignore_ascii_case(Self::BEARER) {
            tracing::warn!(%token_type, "Token endpoint issued a non-bearer token");
        }

        Ok(Self {
            access_token: response.access_token,
            token_type,
            refresh_token: response.refresh_token,
            expires_in,
            scope: response.scope,
            obtained_at: Some(Utc::now()),
        })
    }

    /// Returns true if the token carries an access token.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.access_token.is_empty()
    }

    /// Returns the access token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Returns the token type.
    #[must_use]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Returns the refresh token, if any.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Returns the lifetime in seconds, or [`Token::UNDEFINED_EXPIRATION`].
    #[must_use]
    pub fn expires_in(&self) -> i64 {
        self.expires_in.unwrap_or(Self::UNDEFINED_EXPIRATION)
    }

    /// Returns the granted scope, if any.
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Returns when the token expires, if both lifetime and issue time are known.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let lifetime = Duration::try_seconds(self.expires_in?)?;
        self.obtained_at?.checked_add_signed(lifetime)
    }

    /// Checks if the token is expired (with 60 second buffer).
    ///
    /// Tokens without a known expiry never report as expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at()
            .is_some_and(|exp| Utc::now() + Duration::seconds(60) >= exp)
    }

    /// Sets the refresh token.
    pub fn set_refresh_token(&mut self, refresh_token: impl Into<String>) {
        self.refresh_token = Some(refresh_token.into());
    }

    /// Sets the lifetime in seconds, counted from now.
    pub fn set_expires_in(&mut self, expires_in: i64) {
        self.expires_in = Some(expires_in);
        self.obtained_at = Some(Utc::now());
    }

    /// Sets the scope.
    pub fn set_scope(&mut self, scope: impl Into<String>) {
        self.scope = Some(scope.into());
    }

    /// Sets the refresh token.
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.set_refresh_token(refresh_token);
        self
    }

    /// Sets the lifetime in seconds, counted from now.
    #[must_use]
    pub fn with_expires_in(mut self, expires_in: i64) -> Self {
        self.set_expires_in(expires_in);
        self
    }

    /// Sets the scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.set_scope(scope);
        self
    }
}

/// Token response from `OAuth2` server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Token type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Expires in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<ExpiresIn>,
    /// Refresh token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// `expires_in` as sent on the wire.
///
/// Some servers quote the number.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ExpiresIn {
    /// JSON number.
    Seconds(i64),
    /// JSON string holding a number.
    Text(String),
}

impl ExpiresIn {
    fn seconds(self) -> Result<i64> {
        match self {
            Self::Seconds(secs) => Ok(secs),
            Self::Text(text) => text.trim().parse().map_err(|_| {
                Error::MalformedResponse(format!("expires_in is not a number: {text:?}"))
            }),
        }
    }
}

/// Error response from `OAuth2` server (RFC 6749 section 5.2).
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    /// Error code.
    pub error: String,
    /// Error description.
    #[serde(default)]
    pub error_description: String,
    /// Link to a human-readable error page.
    #[serde(default)]
    pub error_uri: Option<String>,
}
