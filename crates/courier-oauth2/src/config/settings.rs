//! Declarative client settings.

use super::{ClientAuth, DEFAULT_ACCESS_TOKEN_KEY, GrantType, OAuth2Config, TokenPlacement};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Serializable `OAuth2` client settings.
///
/// Loaded from a settings file or environment-driven source and turned into
/// an [`OAuth2Config`] with [`OAuth2Settings::into_config`]. Missing fields
/// take the same defaults as [`OAuth2Config::new`].
///
/// ```
/// use courier_oauth2::OAuth2Settings;
///
/// let settings = OAuth2Settings::from_json(r#"{
///     "client_key": "my-app",
///     "client_secret": "s3cret",
///     "auth_endpoint": "https://login.example.com/authorize",
///     "token_endpoint": "https://login.example.com/token",
///     "redirect_uri": "http://localhost:8080/callback",
///     "client_auth": "request_body"
/// }"#).unwrap();
/// let config = settings.into_config().unwrap();
/// assert!(!config.http_basic_auth());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuth2Settings {
    /// Client identifier.
    pub client_key: String,
    /// Client secret.
    pub client_secret: String,
    /// Authorization endpoint.
    pub auth_endpoint: String,
    /// Token endpoint.
    pub token_endpoint: String,
    /// Redirect URI registered with the server.
    pub redirect_uri: String,
    /// Requested scope.
    pub scope: Option<String>,
    /// Grant type.
    pub grant_type: GrantType,
    /// Client authentication at the token endpoint.
    pub client_auth: ClientAuth,
    /// Token placement on outbound requests.
    pub token_placement: TokenPlacement,
    /// Query parameter name for query placement.
    pub access_token_key: String,
    /// `User-Agent` for token requests.
    pub user_agent: Option<String>,
}

impl Default for OAuth2Settings {
    fn default() -> Self {
        Self {
            client_key: String::new(),
            client_secret: String::new(),
            auth_endpoint: String::new(),
            token_endpoint: String::new(),
            redirect_uri: String::new(),
            scope: None,
            grant_type: GrantType::default(),
            client_auth: ClientAuth::default(),
            token_placement: TokenPlacement::default(),
            access_token_key: DEFAULT_ACCESS_TOKEN_KEY.to_string(),
            user_agent: None,
        }
    }
}

impl OAuth2Settings {
    /// Parses settings from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the token endpoint is not an
    /// absolute URL or the query parameter name is empty.
    pub fn validate(&self) -> Result<()> {
        if !self.token_endpoint.is_empty() {
            Url::parse(&self.token_endpoint).map_err(|e| {
                Error::InvalidConfig(format!(
                    "token_endpoint {:?} is not a URL: {e}",
                    self.token_endpoint
                ))
            })?;
        }
        if self.access_token_key.is_empty() {
            return Err(Error::InvalidConfig("access_token_key is empty".into()));
        }
        Ok(())
    }

    /// Validates the settings and builds a config from them.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn into_config(self) -> Result<OAuth2Config> {
        self.validate()?;

        let mut config = OAuth2Config::new(
            self.client_key,
            self.client_secret,
            self.auth_endpoint,
            self.token_endpoint,
            self.redirect_uri,
        )
        .with_grant_type(self.grant_type)
        .with_client_auth(self.client_auth)
        .with_token_placement(self.token_placement);

        if let Some(scope) = self.scope {
            config.set_scope(scope);
        }
        config.set_access_token_key(self.access_token_key);
        config.set_user_agent(self.user_agent);
        Ok(config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_config() {
        let config = OAuth2Settings::from_json("{}")
            .unwrap()
            .into_config()
            .unwrap();
        assert!(config.http_basic_auth());
        assert!(config.bearer_auth());
        assert!(!config.implicit_grant());
        assert_eq!(config.access_token_key(), "access_token");
        assert!(config.user_agent().is_none());
    }

    #[test]
    fn test_full_settings() {
        let settings = OAuth2Settings::from_json(
            r#"{
                "client_key": "id",
                "client_secret": "secret",
                "auth_endpoint": "https://foo",
                "token_endpoint": "https://foo/token",
                "redirect_uri": "https://bar",
                "scope": "read",
                "grant_type": "implicit",
                "token_placement": "query_parameter",
                "access_token_key": "open",
                "user_agent": "courier-test/1.0"
            }"#,
        )
        .unwrap();
        let config = settings.into_config().unwrap();
        assert!(config.implicit_grant());
        assert!(!config.bearer_auth());
        assert_eq!(config.access_token_key(), "open");
        assert_eq!(config.scope(), Some("read"));
        assert_eq!(config.user_agent(), Some("courier-test/1.0"));
        assert_eq!(config.token_endpoint(), "https://foo/token");
    }

    #[test]
    fn test_invalid_token_endpoint() {
        let settings = OAuth2Settings {
            token_endpoint: "not a url".into(),
            ..OAuth2Settings::default()
        };
        assert!(matches!(
            settings.into_config(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_empty_access_token_key() {
        let settings = OAuth2Settings {
            access_token_key: String::new(),
            ..OAuth2Settings::default()
        };
        assert!(matches!(settings.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let err = OAuth2Settings::from_json(r#"{"client_auth":"mutual_tls"}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
