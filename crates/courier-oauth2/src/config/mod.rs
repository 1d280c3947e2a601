//! `OAuth2` client configuration.
//!
//! [`OAuth2Config`] holds the client identity, endpoints, CSRF state, protocol
//! modes and the current [`Token`]. The grant exchanges and request
//! decoration are implemented on it in their own modules.

mod authorize;
mod settings;
mod shared;

pub use settings::OAuth2Settings;
pub use shared::SharedConfig;

use crate::state::{RandomStateGenerator, StateGenerator};
use crate::token::Token;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Query parameter name used when the token travels in the query string.
pub const DEFAULT_ACCESS_TOKEN_KEY: &str = "access_token";

/// How the authorization server hands back the grant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    /// Redirect carries `?code=`; the code is exchanged at the token endpoint.
    #[default]
    AuthorizationCode,
    /// Redirect carries `#access_token=` directly.
    Implicit,
}

impl GrantType {
    /// Value of the `response_type` authorization parameter.
    #[must_use]
    pub const fn response_type(self) -> &'static str {
        match self {
            Self::AuthorizationCode => "code",
            Self::Implicit => "token",
        }
    }
}

/// How the client authenticates itself to the token endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuth {
    /// `Authorization: Basic base64(client_key:client_secret)`.
    #[default]
    BasicHeader,
    /// `client_id` and `client_secret` form fields.
    RequestBody,
}

/// Where the access token is attached on outbound requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPlacement {
    /// `Authorization: Bearer <token>`.
    #[default]
    BearerHeader,
    /// `<access_token_key>=<token>` in the query string.
    QueryParameter,
}

/// `OAuth2` client configuration and credential holder.
#[derive(Clone)]
pub struct OAuth2Config {
    client_key: String,
    client_secret: String,
    auth_endpoint: String,
    token_endpoint: String,
    redirect_uri: String,
    scope: String,
    state: String,
    user_agent: Option<String>,
    grant_type: GrantType,
    client_auth: ClientAuth,
    token_placement: TokenPlacement,
    access_token_key: String,
    token: Token,
    state_generator: Arc<dyn StateGenerator>,
}

impl OAuth2Config {
    /// Creates a config from the client identity and endpoints.
    ///
    /// A fresh random CSRF state is generated.
    #[must_use]
    pub fn new(
        client_key: impl Into<String>,
        client_secret: impl Into<String>,
        auth_endpoint: impl Into<String>,
        token_endpoint: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        let state_generator: Arc<dyn StateGenerator> = Arc::new(RandomStateGenerator);
        Self {
            client_key: client_key.into(),
            client_secret: client_secret.into(),
            auth_endpoint: auth_endpoint.into(),
            token_endpoint: token_endpoint.into(),
            redirect_uri: redirect_uri.into(),
            scope: String::new(),
            state: state_generator.generate(),
            user_agent: None,
            grant_type: GrantType::default(),
            client_auth: ClientAuth::default(),
            token_placement: TokenPlacement::default(),
            access_token_key: DEFAULT_ACCESS_TOKEN_KEY.to_string(),
            token: Token::default(),
            state_generator,
        }
    }

    /// Creates a config around a pre-provisioned token.
    ///
    /// Such a config can decorate requests but has no endpoints to run grant
    /// exchanges against.
    #[must_use]
    pub fn from_token(token: Token) -> Self {
        let mut config = Self::new("", "", "", "", "");
        config.token = token;
        config
    }

    /// Replaces the CSRF state generator and draws a new state from it.
    #[must_use]
    pub fn with_state_generator(mut self, generator: impl StateGenerator + 'static) -> Self {
        self.state_generator = Arc::new(generator);
        self.state = self.state_generator.generate();
        self
    }

    /// Sets the requested scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Sets the grant type.
    #[must_use]
    pub const fn with_grant_type(mut self, grant_type: GrantType) -> Self {
        self.grant_type = grant_type;
        self
    }

    /// Sets how the client authenticates to the token endpoint.
    #[must_use]
    pub const fn with_client_auth(mut self, client_auth: ClientAuth) -> Self {
        self.client_auth = client_auth;
        self
    }

    /// Sets where the access token goes on outbound requests.
    #[must_use]
    pub const fn with_token_placement(mut self, placement: TokenPlacement) -> Self {
        self.token_placement = placement;
        self
    }

    /// Sets the `User-Agent` sent on token requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Returns the client identifier.
    #[must_use]
    pub fn client_key(&self) -> &str {
        &self.client_key
    }

    /// Sets the client identifier.
    pub fn set_client_key(&mut self, client_key: impl Into<String>) {
        self.client_key = client_key.into();
    }

    /// Returns the client secret.
    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Sets the client secret.
    pub fn set_client_secret(&mut self, client_secret: impl Into<String>) {
        self.client_secret = client_secret.into();
    }

    /// Returns the authorization endpoint.
    #[must_use]
    pub fn auth_endpoint(&self) -> &str {
        &self.auth_endpoint
    }

    /// Sets the authorization endpoint.
    pub fn set_auth_endpoint(&mut self, auth_endpoint: impl Into<String>) {
        self.auth_endpoint = auth_endpoint.into();
    }

    /// Returns the token endpoint.
    #[must_use]
    pub fn token_endpoint(&self) -> &str {
        &self.token_endpoint
    }

    /// Sets the token endpoint.
    pub fn set_token_endpoint(&mut self, token_endpoint: impl Into<String>) {
        self.token_endpoint = token_endpoint.into();
    }

    /// Returns the redirect URI.
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Sets the redirect URI.
    pub fn set_redirect_uri(&mut self, redirect_uri: impl Into<String>) {
        self.redirect_uri = redirect_uri.into();
    }

    /// Returns the requested scope, if any.
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        Some(self.scope.as_str()).filter(|s| !s.is_empty())
    }

    /// Sets the requested scope. An empty string clears it.
    pub fn set_scope(&mut self, scope: impl Into<String>) {
        self.scope = scope.into();
    }

    /// Returns the CSRF state.
    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Sets the CSRF state.
    pub fn set_state(&mut self, state: impl Into<String>) {
        self.state = state.into();
    }

    /// Returns the `User-Agent` sent on token requests.
    #[must_use]
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Sets the `User-Agent` sent on token requests.
    pub fn set_user_agent(&mut self, user_agent: Option<String>) {
        self.user_agent = user_agent;
    }

    /// Returns the grant type.
    #[must_use]
    pub const fn grant_type(&self) -> GrantType {
        self.grant_type
    }

    /// Sets the grant type.
    pub const fn set_grant_type(&mut self, grant_type: GrantType) {
        self.grant_type = grant_type;
    }

    /// Returns true for the implicit grant.
    #[must_use]
    pub const fn implicit_grant(&self) -> bool {
        matches!(self.grant_type, GrantType::Implicit)
    }

    /// Switches between the implicit and authorization code grants.
    pub const fn set_implicit_grant(&mut self, implicit: bool) {
        self.grant_type = if implicit {
            GrantType::Implicit
        } else {
            GrantType::AuthorizationCode
        };
    }

    /// Returns how the client authenticates to the token endpoint.
    #[must_use]
    pub const fn client_auth(&self) -> ClientAuth {
        self.client_auth
    }

    /// Sets how the client authenticates to the token endpoint.
    pub const fn set_client_auth(&mut self, client_auth: ClientAuth) {
        self.client_auth = client_auth;
    }

    /// Returns true if client credentials go in a Basic header.
    #[must_use]
    pub const fn http_basic_auth(&self) -> bool {
        matches!(self.client_auth, ClientAuth::BasicHeader)
    }

    /// Chooses between a Basic header and form fields for client credentials.
    pub const fn set_http_basic_auth(&mut self, basic: bool) {
        self.client_auth = if basic {
            ClientAuth::BasicHeader
        } else {
            ClientAuth::RequestBody
        };
    }

    /// Returns where the access token goes on outbound requests.
    #[must_use]
    pub const fn token_placement(&self) -> TokenPlacement {
        self.token_placement
    }

    /// Sets where the access token goes on outbound requests.
    pub const fn set_token_placement(&mut self, placement: TokenPlacement) {
        self.token_placement = placement;
    }

    /// Returns true if the access token goes in an `Authorization: Bearer` header.
    #[must_use]
    pub const fn bearer_auth(&self) -> bool {
        matches!(self.token_placement, TokenPlacement::BearerHeader)
    }

    /// Chooses between the bearer header and the query parameter.
    pub const fn set_bearer_auth(&mut self, bearer: bool) {
        self.token_placement = if bearer {
            TokenPlacement::BearerHeader
        } else {
            TokenPlacement::QueryParameter
        };
    }

    /// Returns the query parameter name for [`TokenPlacement::QueryParameter`].
    #[must_use]
    pub fn access_token_key(&self) -> &str {
        &self.access_token_key
    }

    /// Sets the query parameter name for [`TokenPlacement::QueryParameter`].
    pub fn set_access_token_key(&mut self, key: impl Into<String>) {
        self.access_token_key = key.into();
    }

    /// Returns the current token.
    #[must_use]
    pub const fn token(&self) -> &Token {
        &self.token
    }

    /// Replaces the current token.
    pub fn set_token(&mut self, token: Token) {
        self.token = token;
    }

    /// Drops the current token, disabling request decoration.
    pub fn clear_token(&mut self) {
        self.token = Token::default();
    }

    /// Returns true if requests will be decorated with a token.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.token.is_valid()
    }
}

impl fmt::Debug for OAuth2Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Config")
            .field("client_key", &self.client_key)
            .field("client_secret", &"[redacted]")
            .field("auth_endpoint", &self.auth_endpoint)
            .field("token_endpoint", &self.token_endpoint)
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .field("grant_type", &self.grant_type)
            .field("client_auth", &self.client_auth)
            .field("token_placement", &self.token_placement)
            .field("access_token_key", &self.access_token_key)
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}
