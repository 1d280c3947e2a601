//! Handling of the authorization server's redirect back to the client.

use crate::config::{GrantType, OAuth2Config};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::token::{ExpiresIn, Token, TokenResponse};
use std::collections::HashMap;
use url::form_urlencoded;

/// Outcome of validating a redirected URI.
#[derive(Debug)]
pub(crate) enum Redirect {
    /// Authorization code still to be exchanged.
    Code(String),
    /// Implicit grant token, ready to store.
    Token(Token),
}

impl OAuth2Config {
    /// Completes authorization from the URI the user agent was redirected to.
    ///
    /// For the authorization code grant, `code` and `state` are read from the
    /// query and the code is exchanged via [`OAuth2Config::token_from_code`].
    /// For the implicit grant, `access_token` and `state` are read from the
    /// fragment and stored without a network call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StateMismatch`] if the `state` differs from the stored
    /// one, [`Error::InvalidRedirect`] if a required parameter is missing, and
    /// any error of the code exchange.
    pub async fn token_from_redirected_uri<C: HttpClient>(
        &mut self,
        http: &C,
        uri: &str,
    ) -> Result<Token> {
        match self.parse_redirect(uri)? {
            Redirect::Code(code) => self.token_from_code(http, &code).await,
            Redirect::Token(token) => Ok(self.store_token(token)),
        }
    }

    /// Validates a redirected URI against the stored state.
    ///
    /// The state is checked before the code or token is looked at.
    pub(crate) fn parse_redirect(&self, uri: &str) -> Result<Redirect> {
        let (component, source) = match self.grant_type() {
            GrantType::AuthorizationCode => (query_of(uri), "query"),
            GrantType::Implicit => (fragment_of(uri), "fragment"),
        };
        let mut params: HashMap<String, String> = form_urlencoded::parse(component.as_bytes())
            .into_owned()
            .collect();

        let state = params.remove("state").ok_or_else(|| {
            Error::InvalidRedirect(format!("parameter 'state' missing from redirect {source}"))
        })?;
        if state != self.state() {
            tracing::warn!("Redirect state does not match the stored state");
            return Err(Error::StateMismatch {
                expected: self.state().to_string(),
                received: state,
            });
        }

        match self.grant_type() {
            GrantType::AuthorizationCode => {
                let code = params.remove("code").ok_or_else(|| {
                    Error::InvalidRedirect("parameter 'code' missing from redirect query".into())
                })?;
                Ok(Redirect::Code(code))
            }
            GrantType::Implicit => {
                let access_token = params.remove("access_token").ok_or_else(|| {
                    Error::InvalidRedirect(
                        "parameter 'access_token' missing from redirect fragment".into(),
                    )
                })?;
                let response = TokenResponse {
                    access_token,
                    token_type: params.remove("token_type"),
                    expires_in: params.remove("expires_in").map(ExpiresIn::Text),
                    refresh_token: None,
                    scope: params.remove("scope"),
                };
                let token = Token::from_response(response)?;
                Ok(Redirect::Token(self.with_requested_scope(token)))
            }
        }
    }
}

/// Returns the query component, without the fragment.
fn query_of(uri: &str) -> &str {
    let before_fragment = uri.split('#').next().unwrap_or_default();
    before_fragment
        .split_once('?')
        .map_or("", |(_, query)| query)
}

/// Returns the fragment component.
fn fragment_of(uri: &str) -> &str {
    uri.split_once('#').map_or("", |(_, fragment)| fragment)
}
