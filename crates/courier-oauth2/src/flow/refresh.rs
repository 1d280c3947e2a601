//! Refresh Token Grant.

use crate::config::OAuth2Config;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpRequest};
use crate::token::Token;

impl OAuth2Config {
    /// Obtains a new access token with the stored refresh token.
    ///
    /// Sends `grant_type=refresh_token&refresh_token=<token>`, plus
    /// `scope=<scope>` when a scope is configured. On success the stored token
    /// is replaced entirely; if the server does not issue a new refresh token
    /// the new token cannot be refreshed again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] without touching the network if no
    /// refresh token is stored. Exchange failures leave the stored token as
    /// it was.
    pub async fn token_from_refresh<C: HttpClient>(&mut self, http: &C) -> Result<Token> {
        let request = self.refresh_request()?;
        let response = http.send(request).await?;
        let token = self.token_from_response(&response)?;
        Ok(self.store_token(token))
    }

    pub(crate) fn refresh_request(&self) -> Result<HttpRequest> {
        let refresh_token = self.token().refresh_token().ok_or_else(|| {
            Error::InvalidState("no refresh token available".to_string())
        })?;

        tracing::debug!(
            endpoint = self.token_endpoint(),
            scoped = self.scope().is_some(),
            "Refreshing access token"
        );

        let mut params = vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];
        if let Some(scope) = self.scope() {
            params.push(("scope", scope));
        }
        self.token_request(&params)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> OAuth2Config {
        OAuth2Config::new(
            "123ABC",
            "456DEF",
            "https://foo",
            "http://localhost:16743/",
            "https://bar",
        )
    }

    #[test]
    fn test_refresh_without_token() {
        let mut c = config();
        c.set_token(Token::new("accessing"));
        assert!(matches!(c.refresh_request(), Err(Error::InvalidState(_))));
    }

    #[test]
    fn test_refresh_request_body() {
        let mut c = config();
        c.set_token(Token::new("accessing").with_refresh_token("refreshing"));
        let request = c.refresh_request().unwrap();
        assert_eq!(
            request.body,
            b"grant_type=refresh_token&refresh_token=refreshing"
        );
    }

    #[test]
    fn test_refresh_request_scope() {
        let mut c = config().with_scope("xyzzy");
        c.set_token(Token::new("accessing").with_refresh_token("BAZ"));
        let request = c.refresh_request().unwrap();
        assert_eq!(
            request.body,
            b"grant_type=refresh_token&refresh_token=BAZ&scope=xyzzy"
        );
    }
}
