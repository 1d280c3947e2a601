//! Authorization Code Grant token exchange.

use crate::config::OAuth2Config;
use crate::error::Result;
use crate::http::{HttpClient, HttpRequest};
use crate::token::Token;

impl OAuth2Config {
    /// Exchanges an authorization code for an access token.
    ///
    /// Sends `grant_type=authorization_code&code=<code>&redirect_uri=<uri>` to
    /// the token endpoint and stores the resulting token, enabling request
    /// decoration.
    ///
    /// # Errors
    ///
    /// Returns a transport error for non-2xx or non-JSON responses and
    /// [`crate::Error::MalformedResponse`] when the body lacks `access_token`.
    /// The stored token is left untouched on failure.
    pub async fn token_from_code<C: HttpClient>(&mut self, http: &C, code: &str) -> Result<Token> {
        let request = self.code_request(code)?;
        let response = http.send(request).await?;
        let token = self.token_from_response(&response)?;
        Ok(self.store_token(token))
    }

    pub(crate) fn code_request(&self, code: &str) -> Result<HttpRequest> {
        tracing::debug!(
            endpoint = self.token_endpoint(),
            basic_auth = self.http_basic_auth(),
            "Exchanging authorization code"
        );
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri()),
        ])
    }
}
