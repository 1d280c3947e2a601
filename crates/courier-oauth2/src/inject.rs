//! Request decoration with the current access token.
//!
//! [`OAuth2Config::authorize_request`] is the pipeline step; [`OAuth2Handler`]
//! wraps an [`HttpClient`] so every request passes through it before it is
//! sent.

use crate::config::{OAuth2Config, SharedConfig, TokenPlacement};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpRequest, HttpResponse};
use crate::token::Token;
use reqwest::header::{AUTHORIZATION, HeaderValue};

impl OAuth2Config {
    /// Attaches the current access token to an outbound request.
    ///
    /// Does nothing while [`OAuth2Config::is_enabled`] is false. Otherwise sets
    /// `Authorization: Bearer <token>` or appends `<access_token_key>=<token>`
    /// to the query, per [`TokenPlacement`]. No other part of the request is
    /// touched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the token cannot be carried in a
    /// header value.
    pub fn authorize_request(&self, request: &mut HttpRequest) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }
        let access_token = self.token().access_token();

        match self.token_placement() {
            TokenPlacement::BearerHeader => {
                let mut value = HeaderValue::try_from(format!("Bearer {access_token}"))
                    .map_err(|_| {
                        Error::InvalidState("access token is not a valid header value".into())
                    })?;
                value.set_sensitive(true);
                request.headers.insert(AUTHORIZATION, value);
            }
            TokenPlacement::QueryParameter => {
                request
                    .url
                    .query_pairs_mut()
                    .append_pair(self.access_token_key(), access_token);
            }
        }
        Ok(())
    }
}

/// Pipeline stage that authorizes requests before handing them to `C`.
///
/// Reads the token from a [`SharedConfig`] on every request, so tokens
/// obtained or refreshed through that handle apply immediately.
#[derive(Debug, Clone)]
pub struct OAuth2Handler<C> {
    config: SharedConfig,
    inner: C,
}

impl<C: HttpClient> OAuth2Handler<C> {
    /// Wraps `inner` with request authorization from `config`.
    #[must_use]
    pub const fn new(config: SharedConfig, inner: C) -> Self {
        Self { config, inner }
    }

    /// Returns the shared config.
    #[must_use]
    pub const fn config(&self) -> &SharedConfig {
        &self.config
    }

    /// Returns the wrapped client.
    #[must_use]
    pub const fn inner(&self) -> &C {
        &self.inner
    }

    /// Refreshes the stored token through the wrapped client.
    ///
    /// # Errors
    ///
    /// See [`OAuth2Config::token_from_refresh`].
    pub async fn refresh(&self) -> Result<Token> {
        self.config.token_from_refresh(&self.inner).await
    }
}

impl<C: HttpClient> HttpClient for OAuth2Handler<C> {
    async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse> {
        self.config
            .read(|config| config.authorize_request(&mut request))?;
        self.inner.send(request).await
    }
}
