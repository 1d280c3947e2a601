//! `OAuth2` grant exchanges.
//!
//! Each exchange is split into a synchronous request builder, the network
//! call, and a synchronous response handler. [`OAuth2Config`] chains the
//! three under `&mut self`; [`crate::SharedConfig`] runs them without holding
//! its lock across the network call.

mod code;
mod redirect;
mod refresh;

pub(crate) use redirect::Redirect;

use crate::config::{ClientAuth, OAuth2Config};
use crate::error::{Error, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::token::Token;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderValue, USER_AGENT};
use url::Url;
use url::form_urlencoded;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

impl OAuth2Config {
    /// Builds a `POST` to the token endpoint carrying `params` as a form body.
    ///
    /// Client credentials are attached according to [`ClientAuth`].
    pub(crate) fn token_request(&self, params: &[(&str, &str)]) -> Result<HttpRequest> {
        let url = Url::parse(self.token_endpoint())?;

        let mut form = form_urlencoded::Serializer::new(String::new());
        form.extend_pairs(params);

        let mut request = HttpRequest::post(url)
            .with_header(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE))
            .with_header(ACCEPT, HeaderValue::from_static("application/json"));

        match self.client_auth() {
            ClientAuth::BasicHeader => {
                let mut value = HeaderValue::try_from(basic_credentials(
                    self.client_key(),
                    self.client_secret(),
                ))
                .map_err(|e| Error::InvalidConfig(format!("client credentials: {e}")))?;
                value.set_sensitive(true);
                request.headers.insert(AUTHORIZATION, value);
            }
            ClientAuth::RequestBody => {
                form.append_pair("client_id", self.client_key());
                form.append_pair("client_secret", self.client_secret());
            }
        }

        if let Some(user_agent) = self.user_agent() {
            let value = HeaderValue::try_from(user_agent)
                .map_err(|e| Error::InvalidConfig(format!("user agent: {e}")))?;
            request.headers.insert(USER_AGENT, value);
        }

        request.body = form.finish().into_bytes();
        Ok(request)
    }

    /// Interprets a token endpoint response.
    ///
    /// The scope falls back to the configured one when the server omits it.
    pub(crate) fn token_from_response(&self, response: &HttpResponse) -> Result<Token> {
        if !response.is_success() {
            tracing::warn!(status = response.status, "Token endpoint rejected request");
            return Err(Error::transport(response.status, response.text()));
        }
        if !response.is_json() {
            tracing::warn!(
                status = response.status,
                content_type = response.content_type().unwrap_or_default(),
                "Token endpoint answered with a non-JSON body"
            );
            return Err(Error::transport(response.status, response.text()));
        }

        let token = Token::parse_from_json(&response.text())?;
        Ok(self.with_requested_scope(token))
    }

    /// Fills in the configured scope on a token that carries none.
    pub(crate) fn with_requested_scope(&self, token: Token) -> Token {
        match (token.scope(), self.scope()) {
            (None, Some(requested)) => token.with_scope(requested),
            _ => token,
        }
    }

    /// Stores a freshly obtained token and returns a copy of it.
    pub(crate) fn store_token(&mut self, token: Token) -> Token {
        tracing::info!(
            has_refresh_token = token.refresh_token().is_some(),
            expires_in = token.expires_in(),
            "Stored new access token"
        );
        self.set_token(token.clone());
        token
    }
}

/// Encodes client credentials for HTTP Basic authentication.
///
/// Key and secret are form-urlencoded before joining (RFC 6749 section 2.3.1).
fn basic_credentials(client_key: &str, client_secret: &str) -> String {
    let key: String = form_urlencoded::byte_serialize(client_key.as_bytes()).collect();
    let secret: String = form_urlencoded::byte_serialize(client_secret.as_bytes()).collect();
    format!("Basic {}", STANDARD.encode(format!("{key}:{secret}")))
}
