//! Config handle shared between the caller and the HTTP pipeline.

use super::OAuth2Config;
use crate::error::Result;
use crate::flow::Redirect;
use crate::http::HttpClient;
use crate::token::Token;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;

/// Cloneable, thread-safe handle to an [`OAuth2Config`].
///
/// Field access goes through a short-lived [`RwLock`] that is never held
/// across an `.await`. Grant exchanges are additionally serialized by an
/// async mutex, so two refreshes never race with the same refresh token.
#[derive(Debug, Clone)]
pub struct SharedConfig {
    inner: Arc<RwLock<OAuth2Config>>,
    exchange: Arc<Mutex<()>>,
}

impl SharedConfig {
    /// Wraps a config for sharing.
    #[must_use]
    pub fn new(config: OAuth2Config) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
            exchange: Arc::new(Mutex::new(())),
        }
    }

    /// Runs `f` with shared access to the config.
    pub fn read<R>(&self, f: impl FnOnce(&OAuth2Config) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&*guard)
    }

    /// Runs `f` with exclusive access to the config.
    pub fn update<R>(&self, f: impl FnOnce(&mut OAuth2Config) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }

    /// Returns a copy of the current token.
    #[must_use]
    pub fn token(&self) -> Token {
        self.read(|config| config.token().clone())
    }

    /// Replaces the current token.
    pub fn set_token(&self, token: Token) {
        self.update(|config| config.set_token(token));
    }

    /// Drops the current token.
    pub fn clear_token(&self) {
        self.update(OAuth2Config::clear_token);
    }

    /// Returns true if requests will be decorated with a token.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.read(OAuth2Config::is_enabled)
    }

    /// See [`OAuth2Config::build_authorization_uri`].
    pub fn build_authorization_uri(&self, regenerate_state: bool) -> String {
        self.update(|config| config.build_authorization_uri(regenerate_state))
    }

    /// See [`OAuth2Config::token_from_code`].
    ///
    /// # Errors
    ///
    /// Same as [`OAuth2Config::token_from_code`].
    pub async fn token_from_code<C: HttpClient>(&self, http: &C, code: &str) -> Result<Token> {
        let _exchange = self.exchange.lock().await;
        self.exchange_code(http, code).await
    }

    /// See [`OAuth2Config::token_from_redirected_uri`].
    ///
    /// # Errors
    ///
    /// Same as [`OAuth2Config::token_from_redirected_uri`].
    pub async fn token_from_redirected_uri<C: HttpClient>(
        &self,
        http: &C,
        uri: &str,
    ) -> Result<Token> {
        let _exchange = self.exchange.lock().await;
        match self.read(|config| config.parse_redirect(uri))? {
            Redirect::Code(code) => self.exchange_code(http, &code).await,
            Redirect::Token(token) => Ok(self.update(|config| config.store_token(token))),
        }
    }

    /// See [`OAuth2Config::token_from_refresh`].
    ///
    /// # Errors
    ///
    /// Same as [`OAuth2Config::token_from_refresh`].
    pub async fn token_from_refresh<C: HttpClient>(&self, http: &C) -> Result<Token> {
        let _exchange = self.exchange.lock().await;
        let request = self.read(OAuth2Config::refresh_request)?;
        let response = http.send(request).await?;
        let token = self.read(|config| config.token_from_response(&response))?;
        Ok(self.update(|config| config.store_token(token)))
    }

    async fn exchange_code<C: HttpClient>(&self, http: &C, code: &str) -> Result<Token> {
        let request = self.read(|config| config.code_request(code))?;
        let response = http.send(request).await?;
        let token = self.read(|config| config.token_from_response(&response))?;
        Ok(self.update(|config| config.store_token(token)))
    }
}

impl From<OAuth2Config> for SharedConfig {
    fn from(config: OAuth2Config) -> Self {
        Self::new(config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_updates_are_visible() {
        let shared = SharedConfig::new(OAuth2Config::new("", "", "", "", ""));
        let other = shared.clone();
        assert!(!other.is_enabled());

        shared.set_token(Token::new("abc"));
        assert!(other.is_enabled());
        assert_eq!(other.token().access_token(), "abc");

        other.clear_token();
        assert!(!shared.is_enabled());
    }

    #[test]
    fn test_refresh_without_token_is_invalid_state() {
        let shared = SharedConfig::from(OAuth2Config::from_token(Token::new("abc")));
        let http = crate::http::ReqwestClient::new();
        let err = tokio_test::block_on(shared.token_from_refresh(&http)).unwrap_err();
        assert!(matches!(err, crate::Error::InvalidState(_)));
        assert!(shared.is_enabled());
    }

    #[test]
    fn test_authorization_uri_updates_state() {
        let shared = SharedConfig::new(OAuth2Config::new("", "", "", "", ""));
        shared.update(|config| config.set_state("xyzzy"));
        let uri = shared.build_authorization_uri(true);
        let state = shared.read(|config| config.state().to_string());
        assert_ne!(state, "xyzzy");
        assert!(uri.ends_with(&format!("state={state}")));
    }
}
