//! Authorization request URI construction.

use super::OAuth2Config;

impl OAuth2Config {
    /// Builds the URI the user agent should visit to authorize the client.
    ///
    /// Parameters appear in the order `response_type`, `client_id`,
    /// `redirect_uri`, `state`, then `scope` when one is configured. Values
    /// are inserted as configured, without percent-encoding. An empty
    /// authorization endpoint yields a root-relative URI (`/?...`).
    ///
    /// With `regenerate_state` a new CSRF state replaces the stored one before
    /// the URI is built.
    pub fn build_authorization_uri(&mut self, regenerate_state: bool) -> String {
        if regenerate_state {
            self.state = self.state_generator.generate();
            tracing::debug!("Regenerated authorization state");
        }

        let mut params = vec![
            ("response_type", self.grant_type.response_type()),
            ("client_id", self.client_key.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("state", self.state.as_str()),
        ];
        if let Some(scope) = self.scope() {
            params.push(("scope", scope));
        }

        let mut uri = query_base(&self.auth_endpoint);
        for (i, (key, value)) in params.iter().enumerate() {
            if i > 0 {
                uri.push('&');
            }
            uri.push_str(key);
            uri.push('=');
            uri.push_str(value);
        }
        uri
    }
}

/// Returns `endpoint` ready for query parameters to be appended.
///
/// An authority without a path gets `/`; an existing query is extended.
fn query_base(endpoint: &str) -> String {
    let endpoint = endpoint.split('#').next().unwrap_or_default();
    let mut base = endpoint.to_string();

    if let Some((_, query)) = endpoint.split_once('?') {
        if !query.is_empty() && !query.ends_with('&') {
            base.push('&');
        }
        return base;
    }

    let has_path = endpoint
        .split_once("://")
        .map_or(!endpoint.is_empty(), |(_, rest)| rest.contains('/'));
    if !has_path {
        base.push('/');
    }
    base.push('?');
    base
}
