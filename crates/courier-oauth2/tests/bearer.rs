//! Request decoration through the `OAuth2Handler` pipeline stage.

#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;

use common::{MockClient, init_tracing};
use courier_oauth2::{
    HttpClient, HttpRequest, OAuth2Config, OAuth2Handler, SharedConfig, Token, TokenPlacement,
};
use reqwest::header::AUTHORIZATION;
use url::Url;

fn base_url() -> Url {
    Url::parse("http://localhost:16743/").unwrap()
}

fn handler(config: OAuth2Config) -> (OAuth2Handler<Arc<MockClient>>, Arc<MockClient>) {
    let http = Arc::new(MockClient::new());
    (
        OAuth2Handler::new(SharedConfig::new(config), Arc::clone(&http)),
        http,
    )
}

#[tokio::test]
async fn test_bearer_header_by_default() {
    init_tracing();
    let (client, http) = handler(OAuth2Config::from_token(Token::new("12345678")));

    let response = client.send(HttpRequest::get(base_url())).await.unwrap();
    assert_eq!(response.status, 200);

    let request = http.last_request();
    assert_eq!(request.header(&AUTHORIZATION), Some("Bearer 12345678"));
    assert_eq!(request.url.path(), "/");
    assert!(request.url.query().is_none());
}

#[tokio::test]
async fn test_query_parameter_default_key() {
    let mut config = OAuth2Config::from_token(Token::new("12345678"));
    config.set_bearer_auth(false);
    let (client, http) = handler(config);

    client.send(HttpRequest::get(base_url())).await.unwrap();

    let request = http.last_request();
    assert!(request.header(&AUTHORIZATION).is_none());
    assert_eq!(request.url.path(), "/");
    assert_eq!(request.url.query(), Some("access_token=12345678"));
}

#[tokio::test]
async fn test_query_parameter_custom_key_and_updated_token() {
    let config = OAuth2Config::from_token(Token::new("12345678"))
        .with_token_placement(TokenPlacement::QueryParameter);
    let (client, http) = handler(config);

    client.config().update(|c| {
        c.set_access_token_key("open");
        c.set_token(Token::new("Sesame"));
    });
    client.send(HttpRequest::get(base_url())).await.unwrap();

    let request = http.last_request();
    assert!(request.header(&AUTHORIZATION).is_none());
    assert_eq!(request.url.query(), Some("open=Sesame"));
}

#[tokio::test]
async fn test_disabled_config_passes_through() {
    let (client, http) = handler(OAuth2Config::new("", "", "", "", ""));

    client.send(HttpRequest::get(base_url())).await.unwrap();

    let request = http.last_request();
    assert!(request.headers.is_empty());
    assert_eq!(request.url.as_str(), "http://localhost:16743/");
}

#[tokio::test]
async fn test_refresh_applies_to_later_requests() {
    let mut config = OAuth2Config::new("id", "secret", "", "http://localhost:16743/token", "");
    config.set_token(Token::new("stale").with_refresh_token("r1"));
    let (client, http) = handler(config);

    client.send(HttpRequest::get(base_url())).await.unwrap();
    assert_eq!(http.last_request().header(&AUTHORIZATION), Some("Bearer stale"));

    http.reply_json(r#"{"access_token":"fresh","refresh_token":"r2"}"#);
    client.refresh().await.unwrap();
    let refresh = http.last_request();
    assert_eq!(refresh.url.path(), "/token");
    assert!(
        refresh
            .header(&AUTHORIZATION)
            .unwrap()
            .starts_with("Basic ")
    );

    client.send(HttpRequest::get(base_url())).await.unwrap();
    assert_eq!(http.last_request().header(&AUTHORIZATION), Some("Bearer fresh"));
    assert_eq!(http.request_count(), 3);
}

#[tokio::test]
async fn test_cleared_token_stops_decoration() {
    let (client, http) = handler(OAuth2Config::from_token(Token::new("12345678")));

    client.config().clear_token();
    client.send(HttpRequest::get(base_url())).await.unwrap();
    assert!(http.last_request().header(&AUTHORIZATION).is_none());
}
