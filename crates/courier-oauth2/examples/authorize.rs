//! Example: Authorization Code Grant against a real authorization server
//!
//! This example demonstrates how to:
//! 1. Load client settings from a JSON file
//! 2. Build the authorization URI with a fresh CSRF state
//! 3. Complete the grant from the redirected URI
//! 4. Send an authorized request through `OAuth2Handler`
//!
//! ## Prerequisites
//!
//! 1. Register an application with your provider and note its client ID,
//!    client secret and endpoints. Set the redirect URI to
//!    `http://localhost:8080/callback`.
//!
//! 2. Write the settings to a file:
//!    ```json
//!    {
//!      "client_key": "your-client-id",
//!      "client_secret": "your-client-secret",
//!      "auth_endpoint": "https://login.example.com/authorize",
//!      "token_endpoint": "https://login.example.com/token",
//!      "redirect_uri": "http://localhost:8080/callback",
//!      "scope": "profile"
//!    }
//!    ```
//!
//! ## Running
//!
//! ```bash
//! COURIER_OAUTH2_SETTINGS=oauth2.json \
//! COURIER_API_URL=https://api.example.com/me \
//! RUST_LOG=courier_oauth2=debug \
//! cargo run --example authorize
//! ```

use anyhow::Context;
use courier_oauth2::{
    HttpClient, HttpRequest, OAuth2Handler, OAuth2Settings, ReqwestClient, SharedConfig,
};
use std::env;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;
use url::Url;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings_path =
        env::var("COURIER_OAUTH2_SETTINGS").context("COURIER_OAUTH2_SETTINGS not set")?;
    let api_url = env::var("COURIER_API_URL").context("COURIER_API_URL not set")?;

    println!("courier OAuth2 Example - Authorization Code Grant");
    println!("=================================================\n");

    // Step 1: Load settings
    let json = std::fs::read_to_string(&settings_path)
        .with_context(|| format!("reading {settings_path}"))?;
    let config = OAuth2Settings::from_json(&json)?.into_config()?;
    println!("Step 1: Loaded settings for client {}\n", config.client_key());

    let shared = SharedConfig::new(config);
    let client = OAuth2Handler::new(shared.clone(), ReqwestClient::new());

    // Step 2: Authorization URI with a fresh state
    let auth_uri = shared.build_authorization_uri(true);
    println!("Step 2: Visit this URL to authorize the application:\n");
    println!("{auth_uri}\n");

    // Step 3: Complete the grant from the redirect
    print!("Paste the full URL you were redirected to: ");
    io::stdout().flush()?;

    let mut redirected = String::new();
    io::stdin().read_line(&mut redirected)?;
    let redirected = redirected.trim();

    if redirected.is_empty() {
        println!("\nNo URL entered. Exiting.");
        return Ok(());
    }

    let token = shared
        .token_from_redirected_uri(client.inner(), redirected)
        .await?;
    println!("\nStep 3: Token obtained");
    println!("  Token type: {}", token.token_type());
    println!("  Expires in: {}", token.expires_in());
    println!("  Has refresh token: {}", token.refresh_token().is_some());
    println!("  Scope: {:?}\n", token.scope());

    // Step 4: Authorized request
    let response = client.send(HttpRequest::get(Url::parse(&api_url)?)).await?;
    println!("Step 4: GET {api_url} -> {}", response.status);
    println!("{}", response.text());

    // Step 5: Refresh if possible
    if token.refresh_token().is_some() {
        let refreshed = client.refresh().await?;
        println!(
            "\nStep 5: Refreshed, new token expires in {}",
            refreshed.expires_in()
        );
    }

    Ok(())
}
