//! # courier-oauth2
//!
//! `OAuth2` client support for the courier HTTP client.
//!
//! ## Features
//!
//! - **Authorization URIs**: `response_type=code` or `token`, with CSRF state
//! - **Grant exchanges**: Authorization Code, Implicit and Refresh Token grants
//! - **Client authentication**: HTTP Basic header or form-body credentials
//! - **Request decoration**: `Authorization: Bearer` header or query parameter
//!
//! ## Quick Start
//!
//! ### Authorization Code Grant
//!
//! ```ignore
//! use courier_oauth2::{OAuth2Config, ReqwestClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = OAuth2Config::new(
//!         "your_client_id",
//!         "your_secret",
//!         "https://login.example.com/authorize",
//!         "https://login.example.com/token",
//!         "http://localhost:8080/callback",
//!     );
//!
//!     // Send the user here; a new CSRF state is stored on the config
//!     let auth_uri = config.build_authorization_uri(true);
//!     println!("Visit: {auth_uri}");
//!
//!     // Feed the URI the browser was redirected to back in
//!     let http = ReqwestClient::new();
//!     let redirected = "http://localhost:8080/callback?code=...&state=...";
//!     config.token_from_redirected_uri(&http, redirected).await?;
//!
//!     assert!(config.is_enabled());
//!     Ok(())
//! }
//! ```
//!
//! ### Decorating requests
//!
//! ```ignore
//! use courier_oauth2::{HttpClient, HttpRequest, OAuth2Handler, ReqwestClient, SharedConfig};
//!
//! let shared = SharedConfig::new(config);
//! let client = OAuth2Handler::new(shared.clone(), ReqwestClient::new());
//!
//! // Every request now carries `Authorization: Bearer <token>`
//! let response = client.send(HttpRequest::get(url)).await?;
//!
//! // Refresh through the same handle; later requests pick up the new token
//! if shared.token().is_expired() {
//!     client.refresh().await?;
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
mod error;
mod flow;
pub mod http;
mod inject;
pub mod state;
pub mod token;

pub use config::{
    ClientAuth, DEFAULT_ACCESS_TOKEN_KEY, GrantType, OAuth2Config, OAuth2Settings, SharedConfig,
    TokenPlacement,
};
pub use error::{Error, Result};
pub use http::{HttpClient, HttpRequest, HttpResponse, ReqwestClient};
pub use inject::OAuth2Handler;
pub use state::{RandomStateGenerator, StateGenerator};
pub use token::Token;
