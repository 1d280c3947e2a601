//! Shared fixtures for integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::Mutex;

use courier_oauth2::{HttpClient, HttpRequest, HttpResponse, Result};
use tracing_subscriber::EnvFilter;

/// Mock transport that replays queued responses and records requests.
#[derive(Debug, Default)]
pub struct MockClient {
    /// Responses to return (in order).
    responses: Mutex<VecDeque<HttpResponse>>,
    /// Captured requests sent by the client.
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response for the next request.
    pub fn reply(&self, response: HttpResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Queues a JSON token response.
    pub fn reply_json(&self, body: &str) {
        self.reply(HttpResponse::json(200, body));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

impl HttpClient for MockClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        let response = self.responses.lock().unwrap().pop_front();
        Ok(response.unwrap_or_else(|| HttpResponse::new(200)))
    }
}

/// Body of a recorded request as text.
pub fn body(request: &HttpRequest) -> String {
    String::from_utf8(request.body.clone()).unwrap()
}

/// Routes crate logs to the test output; `RUST_LOG` selects the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
