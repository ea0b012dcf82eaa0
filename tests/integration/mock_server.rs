//! Mock HTTP server setup for integration tests

use async_trait::async_trait;
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::sync::{Arc, Mutex};
use utopian_labs::transport::{HttpRequest, HttpResponse, Transport, TransportError};
use utopian_labs::{MeErrorPolicy, UtopianLabs};

pub const API_KEY: &str = "sk-test-123";

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: ServerGuard,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        Self {
            server: Server::new_async().await,
        }
    }

    /// Client pointed at the mock server, keyring disabled.
    pub fn client(&self) -> UtopianLabs {
        self.client_with_policy(MeErrorPolicy::Structured)
    }

    pub fn client_with_policy(&self, policy: MeErrorPolicy) -> UtopianLabs {
        UtopianLabs::builder()
            .api_key(API_KEY)
            .base_url(self.server.url())
            .me_error_policy(policy)
            .without_keyring()
            .build()
            .expect("client should build")
    }

    /// JSON response for `method path`, requiring the bearer header.
    pub async fn mock_json(&mut self, method: &str, path: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock(method, path)
            .match_header("authorization", format!("Bearer {}", API_KEY).as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// A route that must never be hit.
    pub async fn mock_never_called(&mut self, method: &str) -> Mock {
        self.server
            .mock(method, Matcher::Any)
            .expect(0)
            .create_async()
            .await
    }
}

/// Transport that records requests instead of sending them.
#[derive(Default)]
pub struct RecordingTransport {
    pub requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// Client whose requests end up in `transport` instead of on the network.
pub fn recording_client(transport: &Arc<RecordingTransport>) -> UtopianLabs {
    UtopianLabs::builder()
        .api_key(API_KEY)
        .with_transport(transport.clone())
        .without_keyring()
        .build()
        .expect("client should build")
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        Ok(HttpResponse {
            status: 200,
            body: r#"{"id":"recorded","_status":200}"#.to_string(),
        })
    }
}
