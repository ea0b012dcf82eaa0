use super::{HttpMethod, HttpRequest, Transport};
use crate::config::ClientConfig;
use crate::error_code::ErrorKind;
use crate::{Error, ErrorContext, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Sends API calls through a [`Transport`] and normalizes the outcome.
///
/// This is the only place where HTTP statuses and network failures become taxonomy
/// errors; callers only ever see a decoded success body or an [`Error`].
#[derive(Clone)]
pub struct TransportAdapter {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
}

impl TransportAdapter {
    pub fn new(config: Arc<ClientConfig>, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issue one request to `{api_root}/{segments...}` and decode the JSON answer.
    pub async fn request(
        &self,
        method: HttpMethod,
        segments: &[&str],
        body: Option<Value>,
    ) -> Result<Value> {
        let url = self.config.endpoint(segments)?;
        let request_id = uuid::Uuid::new_v4().to_string();
        let path = url.path().to_string();

        let request = HttpRequest {
            method,
            url,
            headers: vec![
                ("authorization", self.config.authorization()),
                ("content-type", "application/json".to_string()),
                ("accept", "application/json".to_string()),
                ("x-request-id", request_id.clone()),
            ],
            body,
        };

        debug!(%method, %path, %request_id, "sending request");

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%method, %path, %request_id, error = %e, "no response received");
                return Err(Error::from_transport(e));
            }
        };

        let status = response.status;
        let decoded = decode_body(&response.body);

        if !(200..300).contains(&status) {
            let body = decoded.unwrap_or_else(|_| Value::String(response.body.clone()));
            let err = Error::from_response(status, &body);
            warn!(
                %method,
                %path,
                %request_id,
                status,
                kind = %err.kind(),
                "request failed"
            );
            return Err(err);
        }

        debug!(%method, %path, %request_id, status, "request succeeded");

        decoded.map_err(|e| {
            Error::with_context(
                ErrorKind::ApiError,
                format!("Invalid response body: {}", e),
                ErrorContext::new()
                    .with_source("transport")
                    .with_status(status)
                    .with_details(response.body.clone()),
            )
        })
    }
}

/// Empty bodies decode as `null`.
fn decode_body(body: &str) -> std::result::Result<Value, serde_json::Error> {
    if body.trim().is_empty() {
        Ok(Value::Null)
    } else {
        serde_json::from_str(body)
    }
}
