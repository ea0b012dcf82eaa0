//! Run endpoints: `GET /agents/runs/{run}` and `POST /agents/runs`.
//!
//! Every call validates its input locally first; a rejected input never reaches the network.

use crate::client::core::UtopianLabs;
use crate::error_code::ErrorKind;
use crate::transport::HttpMethod;
use crate::types::{CreatedRun, GetRunRequest, RunRequest, RunResponse};
use crate::validation::ValidationReport;
use crate::{Error, ErrorContext, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

const REQUEST_PREFIX: &str = "Invalid request data";
const RESPONSE_PREFIX: &str = "Invalid response data";

/// Field the API adds to every response body; never handed to callers.
const STATUS_MARKER: &str = "_status";

/// `client.agents()`
#[derive(Debug, Clone, Copy)]
pub struct Agents<'a> {
    client: &'a UtopianLabs,
}

impl<'a> Agents<'a> {
    pub(crate) fn new(client: &'a UtopianLabs) -> Self {
        Self { client }
    }

    pub fn runs(&self) -> AgentRuns<'a> {
        AgentRuns {
            client: self.client,
        }
    }
}

/// `client.agents().runs()`
#[derive(Debug, Clone, Copy)]
pub struct AgentRuns<'a> {
    client: &'a UtopianLabs,
}

impl<'a> AgentRuns<'a> {
    /// Fetch a run and return the body exactly as received.
    ///
    /// `params` is anything serializing to `{run, agent?}`, typically a [`GetRunRequest`].
    pub async fn get<P>(&self, params: &P) -> Result<Value>
    where
        P: Serialize + ?Sized,
    {
        let request = validate(params, GetRunRequest::from_value)?;
        self.client
            .adapter
            .request(HttpMethod::Get, &["agents", "runs", &request.run], None)
            .await
    }

    /// Like [`get`](Self::get), but the body is parsed into a [`RunResponse`].
    pub async fn get_typed<P>(&self, params: &P) -> Result<RunResponse>
    where
        P: Serialize + ?Sized,
    {
        let body = self.get(params).await?;
        RunResponse::from_value(&body).map_err(|report| {
            debug!(issues = report.len(), "run response rejected");
            Error::invalid_response(report)
        })
    }

    /// Start a run.
    ///
    /// `data` may be a [`RunRequest`] or any value with the same JSON shape; it is
    /// validated and sent with family defaults filled in.
    pub async fn create<D>(&self, data: &D) -> Result<CreatedRun>
    where
        D: Serialize + ?Sized,
    {
        let request = validate(data, RunRequest::from_value)?;
        let body = serde_json::to_value(&request).map_err(|e| {
            Error::new(
                ErrorKind::ValidationError,
                format!("{}: {}", REQUEST_PREFIX, e),
            )
        })?;

        let mut response = self
            .client
            .adapter
            .request(HttpMethod::Post, &["agents", "runs"], Some(body))
            .await?;
        strip_status_marker(&mut response);

        serde_json::from_value(response.clone()).map_err(|e| {
            Error::with_context(
                ErrorKind::ApiError,
                format!("{}: {}", RESPONSE_PREFIX, e),
                ErrorContext::new()
                    .with_source("transport")
                    .with_details(response.to_string()),
            )
        })
    }
}

fn validate<P, T>(input: &P, parse: fn(&Value) -> std::result::Result<T, ValidationReport>) -> Result<T>
where
    P: Serialize + ?Sized,
{
    let value = serde_json::to_value(input).map_err(|e| {
        Error::new(
            ErrorKind::ValidationError,
            format!("{}: {}", REQUEST_PREFIX, e),
        )
    })?;
    parse(&value).map_err(|report| {
        debug!(issues = report.len(), "request rejected before sending");
        Error::validation(REQUEST_PREFIX, report)
    })
}

fn strip_status_marker(body: &mut Value) {
    if let Some(obj) = body.as_object_mut() {
        obj.remove(STATUS_MARKER);
    }
}
