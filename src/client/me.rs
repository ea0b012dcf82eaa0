use crate::client::core::UtopianLabs;
use crate::config::MeErrorPolicy;
use crate::error_code::ErrorKind;
use crate::transport::HttpMethod;
use crate::types::MeResponse;
use crate::{Error, ErrorContext, Result};
use tracing::warn;

const INVALID_KEY: &str = "Invalid API key";
const INTERNAL: &str = "Internal server error";

impl UtopianLabs {
    /// Check the API key and return the owning organization.
    ///
    /// With [`MeErrorPolicy::Structured`] (the default) failures come back as
    /// `Ok(MeResponse { status: Error, .. })`; with [`MeErrorPolicy::Propagate`] as `Err`.
    pub async fn me(&self) -> Result<MeResponse> {
        let outcome = self.fetch_me().await;
        match (outcome, self.config().me_error_policy()) {
            (Ok(me), _) => Ok(me),
            (Err(e), MeErrorPolicy::Propagate) => Err(e),
            (Err(e), MeErrorPolicy::Structured) => {
                warn!(kind = %e.kind(), error = %e, "me request failed");
                let reason = if e.is(ErrorKind::Unauthorized) {
                    INVALID_KEY
                } else {
                    INTERNAL
                };
                Ok(MeResponse::error(reason))
            }
        }
    }

    async fn fetch_me(&self) -> Result<MeResponse> {
        let body = self.adapter.request(HttpMethod::Get, &["me"], None).await?;
        serde_json::from_value(body.clone()).map_err(|e| {
            Error::with_context(
                ErrorKind::ApiError,
                format!("Invalid response data: {}", e),
                ErrorContext::new()
                    .with_source("transport")
                    .with_details(body.to_string()),
            )
        })
    }
}
