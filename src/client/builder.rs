use crate::client::core::UtopianLabs;
use crate::config::{self, ClientConfig, MeErrorPolicy};
use crate::transport::{HttpTransport, Transport, TransportAdapter};
use crate::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Builder for [`UtopianLabs`].
///
/// Unset values fall back to the environment, then to defaults (see [`crate::config`]).
pub struct UtopianLabsBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    version: Option<String>,
    timeout: Option<Duration>,
    me_error_policy: MeErrorPolicy,
    transport: Option<Arc<dyn Transport>>,
    use_keyring: bool,
}

impl UtopianLabsBuilder {
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: None,
            version: None,
            timeout: None,
            me_error_policy: MeErrorPolicy::default(),
            transport: None,
            use_keyring: true,
        }
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override base URL (e.g. a mock server in tests).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Request timeout of the built-in HTTP transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn me_error_policy(mut self, policy: MeErrorPolicy) -> Self {
        self.me_error_policy = policy;
        self
    }

    /// Send requests through a custom transport instead of `reqwest`.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Skip the OS keyring when looking up the API key.
    pub fn without_keyring(mut self) -> Self {
        self.use_keyring = false;
        self
    }

    pub fn build(self) -> Result<UtopianLabs> {
        let api_key = match self.api_key {
            Some(key) => key,
            None => config::lookup_api_key(self.use_keyring).ok_or_else(|| {
                Error::configuration(format!(
                    "Missing API key: pass one explicitly, store it in the keyring ({}/{}) or set {}",
                    config::KEYRING_SERVICE,
                    config::KEYRING_USER,
                    config::ENV_API_KEY
                ))
            })?,
        };
        let base_url = self
            .base_url
            .or_else(config::env_base_url)
            .unwrap_or_else(|| config::DEFAULT_BASE_URL.to_string());
        let version = self
            .version
            .or_else(config::env_api_version)
            .unwrap_or_else(|| config::DEFAULT_API_VERSION.to_string());
        let timeout = self
            .timeout
            .or_else(config::env_timeout)
            .unwrap_or(Duration::from_secs(config::DEFAULT_TIMEOUT_SECS));

        let config = ClientConfig::new(api_key, base_url, version)?
            .with_timeout(timeout)
            .with_me_error_policy(self.me_error_policy);

        let transport: Arc<dyn Transport> = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new(config.timeout())?),
        };

        debug!(api_root = %config.api_root(), "client configured");

        Ok(UtopianLabs {
            adapter: Arc::new(TransportAdapter::new(Arc::new(config), transport)),
        })
    }
}

impl Default for UtopianLabsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_code::ErrorKind;

    #[test]
    fn test_explicit_values_win() {
        let client = UtopianLabsBuilder::new()
            .api_key("sk-1")
            .base_url("http://127.0.0.1:9/")
            .version("v2")
            .timeout(Duration::from_secs(5))
            .me_error_policy(MeErrorPolicy::Propagate)
            .build()
            .unwrap();
        let cfg = client.config();
        assert_eq!(cfg.api_root().as_str(), "http://127.0.0.1:9/v2");
        assert_eq!(cfg.timeout(), Duration::from_secs(5));
        assert_eq!(cfg.me_error_policy(), MeErrorPolicy::Propagate);
    }

    #[test]
    fn test_blank_key_is_rejected() {
        let err = UtopianLabsBuilder::new().api_key("  ").build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
        assert_eq!(err.context().source.as_deref(), Some("config"));
    }
}
