//! Client configuration: API key, base URL, API version and timeouts.
//!
//! A [`ClientConfig`] is immutable once built and shared by every call a client makes.
//! Values not given explicitly are read from the environment:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `UTOPIAN_LABS_API_KEY` | none (required) |
//! | `UTOPIAN_LABS_BASE_URL` | `https://api.utopianlabs.ai` |
//! | `UTOPIAN_LABS_API_VERSION` | `v1` |
//! | `UTOPIAN_LABS_HTTP_TIMEOUT_SECS` | `30` |

use crate::{Error, Result};
use std::env;
use std::fmt;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.utopianlabs.ai";
pub const DEFAULT_API_VERSION: &str = "v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_KEY: &str = "UTOPIAN_LABS_API_KEY";
pub const ENV_BASE_URL: &str = "UTOPIAN_LABS_BASE_URL";
pub const ENV_API_VERSION: &str = "UTOPIAN_LABS_API_VERSION";
pub const ENV_TIMEOUT_SECS: &str = "UTOPIAN_LABS_HTTP_TIMEOUT_SECS";

/// OS keyring entry consulted for the API key before the environment.
pub const KEYRING_SERVICE: &str = "utopian-labs";
pub const KEYRING_USER: &str = "api-key";

/// What `me()` does when the call fails.
///
/// Two behaviours exist for this endpoint and neither is authoritative, so the choice is left
/// to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeErrorPolicy {
    /// Return `{status: "error", error: ...}`: "Invalid API key" for an unauthorized key,
    /// "Internal server error" for anything else.
    #[default]
    Structured,
    /// Return every failure as `Err`.
    Propagate,
}

#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    base_url: String,
    version: String,
    api_root: Url,
    timeout: Duration,
    me_error_policy: MeErrorPolicy,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("version", &self.version)
            .field("timeout", &self.timeout)
            .field("me_error_policy", &self.me_error_policy)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::configuration("API key must not be empty"));
        }

        let base_url = base_url.into().trim_end_matches('/').to_string();
        let version = version.into().trim_matches('/').to_string();
        if version.is_empty() {
            return Err(Error::configuration("API version must not be empty"));
        }

        let mut api_root = Url::parse(&base_url)
            .map_err(|e| Error::configuration(format!("Invalid base URL '{}': {}", base_url, e)))?;
        if !matches!(api_root.scheme(), "http" | "https") {
            return Err(Error::configuration(format!(
                "Base URL must use http or https, got '{}'",
                api_root.scheme()
            )));
        }
        api_root
            .path_segments_mut()
            .map_err(|_| Error::configuration(format!("Base URL '{}' cannot carry a path", base_url)))?
            .pop_if_empty()
            .push(&version);

        Ok(Self {
            api_key,
            base_url,
            version,
            api_root,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            me_error_policy: MeErrorPolicy::default(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_me_error_policy(mut self, policy: MeErrorPolicy) -> Self {
        self.me_error_policy = policy;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// `{base_url}/{version}`
    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn me_error_policy(&self) -> MeErrorPolicy {
        self.me_error_policy
    }

    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    /// Resolve an endpoint below the API root; each segment is percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_root.clone();
        url.path_segments_mut()
            .map_err(|_| Error::configuration("Base URL cannot carry a path"))?
            .extend(segments);
        Ok(url)
    }
}

pub(crate) fn env_base_url() -> Option<String> {
    env::var(ENV_BASE_URL).ok().filter(|s| !s.trim().is_empty())
}

pub(crate) fn env_api_version() -> Option<String> {
    env::var(ENV_API_VERSION).ok().filter(|s| !s.trim().is_empty())
}

pub(crate) fn env_timeout() -> Option<Duration> {
    env::var(ENV_TIMEOUT_SECS)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

/// API key lookup: OS keyring first, then `UTOPIAN_LABS_API_KEY`.
pub(crate) fn lookup_api_key(use_keyring: bool) -> Option<String> {
    if use_keyring {
        if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER) {
            if let Ok(key) = entry.get_password() {
                return Some(key);
            }
        }
    }
    env::var(ENV_API_KEY).ok().filter(|s| !s.trim().is_empty())
}
