use crate::client::builder::UtopianLabsBuilder;
use crate::client::runs::Agents;
use crate::config::ClientConfig;
use crate::transport::TransportAdapter;
use crate::Result;
use std::fmt;
use std::sync::Arc;

/// Client for the agent run API.
///
/// Cheap to clone; clones share configuration and the connection pool.
#[derive(Clone)]
pub struct UtopianLabs {
    pub(crate) adapter: Arc<TransportAdapter>,
}

impl UtopianLabs {
    pub fn builder() -> UtopianLabsBuilder {
        UtopianLabsBuilder::new()
    }

    /// Client with an explicit API key; everything else from the environment or defaults.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        UtopianLabsBuilder::new().api_key(api_key).build()
    }

    /// Client configured entirely from the keyring and environment.
    pub fn from_env() -> Result<Self> {
        UtopianLabsBuilder::new().build()
    }

    pub fn config(&self) -> &ClientConfig {
        self.adapter.config()
    }

    /// `client.agents().runs()` groups the run endpoints.
    pub fn agents(&self) -> Agents<'_> {
        Agents::new(self)
    }
}

impl fmt::Debug for UtopianLabs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UtopianLabs")
            .field("config", self.config())
            .finish()
    }
}
