//! The database handle: the entry point of the SDK
//!
//! A [`Database`] wraps one API endpoint plus a default keyspace and
//! hands out [`Collection`] handles. It holds the shared HTTP transport;
//! everything derived from the same database reuses one connection pool.

use crate::collection::Collection;
use crate::error::{Error, Result};
use crate::http::{DataApiClient, DataApiClientConfig};
use std::sync::Arc;
use url::Url;

/// Default keyspace used when none is given
pub const DEFAULT_KEYSPACE: &str = "default_keyspace";

/// A handle on one remote document database
#[derive(Debug, Clone)]
pub struct Database {
    client: Arc<DataApiClient>,
    keyspace: String,
}

impl Database {
    /// Connect to an API endpoint with an application token, using the
    /// default keyspace.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let config = DataApiClientConfig::builder()
            .base_url(base_url)
            .token(token)
            .build();
        Self::with_config(config)
    }

    /// Connect with full client configuration
    pub fn with_config(config: DataApiClientConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(Error::config("base_url must not be empty"));
        }
        // Validate eagerly so a bad endpoint fails here, not on first use
        Url::parse(&config.base_url)?;
        Ok(Self {
            client: Arc::new(DataApiClient::with_config(config)),
            keyspace: DEFAULT_KEYSPACE.to_string(),
        })
    }

    /// Switch the default keyspace of this handle
    #[must_use]
    pub fn with_keyspace(mut self, keyspace: impl Into<String>) -> Self {
        self.keyspace = keyspace.into();
        self
    }

    /// The keyspace collection handles are created in
    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    /// The configured API base URL
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// A handle on the named collection in the current keyspace
    pub fn collection(&self, name: impl Into<String>) -> Collection {
        Collection::new(Arc::clone(&self.client), self.keyspace.clone(), name)
    }
}
