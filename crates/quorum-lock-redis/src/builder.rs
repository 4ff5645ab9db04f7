//! Connecting Redis store adapters from URLs.

use fred::prelude::*;
use quorum_lock_core::error::{LockError, LockResult};

use crate::adapter::RedisStore;

/// Builder that connects one [`RedisStore`] per configured URL.
///
/// For a quorum deployment, list every independent node here; the stores
/// come back in the order the URLs were added, which is the order the
/// manager will hold them in for its lifetime.
pub struct RedisStoreBuilder {
    urls: Vec<String>,
}

impl RedisStoreBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self { urls: vec![] }
    }

    /// Adds a Redis node URL, e.g. `redis://10.0.0.1:6379`.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.urls.push(url.into());
        self
    }

    /// Adds multiple Redis node URLs.
    pub fn urls(mut self, urls: &[impl AsRef<str>]) -> Self {
        for url in urls {
            self.urls.push(url.as_ref().to_string());
        }
        self
    }

    /// Connects every node and returns the stores.
    ///
    /// Unlike lock operations, this is a construction-time path: a node
    /// that cannot be reached here is a configuration problem and surfaces
    /// as [`LockError::Connection`].
    pub async fn build(self) -> LockResult<Vec<RedisStore>> {
        if self.urls.is_empty() {
            return Err(LockError::InvalidConfig(
                "no Redis URLs provided".to_string(),
            ));
        }

        let mut stores = Vec::with_capacity(self.urls.len());
        for url in self.urls {
            let config = RedisConfig::from_url(&url).map_err(|e| {
                LockError::Connection(Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("invalid Redis URL '{url}': {e}"),
                )))
            })?;

            let client = RedisClient::new(config, None, None, None);
            client.connect();
            client.wait_for_connect().await.map_err(|e| {
                LockError::Connection(Box::new(std::io::Error::other(format!(
                    "failed to connect to '{url}': {e}"
                ))))
            })?;

            stores.push(RedisStore::from_client(url, client));
        }

        Ok(stores)
    }
}

impl Default for RedisStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
