//! Connection pool configuration

use serde::Deserialize;

fn default_max_connections() -> u32 {
    5
}

/// Settings for an executor backed by a connection pool
///
/// Deserializable so it can live in an application's own config file:
///
/// ```
/// use sqlpipe_core::PoolConfig;
///
/// let config: PoolConfig = serde_json::from_str(r#"{ "url": "sqlite://app.db" }"#).unwrap();
/// assert_eq!(config.max_connections, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PoolConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl PoolConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Whether the URL names a database that lives only inside one connection
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }

    /// Pool size actually used; in-memory databases are pinned to one connection
    pub fn effective_max_connections(&self) -> u32 {
        if self.is_in_memory() {
            1
        } else {
            self.max_connections.max(1)
        }
    }
}
