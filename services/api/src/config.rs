//! HTTP server configuration

use anyhow::Result;
use ::config::{Config, Environment};
use serde::Deserialize;

/// Where users and contacts are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Accepted `Host` header values; `*` accepts any
    pub allowed_hosts: Vec<String>,
    pub storage: StorageBackend,
}

impl ServerConfig {
    /// Create a new ServerConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SERVER_HOST`: Bind address (default: 0.0.0.0)
    /// - `SERVER_PORT`: Bind port (default: 8000)
    /// - `SERVER_ALLOWED_HOSTS`: Comma separated host names (default: localhost,127.0.0.1)
    /// - `SERVER_STORAGE`: `postgres` or `memory` (default: postgres)
    pub fn from_env() -> Result<Self> {
        let config = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8000)?
            .set_default("allowed_hosts", vec!["localhost", "127.0.0.1"])?
            .set_default("storage", "postgres")?
            .add_source(
                Environment::with_prefix("SERVER")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("allowed_hosts"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
