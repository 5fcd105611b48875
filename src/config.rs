use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::location::{Location, LocationGroup};
use crate::utils::{CircuitBreakerConfig, RetryPolicy};

// ============================================================================
// Application Configuration
// ============================================================================
//
// Loaded from a TOML file; every section and field is optional and falls
// back to `Default`. A few deployment knobs can be overridden from the
// environment:
//
//   TMS_DIRECTORY_URL  directory.base_url
//   TMS_PORT           server.port
//   TMS_LOG_JSON       logging.json ("true"/"false")
//
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub directory: DirectoryConfig,
    pub store: StoreConfig,
    pub redirect: RedirectConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Directory service URL; without it the static entries below are served
    pub base_url: Option<String>,
    pub request_timeout_ms: u64,
    pub retry: RetryPolicy,
    pub circuit_breaker: CircuitBreakerConfig,
    pub groups: Vec<LocationGroup>,
    pub locations: Vec<Location>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout_ms: 2_000,
            retry: RetryPolicy::default(),
            circuit_breaker: CircuitBreakerConfig::default(),
            groups: Vec::new(),
            locations: Vec::new(),
        }
    }
}

impl DirectoryConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Scylla,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub known_nodes: Vec<String>,
    pub keyspace: String,
    /// Orders loaded into the store at startup (memory backend fixtures)
    pub seed_orders: Vec<SeedOrder>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            known_nodes: vec!["127.0.0.1:9042".to_string()],
            keyspace: "tms".to_string(),
            seed_orders: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedOrder {
    pub id: Uuid,
    pub transport_unit_bk: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectConfig {
    pub max_conflict_retries: u32,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self { max_conflict_retries: 3 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub json: bool,
}

impl AppConfig {
    /// Defaults, or the given TOML file, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("TMS_DIRECTORY_URL") {
            self.directory.base_url = Some(url);
        }
        if let Some(port) = lookup("TMS_PORT") {
            self.server.port = port.parse().with_context(|| format!("TMS_PORT is not a port: {}", port))?;
        }
        if let Some(json) = lookup("TMS_LOG_JSON") {
            self.logging.json = json
                .parse()
                .with_context(|| format!("TMS_LOG_JSON is not a boolean: {}", json))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.directory.request_timeout_ms == 0 {
            bail!("directory.request_timeout_ms must be greater than zero");
        }
        if self.directory.retry.max_attempts == 0 {
            bail!("directory.retry.max_attempts must be at least 1");
        }
        if let Some(url) = &self.directory.base_url {
            if url.trim().is_empty() {
                bail!("directory.base_url must not be empty");
            }
        }
        if self.store.backend == StoreBackend::Scylla && self.store.known_nodes.is_empty() {
            bail!("store.known_nodes is required for the scylla backend");
        }
        Ok(())
    }
}
