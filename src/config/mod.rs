//! Configuration management
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `ANIMALS_` prefix, `__` nesting)
//! 2. `./config.toml`
//! 3. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # config.toml
//! [server]
//! host = "0.0.0.0"
//! port = 3000
//!
//! [uploads]
//! directory = "./uploads"
//! public_base = "/uploads"
//! default_image_url = "/uploads/default.png"
//!
//! [store]
//! backend = "redis"
//! redis_url = "redis://127.0.0.1:6379"
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Interface to bind
    pub host: String,

    /// Port to bind
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Image upload settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    /// Directory where uploaded images are written
    pub directory: PathBuf,

    /// Public URL path under which stored images are served
    pub public_base: String,

    /// URL returned for records created without a usable image
    pub default_image_url: String,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./uploads"),
            public_base: "/uploads".to_string(),
            default_image_url: "/uploads/default.png".to_string(),
        }
    }
}

/// Record store backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local store; records live for the process lifetime
    Memory,
    /// Redis-backed store; records persist in the external store
    Redis,
}

/// Record store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Which store implementation to use
    pub backend: StoreBackend,

    /// Redis connection string; falls back to the `REDIS_URL` environment
    /// variable when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redis_url: Option<String>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            redis_url: None,
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,

    /// Image upload settings
    #[serde(default)]
    pub uploads: UploadSettings,

    /// Record store settings
    #[serde(default)]
    pub store: StoreSettings,
}

impl RegistryConfig {
    /// Load configuration with the documented precedence.
    ///
    /// # Errors
    ///
    /// Returns an error if the defaults cannot be serialized, the config
    /// file cannot be parsed, or merged values fail type conversion.
    pub fn load() -> anyhow::Result<Self> {
        let mut figment = Figment::new()
            // 3. Start with defaults (lowest priority)
            .merge(Toml::string(&toml::to_string(&Self::default())?));

        // 2. Local config: ./config.toml
        let local_config = PathBuf::from("./config.toml");
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }

        // 1. Environment variables (highest priority, double underscore for nesting)
        figment = figment.merge(Env::prefixed("ANIMALS_").split("__").lowercase(true));

        let config = figment.extract()?;
        Ok(config)
    }

    /// The bind address in `host:port` form.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Resolves the Redis connection string, consulting the `REDIS_URL`
    /// environment variable when the config leaves it unset.
    #[must_use]
    pub fn redis_url(&self) -> Option<String> {
        self.store
            .redis_url
            .clone()
            .or_else(|| std::env::var("REDIS_URL").ok())
    }
}
