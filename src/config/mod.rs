// Configuration module entry point
// Loads layered settings and builds the shared application state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{Config, CorsConfig};

use crate::error::ServerError;
use crate::registry::{RegistryError, TenantRegistry};

/// Environment variable naming an alternate config file (without extension)
pub const CONFIG_PATH_ENV: &str = "TENANT_SERVER_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from `config.toml` (or `$TENANT_SERVER_CONFIG`)
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path (without extension)
    /// A missing file is not an error; defaults and `SERVER_*` overrides still apply
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = Self::builder()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SERVER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
    {
        let cors = CorsConfig::default();
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("cors.allowed_origins", cors.allowed_origins)?
            .set_default("cors.allowed_methods", cors.allowed_methods)?
            .set_default("cors.allowed_headers", cors.allowed_headers)?
            .set_default("cors.allow_credentials", cors.allow_credentials)?
            .set_default("cors.max_age", cors.max_age)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| ServerError::Address { addr, source })
    }

    /// Build the tenant registry from the configured source
    pub fn build_registry(&self) -> Result<TenantRegistry, RegistryError> {
        match self.tenants.file.as_deref() {
            Some(path) => TenantRegistry::load(path),
            None => Ok(TenantRegistry::sample()),
        }
    }
}
