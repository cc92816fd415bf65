// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub cors: CorsConfig,
    #[serde(default)]
    pub tenants: TenantsConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Cross-origin policy applied to every response
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    /// Allowed origins; `*` allows any
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    /// Allowed request headers; `*` allows any
    pub allowed_headers: Vec<String>,
    pub allow_credentials: bool,
    /// Preflight cache lifetime in seconds, 0 omits the header
    #[serde(default)]
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allowed_methods: ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            allowed_headers: vec!["*".to_string()],
            allow_credentials: true,
            max_age: 0,
        }
    }
}

/// Tenant data source
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct TenantsConfig {
    /// TOML fixture path; built-in sample tenants when unset
    #[serde(default)]
    pub file: Option<String>,
}
