// Application state module
// Read-only state shared by every connection task

use std::sync::Arc;

use super::types::{Config, LoggingConfig};
use crate::http::CorsPolicy;
use crate::registry::TenantRegistry;

/// Application state
///
/// Built once at startup and handed to each connection behind an `Arc`.
/// Nothing in here changes after construction, so no locking is needed.
pub struct AppState {
    pub registry: Arc<TenantRegistry>,
    pub cors: CorsPolicy,
    pub logging: LoggingConfig,
}

impl AppState {
    pub fn new(config: &Config, registry: TenantRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            cors: CorsPolicy::from_config(&config.cors),
            logging: config.logging.clone(),
        }
    }
}
