//! Error types
//!
//! `TenantError` covers per-request failures and maps each variant to exactly
//! one HTTP status and plain-text body. `ServerError` covers startup failures,
//! all of which are fatal.

use hyper::StatusCode;
use std::net::SocketAddr;

use crate::registry::{RecordKind, RegistryError};

/// Request-level tenant lookup failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TenantError {
    /// `tenant_id` header absent or empty
    #[error("Tenant ID is required")]
    MissingTenantId,
    /// Header present but no registry entry matched
    #[error("{}", not_found_message(.0))]
    NotFound(RecordKind),
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn not_found_message(kind: &RecordKind) -> &'static str {
    match kind {
        RecordKind::Config => "Config not found for tenant",
        RecordKind::TestData => "Test data not found for tenant",
    }
}

impl TenantError {
    pub const fn status(self) -> StatusCode {
        match self {
            Self::MissingTenantId => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

/// Fatal startup failure
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("invalid listen address '{addr}': {source}")]
    Address {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("failed to build tenant registry: {0}")]
    Registry(#[from] RegistryError),
    #[error("failed to open log files: {0}")]
    Logger(#[source] std::io::Error),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_error_status() {
        assert_eq!(TenantError::MissingTenantId.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            TenantError::NotFound(RecordKind::Config).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            TenantError::NotFound(RecordKind::TestData).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_tenant_error_messages() {
        assert_eq!(
            TenantError::MissingTenantId.to_string(),
            "Tenant ID is required"
        );
        assert_eq!(
            TenantError::NotFound(RecordKind::Config).to_string(),
            "Config not found for tenant"
        );
        assert_eq!(
            TenantError::NotFound(RecordKind::TestData).to_string(),
            "Test data not found for tenant"
        );
    }

    #[test]
    fn test_server_error_display() {
        let addr: SocketAddr = "127.0.0.1:8080".parse().unwrap();
        let err = ServerError::Bind {
            addr,
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
        };
        assert_eq!(err.to_string(), "failed to bind 127.0.0.1:8080: in use");
    }
}
