//! Tenant lookup handlers
//!
//! Both endpoints share one shape: extract the tenant id, look it up in one
//! registry mapping, answer with JSON or a plain-text error.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderValue};
use hyper::Response;
use serde::Serialize;

use crate::error::TenantError;
use crate::http::{build_json_response, build_text_response};
use crate::registry::{RecordKind, TenantRegistry};

/// Request header carrying the tenant identifier
pub const TENANT_HEADER: &str = "tenant_id";

/// Non-empty tenant identifier taken from a request, raw header bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantId(HeaderValue);

impl TenantId {
    /// UTF-8 view of the id; `None` for byte values no registry key can match
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.0.as_bytes()).ok()
    }
}

/// Read the tenant id from request headers
///
/// Only an absent or empty value is missing. Any other value, including
/// non-ASCII bytes, is passed on to the lookup.
pub fn extract_tenant_id(headers: &HeaderMap) -> Result<TenantId, TenantError> {
    headers
        .get(TENANT_HEADER)
        .filter(|v| !v.as_bytes().is_empty())
        .map(|v| TenantId(v.clone()))
        .ok_or(TenantError::MissingTenantId)
}

/// `GET /api/config`
pub fn handle_config(headers: &HeaderMap, registry: &TenantRegistry) -> Response<Full<Bytes>> {
    let result = extract_tenant_id(headers).and_then(|tenant| {
        tenant
            .as_str()
            .and_then(|id| registry.get_config(id))
            .ok_or(TenantError::NotFound(RecordKind::Config))
    });
    respond(result)
}

/// `GET /api/test`
pub fn handle_test_data(headers: &HeaderMap, registry: &TenantRegistry) -> Response<Full<Bytes>> {
    let result = extract_tenant_id(headers).and_then(|tenant| {
        tenant
            .as_str()
            .and_then(|id| registry.get_test_data(id))
            .ok_or(TenantError::NotFound(RecordKind::TestData))
    });
    respond(result)
}

fn respond<T: Serialize>(result: Result<&T, TenantError>) -> Response<Full<Bytes>> {
    match result {
        Ok(record) => build_json_response(record),
        Err(err) => build_text_response(err.status(), &err.to_string()),
    }
}
