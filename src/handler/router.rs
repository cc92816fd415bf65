//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: CORS preflight short-circuit,
//! route matching, CORS decoration and access logging.

use crate::config::AppState;
use crate::handler::tenant;
use crate::http::{self, CorsPolicy};
use crate::logger::{self, AccessLogEntry};
use crate::registry::TenantRegistry;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, ORIGIN, REFERER, USER_AGENT};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

pub const CONFIG_PATH: &str = "/api/config";
pub const TEST_DATA_PATH: &str = "/api/test";

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let origin = header_string(req.headers(), ORIGIN);

    let response = if CorsPolicy::is_preflight(&req) {
        state.cors.preflight_response(req.headers())
    } else {
        let mut response = route_request(&req, &state.registry);
        state.cors.apply(origin.as_deref(), &mut response);
        response
    };

    if state.logging.access_log {
        log_access(&req, &response, &state, peer_addr, started);
    }

    Ok(response)
}

/// Match method and path against the two tenant routes
pub fn route_request<B>(req: &Request<B>, registry: &TenantRegistry) -> Response<Full<Bytes>> {
    match (req.method(), req.uri().path()) {
        (&Method::GET, CONFIG_PATH) => tenant::handle_config(req.headers(), registry),
        (&Method::GET, TEST_DATA_PATH) => tenant::handle_test_data(req.headers(), registry),
        (method, CONFIG_PATH | TEST_DATA_PATH) => {
            logger::log_warning(&format!("Method not allowed: {method} {}", req.uri().path()));
            http::build_405_response("GET")
        }
        _ => http::build_404_response(),
    }
}

fn log_access<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    state: &AppState,
    peer_addr: SocketAddr,
    started: Instant,
) {
    let headers = req.headers();
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.tenant_id = headers
        .get(tenant::TENANT_HEADER)
        .filter(|v| !v.as_bytes().is_empty())
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
    entry.status = response.status().as_u16();
    entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
        .unwrap_or(usize::MAX);
    entry.referer = header_string(headers, REFERER);
    entry.user_agent = header_string(headers, USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    logger::log_access(&entry, &state.logging.access_log_format);
}

fn header_string<K: hyper::header::AsHeaderName>(headers: &HeaderMap, name: K) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::{BodyExt, Empty};
    use hyper::StatusCode;

    fn test_state() -> Arc<AppState> {
        let mut cfg = Config::load_from("/nonexistent/tenant-server-config").unwrap();
        cfg.logging.access_log = false;
        Arc::new(AppState::new(&cfg, TenantRegistry::sample()))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    fn get(path: &str, tenant: Option<&str>) -> Request<Empty<Bytes>> {
        let mut builder = Request::builder().method(Method::GET).uri(path);
        if let Some(t) = tenant {
            builder = builder.header("tenant_id", t);
        }
        builder.body(Empty::new()).unwrap()
    }

    async fn body_text(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_config_scenario() {
        let response = handle_request(get("/api/config", Some("tenant1")), test_state(), peer())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(
            body_text(response).await,
            "{\"tenant_id\":\"tenant1\",\"theme\":\"dark\",\"template\":\"template_1\",\"description\":\"Configuration for Tenant 1\"}\n"
        );
    }

    #[tokio::test]
    async fn test_test_data_scenario() {
        let response = handle_request(get("/api/test", Some("tenant2")), test_state(), peer())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_text(response).await,
            "{\"tenant_id\":\"tenant2\",\"data\":\"This is test data for Tenant 2\"}\n"
        );
    }

    #[tokio::test]
    async fn test_errors_carry_cors() {
        let state = test_state();

        let response = handle_request(get("/api/config", None), Arc::clone(&state), peer())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(body_text(response).await, "Tenant ID is required\n");

        let response = handle_request(get("/api/config", Some("unknown")), state, peer())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(body_text(response).await, "Config not found for tenant\n");
    }

    #[tokio::test]
    async fn test_origin_is_echoed() {
        let req = Request::builder()
            .uri("/api/test")
            .header("tenant_id", "tenant1")
            .header("Origin", "http://localhost:3000")
            .body(Empty::<Bytes>::new())
            .unwrap();
        let response = handle_request(req, test_state(), peer()).await.unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://localhost:3000"
        );
        assert_eq!(response.headers()["access-control-allow-credentials"], "true");
    }

    #[tokio::test]
    async fn test_preflight() {
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/config")
            .header("Origin", "http://localhost:3000")
            .header("Access-Control-Request-Method", "GET")
            .header("Access-Control-Request-Headers", "tenant_id")
            .body(Empty::<Bytes>::new())
            .unwrap();
        let response = handle_request(req, test_state(), peer()).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()["access-control-allow-headers"], "tenant_id");
    }

    #[tokio::test]
    async fn test_routing_errors_carry_cors() {
        let state = test_state();

        let response = handle_request(get("/api/other", Some("tenant1")), Arc::clone(&state), peer())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(response.headers()["access-control-allow-credentials"], "true");

        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/test")
            .header("tenant_id", "tenant1")
            .body(Empty::<Bytes>::new())
            .unwrap();
        let response = handle_request(req, state, peer()).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()["allow"], "GET");
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(response.headers()["access-control-allow-credentials"], "true");
    }

    #[test]
    fn test_unknown_path() {
        let registry = TenantRegistry::sample();
        let response = route_request(&get("/api/other", Some("tenant1")), &registry);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let response = route_request(&get("/api/config/extra", Some("tenant1")), &registry);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_query_string_ignored() {
        let registry = TenantRegistry::sample();
        let response = route_request(&get("/api/config?x=1", Some("tenant1")), &registry);
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_wrong_method() {
        let registry = TenantRegistry::sample();
        for method in [Method::POST, Method::PUT, Method::DELETE, Method::HEAD] {
            let req = Request::builder()
                .method(method)
                .uri("/api/config")
                .header("tenant_id", "tenant1")
                .body(Empty::<Bytes>::new())
                .unwrap();
            let response = route_request(&req, &registry);
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(response.headers()["allow"], "GET");
        }
    }

    #[test]
    fn test_version_label() {
        assert_eq!(version_label(Version::HTTP_10), "1.0");
        assert_eq!(version_label(Version::HTTP_11), "1.1");
        assert_eq!(version_label(Version::HTTP_2), "2");
    }
}
