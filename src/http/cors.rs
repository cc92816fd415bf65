//! Cross-origin resource sharing
//!
//! Wraps every response with `Access-Control-*` headers and answers
//! preflight probes before they reach the router.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE,
    ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN, VARY,
};
use hyper::{Method, Request, Response};

use super::response::build_no_content_response;
use crate::config::CorsConfig;

/// Compiled cross-origin policy
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    any_origin: bool,
    origins: Vec<String>,
    methods: Vec<String>,
    any_header: bool,
    headers: Vec<String>,
    allow_credentials: bool,
    max_age: u64,
}

impl CorsPolicy {
    pub fn from_config(config: &CorsConfig) -> Self {
        Self {
            any_origin: config.allowed_origins.iter().any(|o| o == "*"),
            origins: config
                .allowed_origins
                .iter()
                .filter(|o| *o != "*")
                .map(|o| o.to_ascii_lowercase())
                .collect(),
            methods: config
                .allowed_methods
                .iter()
                .map(|m| m.to_ascii_uppercase())
                .collect(),
            any_header: config.allowed_headers.iter().any(|h| h == "*"),
            headers: config
                .allowed_headers
                .iter()
                .filter(|h| *h != "*")
                .map(|h| h.to_ascii_lowercase())
                .collect(),
            allow_credentials: config.allow_credentials,
            max_age: config.max_age,
        }
    }

    /// `OPTIONS` carrying `Access-Control-Request-Method`
    pub fn is_preflight<B>(req: &Request<B>) -> bool {
        req.method() == Method::OPTIONS && req.headers().contains_key(ACCESS_CONTROL_REQUEST_METHOD)
    }

    fn origin_allowed(&self, origin: &str) -> bool {
        self.any_origin || self.origins.iter().any(|o| o.eq_ignore_ascii_case(origin))
    }

    fn method_allowed(&self, method: &str) -> bool {
        // Preflight itself is always permitted
        method.eq_ignore_ascii_case("OPTIONS")
            || self.methods.iter().any(|m| m.eq_ignore_ascii_case(method))
    }

    fn headers_allowed(&self, requested: &[String]) -> bool {
        self.any_header
            || requested
                .iter()
                .all(|h| self.headers.iter().any(|allowed| allowed == h))
    }

    /// Value for `Access-Control-Allow-Origin`, or `None` when the origin is refused
    fn allow_origin_value(&self, origin: Option<&str>) -> Option<String> {
        match origin {
            // Credentialed requests must not see `*`, echo the caller instead
            Some(origin) if self.origin_allowed(origin) => {
                if self.any_origin && !self.allow_credentials {
                    Some("*".to_string())
                } else {
                    Some(origin.to_string())
                }
            }
            Some(_) => None,
            None if self.any_origin => Some("*".to_string()),
            None => None,
        }
    }

    /// Answer a preflight request
    pub fn preflight_response(&self, request_headers: &HeaderMap) -> Response<Full<Bytes>> {
        let mut response = build_no_content_response();
        let headers = response.headers_mut();
        headers.append(VARY, HeaderValue::from_static("Origin"));
        headers.append(VARY, HeaderValue::from_static("Access-Control-Request-Method"));
        headers.append(VARY, HeaderValue::from_static("Access-Control-Request-Headers"));

        let origin = header_str(request_headers, &ORIGIN);
        let Some(allow_origin) = self.allow_origin_value(origin) else {
            return response;
        };

        let requested_method = header_str(request_headers, &ACCESS_CONTROL_REQUEST_METHOD).unwrap_or("");
        if !self.method_allowed(requested_method) {
            return response;
        }

        let requested_headers = parse_header_list(header_str(request_headers, &ACCESS_CONTROL_REQUEST_HEADERS));
        if !self.headers_allowed(&requested_headers) {
            return response;
        }

        insert(headers, &ACCESS_CONTROL_ALLOW_ORIGIN, &allow_origin);
        insert(headers, &ACCESS_CONTROL_ALLOW_METHODS, &self.methods.join(", "));
        if !requested_headers.is_empty() {
            insert(headers, &ACCESS_CONTROL_ALLOW_HEADERS, &requested_headers.join(", "));
        }
        if self.allow_credentials {
            headers.insert(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
        }
        if self.max_age > 0 {
            insert(headers, &ACCESS_CONTROL_MAX_AGE, &self.max_age.to_string());
        }
        response
    }

    /// Decorate an actual (non-preflight) response
    pub fn apply(&self, origin: Option<&str>, response: &mut Response<Full<Bytes>>) {
        let headers = response.headers_mut();
        if origin.is_some() {
            headers.append(VARY, HeaderValue::from_static("Origin"));
        }
        let Some(allow_origin) = self.allow_origin_value(origin) else {
            return;
        };
        insert(headers, &ACCESS_CONTROL_ALLOW_ORIGIN, &allow_origin);
        if self.allow_credentials {
            headers.insert(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &hyper::header::HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Split `Access-Control-Request-Headers` into lowercase names
fn parse_header_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_ascii_lowercase)
        .collect()
}

fn insert(headers: &mut HeaderMap, name: &hyper::header::HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(v) => {
            headers.insert(name.clone(), v);
        }
        Err(e) => crate::logger::log_warning(&format!("Dropping invalid {name} value: {e}")),
    }
}
