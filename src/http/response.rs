//! HTTP response building module
//!
//! Provides builders for the handful of responses the service emits.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Build 200 JSON response
///
/// The body is compact JSON followed by a newline. Serialization failure
/// yields a plain-text 500.
pub fn build_json_response<T: Serialize>(body: &T) -> Response<Full<Bytes>> {
    let mut json = match serde_json::to_vec(body) {
        Ok(j) => j,
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            return build_text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
        }
    };
    json.push(b'\n');

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build plain-text response, body terminated by a newline
pub fn build_text_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", TEXT_PLAIN)
        .header("X-Content-Type-Options", "nosniff")
        .body(Full::new(Bytes::from(format!("{message}\n"))))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::from(format!("{message}\n"))))
        })
}

/// Build 404 Not Found response for unrouted paths
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_text_response(StatusCode::NOT_FOUND, "404 page not found")
}

/// Build 405 Method Not Allowed response, empty body
pub fn build_405_response(allow: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Allow", allow)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            let mut response = Response::new(Full::new(Bytes::new()));
            *response.status_mut() = StatusCode::METHOD_NOT_ALLOWED;
            response
        })
}

/// Build empty 204 response (preflight)
pub fn build_no_content_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("204", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
