//! Access log format module
//!
//! Supports multiple log formats:
//! - `combined` (Apache/Nginx combined format)
//! - `common` (Common Log Format - CLF)
//! - `json` (JSON structured logging)
//! - Custom patterns with variables

use chrono::Local;
use serde::Serialize;

/// Access log entry containing all request/response information
#[derive(Debug, Clone, Serialize)]
pub struct AccessLogEntry {
    /// Client IP address
    pub remote_addr: String,
    /// Request timestamp
    pub time: chrono::DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    /// HTTP version (1.0, 1.1, 2)
    pub http_version: String,
    /// Tenant named by the `tenant_id` header, if any
    pub tenant_id: Option<String>,
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: usize,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    /// Request processing time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            tenant_id: None,
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    /// Format the log entry according to the specified format
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => self.format_combined(),
            "common" => self.format_common(),
            "json" => self.format_json(),
            custom => self.format_custom(custom),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    fn time_local(&self) -> String {
        self.time.format("%d/%b/%Y:%H:%M:%S %z").to_string()
    }

    /// Common Log Format (CLF)
    /// `$remote_addr - $tenant_id [$time_local] "$request" $status $body_bytes_sent`
    ///
    /// The tenant takes the CLF "remote user" slot.
    fn format_common(&self) -> String {
        format!(
            "{} - {} [{}] \"{} {} HTTP/{}\" {} {}",
            self.remote_addr,
            self.tenant_id.as_deref().unwrap_or("-"),
            self.time_local(),
            self.method,
            self.request_uri(),
            self.http_version,
            self.status,
            self.body_bytes,
        )
    }

    /// Combined format: CLF plus `"$http_referer" "$http_user_agent"`
    fn format_combined(&self) -> String {
        format!(
            "{} \"{}\" \"{}\"",
            self.format_common(),
            self.referer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }

    fn format_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!(r#"{{"log_error":"{e}"}}"#))
    }

    /// Custom format with variable substitution
    ///
    /// Supported variables:
    /// - `$remote_addr` - Client IP address
    /// - `$time_local` - Local time in Common Log Format
    /// - `$time_iso8601` - ISO 8601 timestamp
    /// - `$request` - Full request line ("METHOD /path HTTP/version")
    /// - `$request_method` - HTTP method
    /// - `$request_uri` - Request URI with query string
    /// - `$tenant_id` - Tenant header value, or `-`
    /// - `$status` - Response status code
    /// - `$body_bytes_sent` - Response body size
    /// - `$http_referer` - Referer header
    /// - `$http_user_agent` - User-Agent header
    /// - `$request_time` - Request processing time in seconds (3 decimal places)
    fn format_custom(&self, pattern: &str) -> String {
        let request_uri = self.request_uri();
        let request_line = format!("{} {} HTTP/{}", self.method, request_uri, self.http_version);
        #[allow(clippy::cast_precision_loss)]
        let request_time = self.request_time_us as f64 / 1_000_000.0;

        // Longer variables first: $request_time and $request_method before $request
        pattern
            .replace("$remote_addr", &self.remote_addr)
            .replace("$time_local", &self.time_local())
            .replace("$time_iso8601", &self.time.to_rfc3339())
            .replace("$request_time", &format!("{request_time:.3}"))
            .replace("$request_method", &self.method)
            .replace("$request_uri", &request_uri)
            .replace("$request", &request_line)
            .replace("$tenant_id", self.tenant_id.as_deref().unwrap_or("-"))
            .replace("$status", &self.status.to_string())
            .replace("$body_bytes_sent", &self.body_bytes.to_string())
            .replace("$http_referer", self.referer.as_deref().unwrap_or("-"))
            .replace("$http_user_agent", self.user_agent.as_deref().unwrap_or("-"))
    }
}
