//! Logger module
//!
//! Provides logging utilities for the tenant server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::LogLevel;

use crate::config::Config;
use crate::registry::TenantRegistry;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup. Until then every line goes
/// straight to stdout/stderr.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        LogLevel::parse(&config.logging.level),
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(level: LogLevel, message: &str) {
    match writer::get() {
        Some(w) => w.write_error(level, message),
        None => eprintln!("{message}"),
    }
}

/// Write to access log specifically
fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, registry: &TenantRegistry) {
    write_info(&format!("Starting server on {addr}"));
    write_info("======================================");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("  - GET  http://{addr}/api/config  (header: tenant_id)"));
    write_info(&format!("  - GET  http://{addr}/api/test    (header: tenant_id)"));
    write_info(&format!(
        "Tenants loaded: {} config, {} test data ({})",
        registry.config_count(),
        registry.test_data_count(),
        config.tenants.file.as_deref().unwrap_or("built-in sample")
    ));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    if writer::get().is_some_and(|w| w.enabled(LogLevel::Debug)) {
        write_info(&format!("[Connection] Accepted from: {peer_addr}"));
    }
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(LogLevel::Error, &format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(LogLevel::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(LogLevel::Warn, &format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}

pub fn log_shutdown(signal: &str) {
    write_info(&format!("[Shutdown] {signal} received, no longer accepting connections"));
}

/// Fatal error: logged unconditionally before the process exits
pub fn log_fatal(err: &impl std::fmt::Display) {
    write_error(LogLevel::Error, &format!("[FATAL] {err}"));
}
