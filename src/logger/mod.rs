//! Logger module
//!
//! Provides logging utilities for the router including:
//! - Server lifecycle logging
//! - Route table and match logging
//! - Access logging with multiple formats
//! - Error and warning logging
//!
//! Before `init` runs (tests, library use) lines go straight to stdout/stderr.

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::Level;

use crate::config::{Config, RouteEntry};
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        Level::parse(&config.logging.level),
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

fn write_debug(message: &str) {
    if let Some(w) = writer::get() {
        w.write_debug(message);
    }
}

fn write_warning(message: &str) {
    match writer::get() {
        Some(w) => w.write_warning(message),
        None => eprintln!("{message}"),
    }
}

fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("HTML router dev server started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Log level: {}", config.logging.level));
    write_info(&format!("Site root: {}", config.site.base_path));
    write_info(&format!(
        "Mode: {}",
        if config.site.production { "production" } else { "development" }
    ));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

/// List the routes the server will answer
pub fn log_route_table(addr: &SocketAddr, routes: &[RouteEntry]) {
    write_info("[Routes] Available routes:");
    for route in routes {
        write_info(&format!("  http://{addr}{} -> {}", route.pattern, route.file));
    }
}

pub fn log_request_path(path: &str) {
    write_debug(&format!("[Request] Received request for path: {path}"));
}

pub fn log_route_matched(pattern: &str, file: &str) {
    write_debug(&format!("[Route] Matched route: {pattern} -> {file}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_info(message: &str) {
    write_info(&format!("[INFO] {message}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_warning(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}
