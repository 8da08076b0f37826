// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub site: SiteConfig,
    /// Route rules, matched static first, then dynamic, then wildcard
    #[serde(default = "default_routes")]
    pub routes: Vec<RouteEntry>,
}

/// Dev server configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    /// Per-connection timeout in seconds
    pub connection_timeout: u64,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// error, warn, info or debug
    pub level: String,
    pub access_log: bool,
    /// Access log format (common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Site configuration: where the HTML lives and how it is served
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SiteConfig {
    /// Root directory for route files
    pub base_path: String,
    /// Hide error details from clients
    pub production: bool,
    /// Sent as `X-Powered-By`
    pub server_name: String,
    /// `Cache-Control` for successful responses
    pub cache_control: String,
}

/// A declared `{pattern, file}` route rule
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub pattern: String,
    pub file: String,
}

impl RouteEntry {
    pub fn new(pattern: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            file: file.into(),
        }
    }
}

fn default_routes() -> Vec<RouteEntry> {
    vec![RouteEntry::new("/", "index.html")]
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "common".to_string()
}
