// Configuration module entry point
// Loads layered configuration and builds the shared application state

mod state;
mod types;

use config::builder::DefaultState;
use config::ConfigBuilder;
use std::net::SocketAddr;

pub use state::AppState;
pub use types::{Config, LoggingConfig, RouteEntry, ServerConfig, SiteConfig};

use crate::http::response::{DEFAULT_CACHE_CONTROL, DEFAULT_SERVER_NAME};
use crate::http::HeaderSet;

/// Default config file when no path is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension),
    /// then apply `ROUTER__SECTION__KEY` environment overrides
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::builder_with_defaults()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("ROUTER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Builder preloaded with every default; sources added later override them
    pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.connection_timeout", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .set_default("site.base_path", "./html")?
            .set_default("site.production", false)?
            .set_default("site.server_name", DEFAULT_SERVER_NAME)?
            .set_default("site.cache_control", DEFAULT_CACHE_CONTROL)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Default headers for successful responses
    pub fn default_headers(&self) -> HeaderSet {
        HeaderSet::defaults(&self.site.server_name).with("Cache-Control", &self.site.cache_control)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn load_toml(source: &str) -> Config {
        Config::builder_with_defaults()
            .unwrap()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let cfg = load_toml("");
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.workers, None);
        assert_eq!(cfg.logging.access_log_format, "common");
        assert_eq!(cfg.site.base_path, "./html");
        assert!(!cfg.site.production);
        assert_eq!(cfg.routes, vec![RouteEntry::new("/", "index.html")]);
    }

    #[test]
    fn test_routes_keep_file_order() {
        let cfg = load_toml(
            r#"
            [site]
            base_path = "/srv/html"
            production = true

            [[routes]]
            pattern = "/"
            file = "index.html"

            [[routes]]
            pattern = "/users/:id"
            file = "user.html"

            [[routes]]
            pattern = "/docs/*"
            file = "docs.html"
            "#,
        );
        assert!(cfg.site.production);
        assert_eq!(cfg.site.base_path, "/srv/html");
        let patterns: Vec<&str> = cfg.routes.iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(patterns, ["/", "/users/:id", "/docs/*"]);
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = load_toml("[server]\nport = 3000");
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 3000);
        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }

    #[test]
    fn test_default_headers_from_site() {
        let cfg = load_toml("[site]\nserver_name = \"Edge\"\ncache_control = \"no-store\"");
        let headers = cfg.default_headers();
        assert_eq!(headers.get("X-Powered-By"), Some("Edge"));
        assert_eq!(headers.get("Cache-Control"), Some("no-store"));
        assert_eq!(headers.get("Content-Type"), Some("text/html; charset=utf-8"));
    }
}
