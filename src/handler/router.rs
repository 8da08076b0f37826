//! Request routing dispatch module
//!
//! `handle_path` is the whole pipeline: match the path, read the file, build the
//! envelope. `handle_request` adapts it to hyper for the dev server.

use crate::config::AppState;
use crate::error::RouterError;
use crate::http::{self, ResponseEnvelope};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Resolve a request path to a response envelope. Never fails.
pub async fn handle_path(path: &str, state: &AppState) -> ResponseEnvelope {
    logger::log_request_path(path);

    let Some(matched) = state.routes.match_path(path) else {
        let err = RouterError::NotFound {
            path: path.to_string(),
        };
        return state.classifier.classify(&err, &state.responder);
    };

    let route = &matched.route;
    logger::log_route_matched(route.pattern(), route.file());

    match state.reader.read(route.file()).await {
        Ok(html) => state.responder.ok(html),
        Err(err) => {
            if matches!(err, RouterError::Internal(_)) {
                logger::log_error(&format!("Error reading file {}: {err}", route.file()));
            } else {
                logger::log_warning(&format!("Route {} -> {}: {err}", route.pattern(), route.file()));
            }
            state.classifier.classify(&err, &state.responder)
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method();
    let is_head = *method == Method::HEAD;

    if !matches!(*method, Method::GET | Method::HEAD) {
        logger::log_warning(&format!("Method not allowed: {method}"));
        return Ok(http::build_405_response());
    }

    let envelope = handle_path(req.uri().path(), &state).await;

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            req.uri().path().to_string(),
        );
        entry.http_version = http_version(&req);
        entry.status = envelope.status_code;
        entry.body_bytes = if is_head { 0 } else { envelope.body.len() };
        entry.error_code = envelope.header("X-Error-Code").map(ToString::to_string);
        entry.user_agent = req
            .headers()
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(envelope.into_response(is_head))
}

fn http_version<B>(req: &Request<B>) -> String {
    match req.version() {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, LoggingConfig, RouteEntry, ServerConfig, SiteConfig};
    use http_body_util::BodyExt;
    use std::path::Path;
    use tempfile::TempDir;

    fn test_config(root: &Path, production: bool) -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                workers: None,
                connection_timeout: 30,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                access_log: false,
                access_log_format: "common".to_string(),
                access_log_file: None,
                error_log_file: None,
            },
            site: SiteConfig {
                base_path: root.to_string_lossy().into_owned(),
                production,
                server_name: "Test Router".to_string(),
                cache_control: "public, max-age=60".to_string(),
            },
            routes: vec![
                RouteEntry::new("/", "index.html"),
                RouteEntry::new("/users/:id", "user.html"),
                RouteEntry::new("/docs/*", "docs.html"),
                RouteEntry::new("/ghost", "ghost.html"),
                RouteEntry::new("/escape", "../outside.html"),
            ],
        }
    }

    fn site(production: bool) -> (TempDir, AppState) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("html");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("index.html"), "<h1>home</h1>").unwrap();
        std::fs::write(root.join("user.html"), "<h1>user</h1>").unwrap();
        std::fs::write(root.join("docs.html"), "<h1>docs</h1>").unwrap();
        std::fs::write(dir.path().join("outside.html"), "secret").unwrap();

        let state = AppState::new(&test_config(&root, production)).unwrap();
        (dir, state)
    }

    #[tokio::test]
    async fn test_serves_matched_files() {
        let (_dir, state) = site(false);

        let resp = handle_path("/", &state).await;
        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.body, "<h1>home</h1>");
        assert_eq!(resp.header("Content-Type"), Some("text/html; charset=utf-8"));
        assert_eq!(resp.header("Cache-Control"), Some("public, max-age=60"));
        assert_eq!(resp.header("X-Powered-By"), Some("Test Router"));

        assert_eq!(handle_path("/users/42", &state).await.body, "<h1>user</h1>");
        assert_eq!(handle_path("/docs/a/b", &state).await.body, "<h1>docs</h1>");
    }

    #[tokio::test]
    async fn test_unmatched_path_is_not_found() {
        let (_dir, state) = site(false);
        let resp = handle_path("/missing", &state).await;
        assert_eq!(resp.status_code, 404);
        assert_eq!(resp.header("X-Error-Code"), Some("NOT_FOUND"));
        assert_eq!(resp.header("Cache-Control"), Some("no-cache"));
    }

    #[tokio::test]
    async fn test_missing_file_outside_production() {
        let (_dir, state) = site(false);
        let resp = handle_path("/ghost", &state).await;
        assert_eq!(resp.status_code, 404);
        assert_eq!(resp.header("X-Error-Code"), Some("FILE_NOT_FOUND"));
        assert_eq!(resp.header("X-File-Path"), Some("ghost.html"));
        assert!(resp.body.contains("ghost.html"));
    }

    #[tokio::test]
    async fn test_missing_file_in_production() {
        let (_dir, state) = site(true);
        let resp = handle_path("/ghost", &state).await;
        assert_eq!(resp.status_code, 404);
        assert_eq!(resp.header("X-Error-Code"), Some("FILE_NOT_FOUND"));
        assert_eq!(resp.header("X-File-Path"), None);
        assert!(!resp.body.contains("ghost.html"));
    }

    #[tokio::test]
    async fn test_route_escaping_root_is_invalid_path() {
        let (_dir, state) = site(false);
        let resp = handle_path("/escape", &state).await;
        assert_eq!(resp.status_code, 400);
        assert_eq!(resp.header("X-Error-Code"), Some("INVALID_PATH"));
        assert!(!resp.body.contains("secret"));
    }

    #[tokio::test]
    async fn test_route_added_at_runtime_is_served() {
        let (dir, state) = site(false);
        std::fs::write(dir.path().join("html/about.html"), "<h1>about</h1>").unwrap();

        assert_eq!(handle_path("/about", &state).await.status_code, 404);
        state.routes.add_route(RouteEntry::new("/about", "about.html")).unwrap();
        assert_eq!(handle_path("/about", &state).await.body, "<h1>about</h1>");
    }

    #[tokio::test]
    async fn test_handle_request_get_and_head() {
        let (_dir, state) = site(false);
        let state = Arc::new(state);
        let peer: SocketAddr = "127.0.0.1:5555".parse().unwrap();

        let req = Request::get("/users/7").body(()).unwrap();
        let resp = handle_request(req, Arc::clone(&state), peer).await.unwrap();
        assert_eq!(resp.status(), 200);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"<h1>user</h1>");

        let req = Request::head("/users/7").body(()).unwrap();
        let resp = handle_request(req, Arc::clone(&state), peer).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-length"], "13");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_handle_request_rejects_other_methods() {
        let (_dir, state) = site(false);
        let peer: SocketAddr = "127.0.0.1:5555".parse().unwrap();
        let req = Request::post("/").body(()).unwrap();
        let resp = handle_request(req, Arc::new(state), peer).await.unwrap();
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers()["allow"], "GET, HEAD");
    }
}
