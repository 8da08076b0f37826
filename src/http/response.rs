//! Response envelope module
//!
//! Builds the status/headers/body envelope returned for every request and
//! converts it into a hyper response for the dev server.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::collections::BTreeMap;

pub const DEFAULT_SERVER_NAME: &str = "Serverless HTML Router";
pub const DEFAULT_CACHE_CONTROL: &str = "public, max-age=3600";
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
pub const NO_CACHE: &str = "no-cache";

/// Header map with case-insensitive replacement
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet(BTreeMap<String, String>);

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults applied to every success response
    pub fn defaults(server_name: &str) -> Self {
        Self::new()
            .with("Content-Type", HTML_CONTENT_TYPE)
            .with("Cache-Control", DEFAULT_CACHE_CONTROL)
            .with("X-Powered-By", server_name)
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a header, replacing any existing one with the same name in any case
    pub fn insert(&mut self, name: &str, value: &str) {
        self.0.retain(|k, _| !k.eq_ignore_ascii_case(name));
        self.0.insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Overlay `other` on top of `self`; `other` wins on conflict
    pub fn merge(&mut self, other: &Self) {
        for (name, value) in other.iter() {
            self.insert(name, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Status, headers and body for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub headers: HeaderSet,
    pub body: String,
    pub is_binary: bool,
}

impl ResponseEnvelope {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Convert into a hyper response; HEAD requests get an empty body
    pub fn into_response(self, is_head: bool) -> Response<Full<Bytes>> {
        let content_length = self.body.len();
        let mut builder = Response::builder().status(self.status_code);
        for (name, value) in self.headers.iter() {
            builder = builder.header(name, value);
        }

        let body = if is_head {
            Bytes::new()
        } else {
            Bytes::from(self.body)
        };

        builder
            .header("Content-Length", content_length)
            .body(Full::new(body))
            .unwrap_or_else(|e| {
                log_build_error(self.status_code, &e);
                let mut fallback = Response::new(Full::new(Bytes::from("Internal Server Error")));
                *fallback.status_mut() = hyper::StatusCode::INTERNAL_SERVER_ERROR;
                fallback
            })
    }
}

/// Builds response envelopes from a fixed set of default headers
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    default_headers: HeaderSet,
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self::new(HeaderSet::defaults(DEFAULT_SERVER_NAME))
    }
}

impl ResponseBuilder {
    pub const fn new(default_headers: HeaderSet) -> Self {
        Self { default_headers }
    }

    pub const fn default_headers(&self) -> &HeaderSet {
        &self.default_headers
    }

    /// Merge `headers` into the defaults used by later `success` calls
    pub fn set_default_headers(&mut self, headers: &HeaderSet) {
        self.default_headers.merge(headers);
    }

    /// Success response; `headers` override the defaults
    pub fn success(
        &self,
        body: impl Into<String>,
        headers: &HeaderSet,
        status_code: u16,
    ) -> ResponseEnvelope {
        let mut merged = self.default_headers.clone();
        merged.merge(headers);
        ResponseEnvelope {
            status_code,
            headers: merged,
            body: body.into(),
            is_binary: false,
        }
    }

    /// 200 with default headers only
    pub fn ok(&self, body: impl Into<String>) -> ResponseEnvelope {
        self.success(body, &HeaderSet::new(), 200)
    }

    /// Redirect with caching disabled and an empty body
    pub fn redirect(&self, location: &str, status_code: u16) -> ResponseEnvelope {
        ResponseEnvelope {
            status_code,
            headers: HeaderSet::new()
                .with("Location", location)
                .with("Cache-Control", NO_CACHE),
            body: String::new(),
            is_binary: false,
        }
    }

    /// 302 redirect
    pub fn found(&self, location: &str) -> ResponseEnvelope {
        self.redirect(location, 302)
    }

    /// HTML error page with caching disabled; `headers` are applied last
    pub fn error(&self, status_code: u16, message: &str, headers: &HeaderSet) -> ResponseEnvelope {
        let mut merged = self.default_headers.clone();
        merged.insert("Cache-Control", NO_CACHE);
        merged.merge(headers);
        ResponseEnvelope {
            status_code,
            headers: merged,
            body: render_error_page(status_code, message),
            is_binary: false,
        }
    }
}

fn render_error_page(status_code: u16, message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Error {status_code}</title>
    <style>
        body {{ font-family: Arial, sans-serif; text-align: center; margin-top: 100px; color: #333; }}
        h1 {{ font-size: 48px; color: #e74c3c; margin-bottom: 20px; }}
        p {{ font-size: 18px; margin-bottom: 30px; }}
    </style>
</head>
<body>
    <h1>{status_code}</h1>
    <p>{}</p>
</body>
</html>
"#,
        escape_html(message)
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD")
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error(405, &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

fn log_build_error(status: u16, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_success_uses_defaults() {
        let resp = ResponseBuilder::default().ok("<p>hi</p>");
        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.header("Content-Type"), Some(HTML_CONTENT_TYPE));
        assert_eq!(resp.header("cache-control"), Some(DEFAULT_CACHE_CONTROL));
        assert_eq!(resp.header("X-Powered-By"), Some(DEFAULT_SERVER_NAME));
        assert_eq!(resp.body, "<p>hi</p>");
        assert!(!resp.is_binary);
    }

    #[test]
    fn test_caller_headers_win() {
        let extra = HeaderSet::new()
            .with("cache-control", "no-store")
            .with("X-Route", "/about");
        let resp = ResponseBuilder::default().success("body", &extra, 201);
        assert_eq!(resp.status_code, 201);
        assert_eq!(resp.header("Cache-Control"), Some("no-store"));
        assert_eq!(resp.header("X-Route"), Some("/about"));
        // replaced, not duplicated
        assert_eq!(resp.headers.len(), 4);
    }

    #[test]
    fn test_redirect() {
        let resp = ResponseBuilder::default().found("/new-home");
        assert_eq!(resp.status_code, 302);
        assert_eq!(resp.header("Location"), Some("/new-home"));
        assert_eq!(resp.header("Cache-Control"), Some(NO_CACHE));
        assert!(resp.body.is_empty());

        let resp = ResponseBuilder::default().redirect("/moved", 301);
        assert_eq!(resp.status_code, 301);
    }

    #[test]
    fn test_error_page() {
        let extra = HeaderSet::new().with("X-Error-Code", "NOT_FOUND");
        let resp = ResponseBuilder::default().error(404, "Page not found", &extra);
        assert_eq!(resp.status_code, 404);
        assert_eq!(resp.header("Cache-Control"), Some(NO_CACHE));
        assert_eq!(resp.header("X-Error-Code"), Some("NOT_FOUND"));
        assert_eq!(resp.header("Content-Type"), Some(HTML_CONTENT_TYPE));
        assert!(resp.body.contains("<h1>404</h1>"));
        assert!(resp.body.contains("Page not found"));
    }

    #[test]
    fn test_error_message_is_escaped() {
        let resp = ResponseBuilder::default().error(500, "<script>x</script>", &HeaderSet::new());
        assert!(!resp.body.contains("<script>"));
        assert!(resp.body.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_set_default_headers_affects_later_success() {
        let mut builder = ResponseBuilder::default();
        builder.set_default_headers(&HeaderSet::new().with("X-Powered-By", "Custom"));
        assert_eq!(builder.default_headers().get("X-Powered-By"), Some("Custom"));
        assert_eq!(builder.ok("x").header("X-Powered-By"), Some("Custom"));
        // untouched defaults stay
        assert_eq!(builder.ok("x").header("Content-Type"), Some(HTML_CONTENT_TYPE));
    }

    #[tokio::test]
    async fn test_into_response() {
        let resp = ResponseBuilder::default().ok("hello").into_response(false);
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-length"], "5");
        assert_eq!(resp.headers()["content-type"], HTML_CONTENT_TYPE);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"hello");
    }

    #[tokio::test]
    async fn test_into_response_head_has_empty_body() {
        let resp = ResponseBuilder::default().ok("hello").into_response(true);
        assert_eq!(resp.headers()["content-length"], "5");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }
}
