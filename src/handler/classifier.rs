//! Error classification module
//!
//! Maps a `RouterError` to status code, client message and diagnostic headers.
//! In production mode file names and error details are withheld.

use crate::error::RouterError;
use crate::http::{HeaderSet, ResponseBuilder, ResponseEnvelope};

const MSG_NOT_FOUND: &str = "Page not found";
const MSG_FORBIDDEN: &str = "Access forbidden";
const MSG_INVALID_PATH: &str = "Invalid request path";
const MSG_SERVER_ERROR: &str = "Internal server error, please try again later";

/// Stateless mapping from failure kind to error envelope
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorClassifier {
    production: bool,
}

impl ErrorClassifier {
    pub const fn new(production: bool) -> Self {
        Self { production }
    }

    pub const fn is_production(&self) -> bool {
        self.production
    }

    /// Build the error envelope for `err`
    pub fn classify(&self, err: &RouterError, responder: &ResponseBuilder) -> ResponseEnvelope {
        match err {
            RouterError::NotFound { .. } => self.not_found(responder),
            RouterError::FileNotFound { file } => self.file_not_found(file, responder),
            RouterError::InvalidPath(_) => self.invalid_path(responder),
            RouterError::Forbidden => self.forbidden(responder),
            RouterError::InvalidPattern { .. } | RouterError::Internal(_) => {
                self.server_error(&err.to_string(), responder)
            }
        }
    }

    /// 404 for a path with no matching route
    pub fn not_found(&self, responder: &ResponseBuilder) -> ResponseEnvelope {
        responder.error(404, MSG_NOT_FOUND, &code_header("NOT_FOUND"))
    }

    /// 404 for a matched route whose file is missing
    pub fn file_not_found(&self, file: &str, responder: &ResponseBuilder) -> ResponseEnvelope {
        if self.production {
            return responder.error(404, MSG_NOT_FOUND, &code_header("FILE_NOT_FOUND"));
        }
        let headers = code_header("FILE_NOT_FOUND").with("X-File-Path", &header_safe(file));
        responder.error(404, &format!("HTML file does not exist: {file}"), &headers)
    }

    /// 400 for absolute or traversal references
    pub fn invalid_path(&self, responder: &ResponseBuilder) -> ResponseEnvelope {
        responder.error(400, MSG_INVALID_PATH, &code_header("INVALID_PATH"))
    }

    /// 403, not raised by the request pipeline today
    pub fn forbidden(&self, responder: &ResponseBuilder) -> ResponseEnvelope {
        responder.error(403, MSG_FORBIDDEN, &code_header("FORBIDDEN"))
    }

    /// 500 with the detail only outside production
    pub fn server_error(&self, detail: &str, responder: &ResponseBuilder) -> ResponseEnvelope {
        if self.production {
            return responder.error(500, MSG_SERVER_ERROR, &code_header("INTERNAL_ERROR"));
        }
        let headers = code_header("INTERNAL_ERROR").with("X-Error-Detail", &header_safe(detail));
        responder.error(500, detail, &headers)
    }
}

fn code_header(code: &str) -> HeaderSet {
    HeaderSet::new()
        .with("X-Error-Code", code)
        .with("Cache-Control", crate::http::response::NO_CACHE)
}

/// Header values must be visible ASCII; anything else is replaced
fn header_safe(value: &str) -> String {
    value
        .chars()
        .map(|c| if c == ' ' || c.is_ascii_graphic() { c } else { '?' })
        .collect()
}
