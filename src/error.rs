//! Error types module
//!
//! Failure kinds produced by the route matcher and the file reader.
//! The classifier matches on these directly, so no message text is ever inspected.

use std::fmt;

/// Reason a file reference was refused by the reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRejection {
    /// The reference is an absolute path
    Absolute,
    /// The reference resolves outside the root directory
    Traversal,
}

impl fmt::Display for PathRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute => f.write_str("absolute file path is not allowed"),
            Self::Traversal => f.write_str("path traversal is not allowed"),
        }
    }
}

/// Router error types
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("Invalid file path: {0}")]
    InvalidPath(PathRejection),

    #[error("No route matches '{path}'")]
    NotFound { path: String },

    #[error("HTML file not found: {file}")]
    FileNotFound { file: String },

    #[error("Access forbidden")]
    Forbidden,

    #[error("Invalid route pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{0}")]
    Internal(String),
}

impl From<std::io::Error> for RouterError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl RouterError {
    /// Value sent in the `X-Error-Code` header
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidPath(_) => "INVALID_PATH",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::FileNotFound { .. } => "FILE_NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::InvalidPattern { .. } | Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Result type alias
pub type RouterResult<T> = Result<T, RouterError>;
