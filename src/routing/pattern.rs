//! Route pattern compilation module
//!
//! Turns a declared `{pattern, file}` entry into a matchable rule:
//! - Static: no `:` and no `*`, exact string equality
//! - Dynamic: `:name` segments, anchored at both ends
//! - Wildcard: `*` without `:`, anchored at the start only

use crate::config::RouteEntry;
use crate::error::{RouterError, RouterResult};
use regex::Regex;

/// Kind of a compiled route, decides matching precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Static,
    Dynamic,
    Wildcard,
}

/// A route entry compiled into a matcher
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    entry: RouteEntry,
    kind: RouteKind,
    matcher: Option<Regex>,
    param_names: Vec<String>,
}

impl CompiledRoute {
    /// Compile a declared route entry
    pub fn compile(entry: RouteEntry) -> RouterResult<Self> {
        let kind = classify(&entry.pattern);
        let (matcher, param_names) = match kind {
            RouteKind::Static => (None, Vec::new()),
            RouteKind::Dynamic => {
                let (source, names) = dynamic_regex(&entry.pattern);
                (Some(build_regex(&entry.pattern, &source)?), names)
            }
            RouteKind::Wildcard => {
                let source = wildcard_regex(&entry.pattern);
                (Some(build_regex(&entry.pattern, &source)?), Vec::new())
            }
        };

        Ok(Self {
            entry,
            kind,
            matcher,
            param_names,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.entry.pattern
    }

    pub fn file(&self) -> &str {
        &self.entry.file
    }

    pub const fn kind(&self) -> RouteKind {
        self.kind
    }

    pub const fn entry(&self) -> &RouteEntry {
        &self.entry
    }

    /// Parameter names in left-to-right order
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    pub const fn matcher(&self) -> Option<&Regex> {
        self.matcher.as_ref()
    }
}

/// Normalize a request path: one leading slash, no trailing slash, `/` for empty
///
/// # Examples
/// ```
/// use html_router::routing::normalize_path;
/// assert_eq!(normalize_path("//users/42/"), "/users/42");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_start_matches('/').trim_end_matches('/');
    format!("/{trimmed}")
}

fn classify(pattern: &str) -> RouteKind {
    if pattern.contains(':') {
        RouteKind::Dynamic
    } else if pattern.contains('*') {
        RouteKind::Wildcard
    } else {
        RouteKind::Static
    }
}

fn build_regex(pattern: &str, source: &str) -> RouterResult<Regex> {
    Regex::new(source).map_err(|source| RouterError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Build `^...$` for a dynamic pattern and collect its parameter names.
///
/// `*` compiles to a non-capturing group here so capture indexes line up
/// with `param_names`.
fn dynamic_regex(pattern: &str) -> (String, Vec<String>) {
    let mut source = String::from("^");
    let mut names = Vec::new();
    let mut chars = pattern.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        match c {
            ':' => {
                let mut end = start + 1;
                while let Some(&(idx, next)) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        end = idx + next.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                if end == start + 1 {
                    // bare ':' with no name is literal text
                    source.push(':');
                } else {
                    names.push(pattern[start + 1..end].to_string());
                    source.push_str("([^/]+)");
                }
            }
            '*' => source.push_str("(?:.*)"),
            other => source.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }

    source.push('$');
    (source, names)
}

/// Build a start-anchored regex for a wildcard pattern
fn wildcard_regex(pattern: &str) -> String {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("(.*)");
    format!("^{body}")
}
