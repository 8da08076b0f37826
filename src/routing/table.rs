//! Route table module
//!
//! Holds the compiled rule set behind an atomic pointer. Matching works on a
//! snapshot; add/remove build a new table and swap it in.

use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::pattern::{normalize_path, CompiledRoute, RouteKind};
use crate::config::RouteEntry;
use crate::error::RouterResult;

/// Result of a successful match
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub route: Arc<CompiledRoute>,
    /// Values for `:name` segments, empty for static and wildcard routes
    pub params: HashMap<String, String>,
    /// Text captured by the first `*` of a wildcard route
    pub tail: Option<String>,
}

impl RouteMatch {
    fn plain(route: &Arc<CompiledRoute>) -> Self {
        Self {
            route: Arc::clone(route),
            params: HashMap::new(),
            tail: None,
        }
    }
}

/// Compiled routes in declaration order
#[derive(Debug, Default)]
struct CompiledTable {
    routes: Vec<Arc<CompiledRoute>>,
}

impl CompiledTable {
    fn compile(entries: &[RouteEntry]) -> RouterResult<Self> {
        let routes = entries
            .iter()
            .cloned()
            .map(|entry| CompiledRoute::compile(entry).map(Arc::new))
            .collect::<RouterResult<Vec<_>>>()?;
        Ok(Self { routes })
    }

    fn of_kind(&self, kind: RouteKind) -> impl Iterator<Item = &Arc<CompiledRoute>> {
        self.routes.iter().filter(move |r| r.kind() == kind)
    }

    /// Static exact match, then dynamic, then wildcard; first hit wins
    fn find(&self, path: &str) -> Option<RouteMatch> {
        if let Some(route) = self
            .of_kind(RouteKind::Static)
            .find(|r| r.pattern() == path)
        {
            return Some(RouteMatch::plain(route));
        }

        for route in self.of_kind(RouteKind::Dynamic) {
            let Some(caps) = route.matcher().and_then(|m| m.captures(path)) else {
                continue;
            };
            let params = route
                .param_names()
                .iter()
                .zip(caps.iter().skip(1))
                .filter_map(|(name, value)| Some((name.clone(), value?.as_str().to_string())))
                .collect();
            return Some(RouteMatch {
                route: Arc::clone(route),
                params,
                tail: None,
            });
        }

        for route in self.of_kind(RouteKind::Wildcard) {
            let Some(caps) = route.matcher().and_then(|m| m.captures(path)) else {
                continue;
            };
            let mut matched = RouteMatch::plain(route);
            matched.tail = caps.get(1).map(|m| m.as_str().to_string());
            return Some(matched);
        }

        None
    }
}

/// Process-wide route table
pub struct RouteTable {
    current: ArcSwap<CompiledTable>,
    // serializes add/remove so concurrent writers do not lose updates
    write_lock: Mutex<()>,
}

impl RouteTable {
    /// Compile the configured routes
    pub fn new(entries: &[RouteEntry]) -> RouterResult<Self> {
        Ok(Self {
            current: ArcSwap::from_pointee(CompiledTable::compile(entries)?),
            write_lock: Mutex::new(()),
        })
    }

    /// Resolve a request path; the path is normalized first
    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        let normalized = normalize_path(path);
        self.current.load().find(&normalized)
    }

    /// Append a route, compiling only the new rule
    pub fn add_route(&self, entry: RouteEntry) -> RouterResult<()> {
        let route = Arc::new(CompiledRoute::compile(entry)?);
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut routes = self.current.load().routes.clone();
        routes.push(route);
        self.current.store(Arc::new(CompiledTable { routes }));
        Ok(())
    }

    /// Remove every route with the given pattern and recompile the rest.
    /// Returns whether anything was removed.
    pub fn remove_route(&self, pattern: &str) -> RouterResult<bool> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let entries = self.routes();
        let remaining: Vec<RouteEntry> = entries
            .iter()
            .filter(|e| e.pattern != pattern)
            .cloned()
            .collect();
        if remaining.len() == entries.len() {
            return Ok(false);
        }

        self.current
            .store(Arc::new(CompiledTable::compile(&remaining)?));
        Ok(true)
    }

    /// Declared routes in order
    pub fn routes(&self) -> Vec<RouteEntry> {
        self.current
            .load()
            .routes
            .iter()
            .map(|r| r.entry().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.current.load().routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
