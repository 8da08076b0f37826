//! Routing module
//!
//! Compiles declared route patterns and resolves request paths:
//! - Static patterns matched by exact path
//! - Dynamic patterns with `:name` segments
//! - Wildcard patterns with a `*` remainder

mod pattern;
mod table;

pub use pattern::{normalize_path, CompiledRoute, RouteKind};
pub use table::{RouteMatch, RouteTable};
