//! Serverless-style HTML router
//!
//! Maps request paths to static HTML files under a root directory and returns
//! a response envelope for every request, including error pages.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod reader;
pub mod routing;
pub mod server;

pub use config::{AppState, Config, RouteEntry};
pub use error::{PathRejection, RouterError, RouterResult};
pub use handler::handle_path;
pub use http::{HeaderSet, ResponseBuilder, ResponseEnvelope};
pub use reader::HtmlReader;
pub use routing::{RouteMatch, RouteTable};
