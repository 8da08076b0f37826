// Application state module
// Everything a request needs, built once at startup

use super::types::Config;
use crate::error::RouterResult;
use crate::handler::ErrorClassifier;
use crate::http::ResponseBuilder;
use crate::reader::HtmlReader;
use crate::routing::RouteTable;

/// Application state
pub struct AppState {
    pub config: Config,
    pub routes: RouteTable,
    pub reader: HtmlReader,
    pub responder: ResponseBuilder,
    pub classifier: ErrorClassifier,
}

impl AppState {
    /// Compile the route table and set up the reader and response builders
    pub fn new(config: &Config) -> RouterResult<Self> {
        Ok(Self {
            config: config.clone(),
            routes: RouteTable::new(&config.routes)?,
            reader: HtmlReader::new(&config.site.base_path)?,
            responder: ResponseBuilder::new(config.default_headers()),
            classifier: ErrorClassifier::new(config.site.production),
        })
    }
}
