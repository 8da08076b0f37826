//! HTTP layer module
//!
//! Response envelopes, default headers, and conversion into hyper responses.

pub mod response;

pub use response::{build_405_response, HeaderSet, ResponseBuilder, ResponseEnvelope};
