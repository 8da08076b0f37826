//! Request handler module
//!
//! Runs a request path through route matching and the HTML reader, and turns
//! failures into error pages.

pub mod classifier;
pub mod router;

pub use classifier::ErrorClassifier;
pub use router::{handle_path, handle_request};
