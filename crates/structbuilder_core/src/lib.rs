//! Populate statically declared records from JSON-like documents with jq-style queries.

/// Record declarations, kind converters, and the field walker.
pub mod fill;

/// Query engine used to evaluate field queries.
pub use structbuilder_query::jq;
