//! jq-style queries over JSON-like documents.

/// Value model, query parser, compiler, and lazy evaluator.
pub mod jq;
