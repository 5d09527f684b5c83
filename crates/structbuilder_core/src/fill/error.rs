use thiserror::Error;

use crate::fill::Kind;
use crate::jq::{EvalError, QueryError, Value};

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, FillError>;

/// Errors produced while filling a record. The first failing field aborts the fill.
#[derive(Debug, Error)]
pub enum FillError {
	/// Field query failed to parse or compile.
	#[error("field {field}: invalid query {query:?}: {source}")]
	QueryParse {
		/// Rust field name.
		field: &'static str,
		/// Query text as declared.
		query: &'static str,
		/// Parser or compiler error.
		source: QueryError,
	},
	/// First query output was a runtime fault.
	#[error("field {field}: query {query:?} failed: {source}")]
	QueryEvaluation {
		/// Rust field name.
		field: &'static str,
		/// Query text as declared.
		query: &'static str,
		/// Runtime fault.
		source: EvalError,
	},
	/// Query output does not fit the field's kind.
	#[error("field {field}: expected {expected}, got {}; current value {current}", render_got(.got))]
	TypeMismatch {
		/// Rust field name.
		field: &'static str,
		/// Kind the field accepts.
		expected: Kind,
		/// Rendering of the field's value before the write.
		current: String,
		/// First output, or `None` when the query produced nothing.
		got: Option<Value>,
	},
	/// Field kind has no converter.
	#[error("field {field}: cannot fill {kind} fields")]
	UnsupportedKind {
		/// Rust field name.
		field: &'static str,
		/// Declared kind.
		kind: Kind,
	},
	/// Failure while filling one entry of a map-of-record field.
	#[error("field {field}[{key:?}]: {source}")]
	InEntry {
		/// Rust field name of the map.
		field: &'static str,
		/// Map key of the failing entry.
		key: String,
		/// Error from the nested fill.
		source: Box<FillError>,
	},
	/// Map-of-record nesting went deeper than allowed.
	#[error("record nesting exceeds max depth {max_depth}")]
	DepthExceeded {
		/// Configured limit.
		max_depth: u32,
	},
}

fn render_got(got: &Option<Value>) -> String {
	match got {
		Some(value) => value.describe(),
		None => "no value".to_owned(),
	}
}

impl FillError {
	/// Innermost error, following `InEntry` wrappers.
	pub fn root(&self) -> &FillError {
		match self {
			Self::InEntry { source, .. } => source.root(),
			other => other,
		}
	}
}
