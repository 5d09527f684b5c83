use thiserror::Error;

use crate::jq::Value;

/// Malformed query text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
	/// What the parser expected or rejected.
	pub message: String,
	/// Byte offset into the query text.
	pub position: usize,
}

impl ParseError {
	pub(crate) fn new(message: impl Into<String>, position: usize) -> Self {
		Self {
			message: message.into(),
			position,
		}
	}
}

/// Rejected compiler configuration or unresolved names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
	/// Declared variable names must be `$` followed by an identifier.
	#[error("invalid variable name: {name}")]
	InvalidVariableName {
		/// Name as declared.
		name: String,
	},
	/// Query references a variable that was never declared.
	#[error("variable not defined: ${name}")]
	UndefinedVariable {
		/// Variable name without the `$`.
		name: String,
	},
}

/// Either stage of turning text into a runnable query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
	/// Syntax error.
	#[error(transparent)]
	Parse(#[from] ParseError),
	/// Name resolution or configuration error.
	#[error(transparent)]
	Compile(#[from] CompileError),
}

/// Runtime fault produced as an element of the output stream.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
	/// Indexing a value with a key of the wrong shape.
	#[error("cannot index {target} with {key}")]
	CannotIndex {
		/// Type name of the indexed value.
		target: &'static str,
		/// Rendering of the key.
		key: String,
	},
	/// `.[]` on a scalar.
	#[error("cannot iterate over {value}")]
	CannotIterate {
		/// Described offending value.
		value: String,
	},
	/// Operator applied to incompatible operands.
	#[error("{left} and {right} cannot be {verb}")]
	Operator {
		/// Described left operand.
		left: String,
		/// Described right operand.
		right: String,
		/// Past participle of the operation, e.g. `added`.
		verb: &'static str,
	},
	/// `/` or `%` with a zero divisor.
	#[error("{left} and {right} cannot be divided because the divisor is zero")]
	DivisionByZero {
		/// Described dividend.
		left: String,
		/// Described divisor.
		right: String,
	},
	/// Builtin called on an input or argument of the wrong type.
	#[error("{function} cannot be applied to {value}")]
	InvalidInput {
		/// Builtin name.
		function: &'static str,
		/// Described offending value.
		value: String,
	},
	/// Unary minus on a non-number.
	#[error("{value} cannot be negated")]
	CannotNegate {
		/// Described offending value.
		value: String,
	},
	/// String repetition whose result would exceed the size limit.
	#[error("{text} and {count} cannot be multiplied: repeat string result too long")]
	RepeatTooLong {
		/// Described string operand.
		text: String,
		/// Described count operand.
		count: String,
	},
	/// Object constructor key that is not a string.
	#[error("object keys must be strings, got {value}")]
	InvalidObjectKey {
		/// Described offending key.
		value: String,
	},
	/// Text that does not parse as a number or JSON.
	#[error("cannot parse {text:?} as {target}")]
	Unparsable {
		/// Offending text.
		text: String,
		/// `number` or `JSON`.
		target: &'static str,
	},
	/// Value raised by `error`.
	#[error("{}", raised_message(.0))]
	Raised(Value),
	/// Declared variable without a bound value.
	#[error("variable defined but not bound: ${name}")]
	VariableNotBound {
		/// Variable name without the `$`.
		name: String,
	},
	/// More bound values than declared variables.
	#[error("too many variable values provided")]
	TooManyVariableValues,
	/// Variable lookup failed at runtime.
	#[error("variable not defined: ${name}")]
	UndefinedVariable {
		/// Variable name without the `$`.
		name: String,
	},
}

impl EvalError {
	/// Value handed to a `catch` handler.
	pub fn into_value(self) -> Value {
		match self {
			Self::Raised(value) => value,
			other => Value::String(other.to_string()),
		}
	}
}

fn raised_message(value: &Value) -> String {
	match value {
		Value::String(message) => message.clone(),
		other => format!("{} (not a string)", other.to_json()),
	}
}
