mod builtin;
mod compile;
mod error;
mod eval;
mod expr;
mod ops;
mod parser;
mod value;

/// Builtin function table.
pub use builtin::Builtin;
/// Compiler configuration and runnable queries.
pub use compile::{Compiler, EnvironLoader, Query};
/// Error types for parsing, compiling, and evaluation.
pub use error::{CompileError, EvalError, ParseError, QueryError};
/// Lazy output stream of an evaluated query.
pub use eval::Outputs;
/// Query syntax tree.
pub use expr::{BinaryOp, Expr, ObjectEntry, ObjectKey};
/// Value ordering used by comparisons and sorting.
pub use ops::compare_values;
/// Query text parser.
pub use parser::parse;
/// Document values.
pub use value::{Map, Value};
