use crate::jq::{Compiler, Value};

/// Runtime limits and query configuration for [`Filler`](crate::fill::Filler).
#[derive(Debug, Clone)]
pub struct FillOptions {
	/// Maximum map-of-record nesting depth.
	pub max_depth: u32,
	/// Compiler used for every field query.
	pub compiler: Compiler,
	/// Values bound positionally to the compiler's declared variables.
	pub values: Vec<Value>,
}

impl Default for FillOptions {
	fn default() -> Self {
		Self {
			max_depth: 32,
			compiler: Compiler::default(),
			values: Vec::new(),
		}
	}
}

impl FillOptions {
	/// Declare `$name` variables and bind them for every field query.
	pub fn with_variables<S: Into<String>>(mut self, bindings: impl IntoIterator<Item = (S, Value)>) -> Self {
		let (names, values): (Vec<String>, Vec<Value>) = bindings.into_iter().map(|(name, value)| (name.into(), value)).unzip();
		self.compiler = self.compiler.with_variables(names);
		self.values = values;
		self
	}
}
