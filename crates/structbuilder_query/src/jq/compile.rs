use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::jq::eval::{Env, Outputs, eval, single, stop_after_error};
use crate::jq::{CompileError, EvalError, Expr, Map, QueryError, Value, parse};

/// Supplies `KEY=VALUE` entries for `$ENV` and `env`.
pub type EnvironLoader = Rc<dyn Fn() -> Vec<String>>;

/// Turns parsed expressions into runnable queries under a fixed configuration.
#[derive(Clone, Default)]
pub struct Compiler {
	variables: Vec<String>,
	environ: Option<EnvironLoader>,
}

impl fmt::Debug for Compiler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Compiler")
			.field("variables", &self.variables)
			.field("environ", &self.environ.as_ref().map(|_| "<loader>"))
			.finish()
	}
}

impl Compiler {
	/// Compiler with no declared variables and an empty environment.
	pub fn new() -> Self {
		Self::default()
	}

	/// Declare variables, each written with its leading `$`. Values are bound positionally by [`Query::run_with`].
	pub fn with_variables<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.variables = names.into_iter().map(Into::into).collect();
		self
	}

	/// Install the loader behind `$ENV` and `env`.
	pub fn with_environ(mut self, loader: impl Fn() -> Vec<String> + 'static) -> Self {
		self.environ = Some(Rc::new(loader));
		self
	}

	/// Validate declarations and variable references, then capture the environment.
	pub fn compile(&self, expr: &Expr) -> Result<Query, CompileError> {
		let mut names = Vec::with_capacity(self.variables.len());
		for declared in &self.variables {
			let name = declared
				.strip_prefix('$')
				.filter(|name| is_identifier(name))
				.ok_or_else(|| CompileError::InvalidVariableName { name: declared.clone() })?;
			names.push(name.to_owned());
		}

		let mut undefined = None;
		expr.for_each_variable(&mut |name| {
			if undefined.is_none() && name != "ENV" && !names.iter().any(|known| known == name) {
				undefined = Some(name.to_owned());
			}
		});
		if let Some(name) = undefined {
			return Err(CompileError::UndefinedVariable { name });
		}

		Ok(Query {
			expr: expr.clone(),
			variables: names,
			environ: self.load_environ(),
		})
	}

	/// Parse then compile.
	pub fn compile_text(&self, text: &str) -> Result<Query, QueryError> {
		let expr = parse(text)?;
		Ok(self.compile(&expr)?)
	}

	fn load_environ(&self) -> Value {
		let mut map = Map::new();
		if let Some(loader) = &self.environ {
			for entry in loader() {
				if let Some((key, value)) = entry.split_once('=') {
					map.insert(key.to_owned(), Value::from(value));
				}
			}
		}
		Value::object(map)
	}
}

fn is_identifier(name: &str) -> bool {
	let mut chars = name.chars();
	chars.next().is_some_and(|ch| ch.is_ascii_alphabetic() || ch == '_') && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

/// Compiled query, runnable any number of times.
#[derive(Debug, Clone)]
pub struct Query {
	expr: Expr,
	variables: Vec<String>,
	environ: Value,
}

impl Query {
	/// Evaluate against `input`. Faults arrive as stream elements; the stream ends after the first one.
	pub fn run(&self, input: Value) -> Outputs<'_> {
		self.run_with(input, Vec::new())
	}

	/// Evaluate with declared variables bound positionally to `values`.
	pub fn run_with(&self, input: Value, values: Vec<Value>) -> Outputs<'_> {
		if values.len() > self.variables.len() {
			return single(Err(EvalError::TooManyVariableValues));
		}
		if let Some(unbound) = self.variables.get(values.len()) {
			return single(Err(EvalError::VariableNotBound { name: unbound.clone() }));
		}

		let vars: BTreeMap<String, Value> = self.variables.iter().cloned().zip(values).collect();
		let env = Rc::new(Env::new(vars, self.environ.clone()));
		stop_after_error(eval(&self.expr, &env, input))
	}
}
