use std::collections::BTreeMap;
use std::iter;
use std::rc::Rc;

use crate::jq::builtin;
use crate::jq::ops;
use crate::jq::{EvalError, Expr, Map, ObjectEntry, ObjectKey, Value};

/// Pull-based stream of query outputs; each element is a value or a runtime fault.
pub type Outputs<'a> = Box<dyn Iterator<Item = Result<Value, EvalError>> + 'a>;

/// Variable bindings visible while one query runs.
#[derive(Debug, Default)]
pub(crate) struct Env {
	vars: BTreeMap<String, Value>,
	environ: Value,
}

impl Env {
	pub(crate) fn new(vars: BTreeMap<String, Value>, environ: Value) -> Self {
		Self { vars, environ }
	}

	pub(crate) fn lookup(&self, name: &str) -> Option<&Value> {
		match self.vars.get(name) {
			Some(value) => Some(value),
			None if name == "ENV" => Some(&self.environ),
			None => None,
		}
	}

	pub(crate) fn environ(&self) -> &Value {
		&self.environ
	}
}

pub(crate) fn single<'a>(result: Result<Value, EvalError>) -> Outputs<'a> {
	Box::new(iter::once(result))
}

pub(crate) fn nothing<'a>() -> Outputs<'a> {
	Box::new(iter::empty())
}

pub(crate) fn many<'a>(values: Vec<Value>) -> Outputs<'a> {
	Box::new(values.into_iter().map(Ok))
}

/// Feed every value into `f`, passing faults through untouched.
pub(crate) fn each<'a>(outputs: Outputs<'a>, mut f: impl FnMut(Value) -> Outputs<'a> + 'a) -> Outputs<'a> {
	Box::new(outputs.flat_map(move |result| match result {
		Ok(value) => f(value),
		Err(err) => single(Err(err)),
	}))
}

/// Map every value through a fallible function.
pub(crate) fn map_each<'a>(outputs: Outputs<'a>, mut f: impl FnMut(Value) -> Result<Value, EvalError> + 'a) -> Outputs<'a> {
	Box::new(outputs.map(move |result| result.and_then(&mut f)))
}

/// Yield values until the first fault, then switch to the stream built by `on_error`.
pub(crate) fn try_outputs<'a>(mut outputs: Outputs<'a>, mut on_error: impl FnMut(EvalError) -> Outputs<'a> + 'a) -> Outputs<'a> {
	let mut recovery: Option<Outputs<'a>> = None;
	Box::new(iter::from_fn(move || {
		if let Some(rest) = recovery.as_mut() {
			return rest.next();
		}
		match outputs.next()? {
			Ok(value) => Some(Ok(value)),
			Err(err) => {
				let mut rest = on_error(err);
				let next = rest.next();
				recovery = Some(rest);
				next
			}
		}
	}))
}

/// End the stream right after its first fault.
pub(crate) fn stop_after_error(mut outputs: Outputs<'_>) -> Outputs<'_> {
	let mut failed = false;
	Box::new(iter::from_fn(move || {
		if failed {
			return None;
		}
		let next = outputs.next()?;
		failed = next.is_err();
		Some(next)
	}))
}

/// Evaluate `expr` against `input`.
pub(crate) fn eval<'a>(expr: &'a Expr, env: &Rc<Env>, input: Value) -> Outputs<'a> {
	match expr {
		Expr::Identity => single(Ok(input)),
		Expr::Recurse => {
			let mut out = Vec::new();
			ops::recurse(&input, &mut out);
			many(out)
		}
		Expr::Literal(value) => single(Ok(value.clone())),
		Expr::Variable(name) => single(
			env.lookup(name)
				.cloned()
				.ok_or_else(|| EvalError::UndefinedVariable { name: name.clone() }),
		),
		Expr::Index { target, index } => {
			let targets = eval(target, env, input.clone());
			let env = Rc::clone(env);
			each(targets, move |value| map_each(eval(index, &env, input.clone()), move |key| ops::index(&value, &key)))
		}
		Expr::Slice { target, start, end } => {
			let targets = eval(target, env, input.clone());
			let env = Rc::clone(env);
			each(targets, move |value| {
				let ends = eval_bound(end.as_deref(), &env, input.clone());
				let env = Rc::clone(&env);
				let input = input.clone();
				each(ends, move |to| {
					let value = value.clone();
					map_each(eval_bound(start.as_deref(), &env, input.clone()), move |from| ops::slice(&value, &from, &to))
				})
			})
		}
		Expr::Iterate(target) => each(eval(target, env, input), |value| match ops::iterate(&value) {
			Ok(items) => many(items),
			Err(err) => single(Err(err)),
		}),
		Expr::Optional(inner) => try_outputs(eval(inner, env, input), |_| nothing()),
		Expr::Pipe(left, right) => {
			let lefts = eval(left, env, input);
			let env = Rc::clone(env);
			each(lefts, move |value| eval(right, &env, value))
		}
		Expr::Comma(left, right) => Box::new(eval(left, env, input.clone()).chain(eval(right, env, input))),
		Expr::Neg(inner) => map_each(eval(inner, env, input), |value| match value {
			Value::Number(number) => Ok(Value::Number(-number)),
			other => Err(EvalError::CannotNegate { value: other.describe() }),
		}),
		Expr::Binary { op, left, right } => {
			let op = *op;
			let rights = eval(right, env, input.clone());
			let env = Rc::clone(env);
			each(rights, move |rhs| map_each(eval(left, &env, input.clone()), move |lhs| ops::apply_binary(op, lhs, rhs.clone())))
		}
		Expr::And(left, right) => {
			let lefts = eval(left, env, input.clone());
			let env = Rc::clone(env);
			each(lefts, move |lhs| {
				if !lhs.is_truthy() {
					return single(Ok(Value::Bool(false)));
				}
				map_each(eval(right, &env, input.clone()), |rhs| Ok(Value::Bool(rhs.is_truthy())))
			})
		}
		Expr::Or(left, right) => {
			let lefts = eval(left, env, input.clone());
			let env = Rc::clone(env);
			each(lefts, move |lhs| {
				if lhs.is_truthy() {
					return single(Ok(Value::Bool(true)));
				}
				map_each(eval(right, &env, input.clone()), |rhs| Ok(Value::Bool(rhs.is_truthy())))
			})
		}
		Expr::Alternative(left, right) => {
			let mut kept = eval(left, env, input.clone()).filter_map(Result::ok).filter(Value::is_truthy).peekable();
			if kept.peek().is_none() {
				eval(right, env, input)
			} else {
				Box::new(kept.map(Ok))
			}
		}
		Expr::Array(None) => single(Ok(Value::array(Vec::new()))),
		Expr::Array(Some(inner)) => single(eval(inner, env, input).collect::<Result<Vec<_>, _>>().map(Value::array)),
		Expr::Object(entries) => match build_objects(entries, env, &input) {
			Ok(objects) => many(objects),
			Err(err) => single(Err(err)),
		},
		Expr::If {
			cond,
			then_branch,
			else_branch,
		} => {
			let conds = eval(cond, env, input.clone());
			let env = Rc::clone(env);
			each(conds, move |value| {
				if value.is_truthy() {
					return eval(then_branch, &env, input.clone());
				}
				match else_branch {
					Some(branch) => eval(branch, &env, input.clone()),
					None => single(Ok(input.clone())),
				}
			})
		}
		Expr::Try { body, catch } => {
			let outputs = eval(body, env, input);
			let env = Rc::clone(env);
			try_outputs(outputs, move |err| match catch {
				Some(handler) => eval(handler, &env, err.into_value()),
				None => nothing(),
			})
		}
		Expr::Call { builtin, args } => builtin::call(*builtin, args, env, input),
	}
}

fn eval_bound<'a>(bound: Option<&'a Expr>, env: &Rc<Env>, input: Value) -> Outputs<'a> {
	match bound {
		Some(expr) => eval(expr, env, input),
		None => single(Ok(Value::Null)),
	}
}

/// Object construction takes the cartesian product of every key and value output.
fn build_objects(entries: &[ObjectEntry], env: &Rc<Env>, input: &Value) -> Result<Vec<Value>, EvalError> {
	let mut partials = vec![Map::new()];

	for entry in entries {
		let keys: Vec<String> = match &entry.key {
			ObjectKey::Name(name) | ObjectKey::Variable(name) => vec![name.clone()],
			ObjectKey::Expr(expr) => eval(expr, env, input.clone())
				.map(|result| {
					result.and_then(|key| match key {
						Value::String(key) => Ok(key),
						other => Err(EvalError::InvalidObjectKey { value: other.describe() }),
					})
				})
				.collect::<Result<_, _>>()?,
		};

		let values: Vec<Value> = match (&entry.key, &entry.value) {
			(_, Some(expr)) => eval(expr, env, input.clone()).collect::<Result<_, _>>()?,
			(ObjectKey::Variable(name), None) => vec![
				env.lookup(name)
					.cloned()
					.ok_or_else(|| EvalError::UndefinedVariable { name: name.clone() })?,
			],
			(ObjectKey::Name(name), None) => vec![ops::index(input, &Value::String(name.clone()))?],
			(ObjectKey::Expr(_), None) => vec![Value::Null],
		};

		let mut next = Vec::with_capacity(partials.len() * keys.len() * values.len());
		for partial in &partials {
			for key in &keys {
				for value in &values {
					let mut map = partial.clone();
					map.insert(key.clone(), value.clone());
					next.push(map);
				}
			}
		}
		partials = next;
	}

	Ok(partials.into_iter().map(Value::object).collect())
}
