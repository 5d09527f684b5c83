use std::cmp::Ordering;
use std::iter;
use std::rc::Rc;

use crate::jq::eval::{Env, Outputs, each, eval, many, map_each, nothing, single};
use crate::jq::ops::{self, compare_values};
use crate::jq::{EvalError, Expr, Map, Value};

/// Builtin functions known to the parser, keyed by name and arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Builtin {
	Empty,
	Error,
	ErrorWith,
	Not,
	Length,
	Utf8ByteLength,
	Keys,
	KeysUnsorted,
	Values,
	Has,
	In,
	Select,
	Map,
	MapValues,
	Add,
	Any,
	All,
	AnyBy,
	AllBy,
	Min,
	Max,
	MinBy,
	MaxBy,
	Sort,
	SortBy,
	Unique,
	UniqueBy,
	Reverse,
	First,
	Last,
	FirstOf,
	LastOf,
	Limit,
	Range,
	RangeFrom,
	IsEmpty,
	Type,
	ToString,
	ToNumber,
	ToJson,
	FromJson,
	AsciiDowncase,
	AsciiUpcase,
	StartsWith,
	EndsWith,
	LtrimStr,
	RtrimStr,
	Split,
	Join,
	Contains,
	ToEntries,
	FromEntries,
	WithEntries,
	Floor,
	Ceil,
	Round,
	Fabs,
	Sqrt,
	Env,
	Recurse,
	Arrays,
	Objects,
	Iterables,
	Scalars,
	Strings,
	Numbers,
	Booleans,
	Nulls,
}

const TABLE: &[(&str, usize, Builtin)] = &[
	("empty", 0, Builtin::Empty),
	("error", 0, Builtin::Error),
	("error", 1, Builtin::ErrorWith),
	("not", 0, Builtin::Not),
	("length", 0, Builtin::Length),
	("utf8bytelength", 0, Builtin::Utf8ByteLength),
	("keys", 0, Builtin::Keys),
	("keys_unsorted", 0, Builtin::KeysUnsorted),
	("values", 0, Builtin::Values),
	("has", 1, Builtin::Has),
	("in", 1, Builtin::In),
	("select", 1, Builtin::Select),
	("map", 1, Builtin::Map),
	("map_values", 1, Builtin::MapValues),
	("add", 0, Builtin::Add),
	("any", 0, Builtin::Any),
	("all", 0, Builtin::All),
	("any", 1, Builtin::AnyBy),
	("all", 1, Builtin::AllBy),
	("min", 0, Builtin::Min),
	("max", 0, Builtin::Max),
	("min_by", 1, Builtin::MinBy),
	("max_by", 1, Builtin::MaxBy),
	("sort", 0, Builtin::Sort),
	("sort_by", 1, Builtin::SortBy),
	("unique", 0, Builtin::Unique),
	("unique_by", 1, Builtin::UniqueBy),
	("reverse", 0, Builtin::Reverse),
	("first", 0, Builtin::First),
	("last", 0, Builtin::Last),
	("first", 1, Builtin::FirstOf),
	("last", 1, Builtin::LastOf),
	("limit", 2, Builtin::Limit),
	("range", 1, Builtin::Range),
	("range", 2, Builtin::RangeFrom),
	("isempty", 1, Builtin::IsEmpty),
	("type", 0, Builtin::Type),
	("tostring", 0, Builtin::ToString),
	("tonumber", 0, Builtin::ToNumber),
	("tojson", 0, Builtin::ToJson),
	("fromjson", 0, Builtin::FromJson),
	("ascii_downcase", 0, Builtin::AsciiDowncase),
	("ascii_upcase", 0, Builtin::AsciiUpcase),
	("startswith", 1, Builtin::StartsWith),
	("endswith", 1, Builtin::EndsWith),
	("ltrimstr", 1, Builtin::LtrimStr),
	("rtrimstr", 1, Builtin::RtrimStr),
	("split", 1, Builtin::Split),
	("join", 1, Builtin::Join),
	("contains", 1, Builtin::Contains),
	("to_entries", 0, Builtin::ToEntries),
	("from_entries", 0, Builtin::FromEntries),
	("with_entries", 1, Builtin::WithEntries),
	("floor", 0, Builtin::Floor),
	("ceil", 0, Builtin::Ceil),
	("round", 0, Builtin::Round),
	("fabs", 0, Builtin::Fabs),
	("sqrt", 0, Builtin::Sqrt),
	("env", 0, Builtin::Env),
	("recurse", 0, Builtin::Recurse),
	("arrays", 0, Builtin::Arrays),
	("objects", 0, Builtin::Objects),
	("iterables", 0, Builtin::Iterables),
	("scalars", 0, Builtin::Scalars),
	("strings", 0, Builtin::Strings),
	("numbers", 0, Builtin::Numbers),
	("booleans", 0, Builtin::Booleans),
	("nulls", 0, Builtin::Nulls),
];

impl Builtin {
	/// Look up a builtin by call-site name and argument count.
	pub fn resolve(name: &str, arity: usize) -> Option<Self> {
		TABLE
			.iter()
			.find(|(candidate, candidate_arity, _)| *candidate == name && *candidate_arity == arity)
			.map(|(_, _, builtin)| *builtin)
	}

	/// Name as written in query text.
	pub fn name(self) -> &'static str {
		TABLE.iter().find(|(_, _, builtin)| *builtin == self).map_or("builtin", |(name, _, _)| name)
	}

	/// Number of filter arguments.
	pub fn arity(self) -> usize {
		TABLE.iter().find(|(_, _, builtin)| *builtin == self).map_or(0, |(_, arity, _)| *arity)
	}
}

fn invalid(builtin: Builtin, value: &Value) -> EvalError {
	EvalError::InvalidInput {
		function: builtin.name(),
		value: value.describe(),
	}
}

fn number(value: f64) -> Value {
	Value::Number(value)
}

/// Run `builtin` with unevaluated filter arguments. Arity was checked when the query was parsed.
pub(crate) fn call<'a>(builtin: Builtin, args: &'a [Expr], env: &Rc<Env>, input: Value) -> Outputs<'a> {
	match builtin {
		Builtin::Empty => nothing(),
		Builtin::Error => single(Err(EvalError::Raised(input))),
		Builtin::ErrorWith => each(eval(&args[0], env, input), |message| single(Err(EvalError::Raised(message)))),
		Builtin::Select => Box::new(eval(&args[0], env, input.clone()).filter_map(move |result| match result {
			Ok(cond) if cond.is_truthy() => Some(Ok(input.clone())),
			Ok(_) => None,
			Err(err) => Some(Err(err)),
		})),
		Builtin::FirstOf => Box::new(eval(&args[0], env, input).take(1)),
		Builtin::LastOf => {
			let mut last = None;
			for result in eval(&args[0], env, input) {
				match result {
					Ok(value) => last = Some(value),
					Err(err) => return single(Err(err)),
				}
			}
			last.map_or_else(nothing, |value| single(Ok(value)))
		}
		Builtin::Limit => {
			let counts = eval(&args[0], env, input.clone());
			let env = Rc::clone(env);
			let body = &args[1];
			each(counts, move |count| match count {
				Value::Number(count) if count > 0.0 => Box::new(eval(body, &env, input.clone()).take(count as usize)),
				Value::Number(_) => nothing(),
				other => single(Err(invalid(builtin, &other))),
			})
		}
		Builtin::Range => each(eval(&args[0], env, input), move |upto| match upto {
			Value::Number(upto) => Box::new((0u64..).map(|at| at as f64).take_while(move |at| *at < upto).map(|at| Ok(number(at)))),
			other => single(Err(invalid(builtin, &other))),
		}),
		Builtin::RangeFrom => {
			let uptos = eval(&args[1], env, input.clone());
			let env = Rc::clone(env);
			let from = &args[0];
			each(uptos, move |upto| {
				each(eval(from, &env, input.clone()), move |start| match (&start, &upto) {
					(Value::Number(start), Value::Number(upto)) => {
						let upto = *upto;
						Box::new(
							iter::successors(Some(*start), |at| Some(at + 1.0))
								.take_while(move |at| *at < upto)
								.map(|at| Ok(number(at))),
						)
					}
					(Value::Number(_), other) | (other, _) => single(Err(invalid(builtin, other))),
				})
			})
		}
		Builtin::IsEmpty => match eval(&args[0], env, input).next() {
			None => single(Ok(Value::Bool(true))),
			Some(Ok(_)) => single(Ok(Value::Bool(false))),
			Some(Err(err)) => single(Err(err)),
		},
		Builtin::Recurse => {
			let mut out = Vec::new();
			ops::recurse(&input, &mut out);
			many(out)
		}
		Builtin::Env => single(Ok(env.environ().clone())),
		Builtin::Values => filter_type(input, |value| !matches!(value, Value::Null)),
		Builtin::Arrays => filter_type(input, |value| matches!(value, Value::Array(_))),
		Builtin::Objects => filter_type(input, |value| matches!(value, Value::Object(_))),
		Builtin::Iterables => filter_type(input, |value| matches!(value, Value::Array(_) | Value::Object(_))),
		Builtin::Scalars => filter_type(input, |value| !matches!(value, Value::Array(_) | Value::Object(_))),
		Builtin::Strings => filter_type(input, |value| matches!(value, Value::String(_))),
		Builtin::Numbers => filter_type(input, |value| matches!(value, Value::Number(_))),
		Builtin::Booleans => filter_type(input, |value| matches!(value, Value::Bool(_))),
		Builtin::Nulls => filter_type(input, |value| matches!(value, Value::Null)),
		Builtin::Has
		| Builtin::In
		| Builtin::StartsWith
		| Builtin::EndsWith
		| Builtin::LtrimStr
		| Builtin::RtrimStr
		| Builtin::Split
		| Builtin::Join
		| Builtin::Contains => map_each(eval(&args[0], env, input.clone()), move |arg| with_argument(builtin, &input, arg)),
		Builtin::Map
		| Builtin::MapValues
		| Builtin::AnyBy
		| Builtin::AllBy
		| Builtin::MinBy
		| Builtin::MaxBy
		| Builtin::SortBy
		| Builtin::UniqueBy
		| Builtin::WithEntries => single(with_filter(builtin, &args[0], env, input)),
		_ => single(unary(builtin, input)),
	}
}

fn filter_type<'a>(input: Value, keep: fn(&Value) -> bool) -> Outputs<'a> {
	if keep(&input) { single(Ok(input)) } else { nothing() }
}

/// Builtins taking no arguments and producing exactly one result.
fn unary(builtin: Builtin, input: Value) -> Result<Value, EvalError> {
	match (builtin, &input) {
		(Builtin::Not, _) => Ok(Value::Bool(!input.is_truthy())),
		(Builtin::Length, Value::Null) => Ok(number(0.0)),
		(Builtin::Length, Value::Number(value)) => Ok(number(value.abs())),
		(Builtin::Length, Value::String(text)) => Ok(number(text.chars().count() as f64)),
		(Builtin::Length, Value::Array(items)) => Ok(number(items.len() as f64)),
		(Builtin::Length, Value::Object(map)) => Ok(number(map.len() as f64)),
		(Builtin::Utf8ByteLength, Value::String(text)) => Ok(number(text.len() as f64)),
		(Builtin::Keys | Builtin::KeysUnsorted, Value::Object(map)) => Ok(Value::array(map.keys().map(|key| Value::from(key.as_str())).collect())),
		(Builtin::Keys | Builtin::KeysUnsorted, Value::Array(items)) => Ok(Value::array((0..items.len()).map(|at| number(at as f64)).collect())),
		(Builtin::Add, Value::Null) => Ok(Value::Null),
		(Builtin::Add, Value::Array(_) | Value::Object(_)) => ops::iterate(&input)?.into_iter().try_fold(Value::Null, ops::add),
		(Builtin::Any, Value::Array(items)) => Ok(Value::Bool(items.iter().any(Value::is_truthy))),
		(Builtin::All, Value::Array(items)) => Ok(Value::Bool(items.iter().all(Value::is_truthy))),
		(Builtin::Min, Value::Array(items)) => Ok(items.iter().min_by(|a, b| compare_values(a, b)).cloned().unwrap_or_default()),
		(Builtin::Max, Value::Array(items)) => Ok(items.iter().max_by(|a, b| compare_values(a, b)).cloned().unwrap_or_default()),
		(Builtin::Sort, Value::Array(items)) => {
			let mut sorted = items.to_vec();
			sorted.sort_by(compare_values);
			Ok(Value::array(sorted))
		}
		(Builtin::Unique, Value::Array(items)) => {
			let mut sorted = items.to_vec();
			sorted.sort_by(compare_values);
			sorted.dedup_by(|a, b| compare_values(a, b) == Ordering::Equal);
			Ok(Value::array(sorted))
		}
		(Builtin::Reverse, Value::Null) => Ok(Value::array(Vec::new())),
		(Builtin::Reverse, Value::Array(items)) => Ok(Value::array(items.iter().rev().cloned().collect())),
		(Builtin::Reverse, Value::String(text)) => Ok(Value::String(text.chars().rev().collect())),
		(Builtin::First, _) => ops::index(&input, &number(0.0)),
		(Builtin::Last, _) => ops::index(&input, &number(-1.0)),
		(Builtin::Type, _) => Ok(Value::from(input.type_name())),
		(Builtin::ToString, Value::String(_)) => Ok(input.clone()),
		(Builtin::ToString, _) => Ok(Value::String(input.to_json())),
		(Builtin::ToNumber, Value::Number(_)) => Ok(input.clone()),
		(Builtin::ToNumber, Value::String(text)) => parse_number(text),
		(Builtin::ToJson, _) => Ok(Value::String(input.to_json())),
		(Builtin::FromJson, Value::String(text)) => serde_json::from_str::<Value>(text).map_err(|_| EvalError::Unparsable {
			text: text.clone(),
			target: "JSON",
		}),
		(Builtin::AsciiDowncase, Value::String(text)) => Ok(Value::String(text.to_ascii_lowercase())),
		(Builtin::AsciiUpcase, Value::String(text)) => Ok(Value::String(text.to_ascii_uppercase())),
		(Builtin::ToEntries, Value::Object(map)) => Ok(to_entries(map)),
		(Builtin::FromEntries, Value::Array(items)) => from_entries(items),
		(Builtin::Floor, Value::Number(value)) => Ok(number(value.floor())),
		(Builtin::Ceil, Value::Number(value)) => Ok(number(value.ceil())),
		(Builtin::Round, Value::Number(value)) => Ok(number(value.round())),
		(Builtin::Fabs, Value::Number(value)) => Ok(number(value.abs())),
		(Builtin::Sqrt, Value::Number(value)) => Ok(number(value.sqrt())),
		_ => Err(invalid(builtin, &input)),
	}
}

fn parse_number(text: &str) -> Result<Value, EvalError> {
	let unparsable = || EvalError::Unparsable {
		text: text.to_owned(),
		target: "number",
	};
	let trimmed = text.trim();
	// Rust accepts "inf" and "NaN"; JSON numbers start with a digit or a sign
	if !trimmed.starts_with(|ch: char| ch.is_ascii_digit() || ch == '-' || ch == '.') {
		return Err(unparsable());
	}
	trimmed.parse::<f64>().map(number).map_err(|_| unparsable())
}

/// Builtins taking one value argument, evaluated once per argument output.
fn with_argument(builtin: Builtin, input: &Value, arg: Value) -> Result<Value, EvalError> {
	match (builtin, input, &arg) {
		(Builtin::Has, _, _) => has(builtin, input, &arg),
		(Builtin::In, _, _) => has(builtin, &arg, input),
		(Builtin::StartsWith, Value::String(text), Value::String(prefix)) => Ok(Value::Bool(text.starts_with(prefix.as_str()))),
		(Builtin::EndsWith, Value::String(text), Value::String(suffix)) => Ok(Value::Bool(text.ends_with(suffix.as_str()))),
		(Builtin::StartsWith | Builtin::EndsWith, Value::String(_), other) => Err(invalid(builtin, other)),
		(Builtin::LtrimStr, Value::String(text), Value::String(prefix)) => {
			Ok(text.strip_prefix(prefix.as_str()).map_or_else(|| input.clone(), Value::from))
		}
		(Builtin::RtrimStr, Value::String(text), Value::String(suffix)) => {
			Ok(text.strip_suffix(suffix.as_str()).map_or_else(|| input.clone(), Value::from))
		}
		(Builtin::LtrimStr | Builtin::RtrimStr, _, _) => Ok(input.clone()),
		(Builtin::Split, Value::String(text), Value::String(sep)) => Ok(ops::split_string(text, sep)),
		(Builtin::Split, Value::String(_), other) => Err(invalid(builtin, other)),
		(Builtin::Join, Value::Array(items), Value::String(sep)) => join(builtin, items, sep),
		(Builtin::Join, Value::Array(_), other) => Err(invalid(builtin, other)),
		(Builtin::Contains, _, _) => contains(input, &arg).map(Value::Bool),
		_ => Err(invalid(builtin, input)),
	}
}

fn has(builtin: Builtin, container: &Value, key: &Value) -> Result<Value, EvalError> {
	match (container, key) {
		(Value::Object(map), Value::String(key)) => Ok(Value::Bool(map.contains_key(key))),
		(Value::Array(items), Value::Number(at)) => Ok(Value::Bool(*at >= 0.0 && (*at as usize) < items.len())),
		_ => Err(invalid(builtin, container)),
	}
}

fn join(builtin: Builtin, items: &[Value], sep: &str) -> Result<Value, EvalError> {
	let mut out = String::new();
	for (at, item) in items.iter().enumerate() {
		if at > 0 {
			out.push_str(sep);
		}
		match item {
			Value::Null => {}
			Value::String(text) => out.push_str(text),
			Value::Number(_) | Value::Bool(_) => out.push_str(&item.to_json()),
			other => return Err(invalid(builtin, other)),
		}
	}
	Ok(Value::String(out))
}

/// Recursive containment: substrings, array subsets, and object subsets.
fn contains(haystack: &Value, needle: &Value) -> Result<bool, EvalError> {
	match (haystack, needle) {
		(Value::String(text), Value::String(part)) => Ok(text.contains(part.as_str())),
		(Value::Array(items), Value::Array(wanted)) => {
			for want in wanted.iter() {
				let mut found = false;
				for item in items.iter() {
					if contains(item, want)? {
						found = true;
						break;
					}
				}
				if !found {
					return Ok(false);
				}
			}
			Ok(true)
		}
		(Value::Object(map), Value::Object(wanted)) => {
			for (key, want) in wanted.iter() {
				match map.get(key) {
					Some(item) if contains(item, want)? => {}
					_ => return Ok(false),
				}
			}
			Ok(true)
		}
		(a, b) if a.type_name() == b.type_name() => Ok(a == b),
		(a, b) => Err(EvalError::Operator {
			left: a.describe(),
			right: b.describe(),
			verb: "checked containment",
		}),
	}
}

fn to_entries(map: &Map) -> Value {
	Value::array(
		map.iter()
			.map(|(key, value)| {
				let mut entry = Map::new();
				entry.insert("key".to_owned(), Value::from(key.as_str()));
				entry.insert("value".to_owned(), value.clone());
				Value::object(entry)
			})
			.collect(),
	)
}

fn from_entries(items: &[Value]) -> Result<Value, EvalError> {
	const KEY_NAMES: [&str; 4] = ["key", "k", "name", "Name"];
	const VALUE_NAMES: [&str; 3] = ["value", "v", "Value"];

	let mut out = Map::new();
	for item in items {
		let Value::Object(entry) = item else {
			return Err(invalid(Builtin::FromEntries, item));
		};
		let key = KEY_NAMES
			.iter()
			.find_map(|name| entry.get(*name).filter(|key| !matches!(key, Value::Null)))
			.cloned()
			.unwrap_or_default();
		let key = match key {
			Value::String(key) => key,
			Value::Number(_) | Value::Bool(_) => key.to_json(),
			other => return Err(invalid(Builtin::FromEntries, &other)),
		};
		let value = VALUE_NAMES.iter().find_map(|name| entry.get(*name)).cloned().unwrap_or_default();
		out.insert(key, value);
	}
	Ok(Value::object(out))
}

/// Builtins taking one filter argument and producing exactly one result.
fn with_filter(builtin: Builtin, filter: &Expr, env: &Rc<Env>, input: Value) -> Result<Value, EvalError> {
	let outputs = |value: Value| eval(filter, env, value).collect::<Result<Vec<_>, _>>();

	match (builtin, &input) {
		(Builtin::Map, Value::Array(_) | Value::Object(_)) => {
			let mut mapped = Vec::new();
			for item in ops::iterate(&input)? {
				mapped.extend(outputs(item)?);
			}
			Ok(Value::array(mapped))
		}
		(Builtin::MapValues, Value::Array(items)) => {
			let mut mapped = Vec::with_capacity(items.len());
			for item in items.iter() {
				if let Some(first) = eval(filter, env, item.clone()).next() {
					mapped.push(first?);
				}
			}
			Ok(Value::array(mapped))
		}
		(Builtin::MapValues, Value::Object(map)) => {
			let mut mapped = Map::new();
			for (key, item) in map.iter() {
				if let Some(first) = eval(filter, env, item.clone()).next() {
					mapped.insert(key.clone(), first?);
				}
			}
			Ok(Value::object(mapped))
		}
		(Builtin::AnyBy | Builtin::AllBy, Value::Array(_) | Value::Object(_)) => {
			let wanted = builtin == Builtin::AnyBy;
			for item in ops::iterate(&input)? {
				for result in eval(filter, env, item) {
					if result?.is_truthy() == wanted {
						return Ok(Value::Bool(wanted));
					}
				}
			}
			Ok(Value::Bool(!wanted))
		}
		(Builtin::MinBy | Builtin::MaxBy | Builtin::SortBy | Builtin::UniqueBy, Value::Array(items)) => {
			let mut keyed = Vec::with_capacity(items.len());
			for item in items.iter() {
				keyed.push((Value::array(outputs(item.clone())?), item.clone()));
			}
			let by_key = |a: &(Value, Value), b: &(Value, Value)| compare_values(&a.0, &b.0);
			match builtin {
				Builtin::MinBy => Ok(keyed.into_iter().min_by(by_key).map(|(_, item)| item).unwrap_or_default()),
				Builtin::MaxBy => Ok(keyed.into_iter().max_by(by_key).map(|(_, item)| item).unwrap_or_default()),
				_ => {
					keyed.sort_by(by_key);
					if builtin == Builtin::UniqueBy {
						keyed.dedup_by(|a, b| by_key(a, b) == Ordering::Equal);
					}
					Ok(Value::array(keyed.into_iter().map(|(_, item)| item).collect()))
				}
			}
		}
		(Builtin::WithEntries, Value::Object(map)) => {
			let entries = to_entries(map);
			let mut mapped = Vec::new();
			for entry in ops::iterate(&entries)? {
				mapped.extend(outputs(entry)?);
			}
			from_entries(&mapped)
		}
		_ => Err(invalid(builtin, &input)),
	}
}

#[cfg(test)]
mod tests;
