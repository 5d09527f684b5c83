use std::cmp::Ordering;

use crate::jq::{BinaryOp, EvalError, Map, Value};

/// Total order over values: null < false < true < numbers < strings < arrays < objects.
pub fn compare_values(left: &Value, right: &Value) -> Ordering {
	let rank = type_rank(left).cmp(&type_rank(right));
	if rank != Ordering::Equal {
		return rank;
	}

	match (left, right) {
		(Value::Number(a), Value::Number(b)) => compare_numbers(*a, *b),
		(Value::String(a), Value::String(b)) => a.cmp(b),
		(Value::Array(a), Value::Array(b)) => {
			for (x, y) in a.iter().zip(b.iter()) {
				let ord = compare_values(x, y);
				if ord != Ordering::Equal {
					return ord;
				}
			}
			a.len().cmp(&b.len())
		}
		(Value::Object(a), Value::Object(b)) => {
			let keys = a.keys().cmp(b.keys());
			if keys != Ordering::Equal {
				return keys;
			}
			for (x, y) in a.values().zip(b.values()) {
				let ord = compare_values(x, y);
				if ord != Ordering::Equal {
					return ord;
				}
			}
			Ordering::Equal
		}
		_ => Ordering::Equal,
	}
}

fn type_rank(value: &Value) -> u8 {
	match value {
		Value::Null => 0,
		Value::Bool(false) => 1,
		Value::Bool(true) => 2,
		Value::Number(_) => 3,
		Value::String(_) => 4,
		Value::Array(_) => 5,
		Value::Object(_) => 6,
	}
}

fn compare_numbers(a: f64, b: f64) -> Ordering {
	match a.partial_cmp(&b) {
		Some(ord) => ord,
		// nan sorts below every number
		None if a.is_nan() && b.is_nan() => Ordering::Equal,
		None if a.is_nan() => Ordering::Less,
		None => Ordering::Greater,
	}
}

/// `==` semantics: like [`compare_values`] except that nan never equals anything.
fn values_equal(left: &Value, right: &Value) -> bool {
	match (left, right) {
		(Value::Number(a), Value::Number(b)) => a == b,
		(Value::Array(a), Value::Array(b)) => a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| values_equal(x, y)),
		(Value::Object(a), Value::Object(b)) => a.len() == b.len() && a.iter().zip(b.iter()).all(|((ka, x), (kb, y))| ka == kb && values_equal(x, y)),
		_ => compare_values(left, right) == Ordering::Equal,
	}
}

/// Apply a binary operator to two already-evaluated operands.
pub(crate) fn apply_binary(op: BinaryOp, left: Value, right: Value) -> Result<Value, EvalError> {
	match op {
		BinaryOp::Add => add(left, right),
		BinaryOp::Sub => sub(left, right),
		BinaryOp::Mul => mul(left, right),
		BinaryOp::Div => div(left, right),
		BinaryOp::Mod => rem(left, right),
		BinaryOp::Eq => Ok(Value::Bool(values_equal(&left, &right))),
		BinaryOp::Ne => Ok(Value::Bool(!values_equal(&left, &right))),
		BinaryOp::Lt => Ok(Value::Bool(compare_values(&left, &right) == Ordering::Less)),
		BinaryOp::Le => Ok(Value::Bool(compare_values(&left, &right) != Ordering::Greater)),
		BinaryOp::Gt => Ok(Value::Bool(compare_values(&left, &right) == Ordering::Greater)),
		BinaryOp::Ge => Ok(Value::Bool(compare_values(&left, &right) != Ordering::Less)),
	}
}

pub(crate) fn add(left: Value, right: Value) -> Result<Value, EvalError> {
	match (left, right) {
		(Value::Null, other) | (other, Value::Null) => Ok(other),
		(Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
		(Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
		(Value::Array(a), Value::Array(b)) => {
			let mut items = Vec::with_capacity(a.len() + b.len());
			items.extend(a.iter().cloned());
			items.extend(b.iter().cloned());
			Ok(Value::array(items))
		}
		(Value::Object(a), Value::Object(b)) => {
			let mut map = (*a).clone();
			map.extend(b.iter().map(|(key, value)| (key.clone(), value.clone())));
			Ok(Value::object(map))
		}
		(a, b) => Err(operator_error(&a, &b, "added")),
	}
}

fn sub(left: Value, right: Value) -> Result<Value, EvalError> {
	match (left, right) {
		(Value::Number(a), Value::Number(b)) => Ok(Value::Number(a - b)),
		(Value::Array(a), Value::Array(b)) => {
			let items = a
				.iter()
				.filter(|item| !b.iter().any(|removed| compare_values(item, removed) == Ordering::Equal))
				.cloned()
				.collect();
			Ok(Value::array(items))
		}
		(a, b) => Err(operator_error(&a, &b, "subtracted")),
	}
}

fn mul(left: Value, right: Value) -> Result<Value, EvalError> {
	match (left, right) {
		(Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),
		(Value::String(text), Value::Number(count)) | (Value::Number(count), Value::String(text)) => repeat(&text, count),
		(Value::Object(a), Value::Object(b)) => Ok(Value::object(deep_merge(&a, &b))),
		(a, b) => Err(operator_error(&a, &b, "multiplied")),
	}
}

fn div(left: Value, right: Value) -> Result<Value, EvalError> {
	match (left, right) {
		(Value::Number(a), Value::Number(b)) => {
			if b == 0.0 {
				return Err(EvalError::DivisionByZero {
					left: Value::Number(a).describe(),
					right: Value::Number(b).describe(),
				});
			}
			Ok(Value::Number(a / b))
		}
		(Value::String(text), Value::String(sep)) => Ok(split_string(&text, &sep)),
		(a, b) => Err(operator_error(&a, &b, "divided")),
	}
}

fn rem(left: Value, right: Value) -> Result<Value, EvalError> {
	match (left, right) {
		(Value::Number(a), Value::Number(b)) => {
			let divisor = b as i64;
			if divisor == 0 {
				return Err(EvalError::DivisionByZero {
					left: Value::Number(a).describe(),
					right: Value::Number(b).describe(),
				});
			}
			Ok(Value::Number((a as i64).wrapping_rem(divisor) as f64))
		}
		(a, b) => Err(operator_error(&a, &b, "divided")),
	}
}

/// Longest string `*` may build, in bytes.
const MAX_REPEAT_LEN: usize = 1 << 28;

fn repeat(text: &str, count: f64) -> Result<Value, EvalError> {
	if count.is_nan() || count <= 0.0 {
		return Ok(Value::Null);
	}
	let times = count.ceil();
	let length = (times < usize::MAX as f64).then(|| text.len().checked_mul(times as usize)).flatten();
	match length {
		Some(length) if length <= MAX_REPEAT_LEN => Ok(Value::String(text.repeat(times as usize))),
		_ => Err(EvalError::RepeatTooLong {
			text: Value::from(text).describe(),
			count: Value::Number(count).describe(),
		}),
	}
}

fn deep_merge(a: &Map, b: &Map) -> Map {
	let mut out = a.clone();
	for (key, value) in b {
		let merged = match (out.get(key), value) {
			(Some(Value::Object(left)), Value::Object(right)) => Value::object(deep_merge(left, right)),
			_ => value.clone(),
		};
		out.insert(key.clone(), merged);
	}
	out
}

/// Split `text` on `sep`; an empty separator splits into characters.
pub(crate) fn split_string(text: &str, sep: &str) -> Value {
	if text.is_empty() {
		return Value::array(Vec::new());
	}
	let parts: Vec<Value> = if sep.is_empty() {
		text.chars().map(|ch| Value::String(ch.to_string())).collect()
	} else {
		text.split(sep).map(Value::from).collect()
	};
	Value::array(parts)
}

fn operator_error(left: &Value, right: &Value, verb: &'static str) -> EvalError {
	EvalError::Operator {
		left: left.describe(),
		right: right.describe(),
		verb,
	}
}

/// `target[key]`
pub(crate) fn index(target: &Value, key: &Value) -> Result<Value, EvalError> {
	match (target, key) {
		(Value::Object(map), Value::String(name)) => Ok(map.get(name).cloned().unwrap_or(Value::Null)),
		(Value::Array(items), Value::Number(position)) => Ok(resolve_position(items.len(), *position)
			.and_then(|at| items.get(at).cloned())
			.unwrap_or(Value::Null)),
		(Value::Null, Value::String(_) | Value::Number(_) | Value::Null) => Ok(Value::Null),
		(target, key) => Err(EvalError::CannotIndex {
			target: target.type_name(),
			key: key.to_json(),
		}),
	}
}

fn resolve_position(len: usize, position: f64) -> Option<usize> {
	let position = position.floor();
	let resolved = if position < 0.0 { len as f64 + position } else { position };
	if resolved < 0.0 || resolved >= len as f64 {
		return None;
	}
	Some(resolved as usize)
}

/// `target[start:end]` over arrays, strings (by character), and null.
pub(crate) fn slice(target: &Value, start: &Value, end: &Value) -> Result<Value, EvalError> {
	let len = match target {
		Value::Null => return Ok(Value::Null),
		Value::Array(items) => items.len(),
		Value::String(text) => text.chars().count(),
		other => {
			return Err(EvalError::CannotIndex {
				target: other.type_name(),
				key: "a slice".to_owned(),
			});
		}
	};

	let from = slice_bound(start, 0, len)?;
	let to = slice_bound(end, len, len)?.max(from);

	match target {
		Value::Array(items) => Ok(Value::array(items[from..to].to_vec())),
		Value::String(text) => Ok(Value::String(text.chars().skip(from).take(to - from).collect())),
		_ => Ok(Value::Null),
	}
}

fn slice_bound(bound: &Value, default: usize, len: usize) -> Result<usize, EvalError> {
	match bound {
		Value::Null => Ok(default),
		Value::Number(position) => {
			let position = position.floor();
			let resolved = if position < 0.0 { len as f64 + position } else { position };
			Ok(resolved.clamp(0.0, len as f64) as usize)
		}
		other => Err(EvalError::CannotIndex {
			target: "slice",
			key: other.to_json(),
		}),
	}
}

/// Elements of an array or values of an object.
pub(crate) fn iterate(value: &Value) -> Result<Vec<Value>, EvalError> {
	match value {
		Value::Array(items) => Ok(items.to_vec()),
		Value::Object(map) => Ok(map.values().cloned().collect()),
		other => Err(EvalError::CannotIterate { value: other.describe() }),
	}
}

/// Pre-order walk of a value and all of its descendants.
pub(crate) fn recurse(value: &Value, out: &mut Vec<Value>) {
	out.push(value.clone());
	match value {
		Value::Array(items) => {
			for item in items.iter() {
				recurse(item, out);
			}
		}
		Value::Object(map) => {
			for item in map.values() {
				recurse(item, out);
			}
		}
		_ => {}
	}
}

#[cfg(test)]
mod tests;
