use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Object payload keyed by string.
pub type Map = BTreeMap<String, Value>;

/// Largest magnitude an `f64` holds without losing integer precision.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Document value shared by queries, their inputs, and their outputs.
///
/// All numbers share one `f64` value space. Arrays and objects are reference
/// counted so fanning one document out to many queries does not copy it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
	/// Explicit null.
	#[default]
	Null,
	/// Boolean scalar.
	Bool(bool),
	/// Number scalar.
	Number(f64),
	/// UTF-8 string.
	String(String),
	/// Ordered sequence.
	Array(Rc<Vec<Value>>),
	/// String-keyed mapping.
	Object(Rc<Map>),
}

impl Value {
	/// Wrap a vector as an array value.
	pub fn array(items: Vec<Value>) -> Self {
		Self::Array(Rc::new(items))
	}

	/// Wrap a map as an object value.
	pub fn object(map: Map) -> Self {
		Self::Object(Rc::new(map))
	}

	/// jq type name: `null`, `boolean`, `number`, `string`, `array`, or `object`.
	pub fn type_name(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool(_) => "boolean",
			Self::Number(_) => "number",
			Self::String(_) => "string",
			Self::Array(_) => "array",
			Self::Object(_) => "object",
		}
	}

	/// Everything except `null` and `false` is truthy.
	pub fn is_truthy(&self) -> bool {
		!matches!(self, Self::Null | Self::Bool(false))
	}

	/// Borrow the string payload.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(value) => Some(value),
			_ => None,
		}
	}

	/// Copy out the number payload.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::Number(value) => Some(*value),
			_ => None,
		}
	}

	/// Borrow the object payload.
	pub fn as_object(&self) -> Option<&Map> {
		match self {
			Self::Object(map) => Some(map),
			_ => None,
		}
	}

	/// Render as compact JSON text.
	pub fn to_json(&self) -> String {
		serde_json::to_string(self).unwrap_or_else(|_| "null".to_owned())
	}

	/// `type (json)` rendering used in runtime error messages; long values are elided.
	pub fn describe(&self) -> String {
		const MAX_LEN: usize = 40;
		let json = self.to_json();
		if json.chars().count() <= MAX_LEN {
			return format!("{} ({json})", self.type_name());
		}
		let head: String = json.chars().take(MAX_LEN).collect();
		format!("{} ({head}...)", self.type_name())
	}
}

/// Whether a number serializes as a JSON integer.
pub(crate) fn is_exact_integer(value: f64) -> bool {
	value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_json())
	}
}

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Self::Null => serializer.serialize_unit(),
			Self::Bool(value) => serializer.serialize_bool(*value),
			Self::Number(value) if is_exact_integer(*value) => serializer.serialize_i64(*value as i64),
			Self::Number(value) => serializer.serialize_f64(*value),
			Self::String(value) => serializer.serialize_str(value),
			Self::Array(items) => {
				let mut seq = serializer.serialize_seq(Some(items.len()))?;
				for item in items.iter() {
					seq.serialize_element(item)?;
				}
				seq.end()
			}
			Self::Object(map) => {
				let mut out = serializer.serialize_map(Some(map.len()))?;
				for (key, value) in map.iter() {
					out.serialize_entry(key, value)?;
				}
				out.end()
			}
		}
	}
}

impl<'de> Deserialize<'de> for Value {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		serde_json::Value::deserialize(deserializer).map(Value::from)
	}
}

impl From<serde_json::Value> for Value {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => Self::Null,
			serde_json::Value::Bool(value) => Self::Bool(value),
			serde_json::Value::Number(number) => Self::Number(number.as_f64().unwrap_or(f64::NAN)),
			serde_json::Value::String(value) => Self::String(value),
			serde_json::Value::Array(items) => Self::array(items.into_iter().map(Value::from).collect()),
			serde_json::Value::Object(map) => Self::object(map.into_iter().map(|(key, value)| (key, Value::from(value))).collect()),
		}
	}
}

impl From<&Value> for serde_json::Value {
	fn from(value: &Value) -> Self {
		match value {
			Value::Null => Self::Null,
			Value::Bool(value) => Self::Bool(*value),
			Value::Number(value) if is_exact_integer(*value) => Self::from(*value as i64),
			Value::Number(value) => serde_json::Number::from_f64(*value).map(Self::Number).unwrap_or(Self::Null),
			Value::String(value) => Self::String(value.clone()),
			Value::Array(items) => Self::Array(items.iter().map(serde_json::Value::from).collect()),
			Value::Object(map) => Self::Object(map.iter().map(|(key, value)| (key.clone(), serde_json::Value::from(value))).collect()),
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::Number(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::Number(value as f64)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(value.to_owned())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<Vec<Value>> for Value {
	fn from(items: Vec<Value>) -> Self {
		Self::array(items)
	}
}

impl From<Map> for Value {
	fn from(map: Map) -> Self {
		Self::object(map)
	}
}

#[cfg(test)]
mod tests;
