use serde_json::json;

use crate::jq::Value;

#[test]
fn converts_json_numbers_into_one_float_space() {
	let value = Value::from(json!({"int": 123, "float": 1.23, "neg": -7}));
	let map = value.as_object().expect("object converts");
	assert_eq!(map["int"], Value::Number(123.0));
	assert_eq!(map["float"], Value::Number(1.23));
	assert_eq!(map["neg"], Value::Number(-7.0));
}

#[test]
fn serializes_integral_numbers_as_integers() {
	assert_eq!(Value::Number(100.0).to_json(), "100");
	assert_eq!(Value::Number(1.5).to_json(), "1.5");
	assert_eq!(Value::Number(-0.25).to_json(), "-0.25");
	let large = Value::Number(1e300).to_json();
	assert_eq!(serde_json::from_str::<f64>(&large).expect("large number parses"), 1e300);
}

#[test]
fn json_round_trip_preserves_structure() {
	let source = json!({"a": [1, "two", null, true], "b": {"c": 2.5}});
	let value: Value = serde_json::from_value(source.clone()).expect("value deserializes");
	assert_eq!(serde_json::to_value(&value).expect("value serializes"), source);
	assert_eq!(serde_json::Value::from(&value), source);
}

#[test]
fn truthiness_follows_jq() {
	assert!(!Value::Null.is_truthy());
	assert!(!Value::Bool(false).is_truthy());
	assert!(Value::Number(0.0).is_truthy());
	assert!(Value::from("").is_truthy());
	assert!(Value::array(Vec::new()).is_truthy());
}

#[test]
fn describe_elides_long_values() {
	assert_eq!(Value::Number(1.0).describe(), "number (1)");
	let long = Value::from("x".repeat(100));
	let described = long.describe();
	assert!(described.starts_with("string (\"xxx"));
	assert!(described.ends_with("...)"));
}
