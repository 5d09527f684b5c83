use std::cmp::Ordering;

use serde_json::json;

use crate::jq::{BinaryOp, EvalError, Value, compare_values};

use super::{apply_binary, index, slice};

fn v(json: serde_json::Value) -> Value {
	Value::from(json)
}

#[test]
fn orders_values_across_types() {
	let ordered = [json!(null), json!(false), json!(true), json!(-1), json!(3), json!("a"), json!("b"), json!([1]), json!({"a": 1})];
	for pair in ordered.windows(2) {
		assert_eq!(compare_values(&v(pair[0].clone()), &v(pair[1].clone())), Ordering::Less, "{} < {}", pair[0], pair[1]);
	}
}

#[test]
fn compares_objects_by_keys_then_values() {
	assert_eq!(compare_values(&v(json!({"a": 2})), &v(json!({"b": 1}))), Ordering::Less);
	assert_eq!(compare_values(&v(json!({"a": 1})), &v(json!({"a": 2}))), Ordering::Less);
	assert_eq!(compare_values(&v(json!({"a": [1, 2]})), &v(json!({"a": [1, 2]}))), Ordering::Equal);
}

#[test]
fn adds_by_operand_type() {
	let sum = apply_binary(BinaryOp::Add, v(json!(1)), v(json!(2.5))).expect("numbers add");
	assert_eq!(sum, Value::Number(3.5));

	let text = apply_binary(BinaryOp::Add, v(json!("ab")), v(json!("cd"))).expect("strings add");
	assert_eq!(text, Value::from("abcd"));

	let merged = apply_binary(BinaryOp::Add, v(json!({"a": 1, "b": 1})), v(json!({"b": 2}))).expect("objects add");
	assert_eq!(merged, v(json!({"a": 1, "b": 2})));

	let kept = apply_binary(BinaryOp::Add, Value::Null, v(json!([1]))).expect("null is the additive identity");
	assert_eq!(kept, v(json!([1])));
}

#[test]
fn rejects_mismatched_addition() {
	let err = apply_binary(BinaryOp::Add, v(json!(1)), v(json!("a"))).expect_err("number plus string fails");
	assert_eq!(err.to_string(), "number (1) and string (\"a\") cannot be added");
}

#[test]
fn subtracts_array_elements() {
	let out = apply_binary(BinaryOp::Sub, v(json!([1, 2, 3, 2])), v(json!([2]))).expect("arrays subtract");
	assert_eq!(out, v(json!([1, 3])));
}

#[test]
fn division_by_zero_is_an_error() {
	let err = apply_binary(BinaryOp::Div, v(json!(1)), v(json!(0))).expect_err("zero divisor fails");
	assert!(matches!(err, EvalError::DivisionByZero { .. }));

	let err = apply_binary(BinaryOp::Mod, v(json!(5)), v(json!(0.5))).expect_err("modulo truncates the divisor to zero");
	assert!(matches!(err, EvalError::DivisionByZero { .. }));
}

#[test]
fn modulo_truncates_operands() {
	let out = apply_binary(BinaryOp::Mod, v(json!(7.9)), v(json!(2.1))).expect("modulo succeeds");
	assert_eq!(out, Value::Number(1.0));
}

#[test]
fn multiplies_objects_deeply() {
	let out = apply_binary(BinaryOp::Mul, v(json!({"a": {"b": 1, "c": 1}})), v(json!({"a": {"c": 2}}))).expect("objects merge");
	assert_eq!(out, v(json!({"a": {"b": 1, "c": 2}})));
}

#[test]
fn multiplying_a_string_repeats_it() {
	let out = apply_binary(BinaryOp::Mul, v(json!("ab")), v(json!(2.5))).expect("string repeats");
	assert_eq!(out, Value::from("ababab"));
	let none = apply_binary(BinaryOp::Mul, v(json!(0)), v(json!("ab"))).expect("zero count");
	assert_eq!(none, Value::Null);
	let nan = apply_binary(BinaryOp::Mul, v(json!("ab")), Value::Number(f64::NAN)).expect("nan count");
	assert_eq!(nan, Value::Null);
}

#[test]
fn oversized_repeats_fail_instead_of_allocating() {
	for count in [1e19, f64::INFINITY, 1e9] {
		let err = apply_binary(BinaryOp::Mul, v(json!("a")), Value::Number(count)).expect_err("repeat is too long");
		assert!(matches!(err, EvalError::RepeatTooLong { .. }), "{count}: {err}");
	}
}

#[test]
fn nan_is_never_equal() {
	let nan = || Value::Number(f64::NAN);
	assert_eq!(apply_binary(BinaryOp::Eq, nan(), nan()).expect("eq"), Value::Bool(false));
	assert_eq!(apply_binary(BinaryOp::Ne, nan(), nan()).expect("ne"), Value::Bool(true));
	assert_eq!(apply_binary(BinaryOp::Eq, Value::array(vec![nan()]), Value::array(vec![nan()])).expect("eq"), Value::Bool(false));
	assert_eq!(apply_binary(BinaryOp::Eq, v(json!({"a": [1]})), v(json!({"a": [1]}))).expect("eq"), Value::Bool(true));
	assert_eq!(compare_values(&nan(), &nan()), Ordering::Equal);
}

#[test]
fn indexes_arrays_from_either_end() {
	let items = v(json!([10, 20, 30]));
	assert_eq!(index(&items, &Value::Number(0.0)).expect("index"), Value::Number(10.0));
	assert_eq!(index(&items, &Value::Number(-1.0)).expect("index"), Value::Number(30.0));
	assert_eq!(index(&items, &Value::Number(5.0)).expect("index"), Value::Null);
	assert!(index(&items, &Value::from("a")).is_err());
	assert_eq!(index(&Value::Null, &Value::from("a")).expect("null indexes to null"), Value::Null);
}

#[test]
fn slices_arrays_and_strings() {
	let items = v(json!([1, 2, 3, 4]));
	assert_eq!(slice(&items, &Value::Number(1.0), &Value::Number(3.0)).expect("slice"), v(json!([2, 3])));
	assert_eq!(slice(&items, &Value::Number(-2.0), &Value::Null).expect("slice"), v(json!([3, 4])));
	assert_eq!(slice(&Value::from("hello"), &Value::Null, &Value::Number(2.0)).expect("slice"), Value::from("he"));
	assert_eq!(slice(&items, &Value::Number(3.0), &Value::Number(1.0)).expect("slice"), v(json!([])));
}
