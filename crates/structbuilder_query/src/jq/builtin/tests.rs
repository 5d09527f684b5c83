use serde_json::json;

use crate::jq::{Builtin, Compiler, Value};

fn run(query: &str, input: serde_json::Value) -> Vec<Result<serde_json::Value, String>> {
	let query = Compiler::new().compile_text(query).expect("query compiles");
	query
		.run(Value::from(input))
		.map(|result| result.map(|value| serde_json::Value::from(&value)).map_err(|err| err.to_string()))
		.collect()
}

fn one(query: &str, input: serde_json::Value) -> serde_json::Value {
	let mut outputs = run(query, input);
	assert_eq!(outputs.len(), 1, "{query} should produce exactly one output: {outputs:?}");
	outputs.remove(0).expect("query succeeds")
}

fn error(query: &str, input: serde_json::Value) -> String {
	run(query, input).into_iter().find_map(Result::err).expect("query fails")
}

#[test]
fn resolves_names_and_arities() {
	assert_eq!(Builtin::resolve("map", 1), Some(Builtin::Map));
	assert_eq!(Builtin::resolve("map", 0), None);
	assert_eq!(Builtin::resolve("first", 0), Some(Builtin::First));
	assert_eq!(Builtin::resolve("first", 1), Some(Builtin::FirstOf));
	assert_eq!(Builtin::MapValues.name(), "map_values");
	assert_eq!(Builtin::Limit.arity(), 2);
}

#[test]
fn length_by_type() {
	assert_eq!(one(r#"[.[] | length]"#, json!([null, -5, "héllo", [1, 2], {"a": 1}])), json!([0, 5, 5, 2, 1]));
	assert_eq!(one("utf8bytelength", json!("héllo")), json!(6));
	assert_eq!(error("length", json!(true)), "length cannot be applied to boolean (true)");
}

#[test]
fn keys_and_membership() {
	assert_eq!(one("keys", json!({"b": 1, "a": 2})), json!(["a", "b"]));
	assert_eq!(one("keys", json!([5, 6])), json!([0, 1]));
	assert_eq!(one(r#"has("a")"#, json!({"a": null})), json!(true));
	assert_eq!(one("has(3)", json!([1])), json!(false));
	assert_eq!(one(r#""x" | in({"x": 1})"#, json!(null)), json!(true));
}

#[test]
fn map_select_and_map_values() {
	assert_eq!(one("map(select(. > 1))", json!([1, 2, 3])), json!([2, 3]));
	assert_eq!(one("map_values(. * 10)", json!({"a": 1})), json!({"a": 10}));
	assert_eq!(one("map_values(empty)", json!([1, 2])), json!([]));
}

#[test]
fn folds() {
	assert_eq!(one("add", json!([1, 2, 3])), json!(6));
	assert_eq!(one("add", json!(["a", "b"])), json!("ab"));
	assert_eq!(one("add", json!([])), json!(null));
	assert_eq!(one("any", json!([true, false])), json!(true));
	assert_eq!(one("all", json!([true, false])), json!(false));
	assert_eq!(one("any(. > 2)", json!([1, 3])), json!(true));
	assert_eq!(one("all(. > 2)", json!([1, 3])), json!(false));
}

#[test]
fn ordering_builtins() {
	assert_eq!(one("min", json!([3, 1, 2])), json!(1));
	assert_eq!(one("max", json!([3, 1, 2])), json!(3));
	assert_eq!(one("min", json!([])), json!(null));
	assert_eq!(one("min_by(.x)", json!([{"x": 2}, {"x": 1}])), json!({"x": 1}));
	assert_eq!(one("max_by(.x)", json!([{"x": 2}, {"x": 1}])), json!({"x": 2}));
	assert_eq!(
		one("sort", json!([3, "a", null, true, [1], {"a": 1}, false])),
		json!([null, false, true, 3, "a", [1], {"a": 1}])
	);
	assert_eq!(
		one("sort_by(.n)", json!([{"n": 2, "i": 0}, {"n": 1, "i": 1}, {"n": 2, "i": 2}])),
		json!([{"n": 1, "i": 1}, {"n": 2, "i": 0}, {"n": 2, "i": 2}])
	);
	assert_eq!(one("unique", json!([1, 2, 1, 3])), json!([1, 2, 3]));
	assert_eq!(one("unique_by(length)", json!(["a", "bb", "c"])), json!(["a", "bb"]));
	assert_eq!(one("reverse", json!([1, 2])), json!([2, 1]));
	assert_eq!(one("reverse", json!("abc")), json!("cba"));
}

#[test]
fn first_last_and_limits() {
	assert_eq!(one("first", json!([1, 2, 3])), json!(1));
	assert_eq!(one("last", json!([1, 2, 3])), json!(3));
	assert_eq!(one("last", json!([])), json!(null));
	assert_eq!(one("first(.[])", json!([1, 2, 3])), json!(1));
	assert_eq!(one("last(.[])", json!([1, 2, 3])), json!(3));
	assert!(run("first(empty)", json!(null)).is_empty());
	assert_eq!(one("[limit(2; .[])]", json!([5, 6, 7])), json!([5, 6]));
	assert_eq!(one("[limit(0; .[])]", json!([5, 6, 7])), json!([]));
	assert_eq!(one("[range(3)]", json!(null)), json!([0, 1, 2]));
	assert_eq!(one("[range(2; 5)]", json!(null)), json!([2, 3, 4]));
	assert_eq!(one("isempty(empty)", json!(null)), json!(true));
	assert_eq!(one("isempty(.[])", json!([1])), json!(false));
}

#[test]
fn conversions() {
	assert_eq!(one("[.[] | type]", json!([null, true, 1, "s", [], {}])), json!(["null", "boolean", "number", "string", "array", "object"]));
	assert_eq!(one("[.[] | tostring]", json!([1, "a", [1]])), json!(["1", "a", "[1]"]));
	assert_eq!(one("tonumber", json!("1.5")), json!(1.5));
	assert_eq!(error("tonumber", json!("abc")), r#"cannot parse "abc" as number"#);
	assert_eq!(error("tonumber", json!("nan")), r#"cannot parse "nan" as number"#);
	assert_eq!(one("tojson", json!({"a": [1, 2]})), json!(r#"{"a":[1,2]}"#));
	assert_eq!(one("fromjson", json!("[1,2]")), json!([1, 2]));
}

#[test]
fn string_builtins() {
	assert_eq!(one("ascii_downcase", json!("AbC")), json!("abc"));
	assert_eq!(one("ascii_upcase", json!("AbC")), json!("ABC"));
	assert_eq!(one(r#"startswith("ab")"#, json!("abc")), json!(true));
	assert_eq!(one(r#"endswith("x")"#, json!("abc")), json!(false));
	assert_eq!(error("startswith(1)", json!("abc")), "startswith cannot be applied to number (1)");
	assert_eq!(one(r#"ltrimstr("ab")"#, json!("abc")), json!("c"));
	assert_eq!(one(r#"rtrimstr("bc")"#, json!("abc")), json!("a"));
	assert_eq!(one(r#"ltrimstr("ab")"#, json!(5)), json!(5));
	assert_eq!(one(r#"split(", ")"#, json!("a, b")), json!(["a", "b"]));
	assert_eq!(one(r#"join("-")"#, json!(["a", 1, null, true])), json!("a-1--true"));
}

#[test]
fn containment() {
	assert_eq!(one(r#"contains("bar")"#, json!("foobar")), json!(true));
	assert_eq!(one(r#"contains({"a": [1]})"#, json!({"a": [1, 2, 3], "b": "x"})), json!(true));
	assert_eq!(one("contains([3])", json!([1, 2])), json!(false));
	assert!(run(r#"contains("a")"#, json!(1))[0].is_err());
}

#[test]
fn entries() {
	assert_eq!(one("to_entries", json!({"a": 1})), json!([{"key": "a", "value": 1}]));
	assert_eq!(one("from_entries", json!([{"k": "a", "v": 1}, {"name": "b", "value": 2}])), json!({"a": 1, "b": 2}));
	assert_eq!(one("with_entries({key: .value, value: .key})", json!({"a": "x"})), json!({"x": "a"}));
}

#[test]
fn math() {
	assert_eq!(one("[.[] | floor]", json!([1.5, -1.5])), json!([1, -2]));
	assert_eq!(one("ceil", json!(1.5)), json!(2));
	assert_eq!(one("round", json!(1.5)), json!(2));
	assert_eq!(one("fabs", json!(-2.5)), json!(2.5));
	assert_eq!(one("sqrt", json!(9)), json!(3));
}

#[test]
fn type_filters() {
	assert_eq!(one("[.[] | numbers]", json!([1, "a", null])), json!([1]));
	assert_eq!(one("[.[] | values]", json!([1, "a", null])), json!([1, "a"]));
	assert_eq!(one("[.[] | scalars]", json!([1, [2], {"a": 3}])), json!([1]));
	assert_eq!(one("[.[] | iterables]", json!([1, [2]])), json!([[2]]));
}

#[test]
fn error_builtins() {
	assert_eq!(one("try error(null) catch .", json!(null)), json!(null));
	assert_eq!(one("try error catch .", json!("from input")), json!("from input"));
	assert!(run("empty", json!(1)).is_empty());
	assert_eq!(one("not", json!(null)), json!(true));
}
