use serde_json::json;
use structbuilder::jq::Value;

use super::parse_vars;
use crate::error::CliError;

#[test]
fn vars_become_dollar_names_with_json_values() {
	let vars = parse_vars(&["n=3".to_owned(), "who=\"ada\"".to_owned(), "eq={\"a\":\"=\"}".to_owned()]).expect("vars parse");
	let names: Vec<&str> = vars.iter().map(|(name, _)| name.as_str()).collect();
	assert_eq!(names, ["$n", "$who", "$eq"]);
	assert_eq!(vars[0].1, Value::from(3i64));
	assert_eq!(vars[2].1, Value::from(json!({"a": "="})));
}

#[test]
fn vars_without_equals_are_rejected() {
	let err = parse_vars(&["n".to_owned()]).unwrap_err();
	assert!(matches!(err, CliError::VarSyntax { .. }));
	assert_eq!(err.to_string(), r#"--var "n": expected NAME=JSON"#);
}

#[test]
fn vars_with_bad_json_name_the_variable() {
	let err = parse_vars(&["n=bare".to_owned()]).unwrap_err();
	assert!(matches!(err, CliError::VarValue { ref name, .. } if name == "n"));
}
