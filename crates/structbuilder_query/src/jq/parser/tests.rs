use crate::jq::{BinaryOp, Builtin, Expr, ObjectEntry, ObjectKey, Value, parse};

fn lit(value: impl Into<Value>) -> Expr {
	Expr::Literal(value.into())
}

fn index(target: Expr, name: &str) -> Expr {
	Expr::Index {
		target: Box::new(target),
		index: Box::new(lit(name)),
	}
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
	Expr::Binary {
		op,
		left: Box::new(left),
		right: Box::new(right),
	}
}

#[test]
fn parses_paths() {
	assert_eq!(parse(".").unwrap(), Expr::Identity);
	assert_eq!(parse("..").unwrap(), Expr::Recurse);
	assert_eq!(parse(".id").unwrap(), Expr::field("id"));
	assert_eq!(parse(r#"."@id""#).unwrap(), Expr::field("@id"));
	assert_eq!(parse(".build_results.reimage").unwrap(), index(Expr::field("build_results"), "reimage"));
	assert_eq!(parse(".a.[0]").unwrap(), parse(".a[0]").unwrap());
}

#[test]
fn parses_brackets() {
	assert_eq!(parse(".[]").unwrap(), Expr::Iterate(Box::new(Expr::Identity)));
	assert_eq!(
		parse(".[1]").unwrap(),
		Expr::Index {
			target: Box::new(Expr::Identity),
			index: Box::new(lit(1.0)),
		}
	);
	assert_eq!(
		parse(".[1:]").unwrap(),
		Expr::Slice {
			target: Box::new(Expr::Identity),
			start: Some(Box::new(lit(1.0))),
			end: None,
		}
	);
	assert_eq!(
		parse(".[:-1]").unwrap(),
		Expr::Slice {
			target: Box::new(Expr::Identity),
			start: None,
			end: Some(Box::new(lit(-1.0))),
		}
	);
	assert_eq!(parse(".a[]?").unwrap(), Expr::Optional(Box::new(Expr::Iterate(Box::new(Expr::field("a"))))));
}

#[test]
fn pipe_binds_looser_than_comma() {
	let expected = Expr::Pipe(
		Box::new(Expr::Comma(Box::new(Expr::field("a")), Box::new(Expr::field("b")))),
		Box::new(Expr::Identity),
	);
	assert_eq!(parse(".a, .b | .").unwrap(), expected);
}

#[test]
fn arithmetic_precedence() {
	let expected = binary(BinaryOp::Add, lit(1.0), binary(BinaryOp::Mul, lit(2.0), lit(3.0)));
	assert_eq!(parse("1 + 2 * 3").unwrap(), expected);

	let left_assoc = binary(BinaryOp::Sub, binary(BinaryOp::Sub, lit(10.0), lit(4.0)), lit(3.0));
	assert_eq!(parse("10 - 4 - 3").unwrap(), left_assoc);
}

#[test]
fn comparison_binds_tighter_than_boolean_operators() {
	let expected = Expr::Or(
		Box::new(binary(BinaryOp::Eq, Expr::field("a"), lit(1.0))),
		Box::new(Expr::And(
			Box::new(binary(BinaryOp::Lt, Expr::field("b"), lit(2.0))),
			Box::new(lit(true)),
		)),
	);
	assert_eq!(parse(".a == 1 or .b < 2 and true").unwrap(), expected);
}

#[test]
fn alternative_is_not_division() {
	assert_eq!(
		parse(".a // .b").unwrap(),
		Expr::Alternative(Box::new(Expr::field("a")), Box::new(Expr::field("b")))
	);
	assert_eq!(parse(".a / .b").unwrap(), binary(BinaryOp::Div, Expr::field("a"), Expr::field("b")));
}

#[test]
fn unary_minus_folds_number_literals() {
	assert_eq!(parse("-1").unwrap(), lit(-1.0));
	assert_eq!(parse("-.a").unwrap(), Expr::Neg(Box::new(Expr::field("a"))));
}

#[test]
fn parses_literals() {
	assert_eq!(parse("null").unwrap(), lit(Value::Null));
	assert_eq!(parse("false").unwrap(), lit(false));
	assert_eq!(parse("1.5e2").unwrap(), lit(150.0));
	assert_eq!(parse(r#""a\n\u00e9\ud83d\ude00""#).unwrap(), lit("a\n\u{e9}\u{1F600}"));
}

#[test]
fn parses_object_construction() {
	let parsed = parse(r#"{a: .x, "b": 1, c, $v, (.k): 2}"#).unwrap();
	let expected = Expr::Object(vec![
		ObjectEntry {
			key: ObjectKey::Name("a".to_owned()),
			value: Some(Expr::field("x")),
		},
		ObjectEntry {
			key: ObjectKey::Name("b".to_owned()),
			value: Some(lit(1.0)),
		},
		ObjectEntry {
			key: ObjectKey::Name("c".to_owned()),
			value: None,
		},
		ObjectEntry {
			key: ObjectKey::Variable("v".to_owned()),
			value: None,
		},
		ObjectEntry {
			key: ObjectKey::Expr(Box::new(Expr::field("k"))),
			value: Some(lit(2.0)),
		},
	]);
	assert_eq!(parsed, expected);
}

#[test]
fn object_values_may_pipe() {
	let parsed = parse("{a: .x | .y}").unwrap();
	let expected = Expr::Object(vec![ObjectEntry {
		key: ObjectKey::Name("a".to_owned()),
		value: Some(Expr::Pipe(Box::new(Expr::field("x")), Box::new(Expr::field("y")))),
	}]);
	assert_eq!(parsed, expected);
}

#[test]
fn parses_conditionals() {
	let parsed = parse("if .a then 1 elif .b then 2 end").unwrap();
	let expected = Expr::If {
		cond: Box::new(Expr::field("a")),
		then_branch: Box::new(lit(1.0)),
		else_branch: Some(Box::new(Expr::If {
			cond: Box::new(Expr::field("b")),
			then_branch: Box::new(lit(2.0)),
			else_branch: None,
		})),
	};
	assert_eq!(parsed, expected);
}

#[test]
fn parses_try_catch() {
	let parsed = parse(r#"try error("x") catch ."#).unwrap();
	let expected = Expr::Try {
		body: Box::new(Expr::Call {
			builtin: Builtin::ErrorWith,
			args: vec![lit("x")],
		}),
		catch: Some(Box::new(Expr::Identity)),
	};
	assert_eq!(parsed, expected);
}

#[test]
fn resolves_builtins_by_arity() {
	assert_eq!(
		parse("first").unwrap(),
		Expr::Call {
			builtin: Builtin::First,
			args: Vec::new(),
		}
	);
	assert_eq!(
		parse("limit(2; .[])").unwrap(),
		Expr::Call {
			builtin: Builtin::Limit,
			args: vec![lit(2.0), Expr::Iterate(Box::new(Expr::Identity))],
		}
	);
}

#[test]
fn skips_comments() {
	assert_eq!(parse(".a # trailing\n| .b").unwrap(), parse(".a | .b").unwrap());
}

#[test]
fn rejects_unknown_functions() {
	let err = parse(".a | frobnicate(1)").unwrap_err();
	assert_eq!(err.message, "function not defined: frobnicate/1");
	assert_eq!(err.position, 5);
}

#[test]
fn rejects_malformed_text() {
	for text in [".[", "{a:", "if . then 1", "\"open", ".a ]", "1 +", "def f: 1; f", "\"\\(1)\""] {
		assert!(parse(text).is_err(), "{text:?} should not parse");
	}
	assert_eq!(parse("(").unwrap_err().to_string(), "parse error at position 1: unexpected end of input");
}
