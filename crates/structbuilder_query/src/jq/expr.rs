use crate::jq::{Builtin, Value};

/// Parsed query expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
	/// `.`
	Identity,
	/// `..`
	Recurse,
	/// Constant value.
	Literal(Value),
	/// `$name` (stored without the `$`).
	Variable(String),
	/// `target[index]`, `target.name`, or `.name`.
	Index {
		/// Value being indexed.
		target: Box<Expr>,
		/// Key or position, evaluated against the term's input.
		index: Box<Expr>,
	},
	/// `target[start:end]`
	Slice {
		/// Value being sliced.
		target: Box<Expr>,
		/// Inclusive start bound.
		start: Option<Box<Expr>>,
		/// Exclusive end bound.
		end: Option<Box<Expr>>,
	},
	/// `target[]`
	Iterate(Box<Expr>),
	/// `expr?`: suppress errors and stop at the first one.
	Optional(Box<Expr>),
	/// `left | right`
	Pipe(Box<Expr>, Box<Expr>),
	/// `left, right`
	Comma(Box<Expr>, Box<Expr>),
	/// Unary minus.
	Neg(Box<Expr>),
	/// Arithmetic and comparison operators.
	Binary {
		/// Operator.
		op: BinaryOp,
		/// Left operand.
		left: Box<Expr>,
		/// Right operand.
		right: Box<Expr>,
	},
	/// `left and right`
	And(Box<Expr>, Box<Expr>),
	/// `left or right`
	Or(Box<Expr>, Box<Expr>),
	/// `left // right`
	Alternative(Box<Expr>, Box<Expr>),
	/// `[expr]`; `None` for `[]`.
	Array(Option<Box<Expr>>),
	/// `{key: value, ...}`
	Object(Vec<ObjectEntry>),
	/// `if cond then a elif ... else b end`; a missing else passes the input through.
	If {
		/// Condition.
		cond: Box<Expr>,
		/// Branch for truthy conditions.
		then_branch: Box<Expr>,
		/// Branch for falsy conditions.
		else_branch: Option<Box<Expr>>,
	},
	/// `try body catch handler`
	Try {
		/// Guarded expression.
		body: Box<Expr>,
		/// Handler receiving the error value.
		catch: Option<Box<Expr>>,
	},
	/// Builtin call resolved at parse time.
	Call {
		/// Resolved builtin.
		builtin: Builtin,
		/// Filter arguments.
		args: Vec<Expr>,
	},
}

/// Binary operators sharing the cartesian evaluation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
	/// `+`
	Add,
	/// `-`
	Sub,
	/// `*`
	Mul,
	/// `/`
	Div,
	/// `%`
	Mod,
	/// `==`
	Eq,
	/// `!=`
	Ne,
	/// `<`
	Lt,
	/// `<=`
	Le,
	/// `>`
	Gt,
	/// `>=`
	Ge,
}

/// One `key: value` pair of an object constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectEntry {
	/// Key expression.
	pub key: ObjectKey,
	/// Value expression; `None` for `{name}` and `{$name}` shorthand.
	pub value: Option<Expr>,
}

/// Object constructor key forms.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKey {
	/// Identifier or string literal key.
	Name(String),
	/// `$name` key, bound to the variable's value.
	Variable(String),
	/// `(expr)` key; must produce strings.
	Expr(Box<Expr>),
}

impl Expr {
	/// `.name` applied to the input.
	pub fn field(name: impl Into<String>) -> Self {
		Self::Index {
			target: Box::new(Self::Identity),
			index: Box::new(Self::Literal(Value::String(name.into()))),
		}
	}

	/// Visit every variable referenced by this expression.
	pub fn for_each_variable(&self, visit: &mut impl FnMut(&str)) {
		match self {
			Self::Identity | Self::Recurse | Self::Literal(_) => {}
			Self::Variable(name) => visit(name),
			Self::Index { target, index } => {
				target.for_each_variable(visit);
				index.for_each_variable(visit);
			}
			Self::Slice { target, start, end } => {
				target.for_each_variable(visit);
				for bound in [start, end].into_iter().flatten() {
					bound.for_each_variable(visit);
				}
			}
			Self::Iterate(inner) | Self::Optional(inner) | Self::Neg(inner) => inner.for_each_variable(visit),
			Self::Pipe(left, right) | Self::Comma(left, right) | Self::And(left, right) | Self::Or(left, right) | Self::Alternative(left, right) => {
				left.for_each_variable(visit);
				right.for_each_variable(visit);
			}
			Self::Binary { left, right, .. } => {
				left.for_each_variable(visit);
				right.for_each_variable(visit);
			}
			Self::Array(inner) => {
				if let Some(inner) = inner {
					inner.for_each_variable(visit);
				}
			}
			Self::Object(entries) => {
				for entry in entries {
					match &entry.key {
						ObjectKey::Name(_) => {}
						ObjectKey::Variable(name) => visit(name),
						ObjectKey::Expr(key) => key.for_each_variable(visit),
					}
					if let Some(value) = &entry.value {
						value.for_each_variable(visit);
					}
				}
			}
			Self::If { cond, then_branch, else_branch } => {
				cond.for_each_variable(visit);
				then_branch.for_each_variable(visit);
				if let Some(else_branch) = else_branch {
					else_branch.for_each_variable(visit);
				}
			}
			Self::Try { body, catch } => {
				body.for_each_variable(visit);
				if let Some(catch) = catch {
					catch.for_each_variable(visit);
				}
			}
			Self::Call { args, .. } => {
				for arg in args {
					arg.for_each_variable(visit);
				}
			}
		}
	}
}
