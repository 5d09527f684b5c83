//! Recursive descent parser for the supported jq subset.
//!
//! Precedence, loosest first: `|`, `,`, `//`, `or`, `and`, comparisons,
//! `+ -`, `* / %`, unary minus, then postfix `.name`, `[...]`, and `?`.

use crate::jq::{BinaryOp, Builtin, Expr, ObjectEntry, ObjectKey, ParseError, Value};

/// Words that end an expression or introduce a construct; never function names.
const KEYWORDS: &[&str] = &[
	"if", "then", "elif", "else", "end", "try", "catch", "and", "or", "def", "reduce", "foreach", "as", "label", "import", "include",
];

struct Parser<'a> {
	input: &'a str,
	pos: usize,
}

impl<'a> Parser<'a> {
	fn new(input: &'a str) -> Self {
		Self { input, pos: 0 }
	}

	fn rest(&self) -> &'a str {
		&self.input[self.pos..]
	}

	fn peek(&self) -> Option<char> {
		self.rest().chars().next()
	}

	fn peek_second(&self) -> Option<char> {
		self.rest().chars().nth(1)
	}

	fn next(&mut self) -> Option<char> {
		let ch = self.peek()?;
		self.pos += ch.len_utf8();
		Some(ch)
	}

	/// Skip whitespace and `#` comments.
	fn skip_ws(&mut self) {
		while let Some(ch) = self.peek() {
			if ch.is_whitespace() {
				self.next();
			} else if ch == '#' {
				while let Some(ch) = self.next() {
					if ch == '\n' {
						break;
					}
				}
			} else {
				break;
			}
		}
	}

	fn is_eof(&self) -> bool {
		self.pos >= self.input.len()
	}

	fn error(&self, message: impl Into<String>) -> ParseError {
		ParseError::new(message, self.pos)
	}

	fn unexpected(&self) -> ParseError {
		match self.peek() {
			Some(ch) => self.error(format!("unexpected character '{ch}'")),
			None => self.error("unexpected end of input"),
		}
	}

	fn expect(&mut self, expected: char) -> Result<(), ParseError> {
		self.skip_ws();
		match self.peek() {
			Some(ch) if ch == expected => {
				self.next();
				Ok(())
			}
			Some(ch) => Err(self.error(format!("expected '{expected}', found '{ch}'"))),
			None => Err(self.error(format!("expected '{expected}', found end of input"))),
		}
	}

	/// Consume `token` if the input continues with it.
	fn eat(&mut self, token: &str) -> bool {
		self.skip_ws();
		if self.rest().starts_with(token) {
			self.pos += token.len();
			return true;
		}
		false
	}

	fn matches_keyword(&self, keyword: &str) -> bool {
		let Some(after) = self.rest().strip_prefix(keyword) else {
			return false;
		};
		!after.starts_with(is_ident_continue)
	}

	fn eat_keyword(&mut self, keyword: &str) -> bool {
		self.skip_ws();
		if self.matches_keyword(keyword) {
			self.pos += keyword.len();
			return true;
		}
		false
	}

	fn expect_keyword(&mut self, keyword: &str) -> Result<(), ParseError> {
		if self.eat_keyword(keyword) {
			return Ok(());
		}
		Err(self.error(format!("expected '{keyword}'")))
	}

	fn parse_ident(&mut self) -> Result<&'a str, ParseError> {
		let start = self.pos;
		match self.peek() {
			Some(ch) if is_ident_start(ch) => {
				self.next();
			}
			Some(ch) => return Err(self.error(format!("expected identifier, found '{ch}'"))),
			None => return Err(self.error("expected identifier, found end of input")),
		}
		while self.peek().is_some_and(is_ident_continue) {
			self.next();
		}
		Ok(&self.input[start..self.pos])
	}

	fn parse_number(&mut self) -> Result<f64, ParseError> {
		let start = self.pos;
		while self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
			self.next();
		}
		if self.peek() == Some('.') && self.peek_second().is_some_and(|ch| ch.is_ascii_digit()) {
			self.next();
			while self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
				self.next();
			}
		}
		if matches!(self.peek(), Some('e' | 'E')) {
			self.next();
			if matches!(self.peek(), Some('+' | '-')) {
				self.next();
			}
			while self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
				self.next();
			}
		}
		self.input[start..self.pos]
			.parse()
			.map_err(|_| ParseError::new("invalid number", start))
	}

	fn parse_string(&mut self) -> Result<String, ParseError> {
		self.expect('"')?;
		let mut out = String::new();
		loop {
			match self.next() {
				None => return Err(self.error("unterminated string")),
				Some('"') => return Ok(out),
				Some('\\') => match self.next() {
					Some('"') => out.push('"'),
					Some('\\') => out.push('\\'),
					Some('/') => out.push('/'),
					Some('n') => out.push('\n'),
					Some('r') => out.push('\r'),
					Some('t') => out.push('\t'),
					Some('b') => out.push('\x08'),
					Some('f') => out.push('\x0C'),
					Some('u') => out.push(self.parse_unicode_escape()?),
					Some('(') => return Err(self.error("string interpolation is not supported")),
					Some(ch) => return Err(self.error(format!("invalid escape sequence '\\{ch}'"))),
					None => return Err(self.error("unterminated string")),
				},
				Some(ch) => out.push(ch),
			}
		}
	}

	fn parse_unicode_escape(&mut self) -> Result<char, ParseError> {
		let high = self.parse_hex4()?;
		if !(0xD800..0xDC00).contains(&high) {
			return char::from_u32(high).ok_or_else(|| self.error("invalid unicode code point"));
		}
		// surrogate pair
		if !self.rest().starts_with("\\u") {
			return Err(self.error("unpaired surrogate in unicode escape"));
		}
		self.pos += 2;
		let low = self.parse_hex4()?;
		if !(0xDC00..0xE000).contains(&low) {
			return Err(self.error("unpaired surrogate in unicode escape"));
		}
		let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
		char::from_u32(code).ok_or_else(|| self.error("invalid unicode code point"))
	}

	fn parse_hex4(&mut self) -> Result<u32, ParseError> {
		let digits = self.rest().get(..4).filter(|digits| digits.chars().all(|ch| ch.is_ascii_hexdigit()));
		let Some(digits) = digits else {
			return Err(self.error("invalid unicode escape"));
		};
		let code = u32::from_str_radix(digits, 16).map_err(|_| self.error("invalid unicode escape"))?;
		self.pos += 4;
		Ok(code)
	}

	/// `a | b`, right associative.
	fn parse_pipe(&mut self) -> Result<Expr, ParseError> {
		let left = self.parse_comma()?;
		if self.eat_pipe() {
			let right = self.parse_pipe()?;
			return Ok(Expr::Pipe(Box::new(left), Box::new(right)));
		}
		Ok(left)
	}

	fn eat_pipe(&mut self) -> bool {
		self.skip_ws();
		if self.peek() == Some('|') && self.peek_second() != Some('=') {
			self.next();
			return true;
		}
		false
	}

	fn parse_comma(&mut self) -> Result<Expr, ParseError> {
		let mut left = self.parse_alternative()?;
		while self.eat(",") {
			let right = self.parse_alternative()?;
			left = Expr::Comma(Box::new(left), Box::new(right));
		}
		Ok(left)
	}

	/// `a // b`, right associative.
	fn parse_alternative(&mut self) -> Result<Expr, ParseError> {
		let left = self.parse_or()?;
		self.skip_ws();
		if self.rest().starts_with("//") && !self.rest().starts_with("//=") {
			self.pos += 2;
			let right = self.parse_alternative()?;
			return Ok(Expr::Alternative(Box::new(left), Box::new(right)));
		}
		Ok(left)
	}

	fn parse_or(&mut self) -> Result<Expr, ParseError> {
		let mut left = self.parse_and()?;
		while self.eat_keyword("or") {
			let right = self.parse_and()?;
			left = Expr::Or(Box::new(left), Box::new(right));
		}
		Ok(left)
	}

	fn parse_and(&mut self) -> Result<Expr, ParseError> {
		let mut left = self.parse_comparison()?;
		while self.eat_keyword("and") {
			let right = self.parse_comparison()?;
			left = Expr::And(Box::new(left), Box::new(right));
		}
		Ok(left)
	}

	/// Comparisons do not chain.
	fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
		let left = self.parse_additive()?;
		self.skip_ws();
		let op = [
			("==", BinaryOp::Eq),
			("!=", BinaryOp::Ne),
			("<=", BinaryOp::Le),
			(">=", BinaryOp::Ge),
			("<", BinaryOp::Lt),
			(">", BinaryOp::Gt),
		]
		.into_iter()
		.find(|(token, _)| self.rest().starts_with(token));
		let Some((token, op)) = op else {
			return Ok(left);
		};
		self.pos += token.len();
		let right = self.parse_additive()?;
		Ok(binary(op, left, right))
	}

	fn parse_additive(&mut self) -> Result<Expr, ParseError> {
		let mut left = self.parse_multiplicative()?;
		loop {
			self.skip_ws();
			let op = match (self.peek(), self.peek_second()) {
				(Some('+'), second) if second != Some('=') => BinaryOp::Add,
				(Some('-'), second) if second != Some('=') => BinaryOp::Sub,
				_ => return Ok(left),
			};
			self.next();
			let right = self.parse_multiplicative()?;
			left = binary(op, left, right);
		}
	}

	fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
		let mut left = self.parse_unary()?;
		loop {
			self.skip_ws();
			let op = match (self.peek(), self.peek_second()) {
				(_, Some('=')) => return Ok(left),
				(Some('*'), _) => BinaryOp::Mul,
				(Some('/'), second) if second != Some('/') => BinaryOp::Div,
				(Some('%'), _) => BinaryOp::Mod,
				_ => return Ok(left),
			};
			self.next();
			let right = self.parse_unary()?;
			left = binary(op, left, right);
		}
	}

	fn parse_unary(&mut self) -> Result<Expr, ParseError> {
		self.skip_ws();
		if self.peek() == Some('-') {
			self.next();
			return Ok(match self.parse_unary()? {
				Expr::Literal(Value::Number(number)) => Expr::Literal(Value::Number(-number)),
				other => Expr::Neg(Box::new(other)),
			});
		}
		let primary = self.parse_primary()?;
		self.parse_postfix(primary)
	}

	/// Suffixes bind only when written directly after the term.
	fn parse_postfix(&mut self, mut expr: Expr) -> Result<Expr, ParseError> {
		loop {
			match (self.peek(), self.peek_second()) {
				(Some('.'), Some('[')) => {
					self.next();
				}
				(Some('.'), Some(ch)) if is_ident_start(ch) || ch == '"' => {
					self.next();
					let name = self.parse_field_name()?;
					expr = Expr::Index {
						target: Box::new(expr),
						index: Box::new(Expr::Literal(Value::String(name))),
					};
				}
				(Some('['), _) => expr = self.parse_bracket(expr)?,
				(Some('?'), second) if second != Some('/') => {
					self.next();
					expr = Expr::Optional(Box::new(expr));
				}
				_ => return Ok(expr),
			}
		}
	}

	fn parse_field_name(&mut self) -> Result<String, ParseError> {
		if self.peek() == Some('"') {
			return self.parse_string();
		}
		Ok(self.parse_ident()?.to_owned())
	}

	/// `[]`, `[e]`, `[e:]`, `[:e]`, or `[e:e]` applied to `target`.
	fn parse_bracket(&mut self, target: Expr) -> Result<Expr, ParseError> {
		self.expect('[')?;
		if self.eat("]") {
			return Ok(Expr::Iterate(Box::new(target)));
		}

		let start = if self.eat(":") { None } else { Some(Box::new(self.parse_pipe()?)) };
		let sliced = start.is_none() || self.eat(":");
		if !sliced {
			self.expect(']')?;
			return Ok(Expr::Index {
				target: Box::new(target),
				index: start.ok_or_else(|| self.error("missing index"))?,
			});
		}

		let end = if self.eat("]") {
			None
		} else {
			let end = self.parse_pipe()?;
			self.expect(']')?;
			Some(Box::new(end))
		};
		if start.is_none() && end.is_none() {
			return Err(self.error("slice needs at least one bound"));
		}
		Ok(Expr::Slice {
			target: Box::new(target),
			start,
			end,
		})
	}

	fn parse_primary(&mut self) -> Result<Expr, ParseError> {
		self.skip_ws();
		match self.peek() {
			Some('.') => {
				self.next();
				match self.peek() {
					Some('.') => {
						self.next();
						Ok(Expr::Recurse)
					}
					Some(ch) if is_ident_start(ch) || ch == '"' => Ok(Expr::field(self.parse_field_name()?)),
					_ => Ok(Expr::Identity),
				}
			}
			Some('$') => {
				self.next();
				Ok(Expr::Variable(self.parse_ident()?.to_owned()))
			}
			Some(ch) if ch.is_ascii_digit() => Ok(Expr::Literal(Value::Number(self.parse_number()?))),
			Some('"') => Ok(Expr::Literal(Value::String(self.parse_string()?))),
			Some('(') => {
				self.next();
				let inner = self.parse_pipe()?;
				self.expect(')')?;
				Ok(inner)
			}
			Some('[') => {
				self.next();
				if self.eat("]") {
					return Ok(Expr::Array(None));
				}
				let inner = self.parse_pipe()?;
				self.expect(']')?;
				Ok(Expr::Array(Some(Box::new(inner))))
			}
			Some('{') => self.parse_object(),
			Some(ch) if is_ident_start(ch) => self.parse_word(),
			_ => Err(self.unexpected()),
		}
	}

	/// Keyword construct, literal, or builtin call.
	fn parse_word(&mut self) -> Result<Expr, ParseError> {
		let start = self.pos;
		let word = self.parse_ident()?;
		match word {
			"null" => return Ok(Expr::Literal(Value::Null)),
			"true" => return Ok(Expr::Literal(Value::Bool(true))),
			"false" => return Ok(Expr::Literal(Value::Bool(false))),
			"if" => return self.parse_if(),
			"try" => return self.parse_try(),
			_ if KEYWORDS.contains(&word) => return Err(ParseError::new(format!("unexpected keyword '{word}'"), start)),
			_ => {}
		}

		let mut args = Vec::new();
		self.skip_ws();
		if self.peek() == Some('(') {
			self.next();
			loop {
				args.push(self.parse_pipe()?);
				if self.eat(";") {
					continue;
				}
				self.expect(')')?;
				break;
			}
		}

		let builtin = Builtin::resolve(word, args.len()).ok_or_else(|| ParseError::new(format!("function not defined: {word}/{}", args.len()), start))?;
		Ok(Expr::Call { builtin, args })
	}

	/// Called after `if`; `elif` chains nest into the else branch.
	fn parse_if(&mut self) -> Result<Expr, ParseError> {
		let cond = self.parse_pipe()?;
		self.expect_keyword("then")?;
		let then_branch = self.parse_pipe()?;

		let else_branch = if self.eat_keyword("elif") {
			Some(Box::new(self.parse_if()?))
		} else if self.eat_keyword("else") {
			let branch = self.parse_pipe()?;
			self.expect_keyword("end")?;
			Some(Box::new(branch))
		} else {
			self.expect_keyword("end")?;
			None
		};

		Ok(Expr::If {
			cond: Box::new(cond),
			then_branch: Box::new(then_branch),
			else_branch,
		})
	}

	/// Called after `try`; body and handler are postfix terms.
	fn parse_try(&mut self) -> Result<Expr, ParseError> {
		let body = self.parse_unary()?;
		let catch = if self.eat_keyword("catch") { Some(Box::new(self.parse_unary()?)) } else { None };
		Ok(Expr::Try {
			body: Box::new(body),
			catch,
		})
	}

	fn parse_object(&mut self) -> Result<Expr, ParseError> {
		self.expect('{')?;
		let mut entries = Vec::new();
		if self.eat("}") {
			return Ok(Expr::Object(entries));
		}

		loop {
			self.skip_ws();
			let key = match self.peek() {
				Some('$') => {
					self.next();
					ObjectKey::Variable(self.parse_ident()?.to_owned())
				}
				Some('"') => ObjectKey::Name(self.parse_string()?),
				Some('(') => {
					self.next();
					let key = self.parse_pipe()?;
					self.expect(')')?;
					ObjectKey::Expr(Box::new(key))
				}
				Some(ch) if is_ident_start(ch) => ObjectKey::Name(self.parse_ident()?.to_owned()),
				_ => return Err(self.unexpected()),
			};

			let value = if self.eat(":") { Some(self.parse_object_value()?) } else { None };
			let key = match (key, &value) {
				(ObjectKey::Expr(_), None) => return Err(self.error("expected ':' after computed object key")),
				(ObjectKey::Variable(name), Some(_)) => ObjectKey::Expr(Box::new(Expr::Variable(name))),
				(key, _) => key,
			};
			entries.push(ObjectEntry { key, value });

			if self.eat(",") {
				continue;
			}
			self.expect('}')?;
			return Ok(Expr::Object(entries));
		}
	}

	/// Object values may pipe but not use a bare comma.
	fn parse_object_value(&mut self) -> Result<Expr, ParseError> {
		let left = self.parse_alternative()?;
		if self.eat_pipe() {
			let right = self.parse_object_value()?;
			return Ok(Expr::Pipe(Box::new(left), Box::new(right)));
		}
		Ok(left)
	}
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
	Expr::Binary {
		op,
		left: Box::new(left),
		right: Box::new(right),
	}
}

fn is_ident_start(ch: char) -> bool {
	ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
	ch.is_ascii_alphanumeric() || ch == '_'
}

/// Parse query text into an expression tree, resolving builtin names and arities.
pub fn parse(text: &str) -> Result<Expr, ParseError> {
	let mut parser = Parser::new(text);
	let expr = parser.parse_pipe()?;
	parser.skip_ws();
	if !parser.is_eof() {
		return Err(parser.unexpected());
	}
	log::trace!("parsed query {text:?}");
	Ok(expr)
}

#[cfg(test)]
mod tests;
