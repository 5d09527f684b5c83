use std::path::PathBuf;

use structbuilder::jq::Compiler;

use crate::cmd::{parse_vars, read_document};
use crate::error::Result;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long, short)]
	pub query: String,
	#[arg(long = "var", value_name = "NAME=JSON")]
	pub vars: Vec<String>,
	/// Expose the process environment as `$ENV` and `env`.
	#[arg(long)]
	pub env: bool,
}

/// Print each query output as one line of compact JSON.
pub fn run(args: Args) -> Result<()> {
	let Args { path, query, vars, env } = args;

	let document = read_document(&path)?;
	let (names, values): (Vec<String>, Vec<_>) = parse_vars(&vars)?.into_iter().unzip();

	let mut compiler = Compiler::new().with_variables(names);
	if env {
		compiler = compiler.with_environ(|| std::env::vars().map(|(key, value)| format!("{key}={value}")).collect());
	}
	let query = compiler.compile_text(&query)?;

	for output in query.run_with(document, values) {
		println!("{}", output?.to_json());
	}
	Ok(())
}
