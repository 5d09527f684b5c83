use std::path::PathBuf;

use structbuilder::fill::FillError;
use structbuilder::jq::{EvalError, QueryError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error("{}: {source}", .path.display())]
	Io { path: PathBuf, source: std::io::Error },
	#[error("{}: invalid JSON: {source}", .path.display())]
	Document { path: PathBuf, source: serde_json::Error },
	#[error("--var {arg:?}: expected NAME=JSON")]
	VarSyntax { arg: String },
	#[error("--var {name}: invalid JSON: {source}")]
	VarValue { name: String, source: serde_json::Error },
	#[error("json: {0}")]
	Encode(#[from] serde_json::Error),
	#[error(transparent)]
	Query(#[from] QueryError),
	#[error(transparent)]
	Eval(#[from] EvalError),
	#[error(transparent)]
	Fill(#[from] FillError),
}
