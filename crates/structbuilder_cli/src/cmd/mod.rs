use std::path::Path;

use structbuilder::jq::Value;

use crate::error::{CliError, Result};

/// Fixed-shape record fill command.
pub mod publish_info;
/// Ad hoc query command.
pub mod query;

/// Read and parse a JSON document.
pub fn read_document(path: &Path) -> Result<Value> {
	let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
		path: path.to_owned(),
		source,
	})?;
	let document: Value = serde_json::from_str(&text).map_err(|source| CliError::Document {
		path: path.to_owned(),
		source,
	})?;
	log::debug!("read {} ({} bytes)", path.display(), text.len());
	Ok(document)
}

/// Split `--var NAME=JSON` arguments into `$NAME` declarations and their values.
pub fn parse_vars(args: &[String]) -> Result<Vec<(String, Value)>> {
	let mut vars = Vec::with_capacity(args.len());
	for arg in args {
		let (name, json) = arg.split_once('=').ok_or_else(|| CliError::VarSyntax { arg: arg.clone() })?;
		let value: Value = serde_json::from_str(json).map_err(|source| CliError::VarValue {
			name: name.to_owned(),
			source,
		})?;
		vars.push((format!("${name}"), value));
	}
	Ok(vars)
}

#[cfg(test)]
mod tests;
