use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use structbuilder::fill::{FillOptions, Filler};
use structbuilder::jq::Map;

use crate::cmd::{parse_vars, read_document};
use crate::error::Result;

structbuilder::record! {
	#[derive(Debug, Default, Serialize)]
	pub struct BuildPlan {
		pub time_spent: i64 => ".updated_at - .created_at",
		pub success: String => ".status",
		pub failure_reason: String => ".status",
	}
}

structbuilder::record! {
	/// Summary of one publish run and its per-stage build results.
	#[derive(Debug, Default, Serialize)]
	pub struct PublishInfo {
		#[serde(rename = "@id")]
		pub id: i64 => ".id",
		pub floaty: f64 => ".floaty",
		pub booly: bool => ".booly",
		pub start_time: i64 => ".created_at",
		pub end_time: i64 => ".updated_at",
		pub time_spent: i64 => ".updated_at - .created_at",
		pub success: String => ".status",
		pub bom: Map => ".data",
		pub architecture_plan: String => ".architecture_plan.name",
		pub build_plan: BTreeMap<String, BuildPlan> => ".build_results",
	}
}

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long = "var", value_name = "NAME=JSON")]
	pub vars: Vec<String>,
	#[arg(long = "max-depth", default_value_t = 32)]
	pub max_depth: u32,
}

/// Fill a [`PublishInfo`] from the document and print it as pretty JSON.
pub fn run(args: Args) -> Result<()> {
	let Args { path, vars, max_depth } = args;

	let document = read_document(&path)?;
	let mut options = FillOptions::default().with_variables(parse_vars(&vars)?);
	options.max_depth = max_depth;

	let mut info = PublishInfo::default();
	Filler::new(options).fill(&mut info, &document)?;
	println!("{}", serde_json::to_string_pretty(&info)?);
	Ok(())
}
