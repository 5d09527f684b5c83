#![allow(missing_docs)]

use clap::{Parser, Subcommand};

mod cmd;
mod error;

#[derive(Parser)]
#[command(name = "structbuilder", about = "Fill records from JSON documents with jq-style queries")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Run one query against a JSON document and print every output.
	Query(cmd::query::Args),
	/// Fill the publish-info record from a JSON document.
	PublishInfo(cmd::publish_info::Args),
}

fn main() {
	env_logger::Builder::from_default_env().format_timestamp(None).init();

	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> error::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Query(args) => cmd::query::run(args),
		Commands::PublishInfo(args) => cmd::publish_info::run(args),
	}
}
