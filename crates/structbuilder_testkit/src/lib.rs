//! Shared test helpers for workspace crates.

use std::path::{Path, PathBuf};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve a fixture path under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}

/// Read and parse a JSON fixture, panicking with the path on failure.
pub fn load_json(name: &str) -> serde_json::Value {
	let path = fixture_path(name);
	let text = std::fs::read_to_string(&path).unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
	serde_json::from_str(&text).unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()))
}
