use std::{
	fs,
	io::{self, Read},
	path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use build::Build;
use clap::{Parser, Subcommand, ValueHint};
use detect::Detect;
use flowpath_core::settings::Settings;
use presets::PresetsCmd;
use serde_json::Value;

mod build;
mod detect;
mod logs;
mod presets;

#[derive(Subcommand)]
enum Command {
	/// Builds the output path and filename from a widget payload.
	Build(Build),
	/// Shows what can be read from an execution graph.
	Detect(Detect),
	/// Lists or shows the available presets.
	#[command(subcommand)]
	Presets(PresetsCmd),
}

#[derive(Parser)]
#[command(about, author, version)]
pub struct App {
	#[arg(long, global = true, value_hint = ValueHint::FilePath)]
	settings: Option<PathBuf>,
	/// Only log to stderr.
	#[arg(long, global = true)]
	no_log_file: bool,
	#[command(subcommand)]
	command: Command,
}

pub trait Cmd {
	fn run(self, settings: Settings) -> Result<()>;
}

impl App {
	pub fn run(self) -> Result<()> {
		let settings = Settings::new(self.settings)?;
		let _guard = logs::init((!self.no_log_file).then_some(settings.log_dir.as_path()));
		tracing::debug!(?settings, "settings loaded");

		match self.command {
			Command::Build(build) => build.run(settings),
			Command::Detect(detect) => detect.run(settings),
			Command::Presets(presets) => presets.run(settings),
		}
	}
}

/// Reads a file, or standard input when the path is `-`.
fn read_input(path: &Path) -> Result<String> {
	if path == Path::new("-") {
		let mut buffer = String::new();
		io::stdin().read_to_string(&mut buffer).context("Could not read standard input")?;
		return Ok(buffer);
	}
	fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))
}

/// Loads an execution graph in the API prompt format.
fn read_graph(path: &Path) -> Result<Value> {
	let content = read_input(path)?;
	serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", path.display()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;
	use pretty_assertions::assert_eq;
	use serde_json::json;
	use tempfile::tempdir;

	#[test]
	fn command_line_is_consistent() {
		App::command().debug_assert();
	}

	#[test]
	fn global_flags_after_subcommand() {
		let app = App::try_parse_from(["flowpath", "presets", "list", "--no-log-file", "--settings", "s.toml"]).unwrap();
		assert!(app.no_log_file);
		assert_eq!(app.settings, Some(PathBuf::from("s.toml")));
	}

	#[test]
	fn graph_from_file() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("prompt.json");
		fs::write(&path, r#"{"3":{"class_type":"KSampler","inputs":{"seed":1}}}"#).unwrap();
		assert_eq!(read_graph(&path).unwrap(), json!({ "3": { "class_type": "KSampler", "inputs": { "seed": 1 } } }));
	}

	#[test]
	fn broken_graph_is_an_error() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("prompt.json");
		fs::write(&path, "{").unwrap();
		assert!(read_graph(&path).is_err());
		assert!(read_graph(&dir.path().join("missing.json")).is_err());
	}
}
