use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueHint};
use colored::Colorize;
use flowpath_core::{graph::detect::Detected, settings::Settings};

use super::{build::Format, read_graph, Cmd};

#[derive(Parser, Debug)]
pub struct Detect {
	/// Execution graph (API prompt format), `-` for standard input.
	#[arg(long, value_hint = ValueHint::FilePath)]
	prompt: PathBuf,
	#[arg(long, value_enum, default_value_t = Format::Plain)]
	format: Format,
}

impl Cmd for Detect {
	fn run(self, _settings: Settings) -> Result<()> {
		let graph = read_graph(&self.prompt)?;
		let detected = Detected::from_graph(Some(&graph));
		match self.format {
			Format::Json => println!("{}", serde_json::to_string_pretty(&detected)?),
			Format::Plain => print!("{}", summary(&detected)),
		}
		Ok(())
	}
}

fn summary(detected: &Detected) -> String {
	let seed = detected.seed.as_ref().map(ToString::to_string).unwrap_or_default();
	let mut out = String::new();
	for (label, value) in [
		("seed", seed),
		("models", detected.models.join(", ")),
		("loras", detected.loras.join(", ")),
		("resolutions", detected.resolutions.join(", ")),
	] {
		out.push_str(&format!("{:<12} {}\n", label.bold(), value));
	}
	out
}
