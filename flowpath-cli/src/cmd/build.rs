use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum, ValueHint};
use flowpath_core::{
	config::{lora::LoraMode, presets::Presets},
	graph::detect::{Autofill, Detected},
	settings::{self, Settings},
	BuildOutput, PathBuilder, WidgetData,
};
use serde_json::Value;

use super::{read_graph, read_input, Cmd};

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
	/// The path on the first line, the filename on the second.
	#[default]
	Plain,
	Json,
}

#[derive(Parser, Default, Debug)]
pub struct Build {
	/// Widget payload file, `-` for standard input.
	#[arg(long, short = 'p', value_hint = ValueHint::FilePath, conflicts_with = "json")]
	payload: Option<PathBuf>,
	/// Widget payload given inline.
	#[arg(long)]
	json: Option<String>,
	/// Execution graph (API prompt format) to detect the seed from.
	#[arg(long, value_hint = ValueHint::FilePath)]
	prompt: Option<PathBuf>,
	/// Folder counters are scanned under. Overrides the settings.
	#[arg(long, short = 'o', value_hint = ValueHint::DirPath)]
	output_dir: Option<PathBuf>,
	/// Applies a built-in, user or payload preset before building.
	#[arg(long)]
	preset: Option<String>,
	/// Fills blank model, LoRA and resolution fields from the execution graph.
	#[arg(long, requires = "prompt")]
	autofill: bool,
	/// How detected LoRAs are written when autofilling.
	#[arg(long, default_value_t = LoraMode::Primary)]
	lora_mode: LoraMode,
	#[arg(long, value_enum, default_value_t = Format::Plain)]
	format: Format,
}

impl Cmd for Build {
	fn run(self, settings: Settings) -> Result<()> {
		let graph = self.prompt.as_deref().map(read_graph).transpose()?;
		let payload = self.payload_text()?;
		let output_dir = self.output_dir.clone().unwrap_or(settings.output_dir);
		let builder = PathBuilder::new(output_dir);

		let output = if self.preset.is_none() && !self.autofill {
			builder.build_from_payload(&payload, graph.as_ref())
		} else {
			let mut data: WidgetData = payload.parse().context("Could not parse widget payload")?;
			self.prepare(&mut data, graph.as_ref(), &Settings::presets_path())?;
			builder.build_widget(&data, graph.as_ref())
		};

		println!("{}", self.render(&output)?);
		Ok(())
	}
}

impl Build {
	fn payload_text(&self) -> Result<String> {
		match (&self.payload, &self.json) {
			(Some(path), _) => read_input(path),
			(None, Some(json)) => Ok(json.clone()),
			(None, None) => Ok("{}".to_string()),
		}
	}

	/// Applies `--preset` (looked up in built-ins, the user presets at
	/// `presets_path` and the payload) and then `--autofill`.
	fn prepare(&self, data: &mut WidgetData, graph: Option<&Value>, presets_path: &Path) -> Result<()> {
		if let Some(name) = &self.preset {
			let user = settings::load_presets(presets_path)?;
			let presets = Presets::merged(user, data.presets.clone());
			let preset = presets.get(name).ok_or_else(|| anyhow!("Unknown preset `{name}`"))?.clone();
			preset.apply(data);
			tracing::info!(preset = name.as_str(), "applied preset");
		}
		if self.autofill {
			let detected = Detected::from_graph(graph);
			let filled = Autofill::new(self.lora_mode).apply(&detected, &mut data.config);
			tracing::info!(?filled, "autofilled from execution graph");
		}
		Ok(())
	}

	fn render(&self, output: &BuildOutput) -> Result<String> {
		Ok(match self.format {
			Format::Plain => format!("{}\n{}", output.path, output.filename),
			Format::Json => serde_json::to_string_pretty(output)?,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use flowpath_core::{
		config::segment::{Segment, SegmentKind},
		ConfigKey,
	};
	use pretty_assertions::assert_eq;
	use serde_json::json;
	use std::fs;
	use tempfile::{tempdir, TempDir};

	fn presets_file() -> (TempDir, PathBuf) {
		let dir = tempdir().unwrap();
		let path = dir.path().join("presets.toml");
		(dir, path)
	}

	fn parse(args: &[&str]) -> Build {
		Build::try_parse_from(std::iter::once("build").chain(args.iter().copied())).unwrap()
	}

	#[test]
	fn defaults() {
		let build = parse(&[]);
		assert_eq!(build.format, Format::Plain);
		assert_eq!(build.lora_mode, LoraMode::Primary);
		assert_eq!(build.payload_text().unwrap(), "{}");
	}

	#[test]
	fn autofill_needs_a_prompt() {
		assert!(Build::try_parse_from(["build", "--autofill"]).is_err());
		assert!(Build::try_parse_from(["build", "--payload", "a.json", "--json", "{}"]).is_err());
	}

	#[test]
	fn lora_mode_by_name() {
		assert_eq!(parse(&["--lora-mode", "primaryCount"]).lora_mode, LoraMode::PrimaryCount);
	}

	#[test]
	fn autofill_fills_blank_fields() {
		let build = parse(&["--json", "{}", "--prompt", "p.json", "--autofill", "--lora-mode", "all"]);
		let graph = json!({
			"4": { "class_type": "CheckpointLoaderSimple", "inputs": { "ckpt_name": "sdxl/juggernaut.safetensors" } },
			"5": { "class_type": "EmptyLatentImage", "inputs": { "width": 832, "height": 1216 } },
			"6": { "class_type": "LoraLoader", "inputs": { "lora_name": "style.safetensors" } },
		});
		let mut data: WidgetData = r#"{"config":{"resolution":"512x512"}}"#.parse().unwrap();
		let (_dir, presets) = presets_file();
		build.prepare(&mut data, Some(&graph), &presets).unwrap();
		assert_eq!(data.config.get(ConfigKey::ModelName), "juggernaut");
		assert_eq!(data.config.get(ConfigKey::LoraName), "style");
		assert_eq!(data.config.get(ConfigKey::Resolution), "512x512");
	}

	#[test]
	fn payload_presets_are_applied() {
		let build = parse(&["--preset", "Mine"]);
		let mut data: WidgetData =
			r#"{"config":{"output_mode":"imageSaver"},"presets":{"Mine":{"segments":[{"type":"seed"}],"config":{"seed":"9"}}}}"#
				.parse()
				.unwrap();
		let (_dir, presets) = presets_file();
		build.prepare(&mut data, None, &presets).unwrap();
		let output = PathBuilder::new("output").build_widget(&data, None);
		assert_eq!(output.path, "9");
		assert_eq!(data.config.get(ConfigKey::OutputMode), "imageSaver");
	}

	#[test]
	fn unknown_preset_is_an_error() {
		let build = parse(&["--preset", "Nope"]);
		let (_dir, presets) = presets_file();
		assert!(build.prepare(&mut WidgetData::default(), None, &presets).is_err());
	}

	#[test]
	fn user_presets_override_builtins_and_yield_to_payload() {
		let (_dir, presets) = presets_file();
		fs::write(
			&presets,
			"[\"Simple Daily\"]\nsegments = [{ type = \"name\" }]\n\n[Mine]\nsegments = [{ type = \"category\" }]\n",
		)
		.unwrap();
		let mut data: WidgetData = r#"{"config":{"name":"Alice"},"presets":{"Mine":{"segments":[{"type":"seed"}]}}}"#
			.parse()
			.unwrap();

		parse(&["--preset", "Simple Daily"]).prepare(&mut data, None, &presets).unwrap();
		assert_eq!(PathBuilder::new("output").build_widget(&data, None).path, "Alice");

		parse(&["--preset", "Mine"]).prepare(&mut data, None, &presets).unwrap();
		assert_eq!(data.segments, vec![Segment::new(SegmentKind::Seed)]);
	}

	#[test]
	fn renders_both_formats() {
		let output = BuildOutput {
			path: "Characters".into(),
			filename: "img".into(),
		};
		assert_eq!(parse(&[]).render(&output).unwrap(), "Characters\nimg");
		let json: Value = serde_json::from_str(&parse(&["--format", "json"]).render(&output).unwrap()).unwrap();
		assert_eq!(json, json!({ "path": "Characters", "filename": "img" }));
	}
}
