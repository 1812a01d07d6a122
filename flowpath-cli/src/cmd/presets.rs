use std::path::Path;

use anyhow::{anyhow, Result};
use clap::Subcommand;
use colored::Colorize;
use flowpath_core::{
	config::presets::{Preset, Presets},
	settings::{self, Settings},
	WidgetData,
};

use super::Cmd;

#[derive(Subcommand, Debug)]
pub enum PresetsCmd {
	/// Lists built-in and user presets.
	List,
	/// Prints one preset as a widget payload.
	Show { name: String },
}

impl Cmd for PresetsCmd {
	fn run(self, _settings: Settings) -> Result<()> {
		let presets = load(&Settings::presets_path())?;
		match self {
			PresetsCmd::List => print!("{}", listing(&presets)),
			PresetsCmd::Show { name } => {
				let preset = presets.get(&name).ok_or_else(|| anyhow!("Unknown preset `{name}`"))?;
				let data = WidgetData::new(preset.segments.clone(), preset.config.clone());
				println!("{}", data.to_json()?);
			}
		}
		Ok(())
	}
}

/// Built-in presets overridden by the user presets at `path`.
fn load(path: &Path) -> Result<Presets> {
	Ok(Presets::merged(settings::load_presets(path)?, None::<(String, Preset)>))
}

fn listing(presets: &Presets) -> String {
	presets
		.iter()
		.map(|(name, preset)| {
			let kinds: Vec<String> = preset.segments.iter().map(|segment| segment.kind.to_string()).collect();
			format!("{}: {}\n", name.bold(), kinds.join(" / "))
		})
		.collect()
}
