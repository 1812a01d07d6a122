use std::{
	collections::BTreeMap,
	fs,
	path::{Path, PathBuf},
};

use config::{Config as LayeredConfig, Environment, File};
use serde::{Deserialize, Serialize};

use crate::{
	config::presets::Preset,
	errors::{Error, Result},
	path::Expand,
	PROJECT_NAME,
};

/// Runtime settings of the command line front end.
///
/// Layered lowest to highest: built-in defaults, the settings file,
/// `FLOWPATH_*` environment variables. Command line flags are applied on top
/// by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
	/// Base folder the built path is relative to. Counters are scanned here.
	pub output_dir: PathBuf,
	pub log_dir: PathBuf,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			output_dir: PathBuf::from("output"),
			log_dir: dirs::data_dir()
				.map(|dir| dir.join(PROJECT_NAME).join("logs"))
				.unwrap_or_else(|| PathBuf::from("logs")),
		}
	}
}

impl Settings {
	/// Loads the settings. A file passed explicitly must exist; the default
	/// file is optional.
	pub fn new(path: Option<PathBuf>) -> Result<Self> {
		let required = path.is_some();
		let path = Self::resolve_path(path);
		if required && !path.exists() {
			return Err(Error::Other(anyhow::anyhow!("Settings file not found at {}", path.display())));
		}
		tracing::debug!(path = %path.display(), "loading settings");

		let defaults = Self::default();
		let mut settings: Settings = LayeredConfig::builder()
			.set_default("output_dir", defaults.output_dir.to_string_lossy().into_owned())?
			.set_default("log_dir", defaults.log_dir.to_string_lossy().into_owned())?
			.add_source(File::from(path).required(required))
			.add_source(Environment::with_prefix(&PROJECT_NAME.to_uppercase()))
			.build()?
			.try_deserialize()?;
		settings.output_dir = settings.output_dir.expand_user();
		settings.log_dir = settings.log_dir.expand_user();
		Ok(settings)
	}

	/// `$FLOWPATH_CONFIG` if set, otherwise `flowpath` under the platform
	/// configuration directory.
	pub fn config_dir() -> PathBuf {
		let var = format!("{}_CONFIG", PROJECT_NAME.to_uppercase());
		match std::env::var_os(&var) {
			Some(dir) => PathBuf::from(dir),
			None => dirs::config_dir()
				.map(|dir| dir.join(PROJECT_NAME))
				.unwrap_or_else(|| PathBuf::from(".")),
		}
	}

	pub fn resolve_path(path: Option<PathBuf>) -> PathBuf {
		match path {
			Some(path) => path.expand_user(),
			None => Self::config_dir().join("settings.toml"),
		}
	}

	pub fn presets_path() -> PathBuf {
		Self::config_dir().join("presets.toml")
	}
}

/// Reads user presets from a TOML file, or JSON when the extension says so.
/// A missing file holds no presets.
pub fn load_presets(path: &Path) -> Result<BTreeMap<String, Preset>> {
	if !path.exists() {
		tracing::debug!(path = %path.display(), "no user presets file");
		return Ok(BTreeMap::new());
	}
	let content = fs::read_to_string(path)?;
	let presets: BTreeMap<String, Preset> = match path.extension().and_then(|ext| ext.to_str()) {
		Some(ext) if ext.eq_ignore_ascii_case("json") => serde_json::from_str(&content)?,
		_ => toml::from_str(&content)?,
	};
	tracing::debug!(path = %path.display(), count = presets.len(), "loaded user presets");
	Ok(presets)
}
