use std::path::PathBuf;
use thiserror::Error;

use crate::graph::GraphError;

/// The primary error type for the fallible internals of the builder.
///
/// None of these ever reach the caller of `PathBuilder::build`: the builder
/// logs them and degrades to empty or default strings instead.
#[derive(Error, Debug)]
pub enum Error {
	#[error("Could not parse widget payload")]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Graph(#[from] GraphError),

	#[error("Could not parse presets file")]
	Toml(#[from] toml::de::Error),

	#[error("Could not load settings")]
	Settings(#[from] config::ConfigError),

	#[error("Could not list `{path:?}`")]
	ListDir {
		#[source]
		source: std::io::Error,
		path: PathBuf,
	},

	#[error("Invalid counter pattern `{pattern}`")]
	CounterPattern {
		#[source]
		source: regex::Error,
		pattern: String,
	},

	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
