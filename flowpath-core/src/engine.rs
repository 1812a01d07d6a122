use std::path::{PathBuf, MAIN_SEPARATOR_STR};

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::Value;

use crate::{
	config::{
		segment::{Segment, SegmentRule},
		widget::WidgetData,
		Config, ConfigKey, OutputMode,
	},
	graph::seed,
	path::counter,
	string::Sanitize,
	templates::{self, date::format_date, Templater},
};

/// The two strings handed to the image writer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildOutput {
	pub path: String,
	pub filename: String,
}

impl From<BuildOutput> for (String, String) {
	fn from(output: BuildOutput) -> Self {
		(output.path, output.filename)
	}
}

/// Builds the output folder and filename template from an ordered list of
/// segments.
///
/// A build reads the configuration, the optional execution graph, the
/// clock and the listing of the target folder (only when the filename asks
/// for a `{counter}`). It never fails: anything unusable degrades to empty or
/// default strings.
#[derive(Debug, Clone)]
pub struct PathBuilder {
	output_dir: PathBuf,
	now: Option<DateTime<Local>>,
}

impl PathBuilder {
	/// `output_dir` is the folder the writer saves under; counters are
	/// scanned in `output_dir/<built path>`.
	pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
		Self {
			output_dir: output_dir.into(),
			now: None,
		}
	}

	/// Pins the clock used for dates instead of reading it on every build.
	pub fn at(mut self, now: DateTime<Local>) -> Self {
		self.now = Some(now);
		self
	}

	fn now(&self) -> DateTime<Local> {
		self.now.unwrap_or_else(Local::now)
	}

	/// Builds from the raw widget payload. A payload that cannot be parsed
	/// yields two empty strings.
	pub fn build_from_payload(&self, payload: &str, graph: Option<&Value>) -> BuildOutput {
		match payload.parse::<WidgetData>() {
			Ok(data) => self.build_widget(&data, graph),
			Err(e) => {
				tracing::warn!("could not parse widget payload ({} bytes): {e}", payload.len());
				BuildOutput::default()
			}
		}
	}

	pub fn build_widget(&self, data: &WidgetData, graph: Option<&Value>) -> BuildOutput {
		self.build(&data.segments, &data.config, graph)
	}

	#[tracing::instrument(level = "debug", skip_all, fields(segments = segments.len(), graph = graph.is_some()))]
	pub fn build(&self, segments: &[Segment], config: &Config, graph: Option<&Value>) -> BuildOutput {
		let mut config = config.clone();
		// a seed found in the graph always replaces the configured one
		match seed::detect(graph) {
			Some(seed) => {
				tracing::debug!(%seed, "using seed from execution graph");
				config.set(ConfigKey::Seed, seed.to_string());
			}
			None => tracing::debug!(seed = ?config.raw(ConfigKey::Seed), "no seed in execution graph"),
		}

		let now = self.now();
		let templater = Templater::new(&config, now);

		let parts: Vec<String> = segments
			.iter()
			.filter(|segment| {
				if !segment.enabled {
					tracing::debug!(kind = %segment.kind, "skipping disabled segment");
				}
				segment.enabled
			})
			.flat_map(|segment| self.components(segment, &config, &templater, &now))
			.collect();

		let path = if parts.is_empty() {
			OutputMode::fallback_path(config.output_mode()).to_string()
		} else {
			parts.join(MAIN_SEPARATOR_STR)
		};
		let filename = self.filename(&path, &config, &templater);

		tracing::info!(%path, %filename, "built output location");
		BuildOutput { path, filename }
	}

	/// The path components one enabled segment contributes, in order.
	fn components(&self, segment: &Segment, config: &Config, templater: &Templater<'_>, now: &DateTime<Local>) -> Vec<String> {
		let parts = match segment.kind.rule() {
			SegmentRule::Field(key) => vec![config.get(key).trim().sanitize_folder()],
			// left unsanitized so a pattern like `%Y/%m` can nest folders
			SegmentRule::Date => vec![format_date(now, &config.date_format())],
			SegmentRule::Loras => config.loras().iter().map(|lora| lora.sanitize_folder()).collect(),
			SegmentRule::Custom => {
				let value = segment.value.as_deref().unwrap_or_default().trim();
				if value.is_empty() {
					Vec::new()
				} else {
					vec![templater.resolve(value).trim().sanitize_folder()]
				}
			}
			SegmentRule::Ignored => Vec::new(),
		};
		let parts: Vec<String> = parts.into_iter().filter(|part| !part.trim().is_empty()).collect();
		tracing::debug!(kind = %segment.kind, ?parts, "resolved segment");
		parts
	}

	fn filename(&self, path: &str, config: &Config, templater: &Templater<'_>) -> String {
		let template = config.get(ConfigKey::FilenameTemplate);
		if template.is_empty() {
			return String::new();
		}
		let resolved = templater.resolve(&template);
		let resolved = if templates::has_counter(&template) {
			let next = counter::next_counter(&self.output_dir, path, &resolved);
			templates::replace_counter(&resolved, &counter::render(next, config.counter_padding()))
		} else {
			resolved
		};
		resolved.sanitize_filename()
	}
}
