use serde::{Deserialize, Serialize};

use super::{
	segment::{Segment, SegmentKind},
	widget::WidgetData,
	Config, ConfigKey,
};

/// A saved arrangement of segments plus the configuration it was saved with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preset {
	pub segments: Vec<Segment>,
	pub config: Config,
}

impl Preset {
	fn new<const N: usize>(kinds: &[SegmentKind], config: [(ConfigKey, &str); N]) -> Self {
		Self {
			segments: kinds.iter().copied().map(Segment::new).collect(),
			config: config.into_iter().collect(),
		}
	}

	/// Replaces the segments and overlays the preset configuration. Fields
	/// the preset does not mention, like the output mode, are kept.
	pub fn apply(&self, data: &mut WidgetData) {
		data.segments = self.segments.clone();
		data.config.overlay(&self.config);
	}
}

/// Named presets, kept in the order they were first added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Presets(Vec<(String, Preset)>);

impl Presets {
	pub fn builtin() -> Self {
		use ConfigKey::*;
		use SegmentKind as K;

		let blank = Preset::new(
			&[],
			[
				(FileType, "Image"),
				(Category, "Characters"),
				(Name, ""),
				(ContentRating, "SFW"),
				(DateFormat, "%Y-%m-%d"),
				(ProjectName, ""),
				(SeriesName, ""),
				(Resolution, ""),
				(ModelName, ""),
				(LoraName, ""),
				(FilenameTemplate, ""),
			],
		);
		let simple_daily = Preset::new(
			&[K::FileType, K::Category, K::Name, K::Date],
			[(FileType, "Image"), (Category, "Characters"), (ContentRating, "SFW"), (DateFormat, "%Y-%m-%d")],
		);
		let character_work = Preset::new(
			&[K::FileType, K::Category, K::Name, K::ContentRating, K::Date],
			[
				(FileType, "Image"),
				(Category, "Characters"),
				(Name, ""),
				(ContentRating, "SFW"),
				(DateFormat, "%Y-%m-%d"),
			],
		);
		let project_organized = Preset::new(
			&[K::FileType, K::Project, K::Category, K::Name, K::Date],
			[
				(FileType, "Image"),
				(ProjectName, ""),
				(Category, "Characters"),
				(Name, ""),
				(DateFormat, "%Y-%m-%d"),
			],
		);
		let complete_metadata = Preset::new(
			&[K::FileType, K::Category, K::Name, K::Date, K::ContentRating, K::Model, K::Lora, K::Seed],
			[
				(FileType, "Image"),
				(Category, "Characters"),
				(Name, ""),
				(ContentRating, "SFW"),
				(DateFormat, "%Y-%m-%d"),
				(ModelName, ""),
				(LoraName, ""),
			],
		);

		Self(vec![
			("Blank".into(), blank),
			("Simple Daily".into(), simple_daily),
			("Character Work".into(), character_work),
			("Project Organized".into(), project_organized),
			("Complete Metadata".into(), complete_metadata),
		])
	}

	/// Built-in presets, overridden by user presets, overridden by the presets
	/// stored in the payload.
	pub fn merged<U, P>(user: U, payload: P) -> Self
	where
		U: IntoIterator<Item = (String, Preset)>,
		P: IntoIterator<Item = (String, Preset)>,
	{
		let mut presets = Self::builtin();
		presets.extend(user);
		presets.extend(payload);
		presets
	}

	pub fn insert(&mut self, name: String, preset: Preset) {
		match self.0.iter_mut().find(|(existing, _)| *existing == name) {
			Some((_, slot)) => *slot = preset,
			None => self.0.push((name, preset)),
		}
	}

	pub fn get(&self, name: &str) -> Option<&Preset> {
		self.0.iter().find(|(existing, _)| existing == name).map(|(_, preset)| preset)
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(|(name, _)| name.as_str())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Preset)> {
		self.0.iter().map(|(name, preset)| (name.as_str(), preset))
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl Extend<(String, Preset)> for Presets {
	fn extend<T: IntoIterator<Item = (String, Preset)>>(&mut self, iter: T) {
		for (name, preset) in iter {
			self.insert(name, preset);
		}
	}
}
