use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::{de, ConfigKey};

/// The kinds of path component a segment can stand for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
	Label,
	FileType,
	Project,
	Category,
	Name,
	ContentRating,
	Date,
	Series,
	Resolution,
	Model,
	Seed,
	Lora,
	Custom,
	/// Anything this version does not know. Contributes nothing.
	#[default]
	#[serde(other)]
	Unknown,
}

/// How a segment kind turns the configuration into path components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRule {
	/// One component read from a configuration field.
	Field(ConfigKey),
	/// The current date in the configured format. Not sanitized, so a
	/// format like `%Y/%m` nests folders and `%H:%M` keeps its colon.
	Date,
	/// One component per configured LoRA.
	Loras,
	/// The segment's own text, after template variables are replaced.
	Custom,
	Ignored,
}

impl SegmentKind {
	pub const fn rule(self) -> SegmentRule {
		use SegmentKind::*;
		match self {
			Label => SegmentRule::Field(ConfigKey::NodeLabel),
			FileType => SegmentRule::Field(ConfigKey::FileType),
			Project => SegmentRule::Field(ConfigKey::ProjectName),
			Category => SegmentRule::Field(ConfigKey::Category),
			Name => SegmentRule::Field(ConfigKey::Name),
			ContentRating => SegmentRule::Field(ConfigKey::ContentRating),
			Date => SegmentRule::Date,
			Series => SegmentRule::Field(ConfigKey::SeriesName),
			Resolution => SegmentRule::Field(ConfigKey::Resolution),
			Model => SegmentRule::Field(ConfigKey::ModelName),
			Seed => SegmentRule::Field(ConfigKey::Seed),
			Lora => SegmentRule::Loras,
			Custom => SegmentRule::Custom,
			Unknown => SegmentRule::Ignored,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
	#[serde(rename = "type", default, deserialize_with = "de::kind")]
	pub kind: SegmentKind,
	#[serde(default = "de::enabled", deserialize_with = "de::truthy")]
	pub enabled: bool,
	#[serde(default, deserialize_with = "de::text", skip_serializing_if = "Option::is_none")]
	pub value: Option<String>,
}

impl Segment {
	pub fn new(kind: SegmentKind) -> Self {
		Self {
			kind,
			enabled: true,
			value: None,
		}
	}

	pub fn custom<T: Into<String>>(value: T) -> Self {
		Self {
			kind: SegmentKind::Custom,
			enabled: true,
			value: Some(value.into()),
		}
	}

	pub fn disabled(mut self) -> Self {
		self.enabled = false;
		self
	}
}

impl From<SegmentKind> for Segment {
	fn from(kind: SegmentKind) -> Self {
		Self::new(kind)
	}
}
