use std::{collections::BTreeMap, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{presets::Preset, segment::Segment, Config};
use crate::errors::Result;

/// Everything the builder widget stores on the node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetData {
	pub segments: Vec<Segment>,
	pub config: Config,
	#[serde(skip_serializing_if = "BTreeMap::is_empty")]
	pub presets: BTreeMap<String, Preset>,
}

impl WidgetData {
	pub fn new(segments: Vec<Segment>, config: Config) -> Self {
		Self {
			segments,
			config,
			presets: BTreeMap::new(),
		}
	}

	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string_pretty(self)?)
	}
}

impl FromStr for WidgetData {
	type Err = crate::errors::Error;

	fn from_str(s: &str) -> Result<Self> {
		Ok(serde_json::from_str(s)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::{segment::SegmentKind, ConfigKey};
	use pretty_assertions::assert_eq;

	#[test]
	fn parses_full_payload() {
		let data: WidgetData = r#"{
			"segments": [{ "type": "category", "enabled": true }, { "type": "custom", "value": "{name}" }],
			"config": { "category": "Scenes", "name": "Alice" },
			"presets": { "Mine": { "segments": [{ "type": "date" }] } }
		}"#
		.parse()
		.unwrap();
		assert_eq!(data.segments[0], Segment::new(SegmentKind::Category));
		assert_eq!(data.segments[1], Segment::custom("{name}"));
		assert_eq!(data.config.get(ConfigKey::Category), "Scenes");
		assert_eq!(data.presets["Mine"].segments, vec![Segment::new(SegmentKind::Date)]);
	}

	#[test]
	fn empty_object_is_empty_payload() {
		let data: WidgetData = "{}".parse().unwrap();
		assert_eq!(data, WidgetData::default());
	}

	#[test]
	fn rejects_malformed_payloads() {
		for payload in ["", "{", "null", "42", r#"{"config": []}"#, r#"{"segments": ["date"]}"#] {
			assert!(payload.parse::<WidgetData>().is_err(), "{payload}");
		}
	}

	#[test]
	fn serializes_back() {
		let data = WidgetData::new(vec![Segment::new(SegmentKind::Seed)], [(ConfigKey::Seed, "9")].into_iter().collect());
		let json = data.to_json().unwrap();
		assert_eq!(json.parse::<WidgetData>().unwrap(), data);
	}
}
