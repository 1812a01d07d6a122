//! Lenient field readers for payloads written by older or hand-edited widgets.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::segment::SegmentKind;

pub fn enabled() -> bool {
	true
}

/// Reads a flag the way a loosely typed widget meant it: `false`, `0`, `""`
/// and `null` switch it off, anything else switches it on.
pub fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Value::deserialize(deserializer)?;
	Ok(match value {
		Value::Null => false,
		Value::Bool(b) => b,
		Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
		Value::String(s) => !s.is_empty(),
		Value::Array(items) => !items.is_empty(),
		Value::Object(map) => !map.is_empty(),
	})
}

/// Reads a segment `type`. Anything that is not the name of a known kind,
/// `null` and numbers included, reads as [`SegmentKind::Unknown`].
pub fn kind<'de, D>(deserializer: D) -> Result<SegmentKind, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Value::deserialize(deserializer)?;
	Ok(value.as_str().and_then(|name| name.parse().ok()).unwrap_or_default())
}

/// Reads any scalar as text; `null` reads as nothing.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Value::deserialize(deserializer)?;
	Ok(super::text(&value))
}
