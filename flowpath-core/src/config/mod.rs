use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

pub mod de;
pub mod lora;
pub mod presets;
pub mod segment;
pub mod widget;

/// Every configuration field the builder reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ConfigKey {
	NodeLabel,
	FileType,
	ProjectName,
	Category,
	Name,
	ContentRating,
	DateFormat,
	SeriesName,
	Resolution,
	ModelName,
	LoraName,
	Seed,
	OutputMode,
	FilenameTemplate,
	CounterPadding,
}

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_COUNTER_PADDING: usize = 4;

/// Values used for a field that the configuration does not carry at all.
/// A field that is present but empty keeps its empty value.
pub const DEFAULTS: [(ConfigKey, &str); 6] = [
	(ConfigKey::FileType, "Image"),
	(ConfigKey::Category, "Characters"),
	(ConfigKey::ContentRating, "SFW"),
	(ConfigKey::DateFormat, DEFAULT_DATE_FORMAT),
	(ConfigKey::OutputMode, "saveImage"),
	(ConfigKey::CounterPadding, "4"),
];

impl ConfigKey {
	pub fn default_value(self) -> Option<&'static str> {
		DEFAULTS.iter().find(|(key, _)| *key == self).map(|(_, value)| *value)
	}
}

/// Which downstream writer consumes the outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
pub enum OutputMode {
	/// The stock image writer: the path doubles as the filename prefix.
	#[strum(serialize = "saveImage")]
	#[serde(rename = "saveImage")]
	SaveImage,
	/// An external image saver writing relative to its own output folder.
	#[strum(serialize = "imageSaver")]
	#[serde(rename = "imageSaver")]
	ImageSaver,
}

impl OutputMode {
	/// The path emitted when no segment produced a component.
	pub fn fallback_path(mode: Option<Self>) -> &'static str {
		match mode {
			Some(OutputMode::SaveImage) => "ComfyUI",
			_ => "",
		}
	}
}

/// The string-keyed configuration map sent along with the segments.
///
/// Values are kept as raw JSON so that numbers, strings and lists written by
/// different widget versions are all readable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config(Map<String, Value>);

impl Config {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn value(&self, key: ConfigKey) -> Option<&Value> {
		self.0.get(key.as_ref()).filter(|value| !value.is_null())
	}

	/// The configured text for `key`, without consulting [`DEFAULTS`].
	pub fn raw(&self, key: ConfigKey) -> Option<String> {
		self.value(key).and_then(text)
	}

	/// The configured text for `key`, falling back to [`DEFAULTS`] and then to `""`.
	pub fn get(&self, key: ConfigKey) -> String {
		match self.value(key) {
			Some(value) => text(value).unwrap_or_default(),
			None => key.default_value().unwrap_or_default().to_string(),
		}
	}

	pub fn is_blank(&self, key: ConfigKey) -> bool {
		self.raw(key).map_or(true, |value| value.trim().is_empty())
	}

	pub fn set<V: Into<Value>>(&mut self, key: ConfigKey, value: V) {
		self.0.insert(key.to_string(), value.into());
	}

	pub fn remove(&mut self, key: ConfigKey) -> Option<Value> {
		self.0.remove(key.as_ref())
	}

	/// Copies every entry of `other` over this configuration.
	pub fn overlay(&mut self, other: &Config) {
		for (key, value) in other.0.iter() {
			self.0.insert(key.clone(), value.clone());
		}
	}

	pub fn output_mode(&self) -> Option<OutputMode> {
		self.get(ConfigKey::OutputMode).parse().ok()
	}

	pub fn date_format(&self) -> String {
		self.get(ConfigKey::DateFormat)
	}

	pub fn counter_padding(&self) -> usize {
		self.get(ConfigKey::CounterPadding).trim().parse().unwrap_or(DEFAULT_COUNTER_PADDING)
	}

	/// The LoRA names that should each become a folder.
	///
	/// A list yields one name per entry, a string containing `" | "` is split
	/// on it, and any other value is a single name. Blank names are dropped.
	pub fn loras(&self) -> Vec<String> {
		let names: Vec<String> = match self.value(ConfigKey::LoraName) {
			None => Vec::new(),
			Some(Value::Array(items)) => items.iter().filter_map(text).collect(),
			Some(Value::String(s)) if s.contains(" | ") => s.split(" | ").map(str::to_string).collect(),
			Some(value) => text(value).into_iter().collect(),
		};
		names
			.into_iter()
			.map(|name| name.trim().to_string())
			.filter(|name| !name.is_empty())
			.collect()
	}

	/// Configured keys this builder knows about, in declaration order.
	pub fn known_keys(&self) -> impl Iterator<Item = ConfigKey> + '_ {
		ConfigKey::iter().filter(|key| self.0.contains_key(key.as_ref()))
	}
}

impl<V: Into<Value>> FromIterator<(ConfigKey, V)> for Config {
	fn from_iter<I: IntoIterator<Item = (ConfigKey, V)>>(iter: I) -> Self {
		let mut config = Config::new();
		for (key, value) in iter {
			config.set(key, value);
		}
		config
	}
}

impl From<Map<String, Value>> for Config {
	fn from(map: Map<String, Value>) -> Self {
		Self(map)
	}
}

/// Reads a JSON value as configuration text. `null` reads as nothing,
/// lists read as their non-empty entries joined with `,`.
pub fn text(value: &Value) -> Option<String> {
	match value {
		Value::Null => None,
		Value::String(s) => Some(s.clone()),
		Value::Bool(b) => Some(b.to_string()),
		Value::Number(n) => Some(n.to_string()),
		Value::Array(items) => Some(
			items
				.iter()
				.filter_map(text)
				.filter(|item| !item.trim().is_empty())
				.collect::<Vec<_>>()
				.join(","),
		),
		Value::Object(_) => Some(value.to_string()),
	}
}
