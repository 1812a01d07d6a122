use chrono::{DateTime, Local};

use super::date::format_date;
use crate::config::{Config, ConfigKey};

/// What a `{placeholder}` stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
	Field(ConfigKey),
	/// The rating itself when the configured content rating equals it, else nothing.
	RatingIs(&'static str),
	Date,
	Year,
	Month,
	Day,
}

/// The fixed placeholder vocabulary. Names are matched case-insensitively.
pub const VOCABULARY: [(&str, Variable); 21] = [
	("label", Variable::Field(ConfigKey::NodeLabel)),
	("output", Variable::Field(ConfigKey::NodeLabel)),
	("filetype", Variable::Field(ConfigKey::FileType)),
	("file_type", Variable::Field(ConfigKey::FileType)),
	("category", Variable::Field(ConfigKey::Category)),
	("name", Variable::Field(ConfigKey::Name)),
	("content_rating", Variable::Field(ConfigKey::ContentRating)),
	("rating", Variable::Field(ConfigKey::ContentRating)),
	("sfw", Variable::RatingIs("SFW")),
	("nsfw", Variable::RatingIs("NSFW")),
	("project", Variable::Field(ConfigKey::ProjectName)),
	("series", Variable::Field(ConfigKey::SeriesName)),
	("resolution", Variable::Field(ConfigKey::Resolution)),
	("res", Variable::Field(ConfigKey::Resolution)),
	("model", Variable::Field(ConfigKey::ModelName)),
	("lora", Variable::Field(ConfigKey::LoraName)),
	("seed", Variable::Field(ConfigKey::Seed)),
	("date", Variable::Date),
	("year", Variable::Year),
	("month", Variable::Month),
	("day", Variable::Day),
];

impl Variable {
	pub fn lookup(name: &str) -> Option<Self> {
		let name = name.to_ascii_lowercase();
		VOCABULARY.iter().find(|(known, _)| *known == name).map(|(_, variable)| *variable)
	}

	pub fn value(self, config: &Config, now: &DateTime<Local>) -> String {
		match self {
			Variable::Field(key) => config.get(key),
			// compared against the configured rating only, the default does not count
			Variable::RatingIs(rating) => match config.raw(ConfigKey::ContentRating) {
				Some(configured) if configured == rating => rating.to_string(),
				_ => String::new(),
			},
			Variable::Date => format_date(now, &config.date_format()),
			Variable::Year => now.format("%Y").to_string(),
			Variable::Month => now.format("%m").to_string(),
			Variable::Day => now.format("%d").to_string(),
		}
	}
}
