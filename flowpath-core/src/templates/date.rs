use std::fmt::Write;

use chrono::{DateTime, Local};

use crate::config::DEFAULT_DATE_FORMAT;

/// Formats `now` with a strftime pattern, falling back to `%Y-%m-%d` when
/// the pattern holds a specifier chrono does not understand.
pub fn format_date(now: &DateTime<Local>, pattern: &str) -> String {
	let mut formatted = String::new();
	match write!(formatted, "{}", now.format(pattern)) {
		Ok(()) => formatted,
		Err(_) => {
			tracing::warn!(pattern, "invalid date format, using {DEFAULT_DATE_FORMAT}");
			now.format(DEFAULT_DATE_FORMAT).to_string()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;
	use pretty_assertions::assert_eq;

	fn moment() -> DateTime<Local> {
		Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap()
	}

	#[test]
	fn default_pattern() {
		assert_eq!(format_date(&moment(), "%Y-%m-%d"), "2024-03-09");
	}

	#[test]
	fn custom_pattern() {
		assert_eq!(format_date(&moment(), "%d.%m.%y_%H%M"), "09.03.24_1405");
		assert_eq!(format_date(&moment(), "%Y/%B"), "2024/March");
	}

	#[test]
	fn invalid_pattern_falls_back() {
		assert_eq!(format_date(&moment(), "%Y-%Q"), "2024-03-09");
		assert_eq!(format_date(&moment(), "%"), "2024-03-09");
	}

	#[test]
	fn empty_pattern_is_empty() {
		assert_eq!(format_date(&moment(), ""), "");
	}
}
