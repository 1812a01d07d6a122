use chrono::{DateTime, Local};
use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::config::Config;

pub mod date;
pub mod variable;

pub use variable::Variable;

lazy_static! {
	static ref PLACEHOLDER: Regex = Regex::new(r"\{(\w+)\}").unwrap(); // a panic here indicates a compile-time bug
	pub static ref COUNTER: Regex = Regex::new(r"(?i)\{counter\}").unwrap();
}

/// Replaces `{placeholder}` tokens with configuration values.
///
/// This is plain token substitution, not a template language: there is no
/// escaping and no nesting. Unknown placeholders, `{counter}` among them,
/// are left exactly as written, and `%word` tokens are never looked at.
#[derive(Debug, Clone)]
pub struct Templater<'a> {
	config: &'a Config,
	now: DateTime<Local>,
}

impl<'a> Templater<'a> {
	pub fn new(config: &'a Config, now: DateTime<Local>) -> Self {
		Self { config, now }
	}

	pub fn resolve(&self, template: &str) -> String {
		if template.is_empty() {
			return String::new();
		}
		PLACEHOLDER
			.replace_all(template, |caps: &Captures| match Variable::lookup(&caps[1]) {
				Some(variable) => variable.value(self.config, &self.now),
				None => caps[0].to_string(),
			})
			.into_owned()
	}
}

pub fn has_counter(template: &str) -> bool {
	COUNTER.is_match(template)
}

pub fn replace_counter(template: &str, counter: &str) -> String {
	COUNTER.replace_all(template, regex::NoExpand(counter)).into_owned()
}
