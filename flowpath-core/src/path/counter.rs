use std::{
	fs,
	path::{Path, PathBuf},
};

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::{Error, Result};

lazy_static! {
	static ref TOKENS: Regex = Regex::new(r"(?i)\{counter\}|%\w+").unwrap(); // a panic here indicates a compile-time bug
	static ref IMAGE_EXTENSION: Regex = Regex::new(r"(?i)\.(?:png|jpe?g|webp|gif|bmp|tiff?)$").unwrap();
}

/// Builds the file name matcher for a filename pattern.
///
/// The first `{counter}` becomes the captured digits, further ones match any
/// digits, `%word` placeholders left for the image writer match any run of
/// characters without a path separator, and the writer's optional `_NN`
/// suffix plus a mandatory extension are accepted at the end. A pattern that
/// already ends in an image extension only matches that extension; any other
/// trailing dot (`09.03.2024`, `v1.5`) is part of the name.
pub fn matcher(pattern: &str) -> Result<Regex> {
	let (stem, extension) = match IMAGE_EXTENSION.find(pattern) {
		Some(ext) => (&pattern[..ext.start()], regex::escape(ext.as_str())),
		None => (pattern, r"\.[A-Za-z0-9]+".to_string()),
	};
	let mut expression = String::from("(?i)^");
	let mut captured = false;
	let mut last = 0;
	for token in TOKENS.find_iter(stem) {
		expression.push_str(&regex::escape(&stem[last..token.start()]));
		if token.as_str().starts_with('%') {
			expression.push_str(r"[^/\\]*");
		} else if captured {
			expression.push_str(r"\d+");
		} else {
			expression.push_str(r"(\d+)");
			captured = true;
		}
		last = token.end();
	}
	expression.push_str(&regex::escape(&stem[last..]));
	expression.push_str(r"(?:_\d+)?");
	expression.push_str(&extension);
	expression.push('$');
	Regex::new(&expression).map_err(|source| Error::CounterPattern {
		source,
		pattern: pattern.to_string(),
	})
}

/// The directory that `path` (as built from the segments) names under `base_dir`.
pub fn target_dir(base_dir: &Path, path: &str) -> PathBuf {
	base_dir.join(path.trim_start_matches(['/', '\\']))
}

/// The highest counter among the immediate entries of `dir` matching `matcher`.
pub fn highest(dir: &Path, matcher: &Regex) -> Result<Option<u64>> {
	let entries = fs::read_dir(dir).map_err(|source| Error::ListDir {
		source,
		path: dir.to_path_buf(),
	})?;
	let highest = entries
		.filter_map(|entry| entry.ok())
		.filter_map(|entry| {
			let name = entry.file_name();
			let captures = matcher.captures(name.to_str()?)?;
			captures.get(1)?.as_str().parse::<u64>().ok()
		})
		.max();
	Ok(highest)
}

/// The next unused counter for files named after `pattern` in
/// `base_dir/path`. Starts at 1 when the directory does not exist, holds no
/// matching file, or cannot be listed.
#[tracing::instrument(level = "debug", ret)]
pub fn next_counter(base_dir: &Path, path: &str, pattern: &str) -> u64 {
	let dir = target_dir(base_dir, path);
	if !dir.is_dir() {
		return 1;
	}
	let highest = matcher(pattern).and_then(|matcher| highest(&dir, &matcher));
	match highest {
		Ok(Some(n)) => n.saturating_add(1),
		Ok(None) => 1,
		Err(e) => {
			tracing::warn!("counter scan failed, starting at 1: {e}");
			1
		}
	}
}

/// The counter zero-padded to `padding` digits.
pub fn render(counter: u64, padding: usize) -> String {
	format!("{counter:0padding$}")
}
