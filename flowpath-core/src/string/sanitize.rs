use lazy_static::lazy_static;
use regex::Regex;

/// Characters that no path component may carry on any of the supported platforms.
pub const ILLEGAL_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

lazy_static! {
	static ref SPACE_RUNS: Regex = Regex::new(r" {2,}").unwrap(); // a panic here indicates a compile-time bug
	static ref UNDERSCORE_RUNS: Regex = Regex::new(r"_{2,}").unwrap();
}

pub trait Sanitize {
	/// Makes a single folder name safe to join into a path.
	fn sanitize_folder(&self) -> String;
	/// Same rules as [`Sanitize::sanitize_folder`]. Every `%` is kept verbatim
	/// so that placeholders like `%seed` reach the image writer untouched.
	fn sanitize_filename(&self) -> String;
}

impl<T: AsRef<str>> Sanitize for T {
	fn sanitize_folder(&self) -> String {
		scrub(self.as_ref())
	}

	fn sanitize_filename(&self) -> String {
		scrub(self.as_ref())
	}
}

fn scrub(name: &str) -> String {
	let replaced: String = name.chars().map(|c| if ILLEGAL_CHARS.contains(&c) { '_' } else { c }).collect();
	let trimmed = replaced.trim_matches(|c| c == ' ' || c == '.');
	let spaces = SPACE_RUNS.replace_all(trimmed, " ");
	UNDERSCORE_RUNS.replace_all(&spaces, "_").into_owned()
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn replaces_illegal_chars() {
		assert_eq!("a<b>c:d\"e".sanitize_folder(), "a_b_c_d_e");
		assert_eq!("x/y\\z|w?v*u".sanitize_folder(), "x_y_z_w_v_u");
	}

	#[test]
	fn trims_spaces_and_dots() {
		assert_eq!("  .My Folder.. ".sanitize_folder(), "My Folder");
		assert_eq!("...".sanitize_folder(), "");
	}

	#[test]
	fn collapses_runs() {
		assert_eq!("a    b".sanitize_folder(), "a b");
		assert_eq!("a____b".sanitize_folder(), "a_b");
		// adjacent illegal characters become a single underscore
		assert_eq!("a<>:b".sanitize_folder(), "a_b");
	}

	#[test]
	fn empty_input() {
		assert_eq!("".sanitize_folder(), "");
		assert_eq!("".sanitize_filename(), "");
	}

	#[test]
	fn output_never_contains_forbidden_sequences() {
		let inputs = [" <<a  b>> ", "..::..", "*?|\\/", "__ __ __", "x .  . y", "%seed__%time"];
		for input in inputs {
			for output in [input.sanitize_folder(), input.sanitize_filename()] {
				assert!(!output.contains(&ILLEGAL_CHARS[..]), "{output:?}");
				assert!(!output.contains("  "), "{output:?}");
				assert!(!output.contains("__"), "{output:?}");
				assert!(!output.starts_with([' ', '.']), "{output:?}");
				assert!(!output.ends_with([' ', '.']), "{output:?}");
			}
		}
	}

	#[test]
	fn filename_keeps_percent_placeholders() {
		assert_eq!("img_%seed_%time".sanitize_filename(), "img_%seed_%time");
		assert_eq!(" %counter: %model? ".sanitize_filename(), "%counter_ %model_");
		assert_eq!("100%%".sanitize_filename(), "100%%");
	}
}
