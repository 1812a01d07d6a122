use std::path::PathBuf;

/// Home-relative paths as written in settings files and on the command line.
pub trait Expand {
	/// Resolves a leading `~` component against the home directory. `~user`
	/// forms are not supported and, like every other path, come back as given.
	fn expand_user(self) -> PathBuf;
}

impl<T: Into<PathBuf>> Expand for T {
	fn expand_user(self) -> PathBuf {
		let path = self.into();
		let Ok(rest) = path.strip_prefix("~") else {
			return path;
		};
		match dirs::home_dir() {
			Some(home) if rest.as_os_str().is_empty() => home,
			Some(home) => home.join(rest),
			None => path,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn home() -> PathBuf {
		dirs::home_dir().unwrap()
	}

	#[test]
	fn output_dir_under_home() {
		assert_eq!("~/renders/flowpath".expand_user(), home().join("renders").join("flowpath"));
		assert_eq!(PathBuf::from("~").expand_user(), home());
	}

	#[test]
	fn only_a_whole_tilde_component_expands() {
		for given in ["renders~", "~user/renders", "renders/~/x", "/srv/comfy/output", "output"] {
			assert_eq!(given.expand_user(), PathBuf::from(given), "{given}");
		}
	}

	#[test]
	fn expanding_twice_is_stable() {
		let once = "~/renders".expand_user();
		assert_eq!(once.clone().expand_user(), once);
	}
}
