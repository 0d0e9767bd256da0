//! Side effects the controller performs on its surroundings.

/// Cursor styles the controller sets on the container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cursor {
	/// The platform default arrow.
	Default,
	/// The hand shown over clickable things.
	Pointer,
}

impl Cursor {
	/// CSS `cursor` value.
	pub fn as_css(self) -> &'static str {
		match self {
			Cursor::Default => "default",
			Cursor::Pointer => "pointer",
		}
	}
}

/// Isolation requested when opening a link in a new browsing context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpenPolicy {
	/// The new context gets no `window.opener`.
	pub no_opener: bool,
	/// No `Referer` header is sent.
	pub no_referrer: bool,
}

impl OpenPolicy {
	/// New, unnamed, fully isolated context.
	pub const ISOLATED: OpenPolicy = OpenPolicy {
		no_opener: true,
		no_referrer: true,
	};

	/// Window feature string, e.g. `noopener,noreferrer`.
	pub fn features(self) -> String {
		let mut features = Vec::new();
		if self.no_opener {
			features.push("noopener");
		}
		if self.no_referrer {
			features.push("noreferrer");
		}
		features.join(",")
	}
}

/// Capability interface for the view's side effects.
///
/// The browser implementation talks to `window` and the container element;
/// tests substitute a recorder.
pub trait Environment {
	/// Open `url` in a new browsing context.
	fn open_link(&self, url: &str, policy: OpenPolicy);

	/// Change the container's cursor.
	fn set_cursor(&self, cursor: Cursor);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn isolated_policy_features() {
		assert_eq!(OpenPolicy::ISOLATED.features(), "noopener,noreferrer");
	}

	#[test]
	fn cursor_css_values() {
		assert_eq!(Cursor::Pointer.as_css(), "pointer");
		assert_eq!(Cursor::Default.as_css(), "default");
	}
}
