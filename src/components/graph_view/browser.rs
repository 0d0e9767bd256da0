use leptos::html::Div;
use leptos::prelude::*;
use log::warn;
use web_sys::HtmlElement;

use crate::graph::{Cursor, Environment, OpenPolicy};

/// Unnamed target: every link gets a fresh browsing context.
const NEW_CONTEXT: &str = "_blank";

/// Side effects backed by `window` and the graph container element.
pub struct BrowserEnvironment {
	container: NodeRef<Div>,
}

impl BrowserEnvironment {
	pub fn new(container: NodeRef<Div>) -> Self {
		Self { container }
	}
}

impl Environment for BrowserEnvironment {
	fn open_link(&self, url: &str, policy: OpenPolicy) {
		let Some(window) = web_sys::window() else {
			warn!("no window to open {url} in");
			return;
		};
		if let Err(err) =
			window.open_with_url_and_target_and_features(url, NEW_CONTEXT, &policy.features())
		{
			warn!("failed to open {url}: {err:?}");
		}
	}

	fn set_cursor(&self, cursor: Cursor) {
		if let Some(container) = self.container.get_untracked() {
			apply_cursor(&container, cursor);
		}
	}
}

fn apply_cursor(el: &HtmlElement, cursor: Cursor) {
	// The prelude's `ElementExt::style` shadows the DOM getter.
	if let Err(err) = HtmlElement::style(el).set_property("cursor", cursor.as_css()) {
		warn!("failed to set cursor: {err:?}");
	}
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
	use wasm_bindgen::JsCast;
	use wasm_bindgen_test::*;

	use super::*;

	wasm_bindgen_test_configure!(run_in_browser);

	#[wasm_bindgen_test]
	fn cursor_lands_on_the_element_style() {
		let document = web_sys::window().unwrap().document().unwrap();
		let el: HtmlElement = document.create_element("div").unwrap().unchecked_into();

		apply_cursor(&el, Cursor::Pointer);
		assert_eq!(HtmlElement::style(&el).get_property_value("cursor").unwrap(), "pointer");

		apply_cursor(&el, Cursor::Default);
		assert_eq!(HtmlElement::style(&el).get_property_value("cursor").unwrap(), "default");
	}
}
