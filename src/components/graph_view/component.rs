use leptos::html::Div;
use leptos::prelude::*;
use web_sys::HtmlElement;

use super::browser::BrowserEnvironment;
use super::engine::CanvasBackend;
use crate::graph::GraphViewController;

type Controller = GraphViewController<CanvasBackend, BrowserEnvironment>;

/// Text editor plus the graph it describes.
///
/// The graph is drawn from `initial` once the container mounts; afterwards
/// it only changes when "Update Graph" is pressed.
#[component]
pub fn GraphView(
	#[prop(into)] initial: String,
	#[prop(default = 500)] height: u32,
) -> impl IntoView {
	let container_ref = NodeRef::<Div>::new();
	let (input, set_input) = signal(initial.clone());
	let controller: StoredValue<Controller, LocalStorage> = StoredValue::new_local(
		GraphViewController::new(CanvasBackend, BrowserEnvironment::new(container_ref)),
	);

	let render = move |raw: &str| {
		let container = container_ref.get_untracked().map(HtmlElement::from);
		controller.update_value(|c| {
			// Failures are logged by the controller and keep the current graph.
			let _ = c.render_graph(container.as_ref(), raw);
		});
	};

	Effect::new(move |_| {
		if container_ref.get().is_some() {
			render(&initial);
		}
	});

	on_cleanup(move || {
		controller.try_update_value(|c| c.unmount());
	});

	view! {
		<div class="graph-view">
			<textarea
				prop:value=move || input.get()
				on:input=move |ev| set_input.set(event_target_value(&ev))
				rows="10"
				style="width: 100%; font-family: monospace;"
			></textarea>
			<button
				on:click=move |_| render(&input.get_untracked())
				style="margin-top: 10px; border: 1px solid #ccc; padding: 10px 20px; cursor: pointer;"
			>
				"Update Graph"
			</button>
			<div
				node_ref=container_ref
				class="graph-container"
				style=format!("height: {height}px; border: 1px solid #ccc; margin-top: 20px;")
			/>
		</div>
	}
}
