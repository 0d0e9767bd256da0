//! The seam between the controller and a rendering engine.

use super::dataset::GraphData;
use super::document::ItemId;
use super::error::GraphError;
use super::options::RenderOptions;

/// A click on the graph surface.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClickEvent {
	/// Nodes under the pointer, topmost first. Empty for a background click.
	pub nodes: Vec<ItemId>,
}

type ClickHandler = Box<dyn Fn(&GraphData, &ClickEvent)>;
type HoverHandler = Box<dyn Fn(&GraphData, &ItemId)>;
type BlurHandler = Box<dyn Fn()>;

/// Callbacks a session invokes on pointer interaction.
///
/// Handed over once, when the session is created. Handlers receive the
/// session's current data so lookups always see the latest update.
pub struct InteractionHandlers {
	on_click: ClickHandler,
	on_hover_node: HoverHandler,
	on_blur_node: BlurHandler,
}

impl InteractionHandlers {
	/// Bundle the three callbacks.
	pub fn new(
		on_click: impl Fn(&GraphData, &ClickEvent) + 'static,
		on_hover_node: impl Fn(&GraphData, &ItemId) + 'static,
		on_blur_node: impl Fn() + 'static,
	) -> Self {
		Self {
			on_click: Box::new(on_click),
			on_hover_node: Box::new(on_hover_node),
			on_blur_node: Box::new(on_blur_node),
		}
	}

	/// Dispatch a click.
	pub fn click(&self, data: &GraphData, event: &ClickEvent) {
		(self.on_click)(data, event);
	}

	/// Dispatch the pointer entering a node.
	pub fn hover_node(&self, data: &GraphData, node: &ItemId) {
		(self.on_hover_node)(data, node);
	}

	/// Dispatch the pointer leaving a node.
	pub fn blur_node(&self) {
		(self.on_blur_node)();
	}
}

/// A live rendering engine instance bound to a container.
pub trait RenderSession {
	/// The data currently shown.
	fn data(&self) -> &GraphData;

	/// Swap the shown data in place, keeping view and simulation state.
	fn set_data(&mut self, data: GraphData);

	/// Release timers, listeners and DOM the session holds.
	fn destroy(self);
}

/// Factory for render sessions.
pub trait RenderBackend {
	/// What a session draws into.
	type Container;
	/// The session type this backend creates.
	type Session: RenderSession;

	/// Create a session showing `data`, wired to `handlers`.
	fn create_session(
		&mut self,
		container: &Self::Container,
		data: GraphData,
		options: &RenderOptions,
		handlers: InteractionHandlers,
	) -> Result<Self::Session, GraphError>;
}
