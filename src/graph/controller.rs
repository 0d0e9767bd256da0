use std::rc::Rc;

use log::{error, info};

use super::dataset::GraphData;
use super::document::GraphDocument;
use super::environment::{Cursor, Environment, OpenPolicy};
use super::error::GraphError;
use super::options::RenderOptions;
use super::session::{InteractionHandlers, RenderBackend, RenderSession};

/// Whether a render session exists.
pub enum SessionState<S> {
	/// Nothing has been rendered yet, or the view was unmounted.
	Empty,
	/// A live session owned by the controller.
	Active(S),
}

/// What a successful [`GraphViewController::render_graph`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
	/// A new session was created.
	Created,
	/// The existing session's data was replaced.
	Updated,
}

/// Turns document text into a rendered graph and owns the single session.
pub struct GraphViewController<B: RenderBackend, E> {
	backend: B,
	env: Rc<E>,
	options: RenderOptions,
	session: SessionState<B::Session>,
}

impl<B: RenderBackend, E: Environment + 'static> GraphViewController<B, E> {
	/// A controller in the `Empty` state.
	pub fn new(backend: B, env: E) -> Self {
		Self {
			backend,
			env: Rc::new(env),
			options: RenderOptions::default(),
			session: SessionState::Empty,
		}
	}

	/// Render `raw` into `container`.
	///
	/// The first successful call creates the session; later calls replace
	/// its data in place. Any failure is logged and leaves the current view
	/// exactly as it was.
	pub fn render_graph(
		&mut self,
		container: Option<&B::Container>,
		raw: &str,
	) -> Result<RenderOutcome, GraphError> {
		match self.try_render(container, raw) {
			Ok(outcome) => {
				if let Some(data) = self.data() {
					info!(
						"graph {:?}: {} nodes, {} edges",
						outcome,
						data.nodes.len(),
						data.edges.len()
					);
				}
				Ok(outcome)
			}
			Err(err) => {
				error!("graph update rejected: {err}");
				Err(err)
			}
		}
	}

	fn try_render(
		&mut self,
		container: Option<&B::Container>,
		raw: &str,
	) -> Result<RenderOutcome, GraphError> {
		let container = container.ok_or(GraphError::MissingContainer)?;
		let doc = GraphDocument::parse(raw)?.normalize();
		let data = GraphData::from_document(doc)?;

		match &mut self.session {
			SessionState::Active(session) => {
				session.set_data(data);
				Ok(RenderOutcome::Updated)
			}
			SessionState::Empty => {
				let handlers = self.interaction_handlers();
				let session =
					self.backend
						.create_session(container, data, &self.options, handlers)?;
				self.session = SessionState::Active(session);
				Ok(RenderOutcome::Created)
			}
		}
	}

	fn interaction_handlers(&self) -> InteractionHandlers {
		let (click_env, hover_env, blur_env) =
			(self.env.clone(), self.env.clone(), self.env.clone());

		InteractionHandlers::new(
			move |data, event| {
				let Some(node) = event.nodes.first().and_then(|id| data.nodes.get(id)) else {
					return;
				};
				if let Some(url) = node.link_url() {
					info!("opening {url}");
					click_env.open_link(url, OpenPolicy::ISOLATED);
				}
			},
			// Any known node gets the pointer, linked or not.
			move |data, id| {
				if data.nodes.get(id).is_some() {
					hover_env.set_cursor(Cursor::Pointer);
				}
			},
			move || blur_env.set_cursor(Cursor::Default),
		)
	}

	/// Destroy the active session, if any, and return to `Empty`.
	pub fn unmount(&mut self) {
		if let SessionState::Active(session) =
			std::mem::replace(&mut self.session, SessionState::Empty)
		{
			session.destroy();
			info!("graph session destroyed");
		}
	}

	/// Whether a session exists.
	pub fn is_active(&self) -> bool {
		matches!(self.session, SessionState::Active(_))
	}

	/// The active session.
	pub fn session(&self) -> Option<&B::Session> {
		match &self.session {
			SessionState::Active(session) => Some(session),
			SessionState::Empty => None,
		}
	}

	/// Data shown by the active session.
	pub fn data(&self) -> Option<&GraphData> {
		self.session().map(RenderSession::data)
	}

	/// The configuration sessions are created with.
	pub fn options(&self) -> &RenderOptions {
		&self.options
	}
}
