use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Event, HtmlCanvasElement, HtmlElement, MouseEvent, WheelEvent,
};

use super::render;
use super::state::{GraphViewState, HoverChange, STEP};
use crate::graph::{
	ClickEvent, GraphData, GraphError, InteractionHandlers, RenderBackend, RenderOptions,
	RenderSession,
};

const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

fn dom_err(err: JsValue) -> GraphError {
	GraphError::Dom(format!("{err:?}"))
}

/// Creates canvas sessions inside a container element.
#[derive(Clone, Copy, Debug, Default)]
pub struct CanvasBackend;

impl RenderBackend for CanvasBackend {
	type Container = HtmlElement;
	type Session = CanvasSession;

	fn create_session(
		&mut self,
		container: &HtmlElement,
		data: GraphData,
		options: &RenderOptions,
		handlers: InteractionHandlers,
	) -> Result<CanvasSession, GraphError> {
		let window = web_sys::window().ok_or_else(|| GraphError::Dom("no window".into()))?;
		let document = window
			.document()
			.ok_or_else(|| GraphError::Dom("no document".into()))?;
		let canvas: HtmlCanvasElement = document
			.create_element("canvas")
			.map_err(dom_err)?
			.dyn_into()
			.map_err(|_| GraphError::Dom("created element is not a canvas".into()))?;
		let _ = canvas.style().set_property("display", "block");

		let (w, h) = container_size(container);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.map_err(dom_err)?
			.ok_or_else(|| GraphError::Dom("2d context unavailable".into()))?
			.dyn_into()
			.map_err(|_| GraphError::Dom("unexpected context type".into()))?;

		let mut state = GraphViewState::new(&data, options, w, h);
		state.stabilize();

		let mut session = CanvasSession::new(container.clone(), canvas, data, state, handlers);
		if let Err(err) = session.mount() {
			session.release();
			return Err(err);
		}
		FrameLoop::start(&session.frames, session.shared.clone(), ctx);
		debug!("canvas session created ({w}x{h})");
		Ok(session)
	}
}

fn container_size(container: &HtmlElement) -> (f64, f64) {
	let (w, h) = (container.client_width(), container.client_height());
	if w > 0 && h > 0 {
		(w as f64, h as f64)
	} else {
		FALLBACK_SIZE
	}
}

/// State the DOM callbacks share with the session.
struct Shared {
	state: RefCell<GraphViewState>,
	data: RefCell<Rc<GraphData>>,
	handlers: InteractionHandlers,
}

impl Shared {
	fn data(&self) -> Rc<GraphData> {
		self.data.borrow().clone()
	}

	/// Dispatch hover transitions once the state borrow is released.
	fn dispatch_hover(&self, change: HoverChange) {
		if !change.left && change.entered.is_none() {
			return;
		}
		let data = self.data();
		if change.left {
			self.handlers.blur_node();
		}
		if let Some(id) = change.entered {
			self.handlers.hover_node(&data, &id);
		}
	}
}

struct Listener {
	event: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

/// Request-animation-frame loop driving the simulation and redraws.
struct FrameLoop {
	callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
	handle: Cell<Option<i32>>,
	last: Cell<Option<f64>>,
}

impl FrameLoop {
	fn new() -> Rc<Self> {
		Rc::new(Self {
			callback: RefCell::new(None),
			handle: Cell::new(None),
			last: Cell::new(None),
		})
	}

	fn start(this: &Rc<Self>, shared: Rc<Shared>, ctx: CanvasRenderingContext2d) {
		let frames: Weak<Self> = Rc::downgrade(this);
		*this.callback.borrow_mut() = Some(Closure::new(move |now: f64| {
			let Some(frames) = frames.upgrade() else {
				return;
			};
			let dt = frames
				.last
				.replace(Some(now))
				.map(|prev| ((now - prev) / 1000.0).clamp(0.0, 0.1))
				.unwrap_or(STEP);
			{
				let mut state = shared.state.borrow_mut();
				state.tick(dt);
				render::render(&state, &ctx);
			}
			frames.request();
		}));
		this.request();
	}

	fn request(&self) {
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Some(ref cb) = *self.callback.borrow() {
			self.handle
				.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
	}

	fn stop(&self) {
		if let (Some(handle), Some(window)) = (self.handle.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(handle);
		}
		self.callback.borrow_mut().take();
	}
}

/// A live canvas drawing one graph inside its container.
pub struct CanvasSession {
	container: HtmlElement,
	canvas: HtmlCanvasElement,
	data: Rc<GraphData>,
	shared: Rc<Shared>,
	listeners: Vec<Listener>,
	resize: Option<Closure<dyn FnMut()>>,
	frames: Rc<FrameLoop>,
}

impl CanvasSession {
	fn new(
		container: HtmlElement,
		canvas: HtmlCanvasElement,
		data: GraphData,
		state: GraphViewState,
		handlers: InteractionHandlers,
	) -> Self {
		let data = Rc::new(data);
		let shared = Rc::new(Shared {
			state: RefCell::new(state),
			data: RefCell::new(data.clone()),
			handlers,
		});
		Self {
			container,
			canvas,
			data,
			shared,
			listeners: Vec::new(),
			resize: None,
			frames: FrameLoop::new(),
		}
	}

	/// Wire listeners, then put the canvas on the page. The canvas only
	/// becomes visible once every listener is in place.
	fn mount(&mut self) -> Result<(), GraphError> {
		self.attach_listeners()?;
		self.container.append_child(&self.canvas).map_err(dom_err)?;
		Ok(())
	}

	/// Undo whatever `mount` and the frame loop set up. Safe on a
	/// partially mounted session.
	fn release(&mut self) {
		self.frames.stop();
		for Listener { event, callback } in self.listeners.drain(..) {
			let _ = self
				.canvas
				.remove_event_listener_with_callback(event, callback.as_ref().unchecked_ref());
		}
		if let Some(resize) = self.resize.take() {
			if let Some(window) = web_sys::window() {
				let _ = window
					.remove_event_listener_with_callback("resize", resize.as_ref().unchecked_ref());
			}
		}
		if self.canvas.parent_node().is_some() && self.container.remove_child(&self.canvas).is_err()
		{
			warn!("canvas is no longer a child of its container");
		}
	}

	fn attach_listeners(&mut self) -> Result<(), GraphError> {
		let canvas = self.canvas.clone();
		let position = move |ev: &MouseEvent| {
			let rect = canvas.get_bounding_client_rect();
			(
				ev.client_x() as f64 - rect.left(),
				ev.client_y() as f64 - rect.top(),
			)
		};

		let (shared, pos) = (self.shared.clone(), position.clone());
		self.listen("mousedown", move |ev| {
			let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
				return;
			};
			let (x, y) = pos(ev);
			let mut s = shared.state.borrow_mut();
			s.begin_press(x, y);
			match s.node_at_position(x, y) {
				Some(idx) => s.begin_drag(idx, x, y),
				None => s.begin_pan(x, y),
			}
		})?;

		let (shared, pos) = (self.shared.clone(), position.clone());
		self.listen("mousemove", move |ev| {
			let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
				return;
			};
			let (x, y) = pos(ev);
			let change = {
				let mut s = shared.state.borrow_mut();
				let change = if !s.drag.active && s.options.interaction.hover {
					let hovered = s.node_at_position(x, y);
					s.set_hover(hovered)
				} else {
					HoverChange::default()
				};
				s.pointer_moved(x, y);
				change
			};
			shared.dispatch_hover(change);
		})?;

		let (shared, pos) = (self.shared.clone(), position);
		self.listen("mouseup", move |ev| {
			let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
				return;
			};
			let (x, y) = pos(ev);
			let click = {
				let mut s = shared.state.borrow_mut();
				let hit = s.node_at_position(x, y).and_then(|idx| s.node_id(idx));
				let clicked = s.release();
				clicked.then(|| ClickEvent {
					nodes: hit.into_iter().collect(),
				})
			};
			if let Some(click) = click {
				shared.handlers.click(&shared.data(), &click);
			}
		})?;

		let shared = self.shared.clone();
		self.listen("mouseleave", move |_| {
			let change = {
				let mut s = shared.state.borrow_mut();
				s.release();
				s.set_hover(None)
			};
			shared.dispatch_hover(change);
		})?;

		let (shared, canvas) = (self.shared.clone(), self.canvas.clone());
		self.listen("wheel", move |ev| {
			let Some(ev) = ev.dyn_ref::<WheelEvent>() else {
				return;
			};
			ev.prevent_default();
			let rect = canvas.get_bounding_client_rect();
			let (x, y) = (
				ev.client_x() as f64 - rect.left(),
				ev.client_y() as f64 - rect.top(),
			);
			shared.state.borrow_mut().zoom(x, y, ev.delta_y());
		})?;

		let (shared, canvas, container) = (
			self.shared.clone(),
			self.canvas.clone(),
			self.container.clone(),
		);
		let resize = Closure::<dyn FnMut()>::new(move || {
			let (w, h) = container_size(&container);
			canvas.set_width(w as u32);
			canvas.set_height(h as u32);
			shared.state.borrow_mut().resize(w, h);
		});
		if let Some(window) = web_sys::window() {
			window
				.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())
				.map_err(dom_err)?;
		}
		self.resize = Some(resize);
		Ok(())
	}

	fn listen(
		&mut self,
		event: &'static str,
		f: impl FnMut(Event) + 'static,
	) -> Result<(), GraphError> {
		let callback = Closure::<dyn FnMut(Event)>::new(f);
		self.canvas
			.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
			.map_err(dom_err)?;
		self.listeners.push(Listener { event, callback });
		Ok(())
	}
}

impl RenderSession for CanvasSession {
	fn data(&self) -> &GraphData {
		&self.data
	}

	fn set_data(&mut self, data: GraphData) {
		let data = Rc::new(data);
		let blurred = self.shared.state.borrow_mut().replace_data(&data);
		*self.shared.data.borrow_mut() = data.clone();
		self.data = data;
		if blurred {
			self.shared.handlers.blur_node();
		}
	}

	fn destroy(mut self) {
		self.release();
		debug!("canvas session released");
	}
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
	use wasm_bindgen_test::*;

	use super::*;
	use crate::graph::GraphDocument;

	wasm_bindgen_test_configure!(run_in_browser);

	fn container() -> HtmlElement {
		let document = web_sys::window().unwrap().document().unwrap();
		let div: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
		document.body().unwrap().append_child(&div).unwrap();
		div
	}

	fn sample() -> GraphData {
		let doc = GraphDocument::parse(
			r#"{"nodes":[{"id":1,"label":"A"},{"id":2,"label":"B"}],"edges":[{"from":1,"to":2}]}"#,
		)
		.unwrap()
		.normalize();
		GraphData::from_document(doc).unwrap()
	}

	fn handlers() -> InteractionHandlers {
		InteractionHandlers::new(|_, _| {}, |_, _| {}, || {})
	}

	#[wasm_bindgen_test]
	fn destroy_removes_the_canvas() {
		let container = container();
		let session = CanvasBackend
			.create_session(&container, sample(), &RenderOptions::default(), handlers())
			.unwrap();
		assert_eq!(container.child_element_count(), 1);

		session.destroy();
		assert_eq!(container.child_element_count(), 0);
	}

	#[wasm_bindgen_test]
	fn releasing_an_unmounted_session_leaves_the_container_alone() {
		let container = container();
		let canvas: HtmlCanvasElement = web_sys::window()
			.unwrap()
			.document()
			.unwrap()
			.create_element("canvas")
			.unwrap()
			.dyn_into()
			.unwrap();
		let data = sample();
		let state = GraphViewState::new(&data, &RenderOptions::default(), 100.0, 100.0);
		let mut session = CanvasSession::new(container.clone(), canvas, data, state, handlers());
		session.attach_listeners().unwrap();

		session.release();

		assert!(session.listeners.is_empty());
		assert!(session.resize.is_none());
		assert_eq!(container.child_element_count(), 0);
	}
}
