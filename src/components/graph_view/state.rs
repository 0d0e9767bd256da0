use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use crate::graph::{GraphData, ItemId, RenderOptions};

/// Simulation step used for stabilization and as the first frame's delta.
pub const STEP: f64 = 0.016;

/// Pointer travel (screen pixels) below which a press counts as a click.
pub const CLICK_SLOP: f64 = 4.0;

/// Radius of the ring new nodes are placed on.
const SPAWN_RADIUS: f64 = 100.0;

#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub id: ItemId,
	pub label: String,
	pub fill: String,
	pub tooltip: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct EdgeInfo {
	pub label: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Press-to-release tracking used to tell clicks from drags.
#[derive(Clone, Debug, Default)]
pub struct PressState {
	pub active: bool,
	pub x: f64,
	pub y: f64,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	/// Seconds the pointer has rested on `node`.
	pub elapsed: f64,
	pub pointer_x: f64,
	pub pointer_y: f64,
}

/// Result of moving the hover from one node to another.
#[derive(Clone, Debug, Default)]
pub struct HoverChange {
	pub left: bool,
	pub entered: Option<ItemId>,
}

pub struct GraphViewState {
	pub graph: ForceGraph<NodeInfo, EdgeInfo>,
	/// Edges from a node to itself; drawn, but kept out of the simulation.
	pub loops: Vec<(DefaultNodeIdx, EdgeInfo)>,
	pub options: RenderOptions,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub press: PressState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
}

impl GraphViewState {
	pub fn new(data: &GraphData, options: &RenderOptions, width: f64, height: f64) -> Self {
		let (graph, loops) = build_graph(data, options, &HashMap::new());
		Self {
			graph,
			loops,
			options: options.clone(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			press: PressState::default(),
			hover: HoverState::default(),
			width,
			height,
		}
	}

	/// Swap in new data. Pan/zoom stay, nodes whose id survives keep their
	/// position. Returns whether a hovered node was dropped.
	pub fn replace_data(&mut self, data: &GraphData) -> bool {
		let mut positions = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(node.data.user_data.id.clone(), (node.x(), node.y()));
		});
		(self.graph, self.loops) = build_graph(data, &self.options, &positions);
		self.drag = DragState::default();
		self.press = PressState::default();
		let was_hovering = self.hover.node.take().is_some();
		self.hover.elapsed = 0.0;
		was_hovering
	}

	/// Run the simulation ahead of the first frame.
	pub fn stabilize(&mut self) {
		if !self.options.physics.stabilization {
			return;
		}
		for _ in 0..self.options.physics.stabilization_iterations {
			self.graph.update(STEP as f32);
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let radius = self.options.nodes.size;
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// Later nodes are drawn on top, so the last hit wins.
			if (dx * dx + dy * dy).sqrt() < radius {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<ItemId> {
		let mut id = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				id = Some(node.data.user_data.id.clone());
			}
		});
		id
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) -> HoverChange {
		if self.hover.node == node {
			return HoverChange::default();
		}
		let left = self.hover.node.is_some();
		self.hover.node = node;
		self.hover.elapsed = 0.0;
		HoverChange {
			left,
			entered: node.and_then(|idx| self.node_id(idx)),
		}
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
	}

	/// Tooltip text and its screen anchor, once the hover delay has passed.
	pub fn tooltip(&self) -> Option<(String, f64, f64)> {
		let idx = self.hover.node?;
		if self.hover.elapsed < self.options.interaction.tooltip_delay.as_secs_f64() {
			return None;
		}
		let mut text = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				text = node.data.user_data.tooltip.clone();
			}
		});
		text.map(|t| (t, self.hover.pointer_x, self.hover.pointer_y))
	}

	pub fn begin_drag(&mut self, idx: DefaultNodeIdx, x: f64, y: f64) {
		self.drag.active = true;
		self.drag.node_idx = Some(idx);
		self.drag.start_x = x;
		self.drag.start_y = y;
		let drag = &mut self.drag;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				drag.node_start_x = node.x();
				drag.node_start_y = node.y();
			}
		});
	}

	pub fn begin_press(&mut self, x: f64, y: f64) {
		self.press = PressState {
			active: true,
			x,
			y,
			moved: false,
		};
	}

	pub fn begin_pan(&mut self, x: f64, y: f64) {
		self.pan.active = true;
		self.pan.start_x = x;
		self.pan.start_y = y;
		self.pan.transform_start_x = self.transform.x;
		self.pan.transform_start_y = self.transform.y;
	}

	pub fn pointer_moved(&mut self, x: f64, y: f64) {
		self.hover.pointer_x = x;
		self.hover.pointer_y = y;

		if self.press.active {
			let (dx, dy) = (x - self.press.x, y - self.press.y);
			if (dx * dx + dy * dy).sqrt() > CLICK_SLOP {
				self.press.moved = true;
			}
		}

		if self.drag.active {
			if let Some(idx) = self.drag.node_idx {
				let (dx, dy) = (
					(x - self.drag.start_x) / self.transform.k,
					(y - self.drag.start_y) / self.transform.k,
				);
				let (nx, ny) = (
					self.drag.node_start_x + dx as f32,
					self.drag.node_start_y + dy as f32,
				);
				self.graph.visit_nodes_mut(|node| {
					if node.index() == idx {
						node.data.x = nx;
						node.data.y = ny;
						node.data.is_anchor = true;
					}
				});
			}
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		}
	}

	/// End any drag or pan. Returns true when the press was a click.
	pub fn release(&mut self) -> bool {
		if let Some(idx) = self.drag.node_idx {
			// Hand the node back to the simulation.
			self.graph.visit_nodes_mut(|node| {
				if node.index() == idx {
					node.data.is_anchor = false;
				}
			});
		}
		let clicked = self.press.active && !self.press.moved;
		self.drag = DragState::default();
		self.pan.active = false;
		self.press = PressState::default();
		clicked
	}

	pub fn zoom(&mut self, x: f64, y: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn tick(&mut self, dt: f64) {
		self.graph.update(dt as f32);
		if self.hover.node.is_some() {
			self.hover.elapsed += dt;
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

fn build_graph(
	data: &GraphData,
	options: &RenderOptions,
	positions: &HashMap<ItemId, (f32, f32)>,
) -> (ForceGraph<NodeInfo, EdgeInfo>, Vec<(DefaultNodeIdx, EdgeInfo)>) {
	let physics = &options.physics;
	let mut graph = ForceGraph::new(SimulationParameters {
		force_charge: physics.force_charge,
		force_spring: physics.force_spring,
		force_max: physics.force_max,
		node_speed: physics.node_speed,
		damping_factor: physics.damping_factor,
	});
	let mut id_to_idx = HashMap::new();
	let mut loops = Vec::new();
	let mut groups: HashMap<&str, usize> = HashMap::new();
	let palette = &options.nodes.group_palette;
	let count = data.nodes.len().max(1);

	for (i, (id, node)) in data.nodes.iter().enumerate() {
		let fill = match (&node.color, &node.group) {
			(Some(color), _) => color.clone(),
			(None, Some(group)) if !palette.is_empty() => {
				let next = groups.len();
				let slot = *groups.entry(group.as_str()).or_insert(next);
				palette[slot % palette.len()].clone()
			}
			_ => options.nodes.color.background.clone(),
		};
		let (x, y) = positions.get(id).copied().unwrap_or_else(|| {
			let angle = (i as f64) * 2.0 * PI / count as f64;
			(
				(SPAWN_RADIUS * angle.cos()) as f32,
				(SPAWN_RADIUS * angle.sin()) as f32,
			)
		});

		let idx = graph.add_node(NodeData {
			x,
			y,
			mass: 10.0,
			is_anchor: false,
			user_data: NodeInfo {
				id: id.clone(),
				label: node.label.clone(),
				fill,
				tooltip: node.link_url().map(str::to_owned),
			},
		});
		id_to_idx.insert(id.clone(), idx);
	}

	for (id, edge) in data.edges.iter() {
		let info = EdgeInfo {
			label: edge.label.clone(),
		};
		match (id_to_idx.get(&edge.from), id_to_idx.get(&edge.to)) {
			(Some(&src), Some(&tgt)) if src == tgt => loops.push((src, info)),
			(Some(&src), Some(&tgt)) => {
				graph.add_edge(src, tgt, EdgeData { user_data: info });
			}
			_ => debug!(
				"edge {id} references a missing node ({} -> {}), not drawn",
				edge.from, edge.to
			),
		}
	}

	(graph, loops)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::GraphDocument;

	const LINKED: &str = r#"{
		"nodes": [
			{ "id": 1, "label": "A", "link": "https://a" },
			{ "id": 2, "label": "B" }
		],
		"edges": [{ "from": 1, "to": 2 }]
	}"#;

	fn data(raw: &str) -> GraphData {
		GraphData::from_document(GraphDocument::parse(raw).unwrap().normalize()).unwrap()
	}

	fn view(raw: &str) -> GraphViewState {
		GraphViewState::new(&data(raw), &RenderOptions::default(), 800.0, 600.0)
	}

	fn index_of(state: &GraphViewState, id: impl Into<ItemId>) -> DefaultNodeIdx {
		let id = id.into();
		let mut found = None;
		state.graph.visit_nodes(|node| {
			if node.data.user_data.id == id {
				found = Some(node.index());
			}
		});
		found.expect("node should be in the simulation")
	}

	fn positions(state: &GraphViewState) -> HashMap<ItemId, (f32, f32)> {
		let mut out = HashMap::new();
		state.graph.visit_nodes(|node| {
			out.insert(node.data.user_data.id.clone(), (node.x(), node.y()));
		});
		out
	}

	#[test]
	fn replacing_data_keeps_surviving_positions_and_view() {
		let mut state = view(LINKED);
		for _ in 0..20 {
			state.tick(STEP);
		}
		state.zoom(400.0, 300.0, -1.0);
		let (k, tx) = (state.transform.k, state.transform.x);
		let before = positions(&state);

		let blurred = state.replace_data(&data(
			r#"{"nodes":[{"id":1,"label":"A"},{"id":3,"label":"C"}],"edges":[]}"#,
		));

		let after = positions(&state);
		assert!(!blurred);
		assert_eq!(after.len(), 2);
		assert_eq!(after[&ItemId::from(1_i64)], before[&ItemId::from(1_i64)]);
		assert!(after.contains_key(&ItemId::from(3_i64)));
		assert_eq!((state.transform.k, state.transform.x), (k, tx));
	}

	#[test]
	fn dropping_data_under_the_pointer_reports_a_blur() {
		let mut state = view(LINKED);
		let idx = index_of(&state, 2_i64);
		let change = state.set_hover(Some(idx));
		assert_eq!(change.entered, Some(ItemId::from(2_i64)));
		assert!(!change.left);

		assert!(state.replace_data(&data(LINKED)));
		assert!(state.hover.node.is_none());
	}

	#[test]
	fn short_press_is_a_click() {
		let mut state = view(LINKED);
		state.begin_press(10.0, 10.0);
		state.begin_pan(10.0, 10.0);
		state.pointer_moved(13.0, 10.0);
		assert!(state.release());
		assert!(!state.pan.active);
	}

	#[test]
	fn press_that_wanders_off_is_not_a_click() {
		let mut state = view(LINKED);
		state.begin_press(10.0, 10.0);
		state.begin_pan(10.0, 10.0);
		state.pointer_moved(20.0, 10.0);
		state.pointer_moved(10.0, 10.0);
		assert!(!state.release());
	}

	#[test]
	fn release_without_press_is_not_a_click() {
		let mut state = view(LINKED);
		assert!(!state.release());
	}

	#[test]
	fn zoom_is_clamped() {
		let mut state = view(LINKED);
		for _ in 0..100 {
			state.zoom(0.0, 0.0, -1.0);
		}
		assert_eq!(state.transform.k, 10.0);
		for _ in 0..200 {
			state.zoom(0.0, 0.0, 1.0);
		}
		assert_eq!(state.transform.k, 0.1);
	}

	#[test]
	fn tooltip_waits_for_the_hover_delay() {
		let mut state = view(LINKED);
		state.set_hover(Some(index_of(&state, 1_i64)));
		state.pointer_moved(50.0, 60.0);

		state.tick(0.1);
		assert!(state.tooltip().is_none());

		state.tick(0.15);
		assert_eq!(state.tooltip(), Some(("https://a".to_owned(), 50.0, 60.0)));
	}

	#[test]
	fn unlinked_node_has_no_tooltip() {
		let mut state = view(LINKED);
		state.set_hover(Some(index_of(&state, 2_i64)));
		state.tick(1.0);
		assert!(state.tooltip().is_none());
	}

	#[test]
	fn dangling_edges_and_loops_stay_out_of_the_simulation() {
		let state = view(
			r#"{"nodes":[{"id":1,"label":"A"},{"id":2,"label":"B"}],
			"edges":[{"from":1,"to":2},{"from":1,"to":99},{"from":2,"to":2,"label":"self"}]}"#,
		);

		let mut simulated = 0;
		state.graph.visit_edges(|_, _, _| simulated += 1);
		assert_eq!(simulated, 1);

		assert_eq!(state.loops.len(), 1);
		let (idx, info) = &state.loops[0];
		assert_eq!(*idx, index_of(&state, 2_i64));
		assert_eq!(info.label.as_deref(), Some("self"));
	}

	#[test]
	fn nodes_are_hit_within_their_radius() {
		let state = view(r#"{"nodes":[{"id":"only","label":"A"}],"edges":[]}"#);
		let (x, y) = positions(&state)[&ItemId::from("only")];
		let sx = x as f64 * state.transform.k + state.transform.x;
		let sy = y as f64 * state.transform.k + state.transform.y;

		assert_eq!(state.node_at_position(sx, sy), Some(index_of(&state, "only")));
		assert_eq!(state.node_at_position(sx + 40.0, sy), None);
	}
}
